//! Register map of the BBQ10 keyboard firmware.

/// Default 7-bit I2C address of the keyboard.
pub const DEFAULT_ADDRESS: u8 = 0x1F;

/// ORed into a register address to turn a read request into a write.
pub const WRITE_MASK: u8 = 1 << 7;

/// Scalar registers.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// Firmware version, packed as `major << 4 | minor`.
    Version = 0x01,
    /// Configuration flags, see [`ConfigBit`].
    Config = 0x02,
    /// Reason of the last interrupt, see [`interrupt`].
    Interrupts = 0x03,
    /// Key status: FIFO count and lock flags, see [`keys`].
    Keys = 0x04,
    /// Keyboard backlight brightness.
    Backlight = 0x05,
    /// Debounce time. Not implemented by the firmware.
    Debounce = 0x06,
    /// Poll frequency. Not implemented by the firmware.
    Frequency = 0x07,
    /// Any write resets the device.
    Reset = 0x08,
    /// Key event FIFO, two bytes per entry: state code, character.
    Fifo = 0x09,
    /// Secondary backlight brightness.
    Backlight2 = 0x0A,
}

/// Registers of the GPIO expander pin group. One bit per pin.
///
/// Only available from firmware 0.4 onward.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinRegister {
    /// 1 = input, 0 = output.
    Direction = 0x0B,
    /// 1 = pull resistor enabled.
    PullEnable = 0x0C,
    /// 1 = pull-up, 0 = pull-down.
    PullUpDown = 0x0D,
    /// Pin levels.
    Values = 0x0E,
    /// 1 = pin change raises an interrupt.
    InterruptConfig = 0x0F,
    /// Pins that raised an interrupt.
    InterruptState = 0x10,
}

impl From<Register> for u8 {
    fn from(reg: Register) -> Self {
        reg as u8
    }
}

impl From<PinRegister> for u8 {
    fn from(reg: PinRegister) -> Self {
        reg as u8
    }
}

/// Bits of the [`Register::Config`] register.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigBit {
    /// Overwrite the oldest FIFO entry when the FIFO is full.
    AllowOverflow = 1 << 0,
    /// Interrupt on FIFO overflow.
    OverflowInterrupt = 1 << 1,
    /// Interrupt on capslock change.
    CapslockInterrupt = 1 << 2,
    /// Interrupt on numlock change.
    NumlockInterrupt = 1 << 3,
    /// Interrupt on key events.
    KeypressInterrupt = 1 << 4,
    /// Interrupt on panic.
    PanicInterrupt = 1 << 5,
    /// Report modifier keys as FIFO events.
    ReportModifiers = 1 << 6,
    /// Apply modifiers to the reported characters.
    UseModifiers = 1 << 7,
}

/// Bits of the [`Register::Interrupts`] register.
pub mod interrupt {
    /// The key FIFO overflowed.
    pub const OVERFLOWED_FIFO: u8 = 1 << 0;
    /// Capslock was toggled.
    pub const TOGGLED_CAPSLOCK: u8 = 1 << 1;
    /// Numlock was toggled.
    pub const TOGGLED_NUMLOCK: u8 = 1 << 2;
    /// A key event was queued.
    pub const KEYPRESS: u8 = 1 << 3;
    /// The firmware panicked.
    pub const PANIC: u8 = 1 << 4;
    /// A GPIO expander pin changed.
    pub const CHANGED_PIN: u8 = 1 << 5;
    /// Reserved.
    pub const RESERVED: u8 = (1 << 6) | (1 << 7);
}

/// Bits of the [`Register::Keys`] register.
pub mod keys {
    /// Number of queued FIFO entries.
    pub const COUNT_MASK: u8 = 0x1F;
    /// Capslock is on.
    pub const CAPSLOCK: u8 = 1 << 5;
    /// Numlock is on.
    pub const NUMLOCK: u8 = 1 << 6;
}

/// Key state codes of a FIFO entry.
pub mod key_state {
    /// No activity.
    pub const IDLE: u8 = 0;
    /// Key went down.
    pub const PRESSED: u8 = 1;
    /// Key is held.
    pub const HELD: u8 = 2;
    /// Key went up.
    pub const RELEASED: u8 = 3;
}
