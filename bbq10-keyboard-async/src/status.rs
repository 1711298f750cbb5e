//! Decoded views of the status registers.

use core::fmt;

use crate::reg::{interrupt, keys, ConfigBit};

/// Firmware version reported by the [`Version`](crate::reg::Register::Version) register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    /// High nibble.
    pub major: u8,
    /// Low nibble.
    pub minor: u8,
}

impl Version {
    /// First firmware revision that has the GPIO expander registers.
    pub const PIN_GROUP: Version = Version { major: 0, minor: 4 };

    /// Splits a packed version byte into its nibbles.
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            major: byte >> 4,
            minor: byte & 0x0F,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Contents of the [`Keys`](crate::reg::Register::Keys) register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStatus {
    inner: u8,
}

impl From<u8> for KeyStatus {
    fn from(status: u8) -> Self {
        Self { inner: status }
    }
}

impl KeyStatus {
    /// Number of key events queued in the device FIFO.
    pub fn pending_keys(self) -> u8 {
        self.inner & keys::COUNT_MASK
    }

    /// Returns `true` if capslock is on.
    pub fn capslock(self) -> bool {
        (self.inner & keys::CAPSLOCK) > 0
    }

    /// Returns `true` if numlock is on.
    pub fn numlock(self) -> bool {
        (self.inner & keys::NUMLOCK) > 0
    }

    /// The full register byte.
    pub fn raw(self) -> u8 {
        self.inner
    }
}

/// Why the device raised its interrupt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptReason {
    /// The key FIFO overflowed.
    OverflowedFifo,
    /// Capslock was toggled.
    ToggledCapslock,
    /// Numlock was toggled.
    ToggledNumlock,
    /// A key event was queued.
    Keypress,
    /// The firmware panicked.
    Panic,
    /// A GPIO expander pin changed.
    ChangedPin,
    /// One of the reserved bits was set.
    None,
    /// No bit was set.
    Unknown(u8),
    /// More than one bit was set. No priority is implied between them.
    Combined(u8),
}

impl From<u8> for InterruptReason {
    fn from(raw: u8) -> Self {
        if raw == 0 {
            return Self::Unknown(raw);
        }
        if raw.count_ones() > 1 {
            return Self::Combined(raw);
        }
        match raw {
            interrupt::OVERFLOWED_FIFO => Self::OverflowedFifo,
            interrupt::TOGGLED_CAPSLOCK => Self::ToggledCapslock,
            interrupt::TOGGLED_NUMLOCK => Self::ToggledNumlock,
            interrupt::KEYPRESS => Self::Keypress,
            interrupt::PANIC => Self::Panic,
            interrupt::CHANGED_PIN => Self::ChangedPin,
            _ => Self::None,
        }
    }
}

/// Contents of the [`Interrupts`](crate::reg::Register::Interrupts) register.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct InterruptStatus {
    inner: u8,
}

impl From<u8> for InterruptStatus {
    fn from(status: u8) -> Self {
        Self { inner: status }
    }
}

impl fmt::Debug for InterruptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterruptStatus")
            .field("raw", &self.inner)
            .field("reason", &self.reason())
            .finish()
    }
}

impl InterruptStatus {
    /// The decoded reason.
    pub fn reason(self) -> InterruptReason {
        InterruptReason::from(self.inner)
    }

    /// The raw register byte.
    pub fn raw(self) -> u8 {
        self.inner
    }

    /// Returns `true` if the FIFO overflow bit is set.
    pub fn overflowed_fifo(self) -> bool {
        (self.inner & interrupt::OVERFLOWED_FIFO) > 0
    }

    /// Returns `true` if the capslock bit is set.
    pub fn toggled_capslock(self) -> bool {
        (self.inner & interrupt::TOGGLED_CAPSLOCK) > 0
    }

    /// Returns `true` if the numlock bit is set.
    pub fn toggled_numlock(self) -> bool {
        (self.inner & interrupt::TOGGLED_NUMLOCK) > 0
    }

    /// Returns `true` if the keypress bit is set.
    pub fn keypress(self) -> bool {
        (self.inner & interrupt::KEYPRESS) > 0
    }

    /// Returns `true` if the panic bit is set.
    pub fn panic(self) -> bool {
        (self.inner & interrupt::PANIC) > 0
    }

    /// Returns `true` if the pin change bit is set.
    pub fn changed_pin(self) -> bool {
        (self.inner & interrupt::CHANGED_PIN) > 0
    }
}

/// A builder for the [`Config`](crate::reg::Register::Config) register.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    inner: u8,
}

impl ConfigFlags {
    /// No flag set.
    pub const fn none() -> Self {
        Self { inner: 0 }
    }

    /// Adds a flag.
    pub const fn combine(self, bit: ConfigBit) -> Self {
        Self {
            inner: self.inner | bit as u8,
        }
    }

    /// Removes a flag.
    pub const fn without(self, bit: ConfigBit) -> Self {
        Self {
            inner: self.inner & !(bit as u8),
        }
    }

    /// Returns `true` if `bit` is set.
    pub const fn contains(self, bit: ConfigBit) -> bool {
        (self.inner & bit as u8) > 0
    }
}

impl Default for ConfigFlags {
    fn default() -> Self {
        Self::none()
    }
}

impl From<u8> for ConfigFlags {
    fn from(val: u8) -> Self {
        Self { inner: val }
    }
}

impl From<ConfigFlags> for u8 {
    fn from(val: ConfigFlags) -> Self {
        val.inner
    }
}

impl fmt::Debug for ConfigFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigFlags")
            .field("allow_overflow", &self.contains(ConfigBit::AllowOverflow))
            .field("overflow_int", &self.contains(ConfigBit::OverflowInterrupt))
            .field("capslock_int", &self.contains(ConfigBit::CapslockInterrupt))
            .field("numlock_int", &self.contains(ConfigBit::NumlockInterrupt))
            .field("keypress_int", &self.contains(ConfigBit::KeypressInterrupt))
            .field("panic_int", &self.contains(ConfigBit::PanicInterrupt))
            .field("report_mods", &self.contains(ConfigBit::ReportModifiers))
            .field("use_mods", &self.contains(ConfigBit::UseModifiers))
            .finish()
    }
}
