//! Driver configuration.

use embassy_time::Duration;

use crate::interrupt::InterruptCallback;
use crate::reg::DEFAULT_ADDRESS;

/// Parameters applied by [`KeyboardController::init`](crate::keyboard::KeyboardController::init).
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// 7-bit I2C address of the keyboard.
    pub address: u8,
    /// Backlight level faded to at the end of initialization.
    pub backlight: u8,
    /// Pause between two steps of a backlight fade.
    pub fade_step: Duration,
    /// Callback installed on the interrupt pin. `None` keeps the default FIFO drain.
    /// Setting it requires an interrupt pin.
    pub interrupt_callback: Option<InterruptCallback>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            backlight: u8::MAX,
            fade_step: Duration::from_millis(2),
            interrupt_callback: None,
        }
    }
}
