//! Error types for the BBQ10 keyboard driver.

use core::fmt::{self, Debug};

use crate::status::Version;

/// A precondition of the interrupt binding was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A callback was set, or an interrupt awaited, while no pin is bound.
    NoInterruptPin,
    /// An interrupt was awaited while the callback is disabled.
    NoCallback,
}

/// The main error type for the keyboard driver.
pub enum Error<E> {
    /// An I2C transaction failed. The device is not retried.
    Transport(E),
    /// The interrupt line rejected a configuration change or a wait.
    Pin,
    /// The interrupt binding is not set up for the requested operation.
    Config(ConfigError),
    /// A value does not fit the register it is meant for.
    OutOfRange,
    /// A FIFO entry carried a state code outside `0..=3`.
    InvalidKeyState(u8),
    /// The key log is full; the device FIFO was left untouched.
    KeyLogFull,
    /// The firmware is too old for the requested register group.
    Unsupported(Version),
}

impl<E: Debug> Debug for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "Transport({err:?})"),
            Self::Pin => write!(f, "Pin"),
            Self::Config(err) => write!(f, "Config({err:?})"),
            Self::OutOfRange => write!(f, "OutOfRange"),
            Self::InvalidKeyState(code) => write!(f, "InvalidKeyState({code})"),
            Self::KeyLogFull => write!(f, "KeyLogFull"),
            Self::Unsupported(version) => write!(f, "Unsupported({version})"),
        }
    }
}

impl<E> From<ConfigError> for Error<E> {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}
