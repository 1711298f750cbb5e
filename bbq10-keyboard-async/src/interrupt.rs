//! Binding of the keyboard's interrupt line to a callback.
//!
//! The firmware pulls its interrupt line low once per batch of events. A
//! binding pairs the input pin wired to that line with the callback the
//! driver dispatches when the falling edge arrives.

use core::convert::Infallible;
use core::fmt::Debug;

use embedded_hal::digital::ErrorType;
use embedded_hal_async::digital::Wait;

use crate::err::{ConfigError, Error};

/// Pull resistor setting of an input pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull {
    None,
    Up,
    Down,
}

/// Edge an interrupt is raised on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
}

/// An input pin that can be armed to raise interrupts.
pub trait InterruptLine: Wait {
    /// Puts the pin in input mode with the given pull resistor.
    fn configure_input(&mut self, pull: Pull) -> Result<(), Self::Error>;

    /// Arms the interrupt on `trigger`, or disables it with `None`.
    fn set_trigger(&mut self, trigger: Option<Edge>) -> Result<(), Self::Error>;
}

/// What the driver does when the interrupt line fires.
#[derive(Debug, Clone, Copy)]
pub enum InterruptCallback {
    /// Drain the device FIFO into the key log.
    DrainFifo,
    /// Call a user function and leave the FIFO alone.
    Notify(fn()),
}

/// Placeholder pin type for drivers used without an interrupt line.
#[derive(Debug)]
pub enum NoPin {}

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl Wait for NoPin {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        match *self {}
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        match *self {}
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        match *self {}
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        match *self {}
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        match *self {}
    }
}

impl InterruptLine for NoPin {
    fn configure_input(&mut self, _pull: Pull) -> Result<(), Self::Error> {
        match *self {}
    }

    fn set_trigger(&mut self, _trigger: Option<Edge>) -> Result<(), Self::Error> {
        match *self {}
    }
}

/// A (pin, callback) pair.
///
/// A callback is only ever armed on the pin currently stored here: replacing
/// the pin disarms the old one before the callback is applied to the new one.
pub struct InterruptBinding<P> {
    pin: Option<P>,
    callback: Option<InterruptCallback>,
}

impl<P: InterruptLine> InterruptBinding<P> {
    /// No pin, callback defaulting to [`InterruptCallback::DrainFifo`].
    pub const fn new() -> Self {
        Self {
            pin: None,
            callback: Some(InterruptCallback::DrainFifo),
        }
    }

    pub fn pin(&self) -> Option<&P> {
        self.pin.as_ref()
    }

    pub fn callback(&self) -> Option<InterruptCallback> {
        self.callback
    }

    /// Returns `true` if a pin is bound and a callback is set on it.
    pub fn is_armed(&self) -> bool {
        self.pin.is_some() && self.callback.is_some()
    }

    /// Replaces the bound pin and returns the previous one, disarmed.
    ///
    /// The new pin is configured as a pulled-up input and the current
    /// callback is armed on it before it is stored. If that fails the new
    /// pin is dropped and the previous pin stays bound and armed.
    pub fn set_pin<E>(&mut self, pin: Option<P>) -> Result<Option<P>, Error<E>> {
        if let Some(old) = self.pin.as_mut() {
            old.set_trigger(None).map_err(pin_error::<E, _>)?;
        }
        let Some(mut pin) = pin else {
            return Ok(self.pin.take());
        };

        let trigger = self.trigger();
        let armed = pin
            .configure_input(Pull::Up)
            .and_then(|()| pin.set_trigger(trigger));
        if let Err(err) = armed {
            if let Some(old) = self.pin.as_mut() {
                if let Err(err) = old.set_trigger(trigger) {
                    log::warn!("Could not re-arm previous interrupt line: {err:?}");
                }
            }
            return Err(pin_error(err));
        }
        Ok(self.pin.replace(pin))
    }

    /// Sets the callback. `None` disables the interrupt but keeps the pin.
    pub fn set_callback<E>(&mut self, callback: Option<InterruptCallback>) -> Result<(), Error<E>> {
        if self.pin.is_none() {
            return Err(ConfigError::NoInterruptPin.into());
        }
        self.callback = callback;
        self.apply()
    }

    /// Waits for the armed edge and returns the callback to dispatch.
    pub async fn wait<E>(&mut self) -> Result<InterruptCallback, Error<E>> {
        let Some(pin) = self.pin.as_mut() else {
            return Err(ConfigError::NoInterruptPin.into());
        };
        let Some(callback) = self.callback else {
            return Err(ConfigError::NoCallback.into());
        };
        pin.wait_for_falling_edge().await.map_err(pin_error::<E, _>)?;
        Ok(callback)
    }

    /// Disarms and gives back the pin. A disarm failure is only logged.
    pub fn into_pin(mut self) -> Option<P> {
        if let Some(pin) = self.pin.as_mut() {
            if let Err(err) = pin.set_trigger(None) {
                log::warn!("Could not disarm interrupt line: {err:?}");
            }
        }
        self.pin
    }

    fn trigger(&self) -> Option<Edge> {
        self.callback.map(|_| Edge::Falling)
    }

    fn apply<E>(&mut self) -> Result<(), Error<E>> {
        let trigger = self.trigger();
        match self.pin.as_mut() {
            Some(pin) => pin.set_trigger(trigger).map_err(pin_error),
            None => Ok(()),
        }
    }
}

impl<P: InterruptLine> Default for InterruptBinding<P> {
    fn default() -> Self {
        Self::new()
    }
}

fn pin_error<E, PinErr: Debug>(err: PinErr) -> Error<E> {
    log::warn!("Interrupt line error: {err:?}");
    Error::Pin
}

#[cfg(feature = "esp-hal")]
mod esp {
    use esp_hal::gpio::{Event, Input, InputConfig};

    use super::{Edge, InterruptLine, Pull};

    impl InterruptLine for Input<'_> {
        fn configure_input(&mut self, pull: Pull) -> Result<(), Self::Error> {
            let pull = match pull {
                Pull::None => esp_hal::gpio::Pull::None,
                Pull::Up => esp_hal::gpio::Pull::Up,
                Pull::Down => esp_hal::gpio::Pull::Down,
            };
            self.apply_config(&InputConfig::default().with_pull(pull));
            Ok(())
        }

        fn set_trigger(&mut self, trigger: Option<Edge>) -> Result<(), Self::Error> {
            match trigger {
                Some(Edge::Falling) => self.listen(Event::FallingEdge),
                Some(Edge::Rising) => self.listen(Event::RisingEdge),
                None => self.unlisten(),
            }
            Ok(())
        }
    }
}
