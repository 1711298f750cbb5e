//! Core implementation of the BBQ10 keyboard driver.

mod backlight;
mod gpio;

pub use gpio::GpioDirection;

use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};
use heapless::String;

use crate::conf::Config;
use crate::err::{ConfigError, Error};
use crate::interrupt::{InterruptBinding, InterruptCallback, InterruptLine};
use crate::key::{KeyEvent, KeyLog, DEFAULT_LOG_CAPACITY};
use crate::reg::Register;
use crate::status::{InterruptStatus, KeyStatus, Version};
use crate::transport::RegisterBus;

/// Time the firmware needs to come back after a reset.
const RESET_DELAY: Duration = Duration::from_millis(50);
/// Pause between the reset and the first configuration write of `init`.
const INIT_DELAY: Duration = Duration::from_millis(10);

/// A controller for the BBQ10 keyboard.
///
/// Key events are drained from the device FIFO into a [`KeyLog`] holding up
/// to `N` events. Every query is a register round trip; nothing read from the
/// device is cached except the firmware version used to gate the pin group.
///
/// The interrupt callback is dispatched from [`wait_for_interrupt`] and
/// [`handle_interrupt`], which borrow the controller mutably, so a handler
/// never overlaps a foreground transaction.
///
/// [`wait_for_interrupt`]: KeyboardController::wait_for_interrupt
/// [`handle_interrupt`]: KeyboardController::handle_interrupt
pub struct KeyboardController<I2cType, D, P, const N: usize = DEFAULT_LOG_CAPACITY> {
    bus: RegisterBus<I2cType, D>,
    binding: InterruptBinding<P>,
    key_log: KeyLog<N>,
    fade_step: Duration,
    initial_backlight: u8,
    initial_callback: Option<InterruptCallback>,
    firmware: Option<Version>,
    last_interrupt: Option<u8>,
}

impl<I2cType, D, P, ErrorType, const N: usize> KeyboardController<I2cType, D, P, N>
where
    I2cType: I2c<SevenBitAddress, Error = ErrorType>,
    ErrorType: embedded_hal_async::i2c::Error,
    D: DelayNs,
    P: InterruptLine,
{
    /// Creates a new `KeyboardController`. No bus traffic happens until [`init`].
    ///
    /// # Arguments
    ///
    /// * `i2c` - An I2C peripheral that implements `embedded-hal-async::i2c::I2c`.
    /// * `delay` - The delay provider used for settle times and fades.
    /// * `config` - Address, initial backlight, fade pacing and callback.
    ///
    /// [`init`]: KeyboardController::init
    pub fn new(i2c: I2cType, delay: D, config: Config) -> Self {
        Self {
            bus: RegisterBus::new(i2c, delay, config.address),
            binding: InterruptBinding::new(),
            key_log: KeyLog::new(),
            fade_step: config.fade_step,
            initial_backlight: config.backlight,
            initial_callback: config.interrupt_callback,
            firmware: None,
            last_interrupt: None,
        }
    }

    /// Initializes the keyboard.
    ///
    /// Resets the device, switches the backlight off, binds `int_pin` if
    /// given, installs the configured callback and fades the backlight to the
    /// configured level.
    pub async fn init(&mut self, int_pin: Option<P>) -> Result<(), Error<ErrorType>> {
        if self.initial_callback.is_some() && int_pin.is_none() && self.binding.pin().is_none() {
            return Err(ConfigError::NoInterruptPin.into());
        }

        self.reset().await?;
        self.bus.pause(INIT_DELAY).await;
        self.set_backlight(0).await?;
        log::trace!("kbd::init reset done, backlight off");

        if let Some(pin) = int_pin {
            self.set_interrupt_pin(Some(pin))?;
        }
        if let Some(callback) = self.initial_callback {
            self.set_callback(Some(callback))?;
        }

        self.fade_to(self.initial_backlight).await?;
        log::debug!("kbd::init done, backlight {}", self.initial_backlight);
        Ok(())
    }

    /// Resets the device.
    ///
    /// The firmware toggles its interrupt line while rebooting, so the
    /// interrupt binding is released for the duration of the reset and the
    /// same pin and callback are bound again afterwards, even if the reset
    /// write fails.
    pub async fn reset(&mut self) -> Result<(), Error<ErrorType>> {
        let pin = self.binding.set_pin::<ErrorType>(None)?;

        let result = self.bus.write_register(Register::Reset, None).await;
        if result.is_ok() {
            self.bus.pause(RESET_DELAY).await;
        }
        self.firmware = None;

        self.binding.set_pin::<ErrorType>(pin)?;
        log::trace!("kbd::reset done, interrupt armed: {}", self.binding.is_armed());
        result
    }

    /// Reads the firmware version.
    pub async fn firmware_version(&mut self) -> Result<Version, Error<ErrorType>> {
        let byte = self.bus.read_register(Register::Version).await?;
        Ok(Version::from_byte(byte))
    }

    /// Reads the key status register.
    pub async fn status(&mut self) -> Result<KeyStatus, Error<ErrorType>> {
        let byte = self.bus.read_register(Register::Keys).await?;
        Ok(KeyStatus::from(byte))
    }

    /// Number of key events waiting in the device FIFO.
    pub async fn pending_keys(&mut self) -> Result<u8, Error<ErrorType>> {
        Ok(self.status().await?.pending_keys())
    }

    /// Reads and acknowledges the reason of the last interrupt.
    ///
    /// The register is cleared right after it is read; until then the device
    /// keeps its interrupt line asserted.
    pub async fn last_interrupt(&mut self) -> Result<InterruptStatus, Error<ErrorType>> {
        let raw = self.bus.read_register(Register::Interrupts).await?;
        self.last_interrupt = Some(raw);
        self.bus.write_register(Register::Interrupts, Some(0)).await?;

        let status = InterruptStatus::from(raw);
        log::debug!("kbd: last interrupt {status:?}");
        Ok(status)
    }

    /// The raw byte decoded by the most recent [`last_interrupt`](Self::last_interrupt).
    pub fn last_interrupt_raw(&self) -> Option<u8> {
        self.last_interrupt
    }

    /// Moves one event from the device FIFO into the key log.
    ///
    /// Returns `Ok(None)` without touching the FIFO if nothing is pending.
    pub async fn read_key(&mut self) -> Result<Option<KeyEvent>, Error<ErrorType>> {
        if self.pending_keys().await? == 0 {
            return Ok(None);
        }
        self.pop_key().await.map(Some)
    }

    /// Moves every pending event into the key log. Returns how many were moved.
    pub async fn drain_keys(&mut self) -> Result<usize, Error<ErrorType>> {
        let mut drained = 0;
        while self.pending_keys().await? > 0 {
            self.pop_key().await?;
            drained += 1;
        }
        Ok(drained)
    }

    /// Events drained so far.
    pub fn key_log(&self) -> &KeyLog<N> {
        &self.key_log
    }

    /// Hands the key log to the caller and starts a new, empty one.
    pub fn take_key_log(&mut self) -> KeyLog<N> {
        core::mem::take(&mut self.key_log)
    }

    /// Characters of the pressed keys in the log.
    pub fn input_buffer(&self) -> String<N> {
        self.key_log.input_buffer()
    }

    /// The bound interrupt pin, if any.
    pub fn interrupt_pin(&self) -> Option<&P> {
        self.binding.pin()
    }

    /// Binds the interrupt line to `pin` and returns the previously bound pin.
    ///
    /// The old pin is disarmed first. The new one is set up as a pulled-up
    /// input and the current callback is armed on it. If the new pin cannot
    /// be armed it is dropped and the old pin stays bound.
    pub fn set_interrupt_pin(&mut self, pin: Option<P>) -> Result<Option<P>, Error<ErrorType>> {
        self.binding.set_pin(pin)
    }

    /// The callback dispatched on interrupts. `None` if interrupts are disabled.
    pub fn callback(&self) -> Option<InterruptCallback> {
        self.binding.callback()
    }

    /// Sets the interrupt callback. `None` disables the interrupt.
    ///
    /// Fails with [`ConfigError::NoInterruptPin`] if no pin is bound.
    pub fn set_callback(
        &mut self,
        callback: Option<InterruptCallback>,
    ) -> Result<(), Error<ErrorType>> {
        self.binding.set_callback(callback)
    }

    /// Waits for the interrupt line to fall and runs the callback.
    pub async fn wait_for_interrupt(&mut self) -> Result<(), Error<ErrorType>> {
        let callback = self.binding.wait().await?;
        self.dispatch(callback).await;
        Ok(())
    }

    /// Runs the callback for an interrupt the caller detected itself.
    pub async fn handle_interrupt(&mut self) -> Result<(), Error<ErrorType>> {
        if self.binding.pin().is_none() {
            return Err(ConfigError::NoInterruptPin.into());
        }
        let Some(callback) = self.binding.callback() else {
            return Err(ConfigError::NoCallback.into());
        };
        self.dispatch(callback).await;
        Ok(())
    }

    /// Disarms the interrupt and gives back the peripherals.
    pub fn release(self) -> (I2cType, D, Option<P>) {
        let pin = self.binding.into_pin();
        let (i2c, delay) = self.bus.release();
        (i2c, delay, pin)
    }

    async fn dispatch(&mut self, callback: InterruptCallback) {
        match callback {
            InterruptCallback::DrainFifo => match self.drain_keys().await {
                Ok(drained) => log::debug!("kbd: drained {drained} key events"),
                Err(err) => log::warn!("kbd: FIFO drain aborted: {err:?}"),
            },
            InterruptCallback::Notify(notify) => notify(),
        }
    }

    async fn pop_key(&mut self) -> Result<KeyEvent, Error<ErrorType>> {
        if self.key_log.is_full() {
            log::warn!("kbd: key log full, leaving events in the device FIFO");
            return Err(Error::KeyLogFull);
        }
        let record = self.bus.read_register_pair(Register::Fifo).await?;
        let event = KeyEvent::from_bytes(record).ok_or_else(|| {
            log::warn!("kbd: invalid key state {:#04x}", record[0]);
            Error::<ErrorType>::InvalidKeyState(record[0])
        })?;
        // Room was checked above.
        let _ = self.key_log.push(event);
        log::trace!("kbd: key event {event:?}");
        Ok(event)
    }
}
