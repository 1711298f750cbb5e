//! Backlight control and fades.

use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use super::KeyboardController;
use crate::err::Error;
use crate::interrupt::InterruptLine;
use crate::reg::Register;

impl<I2cType, D, P, ErrorType, const N: usize> KeyboardController<I2cType, D, P, N>
where
    I2cType: I2c<SevenBitAddress, Error = ErrorType>,
    ErrorType: embedded_hal_async::i2c::Error,
    D: DelayNs,
    P: InterruptLine,
{
    /// Reads the backlight level from the device.
    pub async fn backlight(&mut self) -> Result<u8, Error<ErrorType>> {
        self.bus.read_register(Register::Backlight).await
    }

    /// Writes the backlight level.
    pub async fn set_backlight(&mut self, level: u8) -> Result<(), Error<ErrorType>> {
        self.bus
            .write_register(Register::Backlight, Some(level))
            .await
    }

    /// Writes a backlight level given as a wider integer.
    ///
    /// Fails with [`Error::OutOfRange`] outside `0..=255`.
    pub async fn set_backlight_level(&mut self, level: i32) -> Result<(), Error<ErrorType>> {
        let level = u8::try_from(level).map_err(|_| Error::<ErrorType>::OutOfRange)?;
        self.set_backlight(level).await
    }

    /// Reads the secondary backlight level.
    pub async fn secondary_backlight(&mut self) -> Result<u8, Error<ErrorType>> {
        self.bus.read_register(Register::Backlight2).await
    }

    /// Writes the secondary backlight level.
    pub async fn set_secondary_backlight(&mut self, level: u8) -> Result<(), Error<ErrorType>> {
        self.bus
            .write_register(Register::Backlight2, Some(level))
            .await
    }

    /// Pause between two fade steps.
    pub fn fade_step(&self) -> Duration {
        self.fade_step
    }

    pub fn set_fade_step(&mut self, step: Duration) {
        self.fade_step = step;
    }

    /// Fades the backlight off.
    pub async fn fade_down(&mut self) -> Result<(), Error<ErrorType>> {
        self.fade_to(0).await
    }

    /// Fades the backlight to full brightness.
    pub async fn fade_up(&mut self) -> Result<(), Error<ErrorType>> {
        self.fade_to(u8::MAX).await
    }

    /// Fades the backlight to `target`, one level per step.
    ///
    /// Each step waits [`fade_step`](Self::fade_step) and then writes the
    /// register, so a fade over `n` levels takes `n` writes. Nothing is
    /// written if the backlight already is at `target`.
    pub async fn fade_to(&mut self, target: u8) -> Result<(), Error<ErrorType>> {
        let mut level = self.backlight().await?;
        if level == target {
            return Ok(());
        }
        log::debug!("kbd: fading backlight {level} -> {target}");

        while level != target {
            level = if level < target { level + 1 } else { level - 1 };
            self.bus.pause(self.fade_step).await;
            self.set_backlight(level).await?;
        }
        Ok(())
    }
}
