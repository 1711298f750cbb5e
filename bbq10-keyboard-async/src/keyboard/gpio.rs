//! Configuration register and the GPIO expander pin group.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use super::KeyboardController;
use crate::err::Error;
use crate::interrupt::{InterruptLine, Pull};
use crate::reg::{PinRegister, Register};
use crate::status::{ConfigFlags, Version};

/// Highest pin index of the expander.
const MAX_PIN: u8 = 7;

/// Direction of an expander pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioDirection {
    Input,
    Output,
}

impl<I2cType, D, P, ErrorType, const N: usize> KeyboardController<I2cType, D, P, N>
where
    I2cType: I2c<SevenBitAddress, Error = ErrorType>,
    ErrorType: embedded_hal_async::i2c::Error,
    D: DelayNs,
    P: InterruptLine,
{
    /// Reads the configuration register.
    pub async fn config(&mut self) -> Result<ConfigFlags, Error<ErrorType>> {
        let byte = self.bus.read_register(Register::Config).await?;
        Ok(ConfigFlags::from(byte))
    }

    /// Writes the configuration register.
    pub async fn set_config(&mut self, flags: ConfigFlags) -> Result<(), Error<ErrorType>> {
        self.bus
            .write_register(Register::Config, Some(flags.into()))
            .await
    }

    /// Reads a pin group register.
    pub async fn read_pin_register(&mut self, reg: PinRegister) -> Result<u8, Error<ErrorType>> {
        self.require_pin_group().await?;
        self.bus.read_register(reg).await
    }

    /// Writes a pin group register.
    pub async fn write_pin_register(
        &mut self,
        reg: PinRegister,
        value: u8,
    ) -> Result<(), Error<ErrorType>> {
        self.require_pin_group().await?;
        self.bus.write_register(reg, Some(value)).await
    }

    pub async fn set_gpio_direction(
        &mut self,
        pin: u8,
        direction: GpioDirection,
    ) -> Result<(), Error<ErrorType>> {
        self.update_pin_bit(PinRegister::Direction, pin, direction == GpioDirection::Input)
            .await
    }

    /// Sets the pull resistor of an expander pin.
    pub async fn set_gpio_pull(&mut self, pin: u8, pull: Pull) -> Result<(), Error<ErrorType>> {
        match pull {
            Pull::None => {
                self.update_pin_bit(PinRegister::PullEnable, pin, false)
                    .await
            }
            Pull::Up | Pull::Down => {
                self.update_pin_bit(PinRegister::PullUpDown, pin, pull == Pull::Up)
                    .await?;
                self.update_pin_bit(PinRegister::PullEnable, pin, true)
                    .await
            }
        }
    }

    /// Levels of all expander pins, one bit per pin.
    pub async fn gpio_values(&mut self) -> Result<u8, Error<ErrorType>> {
        self.read_pin_register(PinRegister::Values).await
    }

    pub async fn gpio_value(&mut self, pin: u8) -> Result<bool, Error<ErrorType>> {
        let mask = pin_mask::<ErrorType>(pin)?;
        Ok(self.gpio_values().await? & mask != 0)
    }

    /// Drives an output pin.
    pub async fn set_gpio_value(&mut self, pin: u8, high: bool) -> Result<(), Error<ErrorType>> {
        self.update_pin_bit(PinRegister::Values, pin, high).await
    }

    /// Enables or disables the pin change interrupt of an expander pin.
    pub async fn set_gpio_interrupt(
        &mut self,
        pin: u8,
        enabled: bool,
    ) -> Result<(), Error<ErrorType>> {
        self.update_pin_bit(PinRegister::InterruptConfig, pin, enabled)
            .await
    }

    /// Pins that raised a change interrupt, one bit per pin.
    pub async fn gpio_interrupt_state(&mut self) -> Result<u8, Error<ErrorType>> {
        self.read_pin_register(PinRegister::InterruptState).await
    }

    async fn update_pin_bit(
        &mut self,
        reg: PinRegister,
        pin: u8,
        set: bool,
    ) -> Result<(), Error<ErrorType>> {
        let mask = pin_mask::<ErrorType>(pin)?;
        let current = self.read_pin_register(reg).await?;
        let value = if set { current | mask } else { current & !mask };
        self.bus.write_register(reg, Some(value)).await
    }

    /// Checks, once per reset, that the firmware has the pin group.
    async fn require_pin_group(&mut self) -> Result<(), Error<ErrorType>> {
        let version = match self.firmware {
            Some(version) => version,
            None => {
                let version = self.firmware_version().await?;
                log::debug!("kbd: firmware {version}");
                self.firmware = Some(version);
                version
            }
        };
        if version < Version::PIN_GROUP {
            return Err(Error::Unsupported(version));
        }
        Ok(())
    }
}

fn pin_mask<E>(pin: u8) -> Result<u8, Error<E>> {
    if pin > MAX_PIN {
        return Err(Error::OutOfRange);
    }
    Ok(1 << pin)
}
