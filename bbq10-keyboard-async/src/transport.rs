//! Register transactions over I2C.

use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::err::Error;
use crate::reg::WRITE_MASK;

/// Pause the device needs before every bus transfer.
pub const SETTLE_DELAY: Duration = Duration::from_millis(10);

/// Issues register reads and writes against a single device.
///
/// All transfers go through one 2-byte buffer. Byte 0 carries the register
/// address on the way out and the primary response byte on the way back,
/// byte 1 carries a write value or the second response byte.
pub struct RegisterBus<I2cType, D> {
    i2c: I2cType,
    delay: D,
    address: SevenBitAddress,
    buf: [u8; 2],
}

impl<I2cType, D, ErrorType> RegisterBus<I2cType, D>
where
    I2cType: I2c<SevenBitAddress, Error = ErrorType>,
    ErrorType: embedded_hal_async::i2c::Error,
    D: DelayNs,
{
    /// Creates a new `RegisterBus` for the device at `address`.
    pub fn new(i2c: I2cType, delay: D, address: SevenBitAddress) -> Self {
        Self {
            i2c,
            delay,
            address,
            buf: [0; 2],
        }
    }

    /// The device address.
    pub fn address(&self) -> SevenBitAddress {
        self.address
    }

    /// Writes a register. Without a value only the address byte is sent.
    pub async fn write_register(
        &mut self,
        reg: impl Into<u8>,
        value: Option<u8>,
    ) -> Result<(), Error<ErrorType>> {
        let reg = reg.into();
        match value {
            Some(value) => {
                self.buf[0] = reg | WRITE_MASK;
                self.buf[1] = value;
                log::trace!("kbd: write reg {reg:#04x} = {value:#04x}");
                self.write_buf(2).await
            }
            None => {
                self.buf[0] = reg;
                log::trace!("kbd: write reg {reg:#04x}");
                self.write_buf(1).await
            }
        }
    }

    /// Reads a single byte register.
    pub async fn read_register(&mut self, reg: impl Into<u8>) -> Result<u8, Error<ErrorType>> {
        let reg = reg.into();
        self.buf[0] = reg;
        self.write_buf(1).await?;
        self.read_buf(1).await?;
        log::trace!("kbd: read reg {reg:#04x} -> {:#04x}", self.buf[0]);
        Ok(self.buf[0])
    }

    /// Reads two response bytes from a register, as the FIFO needs.
    pub async fn read_register_pair(
        &mut self,
        reg: impl Into<u8>,
    ) -> Result<[u8; 2], Error<ErrorType>> {
        let reg = reg.into();
        self.buf[0] = reg;
        self.write_buf(1).await?;
        self.read_buf(2).await?;
        log::trace!("kbd: read reg {reg:#04x} -> {:02x?}", self.buf);
        Ok(self.buf)
    }

    /// Blocks for `duration` on the bus delay provider.
    ///
    /// Durations beyond `u32::MAX` microseconds are waited out in chunks.
    pub async fn pause(&mut self, duration: Duration) {
        let mut remaining = duration.as_micros();
        while remaining > 0 {
            let chunk = u32::try_from(remaining).unwrap_or(u32::MAX);
            self.delay.delay_us(chunk).await;
            remaining -= u64::from(chunk);
        }
    }

    /// Gives back the I2C peripheral and the delay provider.
    pub fn release(self) -> (I2cType, D) {
        (self.i2c, self.delay)
    }

    async fn write_buf(&mut self, len: usize) -> Result<(), Error<ErrorType>> {
        self.pause(SETTLE_DELAY).await;
        self.i2c
            .write(self.address, &self.buf[..len])
            .await
            .map_err(|err| {
                log::warn!("Error writing to keyboard at {:#04x}: {err:?}", self.address);
                Error::Transport(err)
            })
    }

    async fn read_buf(&mut self, len: usize) -> Result<(), Error<ErrorType>> {
        self.pause(SETTLE_DELAY).await;
        self.buf = [0; 2];
        self.i2c
            .read(self.address, &mut self.buf[..len])
            .await
            .map_err(|err| {
                log::warn!("Error reading from keyboard at {:#04x}: {err:?}", self.address);
                Error::Transport(err)
            })
    }
}
