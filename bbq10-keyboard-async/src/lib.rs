//! An asynchronous, `no_std` driver for the BlackBerry Q10 keyboard module.
//!
//! This driver provides a `KeyboardController` to talk to the BBQ10 keyboard
//! firmware over I2C. It resets the device, drains key events from its FIFO
//! on interrupt, reports status and firmware version, and drives the
//! backlight with paced fades.
//!
//! # Usage
//!
//! To use this driver, you need an I2C peripheral implementation that satisfies the
//! `embedded-hal-async::i2c::I2c` trait, a delay provider implementing
//! `embedded-hal-async::delay::DelayNs` and, optionally, an input pin wired to the
//! keyboard's interrupt line implementing [`interrupt::InterruptLine`]. With the
//! `esp-hal` feature, `esp_hal::gpio::Input` implements it.
//!
//! ```ignore
//! use bbq10_keyboard_async::conf::Config;
//! use bbq10_keyboard_async::keyboard::KeyboardController;
//!
//! #[esp_hal_embassy::main]
//! async fn main(spawner: Spawner) {
//!     let peripherals = esp_hal::init(esp_hal::Config::default());
//!     let kbd_int = Input::new(peripherals.GPIO15, InputConfig::default());
//!     let config = esp_hal::i2c::master::Config::default().with_frequency(Rate::from_khz(100));
//!     let i2c = I2c::new(peripherals.I2C0, config)
//!         .unwrap()
//!         .with_sda(peripherals.GPIO13)
//!         .with_scl(peripherals.GPIO14)
//!         .into_async();
//!
//!     let mut keyboard: KeyboardController<_, _, Input<'static>> =
//!         KeyboardController::new(i2c, embassy_time::Delay, Config::default());
//!     keyboard.init(Some(kbd_int)).await.unwrap();
//!
//!     loop {
//!         keyboard.wait_for_interrupt().await.unwrap();
//!         log::info!("typed so far: {}", keyboard.input_buffer());
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]

pub mod conf;
pub mod err;
pub mod interrupt;
pub mod key;
pub mod keyboard;
pub mod reg;
pub mod status;
pub mod transport;

#[cfg(test)]
mod mock;

pub use err::Error;
pub use keyboard::KeyboardController;
