#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those     holding buffers for the duration of a data transfer."
)]

use bbq10_keyboard_async::conf::Config;
use bbq10_keyboard_async::keyboard::KeyboardController;
use bbq10_keyboard_async::key::KeyState;
use embassy_executor::Spawner;
use embassy_time::{Delay, Duration, Timer};
use esp_hal::i2c::master::I2c;
use esp_hal::{
    clock::CpuClock,
    gpio::{Input, InputConfig, Level, Output, OutputConfig},
    time::Rate,
    timer::systimer::SystemTimer,
};
use esp_println::println;
use log::{info, warn};
use static_cell::StaticCell;

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    println!("{}", info);
    loop {}
}

extern crate alloc;

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

type Keyboard = KeyboardController<I2c<'static, esp_hal::Async>, Delay, Input<'static>>;

static SHARED_RST: StaticCell<Output<'static>> = StaticCell::new();

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    esp_println::logger::init_logger(log::LevelFilter::Debug);

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 64 * 1024);

    let timer0 = SystemTimer::new(peripherals.SYSTIMER);
    esp_hal_embassy::init(timer0.alarm0);

    // The keyboard shares its power rail enable with the other peripherals.
    let _shared_rst = SHARED_RST.init(Output::new(
        peripherals.GPIO45,
        Level::High,
        OutputConfig::default(),
    ));

    let keyboard_int = Input::new(peripherals.GPIO15, InputConfig::default());
    let i2c_config = esp_hal::i2c::master::Config::default().with_frequency(Rate::from_khz(100));
    let keyboard_i2c = match I2c::new(peripherals.I2C0, i2c_config) {
        Ok(i2c) => i2c
            .with_sda(peripherals.GPIO13)
            .with_scl(peripherals.GPIO14)
            .into_async(),
        Err(err) => panic!("I2C setup failed: {err:?}"),
    };

    let mut keyboard: Keyboard = KeyboardController::new(keyboard_i2c, Delay, Config::default());
    match keyboard.init(Some(keyboard_int)).await {
        Ok(()) => info!("Keyboard initialized."),
        Err(err) => warn!("Error initializing keyboard: {err:?}"),
    }
    match keyboard.firmware_version().await {
        Ok(version) => info!("Keyboard firmware {version}"),
        Err(err) => warn!("Could not read firmware version: {err:?}"),
    }

    if let Err(err) = spawner.spawn(read_keys(keyboard)) {
        warn!("Could not spawn key task: {err:?}");
    }

    loop {
        Timer::after(Duration::from_secs(1)).await;
    }
}

/// Logs typed text on every interrupt. Enter dims the backlight, backspace restores it.
#[embassy_executor::task]
async fn read_keys(mut keyboard: Keyboard) {
    loop {
        if let Err(err) = keyboard.wait_for_interrupt().await {
            warn!("Interrupt wait failed: {err:?}");
            Timer::after(Duration::from_millis(100)).await;
            continue;
        }

        match keyboard.last_interrupt().await {
            Ok(status) if status.overflowed_fifo() => {
                warn!("Keyboard FIFO overflowed, keys were lost");
            }
            Ok(_) => {}
            Err(err) => warn!("Could not acknowledge interrupt: {err:?}"),
        }

        let typed = keyboard.input_buffer();
        if typed.is_empty() {
            continue;
        }
        info!("Typed: {typed}");

        let log = keyboard.take_key_log();
        for event in log.events().iter().filter(|e| e.state == KeyState::Pressed) {
            let faded = match event.key {
                '\n' => keyboard.fade_to(32).await,
                '\x08' => keyboard.fade_up().await,
                _ => Ok(()),
            };
            if let Err(err) = faded {
                warn!("Backlight fade failed: {err:?}");
            }
        }
    }
}
