//! Simple counter example
//!
//! Demonstrates basic usage of the ls7366r-counter crate on the Raspberry Pi
//! Pico 2. Brings the LS7366R up in its default configuration, then polls
//! the count and status register every 100 ms and logs them via defmt.
//!
//! # Wiring
//!
//! | Signal    | Pico 2 Pin | Notes                        |
//! |-----------|------------|------------------------------|
//! | SPI0 SCK  | GP18       |                              |
//! | SPI0 MOSI | GP19       |                              |
//! | SPI0 MISO | GP16       |                              |
//! | LS7366 SS | GP17       | Active-low, driven by driver |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp as hal;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::spi::{self, Spi};
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use ls7366r_counter::{HalBus, Ls7366r, SpiSettings};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = hal::block::ImageDef::secure_exe();

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    // embedded-hal buses cannot be reconfigured per transaction, so match
    // the driver's settings up front (100 kHz, mode 0).
    let settings = SpiSettings::default();
    let mut config = spi::Config::default();
    config.frequency = settings.frequency_hz();

    // --- SPI bus (GP18 = SCK, GP19 = MOSI, GP16 = MISO) ---
    let spi = Spi::new_blocking(p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, config);

    // --- Chip select (GP17, idle high) ---
    let cs = Output::new(p.PIN_17, Level::High);

    // --- Counter ---
    let mut counter = Ls7366r::with_settings(HalBus::new(spi), cs, settings);

    if let Err(e) = counter.begin() {
        error!("Bus claim failed: {}", Debug2Format(&e));
    }

    counter
        .default_configuration()
        .expect("Failed to configure LS7366R");

    info!("Counter example started — turn the encoder to see the count change");

    // Main loop: latch, read, log, repeat.
    loop {
        match counter.snapshot() {
            Ok(count) => match counter.read_status_flags() {
                Ok(status) => info!("Count: {} status: {}", count, status),
                Err(e) => error!("Status read failed: {}", Debug2Format(&e)),
            },
            Err(e) => error!("Count read failed: {}", Debug2Format(&e)),
        }

        Timer::after(Duration::from_millis(100)).await;
    }
}
