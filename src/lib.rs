//! Driver for the LS7366R 32-bit quadrature counter.
//!
//! The LS7366R counts quadrature (or clock/direction) pulses from an
//! incremental encoder and exposes its registers over SPI. Every access is
//! an instruction byte (`action | register`) optionally followed by a 1–4
//! byte payload, framed by the chip-select line.
//!
//! # Architecture
//!
//! The crate is split into two layers:
//!
//! - **`driver`** (crate-private) — framed SPI primitives: chip select,
//!   per-transaction bus settings, byte shifting.
//! - **[`Ls7366r`]** (public) — register operations, mode configuration and
//!   register-width tracking.
//!
//! The bus is abstracted by [`CounterBus`]; wrap any `embedded-hal`
//! [`SpiBus`](embedded_hal::spi::SpiBus) in [`HalBus`]. Chip select is any
//! [`OutputPin`](embedded_hal::digital::OutputPin), or [`BusChipSelect`]
//! when the SPI peripheral drives its own CS line.
//!
//! # Quick start
//!
//! ```no_run
//! use ls7366r_counter::{HalBus, Ls7366r, Mdr0, Mdr1, RegisterWidth};
//!
//! # fn example<SPI, CS>(spi: SPI, cs: CS) -> Result<(), ls7366r_counter::Error<HalBus<SPI>, CS>>
//! # where SPI: embedded_hal::spi::SpiBus, CS: embedded_hal::digital::OutputPin {
//! let mut counter = Ls7366r::new(HalBus::new(spi), cs);
//! counter.begin()?;
//! counter.configure_modes(Mdr0::new(), Mdr1::new().width(RegisterWidth::Width2))?;
//! counter.set_counter(0)?;
//!
//! let ticks = counter.read_counter()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **`defmt`** — [`defmt::Format`] implementations on public types and
//!   debug/warn logging.
//! - **`async`** — [`asynch::Ls7366rAsync`] over `embedded-hal-async`.

#![no_std]

#[cfg(feature = "async")]
pub mod asynch;
pub mod bus;
mod counter;
mod driver;
pub mod error;
pub mod mode;
pub mod registers;
pub mod status;
pub mod width;

#[cfg(test)]
mod fake;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use bus::{BitOrder, BusChipSelect, CounterBus, HalBus, SpiSettings};
pub use counter::{Error, Ls7366r};
pub use error::CounterError;
pub use mode::{CountType, FilterDivision, Flags, IndexMode, IndexPolarity, Mdr0, Mdr1, Quadrature};
pub use status::Status;
pub use width::RegisterWidth;
