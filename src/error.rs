//! Error types for the counter driver.

use core::fmt;

/// Errors that can occur when talking to the LS7366R.
///
/// `B` is the bus error type and `P` the chip-select pin error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterError<B, P> {
    /// Underlying SPI bus error.
    Bus(B),

    /// The chip-select line could not be driven.
    ChipSelect(P),

    /// A transfer was requested without a write or read buffer.
    InvalidBuffer,
}

impl<B: fmt::Debug, P: fmt::Debug> fmt::Display for CounterError<B, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CounterError::Bus(e) => write!(f, "SPI error: {:?}", e),
            CounterError::ChipSelect(e) => write!(f, "Chip select error: {:?}", e),
            CounterError::InvalidBuffer => write!(f, "Missing transfer buffer"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<B: defmt::Format, P: defmt::Format> defmt::Format for CounterError<B, P> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            CounterError::Bus(e) => defmt::write!(f, "SPI error: {}", e),
            CounterError::ChipSelect(e) => defmt::write!(f, "Chip select error: {}", e),
            CounterError::InvalidBuffer => defmt::write!(f, "Missing transfer buffer"),
        }
    }
}
