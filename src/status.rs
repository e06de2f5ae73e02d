//! Decoded view of the 8-bit STR status register.

use crate::registers::*;

/// Snapshot of the STR register.
///
/// The latched bits (`index`, `compare`, `borrow`, `carry`, `power_loss`)
/// stay set until [`Ls7366r::clear_status`](crate::Ls7366r::clear_status)
/// is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status(u8);

impl Status {
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Counter sign (set when the count is negative).
    pub const fn negative(self) -> bool {
        self.0 & STR_SIGN != 0
    }

    /// Direction of the most recent count: `true` for up.
    pub const fn counting_up(self) -> bool {
        self.0 & STR_UP != 0
    }

    /// Power loss latch, set on power-up.
    pub const fn power_loss(self) -> bool {
        self.0 & STR_POWER_LOSS != 0
    }

    pub const fn count_enabled(self) -> bool {
        self.0 & STR_COUNT_ENABLED != 0
    }

    pub const fn index(self) -> bool {
        self.0 & STR_INDEX != 0
    }

    /// CNTR == DTR latch.
    pub const fn compare(self) -> bool {
        self.0 & STR_COMPARE != 0
    }

    /// Underflow latch.
    pub const fn borrow(self) -> bool {
        self.0 & STR_BORROW != 0
    }

    /// Overflow latch.
    pub const fn carry(self) -> bool {
        self.0 & STR_CARRY != 0
    }
}

impl From<u8> for Status {
    fn from(bits: u8) -> Self {
        Self::from_bits(bits)
    }
}
