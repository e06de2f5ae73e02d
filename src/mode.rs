//! Typed builders for the MDR0 and MDR1 mode registers.
//!
//! [`Ls7366r::configure`](crate::Ls7366r::configure) takes raw settings
//! bytes; these builders assemble the same bytes from named fields so a
//! mode can be read at a glance:
//!
//! ```
//! use ls7366r_counter::{Mdr0, Mdr1, Quadrature, RegisterWidth};
//!
//! let mdr0 = Mdr0::new().quadrature(Quadrature::X4);
//! let mdr1 = Mdr1::new().width(RegisterWidth::Width2);
//! assert_eq!(mdr0.bits(), 0x03);
//! assert_eq!(mdr1.bits(), 0x02);
//! ```

use crate::registers::*;
use crate::width::RegisterWidth;

/// Count mode (MDR0 bits 0–1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Quadrature {
    /// A = clock, B = direction.
    NonQuadrature,
    X1,
    X2,
    #[default]
    X4,
}

/// Count range behaviour (MDR0 bits 2–3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CountType {
    #[default]
    FreeRun,
    SingleCycle,
    RangeLimit,
    ModuloN,
}

/// Action taken on the index input (MDR0 bits 4–5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndexMode {
    #[default]
    Disabled,
    LoadCounter,
    ResetCounter,
    LoadOutput,
}

/// Index polarity (MDR0 bit 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndexPolarity {
    #[default]
    Negative,
    Positive,
}

/// Filter clock division factor (MDR0 bit 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FilterDivision {
    #[default]
    Div1,
    Div2,
}

/// MDR0 settings.
///
/// The default is the power-on configuration used by
/// [`Ls7366r::default_configuration`](crate::Ls7366r::default_configuration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mdr0 {
    pub quadrature: Quadrature,
    pub count_type: CountType,
    pub index: IndexMode,
    pub index_polarity: IndexPolarity,
    pub filter: FilterDivision,
}

impl Mdr0 {
    pub const fn new() -> Self {
        Self {
            quadrature: Quadrature::X4,
            count_type: CountType::FreeRun,
            index: IndexMode::Disabled,
            index_polarity: IndexPolarity::Negative,
            filter: FilterDivision::Div1,
        }
    }

    #[must_use]
    pub const fn quadrature(mut self, quadrature: Quadrature) -> Self {
        self.quadrature = quadrature;
        self
    }

    #[must_use]
    pub const fn count_type(mut self, count_type: CountType) -> Self {
        self.count_type = count_type;
        self
    }

    #[must_use]
    pub const fn index(mut self, index: IndexMode, polarity: IndexPolarity) -> Self {
        self.index = index;
        self.index_polarity = polarity;
        self
    }

    #[must_use]
    pub const fn filter(mut self, filter: FilterDivision) -> Self {
        self.filter = filter;
        self
    }

    /// Raw MDR0 byte.
    pub const fn bits(self) -> u8 {
        let quadrature = match self.quadrature {
            Quadrature::NonQuadrature => MDR0_NON_QUAD,
            Quadrature::X1 => MDR0_1X_QUAD,
            Quadrature::X2 => MDR0_2X_QUAD,
            Quadrature::X4 => MDR0_4X_QUAD,
        };
        let count_type = match self.count_type {
            CountType::FreeRun => MDR0_FREE_RUN,
            CountType::SingleCycle => MDR0_SINGLE_COUNT,
            CountType::RangeLimit => MDR0_RANGE_LIMIT,
            CountType::ModuloN => MDR0_MODULO_N,
        };
        let index = match self.index {
            IndexMode::Disabled => MDR0_INDEX_DISABLED,
            IndexMode::LoadCounter => MDR0_INDEX_LOAD_CNTR,
            IndexMode::ResetCounter => MDR0_INDEX_RESET_CNTR,
            IndexMode::LoadOutput => MDR0_INDEX_LOAD_OTR,
        };
        let polarity = match self.index_polarity {
            IndexPolarity::Negative => MDR0_INDEX_NEG,
            IndexPolarity::Positive => MDR0_INDEX_POS,
        };
        let filter = match self.filter {
            FilterDivision::Div1 => MDR0_FILTER_CLOCK_DIV1,
            FilterDivision::Div2 => MDR0_FILTER_CLOCK_DIV2,
        };
        quadrature | count_type | index | polarity | filter
    }
}

/// Flags routed to the DFLAG output (MDR1 bits 4–7).
///
/// Combine with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Flags(u8);

impl Flags {
    pub const NONE: Flags = Flags(MDR1_FLAG_DISABLE);
    pub const INDEX: Flags = Flags(MDR1_FLAG_IDX);
    pub const COMPARE: Flags = Flags(MDR1_FLAG_CMP);
    pub const BORROW: Flags = Flags(MDR1_FLAG_BW);
    pub const CARRY: Flags = Flags(MDR1_FLAG_CY);

    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl core::ops::BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

/// MDR1 settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mdr1 {
    pub width: RegisterWidth,
    pub counting_enabled: bool,
    pub flags: Flags,
}

impl Default for Mdr1 {
    fn default() -> Self {
        Self::new()
    }
}

impl Mdr1 {
    /// 32-bit registers, counting enabled, no flags.
    pub const fn new() -> Self {
        Self {
            width: RegisterWidth::Width4,
            counting_enabled: true,
            flags: Flags::NONE,
        }
    }

    #[must_use]
    pub const fn width(mut self, width: RegisterWidth) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub const fn counting_enabled(mut self, enabled: bool) -> Self {
        self.counting_enabled = enabled;
        self
    }

    #[must_use]
    pub const fn flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    /// Raw MDR1 byte.
    pub const fn bits(self) -> u8 {
        let enable = if self.counting_enabled {
            MDR1_ENABLE
        } else {
            MDR1_DISABLE
        };
        self.width.mdr1_bits() | enable | self.flags.bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_power_on_constants() {
        assert_eq!(Mdr0::default().bits(), DEFAULT_MDR0);
        assert_eq!(Mdr1::default().bits(), DEFAULT_MDR1);
        assert_eq!(Mdr0::new(), Mdr0::default());
    }

    #[test]
    fn mdr0_fields_combine() {
        let mdr0 = Mdr0::new()
            .quadrature(Quadrature::X2)
            .count_type(CountType::ModuloN)
            .index(IndexMode::ResetCounter, IndexPolarity::Positive)
            .filter(FilterDivision::Div2);
        assert_eq!(mdr0.bits(), 0x02 | 0x0C | 0x20 | 0x40 | 0x80);
    }

    #[test]
    fn mdr1_fields_combine() {
        let mdr1 = Mdr1::new()
            .width(RegisterWidth::Width1)
            .counting_enabled(false)
            .flags(Flags::CARRY | Flags::BORROW);
        assert_eq!(mdr1.bits(), 0x03 | 0x04 | 0x80 | 0x40);
        assert_eq!(RegisterWidth::from_mdr1(mdr1.bits()), RegisterWidth::Width1);
    }
}
