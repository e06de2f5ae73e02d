//! LS7366R command and register constants.
//!
//! Every instruction byte is the bitwise OR of an action (bits 7–6) and a
//! register selector (bits 5–3): `CMD_RD | REG_STR == 0x70`.

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Clear the selected register.
pub const CMD_CLR: u8 = 0x00;

/// Read the selected register.
pub const CMD_RD: u8 = 0x40;

/// Write the selected register.
pub const CMD_WR: u8 = 0x80;

/// Load the selected register (DTR→CNTR or CNTR→OTR).
pub const CMD_LOAD: u8 = 0xC0;

// ---------------------------------------------------------------------------
// Register selectors
// ---------------------------------------------------------------------------

/// Mode register 0.
pub const REG_MDR0: u8 = 0x08;

/// Mode register 1.
pub const REG_MDR1: u8 = 0x10;

/// Data (preset) register.
pub const REG_DTR: u8 = 0x18;

/// Up/down counter.
pub const REG_CNTR: u8 = 0x20;

/// Output (snapshot) register.
pub const REG_OTR: u8 = 0x28;

/// Status register.
pub const REG_STR: u8 = 0x30;

// ---------------------------------------------------------------------------
// MDR0 fields
// ---------------------------------------------------------------------------

pub const MDR0_NON_QUAD: u8 = 0x00;
pub const MDR0_1X_QUAD: u8 = 0x01;
pub const MDR0_2X_QUAD: u8 = 0x02;
pub const MDR0_4X_QUAD: u8 = 0x03;

pub const MDR0_FREE_RUN: u8 = 0x00;
pub const MDR0_SINGLE_COUNT: u8 = 0x04;
pub const MDR0_RANGE_LIMIT: u8 = 0x08;
pub const MDR0_MODULO_N: u8 = 0x0C;

pub const MDR0_INDEX_DISABLED: u8 = 0x00;
pub const MDR0_INDEX_LOAD_CNTR: u8 = 0x10;
pub const MDR0_INDEX_RESET_CNTR: u8 = 0x20;
pub const MDR0_INDEX_LOAD_OTR: u8 = 0x30;

pub const MDR0_INDEX_NEG: u8 = 0x00;
pub const MDR0_INDEX_POS: u8 = 0x40;

pub const MDR0_FILTER_CLOCK_DIV1: u8 = 0x00;
pub const MDR0_FILTER_CLOCK_DIV2: u8 = 0x80;

// ---------------------------------------------------------------------------
// MDR1 fields
// ---------------------------------------------------------------------------

pub const MDR1_MODE_32: u8 = 0x00;
pub const MDR1_MODE_24: u8 = 0x01;
pub const MDR1_MODE_16: u8 = 0x02;
pub const MDR1_MODE_8: u8 = 0x03;

/// Mask selecting the register width bits of MDR1.
pub const MDR1_WIDTH_MASK: u8 = 0x03;

pub const MDR1_ENABLE: u8 = 0x00;
/// Setting this bit halts counting; see [`Ls7366r::disable`](crate::Ls7366r::disable).
pub const MDR1_DISABLE: u8 = 0x04;

pub const MDR1_FLAG_DISABLE: u8 = 0x00;
pub const MDR1_FLAG_IDX: u8 = 0x10;
pub const MDR1_FLAG_CMP: u8 = 0x20;
pub const MDR1_FLAG_BW: u8 = 0x40;
pub const MDR1_FLAG_CY: u8 = 0x80;

// ---------------------------------------------------------------------------
// STR bits
// ---------------------------------------------------------------------------

pub const STR_SIGN: u8 = 0x01;
pub const STR_UP: u8 = 0x02;
pub const STR_POWER_LOSS: u8 = 0x04;
pub const STR_COUNT_ENABLED: u8 = 0x08;
pub const STR_INDEX: u8 = 0x10;
pub const STR_COMPARE: u8 = 0x20;
pub const STR_BORROW: u8 = 0x40;
pub const STR_CARRY: u8 = 0x80;

// ---------------------------------------------------------------------------
// Power-on defaults
// ---------------------------------------------------------------------------

/// MDR0 used by `default_configuration`: 4× quadrature, free-run, no index,
/// filter clock divided by one.
pub const DEFAULT_MDR0: u8 =
    MDR0_4X_QUAD | MDR0_FREE_RUN | MDR0_INDEX_DISABLED | MDR0_FILTER_CLOCK_DIV1;

/// MDR1 used by `default_configuration`: 32-bit registers, counting
/// enabled, no flags on the DFLAG pin.
pub const DEFAULT_MDR1: u8 = MDR1_MODE_32 | MDR1_ENABLE | MDR1_FLAG_DISABLE;

/// Maximum SPI clock used for every transaction.
pub const DEFAULT_FREQUENCY_HZ: u32 = 100_000;
