//! Register width handling and big-endian value assembly.

use crate::registers::MDR1_WIDTH_MASK;

/// Number of bytes moved for each DTR, CNTR and OTR transfer.
///
/// Selected by bits 0–1 of MDR1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterWidth {
    Width1,
    Width2,
    Width3,
    Width4,
}

impl RegisterWidth {
    /// Width encoded in an MDR1 settings byte (`0→4, 1→3, 2→2, 3→1`).
    pub const fn from_mdr1(mdr1: u8) -> Self {
        match mdr1 & MDR1_WIDTH_MASK {
            0 => RegisterWidth::Width4,
            1 => RegisterWidth::Width3,
            2 => RegisterWidth::Width2,
            _ => RegisterWidth::Width1,
        }
    }

    /// The MDR1 width bits that select this width.
    pub const fn mdr1_bits(self) -> u8 {
        match self {
            RegisterWidth::Width4 => 0,
            RegisterWidth::Width3 => 1,
            RegisterWidth::Width2 => 2,
            RegisterWidth::Width1 => 3,
        }
    }

    /// Byte count of one register transfer.
    pub const fn bytes(self) -> usize {
        match self {
            RegisterWidth::Width1 => 1,
            RegisterWidth::Width2 => 2,
            RegisterWidth::Width3 => 3,
            RegisterWidth::Width4 => 4,
        }
    }
}

/// Payload length for an optional width; zero before the first `configure`.
pub(crate) fn payload_len(width: Option<RegisterWidth>) -> usize {
    width.map_or(0, RegisterWidth::bytes)
}

/// Assemble bytes most-significant first.
///
/// Fewer than four bytes leave the high-order bytes zero; an empty slice
/// yields zero.
pub fn assemble_be(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

/// Split `value` into the low `width` bytes, most-significant first.
///
/// The returned array holds the payload in its leading `width.bytes()`
/// positions, ready to be sliced by the caller.
pub fn disassemble_be(value: u32, width: RegisterWidth) -> [u8; 4] {
    let be = value.to_be_bytes();
    let n = width.bytes();
    let mut out = [0u8; 4];
    out[..n].copy_from_slice(&be[4 - n..]);
    out
}
