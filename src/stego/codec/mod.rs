// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! One-bit-per-unit embedding rules.
//!
//! A unit represents bit 1 iff the XOR of the least-significant bits of its
//! four bytes is 1. Payload bytes are written most-significant bit first,
//! one bit per unit visited by the overlay.
//!
//! - [`ParityCodec`]: flips a unit by nudging one channel by ±1.
//! - [`PaletteCodec`]: flips a unit by switching to a similar palette color
//!   of opposite parity.

mod palette;
mod parity;

pub use palette::PaletteCodec;
pub use parity::ParityCodec;

use crate::stego::error::{Result, StegoError};

/// Bit-level encode/decode over an overlay.
pub trait BitCodec {
    /// Units left for embedding or extraction.
    fn available(&self) -> usize;

    /// Write `payload` one bit per unit.
    ///
    /// # Errors
    /// [`StegoError::CapacityExceeded`] before touching the carrier if
    /// `payload.len() * 8 > self.available()`.
    fn encode(&mut self, payload: &[u8]) -> Result<()>;

    /// Read `length` bytes.
    ///
    /// # Errors
    /// [`StegoError::ExhaustedCarrier`] if fewer than `length * 8` units remain.
    fn decode(&mut self, length: usize) -> Result<Vec<u8>>;
}

/// Bit represented by a unit.
#[inline]
pub fn unit_parity(unit: u32) -> bool {
    (unit ^ unit >> 8 ^ unit >> 16 ^ unit >> 24) & 1 == 1
}

/// Bits of a byte, most significant first.
pub fn byte_bits(byte: u8) -> impl Iterator<Item = bool> {
    (0..8).rev().map(move |i| (byte >> i) & 1 == 1)
}

/// Pack up to 8 bits, most significant first.
pub fn bits_to_byte(bits: impl IntoIterator<Item = bool>) -> u8 {
    bits.into_iter().fold(0u8, |acc, bit| acc << 1 | bit as u8)
}

/// Units needed for `bytes` payload bytes.
pub(crate) fn bits_needed(bytes: usize) -> usize {
    bytes.saturating_mul(8)
}

/// Fail before any mutation when the payload cannot fit.
pub(crate) fn check_capacity(payload_len: usize, available: usize) -> Result<()> {
    let needed = bits_needed(payload_len);
    if needed > available {
        return Err(StegoError::CapacityExceeded { needed, available });
    }
    Ok(())
}

/// Fail before reading when fewer units remain than the request needs.
pub(crate) fn check_remaining(length: usize, available: usize) -> Result<()> {
    if bits_needed(length) > available {
        return Err(StegoError::ExhaustedCarrier);
    }
    Ok(())
}
