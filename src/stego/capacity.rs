// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Payload capacity from the number of traversable units.
//!
//! Each unit carries one bit, so `units / 8` bytes fit in a carrier. With
//! the header enabled, [`HEADER_LEN`] of those bytes go to the header.

use crate::stego::frame::HEADER_LEN;

/// Largest payload, in bytes, that `units` traversable units can hold.
///
/// # Returns
/// 0 if the carrier cannot even hold the header.
pub fn payload_capacity(units: usize, use_header: bool) -> usize {
    let bytes = units / 8;
    if use_header {
        bytes.saturating_sub(HEADER_LEN)
    } else {
        bytes
    }
}
