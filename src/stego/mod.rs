// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Steganographic encoding and decoding.
//!
//! Layers, from the bottom up:
//!
//! - **Overlay** ([`overlay`]): seeded traversal over a carrier's units.
//! - **Bit codec** ([`codec`]): one payload bit per unit, either by parity
//!   flip (direct color, bytes) or by palette swap (indexed color, using
//!   [`couples`]).
//! - **Framing** ([`frame`]): optional "PiBi" signature + length header so
//!   decode is self-describing.
//! - **Front ends**: [`ImageSteg`] for still images, [`ByteSteg`] for byte
//!   carriers, [`FramePipeline`] for multi-frame media.
//!
//! The seed only changes the traversal order and the random choices made
//! while flipping bits. It is not a key: payloads are stored in the clear.

pub mod audio;
pub mod capacity;
pub mod codec;
pub mod couples;
pub mod error;
pub mod frame;
pub mod overlay;
pub mod permute;
mod pipeline;
pub mod progress;
pub mod video;

pub use audio::{ByteOverlayKind, ByteSteg};
pub use error::StegoError;
pub use pipeline::ImageSteg;
pub use video::FramePipeline;

use error::Result;

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 1_732_341_558;

/// Encode `payload` into an image with the default settings and seed.
pub fn encode(carrier: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
    ImageSteg::default().encode(carrier, payload)
}

pub fn encode_with_seed(carrier: &[u8], payload: &[u8], seed: u64) -> Result<Vec<u8>> {
    ImageSteg::default().encode_with_seed(carrier, payload, seed)
}

/// Decode a header-framed payload with the default settings and seed.
pub fn decode(stego: &[u8]) -> Result<Vec<u8>> {
    ImageSteg::default().decode(stego)
}

pub fn decode_with_seed(stego: &[u8], seed: u64) -> Result<Vec<u8>> {
    ImageSteg::default().decode_with_seed(stego, seed)
}

/// Whether `data` carries a header under the default seed.
pub fn is_steganographic_data(data: &[u8]) -> Result<bool> {
    ImageSteg::default().is_steganographic_data(data)
}

/// Payload bytes `carrier` can hold with the default settings.
pub fn capacity(carrier: &[u8]) -> Result<usize> {
    ImageSteg::default().capacity(carrier)
}
