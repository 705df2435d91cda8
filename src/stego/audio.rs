// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Byte-carrier encode/decode (MP3 data bytes and similar).
//!
//! Same framing as still images, one bit per modifiable byte, with the
//! parity-flip codec in single-channel mode.

use crate::carrier::bytes::ByteCarrier;
use crate::stego::capacity::payload_capacity;
use crate::stego::codec::{BitCodec, ParityCodec};
use crate::stego::error::Result;
use crate::stego::frame::{decode_framed, encode_framed, has_signature};
use crate::stego::overlay::{SequenceOverlay, ShuffleOverlay};

/// Traversal order over a byte carrier's modifiable positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ByteOverlayKind {
    /// Positions in order. The seed is ignored.
    Sequence,
    /// Seeded permutation of the positions.
    #[default]
    Shuffle,
}

/// Hides payloads in a [`ByteCarrier`], modifying it in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSteg {
    kind: ByteOverlayKind,
    use_header: bool,
}

impl Default for ByteSteg {
    fn default() -> Self {
        Self { kind: ByteOverlayKind::default(), use_header: true }
    }
}

impl ByteSteg {
    pub fn new(kind: ByteOverlayKind, use_header: bool) -> Self {
        Self { kind, use_header }
    }

    pub fn kind(&self) -> ByteOverlayKind {
        self.kind
    }

    pub fn encode(&self, carrier: &mut ByteCarrier, payload: &[u8], seed: u64) -> Result<()> {
        let use_header = self.use_header;
        self.with_codec(carrier, seed, |codec| encode_framed(codec, payload, use_header))
    }

    /// Decode a header-framed payload.
    pub fn decode(&self, carrier: &mut ByteCarrier, seed: u64) -> Result<Vec<u8>> {
        self.with_codec(carrier, seed, |codec| decode_framed(codec))
    }

    /// Read `length` bytes without looking for a header.
    pub fn decode_raw(&self, carrier: &mut ByteCarrier, length: usize, seed: u64) -> Result<Vec<u8>> {
        self.with_codec(carrier, seed, |codec| codec.decode(length))
    }

    pub fn is_steganographic_data(&self, carrier: &mut ByteCarrier, seed: u64) -> Result<bool> {
        self.with_codec(carrier, seed, |codec| has_signature(codec))
    }

    /// Payload bytes the carrier can hold.
    pub fn capacity(&self, carrier: &ByteCarrier) -> usize {
        payload_capacity(carrier.len(), self.use_header)
    }

    fn with_codec<T>(
        &self,
        carrier: &mut ByteCarrier,
        seed: u64,
        f: impl FnOnce(&mut dyn BitCodec) -> Result<T>,
    ) -> Result<T> {
        match self.kind {
            ByteOverlayKind::Sequence => f(&mut ParityCodec::new(SequenceOverlay::new(carrier), 8, seed)?),
            ByteOverlayKind::Shuffle => f(&mut ParityCodec::new(ShuffleOverlay::new(carrier, seed), 8, seed)?),
        }
    }
}
