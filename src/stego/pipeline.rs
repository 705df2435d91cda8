// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Still-image encode/decode pipeline.
//!
//! Each call decodes the carrier, picks the overlay and codec from its color
//! model, runs one codec session and (for encode) writes the image back:
//!
//! | color model    | overlay                                    | codec            |
//! |----------------|--------------------------------------------|------------------|
//! | RGB 24-bit     | [`ShuffleOverlay`]                         | [`ParityCodec`]  |
//! | ARGB 32-bit    | [`ShuffleOverlay`], transparent pixels skipped unless `use_transparent` | [`ParityCodec`] |
//! | indexed (GIF)  | [`TableOverlay`], transparent index always skipped | [`PaletteCodec`] |
//!
//! Nothing is cached between calls.

use crate::carrier::{self, DecodedCarrier};
use crate::config::StegConfig;
use crate::stego::capacity::payload_capacity;
use crate::stego::codec::{BitCodec, PaletteCodec, ParityCodec};
use crate::stego::error::{Result, StegoError};
use crate::stego::frame::{decode_framed, encode_framed, has_signature};
use crate::stego::overlay::{ShuffleOverlay, TableOverlay};
use crate::stego::DEFAULT_SEED;

/// Hides payloads in still images (PNG, BMP, GIF).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageSteg {
    config: StegConfig,
}

impl ImageSteg {
    pub fn new(config: StegConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StegConfig {
        &self.config
    }

    /// Encode `payload` into `carrier` with [`DEFAULT_SEED`].
    pub fn encode(&self, carrier: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
        self.encode_with_seed(carrier, payload, DEFAULT_SEED)
    }

    /// Encode `payload` into `carrier`.
    ///
    /// # Returns
    /// The carrier re-encoded in its original format.
    ///
    /// # Errors
    /// - [`StegoError::UnsupportedCarrierType`] / [`StegoError::NoCarrierFound`]
    ///   if `carrier` is not a supported image.
    /// - [`StegoError::CapacityExceeded`] if the payload (plus header) does not fit.
    /// - [`StegoError::NoCoupleAvailable`] for GIF carriers whose palette
    ///   cannot flip a required pixel.
    /// - [`StegoError::CarrierReassemblyFailed`] if writing the image fails.
    pub fn encode_with_seed(&self, carrier: &[u8], payload: &[u8], seed: u64) -> Result<Vec<u8>> {
        let mut decoded = carrier::decode(carrier)?;
        self.encode_carrier(&mut decoded, payload, seed)?;
        carrier::encode(&decoded).map_err(StegoError::CarrierReassemblyFailed)
    }

    /// Decode a header-framed payload with [`DEFAULT_SEED`].
    pub fn decode(&self, stego: &[u8]) -> Result<Vec<u8>> {
        self.decode_with_seed(stego, DEFAULT_SEED)
    }

    /// Decode a header-framed payload.
    ///
    /// Always looks for the header, even when this instance encodes without
    /// one; use [`decode_raw_with_seed`](Self::decode_raw_with_seed) for
    /// headerless data.
    ///
    /// # Errors
    /// [`StegoError::UnknownStegFormat`] if there is no hidden data, or it was
    /// hidden with another seed, another `use_transparent` setting or without
    /// a header.
    pub fn decode_with_seed(&self, stego: &[u8], seed: u64) -> Result<Vec<u8>> {
        let mut decoded = carrier::decode(stego)?;
        self.decode_carrier(&mut decoded, seed)
    }

    /// Read `length` bytes with [`DEFAULT_SEED`], no header.
    pub fn decode_raw(&self, stego: &[u8], length: usize) -> Result<Vec<u8>> {
        self.decode_raw_with_seed(stego, length, DEFAULT_SEED)
    }

    /// Read `length` bytes without looking for a header.
    ///
    /// Nothing is validated: any supported image yields `length` bytes, and
    /// whether they are a hidden message depends on using the same seed,
    /// `use_transparent` setting and length as the encoder.
    pub fn decode_raw_with_seed(&self, stego: &[u8], length: usize, seed: u64) -> Result<Vec<u8>> {
        let mut decoded = carrier::decode(stego)?;
        self.decode_raw_carrier(&mut decoded, length, seed)
    }

    /// Whether `data` carries a header under [`DEFAULT_SEED`].
    pub fn is_steganographic_data(&self, data: &[u8]) -> Result<bool> {
        self.is_steganographic_data_with_seed(data, DEFAULT_SEED)
    }

    /// Whether `data` carries a header under `seed`.
    ///
    /// Reads only the 4 signature bytes.
    pub fn is_steganographic_data_with_seed(&self, data: &[u8], seed: u64) -> Result<bool> {
        let mut decoded = carrier::decode(data)?;
        self.detect_carrier(&mut decoded, seed)
    }

    /// Payload bytes `carrier` can hold with the current settings.
    ///
    /// For GIF carriers this is an upper bound: pixels whose color has no
    /// couple can still fail the encode.
    pub fn capacity(&self, carrier: &[u8]) -> Result<usize> {
        let mut decoded = carrier::decode(carrier)?;
        self.carrier_capacity(&mut decoded)
    }

    /// Encode into an already decoded carrier, in place.
    pub fn encode_carrier(&self, carrier: &mut DecodedCarrier, payload: &[u8], seed: u64) -> Result<()> {
        let use_header = self.config.use_header;
        self.with_codec(carrier, seed, |codec| {
            log::debug!("encoding {} bytes into {} units (header: {use_header})", payload.len(), codec.available());
            encode_framed(codec, payload, use_header)
        })
    }

    pub fn decode_carrier(&self, carrier: &mut DecodedCarrier, seed: u64) -> Result<Vec<u8>> {
        self.with_codec(carrier, seed, |codec| decode_framed(codec))
    }

    pub fn decode_raw_carrier(&self, carrier: &mut DecodedCarrier, length: usize, seed: u64) -> Result<Vec<u8>> {
        self.with_codec(carrier, seed, |codec| codec.decode(length))
    }

    pub fn detect_carrier(&self, carrier: &mut DecodedCarrier, seed: u64) -> Result<bool> {
        self.with_codec(carrier, seed, |codec| has_signature(codec))
    }

    pub fn carrier_capacity(&self, carrier: &mut DecodedCarrier) -> Result<usize> {
        let use_header = self.config.use_header;
        self.with_codec(carrier, DEFAULT_SEED, |codec| Ok(payload_capacity(codec.available(), use_header)))
    }

    /// Build the overlay and codec matching the carrier's color model and
    /// run `f` on them.
    fn with_codec<T>(
        &self,
        carrier: &mut DecodedCarrier,
        seed: u64,
        f: impl FnOnce(&mut dyn BitCodec) -> Result<T>,
    ) -> Result<T> {
        match carrier {
            DecodedCarrier::Direct { raster, format } => {
                let depth = raster.model().bit_depth();
                log::debug!(
                    "{format:?} carrier, {:?}, {}x{}, {} transparent",
                    raster.model(),
                    raster.width(),
                    raster.height(),
                    raster.transparent_count()
                );
                let overlay = if self.config.use_transparent {
                    ShuffleOverlay::new(raster, seed)
                } else {
                    ShuffleOverlay::skip_transparent(raster, seed)
                };
                let mut codec = ParityCodec::new(overlay, depth, seed)?;
                f(&mut codec)
            }
            DecodedCarrier::Indexed { raster, layout } => {
                log::debug!(
                    "GIF carrier, {} palette entries, {}x{}, transparent index {:?}",
                    raster.palette().len(),
                    raster.width(),
                    raster.height(),
                    layout.transparent
                );
                let overlay = TableOverlay::skip_transparent(raster, seed, layout.transparent);
                let mut codec = PaletteCodec::new(overlay, seed);
                f(&mut codec)
            }
        }
    }
}
