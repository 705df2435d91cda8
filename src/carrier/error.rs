// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Error types for carrier decoding and re-encoding.

use thiserror::Error;

/// Errors that can occur while turning media bytes into a carrier or back.
#[derive(Debug, Error)]
pub enum CarrierError {
    /// The bytes do not start with the signature of any known image format.
    #[error("no known image signature in input")]
    UnknownFormat,
    /// The image format was recognised but is not in the supported set.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    /// The image decoded fine but its pixel layout cannot carry bits.
    #[error("unsupported color layout: {0}")]
    UnsupportedLayout(String),
    /// The 6-byte GIF89a signature is missing.
    #[error("not a GIF89a palette image")]
    NotAPaletteImage,
    /// The GIF has no global color table, so palette mode is unavailable.
    #[error("GIF has no global color table")]
    MissingColorTable,
    /// The header or color table runs past the end of the data.
    #[error("unexpected end of data at offset {0}")]
    Truncated(usize),
    /// A container held no frames at all.
    #[error("container holds no frames")]
    EmptyAnimation,
    /// Byte positions handed to a byte carrier point outside its buffer.
    #[error("byte position {position} out of range for {len} bytes")]
    PositionOutOfRange { position: usize, len: usize },
    /// A byte position was listed more than once, so two bits would share it.
    #[error("byte position {0} listed more than once")]
    DuplicatePosition(usize),
    /// Frame dimensions do not match the pixel buffer.
    #[error("pixel buffer of {len} units does not fit {width}x{height}")]
    DimensionMismatch { width: u32, height: u32, len: usize },
    /// Direct-color decode or encode failure.
    #[error(transparent)]
    Image(#[from] image::ImageError),
    /// GIF decode failure.
    #[error("GIF decode failed: {0}")]
    GifDecode(#[from] gif::DecodingError),
    /// GIF encode failure.
    #[error("GIF encode failed: {0}")]
    GifEncode(#[from] gif::EncodingError),
}

pub type Result<T> = std::result::Result<T, CarrierError>;
