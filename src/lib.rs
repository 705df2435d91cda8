// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! # pixelbit
//!
//! Hides byte payloads in PNG, BMP and GIF images, in the frames of
//! animations and videos, and in the data bytes of audio streams. One bit
//! is stored per pixel (or byte) in the parity of its channels:
//!
//! - **Direct color** (24/32-bit): a pixel that must flip gets ±1 on one
//!   random channel.
//! - **Indexed color** (GIF): a pixel that must flip switches to a palette
//!   entry of nearly the same color with the opposite parity.
//!
//! Pixels are visited in an order derived from a 64-bit seed, and an 8-byte
//! header (signature + length) makes decoding self-describing. The `carrier`
//! module turns media files into mutable units and back; the `stego` module
//! does the embedding.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use pixelbit::{decode, encode};
//!
//! let cover = std::fs::read("cover.png").unwrap();
//! let stego = encode(&cover, b"secret message").unwrap();
//! assert_eq!(decode(&stego).unwrap(), b"secret message");
//! ```

pub mod carrier;
pub mod config;
pub mod stego;

pub use carrier::animated::{AnimatedGif, FrameContainer, VideoFrame};
pub use carrier::bytes::ByteCarrier;
pub use carrier::error::CarrierError;
pub use carrier::{DecodedCarrier, MediaFormat};
pub use config::{ConfigError, PipelineConfig, StegConfig, DEFAULT_WORKERS};
pub use stego::{capacity, decode, decode_with_seed, encode, encode_with_seed, is_steganographic_data};
pub use stego::{ByteOverlayKind, ByteSteg, FramePipeline, ImageSteg, StegoError, DEFAULT_SEED};
pub use stego::frame::{HEADER_LEN, HEADER_SIGNATURE};
pub use stego::couples::COUPLE_TOLERANCE;
pub use stego::progress;
