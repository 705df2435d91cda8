// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Header framing around the payload.
//!
//! With the header enabled the embedded bit stream is:
//!
//! ```text
//! [4 bytes] signature "PiBi" (big-endian 0x50694269)
//! [4 bytes] payload length (big-endian u32)
//! [N bytes] payload
//! ```
//!
//! All three parts go through the same codec, so they share one traversal
//! and are scattered over the carrier together. Without the header only the
//! payload is written, and the reader has to know the length.

use crate::stego::codec::{check_capacity, BitCodec};
use crate::stego::error::{Result, StegoError};

/// Header signature, "PiBi" in ASCII.
pub const HEADER_SIGNATURE: u32 = 0x5069_4269;

/// Signature (4 bytes) plus length (4 bytes).
pub const HEADER_LEN: usize = 8;

/// Build the header for a payload of `payload_len` bytes.
///
/// # Errors
/// [`StegoError::CapacityExceeded`] if the length does not fit the u32 field.
pub fn build_header(payload_len: usize) -> Result<[u8; HEADER_LEN]> {
    let len = u32::try_from(payload_len)
        .map_err(|_| StegoError::CapacityExceeded { needed: payload_len, available: u32::MAX as usize })?;
    let mut header = [0u8; HEADER_LEN];
    header[..4].copy_from_slice(&HEADER_SIGNATURE.to_be_bytes());
    header[4..].copy_from_slice(&len.to_be_bytes());
    Ok(header)
}

/// Write `payload`, preceded by the header if `use_header` is set.
///
/// The whole stream is checked against the codec's capacity before any
/// unit is touched.
pub fn encode_framed<C: BitCodec + ?Sized>(codec: &mut C, payload: &[u8], use_header: bool) -> Result<()> {
    if !use_header {
        return codec.encode(payload);
    }
    let header = build_header(payload.len())?;
    check_capacity(HEADER_LEN.saturating_add(payload.len()), codec.available())?;
    codec.encode(&header)?;
    codec.encode(payload)
}

/// Read a header-framed payload.
///
/// # Errors
/// - [`StegoError::UnknownStegFormat`] if the signature is missing or the
///   carrier is too small to hold one.
/// - [`StegoError::ExhaustedCarrier`] if the declared length runs past the
///   end of the carrier.
pub fn decode_framed<C: BitCodec + ?Sized>(codec: &mut C) -> Result<Vec<u8>> {
    if !read_signature(codec)? {
        return Err(StegoError::UnknownStegFormat);
    }
    let len = read_u32(codec)? as usize;
    log::trace!("header declares {len} payload bytes, {} units left", codec.available());
    codec.decode(len)
}

/// Whether the first four bytes of the stream are the signature.
///
/// A carrier too small to hold a signature has none.
pub fn has_signature<C: BitCodec + ?Sized>(codec: &mut C) -> Result<bool> {
    read_signature(codec)
}

fn read_signature<C: BitCodec + ?Sized>(codec: &mut C) -> Result<bool> {
    match read_u32(codec) {
        Ok(word) => Ok(word == HEADER_SIGNATURE),
        Err(StegoError::ExhaustedCarrier) => Ok(false),
        Err(e) => Err(e),
    }
}

fn read_u32<C: BitCodec + ?Sized>(codec: &mut C) -> Result<u32> {
    let bytes = codec.decode(4)?;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
