// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the steganography pipeline.
//!
//! [`StegoError`] covers every failure from carrier dispatch through bit
//! embedding and frame-parallel processing. Carrier-level problems arrive
//! as [`CarrierError`] and are sorted into the matching kind.

use thiserror::Error;

use crate::carrier::error::CarrierError;

/// Errors that can occur during steganographic encoding or decoding.
#[derive(Debug, Error)]
pub enum StegoError {
    /// The carrier's format or color model is not supported. Not retryable.
    #[error("unsupported carrier type: {0}")]
    UnsupportedCarrierType(String),
    /// The input does not contain a decodable carrier.
    #[error("no carrier found: {0}")]
    NoCarrierFound(#[source] CarrierError),
    /// The payload needs more units than the carrier offers.
    #[error("payload needs {needed} units but only {available} are available")]
    CapacityExceeded { needed: usize, available: usize },
    /// A decode tried to read past the last unit.
    #[error("carrier exhausted before the requested data was read")]
    ExhaustedCarrier,
    /// No header signature found: no hidden data, or a different seed/configuration.
    #[error("no steganographic data found")]
    UnknownStegFormat,
    /// A palette color that must flip has no opposite-parity neighbour.
    #[error("palette color #{color:06X} has no opposite-parity couple")]
    NoCoupleAvailable { color: u32 },
    /// The palette parser did not find the GIF89a signature.
    #[error("not a palette image")]
    NotAPaletteImage,
    /// Writing the modified carrier back to its container failed.
    #[error("carrier reassembly failed: {0}")]
    CarrierReassemblyFailed(#[source] CarrierError),
    /// A frame of a multi-frame carrier failed.
    #[error("frame {index}: {source}")]
    Frame {
        index: usize,
        #[source]
        source: Box<StegoError>,
    },
    /// The worker pool could not be started.
    #[error("worker pool: {0}")]
    WorkerPool(String),
    /// The operation was cancelled before it finished.
    #[error("operation cancelled")]
    Cancelled,
}

impl StegoError {
    /// Attribute this error to a frame of a multi-frame carrier.
    pub fn in_frame(self, index: usize) -> Self {
        Self::Frame { index, source: Box::new(self) }
    }

    /// Frame index this error is attributed to, if any.
    pub fn frame_index(&self) -> Option<usize> {
        match self {
            Self::Frame { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// The underlying error with frame attribution stripped.
    pub fn root(&self) -> &StegoError {
        match self {
            Self::Frame { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Sorts carrier decode failures into the steganography taxonomy.
///
/// Encode-side failures are wrapped in [`StegoError::CarrierReassemblyFailed`]
/// explicitly instead.
impl From<CarrierError> for StegoError {
    fn from(e: CarrierError) -> Self {
        match e {
            CarrierError::NotAPaletteImage => Self::NotAPaletteImage,
            CarrierError::UnsupportedFormat(_)
            | CarrierError::UnsupportedLayout(_)
            | CarrierError::MissingColorTable => Self::UnsupportedCarrierType(e.to_string()),
            other => Self::NoCarrierFound(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, StegoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carrier_errors_sorted() {
        assert!(matches!(StegoError::from(CarrierError::NotAPaletteImage), StegoError::NotAPaletteImage));
        assert!(matches!(
            StegoError::from(CarrierError::MissingColorTable),
            StegoError::UnsupportedCarrierType(_)
        ));
        assert!(matches!(
            StegoError::from(CarrierError::UnknownFormat),
            StegoError::NoCarrierFound(CarrierError::UnknownFormat)
        ));
    }

    #[test]
    fn frame_attribution() {
        let err = StegoError::ExhaustedCarrier.in_frame(3).in_frame(7);
        assert_eq!(err.frame_index(), Some(7));
        assert!(matches!(err.root(), StegoError::ExhaustedCarrier));
        assert_eq!(StegoError::UnknownStegFormat.in_frame(2).to_string(), "frame 2: no steganographic data found");
    }
}
