// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Media carriers: turning file bytes into mutable units and back.
//!
//! Supported still-image formats form a fixed whitelist:
//! - PNG, 8-bit RGB or RGBA
//! - BMP, 8-bit RGB (BMP with an alpha channel is rejected)
//! - GIF89a with a global color table, read as palette indices
//!
//! Grayscale and 16-bit-per-channel images are rejected. Only the first
//! frame of a GIF is used here; multi-frame media goes through
//! [`animated::FrameContainer`].

pub mod animated;
pub mod bytes;
pub mod error;
pub mod gif_codec;
pub mod gif_table;
pub mod raster;

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use error::{CarrierError, Result};
use gif_codec::GifLayout;
use raster::{ColorModel, IndexedRaster, Raster};

/// Container formats accepted as still-image carriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaFormat {
    Png,
    Bmp,
    Gif,
}

impl MediaFormat {
    /// Detect the format from the file signature.
    ///
    /// # Errors
    /// - [`CarrierError::UnknownFormat`] if no image signature matches.
    /// - [`CarrierError::UnsupportedFormat`] for images outside the whitelist.
    pub fn sniff(bytes: &[u8]) -> Result<Self> {
        let format = image::guess_format(bytes).map_err(|_| CarrierError::UnknownFormat)?;
        match format {
            ImageFormat::Png => Ok(Self::Png),
            ImageFormat::Bmp => Ok(Self::Bmp),
            ImageFormat::Gif => Ok(Self::Gif),
            other => Err(CarrierError::UnsupportedFormat(format!("{other:?}"))),
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Bmp => ImageFormat::Bmp,
            Self::Gif => ImageFormat::Gif,
        }
    }
}

/// A decoded still image ready for embedding.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedCarrier {
    /// 24/32-bit pixels, re-encoded to `format`.
    Direct { raster: Raster, format: MediaFormat },
    /// Palette indices with the GIF frame layout they came from.
    Indexed { raster: IndexedRaster, layout: GifLayout },
}

impl DecodedCarrier {
    pub fn color_model(&self) -> ColorModel {
        match self {
            Self::Direct { raster, .. } => raster.model(),
            Self::Indexed { .. } => ColorModel::Indexed,
        }
    }

    pub fn format(&self) -> MediaFormat {
        match self {
            Self::Direct { format, .. } => *format,
            Self::Indexed { .. } => MediaFormat::Gif,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Direct { raster, .. } => (raster.width(), raster.height()),
            Self::Indexed { raster, .. } => (raster.width(), raster.height()),
        }
    }
}

/// Decode a whole media file into a carrier.
pub fn decode(bytes: &[u8]) -> Result<DecodedCarrier> {
    let format = MediaFormat::sniff(bytes)?;
    if format == MediaFormat::Gif {
        let (raster, layout) = gif_codec::decode_indexed(bytes)?;
        return Ok(DecodedCarrier::Indexed { raster, layout });
    }

    let image = image::load_from_memory_with_format(bytes, format.image_format())?;
    let raster = match image {
        DynamicImage::ImageRgb8(img) => Raster::from_rgb8(&img),
        DynamicImage::ImageRgba8(_) if format == MediaFormat::Bmp => {
            return Err(CarrierError::UnsupportedLayout("BMP with transparency".into()));
        }
        DynamicImage::ImageRgba8(img) => Raster::from_rgba8(&img),
        other => {
            return Err(CarrierError::UnsupportedLayout(format!("{:?}", other.color())));
        }
    };
    Ok(DecodedCarrier::Direct { raster, format })
}

/// Re-encode a carrier to the format it was decoded from.
pub fn encode(carrier: &DecodedCarrier) -> Result<Vec<u8>> {
    match carrier {
        DecodedCarrier::Direct { raster, format } => {
            let mut out = Cursor::new(Vec::new());
            raster.to_dynamic().write_to(&mut out, format.image_format())?;
            Ok(out.into_inner())
        }
        DecodedCarrier::Indexed { raster, layout } => gif_codec::encode_indexed(raster, layout),
    }
}
