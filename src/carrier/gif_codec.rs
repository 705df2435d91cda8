// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Palette-preserving GIF decode and encode.
//!
//! Frames are read with indexed color output so the codec sees palette
//! indices, never expanded RGBA. Encoding writes the raster palette back as
//! the global color table, which keeps the palette layout stable across an
//! encode/decode round trip.

use std::borrow::Cow;
use std::io::Write;

use super::error::{CarrierError, Result};
use super::gif_table::parse_logical_screen;
use super::raster::{palette_from_rgb, IndexedRaster};

/// Placement and timing of one GIF frame on the logical screen.
#[derive(Debug, Clone, PartialEq)]
pub struct GifLayout {
    pub screen_width: u16,
    pub screen_height: u16,
    pub left: u16,
    pub top: u16,
    /// Delay after this frame, in hundredths of a second.
    pub delay: u16,
    pub dispose: gif::DisposalMethod,
    pub transparent: Option<u8>,
    /// The frame carried its own color table instead of the global one.
    pub local_palette: bool,
}

impl GifLayout {
    /// Full-screen layout for a single still frame.
    pub fn still(width: u16, height: u16) -> Self {
        Self {
            screen_width: width,
            screen_height: height,
            left: 0,
            top: 0,
            delay: 0,
            dispose: gif::DisposalMethod::Any,
            transparent: None,
            local_palette: false,
        }
    }
}

pub(crate) fn indexed_decoder(gif: &[u8]) -> Result<gif::Decoder<&[u8]>> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    Ok(options.read_info(gif)?)
}

/// Turn a decoded frame into a raster, resolving its palette.
pub(crate) fn frame_raster(
    frame: &gif::Frame<'_>,
    screen: (u16, u16),
    global: Option<&[u32]>,
) -> Result<(IndexedRaster, GifLayout)> {
    let (palette, local_palette) = match (&frame.palette, global) {
        (Some(local), _) => (palette_from_rgb(local), true),
        (None, Some(global)) => (global.to_vec(), false),
        (None, None) => return Err(CarrierError::MissingColorTable),
    };
    let raster = IndexedRaster::new(
        frame.width as u32,
        frame.height as u32,
        frame.buffer.to_vec(),
        palette,
    )?;
    let layout = GifLayout {
        screen_width: screen.0,
        screen_height: screen.1,
        left: frame.left,
        top: frame.top,
        delay: frame.delay,
        dispose: frame.dispose,
        transparent: frame.transparent,
        local_palette,
    };
    Ok((raster, layout))
}

/// Decode the first frame of a GIF89a as an indexed raster.
///
/// The palette comes from the global color table parsed off the raw bytes.
///
/// # Errors
/// - [`CarrierError::NotAPaletteImage`] if the signature is not GIF89a.
/// - [`CarrierError::MissingColorTable`] if there is no global color table.
pub fn decode_indexed(gif: &[u8]) -> Result<(IndexedRaster, GifLayout)> {
    let screen = parse_logical_screen(gif)?;
    let global = screen.global_table.ok_or(CarrierError::MissingColorTable)?;
    let mut decoder = indexed_decoder(gif)?;
    let frame = decoder.read_next_frame()?.ok_or(CarrierError::EmptyAnimation)?;
    let (raster, mut layout) = frame_raster(frame, (screen.width, screen.height), Some(&global))?;
    // Re-encoding promotes the frame palette to the global table.
    layout.local_palette = false;
    Ok((raster, layout))
}

fn dimension(value: u32) -> Result<u16> {
    u16::try_from(value)
        .map_err(|_| CarrierError::UnsupportedLayout(format!("GIF dimension {value} exceeds 65535")))
}

pub(crate) fn write_frame<W: Write>(
    encoder: &mut gif::Encoder<W>,
    raster: &IndexedRaster,
    layout: &GifLayout,
    delay: u16,
) -> Result<()> {
    let frame = gif::Frame {
        width: dimension(raster.width())?,
        height: dimension(raster.height())?,
        left: layout.left,
        top: layout.top,
        delay,
        dispose: layout.dispose,
        transparent: layout.transparent,
        palette: layout.local_palette.then(|| raster.palette_rgb()),
        buffer: Cow::Borrowed(raster.indices()),
        ..gif::Frame::default()
    };
    encoder.write_frame(&frame)?;
    Ok(())
}

/// Encode a single indexed raster as a GIF89a with a global color table.
pub fn encode_indexed(raster: &IndexedRaster, layout: &GifLayout) -> Result<Vec<u8>> {
    let width = layout.screen_width.max(dimension(raster.width())?);
    let height = layout.screen_height.max(dimension(raster.height())?);
    let mut out = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut out, width, height, &raster.palette_rgb())?;
        let still = GifLayout { local_palette: false, ..layout.clone() };
        write_frame(&mut encoder, raster, &still, layout.delay)?;
        // Dropping the encoder writes the trailer.
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::gif_table::parse_color_table;
    use crate::carrier::raster::pack_argb;

    fn sample() -> IndexedRaster {
        let palette = vec![
            pack_argb(0xFF, 0, 0, 0),
            pack_argb(0xFF, 1, 0, 0),
            pack_argb(0xFF, 200, 10, 10),
            pack_argb(0xFF, 201, 10, 10),
        ];
        let indices = (0..6 * 5).map(|i| (i % 4) as u8).collect();
        IndexedRaster::new(6, 5, indices, palette).unwrap()
    }

    #[test]
    fn indices_and_palette_survive() {
        let raster = sample();
        let bytes = encode_indexed(&raster, &GifLayout::still(6, 5)).unwrap();
        assert_eq!(&bytes[..6], b"GIF89a");
        assert_eq!(parse_color_table(&bytes).unwrap().unwrap(), raster.palette());

        let (back, layout) = decode_indexed(&bytes).unwrap();
        assert_eq!(back, raster);
        assert!(!layout.local_palette);
        assert_eq!((layout.screen_width, layout.screen_height), (6, 5));
    }

    #[test]
    fn rejects_non_gif() {
        assert!(matches!(decode_indexed(b"BM\0\0\0\0"), Err(CarrierError::NotAPaletteImage)));
    }
}
