// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Frame containers: splitting multi-frame media into independent carriers
//! and putting them back together.
//!
//! Video containers are expected to implement [`FrameContainer`] outside
//! this crate. [`AnimatedGif`] is the built-in implementation.

use super::error::{CarrierError, Result};
use super::gif_codec::{frame_raster, indexed_decoder, write_frame};
use super::gif_table::parse_logical_screen;
use super::raster::unpack_argb;
use super::DecodedCarrier;

/// One decoded frame plus its presentation timestamp.
///
/// The position in the frame list is the authoritative order; `pts` is kept
/// so the container can restore the original timing.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    pub carrier: DecodedCarrier,
    /// Presentation timestamp in container time units.
    pub pts: u64,
}

/// Demux/remux pair for multi-frame media.
pub trait FrameContainer {
    /// Container-level data needed for lossless reassembly.
    type Meta;

    /// Split `bytes` into frames in presentation order.
    fn demux(&self, bytes: &[u8]) -> Result<(Vec<VideoFrame>, Self::Meta)>;

    /// Rebuild the container from (possibly modified) frames.
    fn remux(&self, frames: &[VideoFrame], meta: &Self::Meta) -> Result<Vec<u8>>;
}

/// Animated GIF frames with timestamps in hundredths of a second.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimatedGif;

/// Screen-level data of an animated GIF.
#[derive(Debug, Clone, PartialEq)]
pub struct GifAnimationMeta {
    pub width: u16,
    pub height: u16,
    pub global_palette: Option<Vec<u32>>,
    pub repeat: gif::Repeat,
}

impl FrameContainer for AnimatedGif {
    type Meta = GifAnimationMeta;

    fn demux(&self, bytes: &[u8]) -> Result<(Vec<VideoFrame>, GifAnimationMeta)> {
        let screen = parse_logical_screen(bytes)?;
        let mut decoder = indexed_decoder(bytes)?;
        let dims = (screen.width, screen.height);

        let mut frames = Vec::new();
        let mut pts = 0u64;
        while let Some(frame) = decoder.read_next_frame()? {
            let (raster, layout) = frame_raster(frame, dims, screen.global_table.as_deref())?;
            let delay = layout.delay;
            frames.push(VideoFrame { carrier: DecodedCarrier::Indexed { raster, layout }, pts });
            pts += delay as u64;
        }
        if frames.is_empty() {
            return Err(CarrierError::EmptyAnimation);
        }
        log::debug!("demuxed {} GIF frames over {} cs", frames.len(), pts);

        let meta = GifAnimationMeta {
            width: screen.width,
            height: screen.height,
            global_palette: screen.global_table,
            repeat: decoder.repeat(),
        };
        Ok((frames, meta))
    }

    fn remux(&self, frames: &[VideoFrame], meta: &GifAnimationMeta) -> Result<Vec<u8>> {
        if frames.is_empty() {
            return Err(CarrierError::EmptyAnimation);
        }
        let global_rgb: Vec<u8> = meta
            .global_palette
            .iter()
            .flatten()
            .flat_map(|&c| {
                let [_, r, g, b] = unpack_argb(c);
                [r, g, b]
            })
            .collect();

        let mut out = Vec::new();
        {
            let mut encoder = gif::Encoder::new(&mut out, meta.width, meta.height, &global_rgb)?;
            encoder.set_repeat(meta.repeat)?;
            for (i, frame) in frames.iter().enumerate() {
                let DecodedCarrier::Indexed { raster, layout } = &frame.carrier else {
                    return Err(CarrierError::UnsupportedLayout(format!(
                        "frame {i} is not palette-indexed"
                    )));
                };
                // Delay is the gap to the next timestamp; the last frame keeps its own.
                let delay = match frames.get(i + 1) {
                    Some(next) => next.pts.saturating_sub(frame.pts).min(u16::MAX as u64) as u16,
                    None => layout.delay,
                };
                write_frame(&mut encoder, raster, layout, delay)?;
            }
        }
        Ok(out)
    }
}
