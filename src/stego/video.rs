// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Frame-parallel pipeline for multi-frame carriers.
//!
//! Every frame is an independent still-image carrier: each task builds its
//! own overlay and codec, and the same full payload is written into every
//! frame. Encoding and decoding have their own worker counts
//! ([`PipelineConfig::encode_workers`], [`PipelineConfig::decode_workers`]).
//! With more than one worker (and the `parallel` feature) the frames run on
//! a dedicated rayon pool of that size; otherwise they run in order on the
//! calling thread.
//!
//! Decoding never touches the caller's frames. Each task works on its own
//! copy of one carrier, so at most one copy per worker is alive at a time.
//!
//! Results always come back in input order. The first failing frame aborts
//! the run: its error is returned wrapped in [`StegoError::Frame`] with the
//! frame index, and frames that had not started yet are skipped.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::carrier::animated::{FrameContainer, VideoFrame};
use crate::config::PipelineConfig;
use crate::stego::error::{Result, StegoError};
use crate::stego::pipeline::ImageSteg;
use crate::stego::progress::Progress;

/// Applies the still-image codec across the frames of a video or animation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FramePipeline {
    config: PipelineConfig,
}

impl FramePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn steg(&self) -> ImageSteg {
        ImageSteg::new(self.config.steg)
    }

    /// Write `payload` into every frame. Timestamps are left unchanged.
    pub fn encode_frames(&self, frames: Vec<VideoFrame>, payload: &[u8], seed: u64) -> Result<Vec<VideoFrame>> {
        self.encode_frames_with_progress(frames, payload, seed, &Progress::default())
    }

    pub fn encode_frames_with_progress(
        &self,
        mut frames: Vec<VideoFrame>,
        payload: &[u8],
        seed: u64,
        progress: &Progress,
    ) -> Result<Vec<VideoFrame>> {
        let steg = self.steg();
        self.map_frames(&mut frames, progress, |_, frame| steg.encode_carrier(&mut frame.carrier, payload, seed))?;
        Ok(frames)
    }

    /// Decode the header-framed payload of every frame, in frame order.
    pub fn decode_frames(&self, frames: &[VideoFrame], seed: u64) -> Result<Vec<Vec<u8>>> {
        self.decode_frames_with_progress(frames, seed, &Progress::default())
    }

    pub fn decode_frames_with_progress(
        &self,
        frames: &[VideoFrame],
        seed: u64,
        progress: &Progress,
    ) -> Result<Vec<Vec<u8>>> {
        let steg = self.steg();
        let mut refs: Vec<&VideoFrame> = frames.iter().collect();
        self.run_frames(self.config.decode_workers, &mut refs, progress, |_, frame| {
            let mut carrier = frame.carrier.clone();
            steg.decode_carrier(&mut carrier, seed)
        })
    }

    /// Run `task` on every item with the encode worker count and collect the
    /// results in item order.
    ///
    /// `task` receives the item's index. On the first failure the shared
    /// `progress` is cancelled so remaining items are skipped; the returned
    /// error is the lowest-index real failure, attributed to its index.
    pub fn map_frames<I, T, F>(&self, items: &mut [I], progress: &Progress, task: F) -> Result<Vec<T>>
    where
        I: Send,
        T: Send,
        F: Fn(usize, &mut I) -> Result<T> + Sync,
    {
        self.run_frames(self.config.encode_workers, items, progress, task)
    }

    fn run_frames<I, T, F>(&self, workers: usize, items: &mut [I], progress: &Progress, task: F) -> Result<Vec<T>>
    where
        I: Send,
        T: Send,
        F: Fn(usize, &mut I) -> Result<T> + Sync,
    {
        progress.set_total(u32::try_from(items.len()).unwrap_or(u32::MAX));
        log::info!("processing {} frames with {workers} workers", items.len());

        let run_one = |index: usize, item: &mut I| -> Result<T> {
            progress.check_cancelled()?;
            match task(index, item) {
                Ok(value) => {
                    progress.advance();
                    Ok(value)
                }
                Err(e) => {
                    progress.cancel();
                    log::warn!("frame {index} failed: {e}");
                    Err(e.in_frame(index))
                }
            }
        };

        let results: Vec<Result<T>> = if workers <= 1 {
            items.iter_mut().enumerate().map(|(i, item)| run_one(i, item)).collect()
        } else {
            run_parallel(workers, items, &run_one)?
        };

        let out = collect_ordered(results)?;
        progress.finish();
        log::info!("processed {} frames", out.len());
        Ok(out)
    }

    /// Demux `bytes`, write `payload` into every frame and remux.
    pub fn encode<C: FrameContainer>(&self, container: &C, bytes: &[u8], payload: &[u8], seed: u64) -> Result<Vec<u8>> {
        let (frames, meta) = container.demux(bytes)?;
        let frames = self.encode_frames(frames, payload, seed)?;
        container.remux(&frames, &meta).map_err(StegoError::CarrierReassemblyFailed)
    }

    /// Decode every frame and return the first frame's payload.
    pub fn decode<C: FrameContainer>(&self, container: &C, bytes: &[u8], seed: u64) -> Result<Vec<u8>> {
        let (frames, _) = container.demux(bytes)?;
        let mut payloads = self.decode_frames(&frames, seed)?;
        if payloads.is_empty() {
            return Err(StegoError::UnknownStegFormat);
        }
        Ok(payloads.swap_remove(0))
    }

    /// Whether every frame carries a header.
    pub fn is_steganographic_data<C: FrameContainer>(&self, container: &C, bytes: &[u8], seed: u64) -> Result<bool> {
        let (mut frames, _) = container.demux(bytes)?;
        let steg = self.steg();
        let found = self.run_frames(self.config.decode_workers, &mut frames, &Progress::default(), |_, frame| {
            steg.detect_carrier(&mut frame.carrier, seed)
        })?;
        Ok(!found.is_empty() && found.into_iter().all(|f| f))
    }
}

#[cfg(feature = "parallel")]
fn run_parallel<I, T, F>(workers: usize, items: &mut [I], run_one: &F) -> Result<Vec<Result<T>>>
where
    I: Send,
    T: Send,
    F: Fn(usize, &mut I) -> Result<T> + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| StegoError::WorkerPool(e.to_string()))?;
    Ok(pool.install(|| items.par_iter_mut().enumerate().map(|(i, item)| run_one(i, item)).collect()))
}

#[cfg(not(feature = "parallel"))]
fn run_parallel<I, T, F>(_workers: usize, items: &mut [I], run_one: &F) -> Result<Vec<Result<T>>>
where
    F: Fn(usize, &mut I) -> Result<T>,
{
    Ok(items.iter_mut().enumerate().map(|(i, item)| run_one(i, item)).collect())
}

/// Results in index order, or the lowest-index failure that is not a skip.
fn collect_ordered<T>(results: Vec<Result<T>>) -> Result<Vec<T>> {
    let mut out = Vec::with_capacity(results.len());
    let mut failure = None;
    let mut cancelled = false;
    for result in results {
        match result {
            Ok(value) => out.push(value),
            Err(StegoError::Cancelled) => cancelled = true,
            Err(e) => {
                failure.get_or_insert(e);
            }
        }
    }
    match failure {
        Some(e) => Err(e),
        None if cancelled => Err(StegoError::Cancelled),
        None => Ok(out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::raster::{ColorModel, Raster};
    use crate::carrier::{DecodedCarrier, MediaFormat};

    fn frames(n: usize) -> Vec<VideoFrame> {
        (0..n)
            .map(|f| {
                let pixels = (0..1024u32).map(|i| 0xFF00_0000 | (i * 97 + f as u32 * 13) & 0xFF_FFFF).collect();
                let raster = Raster::new(32, 32, ColorModel::Rgb24, pixels).unwrap();
                VideoFrame { carrier: DecodedCarrier::Direct { raster, format: MediaFormat::Png }, pts: f as u64 * 40 }
            })
            .collect()
    }

    #[test]
    fn every_frame_carries_payload() {
        for workers in [1, 4] {
            let pipeline = FramePipeline::new(PipelineConfig::default().with_workers(workers));
            let encoded = pipeline.encode_frames(frames(5), b"same everywhere", 8).unwrap();
            let pts: Vec<u64> = encoded.iter().map(|f| f.pts).collect();
            assert_eq!(pts, vec![0, 40, 80, 120, 160]);
            let decoded = pipeline.decode_frames(&encoded, 8).unwrap();
            assert_eq!(decoded.len(), 5);
            assert!(decoded.iter().all(|p| p == b"same everywhere"));
        }
    }

    #[test]
    fn failure_names_the_frame() {
        let pipeline = FramePipeline::new(PipelineConfig::default().with_workers(1));
        let mut input = frames(4);
        let encoded = pipeline.encode_frames(input.drain(..2).collect(), b"x", 1).unwrap();
        // Frames 2 and 3 carry nothing.
        let mixed: Vec<VideoFrame> = encoded.into_iter().chain(input).collect();
        let err = pipeline.decode_frames(&mixed, 1).unwrap_err();
        assert_eq!(err.frame_index(), Some(2));
        assert!(matches!(err.root(), StegoError::UnknownStegFormat));
    }

    #[test]
    fn cancelled_before_start() {
        let pipeline = FramePipeline::new(PipelineConfig::default().with_workers(1));
        let progress = Progress::default();
        progress.cancel();
        let err = pipeline.decode_frames_with_progress(&frames(2), 0, &progress).unwrap_err();
        assert!(matches!(err, StegoError::Cancelled));
    }

    #[test]
    fn progress_completes() {
        let pipeline = FramePipeline::new(PipelineConfig::default().with_workers(2));
        let progress = Progress::default();
        pipeline.encode_frames_with_progress(frames(3), b"p", 0, &progress).unwrap();
        assert_eq!(progress.get(), (3, 3));
    }

    #[test]
    fn decode_leaves_frames_untouched() {
        let pipeline = FramePipeline::new(PipelineConfig::default().with_encode_workers(1).with_decode_workers(3));
        let encoded = pipeline.encode_frames(frames(4), b"read only", 2).unwrap();
        let snapshot = encoded.clone();
        let decoded = pipeline.decode_frames(&encoded, 2).unwrap();
        assert!(decoded.iter().all(|p| p == b"read only"));
        assert_eq!(encoded, snapshot);
    }

    #[test]
    fn ordering_ignores_cancellation_noise() {
        let results: Vec<Result<u8>> = vec![
            Ok(1),
            Err(StegoError::Cancelled),
            Err(StegoError::ExhaustedCarrier.in_frame(2)),
            Err(StegoError::UnknownStegFormat.in_frame(3)),
        ];
        assert_eq!(collect_ordered(results).unwrap_err().frame_index(), Some(2));
        assert_eq!(collect_ordered(vec![Ok(1u8), Ok(2)]).unwrap(), vec![1, 2]);
    }
}
