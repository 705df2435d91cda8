// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Palette-index traversal for indexed images.

use super::{Cursor, Overlay};
use crate::carrier::raster::IndexedRaster;
use crate::stego::error::Result;
use crate::stego::permute::select_and_permute;

/// Seeded traversal whose units are palette indices.
///
/// `next` yields the pixel's index (not its color) and `commit` replaces
/// the index, so a pixel only ever changes to another palette entry.
///
/// A GIF transparent index is off limits in both directions: pixels showing
/// it are never visited, and it is never offered as a replacement.
pub struct TableOverlay<'a> {
    raster: &'a mut IndexedRaster,
    transparent: Option<u8>,
    cursor: Cursor,
}

impl<'a> TableOverlay<'a> {
    pub fn new(raster: &'a mut IndexedRaster, seed: u64) -> Self {
        Self::skip_transparent(raster, seed, None)
    }

    /// Traversal that leaves pixels showing `transparent` alone.
    pub fn skip_transparent(raster: &'a mut IndexedRaster, seed: u64, transparent: Option<u8>) -> Self {
        let indices = raster.indices();
        let cursor = Cursor::new(select_and_permute(indices.len(), seed, |pos| Some(indices[pos]) != transparent));
        Self { raster, transparent, cursor }
    }

    pub fn palette(&self) -> &[u32] {
        self.raster.palette()
    }

    /// Colors a pixel may be switched to: every entry but the transparent one.
    pub fn opaque_colors(&self) -> Vec<u32> {
        self.palette_entries().map(|(_, color)| color).collect()
    }

    /// Color of a palette index.
    pub fn color(&self, index: u32) -> u32 {
        self.raster.palette_color(index as u8)
    }

    /// First non-transparent palette index showing `color`.
    pub fn index_of(&self, color: u32) -> Option<u32> {
        self.palette_entries().find(|&(_, c)| c == color).map(|(i, _)| i as u32)
    }

    fn palette_entries(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        let transparent = self.transparent.map(usize::from);
        self.raster
            .palette()
            .iter()
            .enumerate()
            .filter(move |&(i, _)| Some(i) != transparent)
            .map(|(i, &c)| (i, c))
    }
}

impl Overlay for TableOverlay<'_> {
    fn available(&self) -> usize {
        self.cursor.available()
    }

    fn next(&mut self) -> Result<u32> {
        let pos = self.cursor.advance()?;
        Ok(self.raster.indices()[pos] as u32)
    }

    fn commit(&mut self, index: u32) {
        if let Some(pos) = self.cursor.current() {
            debug_assert!(index <= u8::MAX as u32, "palette index out of range");
            self.raster.indices_mut()[pos] = index as u8;
        }
    }
}
