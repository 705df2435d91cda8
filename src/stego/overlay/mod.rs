// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Traversal orders over a carrier's units.
//!
//! An overlay hands out units one at a time (`next`) and writes a changed
//! value back to the unit it handed out last (`commit`). Encoder and decoder
//! must build the same overlay over the same carrier to visit units in the
//! same order.
//!
//! - [`SequenceOverlay`]: storage order, seed ignored.
//! - [`ShuffleOverlay`]: seeded permutation of every unit, or of every
//!   non-transparent unit via [`ShuffleOverlay::skip_transparent`].
//! - [`TableOverlay`]: seeded permutation of palette indices.

mod table;

pub use table::TableOverlay;

use crate::carrier::bytes::ByteCarrier;
use crate::carrier::raster::Raster;
use crate::stego::error::{Result, StegoError};
use crate::stego::permute::select_and_permute;

/// Cursor over a carrier's units.
pub trait Overlay {
    /// Units not yet visited.
    fn available(&self) -> usize;

    /// Return the next unit's value and advance.
    ///
    /// # Errors
    /// [`StegoError::ExhaustedCarrier`] once every unit has been visited.
    fn next(&mut self) -> Result<u32>;

    /// Replace the value of the unit most recently returned by [`next`](Self::next).
    fn commit(&mut self, value: u32);
}

/// Addressable units of a carrier.
pub trait UnitStore {
    fn unit_count(&self) -> usize;

    fn unit(&self, pos: usize) -> u32;

    fn set_unit(&mut self, pos: usize, value: u32);

    /// Whether the unit is a fully transparent pixel.
    fn is_transparent(&self, _pos: usize) -> bool {
        false
    }
}

impl UnitStore for Raster {
    fn unit_count(&self) -> usize {
        self.pixels().len()
    }

    fn unit(&self, pos: usize) -> u32 {
        self.pixels()[pos]
    }

    fn set_unit(&mut self, pos: usize, value: u32) {
        self.pixels_mut()[pos] = value;
    }

    fn is_transparent(&self, pos: usize) -> bool {
        self.model().has_alpha() && self.pixels()[pos] >> 24 == 0
    }
}

impl UnitStore for ByteCarrier {
    fn unit_count(&self) -> usize {
        self.len()
    }

    fn unit(&self, pos: usize) -> u32 {
        self.get(pos) as u32
    }

    fn set_unit(&mut self, pos: usize, value: u32) {
        self.set(pos, value as u8);
    }
}

/// Visit order plus position of the next unit in it.
#[derive(Debug)]
pub(crate) struct Cursor {
    order: Vec<usize>,
    next: usize,
}

impl Cursor {
    pub(crate) fn new(order: Vec<usize>) -> Self {
        Self { order, next: 0 }
    }

    pub(crate) fn available(&self) -> usize {
        self.order.len() - self.next
    }

    pub(crate) fn advance(&mut self) -> Result<usize> {
        let pos = *self.order.get(self.next).ok_or(StegoError::ExhaustedCarrier)?;
        self.next += 1;
        Ok(pos)
    }

    pub(crate) fn current(&self) -> Option<usize> {
        self.next.checked_sub(1).map(|i| self.order[i])
    }
}

/// Units in storage order.
pub struct SequenceOverlay<'a, S: UnitStore + ?Sized> {
    store: &'a mut S,
    cursor: Cursor,
}

impl<'a, S: UnitStore + ?Sized> SequenceOverlay<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        let cursor = Cursor::new((0..store.unit_count()).collect());
        Self { store, cursor }
    }
}

impl<S: UnitStore + ?Sized> Overlay for SequenceOverlay<'_, S> {
    fn available(&self) -> usize {
        self.cursor.available()
    }

    fn next(&mut self) -> Result<u32> {
        let pos = self.cursor.advance()?;
        Ok(self.store.unit(pos))
    }

    fn commit(&mut self, value: u32) {
        if let Some(pos) = self.cursor.current() {
            self.store.set_unit(pos, value);
        }
    }
}

/// Units in a seeded pseudo-random order.
pub struct ShuffleOverlay<'a, S: UnitStore + ?Sized> {
    store: &'a mut S,
    cursor: Cursor,
}

impl<'a, S: UnitStore + ?Sized> ShuffleOverlay<'a, S> {
    /// Permutation over every unit.
    pub fn new(store: &'a mut S, seed: u64) -> Self {
        let cursor = Cursor::new(select_and_permute(store.unit_count(), seed, |_| true));
        Self { store, cursor }
    }

    /// Permutation over units that are not fully transparent.
    ///
    /// Identical to [`new`](Self::new) on carriers without transparent units.
    pub fn skip_transparent(store: &'a mut S, seed: u64) -> Self {
        let order = {
            let view: &S = &*store;
            select_and_permute(view.unit_count(), seed, |p| !view.is_transparent(p))
        };
        Self { store, cursor: Cursor::new(order) }
    }
}

impl<S: UnitStore + ?Sized> Overlay for ShuffleOverlay<'_, S> {
    fn available(&self) -> usize {
        self.cursor.available()
    }

    fn next(&mut self) -> Result<u32> {
        let pos = self.cursor.advance()?;
        Ok(self.store.unit(pos))
    }

    fn commit(&mut self, value: u32) {
        if let Some(pos) = self.cursor.current() {
            self.store.set_unit(pos, value);
        }
    }
}
