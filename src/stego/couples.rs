// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Color couples: visually close palette colors of opposite parity.
//!
//! For every palette color, the builder collects the other palette colors
//! whose red, green and blue each differ by at most [`COUPLE_TOLERANCE`] and
//! whose parity bit differs. Swapping a pixel to one of its couples flips
//! the bit it represents without a visible change. Colors with no couple are
//! left out of the map.
//!
//! The scan is quadratic in palette size, which is at most 256 for GIF.

use std::collections::HashMap;

use crate::carrier::raster::unpack_argb;
use crate::stego::codec::unit_parity;

/// Largest per-channel difference between coupled colors.
pub const COUPLE_TOLERANCE: u8 = 8;

/// Map from a palette color to its opposite-parity neighbours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorCouples {
    couples: HashMap<u32, Vec<u32>>,
}

impl ColorCouples {
    /// Build couples with the default tolerance.
    pub fn build(palette: &[u32]) -> Self {
        Self::with_tolerance(palette, COUPLE_TOLERANCE)
    }

    pub fn with_tolerance(palette: &[u32], tolerance: u8) -> Self {
        let mut couples = HashMap::new();
        for &color in palette {
            if couples.contains_key(&color) {
                continue;
            }
            let parity = unit_parity(color);
            let mut partners: Vec<u32> = Vec::new();
            for &other in palette {
                if other != color
                    && unit_parity(other) != parity
                    && within(color, other, tolerance)
                    && !partners.contains(&other)
                {
                    partners.push(other);
                }
            }
            if !partners.is_empty() {
                couples.insert(color, partners);
            }
        }
        Self { couples }
    }

    /// Opposite-parity neighbours of `color`, if any.
    pub fn partners(&self, color: u32) -> Option<&[u32]> {
        self.couples.get(&color).map(Vec::as_slice)
    }

    /// Number of colors that have at least one couple.
    pub fn len(&self) -> usize {
        self.couples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.couples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u32])> {
        self.couples.iter().map(|(&c, p)| (c, p.as_slice()))
    }
}

/// Red, green and blue each within `tolerance`.
fn within(a: u32, b: u32, tolerance: u8) -> bool {
    let [_, ar, ag, ab] = unpack_argb(a);
    let [_, br, bg, bb] = unpack_argb(b);
    ar.abs_diff(br) <= tolerance && ag.abs_diff(bg) <= tolerance && ab.abs_diff(bb) <= tolerance
}
