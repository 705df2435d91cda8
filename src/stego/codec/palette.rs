// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Palette-swap codec for indexed images.

use rand::Rng;
use rand_chacha::ChaCha20Rng;

use super::{bits_to_byte, byte_bits, check_capacity, check_remaining, unit_parity, BitCodec};
use crate::stego::couples::ColorCouples;
use crate::stego::error::{Result, StegoError};
use crate::stego::overlay::{Overlay, TableOverlay};
use crate::stego::permute::mutation_rng;

/// Encodes one bit per pixel in the parity of the pixel's palette color.
///
/// A pixel whose parity must change is switched to a randomly chosen
/// couple of its color (see [`ColorCouples`]); the palette itself is never
/// modified. The couple map is built on the first flip, from every palette
/// entry except a GIF transparent index.
///
/// Unlike [`ParityCodec`](super::ParityCodec), an encode can fail part way
/// through with [`StegoError::NoCoupleAvailable`], leaving earlier pixels
/// already switched.
pub struct PaletteCodec<'a> {
    overlay: TableOverlay<'a>,
    couples: Option<ColorCouples>,
    rng: ChaCha20Rng,
}

impl<'a> PaletteCodec<'a> {
    pub fn new(overlay: TableOverlay<'a>, seed: u64) -> Self {
        Self { overlay, couples: None, rng: mutation_rng(seed) }
    }

    /// Palette index whose color is a couple of `index`'s color.
    fn swap(&mut self, index: u32) -> Result<u32> {
        let color = self.overlay.color(index);
        let couples = self.couples.get_or_insert_with(|| ColorCouples::build(&self.overlay.opaque_colors()));
        let partners = couples
            .partners(color)
            .ok_or(StegoError::NoCoupleAvailable { color: color & 0x00FF_FFFF })?;
        let pick = partners[self.rng.gen_range(0..partners.len() as u32) as usize];
        self.overlay
            .index_of(pick)
            .ok_or(StegoError::NoCoupleAvailable { color: color & 0x00FF_FFFF })
    }
}

impl BitCodec for PaletteCodec<'_> {
    fn available(&self) -> usize {
        self.overlay.available()
    }

    fn encode(&mut self, payload: &[u8]) -> Result<()> {
        check_capacity(payload.len(), self.overlay.available())?;
        for &byte in payload {
            for bit in byte_bits(byte) {
                let index = self.overlay.next()?;
                if unit_parity(self.overlay.color(index)) != bit {
                    let swapped = self.swap(index)?;
                    self.overlay.commit(swapped);
                }
            }
        }
        Ok(())
    }

    fn decode(&mut self, length: usize) -> Result<Vec<u8>> {
        check_remaining(length, self.overlay.available())?;
        let mut out = Vec::with_capacity(length);
        for _ in 0..length {
            let mut bits = [false; 8];
            for bit in &mut bits {
                let index = self.overlay.next()?;
                *bit = unit_parity(self.overlay.color(index));
            }
            out.push(bits_to_byte(bits));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::raster::{pack_argb, IndexedRaster};

    /// 16 colors where entry 2k and 2k+1 differ by 1 in red.
    fn coupled_palette() -> Vec<u32> {
        (0..8u8).flat_map(|k| [pack_argb(0xFF, k * 30, 40, 40), pack_argb(0xFF, k * 30 + 1, 40, 40)]).collect()
    }

    fn raster(palette: Vec<u32>, n: u32) -> IndexedRaster {
        let entries = palette.len() as u32;
        IndexedRaster::new(n, 1, (0..n).map(|i| (i * 7 % entries) as u8).collect(), palette).unwrap()
    }

    #[test]
    fn roundtrip_keeps_palette() {
        let palette = coupled_palette();
        let mut r = raster(palette.clone(), 300);
        let payload = b"indexed!";
        PaletteCodec::new(TableOverlay::new(&mut r, 21), 21).encode(payload).unwrap();
        assert_eq!(r.palette(), palette.as_slice());
        let decoded = PaletteCodec::new(TableOverlay::new(&mut r, 21), 21).decode(payload.len()).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn swaps_stay_within_couples() {
        let palette = coupled_palette();
        let original = raster(palette.clone(), 256);
        let mut r = original.clone();
        PaletteCodec::new(TableOverlay::new(&mut r, 4), 4).encode(&[0x3C; 32]).unwrap();
        for (before, after) in original.indices().iter().zip(r.indices()) {
            assert!(before == after || before / 2 == after / 2, "{before} -> {after}");
        }
    }

    #[test]
    fn missing_couple_reported() {
        // Two far apart colors of opposite parity: neither has a couple.
        let palette = vec![pack_argb(0xFF, 0, 0, 0), pack_argb(0xFF, 201, 0, 0)];
        let mut r = IndexedRaster::new(64, 1, vec![0; 64], palette).unwrap();
        // Opaque black has parity 1, so writing zeros forces a swap.
        let err = PaletteCodec::new(TableOverlay::new(&mut r, 0), 0).encode(&[0x00]).unwrap_err();
        assert!(matches!(err, StegoError::NoCoupleAvailable { color: 0 }));
    }

    #[test]
    fn matching_parity_needs_no_couple() {
        let palette = vec![pack_argb(0xFF, 0, 0, 0)];
        let mut r = IndexedRaster::new(16, 1, vec![0; 16], palette).unwrap();
        PaletteCodec::new(TableOverlay::new(&mut r, 0), 0).encode(&[0xFF, 0xFF]).unwrap();
        assert!(r.indices().iter().all(|&i| i == 0));
    }

    #[test]
    fn transparent_index_stays_out_of_play() {
        // Entry 0 is transparent; entry 2 shows the same black but opaque.
        let palette = vec![pack_argb(0xFF, 0, 0, 0), pack_argb(0xFF, 1, 0, 0), pack_argb(0xFF, 0, 0, 0)];
        let indices: Vec<u8> = (0..240u32).map(|i| (i * 7 % 3) as u8).collect();
        let original = IndexedRaster::new(240, 1, indices, palette).unwrap();
        let mut r = original.clone();

        let payload = [0x5A, 0xC3, 0x0F, 0x99, 0x00, 0xFF];
        PaletteCodec::new(TableOverlay::skip_transparent(&mut r, 12, Some(0)), 12).encode(&payload).unwrap();
        for (&before, &after) in original.indices().iter().zip(r.indices()) {
            assert_eq!(before == 0, after == 0, "{before} -> {after}");
        }
        assert_ne!(r, original);

        let decoded = PaletteCodec::new(TableOverlay::skip_transparent(&mut r, 12, Some(0)), 12)
            .decode(payload.len())
            .unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn capacity_checked_first() {
        let mut r = raster(coupled_palette(), 20);
        let before = r.clone();
        let err = PaletteCodec::new(TableOverlay::new(&mut r, 0), 0).encode(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, StegoError::CapacityExceeded { needed: 24, available: 20 }));
        assert_eq!(r, before);
    }
}
