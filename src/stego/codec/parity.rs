// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Parity-flip codec for direct-color pixels and plain bytes.

use rand::Rng;
use rand_chacha::ChaCha20Rng;

use super::{bits_to_byte, byte_bits, check_capacity, check_remaining, unit_parity, BitCodec};
use crate::stego::error::{Result, StegoError};
use crate::stego::overlay::Overlay;
use crate::stego::permute::mutation_rng;

const ALPHA_SHIFT: u32 = 24;

/// Encodes one bit per unit in the parity of its channel bytes.
///
/// Flipping a unit adds or subtracts 1 on exactly one randomly chosen
/// channel: `-1` at 255, `+1` at 0, otherwise a coin toss. An alpha byte
/// of 1 is always raised, so a visible pixel never becomes fully
/// transparent (which would change the skip-transparent traversal).
pub struct ParityCodec<O: Overlay> {
    overlay: O,
    channels: u32,
    rng: ChaCha20Rng,
}

impl<O: Overlay> ParityCodec<O> {
    /// Wrap `overlay` for units of `bits_per_unit` bits (8, 24 or 32).
    ///
    /// # Errors
    /// [`StegoError::UnsupportedCarrierType`] for any other unit size.
    pub fn new(overlay: O, bits_per_unit: u32, seed: u64) -> Result<Self> {
        let channels = match bits_per_unit {
            8 | 24 | 32 => bits_per_unit / 8,
            other => {
                return Err(StegoError::UnsupportedCarrierType(format!(
                    "{other}-bit units cannot carry parity bits"
                )))
            }
        };
        Ok(Self { overlay, channels, rng: mutation_rng(seed) })
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    /// Flip the parity of `unit` by changing one channel by ±1.
    fn flip(&mut self, unit: u32) -> u32 {
        let shift = self.rng.gen_range(0..self.channels) * 8;
        let channel = (unit >> shift) & 0xFF;
        let raised = match channel {
            0xFF => false,
            0 => true,
            1 if shift == ALPHA_SHIFT => true,
            _ => self.rng.gen_bool(0.5),
        };
        let changed = if raised { channel + 1 } else { channel - 1 };
        (unit & !(0xFF << shift)) | (changed << shift)
    }
}

impl<O: Overlay> BitCodec for ParityCodec<O> {
    fn available(&self) -> usize {
        self.overlay.available()
    }

    fn encode(&mut self, payload: &[u8]) -> Result<()> {
        check_capacity(payload.len(), self.overlay.available())?;
        for &byte in payload {
            for bit in byte_bits(byte) {
                let unit = self.overlay.next()?;
                if unit_parity(unit) != bit {
                    let flipped = self.flip(unit);
                    self.overlay.commit(flipped);
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
                *bit = unit_parity(self.overlay.next()?);
            }
            out.push(bits_to_byte(bits));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::bytes::ByteCarrier;
    use crate::carrier::raster::{unpack_argb, ColorModel, Raster};
    use crate::stego::overlay::{SequenceOverlay, ShuffleOverlay};

    fn raster(model: ColorModel, pixels: Vec<u32>) -> Raster {
        let n = pixels.len() as u32;
        Raster::new(n, 1, model, pixels).unwrap()
    }

    #[test]
    fn roundtrip_over_pixels() {
        let pixels: Vec<u32> = (0..400u32).map(|i| 0xFF00_0000 | i.wrapping_mul(2_654_435_761) & 0xFF_FFFF).collect();
        let mut r = raster(ColorModel::Rgb24, pixels);
        let payload = b"parity bits";
        ParityCodec::new(ShuffleOverlay::new(&mut r, 77), 24, 77).unwrap().encode(payload).unwrap();
        let decoded = ParityCodec::new(ShuffleOverlay::new(&mut r, 77), 24, 77).unwrap().decode(payload.len()).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn roundtrip_over_bytes() {
        let mut carrier = ByteCarrier::whole((0..=255u8).collect());
        ParityCodec::new(SequenceOverlay::new(&mut carrier), 8, 1).unwrap().encode(&[0xA5, 0x0F]).unwrap();
        let decoded = ParityCodec::new(SequenceOverlay::new(&mut carrier), 8, 1).unwrap().decode(2).unwrap();
        assert_eq!(decoded, vec![0xA5, 0x0F]);
    }

    #[test]
    fn channels_stay_in_range() {
        // Extreme channel values: every flip must move towards the interior.
        let original: Vec<u32> = (0..256u32)
            .map(|i| match i % 4 {
                0 => 0xFF00_0000,
                1 => 0xFFFF_FFFF,
                2 => 0x01FF_00FF,
                _ => 0x0100_FF00,
            })
            .collect();
        let mut r = raster(ColorModel::Argb32, original.clone());
        let payload: Vec<u8> = (0..32u8).map(|i| i.wrapping_mul(37)).collect();
        ParityCodec::new(ShuffleOverlay::skip_transparent(&mut r, 5), 32, 5).unwrap().encode(&payload).unwrap();

        for (before, after) in original.iter().zip(r.pixels()) {
            let b = unpack_argb(*before);
            let a = unpack_argb(*after);
            let changed = (0..4).filter(|&c| a[c] != b[c]).count();
            assert!(changed <= 1);
            for c in 0..4 {
                assert!((a[c] as i16 - b[c] as i16).abs() <= 1, "{before:08X} -> {after:08X}");
            }
            assert_ne!(a[0], 0, "visible pixel became transparent");
        }
    }

    #[test]
    fn rgb_never_touches_alpha() {
        let mut r = raster(ColorModel::Rgb24, vec![0xFF80_8080; 128]);
        ParityCodec::new(ShuffleOverlay::new(&mut r, 9), 24, 9).unwrap().encode(&[0x55; 16]).unwrap();
        assert!(r.pixels().iter().all(|p| p >> 24 == 0xFF));
    }

    #[test]
    fn capacity_checked_before_writing() {
        let mut r = raster(ColorModel::Rgb24, vec![0xFF10_1010; 16]);
        let mut codec = ParityCodec::new(SequenceOverlay::new(&mut r), 24, 0).unwrap();
        let err = codec.encode(&[0xFF, 0xFF, 0xFF]).unwrap_err();
        assert!(matches!(err, StegoError::CapacityExceeded { needed: 24, available: 16 }));
        assert_eq!(codec.available(), 16);
        drop(codec);
        assert!(r.pixels().iter().all(|&p| p == 0xFF10_1010));
    }

    #[test]
    fn decode_past_end_fails() {
        let mut carrier = ByteCarrier::whole(vec![0; 15]);
        let mut codec = ParityCodec::new(SequenceOverlay::new(&mut carrier), 8, 0).unwrap();
        assert_eq!(codec.decode(1).unwrap(), vec![0]);
        assert!(matches!(codec.decode(1), Err(StegoError::ExhaustedCarrier)));
    }

    #[test]
    fn rejects_other_depths() {
        let mut carrier = ByteCarrier::whole(vec![0; 4]);
        assert!(matches!(
            ParityCodec::new(SequenceOverlay::new(&mut carrier), 16, 0),
            Err(StegoError::UnsupportedCarrierType(_))
        ));
    }

    #[test]
    fn flip_changes_parity() {
        let mut carrier = ByteCarrier::whole(vec![]);
        let mut codec = ParityCodec::new(SequenceOverlay::new(&mut carrier), 32, 3).unwrap();
        for unit in [0u32, 0xFFFF_FFFF, 0x0101_0101, 0x7F80_00FF, 0x0012_3456] {
            let flipped = codec.flip(unit);
            assert_ne!(unit_parity(unit), unit_parity(flipped));
        }
    }
}
