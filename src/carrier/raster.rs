// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Decoded pixel grids.
//!
//! Direct-color pixels are packed as `0xAA_RR_GG_BB` in a `u32`. 24-bit
//! rasters carry a constant alpha byte of `0xFF` so every unit has the same
//! four-byte layout regardless of depth. Indexed rasters store one palette
//! index per pixel next to the palette they refer to.

use image::{DynamicImage, RgbImage, RgbaImage};

use super::error::{CarrierError, Result};

/// Color-model descriptor of a decoded carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorModel {
    /// 8 bits per channel, no alpha.
    Rgb24,
    /// 8 bits per channel with alpha.
    Argb32,
    /// 8-bit palette indices.
    Indexed,
}

impl ColorModel {
    /// Bits per unit as the codec sees it.
    pub fn bit_depth(self) -> u32 {
        match self {
            Self::Rgb24 => 24,
            Self::Argb32 => 32,
            Self::Indexed => 8,
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(self, Self::Argb32)
    }

    pub fn is_indexed(self) -> bool {
        matches!(self, Self::Indexed)
    }
}

/// Pack four channel bytes into one unit.
#[inline]
pub fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Split a unit into `[a, r, g, b]`.
#[inline]
pub fn unpack_argb(pixel: u32) -> [u8; 4] {
    pixel.to_be_bytes()
}

/// A direct-color raster (24 or 32 bits per pixel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    model: ColorModel,
    pixels: Vec<u32>,
}

impl Raster {
    /// Build a raster from packed pixels in row-major order.
    ///
    /// `model` must be a direct-color model; indexed data belongs in
    /// [`IndexedRaster`].
    pub fn new(width: u32, height: u32, model: ColorModel, pixels: Vec<u32>) -> Result<Self> {
        if model.is_indexed() {
            return Err(CarrierError::UnsupportedLayout(
                "indexed pixels in a direct-color raster".into(),
            ));
        }
        if pixels.len() as u64 != width as u64 * height as u64 {
            return Err(CarrierError::DimensionMismatch { width, height, len: pixels.len() });
        }
        Ok(Self { width, height, model, pixels })
    }

    pub fn from_rgb8(img: &RgbImage) -> Self {
        let pixels = img.pixels().map(|p| pack_argb(0xFF, p[0], p[1], p[2])).collect();
        Self { width: img.width(), height: img.height(), model: ColorModel::Rgb24, pixels }
    }

    pub fn from_rgba8(img: &RgbaImage) -> Self {
        let pixels = img.pixels().map(|p| pack_argb(p[3], p[0], p[1], p[2])).collect();
        Self { width: img.width(), height: img.height(), model: ColorModel::Argb32, pixels }
    }

    /// Convert back to an `image` buffer matching the color model.
    pub fn to_dynamic(&self) -> DynamicImage {
        let w = self.width as usize;
        match self.model {
            ColorModel::Argb32 => DynamicImage::ImageRgba8(RgbaImage::from_fn(
                self.width,
                self.height,
                |x, y| {
                    let [a, r, g, b] = unpack_argb(self.pixels[y as usize * w + x as usize]);
                    image::Rgba([r, g, b, a])
                },
            )),
            // Indexed is rejected in `new`, so anything else is 24-bit.
            _ => DynamicImage::ImageRgb8(RgbImage::from_fn(self.width, self.height, |x, y| {
                let [_, r, g, b] = unpack_argb(self.pixels[y as usize * w + x as usize]);
                image::Rgb([r, g, b])
            })),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn model(&self) -> ColorModel {
        self.model
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Number of fully transparent pixels (always 0 without alpha).
    pub fn transparent_count(&self) -> usize {
        if !self.model.has_alpha() {
            return 0;
        }
        self.pixels.iter().filter(|&&p| p >> 24 == 0).count()
    }
}

/// A palette-indexed raster.
///
/// Palette entries are packed like direct pixels with an opaque alpha byte:
/// `0xFF_RR_GG_BB`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRaster {
    width: u32,
    height: u32,
    indices: Vec<u8>,
    palette: Vec<u32>,
}

impl IndexedRaster {
    pub fn new(width: u32, height: u32, indices: Vec<u8>, palette: Vec<u32>) -> Result<Self> {
        if indices.len() as u64 != width as u64 * height as u64 {
            return Err(CarrierError::DimensionMismatch { width, height, len: indices.len() });
        }
        Ok(Self { width, height, indices, palette })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub fn indices_mut(&mut self) -> &mut [u8] {
        &mut self.indices
    }

    pub fn palette(&self) -> &[u32] {
        &self.palette
    }

    /// Color shown by the pixel at `pos`. Out-of-table indices read as black.
    pub fn color_at(&self, pos: usize) -> u32 {
        self.palette_color(self.indices[pos])
    }

    pub fn palette_color(&self, index: u8) -> u32 {
        self.palette.get(index as usize).copied().unwrap_or(0xFF00_0000)
    }

    /// First palette index holding `color`.
    pub fn index_of(&self, color: u32) -> Option<u8> {
        self.palette.iter().position(|&c| c == color).map(|i| i as u8)
    }

    /// Palette as a flat `RGBRGB...` byte list (GIF table layout).
    pub fn palette_rgb(&self) -> Vec<u8> {
        self.palette.iter().flat_map(|&c| {
            let [_, r, g, b] = unpack_argb(c);
            [r, g, b]
        }).collect()
    }
}

/// Pack a flat `RGBRGB...` table into opaque units.
pub fn palette_from_rgb(rgb: &[u8]) -> Vec<u32> {
    rgb.chunks_exact(3).map(|c| pack_argb(0xFF, c[0], c[1], c[2])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack() {
        let p = pack_argb(0x12, 0x34, 0x56, 0x78);
        assert_eq!(p, 0x1234_5678);
        assert_eq!(unpack_argb(p), [0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn rgb_roundtrip_through_image() {
        let img = RgbImage::from_fn(3, 2, |x, y| image::Rgb([x as u8, y as u8, 200]));
        let raster = Raster::from_rgb8(&img);
        assert_eq!(raster.model(), ColorModel::Rgb24);
        assert_eq!(raster.pixels()[4], pack_argb(0xFF, 1, 1, 200));
        match raster.to_dynamic() {
            DynamicImage::ImageRgb8(back) => assert_eq!(back, img),
            other => panic!("expected rgb8, got {:?}", other.color()),
        }
    }

    #[test]
    fn rgba_keeps_alpha() {
        let img = RgbaImage::from_fn(2, 2, |x, _| image::Rgba([1, 2, 3, if x == 0 { 0 } else { 255 }]));
        let raster = Raster::from_rgba8(&img);
        assert_eq!(raster.transparent_count(), 2);
        match raster.to_dynamic() {
            DynamicImage::ImageRgba8(back) => assert_eq!(back, img),
            other => panic!("expected rgba8, got {:?}", other.color()),
        }
    }

    #[test]
    fn dimension_mismatch_rejected() {
        assert!(matches!(
            Raster::new(4, 4, ColorModel::Rgb24, vec![0; 15]),
            Err(CarrierError::DimensionMismatch { .. })
        ));
        assert!(Raster::new(1, 1, ColorModel::Indexed, vec![0]).is_err());
        assert!(IndexedRaster::new(2, 2, vec![0; 3], vec![]).is_err());
    }

    #[test]
    fn palette_lookup() {
        let palette = palette_from_rgb(&[0, 0, 0, 10, 20, 30, 10, 20, 30]);
        let raster = IndexedRaster::new(1, 1, vec![2], palette).unwrap();
        assert_eq!(raster.color_at(0), 0xFF0A_141E);
        assert_eq!(raster.index_of(0xFF0A_141E), Some(1));
        assert_eq!(raster.palette_color(9), 0xFF00_0000);
        assert_eq!(raster.palette_rgb().len(), 9);
    }
}
