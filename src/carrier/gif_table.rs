// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! GIF logical screen and global color table parsing.
//!
//! Reads the palette straight from the file bytes, independent of any
//! decoded raster:
//!
//! ```text
//! [6 bytes] "GIF89a"
//! [2 bytes] logical screen width  (little-endian)
//! [2 bytes] logical screen height (little-endian)
//! [1 byte ] packed fields: bit 7 = global table present, bits 0-2 = size exponent
//! [1 byte ] background color index
//! [1 byte ] pixel aspect ratio
//! [3 * 2^(exponent+1) bytes] global color table, RGB triples
//! ```

use super::error::{CarrierError, Result};
use super::raster::palette_from_rgb;

/// File signature accepted by the parser.
pub const GIF89A_SIGNATURE: [u8; 6] = *b"GIF89a";

const PACKED_FIELDS_OFFSET: usize = 10;
const BACKGROUND_OFFSET: usize = 11;
const GLOBAL_TABLE_OFFSET: usize = 13;
const GLOBAL_TABLE_FLAG: u8 = 0x80;
const TABLE_SIZE_MASK: u8 = 0x07;

/// Header fields preceding the first image block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalScreen {
    pub width: u16,
    pub height: u16,
    /// Raw packed-fields byte.
    pub flags: u8,
    pub background_index: u8,
    /// Global palette as `0xFF_RR_GG_BB` entries, if the file declares one.
    pub global_table: Option<Vec<u32>>,
}

impl LogicalScreen {
    pub fn has_global_table(&self) -> bool {
        self.flags & GLOBAL_TABLE_FLAG != 0
    }

    /// Number of entries the size exponent declares.
    pub fn declared_table_len(&self) -> usize {
        1 << ((self.flags & TABLE_SIZE_MASK) + 1)
    }
}

/// Parse the logical screen descriptor and global color table.
///
/// # Errors
/// - [`CarrierError::NotAPaletteImage`] if the GIF89a signature is missing.
/// - [`CarrierError::Truncated`] if the header or table runs past the data.
pub fn parse_logical_screen(gif: &[u8]) -> Result<LogicalScreen> {
    if gif.len() <= GIF89A_SIGNATURE.len() || gif[..6] != GIF89A_SIGNATURE {
        return Err(CarrierError::NotAPaletteImage);
    }
    if gif.len() < GLOBAL_TABLE_OFFSET {
        return Err(CarrierError::Truncated(gif.len()));
    }

    let mut screen = LogicalScreen {
        width: u16::from_le_bytes([gif[6], gif[7]]),
        height: u16::from_le_bytes([gif[8], gif[9]]),
        flags: gif[PACKED_FIELDS_OFFSET],
        background_index: gif[BACKGROUND_OFFSET],
        global_table: None,
    };

    if screen.has_global_table() {
        let end = GLOBAL_TABLE_OFFSET + screen.declared_table_len() * 3;
        let table = gif.get(GLOBAL_TABLE_OFFSET..end).ok_or(CarrierError::Truncated(gif.len()))?;
        screen.global_table = Some(palette_from_rgb(table));
    }
    Ok(screen)
}

/// Extract only the global color table.
///
/// Returns `Ok(None)` when the file is a GIF89a without a global table;
/// callers treat that as "palette mode unavailable".
pub fn parse_color_table(gif: &[u8]) -> Result<Option<Vec<u32>>> {
    Ok(parse_logical_screen(gif)?.global_table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(flags: u8, table: &[u8]) -> Vec<u8> {
        let mut gif = b"GIF89a".to_vec();
        gif.extend_from_slice(&[4, 0, 3, 0, flags, 0, 0]);
        gif.extend_from_slice(table);
        gif.push(0x3B);
        gif
    }

    #[test]
    fn reads_global_table() {
        // exponent 0 -> 2 entries
        let gif = header(0x80, &[255, 0, 0, 0, 128, 255]);
        let screen = parse_logical_screen(&gif).unwrap();
        assert_eq!((screen.width, screen.height), (4, 3));
        assert!(screen.has_global_table());
        assert_eq!(screen.global_table, Some(vec![0xFFFF_0000, 0xFF00_80FF]));
    }

    #[test]
    fn table_size_from_exponent() {
        let table: Vec<u8> = (0..8 * 3).map(|i| i as u8).collect();
        let gif = header(0x82, &table);
        let colors = parse_color_table(&gif).unwrap().unwrap();
        assert_eq!(colors.len(), 8);
        assert_eq!(colors[7], 0xFF15_1617);
    }

    #[test]
    fn no_global_table_is_empty() {
        let gif = header(0x00, &[]);
        assert_eq!(parse_color_table(&gif).unwrap(), None);
    }

    #[test]
    fn rejects_other_signatures() {
        let mut gif = header(0x80, &[0; 6]);
        gif[4] = b'7';
        assert!(matches!(parse_color_table(&gif), Err(CarrierError::NotAPaletteImage)));
        assert!(matches!(parse_color_table(b"\x89PNG\r\n\x1a\n"), Err(CarrierError::NotAPaletteImage)));
        assert!(matches!(parse_color_table(b"GIF89a"), Err(CarrierError::NotAPaletteImage)));
    }

    #[test]
    fn truncated_table() {
        let gif = b"GIF89a\x01\x00\x01\x00\x87\x00\x00\x00\x00\x00".to_vec();
        assert!(matches!(parse_color_table(&gif), Err(CarrierError::Truncated(_))));
    }
}
