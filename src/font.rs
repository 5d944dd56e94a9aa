//! Font sheets: monochrome bitmaps sliced into fixed-size glyph cells.
//!
//! Glyphs are stored as rows of planar bytes, one byte per plane, matching
//! the text VRAM layout of the launcher's display (four planes). Only plane 0
//! is filled from a 1bpp sheet; planes 1 to 3 are left zero for the renderer
//! to colour.

use alloc::vec::Vec;
use std::io::{Read, Seek};

use enough::Stop;

use crate::bmp::header::{BitDepth, ImageDescriptor};
use crate::decode::DecodeRequest;
use crate::error::BitmapError;

/// Planes per glyph row.
pub const GLYPH_PLANES: usize = 4;
/// A glyph row is one byte per plane.
pub const MAX_GLYPH_WIDTH: u32 = 8;
pub const MAX_GLYPH_HEIGHT: u32 = 16;

/// One glyph: `glyph_height` rows, each a byte per plane, left-justified
/// (bit 7 is the leftmost pixel).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Glyph {
    rows: Vec<[u8; GLYPH_PLANES]>,
}

impl Glyph {
    pub fn rows(&self) -> &[[u8; GLYPH_PLANES]] {
        &self.rows
    }

    /// The plane-0 byte of each row.
    pub fn bits(&self) -> impl Iterator<Item = u8> + '_ {
        self.rows.iter().map(|r| r[0])
    }
}

/// Glyphs cut from a font sheet, plus the character mapping the renderer
/// uses to find them.
///
/// `ascii_start`, `symbol_count` and `unknown_symbol` are set by the caller;
/// reading a font never changes them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FontTable {
    pub glyph_width: u32,
    pub glyph_height: u32,
    /// Character code of glyph 0.
    pub ascii_start: u8,
    /// Number of glyphs reachable through the character mapping.
    pub symbol_count: usize,
    /// Glyph used for characters outside the mapped range.
    pub unknown_symbol: usize,
    glyphs: Vec<Glyph>,
}

impl FontTable {
    pub fn with_mapping(mut self, ascii_start: u8, symbol_count: usize, unknown_symbol: usize) -> Self {
        self.ascii_start = ascii_start;
        self.symbol_count = symbol_count;
        self.unknown_symbol = unknown_symbol;
        self
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn glyph(&self, index: usize) -> Option<&Glyph> {
        self.glyphs.get(index)
    }

    /// Glyph for `c`, falling back to `unknown_symbol` for unmapped characters.
    pub fn glyph_for(&self, c: char) -> Option<&Glyph> {
        let mapped = self.symbol_count.min(self.glyphs.len());
        let index = (c as u32)
            .checked_sub(u32::from(self.ascii_start))
            .map(|i| i as usize)
            .filter(|&i| i < mapped)
            .unwrap_or(self.unknown_symbol);
        self.glyph(index)
    }
}

/// Decode a 1bpp sheet into `desc` and cut it into glyphs in row-major order.
pub(crate) fn read_font<R: Read + Seek + ?Sized>(
    reader: &mut R,
    desc: &mut ImageDescriptor,
    font: &mut FontTable,
    (glyph_width, glyph_height): (u32, u32),
    request: &DecodeRequest<'_>,
    stop: &dyn Stop,
) -> Result<(), BitmapError> {
    if !(1..=MAX_GLYPH_WIDTH).contains(&glyph_width) {
        return Err(BitmapError::GlyphWidth(glyph_width));
    }
    if !(1..=MAX_GLYPH_HEIGHT).contains(&glyph_height) {
        return Err(BitmapError::GlyphHeight(glyph_height));
    }

    request.read_header(reader, desc)?;
    if desc.depth() != Some(BitDepth::Mono) {
        return Err(BitmapError::UnsupportedDepth(desc.bits_per_pixel));
    }
    crate::bmp::decode::read_pixels(reader, desc, request.mapper, request.limits, stop)?;

    let pixels = desc.pixels().ok_or(BitmapError::HeaderNotLoaded)?;
    let glyphs = slice_glyphs(
        pixels,
        desc.row_stride_unpadded,
        (desc.width, desc.height),
        (glyph_width, glyph_height),
    );
    log::debug!(
        "font sheet: {} glyphs of {glyph_width}x{glyph_height}",
        glyphs.len()
    );

    font.glyph_width = glyph_width;
    font.glyph_height = glyph_height;
    font.glyphs = glyphs;
    Ok(())
}

fn slice_glyphs(
    pixels: &[u8],
    stride: usize,
    (width, height): (u32, u32),
    (glyph_width, glyph_height): (u32, u32),
) -> Vec<Glyph> {
    let columns = width / glyph_width;
    let rows = height / glyph_height;
    let mask = (0xFF00u16 >> glyph_width) as u8;

    let mut glyphs = Vec::with_capacity(columns as usize * rows as usize);
    for cell_row in 0..rows {
        for cell_col in 0..columns {
            let bit = (cell_col * glyph_width) as usize;
            let (byte, shift) = (bit / 8, bit % 8);
            let lines = (0..glyph_height)
                .map(|k| {
                    let line = (cell_row * glyph_height + k) as usize * stride;
                    let hi = pixels[line + byte];
                    // Cells that straddle a byte boundary pull the rest from the next byte.
                    let lo = if shift + glyph_width as usize > 8 {
                        pixels[line + byte + 1]
                    } else {
                        0
                    };
                    let word = (u16::from(hi) << 8) | u16::from(lo);
                    [((word << shift) >> 8) as u8 & mask, 0, 0, 0]
                })
                .collect();
            glyphs.push(Glyph { rows: lines });
        }
    }
    glyphs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_pixel_cells_copy_whole_bytes() {
        // 16x2 sheet, two 8x2 glyphs.
        let pixels = [0xAA, 0x0F, 0x55, 0xF0];
        let glyphs = slice_glyphs(&pixels, 2, (16, 2), (8, 2));
        assert_eq!(glyphs.len(), 2);
        assert_eq!(glyphs[0].bits().collect::<Vec<_>>(), [0xAA, 0x55]);
        assert_eq!(glyphs[1].bits().collect::<Vec<_>>(), [0x0F, 0xF0]);
        assert!(glyphs.iter().flat_map(|g| g.rows()).all(|r| r[1..] == [0, 0, 0]));
    }

    #[test]
    fn narrow_cells_are_left_justified() {
        // 12 pixels wide: two 6-pixel glyphs, 0b101101 and 0b110011.
        let row = 0b1011_0111u16 << 8 | 0b0011_0000;
        let pixels = row.to_be_bytes();
        let glyphs = slice_glyphs(&pixels, 2, (12, 1), (6, 1));
        assert_eq!(glyphs.len(), 2);
        assert_eq!(glyphs[0].rows()[0][0], 0b1011_0100);
        assert_eq!(glyphs[1].rows()[0][0], 0b1100_1100);
    }

    #[test]
    fn glyph_lookup_falls_back_to_unknown() {
        let mut font = FontTable::default().with_mapping(b' ', 3, 0);
        font.glyphs = (0..4u8)
            .map(|i| Glyph {
                rows: alloc::vec![[i, 0, 0, 0]],
            })
            .collect();
        assert_eq!(font.glyph_for('!').unwrap().rows()[0][0], 1);
        assert_eq!(font.glyph_for('"').unwrap().rows()[0][0], 2);
        // beyond symbol_count, and below ascii_start
        assert_eq!(font.glyph_for('#').unwrap().rows()[0][0], 0);
        assert_eq!(font.glyph_for('\n').unwrap().rows()[0][0], 0);
    }
}
