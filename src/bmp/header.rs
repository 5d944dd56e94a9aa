//! Fixed-offset BMP header fields and derived row geometry.

use alloc::vec::Vec;
use std::io::{Read, Seek};

use super::utils::{read_u16_at, read_u32_at};
use crate::error::BitmapError;
use crate::limits::Limits;

// ── On-disk field offsets ───────────────────────────────────────────

pub const SIGNATURE_OFFSET: u64 = 0x00;
pub const DATA_OFFSET_OFFSET: u64 = 0x0A;
pub const WIDTH_OFFSET: u64 = 0x12;
pub const HEIGHT_OFFSET: u64 = 0x16;
pub const BITS_PER_PIXEL_OFFSET: u64 = 0x1C;
pub const COMPRESSION_OFFSET: u64 = 0x1E;

/// `BI_RGB`, the only compression value accepted.
pub const UNCOMPRESSED: u32 = 0;

// ── Bit depth ───────────────────────────────────────────────────────

/// The pixel depths the launcher's asset pipeline produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitDepth {
    /// 1bpp, eight pixels per byte, MSB first. Used for font sheets.
    Mono,
    /// 8bpp palette indices, passed through unresolved.
    Indexed,
    /// 16bpp 565 RGB, converted to the native packed pixel.
    HighColor,
}

impl BitDepth {
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            1 => Some(Self::Mono),
            8 => Some(Self::Indexed),
            16 => Some(Self::HighColor),
            _ => None,
        }
    }

    pub fn bits(self) -> u16 {
        match self {
            Self::Mono => 1,
            Self::Indexed => 8,
            Self::HighColor => 16,
        }
    }
}

// ── Descriptor ──────────────────────────────────────────────────────

/// A BMP image's header fields, derived geometry, and (once read) pixels.
///
/// Created empty with [`ImageDescriptor::default`], populated by
/// [`read_header`](crate::read_header), and given a pixel buffer by
/// [`read_pixels`](crate::read_pixels). The descriptor owns that buffer;
/// dropping the descriptor or calling [`release`](Self::release) frees it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u16,
    /// `bits_per_pixel >> 3`; zero for 1bpp.
    pub bytes_per_pixel: u16,
    /// Byte offset from the start of the file to the first pixel row.
    pub data_offset: u32,
    pub compression: u32,
    /// On-disk row length, rounded up to a 4-byte boundary. At 16bpp this is
    /// `ceil(width * 2 / 4) * 4`, so a 1-pixel row is 4 bytes.
    pub row_stride_padded: usize,
    /// Row length without padding; also the row length of the decoded buffer.
    pub row_stride_unpadded: usize,
    pub total_size: usize,
    /// Number of pixels, or for 1bpp images the packed byte count.
    pub pixel_count: usize,
    pixels: Option<Vec<u8>>,
}

impl ImageDescriptor {
    pub fn depth(&self) -> Option<BitDepth> {
        BitDepth::from_bits(self.bits_per_pixel)
    }

    /// Whether a header has been read (the data offset is known).
    pub fn has_header(&self) -> bool {
        self.data_offset > 0
    }

    /// Decoded pixels, top row first, or `None` before a pixel read completes.
    pub fn pixels(&self) -> Option<&[u8]> {
        self.pixels.as_deref()
    }

    /// One decoded row of `row_stride_unpadded` bytes.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        let stride = self.row_stride_unpadded;
        let start = (y as usize).checked_mul(stride)?;
        self.pixels()?.get(start..start.checked_add(stride)?)
    }

    /// A decoded 16bpp pixel in the native packed format.
    pub fn pixel_u16(&self, x: u32, y: u32) -> Option<u16> {
        if self.bits_per_pixel != 16 || x >= self.width {
            return None;
        }
        let at = x as usize * 2;
        let px = self.row(y)?.get(at..at + 2)?;
        Some(u16::from_ne_bytes([px[0], px[1]]))
    }

    /// Take ownership of the decoded pixels, leaving the descriptor without any.
    pub fn take_pixels(&mut self) -> Option<Vec<u8>> {
        self.pixels.take()
    }

    /// Free the pixel buffer. Header fields are kept.
    pub fn release(&mut self) {
        self.pixels = None;
    }

    pub(crate) fn set_pixels(&mut self, pixels: Vec<u8>) {
        self.pixels = Some(pixels);
    }
}

// ── Header reader ───────────────────────────────────────────────────

/// Read the header fields into `desc` and compute row geometry.
///
/// Fields are read with absolute seeks in file order, so the reader may be
/// positioned anywhere. On success any pixel buffer already in `desc` is
/// released; on failure `desc` is left as it was.
pub(crate) fn read_header<R: Read + Seek + ?Sized>(
    reader: &mut R,
    desc: &mut ImageDescriptor,
    limits: Option<&Limits>,
) -> Result<(), BitmapError> {
    let data_offset = read_u32_at(reader, DATA_OFFSET_OFFSET, "reading data offset")?;
    let width = read_u32_at(reader, WIDTH_OFFSET, "reading width")?;
    let height = read_u32_at(reader, HEIGHT_OFFSET, "reading height")?;
    let bits_per_pixel = read_u16_at(reader, BITS_PER_PIXEL_OFFSET, "reading bits per pixel")?;

    let depth = BitDepth::from_bits(bits_per_pixel)
        .ok_or(BitmapError::UnsupportedDepth(bits_per_pixel))?;

    let compression = read_u32_at(reader, COMPRESSION_OFFSET, "reading compression")?;
    if compression != UNCOMPRESSED {
        return Err(BitmapError::Compressed(compression));
    }

    let geometry = Geometry::new(width, height, depth)?;
    if let Some(limits) = limits {
        limits.check(width, height)?;
    }

    // Pixels from an earlier image no longer match the header.
    desc.release();
    desc.data_offset = data_offset;
    desc.width = width;
    desc.height = height;
    desc.bits_per_pixel = bits_per_pixel;
    desc.bytes_per_pixel = bits_per_pixel >> 3;
    desc.compression = compression;
    desc.row_stride_padded = geometry.row_stride_padded;
    desc.row_stride_unpadded = geometry.row_stride_unpadded;
    desc.total_size = geometry.total_size;
    desc.pixel_count = geometry.pixel_count;

    log::debug!(
        "bmp header: {}x{} {}bpp, data at {:#x}, rows {} / {} bytes padded",
        desc.width,
        desc.height,
        desc.bits_per_pixel,
        desc.data_offset,
        desc.row_stride_unpadded,
        desc.row_stride_padded,
    );
    Ok(())
}

/// Row and buffer sizes derived from width, height and depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Geometry {
    pub row_stride_padded: usize,
    pub row_stride_unpadded: usize,
    pub total_size: usize,
    pub pixel_count: usize,
}

impl Geometry {
    pub(crate) fn new(width: u32, height: u32, depth: BitDepth) -> Result<Self, BitmapError> {
        if width == 0 || height == 0 {
            return Err(BitmapError::InvalidDimensions { width, height });
        }
        let too_large = || BitmapError::DimensionsTooLarge { width, height };
        let w = width as usize;
        let h = height as usize;

        let row_bits = w
            .checked_mul(usize::from(depth.bits()))
            .ok_or_else(too_large)?;
        // Rows are padded to whole 32-bit words.
        let row_stride_padded = row_bits
            .checked_add(31)
            .ok_or_else(too_large)?
            / 32
            * 4;
        let row_stride_unpadded = row_bits.div_ceil(8);

        let pixels = w.checked_mul(h).ok_or_else(too_large)?;
        let (total_size, pixel_count) = match depth {
            BitDepth::Mono => {
                let packed = pixels.div_ceil(8);
                (packed, packed)
            }
            BitDepth::Indexed | BitDepth::HighColor => {
                let bytes = pixels
                    .checked_mul(usize::from(depth.bits() >> 3))
                    .ok_or_else(too_large)?;
                (bytes, pixels)
            }
        };
        // The decoded buffer holds every unpadded row.
        row_stride_unpadded.checked_mul(h).ok_or_else(too_large)?;

        Ok(Self {
            row_stride_padded,
            row_stride_unpadded,
            total_size,
            pixel_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_geometry() {
        let g = Geometry::new(16, 16, BitDepth::Mono).unwrap();
        assert_eq!(g.row_stride_unpadded, 2);
        assert_eq!(g.row_stride_padded, 4);
        assert_eq!(g.total_size, 32);
        assert_eq!(g.pixel_count, 32);

        let g = Geometry::new(33, 1, BitDepth::Mono).unwrap();
        assert_eq!(g.row_stride_unpadded, 5);
        assert_eq!(g.row_stride_padded, 8);
        assert_eq!(g.total_size, 5);
    }

    #[test]
    fn indexed_geometry_matches_word_rounding() {
        for w in 1..=9u32 {
            let g = Geometry::new(w, 3, BitDepth::Indexed).unwrap();
            assert_eq!(g.row_stride_unpadded, w as usize);
            assert_eq!(g.row_stride_padded, (w as usize).div_ceil(4) * 4);
            assert_eq!(g.total_size, w as usize * 3);
            assert_eq!(g.pixel_count, w as usize * 3);
        }
    }

    #[test]
    fn high_color_geometry() {
        let g = Geometry::new(3, 2, BitDepth::HighColor).unwrap();
        assert_eq!(g.row_stride_unpadded, 6);
        assert_eq!(g.row_stride_padded, 8);
        assert_eq!(g.total_size, 12);
        assert_eq!(g.pixel_count, 6);

        let g = Geometry::new(2, 2, BitDepth::HighColor).unwrap();
        assert_eq!(g.row_stride_unpadded, 4);
        assert_eq!(g.row_stride_padded, 4);

        // 2 bytes of pixel, 2 of padding
        let g = Geometry::new(1, 1, BitDepth::HighColor).unwrap();
        assert_eq!(g.row_stride_padded, 4);
    }

    #[test]
    fn padded_stride_is_word_aligned_and_covers_row() {
        for depth in [BitDepth::Mono, BitDepth::Indexed, BitDepth::HighColor] {
            for w in 1..=70u32 {
                let g = Geometry::new(w, 1, depth).unwrap();
                assert_eq!(g.row_stride_padded % 4, 0, "{depth:?} w={w}");
                assert!(g.row_stride_padded >= g.row_stride_unpadded, "{depth:?} w={w}");
            }
        }
    }

    #[test]
    fn pixel_u16_out_of_row_is_none() {
        let mut desc = ImageDescriptor {
            width: 4,
            height: 1,
            bits_per_pixel: 16,
            bytes_per_pixel: 2,
            row_stride_unpadded: 4,
            ..Default::default()
        };
        desc.set_pixels(alloc::vec![1, 0, 2, 0]);
        assert_eq!(desc.pixel_u16(1, 0), Some(u16::from_ne_bytes([2, 0])));
        // width claims 4 pixels but the row only holds 2
        assert_eq!(desc.pixel_u16(3, 0), None);
        assert_eq!(desc.pixel_u16(0, 1), None);
    }

    #[test]
    fn zero_dimensions_rejected() {
        assert!(matches!(
            Geometry::new(0, 4, BitDepth::Indexed),
            Err(BitmapError::InvalidDimensions { width: 0, height: 4 })
        ));
        assert!(matches!(
            Geometry::new(4, 0, BitDepth::Mono),
            Err(BitmapError::InvalidDimensions { .. })
        ));
    }
}
