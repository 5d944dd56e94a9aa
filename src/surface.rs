//! An in-memory 16-bit framebuffer that decoded images can be placed on.

use alloc::vec;
use alloc::vec::Vec;

use crate::bmp::header::{BitDepth, ImageDescriptor};
use crate::bmp::stream::RowSink;
use crate::error::BitmapError;

/// A `width` x `height` grid of native 16-bit pixels.
///
/// Writes outside the surface are clipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u16>,
}

impl Surface {
    /// A cleared surface.
    ///
    /// # Panics
    ///
    /// If `width * height` pixels cannot be allocated. Use
    /// [`try_new`](Self::try_new) for untrusted sizes.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize).saturating_mul(height as usize);
        Self {
            width,
            height,
            pixels: vec![0; len],
        }
    }

    /// A cleared surface, or an error if its size overflows or the
    /// allocation fails.
    pub fn try_new(width: u32, height: u32) -> Result<Self, BitmapError> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| BitmapError::OutOfMemory {
            bytes: len.saturating_mul(2),
        })?;
        pixels.resize(len, 0);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    pub fn row(&self, y: u32) -> Option<&[u16]> {
        if y >= self.height {
            return None;
        }
        let w = self.width as usize;
        let start = y as usize * w;
        Some(&self.pixels[start..start + w])
    }

    pub fn fill(&mut self, value: u16) {
        self.pixels.fill(value);
    }

    /// Copy a decoded 16bpp image with its top-left corner at `(x, y)`.
    /// Parts that fall off any edge are skipped.
    pub fn blit(&mut self, desc: &ImageDescriptor, x: i32, y: i32) -> Result<(), BitmapError> {
        if desc.depth() != Some(BitDepth::HighColor) {
            return Err(BitmapError::UnsupportedDepth(desc.bits_per_pixel));
        }
        let pixels = desc.pixels().ok_or(BitmapError::HeaderNotLoaded)?;
        let stride = desc.row_stride_unpadded;

        for (row_index, row) in pixels.chunks_exact(stride).enumerate() {
            let Ok(screen_y) = u32::try_from(i64::from(y) + row_index as i64) else {
                continue;
            };
            if screen_y >= self.height {
                break;
            }
            self.put_row_clipped(i64::from(x), screen_y, row);
        }
        Ok(())
    }

    fn put_row_clipped(&mut self, x: i64, y: u32, row: &[u8]) {
        if y >= self.height {
            return;
        }
        let w = i64::from(self.width);
        let line = y as usize * self.width as usize;
        for (i, px) in row.chunks_exact(2).enumerate() {
            let sx = x + i as i64;
            if sx < 0 {
                continue;
            }
            if sx >= w {
                break;
            }
            self.pixels[line + sx as usize] = u16::from_ne_bytes([px[0], px[1]]);
        }
    }
}

impl RowSink for Surface {
    fn put_row(&mut self, x: u32, y: u32, pixels: &[u8]) {
        self.put_row_clipped(i64::from(x), y, pixels);
    }
}
