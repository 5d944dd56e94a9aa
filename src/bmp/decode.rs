//! Whole-image pixel reader.
//!
//! Rows are stored bottom-up on disk. They are read in file order and written
//! from the last row of the output buffer upward, so the buffer comes out
//! top row first.

use alloc::vec::Vec;
use std::io::{Read, Seek};

use enough::Stop;

use super::header::{BitDepth, ImageDescriptor};
use super::utils::{read_counted, seek_to, skip};
use crate::error::BitmapError;
use crate::limits::Limits;
use crate::pixel::{PixelMapper, convert_565_in_place};

/// Rows decoded between cancellation checks.
const ROWS_PER_STOP_CHECK: usize = 64;

/// Allocate a zeroed buffer, reporting failure instead of aborting.
pub(crate) fn try_alloc_zeroed(
    bytes: usize,
    limits: Option<&Limits>,
) -> Result<Vec<u8>, BitmapError> {
    if let Some(limits) = limits {
        limits.check_memory(bytes)?;
    }
    let mut buf = Vec::new();
    buf.try_reserve_exact(bytes)
        .map_err(|_| BitmapError::OutOfMemory { bytes })?;
    buf.resize(bytes, 0);
    Ok(buf)
}

/// Read every pixel row of an image whose header is already in `desc`.
///
/// On success the descriptor owns a buffer of `row_stride_unpadded * height`
/// bytes. On failure it owns none; any earlier buffer is released first.
pub(crate) fn read_pixels<R: Read + Seek + ?Sized>(
    reader: &mut R,
    desc: &mut ImageDescriptor,
    mapper: &dyn PixelMapper,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<(), BitmapError> {
    desc.release();

    if !desc.has_header() {
        return Err(BitmapError::HeaderNotLoaded);
    }
    let depth = desc
        .depth()
        .ok_or(BitmapError::UnsupportedDepth(desc.bits_per_pixel))?;

    let row_len = desc.row_stride_unpadded;
    let height = desc.height as usize;
    if row_len == 0 || height == 0 {
        return Err(BitmapError::InvalidDimensions {
            width: desc.width,
            height: desc.height,
        });
    }
    let padding = desc.row_stride_padded.saturating_sub(row_len);
    let bytes = row_len
        .checked_mul(height)
        .ok_or(BitmapError::DimensionsTooLarge {
            width: desc.width,
            height: desc.height,
        })?;

    let mut buf = try_alloc_zeroed(bytes, limits)?;

    stop.check()?;
    seek_to(reader, u64::from(desc.data_offset), "seeking to pixel data")?;

    for (i, out_row) in buf.chunks_exact_mut(row_len).rev().enumerate() {
        if i % ROWS_PER_STOP_CHECK == 0 {
            stop.check()?;
        }
        read_counted(reader, out_row, "reading pixel row")?;
        if padding > 0 {
            skip(reader, padding, "skipping row padding")?;
        }
    }

    match depth {
        BitDepth::HighColor => convert_565_in_place(&mut buf, mapper),
        // Palette indices and packed bits are kept as stored.
        BitDepth::Indexed | BitDepth::Mono => {}
    }

    log::debug!(
        "bmp pixels: decoded {} rows of {} bytes",
        desc.height,
        row_len
    );
    desc.set_pixels(buf);
    Ok(())
}
