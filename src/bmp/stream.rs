//! Row-at-a-time 16bpp decoding for cooperative event loops.
//!
//! Each call to [`DecodeRequest::read_next_row`](crate::DecodeRequest::read_next_row)
//! performs at most one row of I/O, converts it, and hands it to a
//! [`RowSink`]. The cursor lives in a caller-owned [`StreamState`] so the
//! loop can interleave decoding with input polling and redraws.

use alloc::vec::Vec;
use std::io::{Read, Seek};

use super::decode::try_alloc_zeroed;
use super::header::{BitDepth, ImageDescriptor};
use super::utils::{read_counted, seek_to, skip};
use crate::error::BitmapError;
use crate::limits::Limits;
use crate::pixel::{PixelMapper, convert_565_in_place};

/// Row buffer size of the launcher's fixed scratch area: 256 pixels
/// at 16bpp.
pub const LEGACY_ROW_CAPACITY: usize = 512;

/// Destination for decoded rows, usually video memory.
pub trait RowSink {
    /// Place one row of native 16-bit pixels (native-endian byte pairs) with
    /// its first pixel at `(x, y)`.
    fn put_row(&mut self, x: u32, y: u32, pixels: &[u8]);
}

impl<S: RowSink + ?Sized> RowSink for &mut S {
    fn put_row(&mut self, x: u32, y: u32, pixels: &[u8]) {
        (**self).put_row(x, y, pixels);
    }
}

/// Where a streaming decode is in its image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamCursor {
    /// Nothing read yet; the next call seeks to the pixel data.
    NotStarted,
    /// `rows_remaining` rows are still to be read (always > 0).
    InProgress { rows_remaining: u32 },
    /// Every row was delivered, or the stream failed and was abandoned.
    Finished,
}

/// Which screen row each streamed row is painted to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RowPlacement {
    /// The first call paints `dest_y`, each later call the next row down.
    /// Rows arrive in file order, so the picture is vertically mirrored
    /// unless the caller compensates.
    #[default]
    CallOrder,
    /// The first call paints `dest_y + height - 1` and later calls move up,
    /// so the image is displayed the right way up.
    Upright,
}

/// Persistent cursor and row buffer for streaming decode.
#[derive(Clone, Debug)]
pub struct StreamState {
    cursor: StreamCursor,
    row_stride_bytes: usize,
    scratch: Vec<u8>,
    capacity: Option<usize>,
    placement: RowPlacement,
}

impl Default for StreamState {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamState {
    /// A stream whose row buffer is sized from each image's header.
    pub fn new() -> Self {
        Self {
            cursor: StreamCursor::NotStarted,
            row_stride_bytes: 0,
            scratch: Vec::new(),
            capacity: None,
            placement: RowPlacement::default(),
        }
    }

    /// A stream with a fixed row buffer; wider images fail with
    /// [`BitmapError::RowTooWide`].
    pub fn with_row_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::new()
        }
    }

    pub fn with_placement(mut self, placement: RowPlacement) -> Self {
        self.placement = placement;
        self
    }

    pub fn cursor(&self) -> StreamCursor {
        self.cursor
    }

    pub fn placement(&self) -> RowPlacement {
        self.placement
    }

    /// Bytes in one decoded row of the current image (0 before it starts).
    pub fn row_stride_bytes(&self) -> usize {
        self.row_stride_bytes
    }

    /// Rows still to be read for an image of `height` rows.
    pub fn rows_remaining(&self, height: u32) -> u32 {
        match self.cursor {
            StreamCursor::NotStarted => height,
            StreamCursor::InProgress { rows_remaining } => rows_remaining,
            StreamCursor::Finished => 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.cursor == StreamCursor::Finished
    }

    /// Begin a new image on the next call, whatever state the stream is in.
    pub fn restart(&mut self) {
        self.cursor = StreamCursor::NotStarted;
        self.row_stride_bytes = 0;
    }

    /// Stop the current image; further calls do nothing until a restart.
    pub fn abandon(&mut self) {
        self.cursor = StreamCursor::Finished;
        self.row_stride_bytes = 0;
    }

    fn start(&mut self, desc: &ImageDescriptor, limits: Option<&Limits>) -> Result<(), BitmapError> {
        let needed = desc.row_stride_unpadded;
        if needed == 0 || desc.height == 0 {
            return Err(BitmapError::InvalidDimensions {
                width: desc.width,
                height: desc.height,
            });
        }
        match self.capacity {
            Some(capacity) if needed > capacity => {
                return Err(BitmapError::RowTooWide { needed, capacity });
            }
            Some(capacity) => {
                if self.scratch.len() != capacity {
                    self.scratch = try_alloc_zeroed(capacity, limits)?;
                }
            }
            None => {
                if self.scratch.len() < needed {
                    self.scratch = try_alloc_zeroed(needed, limits)?;
                }
            }
        }
        self.row_stride_bytes = desc.width as usize * usize::from(desc.bytes_per_pixel);
        Ok(())
    }

    /// Run one step, forcing `Finished` on any failure.
    pub(crate) fn step<R, S>(
        &mut self,
        reader: &mut R,
        desc: &ImageDescriptor,
        sink: &mut S,
        dest: (u32, u32),
        mapper: &dyn PixelMapper,
        limits: Option<&Limits>,
    ) -> Result<Option<u32>, BitmapError>
    where
        R: Read + Seek + ?Sized,
        S: RowSink + ?Sized,
    {
        if desc.depth() != Some(BitDepth::HighColor) {
            return Err(BitmapError::UnsupportedDepth(desc.bits_per_pixel));
        }
        if !desc.has_header() {
            return Err(BitmapError::MissingHeader);
        }

        let result = self.advance(reader, desc, sink, dest, mapper, limits);
        if result.is_err() {
            log::debug!("bmp stream: abandoning image after error");
            self.abandon();
        }
        result
    }

    fn advance<R, S>(
        &mut self,
        reader: &mut R,
        desc: &ImageDescriptor,
        sink: &mut S,
        (dest_x, dest_y): (u32, u32),
        mapper: &dyn PixelMapper,
        limits: Option<&Limits>,
    ) -> Result<Option<u32>, BitmapError>
    where
        R: Read + Seek + ?Sized,
        S: RowSink + ?Sized,
    {
        let height = desc.height;
        let rows_remaining = match self.cursor {
            StreamCursor::Finished => return Ok(None),
            StreamCursor::InProgress { rows_remaining } => rows_remaining,
            StreamCursor::NotStarted => {
                self.start(desc, limits)?;
                seek_to(reader, u64::from(desc.data_offset), "seeking to pixel data")?;
                log::debug!(
                    "bmp stream: starting {}x{} image at ({dest_x}, {dest_y})",
                    desc.width,
                    desc.height
                );
                height
            }
        };

        let row_len = desc.row_stride_unpadded;
        let capacity = self.scratch.len();
        let row = self
            .scratch
            .get_mut(..row_len)
            .ok_or(BitmapError::RowTooWide {
                needed: row_len,
                capacity,
            })?;
        read_counted(reader, row, "reading pixel row")?;
        if desc.row_stride_padded != row_len {
            skip(
                reader,
                desc.row_stride_padded.saturating_sub(row_len),
                "skipping row padding",
            )?;
        }
        convert_565_in_place(row, mapper);

        let offset = match self.placement {
            RowPlacement::CallOrder => height.saturating_sub(rows_remaining),
            RowPlacement::Upright => rows_remaining.saturating_sub(1),
        };
        let screen_y = dest_y
            .checked_add(offset)
            .ok_or(BitmapError::DimensionsTooLarge {
                width: desc.width,
                height: desc.height,
            })?;
        sink.put_row(dest_x, screen_y, &row[..self.row_stride_bytes.min(row_len)]);
        let left = rows_remaining.saturating_sub(1);
        log::trace!("bmp stream: row to y={screen_y}, {left} left");

        self.cursor = match left {
            0 => {
                log::debug!("bmp stream: image complete");
                StreamCursor::Finished
            }
            left => StreamCursor::InProgress {
                rows_remaining: left,
            },
        };
        Ok(Some(screen_y))
    }
}
