use std::io::{Read, Seek};

use enough::Stop;

use crate::bmp::header::ImageDescriptor;
use crate::bmp::stream::{RowSink, StreamState};
use crate::error::BitmapError;
use crate::font::FontTable;
use crate::limits::Limits;
use crate::pixel::{Grbi, PixelMapper};

/// Which parts of a BMP [`DecodeRequest::read_image`] should read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadParts {
    /// Header fields and geometry only.
    HeaderOnly,
    /// Pixels only, using a header already in the descriptor.
    PixelsOnly,
    /// Header, then pixels.
    #[default]
    Full,
}

/// Decode settings shared by every read: the pixel mapper for 16bpp
/// conversion and optional resource limits.
///
/// ```no_run
/// use std::fs::File;
/// use retrobmp::{DecodeRequest, ImageDescriptor, Limits, Unstoppable};
///
/// let limits = Limits::screen(512, 512);
/// let mut file = File::open("ART/TITLE.BMP")?;
/// let mut image = ImageDescriptor::default();
/// DecodeRequest::new()
///     .with_limits(&limits)
///     .read_image(&mut file, &mut image, Default::default(), Unstoppable)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy)]
pub struct DecodeRequest<'a> {
    pub(crate) mapper: &'a dyn PixelMapper,
    pub(crate) limits: Option<&'a Limits>,
}

impl Default for DecodeRequest<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for DecodeRequest<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DecodeRequest")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl<'a> DecodeRequest<'a> {
    /// Defaults: [`Grbi`] pixel mapping, no limits.
    pub fn new() -> Self {
        Self {
            mapper: &Grbi,
            limits: None,
        }
    }

    pub fn with_mapper(mut self, mapper: &'a dyn PixelMapper) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Read header fields and derived geometry into `desc`.
    pub fn read_header<R: Read + Seek + ?Sized>(
        &self,
        reader: &mut R,
        desc: &mut ImageDescriptor,
    ) -> Result<(), BitmapError> {
        crate::bmp::header::read_header(reader, desc, self.limits)
    }

    /// Read all pixels of an image whose header is already in `desc`.
    pub fn read_pixels<R: Read + Seek + ?Sized>(
        &self,
        reader: &mut R,
        desc: &mut ImageDescriptor,
        stop: impl Stop,
    ) -> Result<(), BitmapError> {
        crate::bmp::decode::read_pixels(reader, desc, self.mapper, self.limits, &stop)
    }

    pub fn read_image<R: Read + Seek + ?Sized>(
        &self,
        reader: &mut R,
        desc: &mut ImageDescriptor,
        parts: ReadParts,
        stop: impl Stop,
    ) -> Result<(), BitmapError> {
        if parts != ReadParts::PixelsOnly {
            self.read_header(reader, desc)?;
        }
        if parts != ReadParts::HeaderOnly {
            self.read_pixels(reader, desc, stop)?;
        }
        Ok(())
    }

    /// Decode and deliver the next row of a 16bpp image.
    ///
    /// Returns the screen row that was painted, or `None` once the stream
    /// has finished. Any error leaves the stream finished.
    pub fn read_next_row<R, S>(
        &self,
        reader: &mut R,
        desc: &ImageDescriptor,
        state: &mut StreamState,
        sink: &mut S,
        dest_x: u32,
        dest_y: u32,
    ) -> Result<Option<u32>, BitmapError>
    where
        R: Read + Seek + ?Sized,
        S: RowSink + ?Sized,
    {
        state.step(reader, desc, sink, (dest_x, dest_y), self.mapper, self.limits)
    }

    /// Read the header and stream every row of a 16bpp image to `sink`,
    /// holding no more than one row in memory.
    pub fn stream_image<R, S>(
        &self,
        reader: &mut R,
        desc: &mut ImageDescriptor,
        state: &mut StreamState,
        sink: &mut S,
        dest_x: u32,
        dest_y: u32,
    ) -> Result<(), BitmapError>
    where
        R: Read + Seek + ?Sized,
        S: RowSink + ?Sized,
    {
        self.read_header(reader, desc)?;
        state.restart();
        while self
            .read_next_row(reader, desc, state, sink, dest_x, dest_y)?
            .is_some()
        {}
        Ok(())
    }

    /// Decode a 1bpp font sheet and slice it into `glyph_width` x
    /// `glyph_height` glyphs.
    pub fn read_font<R: Read + Seek + ?Sized>(
        &self,
        reader: &mut R,
        desc: &mut ImageDescriptor,
        font: &mut FontTable,
        glyph_width: u32,
        glyph_height: u32,
        stop: impl Stop,
    ) -> Result<(), BitmapError> {
        crate::font::read_font(
            reader,
            desc,
            font,
            (glyph_width, glyph_height),
            self,
            &stop,
        )
    }
}
