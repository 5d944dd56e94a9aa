//! # retrobmp
//!
//! BMP decoder for launchers and menus that draw straight into a 16-bit
//! framebuffer.
//!
//! ## Decoding modes
//!
//! - **Header only**: [`read_header`] fills an [`ImageDescriptor`] with the
//!   image's dimensions, depth, data offset and row strides.
//! - **Whole image**: [`read_pixels`] reads every row into a buffer owned by
//!   the descriptor, top row first.
//! - **Streaming**: [`read_next_row`] decodes exactly one row per call into a
//!   [`RowSink`], with the cursor kept in a caller-owned [`StreamState`]. A
//!   UI loop can interleave rows with input handling and never block longer
//!   than one row of I/O.
//! - **Font sheets**: [`read_font`] slices a 1bpp image into a [`FontTable`]
//!   of fixed-size glyphs.
//!
//! ## Supported input
//!
//! Uncompressed BMP at 1, 8 or 16 bits per pixel. 16bpp pixels are 565 RGB
//! and are converted through a [`PixelMapper`] into the display's packed
//! format ([`Grbi`] by default). 8bpp palette indices and 1bpp bits are
//! returned as stored.
//!
//! ## Non-Goals
//!
//! - Compressed (RLE, bitfield) BMP
//! - Palette resolution
//! - Resizing, rotation, blending
//!
//! ## Usage
//!
//! ```no_run
//! use std::fs::File;
//! use retrobmp::{ImageDescriptor, StreamState, Surface, Unstoppable};
//!
//! // Whole image
//! let mut file = File::open("ASSETS/LOGO.BMP")?;
//! let mut logo = ImageDescriptor::default();
//! retrobmp::read_header(&mut file, &mut logo)?;
//! retrobmp::read_pixels(&mut file, &mut logo, Unstoppable)?;
//!
//! // Streamed, one row per pass of the event loop
//! let mut screen = Surface::new(512, 512);
//! let mut art = File::open("ART/GAME01.BMP")?;
//! let mut shot = ImageDescriptor::default();
//! let mut state = StreamState::new();
//! retrobmp::read_header(&mut art, &mut shot)?;
//! while !state.is_finished() {
//!     // poll input, redraw menus...
//!     retrobmp::read_next_row(&mut art, &shot, &mut state, &mut screen, 16, 32)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

extern crate alloc;

mod bmp;
mod decode;
mod error;
mod font;
mod limits;
mod pixel;
mod surface;

use std::io::{Read, Seek};

// Re-exports
pub use bmp::header::{
    BITS_PER_PIXEL_OFFSET, BitDepth, COMPRESSION_OFFSET, DATA_OFFSET_OFFSET, HEIGHT_OFFSET,
    ImageDescriptor, SIGNATURE_OFFSET, UNCOMPRESSED, WIDTH_OFFSET,
};
pub use bmp::stream::{LEGACY_ROW_CAPACITY, RowPlacement, RowSink, StreamCursor, StreamState};
pub use decode::{DecodeRequest, ReadParts};
pub use enough::{Stop, StopReason, Unstoppable};
pub use error::BitmapError;
pub use font::{FontTable, GLYPH_PLANES, Glyph, MAX_GLYPH_HEIGHT, MAX_GLYPH_WIDTH};
pub use limits::Limits;
pub use pixel::{B_MASK_565, G_MASK_565, Grbi, PixelMapper, R_MASK_565, Rgb565, unpack_565};
pub use rgb::RGB8;
pub use surface::Surface;

/// Read the header of a BMP into `desc`. See [`DecodeRequest::read_header`].
pub fn read_header<R: Read + Seek + ?Sized>(
    reader: &mut R,
    desc: &mut ImageDescriptor,
) -> Result<(), BitmapError> {
    DecodeRequest::new().read_header(reader, desc)
}

/// Read all pixels, mapping 16bpp pixels with [`Grbi`].
/// See [`DecodeRequest::read_pixels`].
pub fn read_pixels<R: Read + Seek + ?Sized>(
    reader: &mut R,
    desc: &mut ImageDescriptor,
    stop: impl Stop,
) -> Result<(), BitmapError> {
    DecodeRequest::new().read_pixels(reader, desc, stop)
}

/// Read header and/or pixels. See [`DecodeRequest::read_image`].
pub fn read_image<R: Read + Seek + ?Sized>(
    reader: &mut R,
    desc: &mut ImageDescriptor,
    parts: ReadParts,
    stop: impl Stop,
) -> Result<(), BitmapError> {
    DecodeRequest::new().read_image(reader, desc, parts, stop)
}

/// Stream one row of a 16bpp image to `sink`. See
/// [`DecodeRequest::read_next_row`].
pub fn read_next_row<R, S>(
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
    DecodeRequest::new().read_next_row(reader, desc, state, sink, dest_x, dest_y)
}

/// Decode a 1bpp font sheet into `font`. See [`DecodeRequest::read_font`].
pub fn read_font<R: Read + Seek + ?Sized>(
    reader: &mut R,
    desc: &mut ImageDescriptor,
    font: &mut FontTable,
    glyph_width: u32,
    glyph_height: u32,
    stop: impl Stop,
) -> Result<(), BitmapError> {
    DecodeRequest::new().read_font(reader, desc, font, glyph_width, glyph_height, stop)
}
