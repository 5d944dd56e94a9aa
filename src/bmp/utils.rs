//! Byte-order decoding and counted I/O helpers.
//!
//! Every read here reports how many bytes actually arrived; a short read is an
//! error, never silently zero-filled.

use std::io::{self, ErrorKind, Read, Seek, SeekFrom};

use crate::error::BitmapError;

/// Decode a little-endian `u16` field.
#[inline]
pub(crate) fn le_u16(b: [u8; 2]) -> u16 {
    u16::from_le_bytes(b)
}

/// Decode a little-endian `u32` field.
#[inline]
pub(crate) fn le_u32(b: [u8; 4]) -> u32 {
    u32::from_le_bytes(b)
}

/// Read until `buf` is full or the reader hits end of file.
/// Returns the number of bytes read.
pub(crate) fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Fill `buf` completely, or fail with [`BitmapError::Read`].
pub(crate) fn read_counted<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut [u8],
    context: &'static str,
) -> Result<(), BitmapError> {
    let got = read_full(reader, buf).map_err(|e| BitmapError::read(context, e))?;
    if got != buf.len() {
        return Err(BitmapError::read(
            context,
            io::Error::new(
                ErrorKind::UnexpectedEof,
                alloc::format!("expected {} bytes, got {got}", buf.len()),
            ),
        ));
    }
    Ok(())
}

pub(crate) fn seek_to<R: Seek + ?Sized>(
    reader: &mut R,
    offset: u64,
    context: &'static str,
) -> Result<(), BitmapError> {
    reader
        .seek(SeekFrom::Start(offset))
        .map(|_| ())
        .map_err(|e| BitmapError::read(context, e))
}

/// Seek forward `n` bytes from the current position.
pub(crate) fn skip<R: Seek + ?Sized>(
    reader: &mut R,
    n: usize,
    context: &'static str,
) -> Result<(), BitmapError> {
    let delta = i64::try_from(n).map_err(|_| {
        BitmapError::read(context, io::Error::new(ErrorKind::InvalidInput, "skip too large"))
    })?;
    reader
        .seek(SeekFrom::Current(delta))
        .map(|_| ())
        .map_err(|e| BitmapError::read(context, e))
}

/// Seek to `offset` and read a little-endian `u16`.
pub(crate) fn read_u16_at<R: Read + Seek + ?Sized>(
    reader: &mut R,
    offset: u64,
    context: &'static str,
) -> Result<u16, BitmapError> {
    seek_to(reader, offset, context)?;
    let mut b = [0u8; 2];
    read_counted(reader, &mut b, context)?;
    Ok(le_u16(b))
}

/// Seek to `offset` and read a little-endian `u32`.
pub(crate) fn read_u32_at<R: Read + Seek + ?Sized>(
    reader: &mut R,
    offset: u64,
    context: &'static str,
) -> Result<u32, BitmapError> {
    seek_to(reader, offset, context)?;
    let mut b = [0u8; 4];
    read_counted(reader, &mut b, context)?;
    Ok(le_u32(b))
}
