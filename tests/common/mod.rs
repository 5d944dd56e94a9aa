//! Synthetic BMP files for tests.

#![allow(dead_code)]

/// Builds an uncompressed BITMAPINFOHEADER file from top-down rows.
pub struct BmpBuilder {
    width: u32,
    height: u32,
    bpp: u16,
    compression: u32,
    /// Unpadded rows, top row first.
    rows: Vec<Vec<u8>>,
}

impl BmpBuilder {
    pub fn new(width: u32, height: u32, bpp: u16) -> Self {
        let row_len = (width as usize * bpp as usize).div_ceil(8);
        Self {
            width,
            height,
            bpp,
            compression: 0,
            rows: vec![vec![0; row_len]; height as usize],
        }
    }

    pub fn rows(mut self, rows: Vec<Vec<u8>>) -> Self {
        assert_eq!(rows.len(), self.height as usize);
        self.rows = rows;
        self
    }

    pub fn rows_565(self, rows: &[Vec<u16>]) -> Self {
        let bytes = rows
            .iter()
            .map(|r| r.iter().flat_map(|p| p.to_le_bytes()).collect())
            .collect();
        self.rows(bytes)
    }

    pub fn compression(mut self, compression: u32) -> Self {
        self.compression = compression;
        self
    }

    fn palette_entries(&self) -> u32 {
        match self.bpp {
            1 => 2,
            8 => 256,
            _ => 0,
        }
    }

    pub fn data_offset(&self) -> u32 {
        54 + self.palette_entries() * 4
    }

    pub fn build(&self) -> Vec<u8> {
        let row_len = (self.width as usize * self.bpp as usize).div_ceil(8);
        let padded = row_len.div_ceil(4) * 4;
        let image_size = (padded * self.height as usize) as u32;
        let offset = self.data_offset();

        let mut out = Vec::new();
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&(offset + image_size).to_le_bytes());
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&40u32.to_le_bytes());
        out.extend_from_slice(&(self.width as i32).to_le_bytes());
        out.extend_from_slice(&(self.height as i32).to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&self.bpp.to_le_bytes());
        out.extend_from_slice(&self.compression.to_le_bytes());
        out.extend_from_slice(&image_size.to_le_bytes());
        out.extend_from_slice(&2835u32.to_le_bytes());
        out.extend_from_slice(&2835u32.to_le_bytes());
        out.extend_from_slice(&self.palette_entries().to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        assert_eq!(out.len(), 54);

        let entries = self.palette_entries();
        for i in 0..entries {
            let v = (i * 255 / (entries - 1).max(1)) as u8;
            out.extend_from_slice(&[v, v, v, 0]);
        }

        // Bottom row first.
        for row in self.rows.iter().rev() {
            assert_eq!(row.len(), row_len);
            out.extend_from_slice(row);
            out.resize(out.len() + (padded - row_len), 0);
        }
        out
    }
}

/// A `width` x `height` 565 test pattern, top row first.
pub fn pattern_565(width: u32, height: u32) -> Vec<Vec<u16>> {
    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    let r = (x * 7 + y) as u16 & 0x1F;
                    let g = (y * 5 + x * 3) as u16 & 0x3F;
                    let b = (x ^ y) as u16 & 0x1F;
                    (r << 11) | (g << 5) | b
                })
                .collect()
        })
        .collect()
}

/// Native-endian bytes of a row of native pixels.
pub fn ne_bytes(pixels: &[u16]) -> Vec<u8> {
    pixels.iter().flat_map(|p| p.to_ne_bytes()).collect()
}

/// Wraps a reader and fails every seek after the first `allowed`.
pub struct SeekLimit<R> {
    inner: R,
    allowed: usize,
}

impl<R> SeekLimit<R> {
    pub fn new(inner: R, allowed: usize) -> Self {
        Self { inner, allowed }
    }
}

impl<R: std::io::Read> std::io::Read for SeekLimit<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: std::io::Seek> std::io::Seek for SeekLimit<R> {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        if self.allowed == 0 {
            return Err(std::io::Error::other("seek refused"));
        }
        self.allowed -= 1;
        self.inner.seek(pos)
    }
}
