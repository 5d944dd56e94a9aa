use alloc::string::String;
use enough::StopReason;

/// Errors from BMP header, pixel, stream, and font decoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BitmapError {
    /// A seek failed or a read returned fewer bytes than the format requires.
    #[error("read failed while {context}")]
    Read {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported bit depth: {0}bpp")]
    UnsupportedDepth(u16),

    #[error("compressed BMP not supported (compression type {0})")]
    Compressed(u32),

    /// Pixel read attempted before a header populated the data offset.
    #[error("pixel read requested before header was loaded")]
    HeaderNotLoaded,

    /// Streaming read attempted before a header populated the data offset.
    #[error("streaming read requested without a bitmap header")]
    MissingHeader,

    #[error("unable to allocate {bytes} bytes for pixel data")]
    OutOfMemory { bytes: usize },

    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("unsupported glyph width {0}, expected 1..=8")]
    GlyphWidth(u32),

    #[error("unsupported glyph height {0}, expected 1..=16")]
    GlyphHeight(u32),

    #[error("row of {needed} bytes does not fit stream buffer of {capacity} bytes")]
    RowTooWide { needed: usize, capacity: usize },

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for BitmapError {
    fn from(r: StopReason) -> Self {
        BitmapError::Cancelled(r)
    }
}

impl BitmapError {
    pub(crate) fn read(context: &'static str, source: std::io::Error) -> Self {
        BitmapError::Read { context, source }
    }
}
