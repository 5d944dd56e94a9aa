use crate::error::BitmapError;

/// Resource limits applied while reading headers and allocating pixel or
/// row buffers.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Limits {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes for a decoded pixel buffer or stream row buffer.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Images no larger than a `width` x `height` screen, decoded at up to
    /// 16 bits per pixel.
    pub fn screen(width: u32, height: u32) -> Self {
        let pixels = u64::from(width).saturating_mul(u64::from(height));
        Self {
            max_width: Some(width),
            max_height: Some(height),
            max_pixels: Some(pixels),
            max_memory_bytes: Some(pixels.saturating_mul(2)),
        }
    }

    /// Check header dimensions.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), BitmapError> {
        at_most("width", u64::from(width), self.max_width.map(u64::from))?;
        at_most("height", u64::from(height), self.max_height.map(u64::from))?;
        at_most(
            "pixel count",
            u64::from(width) * u64::from(height),
            self.max_pixels,
        )
    }

    /// Check an allocation size.
    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), BitmapError> {
        at_most("allocation", bytes as u64, self.max_memory_bytes)
    }
}

fn at_most(what: &str, value: u64, max: Option<u64>) -> Result<(), BitmapError> {
    match max {
        Some(max) if value > max => Err(BitmapError::LimitExceeded(alloc::format!(
            "{what} {value} exceeds limit {max}"
        ))),
        _ => Ok(()),
    }
}
