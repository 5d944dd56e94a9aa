//! 565 RGB unpacking and mapping into the display's native packed pixel.

use rgb::RGB8;

/// Red channel of a 565 pixel.
pub const R_MASK_565: u16 = 0xF800;
/// Green channel of a 565 pixel.
pub const G_MASK_565: u16 = 0x07E0;
/// Blue channel of a 565 pixel.
pub const B_MASK_565: u16 = 0x001F;

/// Maps 8-bit channels into a native 16-bit packed pixel.
///
/// The decoder has no opinion on the target display's layout; anything that
/// knows how to pack a pixel can be used, including plain closures.
pub trait PixelMapper {
    fn map(&self, rgb: RGB8, intensity: bool) -> u16;
}

impl<F> PixelMapper for F
where
    F: Fn(RGB8, bool) -> u16,
{
    fn map(&self, rgb: RGB8, intensity: bool) -> u16 {
        self(rgb, intensity)
    }
}

/// X68000 GVRAM layout: 5 bits green, 5 bits red, 5 bits blue, 1 intensity bit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Grbi;

impl PixelMapper for Grbi {
    fn map(&self, rgb: RGB8, intensity: bool) -> u16 {
        (u16::from(rgb.g >> 3) << 11)
            | (u16::from(rgb.r >> 3) << 6)
            | (u16::from(rgb.b >> 3) << 1)
            | u16::from(intensity)
    }
}

/// Repacks channels as 565 RGB. Intensity is ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb565;

impl PixelMapper for Rgb565 {
    fn map(&self, rgb: RGB8, _intensity: bool) -> u16 {
        (u16::from(rgb.r >> 3) << 11) | (u16::from(rgb.g >> 2) << 5) | u16::from(rgb.b >> 3)
    }
}

/// Split a host-order 565 pixel into channels widened to 8-bit precision.
///
/// The low bits are left at zero, so full-scale red comes out as 248, not 255.
#[inline]
pub fn unpack_565(pixel: u16) -> RGB8 {
    RGB8::new(
        (((pixel & R_MASK_565) >> 11) << 3) as u8,
        (((pixel & G_MASK_565) >> 5) << 2) as u8,
        ((pixel & B_MASK_565) << 3) as u8,
    )
}

/// Convert a row (or a whole buffer) of little-endian 565 pixels to native
/// pixels in place. A trailing odd byte is left untouched.
pub(crate) fn convert_565_in_place(bytes: &mut [u8], mapper: &dyn PixelMapper) {
    for px in bytes.chunks_exact_mut(2) {
        let raw = u16::from_le_bytes([px[0], px[1]]);
        let native = mapper.map(unpack_565(raw), true);
        px.copy_from_slice(&native.to_ne_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpack_pure_channels() {
        assert_eq!(unpack_565(0xF800), RGB8::new(248, 0, 0));
        assert_eq!(unpack_565(0x07E0), RGB8::new(0, 252, 0));
        assert_eq!(unpack_565(0x001F), RGB8::new(0, 0, 248));
        assert_eq!(unpack_565(0x0000), RGB8::new(0, 0, 0));
    }

    #[test]
    fn grbi_packs_white_with_intensity() {
        assert_eq!(Grbi.map(RGB8::new(255, 255, 255), true), 0xFFFF);
        assert_eq!(Grbi.map(RGB8::new(255, 255, 255), false), 0xFFFE);
        // red lands in bits 6..=10
        assert_eq!(Grbi.map(RGB8::new(248, 0, 0), false), 0x07C0);
    }

    #[test]
    fn rgb565_mapper_is_lossless_for_unpacked_values() {
        for raw in [0x0000u16, 0xF800, 0x07E0, 0x001F, 0x1234, 0xFFFF] {
            assert_eq!(Rgb565.map(unpack_565(raw), true), raw);
        }
    }

    #[test]
    fn closures_are_mappers() {
        let only_red = |rgb: RGB8, _i: bool| u16::from(rgb.r);
        let mut row = [0x00, 0xF8, 0x1F, 0x00];
        convert_565_in_place(&mut row, &only_red);
        assert_eq!(u16::from_ne_bytes([row[0], row[1]]), 248);
        assert_eq!(u16::from_ne_bytes([row[2], row[3]]), 0);
    }
}
