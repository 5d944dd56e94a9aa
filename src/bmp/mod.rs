//! BMP header, whole-image, and streaming readers (internal).
//!
//! Use [`crate::DecodeRequest`] or the top-level functions such as
//! [`crate::read_header`] and [`crate::read_pixels`].

pub(crate) mod decode;
pub(crate) mod header;
pub(crate) mod stream;
mod utils;
