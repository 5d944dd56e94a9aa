#![no_main]
use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use retrobmp::{FontTable, ImageDescriptor, Limits, ReadParts, StreamState, Surface};

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_pixels: Some(1 << 22),
        max_memory_bytes: Some(16 << 20),
        ..Default::default()
    };
    let request = retrobmp::DecodeRequest::new().with_limits(&limits);

    // Whole image, any depth: must never panic
    let mut desc = ImageDescriptor::default();
    let _ = request.read_image(&mut Cursor::new(data), &mut desc, ReadParts::Full, enough::Unstoppable);

    // Font sheet
    let mut font_desc = ImageDescriptor::default();
    let mut font = FontTable::default();
    let _ = request.read_font(&mut Cursor::new(data), &mut font_desc, &mut font, 6, 12, enough::Unstoppable);

    // Streamed onto a small screen, clipping everything off the edges
    let mut screen = Surface::new(64, 64);
    let mut stream_desc = ImageDescriptor::default();
    let mut state = StreamState::new();
    let _ = request.stream_image(&mut Cursor::new(data), &mut stream_desc, &mut state, &mut screen, 8, 8);
});
