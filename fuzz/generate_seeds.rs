#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

/// Uncompressed BMP with zeroed pixels and a grey palette where needed.
fn bmp(width: u32, height: u32, bpp: u16) -> Vec<u8> {
    let palette: u32 = match bpp {
        1 => 2,
        8 => 256,
        _ => 0,
    };
    let offset = 54 + palette * 4;
    let padded = (width * u32::from(bpp)).div_ceil(32) * 4;
    let size = padded * height;

    let mut out = vec![0u8; 54];
    out[0] = b'B'; out[1] = b'M';
    out[2..6].copy_from_slice(&(offset + size).to_le_bytes()); // file size
    out[10..14].copy_from_slice(&offset.to_le_bytes()); // data offset
    out[14..18].copy_from_slice(&40u32.to_le_bytes()); // DIB header size
    out[18..22].copy_from_slice(&(width as i32).to_le_bytes());
    out[22..26].copy_from_slice(&(height as i32).to_le_bytes());
    out[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    out[28..30].copy_from_slice(&bpp.to_le_bytes());
    out[34..38].copy_from_slice(&size.to_le_bytes());
    out[46..50].copy_from_slice(&palette.to_le_bytes());
    for i in 0..palette {
        let v = (i * 255 / (palette - 1)) as u8;
        out.extend_from_slice(&[v, v, v, 0]);
    }
    out.resize((offset + size) as usize, 0);
    out
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // 16bpp with a pure red first pixel and a padded row
    let mut rgb565 = bmp(3, 2, 16);
    rgb565[54..56].copy_from_slice(&0xF800u16.to_le_bytes());
    fs::write(format!("{dir}/rgb565_3x2.bmp"), rgb565).unwrap();

    fs::write(format!("{dir}/indexed_5x3.bmp"), bmp(5, 3, 8)).unwrap();

    // Font sheet: two 8x16 cells
    let mut sheet = bmp(16, 16, 1);
    let data = sheet.len() - 64;
    for (i, b) in sheet[data..].iter_mut().enumerate() {
        *b = (i * 37) as u8;
    }
    fs::write(format!("{dir}/font_16x16.bmp"), sheet).unwrap();

    // Rejected shapes
    let mut rle = bmp(4, 4, 8);
    rle[30..34].copy_from_slice(&1u32.to_le_bytes());
    fs::write(format!("{dir}/rle8.bmp"), rle).unwrap();
    fs::write(format!("{dir}/bgr24_1x1.bmp"), bmp(1, 1, 24)).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
    let mut cut = bmp(8, 8, 16);
    cut.truncate(80);
    fs::write(format!("{dir}/rgb565_truncated.bmp"), cut).unwrap();

    println!("Generated seed corpus in {dir}/");
}
