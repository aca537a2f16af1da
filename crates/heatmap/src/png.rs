//! PNG encoding for the visible buffer.
//!
//! Two layouts are written:
//! - **RGBA (color type 6)**: always applicable.
//! - **Indexed (color type 3)** with a tRNS chunk: used by [`encode_auto`]
//!   when the image has at most 256 distinct colors, which is common for
//!   sparse heatmaps on a transparent background.

use std::collections::HashMap;
use std::io::Write;

use heatmap_common::{HeatmapError, HeatmapResult};

/// PNG file signature
pub const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

const COLOR_TYPE_INDEXED: u8 = 3;
const COLOR_TYPE_RGBA: u8 = 6;

/// Encode with indexed color when possible, RGBA otherwise.
pub fn encode_auto(pixels: &[u8], width: u32, height: u32) -> HeatmapResult<Vec<u8>> {
    check_len(pixels.len(), width, height, 4)?;
    match extract_palette(pixels) {
        Some((palette, indices)) => encode_indexed(&indices, &palette, width, height),
        None => encode_rgba(pixels, width, height),
    }
}

/// Encode straight RGBA pixels (4 bytes per pixel, row-major).
pub fn encode_rgba(pixels: &[u8], width: u32, height: u32) -> HeatmapResult<Vec<u8>> {
    check_len(pixels.len(), width, height, 4)?;

    let mut png = Vec::with_capacity(pixels.len() / 2 + 64);
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &header(width, height, COLOR_TYPE_RGBA));
    write_chunk(&mut png, b"IDAT", &deflate_scanlines(pixels, width as usize * 4)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Encode palette indices (1 byte per pixel) against an RGBA palette.
pub fn encode_indexed(
    indices: &[u8],
    palette: &[[u8; 4]],
    width: u32,
    height: u32,
) -> HeatmapResult<Vec<u8>> {
    check_len(indices.len(), width, height, 1)?;
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
        return Err(HeatmapError::Encode(format!(
            "indexed PNG needs 1..={} palette entries, got {}",
            MAX_PALETTE_SIZE,
            palette.len()
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &header(width, height, COLOR_TYPE_INDEXED));

    let plte: Vec<u8> = palette.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    // Alpha per palette entry, only when something is translucent
    if palette.iter().any(|c| c[3] < 255) {
        let trns: Vec<u8> = palette.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    write_chunk(&mut png, b"IDAT", &deflate_scanlines(indices, width as usize)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn check_len(len: usize, width: u32, height: u32, bytes_per_pixel: usize) -> HeatmapResult<()> {
    let expected = width as usize * height as usize * bytes_per_pixel;
    if len != expected {
        return Err(HeatmapError::Encode(format!(
            "expected {} bytes for a {}x{} image, got {}",
            expected, width, height, len
        )));
    }
    Ok(())
}

fn header(width: u32, height: u32, color_type: u8) -> [u8; 13] {
    let mut ihdr = [0u8; 13];
    ihdr[0..4].copy_from_slice(&width.to_be_bytes());
    ihdr[4..8].copy_from_slice(&height.to_be_bytes());
    ihdr[8] = 8; // bit depth
    ihdr[9] = color_type;
    // compression, filter and interlace methods stay 0
    ihdr
}

/// Collect distinct colors; `None` once there are more than 256.
fn extract_palette(pixels: &[u8]) -> Option<(Vec<[u8; 4]>, Vec<u8>)> {
    let mut lookup: HashMap<[u8; 4], u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<[u8; 4]> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices = Vec::with_capacity(pixels.len() / 4);

    for chunk in pixels.chunks_exact(4) {
        let color = [chunk[0], chunk[1], chunk[2], chunk[3]];
        let index = match lookup.get(&color) {
            Some(&index) => index,
            None => {
                if palette.len() == MAX_PALETTE_SIZE {
                    return None;
                }
                let index = palette.len() as u8;
                palette.push(color);
                lookup.insert(color, index);
                index
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Prefix every row with filter type 0 and zlib-compress.
fn deflate_scanlines(data: &[u8], row_bytes: usize) -> HeatmapResult<Vec<u8>> {
    let rows = if row_bytes == 0 { 0 } else { data.len() / row_bytes };
    let mut raw = Vec::with_capacity(rows * (row_bytes + 1));
    for row in data.chunks_exact(row_bytes.max(1)).take(rows) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(&raw)
        .map_err(|e| HeatmapError::Encode(format!("IDAT compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| HeatmapError::Encode(format!("IDAT compression failed: {}", e)))
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());

    let start = png.len();
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    // CRC covers type and data
    let crc = crc32fast::hash(&png[start..]);
    png.extend_from_slice(&crc.to_be_bytes());
}
