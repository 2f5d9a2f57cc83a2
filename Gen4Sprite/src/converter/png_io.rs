//! Indexed PNG reading and writing
//!
//! Sprites are written as 8-bit paletted PNGs so that the palette indices
//! survive editing. Indexed PNGs are read back with their indices intact;
//! any other colour type is decoded through `image` and indexed by exact
//! colour, in first-seen order.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use png::{BitDepth, ColorType, Transformations};

use super::image_bridge::IndexedImage;
use crate::error::{Error, Result};
use crate::formats::Rgb;

/// Most colours an indexed PNG can hold
pub const MAX_INDEXED_COLORS: usize = 256;

/// Encode an indexed image as an 8-bit paletted PNG
///
/// The PLTE chunk is padded with black so that every referenced index has an entry.
///
/// # Errors
/// Returns [`Error::PngEncodeFailed`] if encoding fails.
pub fn indexed_png_bytes(image: &IndexedImage) -> Result<Vec<u8>> {
    let entries = image
        .palette()
        .len()
        .max(usize::from(image.max_index()) + 1)
        .min(MAX_INDEXED_COLORS);
    let mut plte = Vec::with_capacity(entries * 3);
    for i in 0..entries {
        let color = image.palette().get(i).copied().unwrap_or_default();
        plte.extend_from_slice(&[color.r, color.g, color.b]);
    }

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, image.width(), image.height());
        encoder.set_color(ColorType::Indexed);
        encoder.set_depth(BitDepth::Eight);
        encoder.set_palette(plte);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(image.pixels())?;
        writer.finish()?;
    }
    Ok(out)
}

/// Write an indexed image to a PNG file
///
/// # Errors
/// Returns [`Error::PngEncodeFailed`] if encoding fails or [`Error::Io`] if the file cannot be written.
pub fn write_indexed_png<P: AsRef<Path>>(image: &IndexedImage, path: P) -> Result<()> {
    let bytes = indexed_png_bytes(image)?;
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path.as_ref(), bytes)?;
    Ok(())
}

/// Read an image file as an indexed image
///
/// # Errors
/// Returns [`Error::Io`] if the file cannot be read, otherwise see [`indexed_image_from_bytes`].
pub fn load_indexed_image<P: AsRef<Path>>(path: P) -> Result<IndexedImage> {
    let bytes = std::fs::read(path.as_ref())?;
    indexed_image_from_bytes(&bytes)
}

/// Decode PNG bytes as an indexed image
///
/// # Errors
/// Returns [`Error::PngDecodeFailed`] if an indexed PNG is corrupt,
/// [`Error::ImageOpenFailed`] if a true-colour image cannot be decoded,
/// or [`Error::TooManyColors`] if it uses more than 256 colours.
pub fn indexed_image_from_bytes(bytes: &[u8]) -> Result<IndexedImage> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(Transformations::IDENTITY);

    let Ok(mut reader) = decoder.read_info() else {
        return index_true_color(bytes);
    };

    let (width, height, palette) = {
        let info = reader.info();
        if info.color_type != ColorType::Indexed {
            return index_true_color(bytes);
        }
        let palette: Vec<Rgb> = info
            .palette
            .as_ref()
            .map(|plte| {
                plte.chunks_exact(3)
                    .map(|c| Rgb::new(c[0], c[1], c[2]))
                    .collect()
            })
            .unwrap_or_default();
        (info.width, info.height, palette)
    };

    let mut buffer = vec![0u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buffer)?;
    let pixels = unpack_indices(&buffer, frame.line_size, frame.bit_depth, width, height)?;

    IndexedImage::new(width, height, pixels, palette)
}

/// Expand packed sub-byte indices to one byte per pixel
fn unpack_indices(
    buffer: &[u8],
    line_size: usize,
    depth: BitDepth,
    width: u32,
    height: u32,
) -> Result<Vec<u8>> {
    let bits = match depth {
        BitDepth::One => 1,
        BitDepth::Two => 2,
        BitDepth::Four => 4,
        BitDepth::Eight => 8,
        BitDepth::Sixteen => {
            return Err(Error::PngDecodeFailed {
                message: "16-bit indexed images are not valid PNG".to_string(),
            });
        }
    };
    let per_byte = 8 / bits;
    let mask = (1u16 << bits) - 1;

    let (width, height) = (width as usize, height as usize);
    let mut pixels = Vec::with_capacity(width * height);
    for row in buffer.chunks(line_size).take(height) {
        for x in 0..width {
            let byte = u16::from(row.get(x / per_byte).copied().unwrap_or(0));
            let shift = 8 - bits * (x % per_byte + 1);
            pixels.push(u8::try_from((byte >> shift) & mask).unwrap_or(0));
        }
    }
    Ok(pixels)
}

/// Decode any image through `image` and index it by exact RGB colour
fn index_true_color(bytes: &[u8]) -> Result<IndexedImage> {
    let decoded = image::load_from_memory(bytes).map_err(|e| Error::ImageOpenFailed {
        message: e.to_string(),
    })?;
    let rgb = decoded.to_rgb8();

    let mut lookup: HashMap<[u8; 3], usize> = HashMap::new();
    let mut palette = Vec::new();
    let mut indices = Vec::with_capacity(rgb.pixels().len());
    for pixel in rgb.pixels() {
        let next = lookup.len();
        let index = *lookup.entry(pixel.0).or_insert_with(|| {
            palette.push(Rgb::new(pixel.0[0], pixel.0[1], pixel.0[2]));
            next
        });
        indices.push(index);
    }

    if palette.len() > MAX_INDEXED_COLORS {
        return Err(Error::TooManyColors {
            count: palette.len(),
        });
    }

    let pixels = indices
        .into_iter()
        .map(|i| u8::try_from(i).unwrap_or(u8::MAX))
        .collect();
    IndexedImage::new(rgb.width(), rgb.height(), pixels, palette)
}
