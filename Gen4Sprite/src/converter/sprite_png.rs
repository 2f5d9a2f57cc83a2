//! Sprite/palette blobs to PNG and back

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::image_bridge::{IndexedImage, from_indexed_image_with, to_indexed_image};
use super::options::ConvertOptions;
use super::png_io::{indexed_image_from_bytes, indexed_png_bytes, load_indexed_image};
use crate::error::Result;
use crate::formats::{CipherVariant, decode_palette, decode_sprite, encode_palette, encode_sprite};

/// Decode a sprite blob and palette blob into an indexed image
///
/// # Errors
/// Returns [`Error::SizeMismatch`] if either blob has the wrong size.
///
/// [`Error::SizeMismatch`]: crate::Error::SizeMismatch
pub fn sprite_to_indexed_image(
    sprite: &[u8],
    palette: &[u8],
    variant: CipherVariant,
) -> Result<IndexedImage> {
    let palette = decode_palette(palette)?;
    let grid = decode_sprite(sprite, variant)?;
    Ok(to_indexed_image(&grid, &palette))
}

/// Convert sprite and palette bytes to PNG bytes
///
/// # Errors
/// Returns [`Error::SizeMismatch`] if either blob has the wrong size, or
/// [`Error::PngEncodeFailed`] if encoding fails.
///
/// [`Error::SizeMismatch`]: crate::Error::SizeMismatch
/// [`Error::PngEncodeFailed`]: crate::Error::PngEncodeFailed
pub fn sprite_bytes_to_png_bytes(
    sprite: &[u8],
    palette: &[u8],
    variant: CipherVariant,
) -> Result<Vec<u8>> {
    let image = sprite_to_indexed_image(sprite, palette, variant)?;
    indexed_png_bytes(&image)
}

/// Convert a sprite file and palette file to a PNG file
///
/// # Errors
/// Returns an error if the files cannot be read or written, or conversion fails.
pub fn convert_sprite_to_png<P: AsRef<Path>, Q: AsRef<Path>, R: AsRef<Path>>(
    sprite_path: P,
    palette_path: Q,
    png_path: R,
    variant: CipherVariant,
) -> Result<()> {
    let sprite = std::fs::read(sprite_path.as_ref())?;
    let palette = std::fs::read(palette_path.as_ref())?;

    let png_data = sprite_bytes_to_png_bytes(&sprite, &palette, variant)?;

    let mut output = BufWriter::new(File::create(png_path.as_ref())?);
    output.write_all(&png_data)?;
    output.flush()?;

    tracing::debug!("Wrote {}", png_path.as_ref().display());
    Ok(())
}

/// Encode an indexed image into `(sprite_bytes, palette_bytes)`
///
/// # Errors
/// Returns [`Error::UnsupportedDimensions`] unless the image is 64x64, 80x80 or 160x80.
///
/// [`Error::UnsupportedDimensions`]: crate::Error::UnsupportedDimensions
pub fn image_to_sprite_bytes(
    image: &IndexedImage,
    options: &ConvertOptions,
) -> Result<(Vec<u8>, Vec<u8>)> {
    let (grid, mut palette) = from_indexed_image_with(image, options.reducer.reducer())?;
    if options.standardize_colors {
        palette = palette.standardized();
    }
    Ok((
        encode_sprite(&grid, options.variant),
        encode_palette(&palette),
    ))
}

/// Encode PNG bytes into `(sprite_bytes, palette_bytes)`
///
/// # Errors
/// Returns an error if the PNG cannot be decoded or has unsupported dimensions.
pub fn png_bytes_to_sprite_bytes(
    png: &[u8],
    options: &ConvertOptions,
) -> Result<(Vec<u8>, Vec<u8>)> {
    let image = indexed_image_from_bytes(png)?;
    image_to_sprite_bytes(&image, options)
}

/// Convert a PNG file into a sprite file and a palette file
///
/// # Errors
/// Returns an error if the files cannot be read or written, or conversion fails.
pub fn convert_png_to_sprite<P: AsRef<Path>, Q: AsRef<Path>, R: AsRef<Path>>(
    png_path: P,
    sprite_path: Q,
    palette_path: R,
    options: &ConvertOptions,
) -> Result<()> {
    let image = load_indexed_image(png_path.as_ref())?;
    let (sprite, palette) = image_to_sprite_bytes(&image, options)?;

    std::fs::write(sprite_path.as_ref(), sprite)?;
    std::fs::write(palette_path.as_ref(), palette)?;

    tracing::debug!(
        "Converted {} -> {}, {}",
        png_path.as_ref().display(),
        sprite_path.as_ref().display(),
        palette_path.as_ref().display()
    );
    Ok(())
}
