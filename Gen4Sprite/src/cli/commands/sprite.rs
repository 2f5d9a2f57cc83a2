//! CLI commands for single sprite and palette files

use std::path::Path;

use anyhow::bail;

use crate::converter::{ConvertOptions, convert_png_to_sprite, convert_sprite_to_png};
use crate::formats::{CipherVariant, decode_palette};

/// Render a sprite with a palette as an indexed PNG
pub fn to_png(
    source: &Path,
    palette: &Path,
    destination: &Path,
    variant: CipherVariant,
) -> anyhow::Result<()> {
    convert_sprite_to_png(source, palette, destination, variant)?;
    println!("Wrote {} ({variant})", destination.display());
    Ok(())
}

/// Encode a PNG as sprite and palette files
pub fn from_png(
    source: &Path,
    destination: &Path,
    palette: &Path,
    options: &ConvertOptions,
) -> anyhow::Result<()> {
    if destination == palette {
        bail!("Sprite and palette outputs must be different files");
    }
    convert_png_to_sprite(source, destination, palette, options)?;
    println!(
        "Wrote {} and {} ({}, {} reducer)",
        destination.display(),
        palette.display(),
        options.variant,
        options.reducer
    );
    Ok(())
}

/// Print the colours of a palette file
pub fn show_palette(source: &Path, json: bool) -> anyhow::Result<()> {
    let palette = decode_palette(&std::fs::read(source)?)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&palette)?);
        return Ok(());
    }

    println!("{}", source.display());
    for (i, color) in palette.colors().iter().enumerate() {
        println!(
            "  {i:>2}  #{:02X}{:02X}{:02X}  rgb555 0x{:04X}",
            color.r,
            color.g,
            color.b,
            color.to_rgb555()
        );
    }
    Ok(())
}
