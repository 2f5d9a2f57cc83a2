//! Conversion between sprite archive blobs and editable images
//!
//! - [`image_bridge`]: pixel grid/palette <-> [`IndexedImage`], geometry normalisation
//! - [`png_io`]: indexed PNG reading and writing
//! - sprite/palette blobs <-> PNG files
//!
//! # Example
//!
//! ```no_run
//! use gen4sprite::converter::{convert_png_to_sprite, convert_sprite_to_png, ConvertOptions};
//! use gen4sprite::formats::CipherVariant;
//!
//! convert_sprite_to_png("file_0003.bin", "file_0004.bin", "front.png", CipherVariant::Forward)?;
//! convert_png_to_sprite("front.png", "sprite.bin", "palette.bin", &ConvertOptions::new())?;
//! # Ok::<(), gen4sprite::Error>(())
//! ```

pub mod image_bridge;
mod options;
pub mod png_io;
mod sprite_png;

pub use image_bridge::{
    ClampReducer, IndexedImage, NearestColorReducer, PaletteReducer, from_indexed_image,
    from_indexed_image_with, to_indexed_image,
};
pub use options::{ConvertOptions, ReducerKind};
pub use png_io::{indexed_image_from_bytes, indexed_png_bytes, load_indexed_image, write_indexed_png};
pub use sprite_png::{
    convert_png_to_sprite, convert_sprite_to_png, image_to_sprite_bytes, png_bytes_to_sprite_bytes,
    sprite_bytes_to_png_bytes, sprite_to_indexed_image,
};
