//! Binary codecs for the blobs stored in the sprite archives
//!
//! - [`sprite`]: 6448-byte ciphered 4bpp sprites
//! - [`palette`]: 72-byte RGB555 palettes

pub mod palette;
pub mod sprite;

pub use palette::{
    PALETTE_COLORS, PALETTE_HEADER, PALETTE_SIZE, Palette, Rgb, decode_palette, encode_palette,
};
pub use sprite::{
    CipherVariant, PIXEL_COUNT, PixelGrid, SPRITE_HEADER, SPRITE_HEIGHT, SPRITE_SIZE,
    SPRITE_WIDTH, decode_sprite, encode_sprite,
};
