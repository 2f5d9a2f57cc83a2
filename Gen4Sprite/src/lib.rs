//! # Gen4Sprite
//!
//! A pure-Rust library for the Pokémon sprite archives of the Nintendo DS
//! generation 4 games (Diamond, Pearl, Platinum, HeartGold, SoulSilver).
//!
//! ## Supported Formats
//!
//! - **NARC archives** - List, extract, unpack and build `.narc` containers
//! - **Sprites** - 160x80 4bpp images obfuscated with a 16-bit LCG cipher
//! - **Palettes** - 16-colour RGB555 palettes
//! - **PNG** - Indexed PNG export and import with palette preservation
//!
//! ## Quick Start
//!
//! ### Working with NARC Archives
//!
//! ```no_run
//! use gen4sprite::narc::NarcOperations;
//!
//! // List contents of an archive
//! let entries = NarcOperations::list("pl_pokegra.narc")?;
//! println!("Found {} entries", entries.len());
//!
//! // Unpack every entry as file_NNNN.bin
//! NarcOperations::unpack("pl_pokegra.narc", "pokegra/")?;
//! # Ok::<(), gen4sprite::Error>(())
//! ```
//!
//! ### Converting Sprites
//!
//! ```no_run
//! use gen4sprite::converter::convert_sprite_to_png;
//! use gen4sprite::formats::CipherVariant;
//!
//! // Render a sprite with its palette
//! convert_sprite_to_png("file_0003.bin", "file_0004.bin", "front.png", CipherVariant::Forward)?;
//! # Ok::<(), gen4sprite::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use gen4sprite::prelude::*;
//!
//! let grid = PixelGrid::blank();
//! let bytes = encode_sprite(&grid, CipherVariant::Forward);
//! assert_eq!(bytes.len(), SPRITE_SIZE);
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `gen4sprite` command-line binary

pub mod batch;
pub mod converter;
pub mod error;
pub mod formats;
pub mod layout;
pub mod narc;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};

    // Archive container
    pub use crate::narc::{Narc, NarcEntry, NarcEntryInfo, NarcOperations, NarcReader, NarcWriter};

    // Blob codecs
    pub use crate::formats::{
        CipherVariant, PALETTE_SIZE, Palette, PixelGrid, Rgb, SPRITE_SIZE, decode_palette,
        decode_sprite, encode_palette, encode_sprite,
    };

    pub use crate::converter::{
        ConvertOptions, IndexedImage, ReducerKind, convert_png_to_sprite, convert_sprite_to_png,
    };

    // Archive layouts and batch conversion
    pub use crate::batch::{
        BatchImport, BatchResult, export_otherpoke, export_pokegra, import_otherpoke,
        import_pokegra,
    };
    pub use crate::layout::{FormGroup, PaletteKind, PokegraSlot, SpriteLayout};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
