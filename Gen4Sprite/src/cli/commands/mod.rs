//! Top-level subcommands

use clap::{Args, Subcommand};

use crate::converter::{ConvertOptions, ReducerKind};
use crate::formats::CipherVariant;

pub mod batch;
pub mod definitions;
mod execute;
pub mod narc;
pub mod sprite;

use definitions::{NarcCommands, OtherpokeCommands, PaletteCommands, PokegraCommands, SpriteCommands};

#[derive(Subcommand)]
pub enum Commands {
    /// NARC archive operations
    Narc {
        #[command(subcommand)]
        command: NarcCommands,
    },

    /// Convert single sprite/palette files
    Sprite {
        #[command(subcommand)]
        command: SpriteCommands,
    },

    /// Inspect palette files
    Palette {
        #[command(subcommand)]
        command: PaletteCommands,
    },

    /// Export/import the main sprite archive (pl_pokegra.narc)
    Pokegra {
        #[command(subcommand)]
        command: PokegraCommands,
    },

    /// Export/import the alternate-form archive (pl_otherpoke.narc)
    Otherpoke {
        #[command(subcommand)]
        command: OtherpokeCommands,
    },
}

/// Conversion flags shared by the sprite commands
#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Cipher variant: forward (Platinum) or reverse (Diamond/Pearl)
    #[arg(long, default_value = "forward")]
    pub variant: CipherVariant,

    /// How palette indices past 15 are reduced: clamp or nearest
    #[arg(long, default_value = "clamp")]
    pub reducer: ReducerKind,

    /// Round palette colours down to multiples of 8
    #[arg(long)]
    pub standardize: bool,
}

impl ConvertArgs {
    #[must_use]
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions::new()
            .with_variant(self.variant)
            .with_reducer(self.reducer)
            .with_standardize_colors(self.standardize)
    }
}
