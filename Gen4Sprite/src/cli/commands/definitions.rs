//! Subcommand enum definitions for CLI

use clap::Subcommand;
use std::path::PathBuf;

use super::ConvertArgs;
use crate::formats::CipherVariant;

/// NARC archive commands
#[derive(Subcommand)]
pub enum NarcCommands {
    /// List archive entries
    List {
        /// Source NARC file
        #[arg(short, long)]
        source: PathBuf,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract a single entry
    Extract {
        /// Source NARC file
        #[arg(short, long)]
        source: PathBuf,

        /// Entry id
        #[arg(long, allow_negative_numbers = true)]
        id: i64,

        /// Output file
        #[arg(short, long)]
        destination: PathBuf,
    },

    /// Unpack every entry as file_NNNN.bin
    Unpack {
        /// Source NARC file
        #[arg(short, long)]
        source: PathBuf,

        /// Output directory
        #[arg(short, long)]
        destination: PathBuf,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Pack the .bin files of a directory into an archive
    Pack {
        /// Source directory
        #[arg(short, long)]
        source: PathBuf,

        /// Output NARC file
        #[arg(short, long)]
        destination: PathBuf,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },
}

/// Single sprite conversion commands
#[derive(Subcommand)]
pub enum SpriteCommands {
    /// Render a sprite with a palette as an indexed PNG
    ToPng {
        /// Sprite file (6448 bytes)
        #[arg(short, long)]
        source: PathBuf,

        /// Palette file (72 bytes)
        #[arg(short, long)]
        palette: PathBuf,

        /// Output PNG
        #[arg(short, long)]
        destination: PathBuf,

        /// Cipher variant: forward (Platinum) or reverse (Diamond/Pearl)
        #[arg(long, default_value = "forward")]
        variant: CipherVariant,
    },

    /// Encode a PNG (64x64, 80x80 or 160x80) as sprite and palette files
    FromPng {
        /// Source PNG
        #[arg(short, long)]
        source: PathBuf,

        /// Output sprite file
        #[arg(short, long)]
        destination: PathBuf,

        /// Output palette file
        #[arg(short, long)]
        palette: PathBuf,

        #[command(flatten)]
        convert: ConvertArgs,
    },
}

/// Palette commands
#[derive(Subcommand)]
pub enum PaletteCommands {
    /// Print the 16 colours of a palette file
    Show {
        /// Palette file (72 bytes)
        #[arg(short, long)]
        source: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Main sprite archive commands
#[derive(Subcommand)]
pub enum PokegraCommands {
    /// Export every species as pokemon_NNN/ PNG directories
    Export {
        /// Source NARC file
        #[arg(short, long)]
        source: PathBuf,

        /// Output directory
        #[arg(short, long)]
        destination: PathBuf,

        /// Cipher variant: forward (Platinum) or reverse (Diamond/Pearl)
        #[arg(long, default_value = "forward")]
        variant: CipherVariant,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Rebuild an archive from pokemon_NNN/ PNG directories
    Import {
        /// Source directory
        #[arg(short, long)]
        source: PathBuf,

        /// Output NARC file
        #[arg(short, long)]
        destination: PathBuf,

        /// Original archive whose slot structure is preserved
        #[arg(long)]
        original: Option<PathBuf>,

        #[command(flatten)]
        convert: ConvertArgs,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },
}

/// Alternate-form archive commands
#[derive(Subcommand)]
pub enum OtherpokeCommands {
    /// Export every form group as PNG directories
    Export {
        /// Source NARC file
        #[arg(short, long)]
        source: PathBuf,

        /// Output directory
        #[arg(short, long)]
        destination: PathBuf,

        /// Cipher variant: forward (Platinum) or reverse (Diamond/Pearl)
        #[arg(long, default_value = "forward")]
        variant: CipherVariant,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Rebuild an archive from form group PNG directories
    Import {
        /// Source directory
        #[arg(short, long)]
        source: PathBuf,

        /// Output NARC file
        #[arg(short, long)]
        destination: PathBuf,

        /// Original archive to start from
        #[arg(long)]
        original: Option<PathBuf>,

        #[command(flatten)]
        convert: ConvertArgs,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },
}
