//! Command execution implementations

use super::definitions::{
    NarcCommands, OtherpokeCommands, PaletteCommands, PokegraCommands, SpriteCommands,
};
use super::batch::SpriteArchive;
use super::{Commands, batch, narc, sprite};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Narc { command } => command.execute(),
            Commands::Sprite { command } => command.execute(),
            Commands::Palette { command } => command.execute(),
            Commands::Pokegra { command } => command.execute(),
            Commands::Otherpoke { command } => command.execute(),
        }
    }
}

impl NarcCommands {
    /// Execute the selected NARC command.
    ///
    /// # Errors
    /// Returns an error if the underlying archive operation fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            NarcCommands::List { source, json } => narc::list(source, *json),
            NarcCommands::Extract {
                source,
                id,
                destination,
            } => narc::extract(source, *id, destination),
            NarcCommands::Unpack {
                source,
                destination,
                quiet,
            } => narc::unpack(source, destination, *quiet),
            NarcCommands::Pack {
                source,
                destination,
                quiet,
            } => narc::pack(source, destination, *quiet),
        }
    }
}

impl SpriteCommands {
    /// Execute the selected sprite command.
    ///
    /// # Errors
    /// Returns an error if the conversion fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            SpriteCommands::ToPng {
                source,
                palette,
                destination,
                variant,
            } => sprite::to_png(source, palette, destination, *variant),
            SpriteCommands::FromPng {
                source,
                destination,
                palette,
                convert,
            } => sprite::from_png(source, destination, palette, &convert.options()),
        }
    }
}

impl PaletteCommands {
    /// Execute the selected palette command.
    ///
    /// # Errors
    /// Returns an error if the palette cannot be read.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            PaletteCommands::Show { source, json } => sprite::show_palette(source, *json),
        }
    }
}

impl PokegraCommands {
    /// Execute the selected main sprite archive command.
    ///
    /// # Errors
    /// Returns an error if the archive cannot be read or written.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            PokegraCommands::Export {
                source,
                destination,
                variant,
                quiet,
            } => batch::export(
                SpriteArchive::Pokegra,
                source,
                destination,
                *variant,
                *quiet,
            ),
            PokegraCommands::Import {
                source,
                destination,
                original,
                convert,
                quiet,
            } => batch::import(
                SpriteArchive::Pokegra,
                source,
                destination,
                original.as_deref(),
                &convert.options(),
                *quiet,
            ),
        }
    }
}

impl OtherpokeCommands {
    /// Execute the selected alternate-form archive command.
    ///
    /// # Errors
    /// Returns an error if the archive cannot be read or written.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            OtherpokeCommands::Export {
                source,
                destination,
                variant,
                quiet,
            } => batch::export(
                SpriteArchive::Otherpoke,
                source,
                destination,
                *variant,
                *quiet,
            ),
            OtherpokeCommands::Import {
                source,
                destination,
                original,
                convert,
                quiet,
            } => batch::import(
                SpriteArchive::Otherpoke,
                source,
                destination,
                original.as_deref(),
                &convert.options(),
                *quiet,
            ),
        }
    }
}
