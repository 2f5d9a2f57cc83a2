//! Static slot tables for the sprite archives
//!
//! The main sprite archive stores six entries per species (four sprites and
//! two palettes). The alternate-form archive groups sprites by Pokémon with
//! a per-group ordering, followed by a palette block. Both layouts are fixed
//! by the game data and described here as tables.

pub mod otherpoke;
pub mod pokegra;

use serde::Serialize;

pub use otherpoke::{FormGroup, FormPalettes, FormSlots, SpriteSlots};
pub use pokegra::{ENTRIES_PER_SPECIES, PokegraSlot};

/// Order of back/front sprites inside a form group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpriteLayout {
    /// back, front, back, front, ... one pair per form
    BackFront,
    /// every back sprite first, then every front sprite
    BackBackFrontFront,
    /// a single sprite with no back/front split
    Single,
}

impl SpriteLayout {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SpriteLayout::BackFront => "back_front",
            SpriteLayout::BackBackFrontFront => "back_back_front_front",
            SpriteLayout::Single => "single",
        }
    }
}

/// Which of the two palettes a sprite is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PaletteKind {
    Normal,
    Shiny,
}

impl PaletteKind {
    pub const ALL: [PaletteKind; 2] = [PaletteKind::Normal, PaletteKind::Shiny];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PaletteKind::Normal => "normal",
            PaletteKind::Shiny => "shiny",
        }
    }
}
