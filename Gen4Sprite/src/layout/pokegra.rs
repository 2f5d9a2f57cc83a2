//! Main sprite archive layout
//!
//! Species `n` owns entries `6n..6n + 6`:
//!
//! | offset | content          |
//! |--------|------------------|
//! | 0      | female back      |
//! | 1      | male back        |
//! | 2      | female front     |
//! | 3      | male front       |
//! | 4      | normal palette   |
//! | 5      | shiny palette    |
//!
//! Species without gender differences keep an empty placeholder in the
//! female slots.

use super::PaletteKind;

/// Archive entries owned by one species
pub const ENTRIES_PER_SPECIES: usize = 6;

/// Prefix of the per-species directories in an exported tree
pub const SPECIES_DIR_PREFIX: &str = "pokemon_";

/// One of the six entries of a species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PokegraSlot {
    FemaleBack,
    MaleBack,
    FemaleFront,
    MaleFront,
    NormalPalette,
    ShinyPalette,
}

impl PokegraSlot {
    /// The four sprite slots, in archive order
    pub const SPRITES: [PokegraSlot; 4] = [
        PokegraSlot::FemaleBack,
        PokegraSlot::MaleBack,
        PokegraSlot::FemaleFront,
        PokegraSlot::MaleFront,
    ];

    /// Offset of this slot within the species' block
    #[must_use]
    pub fn offset(self) -> usize {
        match self {
            PokegraSlot::FemaleBack => 0,
            PokegraSlot::MaleBack => 1,
            PokegraSlot::FemaleFront => 2,
            PokegraSlot::MaleFront => 3,
            PokegraSlot::NormalPalette => 4,
            PokegraSlot::ShinyPalette => 5,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PokegraSlot::FemaleBack => "female_back",
            PokegraSlot::MaleBack => "male_back",
            PokegraSlot::FemaleFront => "female_front",
            PokegraSlot::MaleFront => "male_front",
            PokegraSlot::NormalPalette => "normal_palette",
            PokegraSlot::ShinyPalette => "shiny_palette",
        }
    }

    #[must_use]
    pub fn is_palette(self) -> bool {
        matches!(self, PokegraSlot::NormalPalette | PokegraSlot::ShinyPalette)
    }

    /// Palette slot for the given palette kind
    #[must_use]
    pub fn palette(kind: PaletteKind) -> Self {
        match kind {
            PaletteKind::Normal => PokegraSlot::NormalPalette,
            PaletteKind::Shiny => PokegraSlot::ShinyPalette,
        }
    }

    /// PNG file name for this sprite slot rendered with `kind`, e.g. `male_front_shiny.png`
    #[must_use]
    pub fn png_name(self, kind: PaletteKind) -> String {
        format!("{}_{}.png", self.as_str(), kind.as_str())
    }
}

/// Archive entry id of `slot` for `species`
#[must_use]
pub fn entry_index(species: usize, slot: PokegraSlot) -> usize {
    species * ENTRIES_PER_SPECIES + slot.offset()
}

/// Number of complete species blocks in an archive of `entry_count` entries
#[must_use]
pub fn species_count(entry_count: usize) -> usize {
    entry_count / ENTRIES_PER_SPECIES
}

/// Directory name of a species in an exported tree (`pokemon_007`)
#[must_use]
pub fn species_dir_name(species: usize) -> String {
    format!("{SPECIES_DIR_PREFIX}{species:03}")
}

/// Species number of a `pokemon_NNN` directory name
#[must_use]
pub fn parse_species_dir(name: &str) -> Option<usize> {
    name.strip_prefix(SPECIES_DIR_PREFIX)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_index() {
        assert_eq!(entry_index(0, PokegraSlot::FemaleBack), 0);
        assert_eq!(entry_index(0, PokegraSlot::ShinyPalette), 5);
        assert_eq!(entry_index(25, PokegraSlot::MaleFront), 153);
        assert_eq!(entry_index(25, PokegraSlot::NormalPalette), 154);
    }

    #[test]
    fn test_species_count_ignores_partial_block() {
        assert_eq!(species_count(0), 0);
        assert_eq!(species_count(5), 0);
        assert_eq!(species_count(6), 1);
        assert_eq!(species_count(3000), 500);
        assert_eq!(species_count(3001), 500);
    }

    #[test]
    fn test_slot_names() {
        assert_eq!(
            PokegraSlot::FemaleBack.png_name(PaletteKind::Shiny),
            "female_back_shiny.png"
        );
        assert!(PokegraSlot::ShinyPalette.is_palette());
        assert!(!PokegraSlot::MaleFront.is_palette());
        assert_eq!(PokegraSlot::palette(PaletteKind::Normal).offset(), 4);
    }

    #[test]
    fn test_species_dir_names() {
        assert_eq!(species_dir_name(7), "pokemon_007");
        assert_eq!(species_dir_name(493), "pokemon_493");
        assert_eq!(parse_species_dir("pokemon_007"), Some(7));
        assert_eq!(parse_species_dir("pokemon_1000"), Some(1000));
        assert_eq!(parse_species_dir("pokemon_"), None);
        assert_eq!(parse_species_dir("deoxys"), None);
    }
}
