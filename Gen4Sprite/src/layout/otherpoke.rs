//! Alternate-form archive layout
//!
//! Entries 0-153 hold the form sprites of a fixed set of Pokémon, 154-247
//! their palettes, and 248-252 the substitute doll and its shadow. Each
//! [`FormGroup`] names a contiguous sprite range, its forms and how the
//! back/front sprites are interleaved.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::OnceLock;

use serde::Serialize;

use super::{PaletteKind, SpriteLayout};
use crate::error::{Error, Result};

/// Palette entry ids of one form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormPalettes {
    pub normal: usize,
    /// Eggs and the substitute doll have no shiny palette
    pub shiny: Option<usize>,
}

impl FormPalettes {
    /// Palette id for `kind`, if the form has one
    #[must_use]
    pub fn get(&self, kind: PaletteKind) -> Option<usize> {
        match kind {
            PaletteKind::Normal => Some(self.normal),
            PaletteKind::Shiny => self.shiny,
        }
    }
}

/// Sprite entry ids of one form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpriteSlots {
    Pair { back: usize, front: usize },
    Single(usize),
}

/// A form together with its sprite entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormSlots {
    pub form: &'static str,
    pub sprites: SpriteSlots,
}

/// A Pokémon (or special sprite) with several forms in the archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormGroup {
    pub name: &'static str,
    /// Sprite entries owned by the group
    pub range: Range<usize>,
    pub forms: &'static [&'static str],
    pub layout: SpriteLayout,
    /// Palettes of each form, in `forms` order
    palettes: Vec<FormPalettes>,
}

impl FormGroup {
    /// Resolve the sprite entries of every form
    ///
    /// Slots that would fall outside `range` are skipped.
    #[must_use]
    pub fn sprite_slots(&self) -> Vec<FormSlots> {
        let start = self.range.start;
        let count = self.forms.len();

        let mut slots = Vec::with_capacity(count);
        for (i, &form) in self.forms.iter().enumerate() {
            let sprites = match self.layout {
                SpriteLayout::BackFront => SpriteSlots::Pair {
                    back: start + i * 2,
                    front: start + i * 2 + 1,
                },
                SpriteLayout::BackBackFrontFront => SpriteSlots::Pair {
                    back: start + i,
                    front: start + count + i,
                },
                SpriteLayout::Single => SpriteSlots::Single(start + i),
            };
            let in_range = match sprites {
                SpriteSlots::Pair { back, front } => {
                    self.range.contains(&back) && self.range.contains(&front)
                }
                SpriteSlots::Single(id) => self.range.contains(&id),
            };
            if in_range {
                slots.push(FormSlots { form, sprites });
            }
        }
        slots
    }

    /// Palette entries of `form`, or `None` if the group has no such form
    #[must_use]
    pub fn palette_for(&self, form: &str) -> Option<FormPalettes> {
        let index = self.forms.iter().position(|&f| f == form)?;
        self.palettes.get(index).copied()
    }

    /// Every `(form, palettes)` pair, in form order
    pub fn form_palettes(&self) -> impl Iterator<Item = (&'static str, FormPalettes)> + '_ {
        self.forms.iter().copied().zip(self.palettes.iter().copied())
    }

    /// Highest entry id referenced by the group (sprites or palettes)
    #[must_use]
    pub fn max_entry(&self) -> usize {
        let sprite_max = self.range.end.saturating_sub(1);
        self.palettes
            .iter()
            .map(|p| p.shiny.unwrap_or(p.normal).max(p.normal))
            .fold(sprite_max, usize::max)
    }
}

/// Number of entries in the alternate-form archive
pub const OTHERPOKE_ENTRY_COUNT: usize = 253;

const DEOXYS: &[&str] = &["normal", "attack", "defense", "speed"];
const UNOWN: &[&str] = &[
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R",
    "S", "T", "U", "V", "W", "X", "Y", "Z", "exclamation", "question",
];
const CASTFORM: &[&str] = &["normal", "sun", "rain", "hail"];
const CLOAKS: &[&str] = &["grass", "sand", "trash"];
const SEAS: &[&str] = &["west", "east"];
const CHERRIM: &[&str] = &["closed", "blossom"];
const ARCEUS: &[&str] = &[
    "normal", "fighting", "flying", "poison", "ground", "rock", "bug", "ghost", "steel", "fire",
    "water", "grass", "electric", "psychic", "ice", "dragon", "dark", "fairy",
];
/// Arceus palettes are stored in a different order than its sprites
const ARCEUS_PALETTE_ORDER: &[&str] = &[
    "normal", "fighting", "flying", "poison", "ground", "rock", "bug", "ghost", "steel", "fairy",
    "fire", "water", "grass", "electric", "psychic", "ice", "dragon", "dark",
];
const SHAYMIN: &[&str] = &["land", "sky"];
const ROTOM: &[&str] = &["normal", "heat", "wash", "frost", "fan", "mow"];
const GIRATINA: &[&str] = &["altered", "origin"];
const SINGLE: &[&str] = &["normal"];

/// How palette ids are assigned to the forms of a group
#[derive(Debug, Clone, Copy)]
enum PaletteScheme {
    /// every form uses the same normal/shiny pair
    Shared(usize),
    /// normal, shiny, normal, shiny, ... per form
    Interleaved(usize),
    /// all normals first, then all shinies
    Grouped(usize),
    /// interleaved pairs in the given form order
    Ordered(usize, &'static [&'static str]),
    /// a single normal palette
    NormalOnly(usize),
}

impl PaletteScheme {
    fn resolve(self, forms: &[&str]) -> Vec<FormPalettes> {
        let pair = |normal: usize| FormPalettes {
            normal,
            shiny: Some(normal + 1),
        };
        match self {
            PaletteScheme::Shared(base) => vec![pair(base); forms.len()],
            PaletteScheme::Interleaved(base) => {
                (0..forms.len()).map(|i| pair(base + i * 2)).collect()
            }
            PaletteScheme::Grouped(base) => (0..forms.len())
                .map(|i| FormPalettes {
                    normal: base + i,
                    shiny: Some(base + forms.len() + i),
                })
                .collect(),
            PaletteScheme::Ordered(base, order) => forms
                .iter()
                .map(|form| {
                    let position = order.iter().position(|f| f == form).unwrap_or_default();
                    pair(base + position * 2)
                })
                .collect(),
            PaletteScheme::NormalOnly(id) => vec![
                FormPalettes {
                    normal: id,
                    shiny: None,
                };
                forms.len()
            ],
        }
    }
}

type GroupDef = (
    &'static str,
    Range<usize>,
    &'static [&'static str],
    SpriteLayout,
    PaletteScheme,
);

fn group_defs() -> Vec<GroupDef> {
    use PaletteScheme::{Grouped, Interleaved, NormalOnly, Ordered, Shared};
    use SpriteLayout::{BackBackFrontFront, BackFront, Single};

    vec![
        ("deoxys", 0..8, DEOXYS, BackFront, Shared(154)),
        ("unown", 8..64, UNOWN, BackFront, Shared(156)),
        ("castform", 64..72, CASTFORM, BackBackFrontFront, Grouped(158)),
        ("burmy", 72..78, CLOAKS, BackFront, Interleaved(166)),
        ("wormadam", 78..84, CLOAKS, BackFront, Interleaved(172)),
        ("shellos", 84..88, SEAS, BackBackFrontFront, Interleaved(178)),
        ("gastrodon", 88..92, SEAS, BackBackFrontFront, Interleaved(182)),
        ("cherrim", 92..96, CHERRIM, BackBackFrontFront, Grouped(186)),
        ("arceus", 96..132, ARCEUS, BackFront, Ordered(190, ARCEUS_PALETTE_ORDER)),
        ("egg", 132..133, SINGLE, Single, NormalOnly(226)),
        ("manaphy_egg", 133..134, SINGLE, Single, NormalOnly(227)),
        ("shaymin", 134..138, SHAYMIN, BackFront, Interleaved(228)),
        ("rotom", 138..150, ROTOM, BackFront, Interleaved(232)),
        ("giratina", 150..154, GIRATINA, BackFront, Interleaved(244)),
        ("substitute_doll", 248..250, SINGLE, BackFront, NormalOnly(250)),
        ("substitute_doll_shadow", 251..252, SINGLE, Single, NormalOnly(252)),
    ]
}

struct FormTable {
    groups: Vec<FormGroup>,
    by_name: HashMap<&'static str, usize>,
}

fn table() -> &'static FormTable {
    static TABLE: OnceLock<FormTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let groups: Vec<FormGroup> = group_defs()
            .into_iter()
            .map(|(name, range, forms, layout, scheme)| FormGroup {
                name,
                range,
                forms,
                layout,
                palettes: scheme.resolve(forms),
            })
            .collect();
        let by_name = groups
            .iter()
            .enumerate()
            .map(|(i, group)| (group.name, i))
            .collect();
        FormTable { groups, by_name }
    })
}

/// All form groups, in archive order
#[must_use]
pub fn form_groups() -> &'static [FormGroup] {
    &table().groups
}

/// Look up a form group by name
///
/// # Errors
/// Returns [`Error::UnknownFormGroup`] if no group has that name.
pub fn form_group(name: &str) -> Result<&'static FormGroup> {
    let table = table();
    table
        .by_name
        .get(name)
        .map(|&i| &table.groups[i])
        .ok_or_else(|| Error::UnknownFormGroup(name.to_string()))
}

/// Number of entries the table covers (highest sprite or palette id + 1)
#[must_use]
pub fn entry_count() -> usize {
    form_groups()
        .iter()
        .map(FormGroup::max_entry)
        .max()
        .map_or(0, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn pair(group: &str, form: &str) -> (usize, usize) {
        let group = form_group(group).unwrap();
        let slots = group.sprite_slots();
        let slot = slots.iter().find(|s| s.form == form).unwrap();
        match slot.sprites {
            SpriteSlots::Pair { back, front } => (back, front),
            SpriteSlots::Single(_) => panic!("{form} is a single sprite"),
        }
    }

    #[test]
    fn test_entry_count() {
        assert_eq!(entry_count(), OTHERPOKE_ENTRY_COUNT);
        assert_eq!(form_groups().len(), 16);
    }

    #[test]
    fn test_back_front_layout() {
        assert_eq!(pair("deoxys", "normal"), (0, 1));
        assert_eq!(pair("deoxys", "speed"), (6, 7));
        assert_eq!(pair("unown", "A"), (8, 9));
        assert_eq!(pair("unown", "question"), (62, 63));
        assert_eq!(pair("arceus", "fairy"), (130, 131));
        assert_eq!(pair("substitute_doll", "normal"), (248, 249));
    }

    #[test]
    fn test_back_back_front_front_layout() {
        assert_eq!(pair("castform", "normal"), (64, 68));
        assert_eq!(pair("castform", "hail"), (67, 71));
        assert_eq!(pair("cherrim", "closed"), (92, 94));
        assert_eq!(pair("cherrim", "blossom"), (93, 95));
        assert_eq!(pair("gastrodon", "east"), (89, 91));
    }

    #[test]
    fn test_single_layout() {
        let egg = form_group("egg").unwrap();
        assert_eq!(
            egg.sprite_slots(),
            vec![FormSlots {
                form: "normal",
                sprites: SpriteSlots::Single(132),
            }]
        );
        let shadow = form_group("substitute_doll_shadow").unwrap();
        assert_eq!(shadow.sprite_slots()[0].sprites, SpriteSlots::Single(251));
    }

    #[test]
    fn test_palettes() {
        let palette = |group: &str, form: &str| form_group(group).unwrap().palette_for(form).unwrap();

        assert_eq!(palette("deoxys", "attack"), FormPalettes { normal: 154, shiny: Some(155) });
        assert_eq!(palette("unown", "Q"), FormPalettes { normal: 156, shiny: Some(157) });
        assert_eq!(palette("castform", "rain"), FormPalettes { normal: 160, shiny: Some(164) });
        assert_eq!(palette("cherrim", "blossom"), FormPalettes { normal: 187, shiny: Some(189) });
        assert_eq!(palette("shellos", "east"), FormPalettes { normal: 180, shiny: Some(181) });
        assert_eq!(palette("arceus", "steel"), FormPalettes { normal: 206, shiny: Some(207) });
        assert_eq!(palette("arceus", "fairy"), FormPalettes { normal: 208, shiny: Some(209) });
        assert_eq!(palette("arceus", "fire"), FormPalettes { normal: 210, shiny: Some(211) });
        assert_eq!(palette("arceus", "dark"), FormPalettes { normal: 224, shiny: Some(225) });
        assert_eq!(palette("egg", "normal"), FormPalettes { normal: 226, shiny: None });
        assert_eq!(palette("giratina", "origin"), FormPalettes { normal: 246, shiny: Some(247) });
        assert_eq!(palette("substitute_doll_shadow", "normal").normal, 252);

        assert!(form_group("arceus").unwrap().palette_for("sound").is_none());
    }

    #[test]
    fn test_no_slot_is_claimed_twice() {
        let mut seen = HashSet::new();
        for group in form_groups() {
            for slot in group.sprite_slots() {
                match slot.sprites {
                    SpriteSlots::Pair { back, front } => {
                        assert!(seen.insert(back), "{} back {back}", group.name);
                        assert!(seen.insert(front), "{} front {front}", group.name);
                    }
                    SpriteSlots::Single(id) => assert!(seen.insert(id)),
                }
            }
        }
        let mut palettes = HashSet::new();
        for group in form_groups() {
            for (_, p) in group.form_palettes() {
                palettes.insert(p.normal);
                palettes.extend(p.shiny);
            }
        }
        assert!(seen.is_disjoint(&palettes));
        // 154..248 plus the two doll palettes
        assert_eq!(palettes.len(), 94 + 2);
    }

    #[test]
    fn test_unknown_group() {
        assert!(matches!(
            form_group("missingno"),
            Err(Error::UnknownFormGroup(name)) if name == "missingno"
        ));
    }
}
