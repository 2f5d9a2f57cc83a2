//! Options for sprite/PNG conversions

use std::fmt;
use std::str::FromStr;

use super::image_bridge::{ClampReducer, NearestColorReducer, PaletteReducer};
use crate::formats::CipherVariant;

/// Strategy used when an indexed image references palette entries past 15
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReducerKind {
    /// Clamp every index above 15 to 15
    #[default]
    Clamp,
    /// Map each index above 15 to the closest of the first 16 colours
    Nearest,
}

impl ReducerKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ReducerKind::Clamp => "clamp",
            ReducerKind::Nearest => "nearest",
        }
    }

    /// The reducer implementing this strategy
    #[must_use]
    pub fn reducer(&self) -> &'static dyn PaletteReducer {
        match self {
            ReducerKind::Clamp => &ClampReducer,
            ReducerKind::Nearest => &NearestColorReducer,
        }
    }
}

impl fmt::Display for ReducerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReducerKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clamp" => Ok(ReducerKind::Clamp),
            "nearest" => Ok(ReducerKind::Nearest),
            other => Err(format!("unknown reducer '{other}' (expected clamp or nearest)")),
        }
    }
}

/// Options for converting between sprite blobs and images.
///
/// # Example
///
/// ```
/// use gen4sprite::converter::{ConvertOptions, ReducerKind};
/// use gen4sprite::formats::CipherVariant;
///
/// let options = ConvertOptions::new()
///     .with_variant(CipherVariant::Reverse)
///     .with_reducer(ReducerKind::Nearest)
///     .with_standardize_colors(true);
/// assert_eq!(options.variant, CipherVariant::Reverse);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Cipher variant of the target game release
    pub variant: CipherVariant,

    /// How indices past 15 are brought into range
    pub reducer: ReducerKind,

    /// Round palette channels down to multiples of 8 before encoding
    pub standardize_colors: bool,
}

impl ConvertOptions {
    /// Forward cipher, clamping, no colour standardisation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_variant(mut self, variant: CipherVariant) -> Self {
        self.variant = variant;
        self
    }

    #[must_use]
    pub fn with_reducer(mut self, reducer: ReducerKind) -> Self {
        self.reducer = reducer;
        self
    }

    #[must_use]
    pub fn with_standardize_colors(mut self, standardize: bool) -> Self {
        self.standardize_colors = standardize;
        self
    }
}
