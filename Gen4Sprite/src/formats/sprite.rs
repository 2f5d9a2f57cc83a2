//! Ciphered 4bpp sprite codec
//!
//! A sprite blob is a 48-byte `RGCN` header followed by 3200 little-endian
//! words, each packing four 4-bit pixels (low nibble first) of a 160x80
//! image. The words are XOR-ed with a linear congruential keystream whose
//! seeding and direction depend on the game release ([`CipherVariant`]).

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Sprite width in pixels (two 80x80 frames side by side)
pub const SPRITE_WIDTH: usize = 160;

/// Sprite height in pixels
pub const SPRITE_HEIGHT: usize = 80;

/// Number of pixels in a sprite
pub const PIXEL_COUNT: usize = SPRITE_WIDTH * SPRITE_HEIGHT;

/// Number of 16-bit data words (four pixels each)
pub const WORD_COUNT: usize = PIXEL_COUNT / 4;

/// Size of the sprite header
pub const SPRITE_HEADER_SIZE: usize = 48;

/// Size of a sprite blob
pub const SPRITE_SIZE: usize = SPRITE_HEADER_SIZE + WORD_COUNT * 2;

/// Header written in front of encoded sprite data (`RGCN` + `RAHC` sections)
pub const SPRITE_HEADER: [u8; SPRITE_HEADER_SIZE] = [
    82, 71, 67, 78, 255, 254, 0, 1, 48, 25, 0, 0, 16, 0, 1, 0, //
    82, 65, 72, 67, 32, 25, 0, 0, 10, 0, 20, 0, 3, 0, 0, 0, //
    0, 0, 0, 0, 1, 0, 0, 0, 0, 25, 0, 0, 24, 0, 0, 0,
];

const LCG_MULTIPLIER: u32 = 1103515245;
const LCG_INCREMENT: u32 = 24691;

/// Base added to the plaintext word sum when seeding the reverse cipher
const REVERSE_SEED_BASE: u32 = 31315;

/// Keystream seeding and iteration order of the sprite cipher
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CipherVariant {
    /// Platinum: words 0 to 3199, seeded from the first word
    #[default]
    Forward,
    /// Diamond/Pearl: words 3199 down to 0, seeded from the last word
    Reverse,
}

impl CipherVariant {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CipherVariant::Forward => "forward",
            CipherVariant::Reverse => "reverse",
        }
    }
}

impl fmt::Display for CipherVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CipherVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forward" | "platinum" | "pt" => Ok(CipherVariant::Forward),
            "reverse" | "diamond-pearl" | "dp" => Ok(CipherVariant::Reverse),
            other => Err(format!(
                "unknown cipher variant '{other}' (expected forward/platinum/pt or reverse/diamond-pearl/dp)"
            )),
        }
    }
}

/// A 160x80 grid of palette indices, each in `0..=15`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    pixels: Vec<u8>,
}

impl PixelGrid {
    /// Wrap row-major pixel indices
    ///
    /// # Errors
    /// Returns [`Error::SizeMismatch`] unless there are exactly 12800 pixels,
    /// or [`Error::PixelOutOfRange`] if a value exceeds 15.
    pub fn new(pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != PIXEL_COUNT {
            return Err(Error::SizeMismatch {
                what: "pixel grid",
                expected: PIXEL_COUNT,
                actual: pixels.len(),
            });
        }
        if let Some((index, &value)) = pixels.iter().enumerate().find(|(_, p)| **p > 15) {
            return Err(Error::PixelOutOfRange { index, value });
        }
        Ok(Self { pixels })
    }

    /// A grid filled with index 0
    #[must_use]
    pub fn blank() -> Self {
        Self {
            pixels: vec![0; PIXEL_COUNT],
        }
    }

    /// Pixel at `(x, y)`, or `None` outside the grid
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < SPRITE_WIDTH && y < SPRITE_HEIGHT {
            Some(self.pixels[y * SPRITE_WIDTH + x])
        } else {
            None
        }
    }

    /// Row-major pixel indices
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[must_use]
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

/// XOR `words` with the keystream starting at `seed`, in the variant's order
#[allow(clippy::cast_possible_truncation)]
fn apply_keystream(words: &mut [u16], mut seed: u32, variant: CipherVariant) {
    let mut step = |word: &mut u16| {
        *word ^= (seed & 0xFFFF) as u16;
        seed = seed.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT);
    };
    match variant {
        CipherVariant::Forward => words.iter_mut().for_each(&mut step),
        CipherVariant::Reverse => words.iter_mut().rev().for_each(&mut step),
    }
}

/// Decode a 6448-byte sprite blob into its pixel grid
///
/// The 48-byte header is skipped without validation. The forward variant
/// seeds from the first ciphertext word, the reverse variant from the last.
///
/// # Errors
/// Returns [`Error::SizeMismatch`] if `bytes` is not exactly 6448 bytes.
#[allow(clippy::cast_possible_truncation)]
pub fn decode_sprite(bytes: &[u8], variant: CipherVariant) -> Result<PixelGrid> {
    if bytes.len() != SPRITE_SIZE {
        return Err(Error::SizeMismatch {
            what: "sprite",
            expected: SPRITE_SIZE,
            actual: bytes.len(),
        });
    }

    let mut words: Vec<u16> = bytes[SPRITE_HEADER_SIZE..]
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    let seed = match variant {
        CipherVariant::Forward => u32::from(words[0]),
        CipherVariant::Reverse => u32::from(words[WORD_COUNT - 1]),
    };
    apply_keystream(&mut words, seed, variant);

    let pixels = words
        .iter()
        .flat_map(|&word| {
            [
                (word & 0xF) as u8,
                ((word >> 4) & 0xF) as u8,
                ((word >> 8) & 0xF) as u8,
                ((word >> 12) & 0xF) as u8,
            ]
        })
        .collect();

    Ok(PixelGrid { pixels })
}

/// Encode a pixel grid into a 6448-byte sprite blob
///
/// The forward variant seeds at 0. The reverse variant seeds from
/// `31315 + sum(plaintext words)` (mod 2^32), which is not the seed
/// [`decode_sprite`] derives; both are kept as the games expect them.
#[must_use]
pub fn encode_sprite(grid: &PixelGrid, variant: CipherVariant) -> Vec<u8> {
    let mut words: Vec<u16> = grid
        .pixels
        .chunks_exact(4)
        .map(|p| {
            u16::from(p[0] & 0xF)
                | u16::from(p[1] & 0xF) << 4
                | u16::from(p[2] & 0xF) << 8
                | u16::from(p[3] & 0xF) << 12
        })
        .collect();

    let seed = match variant {
        CipherVariant::Forward => 0,
        CipherVariant::Reverse => words
            .iter()
            .fold(REVERSE_SEED_BASE, |acc, &w| acc.wrapping_add(u32::from(w))),
    };
    apply_keystream(&mut words, seed, variant);

    let mut out = Vec::with_capacity(SPRITE_SIZE);
    out.extend_from_slice(&SPRITE_HEADER);
    for word in words {
        out.extend_from_slice(&word.to_le_bytes());
    }
    out
}
