//! RGB555 palette codec
//!
//! A palette blob is a 40-byte `RLCN` header followed by 16 little-endian
//! RGB555 words (red in bits 0-4, green 5-9, blue 10-14).

use serde::Serialize;

use crate::error::{Error, Result};

/// Number of colours in a sprite palette
pub const PALETTE_COLORS: usize = 16;

/// Size of the palette header
pub const PALETTE_HEADER_SIZE: usize = 40;

/// Size of a palette blob
pub const PALETTE_SIZE: usize = PALETTE_HEADER_SIZE + PALETTE_COLORS * 2;

/// Header written in front of encoded palette data (`RLCN` + `TTLP` sections)
pub const PALETTE_HEADER: [u8; PALETTE_HEADER_SIZE] = [
    82, 76, 67, 78, 255, 254, 0, 1, 72, 0, 0, 0, 16, 0, 1, 0, //
    84, 84, 76, 80, 56, 0, 0, 0, 4, 0, 10, 0, 0, 0, 0, 0, //
    32, 0, 0, 0, 16, 0, 0, 0,
];

/// An 8-bit-per-channel colour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Expand an RGB555 word; each 5-bit channel is shifted left by 3
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_rgb555(value: u16) -> Self {
        let channel = |shift: u16| (((value >> shift) & 0x1F) << 3) as u8;
        Self {
            r: channel(0),
            g: channel(5),
            b: channel(10),
        }
    }

    /// Pack into an RGB555 word, dropping the low 3 bits of each channel
    #[must_use]
    pub fn to_rgb555(self) -> u16 {
        u16::from(self.r >> 3) | u16::from(self.g >> 3) << 5 | u16::from(self.b >> 3) << 10
    }

    /// Each channel rounded down to a multiple of 8
    #[must_use]
    pub fn standardized(self) -> Self {
        Self {
            r: self.r & !7,
            g: self.g & !7,
            b: self.b & !7,
        }
    }

    /// Squared Euclidean distance in RGB space
    #[must_use]
    pub fn distance_squared(self, other: Rgb) -> u32 {
        let d = |a: u8, b: u8| {
            let diff = i32::from(a) - i32::from(b);
            diff.unsigned_abs() * diff.unsigned_abs()
        };
        d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b)
    }
}

/// A 16-entry colour table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Palette {
    colors: [Rgb; PALETTE_COLORS],
}

impl Palette {
    /// Build a palette from up to 16 colours; missing slots are black, extras are dropped
    #[must_use]
    pub fn from_colors(colors: &[Rgb]) -> Self {
        let mut palette = Self::default();
        for (slot, color) in palette.colors.iter_mut().zip(colors) {
            *slot = *color;
        }
        palette
    }

    /// The 16-step grey ramp used when an archive slot has no palette
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn grayscale() -> Self {
        let mut palette = Self::default();
        for (i, slot) in palette.colors.iter_mut().enumerate() {
            let gray = (i * 16) as u8;
            *slot = Rgb::new(gray, gray, gray);
        }
        palette
    }

    /// Copy with every channel rounded down to a multiple of 8
    #[must_use]
    pub fn standardized(&self) -> Self {
        Self {
            colors: self.colors.map(Rgb::standardized),
        }
    }

    #[must_use]
    pub fn colors(&self) -> &[Rgb; PALETTE_COLORS] {
        &self.colors
    }

    /// Colour at `index`, or `None` past the 16 entries
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.colors.get(index).copied()
    }
}

/// Decode a 72-byte palette blob
///
/// # Errors
/// Returns [`Error::SizeMismatch`] if `bytes` is not exactly 72 bytes.
pub fn decode_palette(bytes: &[u8]) -> Result<Palette> {
    if bytes.len() != PALETTE_SIZE {
        return Err(Error::SizeMismatch {
            what: "palette",
            expected: PALETTE_SIZE,
            actual: bytes.len(),
        });
    }

    let mut palette = Palette::default();
    for (slot, pair) in palette
        .colors
        .iter_mut()
        .zip(bytes[PALETTE_HEADER_SIZE..].chunks_exact(2))
    {
        *slot = Rgb::from_rgb555(u16::from_le_bytes([pair[0], pair[1]]));
    }
    Ok(palette)
}

/// Encode a palette into a 72-byte blob
#[must_use]
pub fn encode_palette(palette: &Palette) -> Vec<u8> {
    let mut out = Vec::with_capacity(PALETTE_SIZE);
    out.extend_from_slice(&PALETTE_HEADER);
    for color in &palette.colors {
        out.extend_from_slice(&color.to_rgb555().to_le_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_size() {
        assert_eq!(PALETTE_SIZE, 72);
    }

    #[test]
    fn test_decode_rejects_wrong_sizes() {
        for len in [71, 73] {
            assert!(matches!(
                decode_palette(&vec![0; len]),
                Err(Error::SizeMismatch { expected: 72, .. })
            ));
        }
    }

    #[test]
    fn test_channel_bit_layout() {
        assert_eq!(Rgb::new(248, 0, 0).to_rgb555(), 0x001F);
        assert_eq!(Rgb::new(0, 248, 0).to_rgb555(), 0x03E0);
        assert_eq!(Rgb::new(0, 0, 248).to_rgb555(), 0x7C00);
        assert_eq!(Rgb::from_rgb555(0x7FFF), Rgb::new(248, 248, 248));
        // bit 15 is ignored
        assert_eq!(Rgb::from_rgb555(0x8001), Rgb::new(8, 0, 0));
    }

    #[test]
    fn test_encode_layout() {
        let palette = Palette::from_colors(&[Rgb::new(8, 16, 24)]);
        let bytes = encode_palette(&palette);
        assert_eq!(bytes.len(), 72);
        assert_eq!(&bytes[..40], &PALETTE_HEADER);
        // r=1, g=2, b=3
        assert_eq!(u16::from_le_bytes([bytes[40], bytes[41]]), 1 | 2 << 5 | 3 << 10);
        assert!(bytes[42..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_round_trip_multiples_of_eight() {
        let colors: Vec<Rgb> = (0..16u8)
            .map(|i| Rgb::new(i * 8, 248 - i * 8, (i % 4) * 64))
            .collect();
        let palette = Palette::from_colors(&colors);
        assert_eq!(decode_palette(&encode_palette(&palette)).unwrap(), palette);
    }

    #[test]
    fn test_loss_confined_to_low_bits() {
        let colors: Vec<Rgb> = (0..16u8)
            .map(|i| Rgb::new(i * 16 + 7, 255 - i, i * 13 + 3))
            .collect();
        let palette = Palette::from_colors(&colors);
        let decoded = decode_palette(&encode_palette(&palette)).unwrap();
        for (original, back) in palette.colors().iter().zip(decoded.colors()) {
            assert_eq!(*back, original.standardized());
            assert!(original.r - back.r < 8);
            assert!(original.g - back.g < 8);
            assert!(original.b - back.b < 8);
        }
    }

    #[test]
    fn test_from_colors_pads_and_truncates() {
        let short = Palette::from_colors(&[Rgb::new(1, 2, 3)]);
        assert_eq!(short.get(0), Some(Rgb::new(1, 2, 3)));
        assert_eq!(short.get(15), Some(Rgb::default()));
        assert_eq!(short.get(16), None);

        let long: Vec<Rgb> = (0..20u8).map(|i| Rgb::new(i, i, i)).collect();
        let palette = Palette::from_colors(&long);
        assert_eq!(palette.get(15), Some(Rgb::new(15, 15, 15)));
    }

    #[test]
    fn test_grayscale() {
        let gray = Palette::grayscale();
        assert_eq!(gray.get(0), Some(Rgb::new(0, 0, 0)));
        assert_eq!(gray.get(1), Some(Rgb::new(16, 16, 16)));
        assert_eq!(gray.get(15), Some(Rgb::new(240, 240, 240)));
        // survives the 5-bit round trip unchanged
        assert_eq!(decode_palette(&encode_palette(&gray)).unwrap(), gray);
    }

    #[test]
    fn test_standardized() {
        let palette = Palette::from_colors(&[Rgb::new(255, 9, 7)]).standardized();
        assert_eq!(palette.get(0), Some(Rgb::new(248, 8, 0)));
    }

    #[test]
    fn test_distance() {
        assert_eq!(Rgb::new(0, 0, 0).distance_squared(Rgb::new(3, 4, 0)), 25);
        assert_eq!(Rgb::new(10, 10, 10).distance_squared(Rgb::new(10, 10, 10)), 0);
    }

    #[test]
    fn test_palette_serializes() {
        let json = serde_json::to_value(Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(json, serde_json::json!({"r": 1, "g": 2, "b": 3}));
    }
}
