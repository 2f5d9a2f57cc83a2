//! Adapts decoded sprites to and from a portable indexed image
//!
//! Inputs smaller than a full sprite are normalised: 64x64 is centred on an
//! 80x80 canvas (8 pixel border of index 0), and 80x80 is duplicated side by
//! side into 160x80.

use crate::error::{Error, Result};
use crate::formats::{PALETTE_COLORS, Palette, PixelGrid, Rgb, SPRITE_HEIGHT, SPRITE_WIDTH};

/// Width/height of a single sprite frame
pub const FRAME_SIZE: usize = 80;

/// Width/height of the small sprite format padded into a frame
pub const SMALL_FRAME_SIZE: usize = 64;

/// Border added around a 64x64 image
const FRAME_BORDER: usize = (FRAME_SIZE - SMALL_FRAME_SIZE) / 2;

/// An image made of palette indices, with a palette of up to 256 colours
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    palette: Vec<Rgb>,
}

impl IndexedImage {
    /// Create an indexed image from row-major indices
    ///
    /// # Errors
    /// Returns [`Error::SizeMismatch`] if `pixels.len() != width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>, palette: Vec<Rgb>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(Error::SizeMismatch {
                what: "indexed image",
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            palette,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[must_use]
    pub fn palette(&self) -> &[Rgb] {
        &self.palette
    }

    /// Index at `(x, y)`, or `None` outside the image
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x < self.width && y < self.height {
            self.pixels
                .get(y as usize * self.width as usize + x as usize)
                .copied()
        } else {
            None
        }
    }

    /// Highest palette index referenced by any pixel
    #[must_use]
    pub fn max_index(&self) -> u8 {
        self.pixels.iter().copied().max().unwrap_or(0)
    }
}

/// Brings palette indices of 16 and above into the 0-15 range of a sprite.
pub trait PaletteReducer: Send + Sync {
    /// Map `index` (>= 16) to an index in `0..=15`, given the source palette
    fn reduce(&self, index: u8, palette: &[Rgb]) -> u8;
}

/// Clamps every out-of-range index to 15
#[derive(Debug, Clone, Copy, Default)]
pub struct ClampReducer;

impl PaletteReducer for ClampReducer {
    fn reduce(&self, index: u8, _palette: &[Rgb]) -> u8 {
        index.min(15)
    }
}

/// Maps an out-of-range index to the closest of the first 16 palette colours
/// (squared RGB distance, ties to the lowest index)
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestColorReducer;

impl PaletteReducer for NearestColorReducer {
    #[allow(clippy::cast_possible_truncation)]
    fn reduce(&self, index: u8, palette: &[Rgb]) -> u8 {
        let target = palette.get(usize::from(index)).copied().unwrap_or_default();
        palette
            .iter()
            .take(PALETTE_COLORS)
            .enumerate()
            .min_by_key(|(i, color)| (color.distance_squared(target), *i))
            .map_or(15, |(i, _)| i as u8)
    }
}

/// Wrap a decoded sprite as a 160x80 indexed image with its 16 colours
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn to_indexed_image(grid: &PixelGrid, palette: &Palette) -> IndexedImage {
    IndexedImage {
        width: SPRITE_WIDTH as u32,
        height: SPRITE_HEIGHT as u32,
        pixels: grid.pixels().to_vec(),
        palette: palette.colors().to_vec(),
    }
}

/// Convert an indexed image into sprite pixels and palette, clamping indices past 15
///
/// # Errors
/// Returns [`Error::UnsupportedDimensions`] unless the image is 64x64, 80x80 or 160x80.
pub fn from_indexed_image(image: &IndexedImage) -> Result<(PixelGrid, Palette)> {
    from_indexed_image_with(image, &ClampReducer)
}

/// Convert an indexed image into sprite pixels and palette with a custom reducer
///
/// # Errors
/// Returns [`Error::UnsupportedDimensions`] unless the image is 64x64, 80x80 or 160x80.
pub fn from_indexed_image_with(
    image: &IndexedImage,
    reducer: &dyn PaletteReducer,
) -> Result<(PixelGrid, Palette)> {
    let mut pixels = normalize_geometry(image)?;

    if image.max_index() >= 16 {
        tracing::debug!(
            "Image uses palette index {}, reducing to 16 colors",
            image.max_index()
        );
        let mut table = [0u8; 256];
        for (index, slot) in table.iter_mut().enumerate() {
            let index = u8::try_from(index).unwrap_or(u8::MAX);
            *slot = if index < 16 {
                index
            } else {
                reducer.reduce(index, &image.palette).min(15)
            };
        }
        for pixel in &mut pixels {
            *pixel = table[usize::from(*pixel)];
        }
    }

    let grid = PixelGrid::new(pixels)?;
    Ok((grid, Palette::from_colors(&image.palette)))
}

/// Pad or duplicate the image into a row-major 160x80 buffer
fn normalize_geometry(image: &IndexedImage) -> Result<Vec<u8>> {
    let (width, height) = (image.width as usize, image.height as usize);
    match (width, height) {
        (SPRITE_WIDTH, SPRITE_HEIGHT) => Ok(image.pixels.clone()),
        (FRAME_SIZE, FRAME_SIZE) => Ok(duplicate_frame(&image.pixels)),
        (SMALL_FRAME_SIZE, SMALL_FRAME_SIZE) => {
            let mut frame = vec![0u8; FRAME_SIZE * FRAME_SIZE];
            for (y, row) in image.pixels.chunks_exact(SMALL_FRAME_SIZE).enumerate() {
                let at = (y + FRAME_BORDER) * FRAME_SIZE + FRAME_BORDER;
                frame[at..at + SMALL_FRAME_SIZE].copy_from_slice(row);
            }
            Ok(duplicate_frame(&frame))
        }
        _ => Err(Error::UnsupportedDimensions {
            width: image.width,
            height: image.height,
        }),
    }
}

/// Place an 80x80 frame in both halves of a 160x80 buffer
fn duplicate_frame(frame: &[u8]) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(SPRITE_WIDTH * SPRITE_HEIGHT);
    for row in frame.chunks_exact(FRAME_SIZE) {
        pixels.extend_from_slice(row);
        pixels.extend_from_slice(row);
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(size: u32) -> IndexedImage {
        let pixels = (0..size * size)
            .map(|i| u8::try_from((i % size + i / size) % 15 + 1).unwrap())
            .collect();
        IndexedImage::new(size, size, pixels, Palette::grayscale().colors().to_vec()).unwrap()
    }

    #[test]
    fn test_new_validates_length() {
        assert!(matches!(
            IndexedImage::new(10, 10, vec![0; 99], Vec::new()),
            Err(Error::SizeMismatch { expected: 100, actual: 99, .. })
        ));
    }

    #[test]
    fn test_small_image_is_padded_and_mirrored() {
        let image = gradient(64);
        let (grid, _) = from_indexed_image(&image).unwrap();

        for y in 0..80 {
            for x in 0..160 {
                let local_x = x % 80;
                let border = y < 8 || y >= 72 || local_x < 8 || local_x >= 72;
                let value = grid.get(x, y).unwrap();
                if border {
                    assert_eq!(value, 0, "border pixel ({x}, {y})");
                } else {
                    let expected = image.get((local_x - 8) as u32, (y - 8) as u32).unwrap();
                    assert_eq!(value, expected, "pixel ({x}, {y})");
                }
            }
        }
        for y in 0..80 {
            for x in 88..152 {
                assert_eq!(grid.get(x, y), grid.get(x - 80, y));
            }
        }
    }

    #[test]
    fn test_frame_is_duplicated() {
        let image = gradient(80);
        let (grid, _) = from_indexed_image(&image).unwrap();
        for y in 0..80u32 {
            for x in 0..80u32 {
                let expected = image.get(x, y);
                assert_eq!(grid.get(x as usize, y as usize), expected);
                assert_eq!(grid.get(x as usize + 80, y as usize), expected);
            }
        }
    }

    #[test]
    fn test_full_size_passes_through() {
        let pixels: Vec<u8> = (0..12800u32).map(|i| u8::try_from(i % 16).unwrap()).collect();
        let image = IndexedImage::new(160, 80, pixels.clone(), Vec::new()).unwrap();
        let (grid, palette) = from_indexed_image(&image).unwrap();
        assert_eq!(grid.pixels(), pixels.as_slice());
        assert_eq!(palette, Palette::default());
    }

    #[test]
    fn test_unsupported_dimensions() {
        let image = IndexedImage::new(32, 32, vec![0; 1024], Vec::new()).unwrap();
        assert!(matches!(
            from_indexed_image(&image),
            Err(Error::UnsupportedDimensions { width: 32, height: 32 })
        ));
    }

    #[test]
    fn test_clamp_reducer() {
        let mut pixels = vec![0u8; 12800];
        pixels[0] = 16;
        pixels[1] = 200;
        pixels[2] = 15;
        let image = IndexedImage::new(160, 80, pixels, Vec::new()).unwrap();
        let (grid, _) = from_indexed_image(&image).unwrap();
        assert_eq!(&grid.pixels()[..3], &[15, 15, 15]);
    }

    #[test]
    fn test_nearest_color_reducer() {
        let mut palette = vec![Rgb::default(); 18];
        palette[3] = Rgb::new(200, 0, 0);
        palette[9] = Rgb::new(0, 0, 200);
        palette[16] = Rgb::new(190, 10, 0);
        palette[17] = Rgb::new(0, 0, 0);

        assert_eq!(NearestColorReducer.reduce(16, &palette), 3);
        // exact match on several black entries resolves to the lowest index
        assert_eq!(NearestColorReducer.reduce(17, &palette), 0);

        let mut pixels = vec![0u8; 12800];
        pixels[5] = 16;
        let image = IndexedImage::new(160, 80, pixels, palette).unwrap();
        let (grid, _) = from_indexed_image_with(&image, &NearestColorReducer).unwrap();
        assert_eq!(grid.pixels()[5], 3);
    }

    #[test]
    fn test_to_indexed_image() {
        let grid = PixelGrid::new(vec![4; 12800]).unwrap();
        let palette = Palette::grayscale();
        let image = to_indexed_image(&grid, &palette);
        assert_eq!((image.width(), image.height()), (160, 80));
        assert_eq!(image.palette().len(), 16);
        assert_eq!(image.get(159, 79), Some(4));
        let (back, back_palette) = from_indexed_image(&image).unwrap();
        assert_eq!(back, grid);
        assert_eq!(back_palette, palette);
    }
}
