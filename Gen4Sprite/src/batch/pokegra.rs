//! Main sprite archive export/import

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use super::types::{BatchImport, BatchPhase, BatchProgress, BatchProgressCallback, BatchResult};
use super::{convert_png, read_archive, require_dir};
use crate::converter::{ConvertOptions, sprite_bytes_to_png_bytes};
use crate::error::Result;
use crate::formats::palette::PALETTE_HEADER_SIZE;
use crate::formats::sprite::SPRITE_HEADER_SIZE;
use crate::formats::{CipherVariant, PALETTE_SIZE, SPRITE_SIZE};
use crate::layout::PaletteKind;
use crate::layout::pokegra::{
    ENTRIES_PER_SPECIES, PokegraSlot, entry_index, parse_species_dir, species_count,
    species_dir_name,
};
use crate::narc::NarcReader;

/// Export every species of a main sprite archive to `pokemon_NNN/` directories
///
/// # Errors
/// Returns an error if the archive cannot be read or the output directory cannot be created.
pub fn export_pokegra<P: AsRef<Path>, Q: AsRef<Path>>(
    narc_path: P,
    output_dir: Q,
    options: &ConvertOptions,
) -> Result<BatchResult> {
    export_pokegra_with_progress(narc_path, output_dir, options, &|_| {})
}

/// Export every species of a main sprite archive with progress callback
///
/// Each sprite entry of exactly 6448 bytes is rendered once per palette
/// entry of exactly 72 bytes, as `{slot}_{normal|shiny}.png`. Species are
/// converted in parallel.
///
/// # Errors
/// Returns an error if the archive cannot be read or the output directory cannot be created.
pub fn export_pokegra_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
    narc_path: P,
    output_dir: Q,
    options: &ConvertOptions,
    progress: BatchProgressCallback,
) -> Result<BatchResult> {
    let narc_path = narc_path.as_ref();
    let output_dir = output_dir.as_ref();

    let entries = read_archive(narc_path, progress)?;
    std::fs::create_dir_all(output_dir)?;

    let total = species_count(entries.len());
    tracing::info!("Exporting {total} species from {}", narc_path.display());
    let processed = AtomicUsize::new(0);

    let results: Vec<BatchResult> = (0..total)
        .into_par_iter()
        .map(|species| {
            let dir_name = species_dir_name(species);
            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&BatchProgress::with_item(
                BatchPhase::Exporting,
                current,
                total,
                dir_name.clone(),
            ));

            let mut result = BatchResult::default();
            let species_dir = output_dir.join(&dir_name);
            match export_species(&entries, species, &species_dir, options.variant) {
                Ok(written) => result.written = written,
                Err(e) => result.record_error(dir_name, e.to_string()),
            }
            result
        })
        .collect();

    let mut summary = BatchResult::default();
    for result in results {
        summary.merge(result);
    }

    progress(&BatchProgress::new(BatchPhase::Complete, total, total));
    tracing::info!(
        "Exported {} PNGs to {} ({} failures)",
        summary.written,
        output_dir.display(),
        summary.errors.len()
    );
    Ok(summary)
}

/// Render the sprites of one species; returns the number of PNGs written
fn export_species(
    entries: &[Vec<u8>],
    species: usize,
    dir: &Path,
    variant: CipherVariant,
) -> Result<usize> {
    std::fs::create_dir_all(dir)?;

    let palettes: Vec<(PaletteKind, &[u8])> = PaletteKind::ALL
        .iter()
        .filter_map(|&kind| {
            let data = entries.get(entry_index(species, PokegraSlot::palette(kind)))?;
            (data.len() == PALETTE_SIZE).then_some((kind, data.as_slice()))
        })
        .collect();

    let mut written = 0;
    for slot in PokegraSlot::SPRITES {
        let Some(sprite) = entries.get(entry_index(species, slot)) else {
            continue;
        };
        if sprite.len() != SPRITE_SIZE {
            continue;
        }
        for &(kind, palette) in &palettes {
            let png = sprite_bytes_to_png_bytes(sprite, palette, variant)?;
            std::fs::write(dir.join(slot.png_name(kind)), png)?;
            written += 1;
        }
    }

    tracing::debug!("{}: {written} PNGs", dir.display());
    Ok(written)
}

/// Which slots of a species held real data in the original archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SpeciesShape {
    sprites: [bool; 4],
    normal_palette: bool,
    shiny_palette: bool,
}

impl SpeciesShape {
    fn from_sizes(sizes: &[usize], species: usize) -> Self {
        let has = |slot: PokegraSlot| {
            let size = if slot.is_palette() { PALETTE_SIZE } else { SPRITE_SIZE };
            sizes.get(entry_index(species, slot)) == Some(&size)
        };
        Self {
            sprites: PokegraSlot::SPRITES.map(&has),
            normal_palette: has(PokegraSlot::NormalPalette),
            shiny_palette: has(PokegraSlot::ShinyPalette),
        }
    }
}

/// Rebuild a main sprite archive from a `pokemon_NNN/` tree
///
/// # Errors
/// Returns an error if the input directory or the original archive cannot be read.
pub fn import_pokegra<P: AsRef<Path>>(
    input_dir: P,
    original: Option<&Path>,
    options: &ConvertOptions,
) -> Result<BatchImport> {
    import_pokegra_with_progress(input_dir, original, options, &|_| {})
}

/// Rebuild a main sprite archive from a `pokemon_NNN/` tree with progress callback
///
/// Species directories are taken in species-number order and each yields
/// six entries. With an `original` archive, slots that were empty there
/// stay empty placeholders:
///
/// - a sprite slot gets the converted `{slot}_normal.png`; without one it
///   is 6448 zero bytes if the original had a sprite there, 48 otherwise;
/// - the normal palette comes from the first converted sprite (72 zero
///   bytes if none);
/// - the shiny palette comes from the first `{slot}_shiny.png`, falling back
///   to the normal palette;
/// - palette slots the original lacked are 40 zero bytes.
///
/// # Errors
/// Returns an error if the input directory or the original archive cannot be read.
pub fn import_pokegra_with_progress<P: AsRef<Path>>(
    input_dir: P,
    original: Option<&Path>,
    options: &ConvertOptions,
    progress: BatchProgressCallback,
) -> Result<BatchImport> {
    let input_dir = input_dir.as_ref();
    require_dir(input_dir)?;

    let original_sizes = match original {
        Some(path) => {
            let reader = NarcReader::open(path)?;
            tracing::info!(
                "Using slot structure of {} ({} species)",
                path.display(),
                species_count(reader.len())
            );
            Some(
                reader
                    .entries()
                    .iter()
                    .map(|entry| entry.size() as usize)
                    .collect::<Vec<_>>(),
            )
        }
        None => None,
    };

    let species_dirs = collect_species_dirs(input_dir)?;
    let total = species_dirs.len();
    tracing::info!("Importing {total} species from {}", input_dir.display());
    let processed = AtomicUsize::new(0);

    let imported: Vec<(Vec<Vec<u8>>, BatchResult)> = species_dirs
        .par_iter()
        .map(|(species, dir)| {
            let name = species_dir_name(*species);
            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&BatchProgress::with_item(
                BatchPhase::Importing,
                current,
                total,
                name,
            ));

            let shape = original_sizes
                .as_deref()
                .filter(|sizes| *species < species_count(sizes.len()))
                .map(|sizes| SpeciesShape::from_sizes(sizes, *species));
            import_species(dir, shape, options)
        })
        .collect();

    let mut import = BatchImport::default();
    import.entries.reserve(total * ENTRIES_PER_SPECIES);
    for (entries, result) in imported {
        import.entries.extend(entries);
        import.result.merge(result);
    }

    progress(&BatchProgress::new(BatchPhase::Complete, total, total));
    tracing::info!(
        "Rebuilt {} entries ({} slots from PNGs, {} failures)",
        import.entries.len(),
        import.result.written,
        import.result.errors.len()
    );
    Ok(import)
}

/// `pokemon_NNN` subdirectories sorted by species number
fn collect_species_dirs(input_dir: &Path) -> Result<Vec<(usize, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(input_dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let species = parse_species_dir(&entry.file_name().to_string_lossy());
        if let Some(species) = species {
            dirs.push((species, entry.into_path()));
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Convert the PNGs of one species directory into its six entries
fn import_species(
    dir: &Path,
    shape: Option<SpeciesShape>,
    options: &ConvertOptions,
) -> (Vec<Vec<u8>>, BatchResult) {
    let mut result = BatchResult::default();
    let mut entries = Vec::with_capacity(ENTRIES_PER_SPECIES);
    let mut normal_palette: Option<Vec<u8>> = None;
    let mut shiny_palette: Option<Vec<u8>> = None;

    let convert = |path: PathBuf, result: &mut BatchResult| {
        if !path.is_file() {
            return None;
        }
        match convert_png(&path, options) {
            Ok(converted) => Some(converted),
            Err(e) => {
                result.record_error(path.display().to_string(), e.to_string());
                None
            }
        }
    };

    for (i, slot) in PokegraSlot::SPRITES.iter().enumerate() {
        let original_had_sprite = shape.is_some_and(|s| s.sprites[i]);
        let expected = shape.is_none_or(|s| s.sprites[i]);

        let converted = if expected {
            convert(dir.join(slot.png_name(PaletteKind::Normal)), &mut result)
        } else {
            None
        };
        match converted {
            Some((sprite, palette)) => {
                normal_palette.get_or_insert(palette);
                entries.push(sprite);
                result.written += 1;
            }
            None if original_had_sprite => entries.push(vec![0; SPRITE_SIZE]),
            None => entries.push(vec![0; SPRITE_HEADER_SIZE]),
        }

        if expected && shiny_palette.is_none() {
            if let Some((_, palette)) =
                convert(dir.join(slot.png_name(PaletteKind::Shiny)), &mut result)
            {
                shiny_palette = Some(palette);
            }
        }
    }

    if shape.is_none_or(|s| s.normal_palette) {
        match &normal_palette {
            Some(palette) => {
                entries.push(palette.clone());
                result.written += 1;
            }
            None => entries.push(vec![0; PALETTE_SIZE]),
        }
    } else {
        entries.push(vec![0; PALETTE_HEADER_SIZE]);
    }

    if shape.is_none_or(|s| s.shiny_palette) {
        match shiny_palette.or(normal_palette) {
            Some(palette) => {
                entries.push(palette);
                result.written += 1;
            }
            None => entries.push(vec![0; PALETTE_SIZE]),
        }
    } else {
        entries.push(vec![0; PALETTE_HEADER_SIZE]);
    }

    (entries, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{IndexedImage, write_indexed_png};
    use crate::formats::{
        Palette, PixelGrid, Rgb, decode_palette, decode_sprite, encode_palette, encode_sprite,
    };
    use crate::narc::NarcWriter;
    use tempfile::TempDir;

    fn sprite(value: u8) -> Vec<u8> {
        let mut pixels = vec![0u8; 12800];
        pixels[1000] = value;
        encode_sprite(&PixelGrid::new(pixels).unwrap(), CipherVariant::Forward)
    }

    fn palette(seed: u8) -> Vec<u8> {
        encode_palette(&Palette::from_colors(&[
            Rgb::new(0, 0, 0),
            Rgb::new(seed * 8, 0, 0),
        ]))
    }

    /// Species 0 has only male sprites, species 1 has all four and no shiny palette
    fn sample_archive(dir: &Path) -> PathBuf {
        let entries = vec![
            vec![0; 48],
            sprite(1),
            vec![0; 48],
            sprite(2),
            palette(1),
            palette(2),
            sprite(3),
            sprite(4),
            sprite(5),
            sprite(6),
            palette(3),
            vec![0; 40],
        ];
        let path = dir.join("pokegra.narc");
        NarcWriter::with_files(entries).write(&path).unwrap();
        path
    }

    #[test]
    fn test_species_shape_checks_slot_sizes() {
        // species 1: a palette-sized blob in a sprite slot and a sprite-sized one in a palette slot
        let sizes = [
            SPRITE_SIZE, SPRITE_SIZE, SPRITE_SIZE, SPRITE_SIZE, PALETTE_SIZE, PALETTE_SIZE,
            PALETTE_SIZE, 48, SPRITE_SIZE, SPRITE_SIZE, SPRITE_SIZE, 40,
        ];
        assert_eq!(
            SpeciesShape::from_sizes(&sizes, 0),
            SpeciesShape {
                sprites: [true; 4],
                normal_palette: true,
                shiny_palette: true,
            }
        );
        assert_eq!(
            SpeciesShape::from_sizes(&sizes, 1),
            SpeciesShape {
                sprites: [false, false, true, true],
                normal_palette: false,
                shiny_palette: false,
            }
        );
        assert_eq!(
            SpeciesShape::from_sizes(&sizes, 2),
            SpeciesShape {
                sprites: [false; 4],
                normal_palette: false,
                shiny_palette: false,
            }
        );
    }

    #[test]
    fn test_export_layout() {
        let dir = TempDir::new().unwrap();
        let narc = sample_archive(dir.path());
        let out = dir.path().join("out");

        let result = export_pokegra(&narc, &out, &ConvertOptions::new()).unwrap();
        assert!(result.is_success());
        // species 0: 2 sprites x 2 palettes, species 1: 4 sprites x 1 palette
        assert_eq!(result.written, 8);

        let species0 = out.join("pokemon_000");
        assert!(species0.join("male_back_normal.png").is_file());
        assert!(species0.join("male_front_shiny.png").is_file());
        assert!(!species0.join("female_back_normal.png").exists());

        let species1 = out.join("pokemon_001");
        assert!(species1.join("female_front_normal.png").is_file());
        assert!(!species1.join("female_front_shiny.png").exists());
    }

    #[test]
    fn test_export_import_restores_archive() {
        let dir = TempDir::new().unwrap();
        let narc = sample_archive(dir.path());
        let out = dir.path().join("out");
        let options = ConvertOptions::new();

        export_pokegra(&narc, &out, &options).unwrap();
        let import = import_pokegra(&out, Some(narc.as_path()), &options).unwrap();
        assert!(import.result.is_success());

        let mut reader = NarcReader::open(&narc).unwrap();
        let original = reader.extract_all().unwrap();
        assert_eq!(import.entries, original);
    }

    #[test]
    fn test_import_without_original() {
        let dir = TempDir::new().unwrap();
        let species = dir.path().join("pokemon_004");
        std::fs::create_dir_all(&species).unwrap();

        let mut pixels = vec![0u8; 80 * 80];
        pixels[10 * 80 + 10] = 1;
        let image = IndexedImage::new(
            80,
            80,
            pixels,
            vec![Rgb::new(0, 0, 0), Rgb::new(248, 0, 0)],
        )
        .unwrap();
        write_indexed_png(&image, species.join("male_front_normal.png")).unwrap();
        // unrelated directories and files are ignored
        std::fs::create_dir_all(dir.path().join("notes")).unwrap();
        std::fs::write(dir.path().join("readme.txt"), "x").unwrap();

        let import = import_pokegra(dir.path(), None, &ConvertOptions::new()).unwrap();
        assert_eq!(import.entries.len(), 6);
        assert_eq!(import.result.written, 3);

        for slot in [0, 1, 2] {
            assert_eq!(import.entries[slot], vec![0; 48]);
        }
        let grid = decode_sprite(&import.entries[3], CipherVariant::Forward).unwrap();
        assert_eq!(grid.get(10, 10), Some(1));
        assert_eq!(grid.get(90, 10), Some(1));
        assert_eq!(grid.get(0, 0), Some(0));

        // no shiny PNG: the shiny slot repeats the normal palette
        assert_eq!(import.entries[4], import.entries[5]);
        assert_eq!(
            decode_palette(&import.entries[4]).unwrap().get(1),
            Some(Rgb::new(248, 0, 0))
        );
    }

    #[test]
    fn test_import_missing_sprite_keeps_original_size() {
        let dir = TempDir::new().unwrap();
        let narc = sample_archive(dir.path());
        let tree = dir.path().join("tree");
        std::fs::create_dir_all(tree.join("pokemon_001")).unwrap();

        let import = import_pokegra(&tree, Some(narc.as_path()), &ConvertOptions::new()).unwrap();
        let sizes: Vec<usize> = import.entries.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![6448, 6448, 6448, 6448, 72, 40]);
        assert!(import.entries[0].iter().all(|&b| b == 0));
        assert_eq!(import.result.written, 0);
    }

    #[test]
    fn test_import_records_bad_png() {
        let dir = TempDir::new().unwrap();
        let species = dir.path().join("pokemon_000");
        std::fs::create_dir_all(&species).unwrap();
        std::fs::write(species.join("male_back_normal.png"), b"not a png").unwrap();

        let import = import_pokegra(dir.path(), None, &ConvertOptions::new()).unwrap();
        assert_eq!(import.entries.len(), 6);
        assert_eq!(import.entries[1], vec![0; 48]);
        assert_eq!(import.result.errors.len(), 1);
        assert!(import.result.errors[0].0.ends_with("male_back_normal.png"));
    }
}
