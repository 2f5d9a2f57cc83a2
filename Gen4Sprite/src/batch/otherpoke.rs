//! Alternate-form archive export/import

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use super::types::{BatchImport, BatchPhase, BatchProgress, BatchProgressCallback, BatchResult};
use super::{convert_png, read_archive, require_dir};
use crate::converter::{ConvertOptions, sprite_bytes_to_png_bytes};
use crate::error::{Error, Result};
use crate::formats::sprite::SPRITE_HEADER_SIZE;
use crate::formats::{CipherVariant, PALETTE_SIZE, Palette, SPRITE_SIZE, encode_palette};
use crate::layout::otherpoke::{FormGroup, SpriteSlots, entry_count, form_groups};
use crate::layout::PaletteKind;

/// `{form}_{back|front}_{normal|shiny}.png`
fn facing_png_name(form: &str, facing: &str, kind: PaletteKind) -> String {
    format!("{form}_{facing}_{}.png", kind.as_str())
}

/// `{form}.png`, used by single-sprite groups
fn single_png_name(form: &str) -> String {
    format!("{form}.png")
}

/// Export every form group of an alternate-form archive, one directory per group
///
/// # Errors
/// Returns an error if the archive cannot be read or the output directory cannot be created.
pub fn export_otherpoke<P: AsRef<Path>, Q: AsRef<Path>>(
    narc_path: P,
    output_dir: Q,
    options: &ConvertOptions,
) -> Result<BatchResult> {
    export_otherpoke_with_progress(narc_path, output_dir, options, &|_| {})
}

/// Export every form group of an alternate-form archive with progress callback
///
/// Sprites render as `{form}_{back|front}_{normal|shiny}.png`, or
/// `{form}.png` for single-sprite groups. A form whose normal palette is
/// missing falls back to the grey ramp; a missing shiny palette skips the
/// shiny PNGs.
///
/// # Errors
/// Returns an error if the archive cannot be read or the output directory cannot be created.
pub fn export_otherpoke_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
    narc_path: P,
    output_dir: Q,
    options: &ConvertOptions,
    progress: BatchProgressCallback,
) -> Result<BatchResult> {
    let narc_path = narc_path.as_ref();
    let output_dir = output_dir.as_ref();

    let entries = read_archive(narc_path, progress)?;
    std::fs::create_dir_all(output_dir)?;

    let groups = form_groups();
    let total = groups.len();
    tracing::info!("Exporting {total} form groups from {}", narc_path.display());
    let processed = AtomicUsize::new(0);

    let results: Vec<BatchResult> = groups
        .par_iter()
        .map(|group| {
            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&BatchProgress::with_item(
                BatchPhase::Exporting,
                current,
                total,
                group.name,
            ));

            let dir = output_dir.join(group.name);
            let mut result = BatchResult::default();
            if let Err(e) = std::fs::create_dir_all(&dir) {
                result.record_error(group.name, e.to_string());
                return result;
            }
            export_group(&entries, group, &dir, options.variant, &mut result);
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

fn export_group(
    entries: &[Vec<u8>],
    group: &FormGroup,
    dir: &Path,
    variant: CipherVariant,
    result: &mut BatchResult,
) {
    let grayscale = encode_palette(&Palette::grayscale());
    let palette_entry = |id: Option<usize>| {
        id.and_then(|id| entries.get(id))
            .filter(|data| data.len() == PALETTE_SIZE)
            .map(Vec::as_slice)
    };
    let sprite_entry = |id: usize| {
        entries
            .get(id)
            .filter(|data| data.len() == SPRITE_SIZE)
            .map(Vec::as_slice)
    };

    let mut render = |sprite: &[u8], palette: &[u8], file_name: String| {
        let written = sprite_bytes_to_png_bytes(sprite, palette, variant)
            .and_then(|png| std::fs::write(dir.join(&file_name), png).map_err(Error::from));
        match written {
            Ok(()) => result.written += 1,
            Err(e) => result.record_error(format!("{}/{file_name}", group.name), e.to_string()),
        }
    };

    for slot in group.sprite_slots() {
        let palettes = group.palette_for(slot.form);
        let normal = palette_entry(palettes.map(|p| p.normal)).unwrap_or(grayscale.as_slice());
        let shiny = palette_entry(palettes.and_then(|p| p.shiny));

        match slot.sprites {
            SpriteSlots::Pair { back, front } => {
                let (Some(back), Some(front)) = (sprite_entry(back), sprite_entry(front)) else {
                    tracing::debug!("{} {}: no sprite data, skipped", group.name, slot.form);
                    continue;
                };
                let renders = [(PaletteKind::Normal, Some(normal)), (PaletteKind::Shiny, shiny)];
                for (kind, palette) in renders {
                    let Some(palette) = palette else {
                        continue;
                    };
                    render(back, palette, facing_png_name(slot.form, "back", kind));
                    render(front, palette, facing_png_name(slot.form, "front", kind));
                }
            }
            SpriteSlots::Single(id) => {
                let Some(sprite) = sprite_entry(id) else {
                    tracing::debug!("{} {}: no sprite data, skipped", group.name, slot.form);
                    continue;
                };
                render(sprite, normal, single_png_name(slot.form));
            }
        }
    }
}

/// Rebuild an alternate-form archive from a directory-per-group tree
///
/// # Errors
/// Returns an error if the original archive cannot be read.
pub fn import_otherpoke<P: AsRef<Path>>(
    input_dir: P,
    original: Option<&Path>,
    options: &ConvertOptions,
) -> Result<BatchImport> {
    import_otherpoke_with_progress(input_dir, original, options, &|_| {})
}

/// Rebuild an alternate-form archive with progress callback
///
/// The entry list starts as a copy of the `original` archive (its entries
/// beyond the table are kept), or as 48-byte zero placeholders. For every
/// form with PNGs, `{form}_back_normal.png` and `{form}_front_normal.png`
/// replace the sprite slots and the back PNGs supply the normal and shiny
/// palettes; single-sprite groups read `{form}.png`. Forms sharing a
/// palette slot overwrite it in table order, so the last one wins.
///
/// # Errors
/// Returns an error if the original archive cannot be read.
pub fn import_otherpoke_with_progress<P: AsRef<Path>>(
    input_dir: P,
    original: Option<&Path>,
    options: &ConvertOptions,
    progress: BatchProgressCallback,
) -> Result<BatchImport> {
    let input_dir = input_dir.as_ref();
    require_dir(input_dir)?;

    let mut entries = match original {
        Some(path) => read_archive(path, progress)?,
        None => Vec::new(),
    };
    let table_entries = entry_count();
    if entries.len() < table_entries {
        entries.resize(table_entries, vec![0; SPRITE_HEADER_SIZE]);
    }

    let groups = form_groups();
    let total = groups.len();
    tracing::info!("Importing {total} form groups from {}", input_dir.display());
    let processed = AtomicUsize::new(0);

    let updates: Vec<(Vec<(usize, Vec<u8>)>, BatchResult)> = groups
        .par_iter()
        .map(|group| {
            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&BatchProgress::with_item(
                BatchPhase::Importing,
                current,
                total,
                group.name,
            ));

            let dir = input_dir.join(group.name);
            if dir.is_dir() {
                import_group(group, &dir, options)
            } else {
                tracing::debug!("{}: no directory, keeping original entries", group.name);
                (Vec::new(), BatchResult::default())
            }
        })
        .collect();

    let mut import = BatchImport::default();
    for (slots, result) in updates {
        for (id, data) in slots {
            if let Some(entry) = entries.get_mut(id) {
                *entry = data;
            }
        }
        import.result.merge(result);
    }
    import.entries = entries;

    progress(&BatchProgress::new(BatchPhase::Complete, total, total));
    tracing::info!(
        "Rebuilt {} entries ({} slots from PNGs, {} failures)",
        import.entries.len(),
        import.result.written,
        import.result.errors.len()
    );
    Ok(import)
}

/// Convert the PNGs of one group into `(entry id, data)` replacements
fn import_group(
    group: &FormGroup,
    dir: &Path,
    options: &ConvertOptions,
) -> (Vec<(usize, Vec<u8>)>, BatchResult) {
    let mut slots = Vec::new();
    let mut result = BatchResult::default();

    let convert = |file_name: String, result: &mut BatchResult| {
        let path = dir.join(&file_name);
        if !path.is_file() {
            return None;
        }
        match convert_png(&path, options) {
            Ok(converted) => Some(converted),
            Err(e) => {
                result.record_error(format!("{}/{file_name}", group.name), e.to_string());
                None
            }
        }
    };

    for slot in group.sprite_slots() {
        let palettes = group.palette_for(slot.form);

        match slot.sprites {
            SpriteSlots::Pair { back, front } => {
                let back_name = facing_png_name(slot.form, "back", PaletteKind::Normal);
                if let Some((sprite, palette)) = convert(back_name, &mut result) {
                    slots.push((back, sprite));
                    if let Some(p) = palettes {
                        slots.push((p.normal, palette));
                    }
                }

                let front_name = facing_png_name(slot.form, "front", PaletteKind::Normal);
                if let Some((sprite, _)) = convert(front_name, &mut result) {
                    slots.push((front, sprite));
                }

                if let Some(shiny) = palettes.and_then(|p| p.shiny) {
                    let shiny_name = facing_png_name(slot.form, "back", PaletteKind::Shiny);
                    if let Some((_, palette)) = convert(shiny_name, &mut result) {
                        slots.push((shiny, palette));
                    }
                }
            }
            SpriteSlots::Single(id) => {
                if let Some((sprite, palette)) = convert(single_png_name(slot.form), &mut result) {
                    slots.push((id, sprite));
                    if let Some(p) = palettes {
                        slots.push((p.normal, palette));
                    }
                }
            }
        }
    }

    result.written = slots.len();
    tracing::debug!("{}: {} slots from PNGs", group.name, slots.len());
    (slots, result)
}
