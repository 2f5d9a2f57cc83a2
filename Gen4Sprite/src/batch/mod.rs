//! Whole-archive conversion between sprite archives and PNG trees
//!
//! Exporters render every sprite of an archive with its palettes into a
//! directory tree of indexed PNGs. Importers walk such a tree and rebuild
//! the archive's entry list, which is then written with
//! [`NarcWriter`](crate::narc::NarcWriter).
//!
//! Failures on a single species, form group or PNG are logged and recorded
//! in the returned [`BatchResult`]; only archive-level I/O aborts a batch.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use gen4sprite::batch;
//! use gen4sprite::converter::ConvertOptions;
//!
//! let options = ConvertOptions::new();
//! let result = batch::export_pokegra("pl_pokegra.narc", "sprites/", &options)?;
//! println!("{} PNGs written", result.written);
//!
//! let import = batch::import_pokegra("sprites/", Some(Path::new("pl_pokegra.narc")), &options)?;
//! import.into_writer().write("new_pokegra.narc")?;
//! # Ok::<(), gen4sprite::Error>(())
//! ```

mod otherpoke;
mod pokegra;
mod types;

use std::path::Path;

pub use otherpoke::{
    export_otherpoke, export_otherpoke_with_progress, import_otherpoke,
    import_otherpoke_with_progress,
};
pub use pokegra::{
    export_pokegra, export_pokegra_with_progress, import_pokegra, import_pokegra_with_progress,
};
pub use types::{BatchImport, BatchPhase, BatchProgress, BatchProgressCallback, BatchResult};

use crate::converter::{ConvertOptions, image_to_sprite_bytes, load_indexed_image};
use crate::error::{Error, Result};
use crate::narc::NarcReader;

/// Read every entry of an archive into memory
fn read_archive(path: &Path, progress: BatchProgressCallback) -> Result<Vec<Vec<u8>>> {
    progress(&BatchProgress::with_item(
        BatchPhase::ReadingArchive,
        0,
        1,
        path.display().to_string(),
    ));
    let entries = NarcReader::open(path)?.extract_all()?;
    tracing::debug!("Read {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Fail with [`Error::InvalidPath`] unless `path` is an existing directory
fn require_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(Error::InvalidPath(format!(
            "{} is not a directory",
            path.display()
        )))
    }
}

/// Convert one PNG file into `(sprite_bytes, palette_bytes)`
fn convert_png(path: &Path, options: &ConvertOptions) -> Result<(Vec<u8>, Vec<u8>)> {
    let image = load_indexed_image(path)?;
    image_to_sprite_bytes(&image, options)
}
