//! CLI commands for whole-archive sprite export/import

use std::path::Path;
use std::time::Instant;

use crate::batch::{
    BatchImport, BatchProgressCallback, BatchResult, export_otherpoke_with_progress,
    export_pokegra_with_progress, import_otherpoke_with_progress, import_pokegra_with_progress,
};
use crate::cli::progress::{
    DISK, LOOKING_GLASS, PICTURE, print_done, print_step, simple_bar, update_batch_bar,
};
use crate::converter::ConvertOptions;
use crate::formats::CipherVariant;

/// Which sprite archive a batch command works on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteArchive {
    Pokegra,
    Otherpoke,
}

impl SpriteArchive {
    fn export(
        self,
        source: &Path,
        destination: &Path,
        options: &ConvertOptions,
        progress: BatchProgressCallback,
    ) -> crate::Result<BatchResult> {
        match self {
            SpriteArchive::Pokegra => {
                export_pokegra_with_progress(source, destination, options, progress)
            }
            SpriteArchive::Otherpoke => {
                export_otherpoke_with_progress(source, destination, options, progress)
            }
        }
    }

    fn import(
        self,
        source: &Path,
        original: Option<&Path>,
        options: &ConvertOptions,
        progress: BatchProgressCallback,
    ) -> crate::Result<BatchImport> {
        match self {
            SpriteArchive::Pokegra => {
                import_pokegra_with_progress(source, original, options, progress)
            }
            SpriteArchive::Otherpoke => {
                import_otherpoke_with_progress(source, original, options, progress)
            }
        }
    }
}

/// Export an archive to a PNG tree
pub fn export(
    archive: SpriteArchive,
    source: &Path,
    destination: &Path,
    variant: CipherVariant,
    quiet: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let options = ConvertOptions::new().with_variant(variant);

    print_step(1, 2, LOOKING_GLASS, &format!("Reading {}...", source.display()));
    print_step(2, 2, PICTURE, &format!("Exporting sprites ({variant})..."));

    let pb = simple_bar(0, "Exporting", quiet);
    let result = archive.export(source, destination, &options, &|progress| {
        update_batch_bar(&pb, progress);
    })?;
    pb.finish_and_clear();

    println!("Wrote {} PNGs to {}", result.written, destination.display());
    print_failures(&result);
    print_done(started.elapsed());
    Ok(())
}

/// Rebuild an archive from a PNG tree
pub fn import(
    archive: SpriteArchive,
    source: &Path,
    destination: &Path,
    original: Option<&Path>,
    options: &ConvertOptions,
    quiet: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();

    print_step(1, 2, PICTURE, &format!("Converting PNGs in {}...", source.display()));
    let pb = simple_bar(0, "Importing", quiet);
    let import = archive.import(source, original, options, &|progress| {
        update_batch_bar(&pb, progress);
    })?;
    pb.finish_and_clear();
    print_failures(&import.result);

    print_step(2, 2, DISK, &format!("Writing {}...", destination.display()));
    let entries = import.entries.len();
    import.into_writer().write(destination)?;

    println!("Wrote {entries} entries");
    print_done(started.elapsed());
    Ok(())
}

fn print_failures(result: &BatchResult) {
    if result.is_success() {
        return;
    }
    println!();
    println!("Failures ({}):", result.errors.len());
    for (item, message) in &result.errors {
        println!("  {item}: {message}");
    }
}
