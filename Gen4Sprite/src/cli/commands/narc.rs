//! CLI commands for NARC archive operations

use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{LOOKING_GLASS, PACKAGE, print_done, print_step, simple_bar, update_narc_bar};
use crate::narc::NarcOperations;

/// Print the entries of an archive
pub fn list(source: &Path, json: bool) -> anyhow::Result<()> {
    let entries = NarcOperations::list(source)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{} ({} entries)", source.display(), entries.len());
    for entry in &entries {
        println!(
            "  {:>5}  offset 0x{:08X}  {:>8} bytes",
            entry.id, entry.offset, entry.size
        );
    }
    Ok(())
}

/// Extract one entry by (signed) id
pub fn extract(source: &Path, id: i64, destination: &Path) -> anyhow::Result<()> {
    let size = NarcOperations::extract_entry(source, id, destination)?;
    println!("Extracted entry {id} ({size} bytes) to {}", destination.display());
    Ok(())
}

/// Unpack every entry as `file_NNNN.bin`
pub fn unpack(source: &Path, destination: &Path, quiet: bool) -> anyhow::Result<()> {
    let started = Instant::now();
    print_step(1, 2, LOOKING_GLASS, &format!("Reading {}...", source.display()));
    print_step(2, 2, PACKAGE, &format!("Unpacking to {}...", destination.display()));

    let pb = simple_bar(0, "Unpacking", quiet);
    let count = NarcOperations::unpack_with_progress(source, destination, &|progress| {
        update_narc_bar(&pb, progress);
    })?;
    pb.finish_and_clear();

    println!("Unpacked {count} entries");
    print_done(started.elapsed());
    Ok(())
}

/// Pack the `*.bin` files of a directory
pub fn pack(source: &Path, destination: &Path, quiet: bool) -> anyhow::Result<()> {
    let started = Instant::now();
    print_step(1, 2, LOOKING_GLASS, &format!("Scanning {}...", source.display()));
    print_step(2, 2, PACKAGE, &format!("Packing {}...", destination.display()));

    let pb = simple_bar(0, "Packing", quiet);
    let count = NarcOperations::pack_with_progress(source, destination, &|progress| {
        update_narc_bar(&pb, progress);
    })?;
    pb.finish_and_clear();

    println!("Packed {count} entries");
    print_done(started.elapsed());
    Ok(())
}
