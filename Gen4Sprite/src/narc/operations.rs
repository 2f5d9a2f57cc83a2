//! High-level NARC operations on files and directories

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use super::{
    NarcEntry, NarcEntryInfo, NarcPhase, NarcProgress, NarcReader, NarcWriter, ProgressCallback,
};
use crate::error::{Error, Result};

/// High-level NARC archive operations.
pub struct NarcOperations;

impl NarcOperations {
    /// File name used for an unpacked entry (`file_0042.bin`)
    #[must_use]
    pub fn entry_file_name(id: usize) -> String {
        format!("file_{id:04}.bin")
    }

    /// List the entries of an archive
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the archive cannot be opened.
    /// Returns [`Error::MalformedHeader`] if the archive is not a valid NARC.
    ///
    /// [`Error::Io`]: crate::Error::Io
    /// [`Error::MalformedHeader`]: crate::Error::MalformedHeader
    pub fn list<P: AsRef<Path>>(narc_path: P) -> Result<Vec<NarcEntryInfo>> {
        let reader = NarcReader::open(narc_path)?;
        Ok(reader.entry_infos())
    }

    /// Extract a single entry to a file, returning the number of bytes written
    ///
    /// The id is signed so that command-line input such as `-1` is rejected
    /// with [`Error::OutOfRange`] instead of wrapping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `id` is negative or not below the entry count.
    /// Returns [`Error::Io`] if the archive cannot be read or the output cannot be written.
    ///
    /// [`Error::OutOfRange`]: crate::Error::OutOfRange
    /// [`Error::Io`]: crate::Error::Io
    pub fn extract_entry<P: AsRef<Path>, Q: AsRef<Path>>(
        narc_path: P,
        id: i64,
        output: Q,
    ) -> Result<usize> {
        let mut reader = NarcReader::open(narc_path)?;
        let index = reader.narc().checked_index(id)?;
        let data = reader.extract(index)?;

        if let Some(parent) = output.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output.as_ref(), &data)?;
        Ok(data.len())
    }

    /// Unpack every entry of an archive as `file_NNNN.bin`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the archive cannot be opened or the output directory cannot be created.
    /// Returns [`Error::MalformedHeader`] if the archive is not a valid NARC.
    /// Returns [`Error::BatchPartialFailure`] if some entries could not be written.
    ///
    /// [`Error::Io`]: crate::Error::Io
    /// [`Error::MalformedHeader`]: crate::Error::MalformedHeader
    /// [`Error::BatchPartialFailure`]: crate::Error::BatchPartialFailure
    pub fn unpack<P: AsRef<Path>, Q: AsRef<Path>>(narc_path: P, output_dir: Q) -> Result<usize> {
        Self::unpack_with_progress(narc_path, output_dir, &|_| {})
    }

    /// Unpack every entry of an archive with progress callback
    ///
    /// Entries are written in parallel, each worker reading through its own file handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the archive cannot be opened or the output directory cannot be created.
    /// Returns [`Error::MalformedHeader`] if the archive is not a valid NARC.
    /// Returns [`Error::BatchPartialFailure`] if some entries could not be written.
    ///
    /// [`Error::Io`]: crate::Error::Io
    /// [`Error::MalformedHeader`]: crate::Error::MalformedHeader
    /// [`Error::BatchPartialFailure`]: crate::Error::BatchPartialFailure
    pub fn unpack_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
        narc_path: P,
        output_dir: Q,
        progress: ProgressCallback,
    ) -> Result<usize> {
        let narc_path = narc_path.as_ref();
        let output_dir = output_dir.as_ref();

        progress(&NarcProgress::new(NarcPhase::ReadingTable, 1, 1));
        let reader = NarcReader::open(narc_path)?;
        let entries = reader.entries().to_vec();
        drop(reader);

        std::fs::create_dir_all(output_dir)?;

        let total = entries.len();
        let processed = AtomicUsize::new(0);

        let errors: Vec<(usize, String)> = entries
            .par_iter()
            .enumerate()
            .filter_map(|(id, entry)| {
                let file_name = Self::entry_file_name(id);
                let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
                progress(&NarcProgress::with_file(
                    NarcPhase::ExtractingEntries,
                    current,
                    total,
                    file_name.clone(),
                ));

                let result = read_span(narc_path, entry)
                    .and_then(|data| std::fs::write(output_dir.join(&file_name), data));

                match result {
                    Ok(()) => None,
                    Err(e) => {
                        tracing::warn!("Failed to unpack entry {id}: {e}");
                        Some((id, e.to_string()))
                    }
                }
            })
            .collect();

        if let Some((id, first)) = errors.first() {
            return Err(Error::BatchPartialFailure {
                total,
                failed: errors.len(),
                first_error: format!("entry {id}: {first}"),
            });
        }

        progress(&NarcProgress::new(NarcPhase::Complete, total, total));
        tracing::info!("Unpacked {total} entries to {}", output_dir.display());
        Ok(total)
    }

    /// Build an archive from the `*.bin` files of a directory
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoInputFiles`] if the directory has no `.bin` files.
    /// Returns [`Error::WalkDirError`] if the directory cannot be scanned.
    /// Returns [`Error::Io`] if a file cannot be read or the archive cannot be written.
    ///
    /// [`Error::NoInputFiles`]: crate::Error::NoInputFiles
    /// [`Error::WalkDirError`]: crate::Error::WalkDirError
    /// [`Error::Io`]: crate::Error::Io
    pub fn pack<P: AsRef<Path>, Q: AsRef<Path>>(input_dir: P, output_narc: Q) -> Result<usize> {
        Self::pack_with_progress(input_dir, output_narc, &|_| {})
    }

    /// Build an archive from the `*.bin` files of a directory with progress callback
    ///
    /// Files are ordered by [`NarcOperations::collect_entry_files`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoInputFiles`] if the directory has no `.bin` files.
    /// Returns [`Error::WalkDirError`] if the directory cannot be scanned.
    /// Returns [`Error::Io`] if a file cannot be read or the archive cannot be written.
    ///
    /// [`Error::NoInputFiles`]: crate::Error::NoInputFiles
    /// [`Error::WalkDirError`]: crate::Error::WalkDirError
    /// [`Error::Io`]: crate::Error::Io
    pub fn pack_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
        input_dir: P,
        output_narc: Q,
        progress: ProgressCallback,
    ) -> Result<usize> {
        let input_dir = input_dir.as_ref();

        progress(&NarcProgress::new(NarcPhase::ScanningFiles, 0, 1));
        let files = Self::collect_entry_files(input_dir)?;
        if files.is_empty() {
            return Err(Error::NoInputFiles {
                path: input_dir.to_path_buf(),
            });
        }

        let total = files.len();
        let mut writer = NarcWriter::new();
        for (i, path) in files.iter().enumerate() {
            let name = path
                .file_name()
                .map_or_else(String::new, |n| n.to_string_lossy().to_string());
            progress(&NarcProgress::with_file(NarcPhase::ReadingFiles, i + 1, total, name));
            writer.add(std::fs::read(path)?);
        }

        writer.write_with_progress(output_narc, progress)?;
        tracing::info!("Packed {total} entries from {}", input_dir.display());
        Ok(total)
    }

    /// Collect the `*.bin` files of a directory (non-recursive) in entry order.
    ///
    /// Files are ordered by the number following the first `_` of the file
    /// stem (`file_0012.bin` sorts as 12); stems without a parsable number
    /// sort as 0, ties are broken by file name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WalkDirError`] if the directory cannot be scanned.
    ///
    /// [`Error::WalkDirError`]: crate::Error::WalkDirError
    pub fn collect_entry_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let is_bin = entry
                .path()
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().to_lowercase() == "bin");
            if is_bin {
                files.push(entry.into_path());
            }
        }

        files.sort_by_cached_key(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            (entry_number(path), name)
        });
        Ok(files)
    }
}

/// Read one entry through a private file handle
fn read_span(narc_path: &Path, entry: &NarcEntry) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(narc_path)?;
    file.seek(SeekFrom::Start(entry.offset))?;
    let mut data = vec![0u8; entry.size() as usize];
    file.read_exact(&mut data)?;
    Ok(data)
}

/// Number after the first `_` of the stem, 0 when absent
fn entry_number(path: &Path) -> u64 {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.split('_').nth(1))
        .and_then(|number| number.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_archive(dir: &Path, files: Vec<Vec<u8>>) -> PathBuf {
        let path = dir.join("test.narc");
        NarcWriter::with_files(files).write(&path).unwrap();
        path
    }

    #[test]
    fn test_entry_file_name() {
        assert_eq!(NarcOperations::entry_file_name(7), "file_0007.bin");
        assert_eq!(NarcOperations::entry_file_name(12345), "file_12345.bin");
    }

    #[test]
    fn test_entry_number() {
        assert_eq!(entry_number(Path::new("file_0012.bin")), 12);
        assert_eq!(entry_number(Path::new("file_3_extra.bin")), 3);
        assert_eq!(entry_number(Path::new("noseparator.bin")), 0);
        assert_eq!(entry_number(Path::new("file_abc.bin")), 0);
    }

    #[test]
    fn test_list() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(dir.path(), vec![vec![1; 10], vec![2; 3]]);
        let infos = NarcOperations::list(&path).unwrap();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].size, 10);
        assert_eq!(infos[1].size, 3);
    }

    #[test]
    fn test_extract_entry_rejects_negative_id() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(dir.path(), vec![vec![1; 4]]);
        let out = dir.path().join("out.bin");
        assert!(matches!(
            NarcOperations::extract_entry(&path, -1, &out),
            Err(Error::OutOfRange { id: -1, count: 1 })
        ));
        assert_eq!(NarcOperations::extract_entry(&path, 0, &out).unwrap(), 4);
        assert_eq!(std::fs::read(&out).unwrap(), vec![1; 4]);
    }

    #[test]
    fn test_operations_accept_mixed_path_types() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(dir.path(), vec![vec![2; 3]]);

        let out = dir.path().join("single.bin");
        let out_str = out.to_str().unwrap();
        assert_eq!(NarcOperations::extract_entry(&path, 0, out_str).unwrap(), 3);

        let unpacked = dir.path().join("unpacked");
        assert_eq!(NarcOperations::unpack(&path, unpacked.as_path()).unwrap(), 1);
        let repacked = format!("{}/repacked.narc", dir.path().display());
        assert_eq!(NarcOperations::pack(&unpacked, repacked.as_str()).unwrap(), 1);
    }

    #[test]
    fn test_unpack_then_pack_is_identical() {
        let dir = TempDir::new().unwrap();
        let blobs = vec![vec![1; 5], Vec::new(), vec![3; 12], vec![4; 7]];
        let original = write_archive(dir.path(), blobs);

        let unpacked = dir.path().join("unpacked");
        assert_eq!(NarcOperations::unpack(&original, &unpacked).unwrap(), 4);
        assert!(unpacked.join("file_0000.bin").exists());
        assert!(unpacked.join("file_0003.bin").exists());

        let repacked = dir.path().join("repacked.narc");
        assert_eq!(NarcOperations::pack(&unpacked, &repacked).unwrap(), 4);
        assert_eq!(
            std::fs::read(&original).unwrap(),
            std::fs::read(&repacked).unwrap()
        );
    }

    #[test]
    fn test_pack_orders_by_number() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("file_10.bin"), b"ten").unwrap();
        std::fs::write(dir.path().join("file_2.bin"), b"two").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"skip").unwrap();

        let files = NarcOperations::collect_entry_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["file_2.bin", "file_10.bin"]);
    }

    #[test]
    fn test_pack_empty_dir() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.narc");
        assert!(matches!(
            NarcOperations::pack(dir.path(), out.as_path()),
            Err(Error::NoInputFiles { .. })
        ));
    }
}
