//! NARC archive writer

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use super::reader::ProgressCallback;
use super::{
    ALIGNMENT, BTAF_HEADER_SIZE, BTAF_MAGIC, BTNF_MAGIC, BTNF_SIZE, BYTE_ORDER_MARK,
    GMIF_HEADER_SIZE, GMIF_MAGIC, HEADER_SIZE, NARC_MAGIC, NarcPhase, NarcProgress,
    SECTION_COUNT, VERSION, align,
};
use crate::error::{Error, Result};

/// Offsets computed before anything is written
struct Layout {
    /// (start, end) per entry, relative to the GMIF data
    spans: Vec<(u32, u32)>,
    count: u32,
    btaf_size: u32,
    btaf_padding: usize,
    btnf_padding: usize,
    data_size: u32,
    total_size: u32,
}

/// NARC archive builder.
///
/// Entries keep the order they were added in; the output is byte-for-byte
/// reproducible for the same input list.
#[derive(Debug, Default, Clone)]
pub struct NarcWriter {
    files: Vec<Vec<u8>>,
}

impl NarcWriter {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from an ordered list of blobs
    #[must_use]
    pub fn with_files(files: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            files: files.into_iter().collect(),
        }
    }

    /// Append an entry; its id is the current entry count
    pub fn add(&mut self, data: impl Into<Vec<u8>>) -> usize {
        self.files.push(data.into());
        self.files.len() - 1
    }

    /// Number of entries added so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if no entries were added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn layout(&self) -> Result<Layout> {
        let too_large = |size: u64| Error::ArchiveTooLarge { size };

        let btaf_len = BTAF_HEADER_SIZE as usize + 8 * self.files.len();
        let btaf_size = u32::try_from(btaf_len).map_err(|_| too_large(btaf_len as u64))?;
        let count = u32::try_from(self.files.len()).map_err(|_| too_large(btaf_len as u64))?;
        let btaf_padding = align(btaf_len) - btaf_len;
        let btnf_padding = align(BTNF_SIZE as usize) - BTNF_SIZE as usize;

        let mut spans = Vec::with_capacity(self.files.len());
        let mut cursor = 0usize;
        for (i, data) in self.files.iter().enumerate() {
            let start = cursor;
            let end = start + data.len();
            let to_u32 = |v: usize| u32::try_from(v).map_err(|_| too_large(v as u64));
            spans.push((to_u32(start)?, to_u32(end)?));
            cursor = if i + 1 == self.files.len() {
                end
            } else {
                align(end)
            };
        }

        let data_size = u32::try_from(cursor).map_err(|_| too_large(cursor as u64))?;
        let total = u64::from(HEADER_SIZE)
            + (btaf_len + btaf_padding) as u64
            + (BTNF_SIZE as usize + btnf_padding) as u64
            + u64::from(GMIF_HEADER_SIZE)
            + u64::from(data_size);
        let total_size = u32::try_from(total).map_err(|_| too_large(total))?;

        Ok(Layout {
            spans,
            count,
            btaf_size,
            btaf_padding,
            btnf_padding,
            data_size,
            total_size,
        })
    }

    /// Serialize the archive into memory
    ///
    /// # Errors
    /// Returns [`Error::ArchiveTooLarge`] if the archive does not fit the 32-bit size fields.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out, &|_| {})?;
        Ok(out)
    }

    /// Serialize the archive to any writer
    ///
    /// # Errors
    /// Returns [`Error::ArchiveTooLarge`] if the archive does not fit the 32-bit size fields,
    /// or [`Error::Io`] if writing fails.
    pub fn write_to<W: Write>(&self, out: &mut W, progress: ProgressCallback) -> Result<()> {
        let layout = self.layout()?;

        out.write_all(&NARC_MAGIC)?;
        out.write_u16::<LittleEndian>(BYTE_ORDER_MARK)?;
        out.write_u16::<LittleEndian>(VERSION)?;
        out.write_u32::<LittleEndian>(layout.total_size)?;
        out.write_u16::<LittleEndian>(HEADER_SIZE)?;
        out.write_u16::<LittleEndian>(SECTION_COUNT)?;

        out.write_all(&BTAF_MAGIC)?;
        out.write_u32::<LittleEndian>(layout.btaf_size)?;
        out.write_u32::<LittleEndian>(layout.count)?;
        for &(start, end) in &layout.spans {
            out.write_u32::<LittleEndian>(start)?;
            out.write_u32::<LittleEndian>(end)?;
        }
        out.write_all(&[0u8; ALIGNMENT][..layout.btaf_padding])?;

        out.write_all(&BTNF_MAGIC)?;
        out.write_u32::<LittleEndian>(BTNF_SIZE)?;
        out.write_all(&[0u8; 8])?;
        out.write_all(&[0u8; ALIGNMENT][..layout.btnf_padding])?;

        out.write_all(&GMIF_MAGIC)?;
        out.write_u32::<LittleEndian>(GMIF_HEADER_SIZE + layout.data_size)?;

        let total = self.files.len();
        for (i, data) in self.files.iter().enumerate() {
            progress(&NarcProgress::new(NarcPhase::WritingEntries, i + 1, total));
            out.write_all(data)?;
            if i + 1 < total {
                let padding = align(data.len()) - data.len();
                out.write_all(&[0u8; ALIGNMENT][..padding])?;
            }
        }

        progress(&NarcProgress::new(NarcPhase::Complete, total, total));
        Ok(())
    }

    /// Write the archive to a file
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the file cannot be written, or
    /// [`Error::ArchiveTooLarge`] if the archive does not fit the 32-bit size fields.
    pub fn write(&self, output_path: impl AsRef<Path>) -> Result<()> {
        self.write_with_progress(output_path, &|_| {})
    }

    /// Write the archive to a file with progress callback
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the file cannot be written, or
    /// [`Error::ArchiveTooLarge`] if the archive does not fit the 32-bit size fields.
    pub fn write_with_progress(
        &self,
        output_path: impl AsRef<Path>,
        progress: ProgressCallback,
    ) -> Result<()> {
        let output_path = output_path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(output_path)?;
        let mut output = BufWriter::new(file);
        self.write_to(&mut output, progress)?;
        output.flush()?;
        Ok(())
    }
}
