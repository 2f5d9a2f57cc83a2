//! Types for NARC archive handling

use serde::Serialize;

/// One entry of the file allocation table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarcEntry {
    /// Start offset relative to the GMIF data
    pub start: u32,
    /// End offset (exclusive) relative to the GMIF data
    pub end: u32,
    /// Absolute offset of the entry in the archive stream
    pub offset: u64,
}

impl NarcEntry {
    /// Size of the entry in bytes
    #[must_use]
    pub fn size(&self) -> u32 {
        self.end - self.start
    }
}

/// Entry listing used for reporting (`narc list --json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarcEntryInfo {
    /// Zero-based entry id
    pub id: usize,
    /// Absolute offset in the archive
    pub offset: u64,
    /// Size in bytes
    pub size: u32,
}

/// Progress information during NARC operations
#[derive(Debug, Clone)]
pub struct NarcProgress {
    /// Current operation phase
    pub phase: NarcPhase,
    /// Current item number (1-indexed)
    pub current: usize,
    /// Total number of items
    pub total: usize,
    /// Current file being processed (if applicable)
    pub current_file: Option<String>,
}

impl NarcProgress {
    /// Create a new progress update
    #[must_use]
    pub fn new(phase: NarcPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: None,
        }
    }

    /// Create a progress update with a file/item name
    #[must_use]
    pub fn with_file(
        phase: NarcPhase,
        current: usize,
        total: usize,
        file: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: Some(file.into()),
        }
    }

    /// Get the progress percentage (0.0 - 1.0)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Phase of NARC operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarcPhase {
    /// Reading the header and allocation table
    ReadingTable,
    /// Extracting entries to disk
    ExtractingEntries,
    /// Scanning a directory for entry files
    ScanningFiles,
    /// Reading entry files from disk
    ReadingFiles,
    /// Writing entry data to the archive
    WritingEntries,
    /// Operation complete
    Complete,
}

impl NarcPhase {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            NarcPhase::ReadingTable => "Reading allocation table",
            NarcPhase::ExtractingEntries => "Extracting entries",
            NarcPhase::ScanningFiles => "Scanning files",
            NarcPhase::ReadingFiles => "Reading files",
            NarcPhase::WritingEntries => "Writing entries",
            NarcPhase::Complete => "Complete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_size() {
        let entry = NarcEntry { start: 12, end: 30, offset: 100 };
        assert_eq!(entry.size(), 18);
    }

    #[test]
    fn test_percentage_empty_total() {
        let progress = NarcProgress::new(NarcPhase::Complete, 0, 0);
        assert!((progress.percentage() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_percentage_halfway() {
        let progress = NarcProgress::with_file(NarcPhase::ExtractingEntries, 5, 10, "file_0004.bin");
        assert!((progress.percentage() - 0.5).abs() < f32::EPSILON);
        assert_eq!(progress.current_file.as_deref(), Some("file_0004.bin"));
    }

    #[test]
    fn test_entry_info_serializes() {
        let info = NarcEntryInfo { id: 3, offset: 64, size: 6448 };
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(json, r#"{"id":3,"offset":64,"size":6448}"#);
    }
}
