//! Types shared by the batch exporters and importers

use serde::Serialize;

use crate::narc::NarcWriter;

/// Progress callback for batch conversions
pub type BatchProgressCallback<'a> = &'a (dyn Fn(&BatchProgress) + Sync + Send);

/// Progress information during a batch conversion
#[derive(Debug, Clone)]
pub struct BatchProgress {
    pub phase: BatchPhase,
    /// Current item number (1-indexed)
    pub current: usize,
    pub total: usize,
    /// Species directory or form group being processed
    pub current_item: Option<String>,
}

impl BatchProgress {
    #[must_use]
    pub fn new(phase: BatchPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_item: None,
        }
    }

    #[must_use]
    pub fn with_item(
        phase: BatchPhase,
        current: usize,
        total: usize,
        item: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            current,
            total,
            current_item: Some(item.into()),
        }
    }

    /// Progress as a fraction in `0.0..=1.0`
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

/// Phase of a batch conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPhase {
    /// Reading the source archive
    ReadingArchive,
    /// Rendering archive entries to PNG files
    Exporting,
    /// Converting PNG files back into archive entries
    Importing,
    Complete,
}

impl BatchPhase {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchPhase::ReadingArchive => "Reading archive",
            BatchPhase::Exporting => "Exporting",
            BatchPhase::Importing => "Importing",
            BatchPhase::Complete => "Complete",
        }
    }
}

/// Outcome of a batch conversion
///
/// Individual failures do not abort the batch; they are collected here as
/// `(item, message)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    /// Files (export) or archive slots (import) written
    pub written: usize,
    pub errors: Vec<(String, String)>,
}

impl BatchResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn record_error(&mut self, item: impl Into<String>, message: impl Into<String>) {
        let item = item.into();
        let message = message.into();
        tracing::warn!("{item}: {message}");
        self.errors.push((item, message));
    }

    pub(crate) fn merge(&mut self, other: BatchResult) {
        self.written += other.written;
        self.errors.extend(other.errors);
    }
}

/// Archive entries rebuilt from a PNG tree
#[derive(Debug, Clone, Default)]
pub struct BatchImport {
    /// Entry blobs in archive order
    pub entries: Vec<Vec<u8>>,
    pub result: BatchResult,
}

impl BatchImport {
    /// A writer holding the rebuilt entries
    #[must_use]
    pub fn into_writer(self) -> NarcWriter {
        NarcWriter::with_files(self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert!((BatchProgress::new(BatchPhase::Exporting, 1, 4).percentage() - 0.25).abs() < f32::EPSILON);
        assert!((BatchProgress::new(BatchPhase::Complete, 0, 0).percentage() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_result_merge() {
        let mut result = BatchResult {
            written: 2,
            errors: Vec::new(),
        };
        assert!(result.is_success());

        let mut other = BatchResult {
            written: 3,
            errors: Vec::new(),
        };
        other.record_error("pokemon_001", "bad palette");
        result.merge(other);

        assert_eq!(result.written, 5);
        assert_eq!(
            result.errors,
            vec![("pokemon_001".to_string(), "bad palette".to_string())]
        );
        assert!(!result.is_success());
    }

    #[test]
    fn test_import_into_writer() {
        let import = BatchImport {
            entries: vec![vec![1, 2], vec![3]],
            result: BatchResult::default(),
        };
        assert_eq!(import.into_writer().len(), 2);
    }
}
