//! Error types for `Gen4Sprite`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `Gen4Sprite` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== NARC Archive Errors ====================
    /// A NARC section signature did not match, or a header read came up short.
    #[error("malformed {section} header: {reason}")]
    MalformedHeader {
        /// The section being parsed (`NARC`, `BTAF`, `BTNF`, `GMIF`, ...).
        section: &'static str,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// An entry id outside `[0, count)` was requested.
    #[error("entry id {id} out of range (archive has {count} entries)")]
    OutOfRange {
        /// The requested id (signed so that negative CLI input is reported as given).
        id: i64,
        /// The number of entries in the archive.
        count: usize,
    },

    /// The archive being built does not fit the 32-bit size fields.
    #[error("archive too large: {size} bytes")]
    ArchiveTooLarge {
        /// The computed total size in bytes.
        size: u64,
    },

    // ==================== Sprite/Palette Codec Errors ====================
    /// A sprite, palette or pixel buffer had the wrong length.
    #[error("{what} size mismatch: expected {expected}, got {actual}")]
    SizeMismatch {
        /// The buffer being checked.
        what: &'static str,
        /// The required length.
        expected: usize,
        /// The length that was supplied.
        actual: usize,
    },

    /// A pixel index did not fit in 4 bits.
    #[error("pixel {index} has value {value} (must be 0-15)")]
    PixelOutOfRange {
        /// Position of the pixel in row-major order.
        index: usize,
        /// The offending value.
        value: u8,
    },

    // ==================== Image Bridge Errors ====================
    /// The image is not 64x64, 80x80 or 160x80.
    #[error("unsupported image dimensions {width}x{height} (expected 160x80, 80x80, or 64x64)")]
    UnsupportedDimensions {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// A true-colour image has more distinct colours than an indexed image can hold.
    #[error("image uses {count} distinct colors (at most 256 can be indexed)")]
    TooManyColors {
        /// Number of distinct colours found.
        count: usize,
    },

    /// Failed to decode a PNG file.
    #[error("failed to decode PNG: {message}")]
    PngDecodeFailed {
        /// The decoder's error message.
        message: String,
    },

    /// Failed to encode a PNG file.
    #[error("failed to encode PNG: {message}")]
    PngEncodeFailed {
        /// The encoder's error message.
        message: String,
    },

    /// Failed to open or decode a non-indexed image.
    #[error("failed to open image: {message}")]
    ImageOpenFailed {
        /// The error message.
        message: String,
    },

    // ==================== Batch Errors ====================
    /// No input files were found for a pack/import operation.
    #[error("no input files found in {path}")]
    NoInputFiles {
        /// The directory that was scanned.
        path: PathBuf,
    },

    /// A form group name is not in the alternate-form table.
    #[error("unknown form group: {0}")]
    UnknownFormGroup(String),

    /// A batch conversion completed but some items failed.
    #[error("conversion failed for {failed} of {total} items: {first_error}")]
    BatchPartialFailure {
        /// Number of items attempted.
        total: usize,
        /// Number of failed items.
        failed: usize,
        /// The first error message encountered.
        first_error: String,
    },

    // ==================== File System Errors ====================
    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

impl From<png::DecodingError> for Error {
    fn from(err: png::DecodingError) -> Self {
        Error::PngDecodeFailed {
            message: err.to_string(),
        }
    }
}

impl From<png::EncodingError> for Error {
    fn from(err: png::EncodingError) -> Self {
        Error::PngEncodeFailed {
            message: err.to_string(),
        }
    }
}

/// A specialized Result type for `Gen4Sprite` operations.
pub type Result<T> = std::result::Result<T, Error>;
