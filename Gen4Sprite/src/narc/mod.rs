//! NARC archive reader/writer
//!
//! NARC is the Nintendo DS container used for the sprite and palette
//! archives (`pokegra.narc`, `otherpoke.narc`). Entries are opaque blobs
//! addressed by a zero-based id; there are no file names.
//!
//! ```text
//! NARC header   16 bytes   magic, BOM, version, file size, header size, section count
//! BTAF section  12 + 8n    file allocation table: (start, end) per entry
//! BTNF section  16         name table stub
//! GMIF section  8 + data   entry bytes, 4-byte aligned between entries
//! ```

mod operations;
mod reader;
mod types;
mod writer;

pub use operations::NarcOperations;
pub use reader::{Narc, NarcReader, ProgressCallback};
pub use types::*;
pub use writer::NarcWriter;

/// NARC magic bytes
pub const NARC_MAGIC: [u8; 4] = *b"NARC";

/// File allocation table section magic
pub const BTAF_MAGIC: [u8; 4] = *b"BTAF";

/// File name table section magic
pub const BTNF_MAGIC: [u8; 4] = *b"BTNF";

/// File image (data) section magic
pub const GMIF_MAGIC: [u8; 4] = *b"GMIF";

/// Byte-order mark, stored as `FF FE`
pub const BYTE_ORDER_MARK: u16 = 0xFEFF;

/// Format version, stored as `00 01`
pub const VERSION: u16 = 0x0100;

/// Size of the global header
pub const HEADER_SIZE: u16 = 16;

/// Number of sections following the header
pub const SECTION_COUNT: u16 = 3;

/// Size of the BTAF sub-header (magic, size, entry count)
pub const BTAF_HEADER_SIZE: u32 = 12;

/// Size of the name table section written by [`NarcWriter`]
pub const BTNF_SIZE: u32 = 16;

/// Size of the GMIF sub-header (magic, size)
pub const GMIF_HEADER_SIZE: u32 = 8;

/// Alignment of sections and entry data
pub const ALIGNMENT: usize = 4;

/// Round `len` up to the next multiple of [`ALIGNMENT`]
#[must_use]
pub(crate) fn align(len: usize) -> usize {
    len.div_ceil(ALIGNMENT) * ALIGNMENT
}
