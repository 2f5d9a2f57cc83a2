//! NARC archive reader

use std::fs::File;
use std::io::{BufReader, Cursor, ErrorKind, Read, Seek, SeekFrom, Take};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use super::{
    BTAF_HEADER_SIZE, BTAF_MAGIC, BTNF_MAGIC, GMIF_HEADER_SIZE, GMIF_MAGIC, NARC_MAGIC,
    NarcEntry, NarcEntryInfo, NarcPhase, NarcProgress,
};
use crate::error::{Error, Result};

/// Progress callback type
pub type ProgressCallback<'a> = &'a (dyn Fn(&NarcProgress) + Sync + Send);

/// Maps a short read to `MalformedHeader`, anything else stays an I/O error.
fn short_read(section: &'static str) -> impl Fn(std::io::Error) -> Error {
    move |err| {
        if err.kind() == ErrorKind::UnexpectedEof {
            Error::MalformedHeader {
                section,
                reason: "unexpected end of data",
            }
        } else {
            Error::Io(err)
        }
    }
}

fn read_magic<R: Read>(reader: &mut R, section: &'static str, expected: [u8; 4]) -> Result<()> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic).map_err(short_read(section))?;
    if magic != expected {
        return Err(Error::MalformedHeader {
            section,
            reason: "signature mismatch",
        });
    }
    Ok(())
}

/// Parsed allocation table of a NARC archive.
///
/// Holds offsets only; entry bytes are read on demand through [`NarcReader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narc {
    /// Total size declared in the global header
    pub file_size: u32,
    /// Absolute offset of the GMIF data
    pub data_offset: u64,
    entries: Vec<NarcEntry>,
}

impl Narc {
    /// Parse the header and allocation table from a seekable stream
    ///
    /// # Errors
    /// Returns [`Error::MalformedHeader`] if a section signature does not match,
    /// a header read is short, or an entry span is inconsistent with the stream.
    /// Returns [`Error::Io`] for other read failures.
    pub fn parse<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let stream_len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        read_magic(reader, "NARC", NARC_MAGIC)?;
        let header_err = short_read("NARC");
        let _bom = reader.read_u16::<LittleEndian>().map_err(&header_err)?;
        let _version = reader.read_u16::<LittleEndian>().map_err(&header_err)?;
        let file_size = reader.read_u32::<LittleEndian>().map_err(&header_err)?;
        let header_size = reader.read_u16::<LittleEndian>().map_err(&header_err)?;
        let _section_count = reader.read_u16::<LittleEndian>().map_err(&header_err)?;

        let btaf_offset = u64::from(header_size);
        if btaf_offset >= stream_len {
            return Err(Error::MalformedHeader {
                section: "NARC",
                reason: "first section offset past end of stream",
            });
        }
        reader.seek(SeekFrom::Start(btaf_offset))?;

        read_magic(reader, "BTAF", BTAF_MAGIC)?;
        let btaf_err = short_read("BTAF");
        let btaf_size = reader.read_u32::<LittleEndian>().map_err(&btaf_err)?;
        let count = reader.read_u32::<LittleEndian>().map_err(&btaf_err)?;

        if u64::from(btaf_size) < u64::from(BTAF_HEADER_SIZE) + 8 * u64::from(count) {
            return Err(Error::MalformedHeader {
                section: "BTAF",
                reason: "section too small for its entry count",
            });
        }

        if btaf_offset + u64::from(btaf_size) > stream_len {
            return Err(Error::MalformedHeader {
                section: "BTAF",
                reason: "section extends past end of stream",
            });
        }

        // count is bounded by the stream length from here on
        let mut spans = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let start = reader.read_u32::<LittleEndian>().map_err(&btaf_err)?;
            let end = reader.read_u32::<LittleEndian>().map_err(&btaf_err)?;
            if end < start {
                return Err(Error::MalformedHeader {
                    section: "BTAF",
                    reason: "entry ends before it starts",
                });
            }
            spans.push((start, end));
        }

        let btnf_offset = btaf_offset + u64::from(btaf_size);
        if btnf_offset >= stream_len {
            return Err(Error::MalformedHeader {
                section: "BTNF",
                reason: "section offset past end of stream",
            });
        }
        reader.seek(SeekFrom::Start(btnf_offset))?;
        read_magic(reader, "BTNF", BTNF_MAGIC)?;
        let btnf_size = reader
            .read_u32::<LittleEndian>()
            .map_err(short_read("BTNF"))?;

        let gmif_offset = btnf_offset + u64::from(btnf_size);
        if gmif_offset >= stream_len {
            return Err(Error::MalformedHeader {
                section: "GMIF",
                reason: "section offset past end of stream",
            });
        }
        reader.seek(SeekFrom::Start(gmif_offset))?;
        read_magic(reader, "GMIF", GMIF_MAGIC)?;

        let data_offset = gmif_offset + u64::from(GMIF_HEADER_SIZE);
        let entries = spans
            .into_iter()
            .map(|(start, end)| {
                let offset = data_offset + u64::from(start);
                if offset + u64::from(end - start) > stream_len {
                    return Err(Error::MalformedHeader {
                        section: "GMIF",
                        reason: "entry extends past end of stream",
                    });
                }
                Ok(NarcEntry { start, end, offset })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            file_size,
            data_offset,
            entries,
        })
    }

    /// Parse an archive held in memory
    ///
    /// # Errors
    /// See [`Narc::parse`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::parse(&mut Cursor::new(bytes))
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the archive has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in id order
    #[must_use]
    pub fn entries(&self) -> &[NarcEntry] {
        &self.entries
    }

    /// Look up an entry by id
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if `id >= len()`.
    pub fn entry(&self, id: usize) -> Result<&NarcEntry> {
        self.entries.get(id).ok_or(Error::OutOfRange {
            id: i64::try_from(id).unwrap_or(i64::MAX),
            count: self.entries.len(),
        })
    }

    /// Validate a signed entry id (as typed on the command line)
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] for negative ids and ids `>= len()`.
    pub fn checked_index(&self, id: i64) -> Result<usize> {
        usize::try_from(id)
            .ok()
            .filter(|&index| index < self.entries.len())
            .ok_or(Error::OutOfRange {
                id,
                count: self.entries.len(),
            })
    }

    /// Id/offset/size listing of every entry
    #[must_use]
    pub fn entry_infos(&self) -> Vec<NarcEntryInfo> {
        self.entries
            .iter()
            .enumerate()
            .map(|(id, entry)| NarcEntryInfo {
                id,
                offset: entry.offset,
                size: entry.size(),
            })
            .collect()
    }
}

/// NARC archive reader over any seekable source
pub struct NarcReader<R: Read + Seek> {
    reader: R,
    narc: Narc,
}

impl NarcReader<BufReader<File>> {
    /// Open and parse an archive on disk
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the file cannot be opened, or any error of [`Narc::parse`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> NarcReader<R> {
    /// Parse the allocation table of `reader`
    ///
    /// # Errors
    /// See [`Narc::parse`].
    pub fn new(mut reader: R) -> Result<Self> {
        let narc = Narc::parse(&mut reader)?;
        Ok(Self { reader, narc })
    }

    /// The parsed allocation table
    #[must_use]
    pub fn narc(&self) -> &Narc {
        &self.narc
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.narc.len()
    }

    /// Returns true if the archive has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.narc.is_empty()
    }

    /// Look up an entry by id
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if `id >= len()`.
    pub fn entry(&self, id: usize) -> Result<&NarcEntry> {
        self.narc.entry(id)
    }

    /// All entries in id order
    #[must_use]
    pub fn entries(&self) -> &[NarcEntry] {
        self.narc.entries()
    }

    /// Id/offset/size listing of every entry
    #[must_use]
    pub fn entry_infos(&self) -> Vec<NarcEntryInfo> {
        self.narc.entry_infos()
    }

    /// Stream an entry without buffering it
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] for a bad id or [`Error::Io`] if seeking fails.
    pub fn read_entry(&mut self, id: usize) -> Result<Take<&mut R>> {
        let entry = *self.narc.entry(id)?;
        self.reader.seek(SeekFrom::Start(entry.offset))?;
        Ok((&mut self.reader).take(u64::from(entry.size())))
    }

    /// Read an entry into memory
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] for a bad id or [`Error::Io`] if reading fails.
    pub fn extract(&mut self, id: usize) -> Result<Vec<u8>> {
        let size = self.narc.entry(id)?.size() as usize;
        let mut data = Vec::with_capacity(size);
        self.read_entry(id)?.read_to_end(&mut data)?;
        if data.len() != size {
            return Err(Error::Io(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                format!("entry {id} truncated: expected {size} bytes, got {}", data.len()),
            )));
        }
        Ok(data)
    }

    /// Read every entry into memory, in id order
    ///
    /// # Errors
    /// Returns [`Error::Io`] if any entry cannot be read.
    pub fn extract_all(&mut self) -> Result<Vec<Vec<u8>>> {
        self.extract_all_with_progress(&|_| {})
    }

    /// Read every entry into memory with progress callback
    ///
    /// # Errors
    /// Returns [`Error::Io`] if any entry cannot be read.
    pub fn extract_all_with_progress(
        &mut self,
        progress: ProgressCallback,
    ) -> Result<Vec<Vec<u8>>> {
        let total = self.len();
        (0..total)
            .map(|id| {
                progress(&NarcProgress::new(NarcPhase::ExtractingEntries, id + 1, total));
                self.extract(id)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narc::NarcWriter;

    /// One entry spanning [0, 10), an empty 16-byte BTNF and 10 payload bytes.
    fn hand_built() -> Vec<u8> {
        let payload = *b"0123456789";
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"NARC");
        bytes.extend_from_slice(&[0xFF, 0xFE, 0x00, 0x01]);
        let total: u32 = 16 + 20 + 16 + 8 + 10;
        bytes.extend_from_slice(&total.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(&3u16.to_le_bytes());
        bytes.extend_from_slice(b"BTAF");
        bytes.extend_from_slice(&20u32.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&10u32.to_le_bytes());
        bytes.extend_from_slice(b"BTNF");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 8]);
        bytes.extend_from_slice(b"GMIF");
        bytes.extend_from_slice(&18u32.to_le_bytes());
        bytes.extend_from_slice(&payload);
        bytes
    }

    #[test]
    fn test_parse_hand_built() {
        let bytes = hand_built();
        let narc = Narc::from_bytes(&bytes).unwrap();
        assert_eq!(narc.len(), 1);
        assert_eq!(narc.file_size, 70);
        assert_eq!(narc.data_offset, 60);
        assert_eq!(narc.entry(0).unwrap().size(), 10);

        let mut reader = NarcReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.extract(0).unwrap(), b"0123456789");
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = hand_built();
        bytes[0] = b'X';
        assert!(matches!(
            Narc::from_bytes(&bytes),
            Err(Error::MalformedHeader { section: "NARC", .. })
        ));
    }

    #[test]
    fn test_bad_btaf_magic() {
        let mut bytes = hand_built();
        bytes[16] = b'X';
        assert!(matches!(
            Narc::from_bytes(&bytes),
            Err(Error::MalformedHeader { section: "BTAF", .. })
        ));
    }

    #[test]
    fn test_bad_btnf_magic() {
        let mut bytes = hand_built();
        bytes[36] = b'X';
        assert!(matches!(
            Narc::from_bytes(&bytes),
            Err(Error::MalformedHeader { section: "BTNF", .. })
        ));
    }

    #[test]
    fn test_short_header() {
        let bytes = hand_built();
        assert!(matches!(
            Narc::from_bytes(&bytes[..10]),
            Err(Error::MalformedHeader { section: "NARC", .. })
        ));
        assert!(matches!(
            Narc::from_bytes(&[]),
            Err(Error::MalformedHeader { .. })
        ));
    }

    #[test]
    fn test_entry_end_before_start() {
        let mut bytes = hand_built();
        // start = 12, end = 10
        bytes[28..32].copy_from_slice(&12u32.to_le_bytes());
        assert!(matches!(
            Narc::from_bytes(&bytes),
            Err(Error::MalformedHeader { section: "BTAF", .. })
        ));
    }

    #[test]
    fn test_fat_too_small_for_count() {
        let mut bytes = hand_built();
        bytes[24..28].copy_from_slice(&5u32.to_le_bytes());
        assert!(matches!(
            Narc::from_bytes(&bytes),
            Err(Error::MalformedHeader { section: "BTAF", .. })
        ));
    }

    #[test]
    fn test_fat_larger_than_stream() {
        // 40 bytes claiming a 4 GiB allocation table
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"NARC");
        bytes.extend_from_slice(&[0xFF, 0xFE, 0x00, 0x01]);
        bytes.extend_from_slice(&40u32.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(&3u16.to_le_bytes());
        bytes.extend_from_slice(b"BTAF");
        bytes.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
        bytes.extend_from_slice(&0x1FFF_FFFEu32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 12]);
        assert_eq!(bytes.len(), 40);

        assert!(matches!(
            Narc::from_bytes(&bytes),
            Err(Error::MalformedHeader { section: "BTAF", .. })
        ));
    }

    #[test]
    fn test_entry_past_end_of_stream() {
        let mut bytes = hand_built();
        bytes[32..36].copy_from_slice(&11u32.to_le_bytes());
        assert!(matches!(
            Narc::from_bytes(&bytes),
            Err(Error::MalformedHeader { section: "GMIF", .. })
        ));
    }

    #[test]
    fn test_out_of_range() {
        let bytes = NarcWriter::with_files(vec![vec![1, 2, 3]]).build().unwrap();
        let mut reader = NarcReader::new(Cursor::new(bytes)).unwrap();
        assert!(matches!(
            reader.extract(1),
            Err(Error::OutOfRange { id: 1, count: 1 })
        ));
        assert!(matches!(
            reader.narc().checked_index(-1),
            Err(Error::OutOfRange { id: -1, count: 1 })
        ));
        assert!(matches!(
            reader.narc().checked_index(1),
            Err(Error::OutOfRange { id: 1, count: 1 })
        ));
        assert_eq!(reader.narc().checked_index(0).unwrap(), 0);
    }

    #[test]
    fn test_read_entry_is_bounded() {
        let bytes = NarcWriter::with_files(vec![vec![1, 2, 3], vec![4, 5]])
            .build()
            .unwrap();
        let mut reader = NarcReader::new(Cursor::new(bytes)).unwrap();
        let mut data = Vec::new();
        reader.read_entry(0).unwrap().read_to_end(&mut data).unwrap();
        assert_eq!(data, vec![1, 2, 3]);
    }

    #[test]
    fn test_entry_infos() {
        let bytes = NarcWriter::with_files(vec![vec![0; 5], vec![0; 8]])
            .build()
            .unwrap();
        let narc = Narc::from_bytes(&bytes).unwrap();
        let infos = narc.entry_infos();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].size, 5);
        assert_eq!(infos[1].size, 8);
        assert_eq!(infos[1].offset, infos[0].offset + 8);
    }

    #[test]
    fn test_extract_all_reports_progress() {
        let bytes = NarcWriter::with_files(vec![vec![9], vec![], vec![7, 7]])
            .build()
            .unwrap();
        let mut reader = NarcReader::new(Cursor::new(bytes)).unwrap();
        let seen = std::sync::atomic::AtomicUsize::new(0);
        let all = reader
            .extract_all_with_progress(&|p| {
                seen.store(p.current, std::sync::atomic::Ordering::SeqCst);
            })
            .unwrap();
        assert_eq!(all, vec![vec![9], vec![], vec![7, 7]]);
        assert_eq!(seen.load(std::sync::atomic::Ordering::SeqCst), 3);
    }
}
