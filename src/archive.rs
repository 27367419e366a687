//! Minimal reader for ZIP exports.
//!
//! Chat exports bundle the transcript with its attachments in a ZIP file.
//! [`ArchiveReader`] walks the local file headers directly, so it works on
//! archives whose central directory is missing or was cut off. Entry data
//! is either stored or raw DEFLATE (inflated with `flate2`).
//!
//! Limitations:
//! - CRC-32 values are not verified.
//! - When an entry defers its size to a data descriptor (flag bit 3) or
//!   declares size zero, its length is taken to run up to the next local or
//!   central-directory signature. Compressed data that happens to contain
//!   such a signature will be cut short.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatwrap::archive::ArchiveReader;
//!
//! let bytes = std::fs::read("WhatsApp Chat with Family.zip")?;
//! let reader = ArchiveReader::new(&bytes)?;
//! let transcript = reader.first_by_extension(".txt")?;
//! let cards = reader.all_by_extension(".vcf").unwrap_or_default();
//! println!("{} ({} contact cards)", transcript.filename, cards.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::borrow::Cow;
use std::io::Read;

use flate2::read::DeflateDecoder;

use crate::error::{ChatwrapError, Result};

const LOCAL_HEADER_SIGNATURE: u32 = 0x0403_4b50;
const CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0201_4b50;
const LOCAL_HEADER_LEN: usize = 30;
const FLAG_DATA_DESCRIPTOR: u16 = 0x0008;

const METHOD_STORED: u16 = 0;
const METHOD_DEFLATE: u16 = 8;

/// A decompressed file from the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path inside the archive.
    pub filename: String,
    pub content: Vec<u8>,
}

impl ArchiveEntry {
    /// File name without any directory prefix.
    pub fn basename(&self) -> &str {
        basename(&self.filename)
    }

    /// Content decoded as UTF-8.
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.content.clone()).map_err(|source| ChatwrapError::Utf8 {
            context: format!("archive entry '{}'", self.filename),
            source,
        })
    }

    /// Content decoded as UTF-8, replacing invalid sequences.
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

/// Splits off everything up to the last `/` or `\`.
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Case-insensitive extension test; `ext` may be given with or without the dot.
pub fn has_extension(filename: &str, ext: &str) -> bool {
    let ext = ext.trim_start_matches('.').to_lowercase();
    let name = filename.to_lowercase();
    name.len() > ext.len() && name.ends_with(&ext) && name[..name.len() - ext.len()].ends_with('.')
}

/// A local file header and the still-compressed bytes it describes.
#[derive(Debug, Clone)]
pub struct LocalEntry<'a> {
    pub filename: String,
    pub method: u16,
    pub flags: u16,
    raw: &'a [u8],
}

impl LocalEntry<'_> {
    /// Inflates (or copies) the entry data.
    ///
    /// # Errors
    ///
    /// [`ChatwrapError::UnsupportedCompression`] for methods other than
    /// stored and deflate, [`ChatwrapError::Decompress`] for a corrupt
    /// deflate stream.
    pub fn decompress(&self) -> Result<ArchiveEntry> {
        let content = match self.method {
            METHOD_STORED => self.raw.to_vec(),
            METHOD_DEFLATE => {
                let mut out = Vec::with_capacity(self.raw.len() * 3);
                DeflateDecoder::new(self.raw)
                    .read_to_end(&mut out)
                    .map_err(|source| ChatwrapError::Decompress {
                        filename: self.filename.clone(),
                        source,
                    })?;
                out
            }
            other => {
                return Err(ChatwrapError::unsupported_compression(
                    self.filename.clone(),
                    other,
                ));
            }
        };
        Ok(ArchiveEntry {
            filename: self.filename.clone(),
            content,
        })
    }
}

/// Scans a ZIP buffer for local file entries.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveReader<'a> {
    data: &'a [u8],
}

impl<'a> ArchiveReader<'a> {
    /// Wraps a buffer after checking the `PK` signature.
    ///
    /// # Errors
    ///
    /// [`ChatwrapError::ArchiveFormat`] if the buffer does not start with `PK`.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        if !data.starts_with(b"PK") {
            return Err(ChatwrapError::archive_format(
                "missing ZIP signature (expected 'PK')",
            ));
        }
        Ok(Self { data })
    }

    /// Iterates local entries in file order, directories skipped.
    ///
    /// The iterator yields an error and stops if a header runs past the end
    /// of the buffer.
    pub fn local_entries(&self) -> LocalEntries<'a> {
        LocalEntries {
            data: self.data,
            offset: 0,
        }
    }

    /// Iterates decompressed entries. A failing entry yields its error and
    /// iteration continues with the next one.
    pub fn entries(&self) -> impl Iterator<Item = Result<ArchiveEntry>> + 'a {
        self.local_entries()
            .map(|header| header.and_then(|entry| entry.decompress()))
    }

    /// First entry whose name ends with `ext`.
    ///
    /// Entries that fail to decompress are skipped with a warning.
    ///
    /// # Errors
    ///
    /// The last entry error if every matching entry failed, otherwise
    /// [`ChatwrapError::ArchiveFormat`] when nothing matches.
    pub fn first_by_extension(&self, ext: &str) -> Result<ArchiveEntry> {
        let mut last_error = None;
        for header in self.local_entries() {
            let header = header?;
            if !has_extension(&header.filename, ext) {
                continue;
            }
            match header.decompress() {
                Ok(entry) => return Ok(entry),
                Err(err) => {
                    tracing::warn!(entry = %header.filename, error = %err, "skipping unreadable archive entry");
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| not_found(ext)))
    }

    /// Every entry whose name ends with `ext`.
    ///
    /// Entries that fail to decompress are skipped with a warning; a
    /// truncated header ends the scan and keeps what was collected.
    ///
    /// # Errors
    ///
    /// Same as [`first_by_extension`](Self::first_by_extension) when no
    /// entry could be returned.
    pub fn all_by_extension(&self, ext: &str) -> Result<Vec<ArchiveEntry>> {
        let mut found = Vec::new();
        let mut last_error = None;
        for header in self.local_entries() {
            let header = match header {
                Ok(header) => header,
                Err(err) => {
                    tracing::warn!(error = %err, "archive scan stopped early");
                    last_error = Some(err);
                    break;
                }
            };
            if !has_extension(&header.filename, ext) {
                continue;
            }
            match header.decompress() {
                Ok(entry) => found.push(entry),
                Err(err) => {
                    tracing::warn!(entry = %header.filename, error = %err, "skipping unreadable archive entry");
                    last_error = Some(err);
                }
            }
        }
        if found.is_empty() {
            return Err(last_error.unwrap_or_else(|| not_found(ext)));
        }
        Ok(found)
    }
}

fn not_found(ext: &str) -> ChatwrapError {
    ChatwrapError::archive_format(format!(
        "No .{} files found in ZIP archive",
        ext.trim_start_matches('.')
    ))
}

/// Iterator over [`LocalEntry`] values.
#[derive(Debug, Clone)]
pub struct LocalEntries<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Iterator for LocalEntries<'a> {
    type Item = Result<LocalEntry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let data = self.data;
        while self.offset + LOCAL_HEADER_LEN <= data.len() {
            let at = self.offset;
            if read_u32(data, at) != LOCAL_HEADER_SIGNATURE {
                self.offset += 1;
                continue;
            }

            let flags = read_u16(data, at + 6);
            let method = read_u16(data, at + 8);
            let declared_size = read_u32(data, at + 18) as usize;
            let name_len = usize::from(read_u16(data, at + 26));
            let extra_len = usize::from(read_u16(data, at + 28));

            let name_start = at + LOCAL_HEADER_LEN;
            let data_start = name_start + name_len + extra_len;
            if data_start > data.len() {
                self.offset = data.len();
                return Some(Err(ChatwrapError::archive_format(format!(
                    "local header at offset {at} runs past the end of the archive"
                ))));
            }
            let filename = String::from_utf8_lossy(&data[name_start..name_start + name_len])
                .into_owned();

            let size = if flags & FLAG_DATA_DESCRIPTOR != 0 || declared_size == 0 {
                find_next_signature(data, data_start).map_or(data.len() - data_start, |end| end - data_start)
            } else {
                declared_size.min(data.len() - data_start)
            };
            let data_end = data_start + size;
            // Always move forward, even for a zero-length entry.
            self.offset = data_end.max(at + 1);

            if filename.ends_with('/') {
                continue;
            }

            return Some(Ok(LocalEntry {
                filename,
                method,
                flags,
                raw: &data[data_start..data_end],
            }));
        }
        None
    }
}

fn read_u16(data: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([data[at], data[at + 1]])
}

fn read_u32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

/// Offset of the next local or central-directory signature at or after `from`.
fn find_next_signature(data: &[u8], from: usize) -> Option<usize> {
    data.get(from..)?
        .windows(4)
        .position(|w| {
            let sig = u32::from_le_bytes([w[0], w[1], w[2], w[3]]);
            sig == LOCAL_HEADER_SIGNATURE || sig == CENTRAL_DIRECTORY_SIGNATURE
        })
        .map(|pos| from + pos)
}
