//! Loading an export from disk.
//!
//! An export is either a bare `.txt` transcript or a `.zip` archive holding
//! the transcript plus its attachments. [`ChatSource`] keeps the archive
//! bytes around so contact cards can be read after parsing.

use std::fs;
use std::path::Path;

use crate::archive::{ArchiveEntry, ArchiveReader, has_extension};
use crate::core::report::extract_group_name;
use crate::error::{ChatwrapError, Result};

/// Invisible and non-breaking characters that exports insert around
/// timestamps and names.
const SPACE_LIKE: [char; 6] = ['\u{202A}', '\u{200E}', '\u{202C}', '\u{00A0}', '\u{202F}', '\u{200F}'];

/// Replaces direction marks and non-breaking spaces with plain spaces and
/// drops a leading byte-order mark.
///
/// ```
/// use chatwrap::source::normalize_transcript;
///
/// assert_eq!(normalize_transcript("\u{feff}1/2/24, 9:41\u{202f}PM"), "1/2/24, 9:41 PM");
/// ```
pub fn normalize_transcript(text: &str) -> String {
    text.strip_prefix('\u{feff}')
        .unwrap_or(text)
        .chars()
        .map(|c| if SPACE_LIKE.contains(&c) { ' ' } else { c })
        .collect()
}

/// A loaded export.
#[derive(Debug, Clone)]
pub struct ChatSource {
    /// File name the export was loaded from.
    pub file_name: String,
    /// Name of the transcript entry when the export is an archive.
    pub transcript_name: Option<String>,
    /// Raw transcript text.
    pub text: String,
    archive: Option<Vec<u8>>,
}

impl ChatSource {
    /// Reads `path`. A `.zip` file yields its first `.txt` entry.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| ChatwrapError::input(path, e))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if has_extension(&file_name, "zip") {
            let entry = ArchiveReader::new(&bytes)?.first_by_extension("txt")?;
            tracing::info!(archive = %file_name, transcript = %entry.filename, "reading transcript from archive");
            let text = entry.text()?;
            return Ok(Self {
                file_name,
                transcript_name: Some(entry.filename),
                text,
                archive: Some(bytes),
            });
        }

        let text = String::from_utf8(bytes).map_err(|source| ChatwrapError::Utf8 {
            context: format!("transcript '{}'", path.display()),
            source,
        })?;
        Ok(Self {
            file_name,
            transcript_name: None,
            text,
            archive: None,
        })
    }

    /// An in-memory transcript with no attachments.
    pub fn from_text(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            transcript_name: None,
            text: text.into(),
            archive: None,
        }
    }

    /// An in-memory archive.
    pub fn from_archive(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let entry = ArchiveReader::new(&bytes)?.first_by_extension("txt")?;
        let text = entry.text()?;
        Ok(Self {
            file_name: file_name.into(),
            transcript_name: Some(entry.filename),
            text,
            archive: Some(bytes),
        })
    }

    pub fn is_archive(&self) -> bool {
        self.archive.is_some()
    }

    /// Every `.vcf` entry in the archive. A bare transcript, an archive
    /// without cards or an unreadable archive yields none.
    pub fn contact_cards(&self) -> Vec<ArchiveEntry> {
        let Some(bytes) = &self.archive else {
            return Vec::new();
        };
        match ArchiveReader::new(bytes).and_then(|reader| reader.all_by_extension("vcf")) {
            Ok(cards) => cards,
            Err(err) if err.is_archive_format() => {
                tracing::debug!(error = %err, "no contact cards in archive");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(error = %err, "contact cards could not be read");
                Vec::new()
            }
        }
    }

    /// Group name encoded in the export's file name, falling back to the
    /// transcript entry's name for renamed archives. Empty if neither has one.
    pub fn group_name(&self) -> String {
        let outer = extract_group_name(&self.file_name);
        if !outer.is_empty() {
            return outer;
        }
        self.transcript_name
            .as_deref()
            .map(extract_group_name)
            .unwrap_or_default()
    }
}
