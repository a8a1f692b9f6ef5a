//! Archive backends
//!
//! An archive is opened once per session and indexed into a flat list of
//! [`ArchiveEntry`] values. Whether an entry is a directory marker or a
//! file is decided here, while indexing, and carried as [`EntryKind`] from
//! then on.
//!
//! Supported formats, detected from the leading bytes of the file:
//! - zip (`PK\x03\x04`, or `PK\x05\x06` for an empty archive)
//! - gzip-compressed tar (`\x1f\x8b`)
//! - ustar tar (`ustar` magic at offset 257)

mod tar_reader;
mod zip_reader;

use std::fmt;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Offset of the ustar magic inside a tar header.
const USTAR_MAGIC_OFFSET: usize = 257;

/// Kind of an archive entry, fixed at indexing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Explicit directory marker (`name/` in zip, typeflag `5` in tar).
    DirectoryMarker,
    /// Any other entry.
    File,
}

/// A single named entry of the backing archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveEntry {
    /// Normalized path: no leading `/` or `./`, no empty segments,
    /// no trailing separator.
    pub path: String,
    /// Directory marker or file.
    pub kind: EntryKind,
}

impl ArchiveEntry {
    /// Build an entry from a path and an explicit kind.
    ///
    /// Returns `None` for names that normalize to the archive root or that
    /// try to escape it with `..`.
    pub fn new(raw: &str, kind: EntryKind) -> Option<Self> {
        let path = normalize_entry_path(raw)?;
        Some(Self { path, kind })
    }

    /// Build an entry from a raw archive name, using the trailing separator
    /// convention to tell directory markers from files.
    pub fn from_raw_name(raw: &str) -> Option<Self> {
        let kind = if raw.ends_with('/') {
            EntryKind::DirectoryMarker
        } else {
            EntryKind::File
        };
        Self::new(raw, kind)
    }

    /// Check if this entry is an explicit directory marker.
    pub fn is_directory_marker(&self) -> bool {
        matches!(self.kind, EntryKind::DirectoryMarker)
    }
}

fn normalize_entry_path(raw: &str) -> Option<String> {
    let mut segments = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Archive container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveFormat::Zip => write!(f, "zip"),
            ArchiveFormat::Tar => write!(f, "tar"),
            ArchiveFormat::TarGz => write!(f, "tar.gz"),
        }
    }
}

impl ArchiveFormat {
    /// Detect the format from the first bytes of an archive.
    pub fn detect(head: &[u8]) -> Option<Self> {
        if head.starts_with(b"PK\x03\x04") || head.starts_with(b"PK\x05\x06") {
            Some(ArchiveFormat::Zip)
        } else if head.starts_with(&[0x1f, 0x8b]) {
            Some(ArchiveFormat::TarGz)
        } else if head.len() >= USTAR_MAGIC_OFFSET + 5
            && &head[USTAR_MAGIC_OFFSET..USTAR_MAGIC_OFFSET + 5] == b"ustar"
        {
            Some(ArchiveFormat::Tar)
        } else {
            None
        }
    }
}

/// The open file behind an [`ArchiveHandle`].
enum Backing {
    Zip(ZipArchive<File>),
    Tar(File),
}

/// Scoped handle on the backing archive.
///
/// The underlying file stays open until [`close`](ArchiveHandle::close) is
/// called or the handle is dropped, whichever comes first. Release happens
/// exactly once.
pub struct ArchiveHandle {
    path: PathBuf,
    format: ArchiveFormat,
    entries: Vec<ArchiveEntry>,
    backing: Option<Backing>,
}

impl fmt::Debug for ArchiveHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveHandle")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("entries", &self.entries.len())
            .field("open", &self.is_open())
            .finish()
    }
}

impl ArchiveHandle {
    /// Open and index the archive at `path`.
    ///
    /// A missing file fails with [`Error::ArchiveNotFound`] before anything
    /// is opened. If the file opens but cannot be indexed, it is released
    /// before the error is returned.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::ArchiveNotFound(path.to_path_buf()));
        }

        let mut file = File::open(path)?;
        let mut head = Vec::with_capacity(USTAR_MAGIC_OFFSET + 5);
        (&mut file)
            .take((USTAR_MAGIC_OFFSET + 5) as u64)
            .read_to_end(&mut head)?;
        file.seek(SeekFrom::Start(0))?;

        let format = ArchiveFormat::detect(&head)
            .ok_or_else(|| Error::Archive("unsupported archive format".to_string()))?;

        let (entries, backing) = match format {
            ArchiveFormat::Zip => {
                let archive = ZipArchive::new(file)?;
                let entries = zip_reader::index(&archive);
                (entries, Backing::Zip(archive))
            }
            ArchiveFormat::Tar => {
                let mut data = Vec::new();
                file.read_to_end(&mut data)?;
                (tar_reader::index(&data)?, Backing::Tar(file))
            }
            ArchiveFormat::TarGz => {
                let mut data = Vec::new();
                GzDecoder::new(&mut file)
                    .read_to_end(&mut data)
                    .map_err(|e| Error::Archive(format!("gzip decompression failed: {}", e)))?;
                file.seek(SeekFrom::Start(0))?;
                (tar_reader::index(&data)?, Backing::Tar(file))
            }
        };

        tracing::info!(
            path = %path.display(),
            %format,
            entries = entries.len(),
            "archive opened"
        );

        Ok(Self {
            path: path.to_path_buf(),
            format,
            entries,
            backing: Some(backing),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Detected container format.
    pub fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// Entries indexed at open time, in archive order.
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Whether the backing file is still held.
    pub fn is_open(&self) -> bool {
        self.backing.is_some()
    }

    /// Release the backing file.
    ///
    /// Returns `true` if this call released it, `false` if it had already
    /// been released.
    pub fn close(&mut self) -> bool {
        match self.backing.take() {
            Some(Backing::Zip(archive)) => {
                drop(archive);
            }
            Some(Backing::Tar(file)) => {
                drop(file);
            }
            None => return false,
        }
        tracing::info!(path = %self.path.display(), "archive closed");
        true
    }
}

impl Drop for ArchiveHandle {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_trailing_slash_is_marker() {
        let entry = ArchiveEntry::from_raw_name("docs/").unwrap();
        assert_eq!(entry.path, "docs");
        assert!(entry.is_directory_marker());

        let entry = ArchiveEntry::from_raw_name("docs/readme.md").unwrap();
        assert_eq!(entry.path, "docs/readme.md");
        assert_eq!(entry.kind, EntryKind::File);
    }

    #[test]
    fn test_entry_normalization() {
        let entry = ArchiveEntry::from_raw_name("./a//b/./c.txt").unwrap();
        assert_eq!(entry.path, "a/b/c.txt");
        let entry = ArchiveEntry::from_raw_name("/abs/file").unwrap();
        assert_eq!(entry.path, "abs/file");
    }

    #[test]
    fn test_entry_root_and_escape_rejected() {
        assert!(ArchiveEntry::from_raw_name("./").is_none());
        assert!(ArchiveEntry::from_raw_name("/").is_none());
        assert!(ArchiveEntry::from_raw_name("../etc/passwd").is_none());
        assert!(ArchiveEntry::from_raw_name("a/../../b").is_none());
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(ArchiveFormat::detect(b"PK\x03\x04rest"), Some(ArchiveFormat::Zip));
        assert_eq!(ArchiveFormat::detect(b"PK\x05\x06"), Some(ArchiveFormat::Zip));
        assert_eq!(ArchiveFormat::detect(&[0x1f, 0x8b, 8, 0]), Some(ArchiveFormat::TarGz));

        let mut tar_head = vec![0u8; 512];
        tar_head[257..262].copy_from_slice(b"ustar");
        assert_eq!(ArchiveFormat::detect(&tar_head), Some(ArchiveFormat::Tar));

        assert_eq!(ArchiveFormat::detect(b"plain text"), None);
        assert_eq!(ArchiveFormat::detect(b""), None);
    }

    #[test]
    fn test_open_missing_archive() {
        let err = ArchiveHandle::open("/nonexistent/arcshell/fs.zip").unwrap_err();
        assert!(matches!(err, Error::ArchiveNotFound(_)));
    }

    #[test]
    fn test_open_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "not an archive").unwrap();
        let err = ArchiveHandle::open(&path).unwrap_err();
        assert!(matches!(err, Error::Archive(_)));
    }
}
