//! Zip indexing via the central directory

use std::io::{Read, Seek};

use zip::ZipArchive;

use super::ArchiveEntry;

/// Collect every named entry of a zip archive.
pub(super) fn index<R: Read + Seek>(archive: &ZipArchive<R>) -> Vec<ArchiveEntry> {
    archive
        .file_names()
        .filter_map(|name| {
            let entry = ArchiveEntry::from_raw_name(name);
            if entry.is_none() {
                tracing::warn!(name, "skipping zip entry outside the archive root");
            }
            entry
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::EntryKind;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    fn build_zip(names: &[&str]) -> ZipArchive<Cursor<Vec<u8>>> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for name in names {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(b"content").unwrap();
            }
        }
        let cursor = writer.finish().unwrap();
        ZipArchive::new(cursor).unwrap()
    }

    #[test]
    fn test_index_files_and_markers() {
        let archive = build_zip(&["file1.txt", "docs/", "docs/readme.md"]);
        let mut entries = index(&archive);
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].path, "docs");
        assert_eq!(entries[0].kind, EntryKind::DirectoryMarker);
        assert_eq!(entries[1].path, "docs/readme.md");
        assert_eq!(entries[1].kind, EntryKind::File);
        assert_eq!(entries[2].path, "file1.txt");
    }

    #[test]
    fn test_index_empty_archive() {
        let archive = build_zip(&[]);
        assert!(index(&archive).is_empty());
    }
}
