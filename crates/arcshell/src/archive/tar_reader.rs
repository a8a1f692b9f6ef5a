//! Tar indexing over 512-byte ustar headers
//!
//! Only names and types are read. Content blocks are stepped over.

use super::{ArchiveEntry, EntryKind, USTAR_MAGIC_OFFSET};
use crate::error::{Error, Result};

/// Simple tar header (512 bytes)
const TAR_BLOCK_SIZE: usize = 512;

/// Collect every named entry of an uncompressed tar stream.
pub(super) fn index(data: &[u8]) -> Result<Vec<ArchiveEntry>> {
    let mut entries = Vec::new();
    let mut long_name: Option<String> = None;
    let mut offset = 0;

    while offset + TAR_BLOCK_SIZE <= data.len() {
        let header = &data[offset..offset + TAR_BLOCK_SIZE];

        // Check for end of archive
        if header.iter().all(|&b| b == 0) {
            break;
        }

        let size = parse_octal(&header[124..136]);
        let type_flag = header[156];
        offset += TAR_BLOCK_SIZE;

        let content = data
            .get(offset..offset + size)
            .ok_or_else(|| Error::Archive("truncated tar entry".to_string()))?;

        match type_flag {
            // GNU long name: the next header's name lives in this payload
            b'L' => long_name = Some(c_string(content)),
            // pax extended header: its `path` record names the next entry
            b'x' => {
                if let Some(path) = pax_path(content) {
                    long_name = Some(path);
                }
            }
            // pax global headers and GNU long link names
            b'g' | b'K' => {}
            _ => {
                let name = long_name.take().unwrap_or_else(|| header_name(header));
                let kind = if type_flag == b'5' || name.ends_with('/') {
                    EntryKind::DirectoryMarker
                } else {
                    EntryKind::File
                };
                match ArchiveEntry::new(&name, kind) {
                    Some(entry) => entries.push(entry),
                    None => tracing::warn!(name = %name, "skipping tar entry outside the archive root"),
                }
            }
        }

        // Skip content blocks
        offset += size.div_ceil(TAR_BLOCK_SIZE) * TAR_BLOCK_SIZE;
    }

    Ok(entries)
}

/// Full entry name, joining the ustar prefix field when present.
fn header_name(header: &[u8]) -> String {
    let name = c_string(&header[..100]);
    let is_ustar = &header[USTAR_MAGIC_OFFSET..USTAR_MAGIC_OFFSET + 5] == b"ustar";
    if is_ustar {
        let prefix = c_string(&header[345..500]);
        if !prefix.is_empty() {
            return format!("{}/{}", prefix, name);
        }
    }
    name
}

/// Value of the last `path` record in a pax payload.
///
/// Records are `<len> <key>=<value>\n`, where `len` counts the whole record.
/// Parsing stops at the first malformed record.
fn pax_path(payload: &[u8]) -> Option<String> {
    let mut path = None;
    let mut rest = payload;
    while let Some(space) = rest.iter().position(|&b| b == b' ') {
        let len = std::str::from_utf8(&rest[..space])
            .ok()
            .and_then(|digits| digits.parse::<usize>().ok());
        let Some(len) = len.filter(|&len| len > space && len <= rest.len()) else {
            tracing::warn!("malformed pax record");
            break;
        };

        let record = &rest[space + 1..len];
        let record = record.strip_suffix(b"\n").unwrap_or(record);
        if let Some(value) = record.strip_prefix(b"path=") {
            path = Some(String::from_utf8_lossy(value).into_owned());
        }
        rest = &rest[len..];
    }
    path
}

fn c_string(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).to_string()
}

/// Parse octal value from tar header field
fn parse_octal(buf: &[u8]) -> usize {
    let s: String = buf
        .iter()
        .take_while(|&&b| b != 0 && b != b' ')
        .map(|&b| b as char)
        .collect();
    usize::from_str_radix(s.trim(), 8).unwrap_or(0)
}
