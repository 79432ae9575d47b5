//! The banked resource archive: a name-indexed table of byte ranges spread
//! across ROM pages.
//!
//! Layout, starting at the first byte of [`ARCHIVE_PAGE`]:
//! - 4-byte signature
//! - u16-LE entry count
//! - `count` fixed-size entries: 14-byte null-padded name, u16-LE page,
//!   u16-LE size, u16-LE offset (relative to the entry's page window)
//! - payloads, addressed by (page, offset)
//!
//! Entries are written sorted by name, so lookup is a binary search.

use crate::rom::{PagedRom, ARCHIVE_PAGE};
use crate::util::read_u16_le;
use log::{debug, warn};

/// Archive signature, the first four bytes of the archive page.
pub const MAGIC: [u8; 4] = *b"SPMR";

/// Fixed width of an entry's name field, terminator included. Visible
/// names are at most 13 characters.
pub const NAME_LEN: usize = 14;

/// Bytes of header before the entry table: signature + entry count.
pub const HEADER_LEN: usize = 6;

/// Bytes per entry record: name + page + size + offset.
pub const ENTRY_LEN: usize = NAME_LEN + 6;

#[derive(Debug, Clone)]
struct ResourceEntry {
    name: [u8; NAME_LEN],
    page: u16,
    size: u16,
    offset: u16,
}

/// Result of a successful lookup: where a payload lives. Cheap to copy and
/// never holds a pointer; the bytes come from
/// [`ResourceArchive::resource_bytes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryHandle {
    pub page: u16,
    pub size: u16,
    pub offset: u16,
}

/// An opened archive: the ROM it lives in plus the decoded entry table.
#[derive(Debug)]
pub struct ResourceArchive {
    rom: PagedRom,
    entries: Vec<ResourceEntry>,
}

impl ResourceArchive {
    /// Read the header and entry table out of the archive page.
    ///
    /// Fails on a bad signature or a table that runs past the page; a
    /// malformed archive is a build problem, not something to limp past.
    pub fn open(mut rom: PagedRom) -> Result<ResourceArchive, String> {
        rom.map_page(ARCHIVE_PAGE);
        let window = rom.window();
        if window.len() < HEADER_LEN {
            return Err(format!(
                "ROM image too small for a resource archive ({} bytes)",
                rom.len()
            ));
        }
        if window[..4] != MAGIC {
            return Err(format!(
                "bad archive signature {:02x?} (expected {:02x?})",
                &window[..4],
                MAGIC
            ));
        }

        let count = read_u16_le(window, 4) as usize;
        let table_end = HEADER_LEN + count * ENTRY_LEN;
        if window.len() < table_end {
            return Err(format!(
                "archive entry table truncated: {} entries need {} bytes, page has {}",
                count,
                table_end,
                window.len()
            ));
        }

        let mut entries = Vec::with_capacity(count);
        for i in 0..count {
            let base = HEADER_LEN + i * ENTRY_LEN;
            let mut name = [0u8; NAME_LEN];
            name.copy_from_slice(&window[base..base + NAME_LEN]);
            entries.push(ResourceEntry {
                name,
                page: read_u16_le(window, base + NAME_LEN),
                size: read_u16_le(window, base + NAME_LEN + 2),
                offset: read_u16_le(window, base + NAME_LEN + 4),
            });
        }
        // The build tool writes the table sorted; lookup depends on it.
        debug_assert!(
            entries.windows(2).all(|pair| pair[0].name <= pair[1].name),
            "archive entry table is not sorted by name"
        );

        debug!("archive: opened with {} entries", entries.len());
        Ok(ResourceArchive { rom, entries })
    }

    /// Number of entries in the archive.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Look up an entry by name. Binary search over the name-sorted table;
    /// names too long for the fixed-width field can never match and miss
    /// without being compared. Callers tolerate `None` (a level past the
    /// last one, an optional resource) without faulting.
    pub fn find(&self, name: &str) -> Option<EntryHandle> {
        let padded = pad_name(name)?;
        let index = self
            .entries
            .binary_search_by(|entry| entry.name.cmp(&padded))
            .ok()?;
        let entry = &self.entries[index];
        Some(EntryHandle {
            page: entry.page,
            size: entry.size,
            offset: entry.offset,
        })
    }

    /// Map the entry's page and return its payload bytes.
    ///
    /// The returned slice borrows the archive: fetching a second resource
    /// first requires this borrow to end, because the remap would
    /// invalidate the window it points into.
    pub fn resource_bytes(&mut self, handle: EntryHandle) -> &[u8] {
        self.rom.map_page(handle.page);
        let window = self.rom.window();
        let start = handle.offset as usize;
        let end = start + handle.size as usize;
        if end > window.len() {
            debug_assert!(
                false,
                "resource range {}..{} outside page {} window",
                start, end, handle.page
            );
            warn!(
                "resource range {}..{} outside page {} window, returning empty",
                start, end, handle.page
            );
            return &[];
        }
        &window[start..end]
    }

    /// Convenience: find + resource_bytes in one call.
    pub fn lookup(&mut self, name: &str) -> Option<&[u8]> {
        let handle = self.find(name)?;
        Some(self.resource_bytes(handle))
    }
}

/// Expand a name to the fixed-width field used for comparison. Names that
/// do not fit (14+ bytes) cannot equal any stored name.
fn pad_name(name: &str) -> Option<[u8; NAME_LEN]> {
    let bytes = name.as_bytes();
    if bytes.len() >= NAME_LEN {
        return None;
    }
    let mut padded = [0u8; NAME_LEN];
    padded[..bytes.len()].copy_from_slice(bytes);
    Some(padded)
}
