//! Archive builder: the write side of the resource format.
//!
//! Collects named payloads, sorts the entry table by name, and packs
//! payloads into pages starting at the archive page. A payload never
//! straddles a page boundary: the reader hands out window-relative
//! slices, so a resource must sit entirely inside one page window.

use crate::archive::{ENTRY_LEN, HEADER_LEN, MAGIC, NAME_LEN};
use crate::rom::{ARCHIVE_PAGE, PAGE_SIZE};
use indexmap::IndexMap;
use log::debug;

/// Accumulates resources and emits a ROM image.
pub struct ArchiveBuilder {
    resources: IndexMap<String, Vec<u8>>,
    base_image: Option<Vec<u8>>,
}

impl ArchiveBuilder {
    pub fn new() -> ArchiveBuilder {
        ArchiveBuilder {
            resources: IndexMap::new(),
            base_image: None,
        }
    }

    /// Provide the base program image that occupies the pages below the
    /// archive. Without one, those pages are zero-filled.
    pub fn set_base_image(&mut self, image: Vec<u8>) -> Result<(), String> {
        let limit = ARCHIVE_PAGE as usize * PAGE_SIZE;
        if image.len() > limit {
            return Err(format!(
                "base image is {} bytes but only {} fit below the archive page",
                image.len(),
                limit
            ));
        }
        self.base_image = Some(image);
        Ok(())
    }

    /// Add a named resource. Names must fit the 13-visible-character
    /// field, payloads must fit one page, and names must be unique.
    pub fn add(&mut self, name: &str, bytes: Vec<u8>) -> Result<(), String> {
        if name.is_empty() || name.as_bytes().len() >= NAME_LEN {
            return Err(format!(
                "resource name \"{}\" must be 1..={} bytes",
                name,
                NAME_LEN - 1
            ));
        }
        if bytes.len() > PAGE_SIZE {
            return Err(format!(
                "resource \"{}\" is {} bytes; a resource cannot exceed one {} byte page",
                name,
                bytes.len(),
                PAGE_SIZE
            ));
        }
        if self.resources.contains_key(name) {
            return Err(format!("duplicate resource name \"{}\"", name));
        }
        self.resources.insert(name.to_string(), bytes);
        Ok(())
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Lay out the archive and emit the full ROM image.
    pub fn build(&self) -> Result<Vec<u8>, String> {
        let mut names: Vec<&String> = self.resources.keys().collect();
        names.sort();

        let table_len = HEADER_LEN + names.len() * ENTRY_LEN;
        if table_len > PAGE_SIZE {
            return Err(format!(
                "entry table for {} resources does not fit the archive page",
                names.len()
            ));
        }

        // First-fit page packing: payloads fill the archive page after the
        // entry table, then subsequent pages.
        let mut placements = Vec::with_capacity(names.len());
        let mut page = ARCHIVE_PAGE;
        let mut offset = table_len;
        for name in &names {
            let size = self.resources[*name].len();
            if offset + size > PAGE_SIZE {
                page += 1;
                offset = 0;
            }
            placements.push((page, offset as u16, size as u16));
            offset += size;
        }

        let archive_base = ARCHIVE_PAGE as usize * PAGE_SIZE;
        let image_len = (page as usize + 1) * PAGE_SIZE;
        let mut image = vec![0u8; image_len];
        if let Some(base) = &self.base_image {
            image[..base.len()].copy_from_slice(base);
        }

        // Header + sorted entry table at the start of the archive page.
        image[archive_base..archive_base + 4].copy_from_slice(&MAGIC);
        image[archive_base + 4..archive_base + 6]
            .copy_from_slice(&(names.len() as u16).to_le_bytes());
        for (i, (name, &(page, offset, size))) in names.iter().zip(&placements).enumerate() {
            let entry_base = archive_base + HEADER_LEN + i * ENTRY_LEN;
            let record = &mut image[entry_base..entry_base + ENTRY_LEN];
            record[..name.as_bytes().len()].copy_from_slice(name.as_bytes());
            record[NAME_LEN..NAME_LEN + 2].copy_from_slice(&page.to_le_bytes());
            record[NAME_LEN + 2..NAME_LEN + 4].copy_from_slice(&size.to_le_bytes());
            record[NAME_LEN + 4..NAME_LEN + 6].copy_from_slice(&offset.to_le_bytes());
        }

        // Payloads.
        for (name, &(page, offset, _)) in names.iter().zip(&placements) {
            let start = page as usize * PAGE_SIZE + offset as usize;
            let bytes = &self.resources[*name];
            image[start..start + bytes.len()].copy_from_slice(bytes);
        }

        debug!(
            "built archive: {} resources, {} pages, {} bytes",
            names.len(),
            page + 1,
            image.len()
        );
        Ok(image)
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ResourceArchive;
    use crate::rom::PagedRom;

    #[test]
    fn rejects_bad_names_and_sizes() {
        let mut builder = ArchiveBuilder::new();
        assert!(builder.add("", vec![1]).is_err());
        assert!(builder.add("name-that-is-too-long", vec![1]).is_err());
        assert!(builder.add("huge.bin", vec![0; PAGE_SIZE + 1]).is_err());
        builder.add("ok.bin", vec![1]).unwrap();
        assert!(builder.add("ok.bin", vec![2]).is_err());
    }

    #[test]
    fn thirteen_character_names_fit() {
        let mut builder = ArchiveBuilder::new();
        builder.add("exactly13char", vec![1, 2, 3]).unwrap();
        let image = builder.build().unwrap();
        let mut archive = ResourceArchive::open(PagedRom::from_image(image)).unwrap();
        assert_eq!(archive.lookup("exactly13char").unwrap(), &[1, 2, 3][..]);
    }

    #[test]
    fn payloads_never_straddle_pages() {
        let mut builder = ArchiveBuilder::new();
        // Two payloads too large to share a single page.
        builder.add("a.bin", vec![0xaa; PAGE_SIZE - 64]).unwrap();
        builder.add("b.bin", vec![0xbb; PAGE_SIZE - 64]).unwrap();
        let image = builder.build().unwrap();
        let mut archive = ResourceArchive::open(PagedRom::from_image(image)).unwrap();

        let a = archive.find("a.bin").unwrap();
        let b = archive.find("b.bin").unwrap();
        assert_ne!(a.page, b.page);
        assert!(a.offset as usize + a.size as usize <= PAGE_SIZE);
        assert!(b.offset as usize + b.size as usize <= PAGE_SIZE);
        assert_eq!(archive.resource_bytes(a)[0], 0xaa);
        assert_eq!(archive.resource_bytes(b)[0], 0xbb);
    }

    #[test]
    fn base_image_lands_below_the_archive() {
        let mut builder = ArchiveBuilder::new();
        builder.set_base_image(vec![0x55; 100]).unwrap();
        builder.add("r.bin", vec![1]).unwrap();
        let image = builder.build().unwrap();
        assert_eq!(image[0], 0x55);
        assert_eq!(image[99], 0x55);
        assert_eq!(image[100], 0);

        assert!(ArchiveBuilder::new()
            .set_base_image(vec![0; ARCHIVE_PAGE as usize * PAGE_SIZE + 1])
            .is_err());
    }
}
