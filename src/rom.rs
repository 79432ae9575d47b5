//! Paged access to a ROM image.
//!
//! The console this format comes from maps exactly one 16 KiB page of the
//! cartridge into a fixed window of the address space; reading a resource
//! means switching the mapped page first. Rather than keeping the
//! "currently mapped page" as ambient global state, this accessor makes
//! the page switch a `&mut self` operation and every byte view a borrow of
//! the accessor, so a view can never outlive a remap.

use log::debug;

/// Size of one ROM page. The console maps one page at a time into a
/// fixed window.
pub const PAGE_SIZE: usize = 0x4000;

/// Page the resource archive starts in. Pages below this hold the base
/// program image and are never looked up by name.
pub const ARCHIVE_PAGE: u16 = 2;

/// A ROM image with single-page banking semantics.
#[derive(Debug)]
pub struct PagedRom {
    data: Vec<u8>,
    mapped_page: u16,
}

impl PagedRom {
    /// Take ownership of a raw ROM image. Page 0 starts mapped.
    pub fn from_image(data: Vec<u8>) -> PagedRom {
        PagedRom {
            data,
            mapped_page: 0,
        }
    }

    /// Switch the mapped page. This is the banking side effect: any window
    /// slice taken before this call refers to the old page and the borrow
    /// checker prevents it from surviving the switch.
    pub fn map_page(&mut self, page: u16) {
        if page != self.mapped_page {
            debug!("rom: map page {} -> {}", self.mapped_page, page);
            self.mapped_page = page;
        }
    }

    /// Currently mapped page.
    pub fn mapped_page(&self) -> u16 {
        self.mapped_page
    }

    /// The window onto the mapped page. Shorter than [`PAGE_SIZE`] when the
    /// image ends inside the page; empty when the page is past the image.
    pub fn window(&self) -> &[u8] {
        let start = (self.mapped_page as usize).saturating_mul(PAGE_SIZE);
        let start = start.min(self.data.len());
        let end = (start + PAGE_SIZE).min(self.data.len());
        &self.data[start..end]
    }

    /// Total image length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_with_marker(page: u16, offset: usize, marker: u8) -> Vec<u8> {
        let mut data = vec![0u8; (page as usize + 1) * PAGE_SIZE];
        data[page as usize * PAGE_SIZE + offset] = marker;
        data
    }

    #[test]
    fn window_follows_mapped_page() {
        let mut rom = PagedRom::from_image(image_with_marker(2, 7, 0xAB));
        assert_eq!(rom.mapped_page(), 0);
        assert_eq!(rom.window()[7], 0);

        rom.map_page(2);
        assert_eq!(rom.window()[7], 0xAB);
        assert_eq!(rom.window().len(), PAGE_SIZE);
    }

    #[test]
    fn window_clamps_to_image_end() {
        let mut rom = PagedRom::from_image(vec![0u8; PAGE_SIZE + 100]);
        rom.map_page(1);
        assert_eq!(rom.window().len(), 100);

        rom.map_page(9);
        assert!(rom.window().is_empty());
    }
}
