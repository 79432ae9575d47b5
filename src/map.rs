//! Map records: the stored form of one puzzle level.

use crate::archive::ResourceArchive;
use crate::util::{fixed_str, read_u16_le};
use log::{debug, warn};

/// Fixed width of the display-name field.
pub const MAP_NAME_LEN: usize = 32;

const MAP_HEADER_LEN: usize = 6 + MAP_NAME_LEN;

/// A decoded map: header plus the row-major tile-index bytes.
/// Immutable once decoded; the live grids copy from it at level start.
#[derive(Debug, Clone)]
pub struct MapRecord {
    pub id: u16,
    pub width: u16,
    pub height: u16,
    pub name: String,
    pub tiles: Vec<u8>,
}

/// Canonical resource name for a map id: `level007.map` for id 7.
pub fn map_file_name(id: u16) -> String {
    format!("level{:03}.map", id)
}

impl MapRecord {
    /// Decode a map record from a resource byte range.
    ///
    /// A record too short for its own dimensions decodes as `None`;
    /// callers treat that exactly like an archive miss.
    pub fn parse(bytes: &[u8]) -> Option<MapRecord> {
        if bytes.len() < MAP_HEADER_LEN {
            return None;
        }
        let id = read_u16_le(bytes, 0);
        let width = read_u16_le(bytes, 2);
        let height = read_u16_le(bytes, 4);
        let cells = width as usize * height as usize;
        if cells == 0 || bytes.len() < MAP_HEADER_LEN + cells {
            warn!(
                "map record claims {}x{} ({} cells) but holds {} payload bytes",
                width,
                height,
                cells,
                bytes.len() - MAP_HEADER_LEN
            );
            return None;
        }
        Some(MapRecord {
            id,
            width,
            height,
            name: fixed_str(&bytes[6..MAP_HEADER_LEN]),
            tiles: bytes[MAP_HEADER_LEN..MAP_HEADER_LEN + cells].to_vec(),
        })
    }

    /// Resolve `level{id:03}.map` through the archive and decode it.
    pub fn load(archive: &mut ResourceArchive, id: u16) -> Option<MapRecord> {
        let name = map_file_name(id);
        let bytes = archive.lookup(&name)?;
        let map = MapRecord::parse(bytes);
        match &map {
            Some(map) => debug!("loaded {}: \"{}\" {}x{}", name, map.name, map.width, map.height),
            None => warn!("{} is present but does not decode", name),
        }
        map
    }

    /// Tile index at (x, y) of the stored (pristine) layout.
    pub fn tile_at(&self, x: u16, y: u16) -> u8 {
        self.tiles[y as usize * self.width as usize + x as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(id: u16, width: u16, height: u16, name: &str, tiles: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&id.to_le_bytes());
        bytes.extend_from_slice(&width.to_le_bytes());
        bytes.extend_from_slice(&height.to_le_bytes());
        let mut padded = [0u8; MAP_NAME_LEN];
        padded[..name.len()].copy_from_slice(name.as_bytes());
        bytes.extend_from_slice(&padded);
        bytes.extend_from_slice(tiles);
        bytes
    }

    #[test]
    fn names_are_zero_padded_to_three_digits() {
        assert_eq!(map_file_name(7), "level007.map");
        assert_eq!(map_file_name(42), "level042.map");
        assert_eq!(map_file_name(123), "level123.map");
    }

    #[test]
    fn parse_round_trip() {
        let tiles = [1, 2, 3, 4, 5, 6];
        let bytes = encode(9, 3, 2, "First Steps", &tiles);
        let map = MapRecord::parse(&bytes).unwrap();
        assert_eq!(map.id, 9);
        assert_eq!(map.width, 3);
        assert_eq!(map.height, 2);
        assert_eq!(map.name, "First Steps");
        assert_eq!(map.tiles, tiles);
        assert_eq!(map.tile_at(2, 1), 6);
    }

    #[test]
    fn short_payload_is_a_miss() {
        let bytes = encode(1, 4, 4, "Truncated", &[1, 2, 3]);
        assert!(MapRecord::parse(&bytes).is_none());
        assert!(MapRecord::parse(&bytes[..10]).is_none());
    }

    #[test]
    fn zero_area_is_a_miss() {
        assert!(MapRecord::parse(&encode(1, 0, 5, "Empty", &[])).is_none());
    }
}
