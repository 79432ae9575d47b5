//! Per-tile-type behavior flags.
//!
//! A separate resource (`main.atr`) maps each tile-type index to a u16
//! bitmask. Slots are 1-based; tile index 0 (the background) aliases slot
//! 1, so callers never special-case 0.

use log::warn;
use std::ops::BitOr;

/// Behavioral bitmask for one tile type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileAttr(pub u16);

impl TileAttr {
    pub const NONE: TileAttr = TileAttr(0);
    /// Blocks entry.
    pub const SOLID: TileAttr = TileAttr(0x0001);
    /// Valid initial actor cell.
    pub const PLAYER_START: TileAttr = TileAttr(0x0002);
    /// Goal cell; reaching it ends the level.
    pub const PLAYER_END: TileAttr = TileAttr(0x0004);
    /// Movable box.
    pub const PUSHABLE: TileAttr = TileAttr(0x0008);

    pub fn contains(self, flags: TileAttr) -> bool {
        self.0 & flags.0 != 0
    }

    pub fn is_solid(self) -> bool {
        self.contains(TileAttr::SOLID)
    }

    pub fn is_player_start(self) -> bool {
        self.contains(TileAttr::PLAYER_START)
    }

    pub fn is_player_end(self) -> bool {
        self.contains(TileAttr::PLAYER_END)
    }

    pub fn is_pushable(self) -> bool {
        self.contains(TileAttr::PUSHABLE)
    }
}

impl BitOr for TileAttr {
    type Output = TileAttr;

    fn bitor(self, rhs: TileAttr) -> TileAttr {
        TileAttr(self.0 | rhs.0)
    }
}

/// The decoded attribute table, loaded once per level.
#[derive(Debug, Clone)]
pub struct AttrTable {
    attrs: Vec<TileAttr>,
}

impl AttrTable {
    /// Decode consecutive u16-LE bitmasks. A trailing odd byte is ignored.
    pub fn parse(bytes: &[u8]) -> AttrTable {
        AttrTable {
            attrs: bytes
                .chunks_exact(2)
                .map(|pair| TileAttr(u16::from_le_bytes([pair[0], pair[1]])))
                .collect(),
        }
    }

    /// A table with no slots. Release-build fallback for a missing
    /// attribute resource; every lookup answers `NONE`.
    pub fn empty() -> AttrTable {
        AttrTable { attrs: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Attribute bitmask for a raw tile-layer value. Index 0 is remapped
    /// to 1 (background aliases the first slot).
    ///
    /// A tile with no slot means the archive and tileset disagree; that is
    /// a build defect, so debug builds stop here and release builds answer
    /// `NONE`.
    pub fn attr_of(&self, tile: u8) -> TileAttr {
        let slot = if tile == 0 { 1 } else { tile as usize };
        match self.attrs.get(slot - 1) {
            Some(&attr) => attr,
            None => {
                debug_assert!(
                    self.attrs.is_empty(),
                    "tile {} has no attribute slot (table has {})",
                    tile,
                    self.attrs.len()
                );
                warn!("tile {} has no attribute slot, treating as NONE", tile);
                TileAttr::NONE
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(masks: &[u16]) -> Vec<u8> {
        masks.iter().flat_map(|m| m.to_le_bytes()).collect()
    }

    #[test]
    fn tile_zero_aliases_slot_one() {
        let table = AttrTable::parse(&encode(&[0x0001, 0x0002, 0x000c]));
        assert_eq!(table.attr_of(0), table.attr_of(1));
        assert_eq!(table.attr_of(1), TileAttr::SOLID);
        assert_eq!(table.attr_of(2), TileAttr::PLAYER_START);
    }

    #[test]
    fn flags_are_independent_bits() {
        let table = AttrTable::parse(&encode(&[0x000c]));
        let attr = table.attr_of(1);
        assert!(attr.is_player_end());
        assert!(attr.is_pushable());
        assert!(!attr.is_solid());
        assert_eq!(attr, TileAttr::PLAYER_END | TileAttr::PUSHABLE);
    }

    #[test]
    fn trailing_odd_byte_is_ignored() {
        let table = AttrTable::parse(&[0x01, 0x00, 0xff]);
        assert_eq!(table.len(), 1);
        assert!(table.attr_of(1).is_solid());
    }

    #[test]
    fn empty_table_answers_none() {
        let table = AttrTable::empty();
        assert_eq!(table.attr_of(0), TileAttr::NONE);
        assert_eq!(table.attr_of(5), TileAttr::NONE);
    }
}
