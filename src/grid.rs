//! The live puzzle grid: two parallel mutable layers plus move and push
//! resolution.
//!
//! The *tile layer* is what occupies each cell; the *floor layer* is what a
//! pushed tile is currently covering, so the cell can be restored when the
//! tile moves on. Both are copied fresh from the map record at level start.

use crate::actor::Actor;
use crate::attrs::AttrTable;
use crate::map::MapRecord;
use log::debug;

/// Tile value written when a push uncovers a cell with no recorded floor.
pub const EMPTY_TILE: u8 = 1;

/// One of the four unit move directions. Moves are never diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Per-level mutable state: the two grid layers, the redraw flag and the
/// win latch.
pub struct PuzzleGrid {
    width: u8,
    height: u8,
    tiles: Vec<u8>,
    floor: Vec<u8>,
    dirty: bool,
    cleared: bool,
}

impl PuzzleGrid {
    /// Copy the map's tile sequence into the tile layer and zero the
    /// floor layer.
    pub fn from_map(map: &MapRecord) -> PuzzleGrid {
        debug_assert!(
            map.width <= u8::MAX as u16 && map.height <= u8::MAX as u16,
            "map dimensions {}x{} exceed a byte",
            map.width,
            map.height
        );
        let cells = map.width as usize * map.height as usize;
        PuzzleGrid {
            width: map.width as u8,
            height: map.height as u8,
            tiles: map.tiles.clone(),
            floor: vec![0; cells],
            dirty: false,
            cleared: false,
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    fn index(&self, x: u8, y: u8) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Tile layer value at (x, y).
    pub fn tile_at(&self, x: u8, y: u8) -> u8 {
        self.tiles[self.index(x, y)]
    }

    /// Floor layer value at (x, y): the tile displaced by a push, or 0.
    pub fn floor_at(&self, x: u8, y: u8) -> u8 {
        self.floor[self.index(x, y)]
    }

    fn set_tile(&mut self, x: u8, y: u8, value: u8) {
        let index = self.index(x, y);
        self.tiles[index] = value;
    }

    fn set_floor(&mut self, x: u8, y: u8, value: u8) {
        let index = self.index(x, y);
        self.floor[index] = value;
    }

    /// Whether any grid cell changed since the last redraw.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Acknowledge a redraw.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Whether the level's goal has been reached.
    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    /// First cell (row-major) whose tile carries PLAYER_START.
    pub fn find_player_start(&self, attrs: &AttrTable) -> Option<(u8, u8)> {
        for y in 0..self.height {
            for x in 0..self.width {
                if attrs.attr_of(self.tile_at(x, y)).is_player_start() {
                    return Some((x, y));
                }
            }
        }
        None
    }

    /// Attempt to move the actor one cell. Returns whether the actor moved.
    ///
    /// Coordinates are unsigned; stepping off the left or top edge wraps to
    /// a large value and fails the `< dimension` check like any other
    /// out-of-bounds target.
    pub fn try_move(&mut self, actor: &mut Actor, attrs: &AttrTable, dir: Direction) -> bool {
        let (dx, dy) = dir.delta();
        let new_x = actor.grid_x().wrapping_add(dx as u8);
        let new_y = actor.grid_y().wrapping_add(dy as u8);
        if new_x >= self.width || new_y >= self.height {
            return false;
        }

        let attr = attrs.attr_of(self.tile_at(new_x, new_y));

        // The win condition latches before push/solid resolution: a goal
        // tile that is also pushable or solid still clears the stage even
        // when the move itself fails.
        if attr.is_player_end() {
            debug!("goal tile reached at ({}, {})", new_x, new_y);
            self.cleared = true;
        }

        if attr.is_pushable() {
            if !self.try_push(new_x, new_y, attrs, dir) {
                return false;
            }
        } else if attr.is_solid() {
            return false;
        }

        actor.set_grid(new_x, new_y);
        true
    }

    /// Push the tile at (x, y) one cell along `dir`. Fails when the
    /// destination is out of bounds or solid; on success the vacated cell
    /// takes its floor value (or [`EMPTY_TILE`]) and the destination's
    /// floor records what the push displaced.
    fn try_push(&mut self, x: u8, y: u8, attrs: &AttrTable, dir: Direction) -> bool {
        let (dx, dy) = dir.delta();
        let new_x = x.wrapping_add(dx as u8);
        let new_y = y.wrapping_add(dy as u8);
        if new_x >= self.width || new_y >= self.height {
            return false;
        }

        let target_tile = self.tile_at(new_x, new_y);
        if attrs.attr_of(target_tile).is_solid() {
            return false;
        }

        let source_tile = self.tile_at(x, y);
        let source_floor = self.floor_at(x, y);
        let uncovered = if source_floor != 0 {
            source_floor
        } else {
            EMPTY_TILE
        };

        self.set_tile(x, y, uncovered);
        self.set_tile(new_x, new_y, source_tile);
        self.set_floor(new_x, new_y, target_tile);
        self.dirty = true;
        debug!(
            "pushed tile {} from ({}, {}) to ({}, {})",
            source_tile, x, y, new_x, new_y
        );
        true
    }
}
