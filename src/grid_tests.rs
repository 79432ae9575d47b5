//! Push-mechanics test suite for the puzzle grid.
//!
//! The attribute table used throughout mirrors the editor's defaults:
//! tile 1 plain background, 2 player start, 3 goal, 4 wall, 5 box. A few
//! tests add combined-flag tiles to pin down resolution ordering.

use crate::actor::Actor;
use crate::attrs::{AttrTable, TileAttr};
use crate::grid::{Direction, PuzzleGrid, EMPTY_TILE};
use crate::map::MapRecord;
use test_log::test;

const PLAIN: u8 = 1;
const START: u8 = 2;
const GOAL: u8 = 3;
const WALL: u8 = 4;
const BOX: u8 = 5;
/// Goal that is also solid.
const GOAL_WALL: u8 = 6;
/// Goal that is also pushable.
const GOAL_BOX: u8 = 7;

fn attrs() -> AttrTable {
    let masks: [u16; 7] = [
        TileAttr::NONE.0,
        TileAttr::PLAYER_START.0,
        TileAttr::PLAYER_END.0,
        TileAttr::SOLID.0,
        TileAttr::PUSHABLE.0,
        (TileAttr::PLAYER_END | TileAttr::SOLID).0,
        (TileAttr::PLAYER_END | TileAttr::PUSHABLE).0,
    ];
    let bytes: Vec<u8> = masks.iter().flat_map(|m| m.to_le_bytes()).collect();
    AttrTable::parse(&bytes)
}

fn level(width: u16, tiles: &[u8]) -> PuzzleGrid {
    let height = tiles.len() as u16 / width;
    assert_eq!(width as usize * height as usize, tiles.len());
    PuzzleGrid::from_map(&MapRecord {
        id: 1,
        width,
        height,
        name: "test".to_string(),
        tiles: tiles.to_vec(),
    })
}

fn actor_at(x: u8, y: u8) -> Actor {
    let mut actor = Actor::new(START);
    actor.set_grid(x, y);
    actor
}

fn layers(grid: &PuzzleGrid) -> (Vec<u8>, Vec<u8>) {
    let mut tiles = Vec::new();
    let mut floor = Vec::new();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            tiles.push(grid.tile_at(x, y));
            floor.push(grid.floor_at(x, y));
        }
    }
    (tiles, floor)
}

#[test]
fn loading_copies_tiles_and_zeroes_floor() {
    let grid = level(3, &[START, PLAIN, GOAL]);
    assert_eq!(layers(&grid), (vec![START, PLAIN, GOAL], vec![0, 0, 0]));
    assert!(!grid.is_dirty());
    assert!(!grid.is_cleared());
}

#[test]
fn player_start_scan_returns_first_match() {
    let grid = level(2, &[PLAIN, START, START, PLAIN]);
    assert_eq!(grid.find_player_start(&attrs()), Some((1, 0)));

    let no_start = level(2, &[PLAIN, PLAIN, PLAIN, PLAIN]);
    assert_eq!(no_start.find_player_start(&attrs()), None);
}

#[test]
fn moving_into_open_cell_moves_the_actor() {
    let mut grid = level(3, &[START, PLAIN, GOAL]);
    let mut actor = actor_at(0, 0);
    assert!(grid.try_move(&mut actor, &attrs(), Direction::Right));
    assert_eq!((actor.grid_x(), actor.grid_y()), (1, 0));
    // A plain move touches no grid cells.
    assert!(!grid.is_dirty());
}

#[test]
fn moving_into_solid_is_an_idempotent_noop() {
    let mut grid = level(3, &[START, WALL, PLAIN]);
    let before = layers(&grid);
    let mut actor = actor_at(0, 0);
    assert!(!grid.try_move(&mut actor, &attrs(), Direction::Right));
    assert_eq!((actor.grid_x(), actor.grid_y()), (0, 0));
    assert_eq!(layers(&grid), before);
    assert!(!grid.is_dirty());
}

#[test]
fn moving_off_the_map_is_a_noop() {
    let mut grid = level(2, &[START, PLAIN]);
    let mut actor = actor_at(0, 0);
    // Left and up wrap the unsigned coordinate to a huge value.
    assert!(!grid.try_move(&mut actor, &attrs(), Direction::Left));
    assert!(!grid.try_move(&mut actor, &attrs(), Direction::Up));
    assert!(!grid.try_move(&mut actor, &attrs(), Direction::Down));
    assert_eq!((actor.grid_x(), actor.grid_y()), (0, 0));

    actor.set_grid(1, 0);
    assert!(!grid.try_move(&mut actor, &attrs(), Direction::Right));
    assert_eq!((actor.grid_x(), actor.grid_y()), (1, 0));
}

#[test]
fn push_into_open_cell_moves_box_and_actor() {
    let mut grid = level(3, &[START, BOX, PLAIN]);
    let mut actor = actor_at(0, 0);
    assert!(grid.try_move(&mut actor, &attrs(), Direction::Right));

    // Box lands two ahead, the vacated cell becomes empty, and the cell
    // the actor ends up on has no floor residue.
    assert_eq!(layers(&grid).0, vec![START, EMPTY_TILE, BOX]);
    assert_eq!(grid.floor_at(1, 0), 0);
    assert_eq!(grid.floor_at(2, 0), PLAIN);
    assert_eq!((actor.grid_x(), actor.grid_y()), (1, 0));
    assert!(grid.is_dirty());
}

#[test]
fn push_into_wall_fails_and_changes_nothing() {
    let mut grid = level(3, &[START, BOX, WALL]);
    let before = layers(&grid);
    let mut actor = actor_at(0, 0);
    assert!(!grid.try_move(&mut actor, &attrs(), Direction::Right));
    assert_eq!((actor.grid_x(), actor.grid_y()), (0, 0));
    assert_eq!(layers(&grid), before);
    assert!(!grid.is_dirty());
}

#[test]
fn push_off_the_map_edge_fails() {
    let mut grid = level(2, &[START, BOX]);
    let before = layers(&grid);
    let mut actor = actor_at(0, 0);
    assert!(!grid.try_move(&mut actor, &attrs(), Direction::Right));
    assert_eq!(layers(&grid), before);
}

#[test]
fn push_over_goal_buries_and_resurfaces_it() {
    let mut grid = level(4, &[START, BOX, GOAL, PLAIN]);
    let mut actor = actor_at(0, 0);

    // Push the box onto the goal: the goal goes under the box.
    assert!(grid.try_move(&mut actor, &attrs(), Direction::Right));
    assert_eq!(layers(&grid).0, vec![START, EMPTY_TILE, BOX, PLAIN]);
    assert_eq!(grid.floor_at(2, 0), GOAL);
    assert!(!grid.is_cleared());

    // Push it off again: the goal resurfaces in the tile layer.
    assert!(grid.try_move(&mut actor, &attrs(), Direction::Right));
    assert_eq!(layers(&grid).0, vec![START, EMPTY_TILE, GOAL, BOX]);
    assert_eq!(grid.floor_at(3, 0), PLAIN);
    // Walking onto the covered goal's cell never latched the win; the
    // attribute checked is the box's, not what is underneath.
    assert!(!grid.is_cleared());
}

#[test]
fn reaching_the_goal_sets_cleared() {
    let mut grid = level(3, &[START, PLAIN, GOAL]);
    let mut actor = actor_at(0, 0);
    assert!(grid.try_move(&mut actor, &attrs(), Direction::Right));
    assert!(!grid.is_cleared());
    assert!(grid.try_move(&mut actor, &attrs(), Direction::Right));
    assert!(grid.is_cleared());
    assert_eq!((actor.grid_x(), actor.grid_y()), (2, 0));
}

#[test]
fn goal_latches_even_when_the_move_is_blocked() {
    // The goal tile is also solid: the move fails but the stage clears.
    let mut grid = level(2, &[START, GOAL_WALL]);
    let mut actor = actor_at(0, 0);
    assert!(!grid.try_move(&mut actor, &attrs(), Direction::Right));
    assert_eq!((actor.grid_x(), actor.grid_y()), (0, 0));
    assert!(grid.is_cleared());
}

#[test]
fn goal_latches_even_when_the_push_fails() {
    // The goal tile is also a box jammed against a wall.
    let mut grid = level(3, &[START, GOAL_BOX, WALL]);
    let before = layers(&grid);
    let mut actor = actor_at(0, 0);
    assert!(!grid.try_move(&mut actor, &attrs(), Direction::Right));
    assert_eq!(layers(&grid), before);
    assert!(grid.is_cleared());
}

#[test]
fn pushed_box_restores_recorded_floor_not_empty() {
    // A box pushed across a cell and then off it again must resurface
    // what it buried, not a bare empty tile.
    let mut grid = level(4, &[START, BOX, GOAL, PLAIN]);
    let mut actor = actor_at(0, 0);
    assert!(grid.try_move(&mut actor, &attrs(), Direction::Right));
    assert!(grid.try_move(&mut actor, &attrs(), Direction::Right));

    // The actor now stands where the goal resurfaced, but the win never
    // latched: both moves resolved against the box's attribute.
    assert_eq!(layers(&grid).0, vec![START, EMPTY_TILE, GOAL, BOX]);
    assert!(!grid.is_cleared());

    // Stepping off and back onto the resurfaced goal clears the stage.
    assert!(grid.try_move(&mut actor, &attrs(), Direction::Left));
    assert!(grid.try_move(&mut actor, &attrs(), Direction::Right));
    assert!(grid.is_cleared());
    assert_eq!((actor.grid_x(), actor.grid_y()), (2, 0));
}

#[test]
fn dirty_tracks_grid_mutations_only() {
    let mut grid = level(4, &[START, BOX, PLAIN, WALL]);
    let mut actor = actor_at(0, 0);

    assert!(!grid.is_dirty());
    assert!(grid.try_move(&mut actor, &attrs(), Direction::Right));
    assert!(grid.is_dirty());
    grid.clear_dirty();

    // Blocked push: still clean.
    assert!(!grid.try_move(&mut actor, &attrs(), Direction::Right));
    assert!(!grid.is_dirty());

    // Plain walk back: still clean.
    assert!(grid.try_move(&mut actor, &attrs(), Direction::Left));
    assert!(!grid.is_dirty());
}

#[test]
fn vertical_pushes_use_the_same_rules() {
    #[rustfmt::skip]
    let mut grid = level(3, &[
        PLAIN, START, PLAIN,
        PLAIN, BOX,   PLAIN,
        PLAIN, PLAIN, PLAIN,
    ]);
    let mut actor = actor_at(1, 0);
    assert!(grid.try_move(&mut actor, &attrs(), Direction::Down));
    assert_eq!((actor.grid_x(), actor.grid_y()), (1, 1));
    assert_eq!(grid.tile_at(1, 2), BOX);
    assert_eq!(grid.tile_at(1, 1), EMPTY_TILE);

    // Now the box is on the bottom edge; pushing further fails.
    assert!(!grid.try_move(&mut actor, &attrs(), Direction::Down));
    assert_eq!((actor.grid_x(), actor.grid_y()), (1, 1));
}
