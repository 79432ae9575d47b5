//! The outer game flow: title screen, per-level gameplay, game over.
//!
//! Everything here is thin glue between the puzzle core and the display
//! collaborator: one frame-update per vblank, no internal suspension
//! points. The runner owns the opened archive and a display backend;
//! tests run it against the headless display with scripted input.

use crate::actor::Actor;
use crate::archive::ResourceArchive;
use crate::attrs::AttrTable;
use crate::display::{Buttons, ConsoleDisplay, DisplayError};
use crate::grid::PuzzleGrid;
use crate::map::MapRecord;
use crate::util::inf_strings;
use log::{info, warn};

/// Frames a held direction waits before repeating. A change in the pad
/// state acts immediately.
const INPUT_REPEAT_FRAMES: u8 = 10;

/// Sprite tile used for the player actor.
const PLAYER_SPRITE_TILE: u8 = 2;

/// The outer state switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameState {
    Title,
    Gameplay,
    GameOver,
    Exit,
}

enum LevelOutcome {
    /// Cleared or skipped; move on to the next map id.
    Advance,
    /// The frontend asked to stop.
    Quit,
}

pub struct Runner<D: ConsoleDisplay> {
    archive: ResourceArchive,
    pub display: D,
    map_number: u16,
}

impl<D: ConsoleDisplay> Runner<D> {
    pub fn new(archive: ResourceArchive, display: D) -> Runner<D> {
        Runner {
            archive,
            display,
            map_number: 1,
        }
    }

    /// Map id the session is currently on.
    pub fn current_map(&self) -> u16 {
        self.map_number
    }

    /// Drive the session until the frontend quits.
    pub fn run(&mut self) -> Result<(), String> {
        let mut state = GameState::Title;
        loop {
            state = match state {
                GameState::Title => self.handle_title()?,
                GameState::Gameplay => self.run_gameplay()?,
                GameState::GameOver => self.handle_gameover(),
                GameState::Exit => {
                    info!("session over");
                    return Ok(());
                }
            };
        }
    }

    /// Title screen: project info out of the archive, wait for a button.
    fn handle_title(&mut self) -> Result<GameState, String> {
        self.display.clear_screen().map_err(String::from)?;

        match self.archive.lookup("project.inf").and_then(inf_strings) {
            Some((app, version, project)) => {
                self.display
                    .draw_text(2, 1, &format!("{} {}", app, version))
                    .map_err(String::from)?;
                self.display.draw_text(2, 3, &project).map_err(String::from)?;
            }
            None => warn!("project.inf missing or malformed"),
        }
        self.display
            .draw_text(2, 21, "Press any button to start")
            .map_err(String::from)?;

        if !self.wait_button_press() || !self.wait_button_release() {
            return Ok(GameState::Exit);
        }
        Ok(GameState::Gameplay)
    }

    fn handle_gameover(&mut self) -> GameState {
        info!("game over, back to title");
        GameState::Title
    }

    /// Level after level until the frontend quits.
    fn run_gameplay(&mut self) -> Result<GameState, String> {
        loop {
            match self.play_level()? {
                LevelOutcome::Advance => {
                    self.map_number += 1;
                    if !self.wait_button_release() {
                        return Ok(GameState::GameOver);
                    }
                }
                LevelOutcome::Quit => return Ok(GameState::GameOver),
            }
        }
    }

    /// Load resources, run one level's frame loop.
    fn play_level(&mut self) -> Result<LevelOutcome, String> {
        self.display.clear_screen().map_err(String::from)?;

        if let Some(palette) = self.archive.lookup("main.pal") {
            self.display.load_palette(palette).map_err(String::from)?;
        } else {
            warn!("main.pal missing, skipping palette upload");
        }
        if let Some(tileset) = self.archive.lookup("main.til") {
            self.display.load_tiles(tileset).map_err(String::from)?;
        } else {
            warn!("main.til missing, skipping tileset upload");
        }

        let attrs = match self.archive.lookup("main.atr") {
            Some(bytes) => AttrTable::parse(bytes),
            None => {
                debug_assert!(false, "main.atr missing from archive");
                warn!("main.atr missing; every tile will behave as background");
                AttrTable::empty()
            }
        };

        // A missing map wraps the sequence back to the first level.
        let map = match MapRecord::load(&mut self.archive, self.map_number) {
            Some(map) => map,
            None => {
                info!("map {} not found, wrapping to level 1", self.map_number);
                self.map_number = 1;
                MapRecord::load(&mut self.archive, 1)
                    .ok_or_else(|| "archive has no level001.map".to_string())?
            }
        };
        info!("starting level {}: \"{}\"", map.id, map.name);

        let mut grid = PuzzleGrid::from_map(&map);
        self.draw_map(&grid).map_err(String::from)?;
        self.display
            .draw_text(2, 1, "Press button to skip map")
            .map_err(String::from)?;
        self.display.draw_text(2, 2, &map.name).map_err(String::from)?;
        self.display
            .draw_text(22, 3, "next ===>")
            .map_err(String::from)?;

        let mut actor = Actor::new(PLAYER_SPRITE_TILE);
        match grid.find_player_start(&attrs) {
            Some((x, y)) => actor.set_grid(x, y),
            None => {
                warn!("map {} has no player start cell", map.id);
                actor.set_grid(0, 0);
            }
        }

        let mut joy = self.display.poll_input();
        let mut joy_prev = Buttons::NONE;
        let mut joy_delay: u8 = 0;

        loop {
            if joy.contains(Buttons::QUIT) {
                return Ok(LevelOutcome::Quit);
            }

            if joy_delay > 0 {
                joy_delay -= 1;
            }
            if joy_delay == 0 || joy != joy_prev {
                if let Some(dir) = joy.direction() {
                    grid.try_move(&mut actor, &attrs, dir);
                }
                joy_delay = INPUT_REPEAT_FRAMES;
            }

            self.display
                .draw_sprite(actor.x, actor.y, actor.tile)
                .map_err(String::from)?;
            self.display.wait_vblank();

            if grid.is_dirty() {
                self.draw_map(&grid).map_err(String::from)?;
                grid.clear_dirty();
            }

            joy_prev = joy;
            joy = self.display.poll_input();

            if grid.is_cleared() {
                info!("level {} cleared", map.id);
                return Ok(LevelOutcome::Advance);
            }
            if joy.any_action() {
                info!("level {} skipped", map.id);
                return Ok(LevelOutcome::Advance);
            }
        }
    }

    fn draw_map(&mut self, grid: &PuzzleGrid) -> Result<(), DisplayError> {
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                self.display.blit_tile(x, y, grid.tile_at(x, y))?;
            }
        }
        Ok(())
    }

    /// Wait for any action button. False means the frontend quit.
    fn wait_button_press(&mut self) -> bool {
        loop {
            self.display.wait_vblank();
            let joy = self.display.poll_input();
            if joy.contains(Buttons::QUIT) {
                return false;
            }
            if joy.any_action() {
                return true;
            }
        }
    }

    /// Wait for the action buttons to come back up. False means the
    /// frontend quit.
    fn wait_button_release(&mut self) -> bool {
        loop {
            self.display.wait_vblank();
            let joy = self.display.poll_input();
            if joy.contains(Buttons::QUIT) {
                return false;
            }
            if !joy.any_action() {
                return true;
            }
        }
    }
}
