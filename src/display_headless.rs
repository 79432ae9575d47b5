//! Headless display implementation for testing and piped runs.
//!
//! Records every blit and text write into an addressable cell buffer and
//! serves input from a pre-loaded script. When the script runs out it
//! reports a quit request, so a scripted session always terminates.

use crate::display::{Buttons, ConsoleDisplay, DisplayError};
use log::debug;
use std::collections::VecDeque;

/// Text screen dimensions in 8-pixel cells (32x28 on the target
/// hardware; the bottom rows are unused here).
const TEXT_COLS: usize = 32;
const TEXT_ROWS: usize = 28;

/// Map playfield capacity in 16-pixel tiles (the hardware fits 16x9
/// below the status area).
const GRID_COLS: usize = 16;
const GRID_ROWS: usize = 9;

#[derive(Debug)]
pub struct HeadlessDisplay {
    tiles: [[u8; GRID_COLS]; GRID_ROWS],
    text: [[u8; TEXT_COLS]; TEXT_ROWS],
    script: VecDeque<Buttons>,
    last_sprite: Option<(u16, u16, u8)>,
    palette_len: usize,
    tileset_len: usize,
    frames: u64,
}

impl HeadlessDisplay {
    pub fn new() -> HeadlessDisplay {
        HeadlessDisplay {
            tiles: [[0; GRID_COLS]; GRID_ROWS],
            text: [[b' '; TEXT_COLS]; TEXT_ROWS],
            script: VecDeque::new(),
            last_sprite: None,
            palette_len: 0,
            tileset_len: 0,
            frames: 0,
        }
    }

    /// Queue one button state per upcoming poll.
    pub fn push_input(&mut self, states: impl IntoIterator<Item = Buttons>) {
        self.script.extend(states);
    }

    /// Tile last blitted at a grid cell (for assertions).
    pub fn tile_at(&self, x: u8, y: u8) -> u8 {
        self.tiles[y as usize][x as usize]
    }

    /// Last sprite position and tile drawn.
    pub fn last_sprite(&self) -> Option<(u16, u16, u8)> {
        self.last_sprite
    }

    /// Frames elapsed (vblank waits).
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn palette_len(&self) -> usize {
        self.palette_len
    }

    pub fn tileset_len(&self) -> usize {
        self.tileset_len
    }

    /// The text area as one string, rows joined by newlines, trailing
    /// blanks trimmed.
    pub fn text_screen(&self) -> String {
        let mut lines: Vec<String> = self
            .text
            .iter()
            .map(|row| {
                String::from_utf8_lossy(row)
                    .trim_end()
                    .to_string()
            })
            .collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }
}

impl Default for HeadlessDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleDisplay for HeadlessDisplay {
    fn clear_screen(&mut self) -> Result<(), DisplayError> {
        debug!("headless: clear_screen");
        self.tiles = [[0; GRID_COLS]; GRID_ROWS];
        self.text = [[b' '; TEXT_COLS]; TEXT_ROWS];
        self.last_sprite = None;
        Ok(())
    }

    fn load_palette(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        debug!("headless: load_palette({} bytes)", bytes.len());
        self.palette_len = bytes.len();
        Ok(())
    }

    fn load_tiles(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        debug!("headless: load_tiles({} bytes)", bytes.len());
        self.tileset_len = bytes.len();
        Ok(())
    }

    fn blit_tile(&mut self, x: u8, y: u8, tile: u8) -> Result<(), DisplayError> {
        if (x as usize) < GRID_COLS && (y as usize) < GRID_ROWS {
            self.tiles[y as usize][x as usize] = tile;
        }
        Ok(())
    }

    fn draw_text(&mut self, col: u8, row: u8, text: &str) -> Result<(), DisplayError> {
        debug!("headless: text ({}, {}): {}", col, row, text);
        if (row as usize) >= TEXT_ROWS {
            return Ok(());
        }
        let line = &mut self.text[row as usize];
        for (i, byte) in text.bytes().enumerate() {
            let cell = col as usize + i;
            if cell >= TEXT_COLS {
                break;
            }
            line[cell] = byte;
        }
        Ok(())
    }

    fn draw_sprite(&mut self, px: u16, py: u16, tile: u8) -> Result<(), DisplayError> {
        self.last_sprite = Some((px, py, tile));
        Ok(())
    }

    fn wait_vblank(&mut self) {
        self.frames += 1;
    }

    fn poll_input(&mut self) -> Buttons {
        match self.script.pop_front() {
            Some(state) => state,
            None => Buttons::QUIT,
        }
    }
}
