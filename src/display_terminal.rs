//! Terminal display frontend built on crossterm.
//!
//! Stands in for the real video hardware: map tiles render as glyph
//! cells, the sprite as an overlaid glyph, and the keyboard as the pad.
//! Enables raw mode and the alternate screen for the session and restores
//! the terminal on drop.

use crate::actor::{PLAYFIELD_TOP, TILE_PIXELS};
use crate::display::{Buttons, ConsoleDisplay, DisplayError};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::debug;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Target frame duration (the console's 60 Hz vertical blank).
const FRAME: Duration = Duration::from_micros(16_667);

/// Text rows above the playfield (8-pixel cells).
const TEXT_ROWS_ABOVE: u16 = PLAYFIELD_TOP / 8;

/// Stand-in glyphs for tile indexes; the real tileset lives in the ROM
/// and is meaningless in a character cell. Index 0 and 1 are background.
const GLYPHS: &[u8] = b"  .*#$%&+=o^~";

fn glyph_for(tile: u8) -> char {
    GLYPHS[tile as usize % GLYPHS.len()] as char
}

pub struct TerminalDisplay {
    in_raw_mode: bool,
    frame_started: Instant,
}

impl TerminalDisplay {
    pub fn new() -> Result<TerminalDisplay, DisplayError> {
        terminal::enable_raw_mode()
            .map_err(|e| DisplayError::new(format!("failed to enable raw mode: {}", e)))?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)
            .map_err(|e| DisplayError::new(format!("failed to enter alternate screen: {}", e)))?;
        debug!("terminal display up");
        Ok(TerminalDisplay {
            in_raw_mode: true,
            frame_started: Instant::now(),
        })
    }

    /// Restore the terminal. Safe to call more than once.
    fn cleanup(&mut self) {
        if self.in_raw_mode {
            let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
            self.in_raw_mode = false;
        }
    }

    /// Terminal cell for a map grid cell. Tiles are drawn two columns
    /// wide so the playfield is roughly square in a character grid.
    fn map_cell(x: u8, y: u8) -> (u16, u16) {
        (x as u16 * 2, TEXT_ROWS_ABOVE + y as u16)
    }

    fn button_for(key: KeyEvent) -> Buttons {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Buttons::QUIT;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('w') => Buttons::UP,
            KeyCode::Down | KeyCode::Char('s') => Buttons::DOWN,
            KeyCode::Left | KeyCode::Char('a') => Buttons::LEFT,
            KeyCode::Right | KeyCode::Char('d') => Buttons::RIGHT,
            KeyCode::Char('z') | KeyCode::Enter => Buttons::BUTTON_1,
            KeyCode::Char('x') | KeyCode::Char(' ') => Buttons::BUTTON_2,
            KeyCode::Esc | KeyCode::Char('q') => Buttons::QUIT,
            _ => Buttons::NONE,
        }
    }
}

impl ConsoleDisplay for TerminalDisplay {
    fn clear_screen(&mut self) -> Result<(), DisplayError> {
        execute!(io::stdout(), Clear(ClearType::All))?;
        Ok(())
    }

    fn load_palette(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        // No palette hardware in a terminal; acknowledged and dropped.
        debug!("terminal: palette upload ignored ({} bytes)", bytes.len());
        Ok(())
    }

    fn load_tiles(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        debug!("terminal: tileset upload ignored ({} bytes)", bytes.len());
        Ok(())
    }

    fn blit_tile(&mut self, x: u8, y: u8, tile: u8) -> Result<(), DisplayError> {
        let (col, row) = Self::map_cell(x, y);
        let glyph = glyph_for(tile);
        execute!(
            io::stdout(),
            MoveTo(col, row),
            Print(glyph),
            Print(glyph)
        )?;
        Ok(())
    }

    fn draw_text(&mut self, col: u8, row: u8, text: &str) -> Result<(), DisplayError> {
        execute!(io::stdout(), MoveTo(col as u16, row as u16), Print(text))?;
        Ok(())
    }

    fn draw_sprite(&mut self, px: u16, py: u16, _tile: u8) -> Result<(), DisplayError> {
        let x = px / TILE_PIXELS;
        let y = (py.saturating_sub(PLAYFIELD_TOP)) / TILE_PIXELS;
        let (col, row) = Self::map_cell(x as u8, y as u8);
        execute!(io::stdout(), MoveTo(col, row), Print('@'))?;
        Ok(())
    }

    fn wait_vblank(&mut self) {
        let _ = io::stdout().flush();
        let elapsed = self.frame_started.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
        self.frame_started = Instant::now();
    }

    fn poll_input(&mut self) -> Buttons {
        // Drain whatever arrived since the last frame. Key release events
        // are not available on every terminal, so a direction is treated
        // as held for the frame it arrives in only.
        let mut state = Buttons::NONE;
        while let Ok(true) = event::poll(Duration::from_millis(0)) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    state = state | Self::button_for(key);
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
        if state != Buttons::NONE {
            debug!("terminal: input {:04x}", state.0);
        }
        state
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        self.cleanup();
    }
}
