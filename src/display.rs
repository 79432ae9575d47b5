//! Display/input collaborator interface.
//!
//! The engine never draws or reads devices directly; it calls this trait.
//! Backends: a crossterm terminal frontend for play and a headless
//! implementation for tests and piped runs. Page switching is *not* part
//! of this interface; it lives on the ROM accessor.

use crate::grid::Direction;
use std::fmt;

/// Button bitmask returned by input polling, one bit per pad line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons(pub u16);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);
    pub const UP: Buttons = Buttons(0x0001);
    pub const DOWN: Buttons = Buttons(0x0002);
    pub const LEFT: Buttons = Buttons(0x0004);
    pub const RIGHT: Buttons = Buttons(0x0008);
    pub const BUTTON_1: Buttons = Buttons(0x0010);
    pub const BUTTON_2: Buttons = Buttons(0x0020);
    /// Frontend-level quit request (window closed, Esc, stdin EOF). The
    /// console pad has no such line; terminal sessions need one.
    pub const QUIT: Buttons = Buttons(0x0040);

    pub fn contains(self, other: Buttons) -> bool {
        self.0 & other.0 != 0
    }

    /// Either action button.
    pub fn any_action(self) -> bool {
        self.contains(Buttons(Buttons::BUTTON_1.0 | Buttons::BUTTON_2.0))
    }

    /// The move direction this state requests, if any. When several
    /// direction lines are down at once: up, then down, then left, then
    /// right.
    pub fn direction(self) -> Option<Direction> {
        if self.contains(Buttons::UP) {
            Some(Direction::Up)
        } else if self.contains(Buttons::DOWN) {
            Some(Direction::Down)
        } else if self.contains(Buttons::LEFT) {
            Some(Direction::Left)
        } else if self.contains(Buttons::RIGHT) {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

impl std::ops::BitOr for Buttons {
    type Output = Buttons;

    fn bitor(self, rhs: Buttons) -> Buttons {
        Buttons(self.0 | rhs.0)
    }
}

/// The operations the engine needs from a display/input device.
///
/// Grid coordinates address map cells; text coordinates address the
/// 8-pixel text cells of the status area; sprites take raw pixels.
pub trait ConsoleDisplay {
    /// Wipe everything, including the text area.
    fn clear_screen(&mut self) -> Result<(), DisplayError>;

    /// Upload palette bytes. Backends without color may ignore this.
    fn load_palette(&mut self, bytes: &[u8]) -> Result<(), DisplayError>;

    /// Upload tile pixel data. Backends without tile video memory may
    /// ignore this.
    fn load_tiles(&mut self, bytes: &[u8]) -> Result<(), DisplayError>;

    /// Draw one map tile at a grid cell.
    fn blit_tile(&mut self, x: u8, y: u8, tile: u8) -> Result<(), DisplayError>;

    /// Write a string starting at a text cell.
    fn draw_text(&mut self, col: u8, row: u8, text: &str) -> Result<(), DisplayError>;

    /// Draw the actor sprite at a pixel position.
    fn draw_sprite(&mut self, px: u16, py: u16, tile: u8) -> Result<(), DisplayError>;

    /// Block until the next frame boundary.
    fn wait_vblank(&mut self);

    /// Current button state. Non-blocking.
    fn poll_input(&mut self) -> Buttons;
}

// Let callers hold any backend behind a box and still pass it where a
// concrete ConsoleDisplay is expected.
impl<D: ConsoleDisplay + ?Sized> ConsoleDisplay for Box<D> {
    fn clear_screen(&mut self) -> Result<(), DisplayError> {
        (**self).clear_screen()
    }

    fn load_palette(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        (**self).load_palette(bytes)
    }

    fn load_tiles(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        (**self).load_tiles(bytes)
    }

    fn blit_tile(&mut self, x: u8, y: u8, tile: u8) -> Result<(), DisplayError> {
        (**self).blit_tile(x, y, tile)
    }

    fn draw_text(&mut self, col: u8, row: u8, text: &str) -> Result<(), DisplayError> {
        (**self).draw_text(col, row, text)
    }

    fn draw_sprite(&mut self, px: u16, py: u16, tile: u8) -> Result<(), DisplayError> {
        (**self).draw_sprite(px, py, tile)
    }

    fn wait_vblank(&mut self) {
        (**self).wait_vblank()
    }

    fn poll_input(&mut self) -> Buttons {
        (**self).poll_input()
    }
}

/// Display error type
#[derive(Debug, Clone)]
pub struct DisplayError {
    pub message: String,
}

impl DisplayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Display error: {}", self.message)
    }
}

impl std::error::Error for DisplayError {}

impl From<std::io::Error> for DisplayError {
    fn from(error: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", error))
    }
}

impl From<DisplayError> for String {
    fn from(error: DisplayError) -> String {
        error.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_priority_matches_pad_order() {
        assert_eq!(Buttons::UP.direction(), Some(Direction::Up));
        assert_eq!(
            (Buttons::DOWN | Buttons::RIGHT).direction(),
            Some(Direction::Down)
        );
        assert_eq!(
            (Buttons::LEFT | Buttons::RIGHT).direction(),
            Some(Direction::Left)
        );
        assert_eq!(Buttons::BUTTON_1.direction(), None);
    }

    #[test]
    fn action_buttons() {
        assert!(Buttons::BUTTON_1.any_action());
        assert!((Buttons::UP | Buttons::BUTTON_2).any_action());
        assert!(!Buttons::UP.any_action());
        assert!(!Buttons::NONE.any_action());
    }
}
