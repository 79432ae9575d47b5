//! boxcart - a push-block puzzle engine and the banked resource archive
//! format its assets ship in.
//!
//! The crate has two halves:
//! - The archive side: [`rom::PagedRom`] models the console's one-page
//!   banking window, [`archive::ResourceArchive`] resolves names to byte
//!   ranges, [`builder::ArchiveBuilder`] writes images.
//! - The puzzle side: [`map::MapRecord`] and [`attrs::AttrTable`] decode a
//!   level's assets, [`grid::PuzzleGrid`] runs the push mechanics, and
//!   [`runner::Runner`] drives frames against a [`display::ConsoleDisplay`]
//!   backend.

pub mod actor;
pub mod archive;
pub mod attrs;
pub mod builder;
pub mod display;
pub mod display_headless;
pub mod display_manager;
pub mod display_terminal;
pub mod grid;
pub mod map;
pub mod project;
pub mod rom;
pub mod runner;
pub mod util;

#[cfg(test)]
mod grid_tests;
