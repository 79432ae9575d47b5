//! Display manager that creates the appropriate display implementation.
//!
//! Responsible for:
//! - Picking a backend from the requested mode and the environment
//! - Falling back from terminal to headless when there is no tty

use crate::display::{ConsoleDisplay, DisplayError};
use crate::display_headless::HeadlessDisplay;
use crate::display_terminal::TerminalDisplay;

use log::debug;

/// Display mode selection
#[derive(Debug, Clone, Default)]
pub enum DisplayMode {
    /// Terminal if interactive, headless otherwise
    #[default]
    Auto,
    /// Force the terminal frontend (fail if it cannot start)
    Terminal,
    /// No display output (testing, piped runs)
    Headless,
}

impl DisplayMode {
    /// Read the mode from the `DISPLAY_MODE` environment variable.
    pub fn from_env() -> DisplayMode {
        match std::env::var("DISPLAY_MODE").as_deref() {
            Ok("terminal") => DisplayMode::Terminal,
            Ok("headless") => DisplayMode::Headless,
            _ => DisplayMode::Auto,
        }
    }
}

/// Display environment capabilities
#[derive(Debug)]
pub struct DisplayCapabilities {
    pub has_terminal: bool,
    pub is_interactive: bool,
}

impl DisplayCapabilities {
    /// Detect current environment capabilities
    pub fn detect() -> Self {
        Self {
            has_terminal: atty::is(atty::Stream::Stdout),
            is_interactive: atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stdout),
        }
    }
}

/// Create a display implementation for the requested mode.
pub fn create_display(mode: DisplayMode) -> Result<Box<dyn ConsoleDisplay>, DisplayError> {
    let caps = DisplayCapabilities::detect();
    debug!("display capabilities: {:?}", caps);
    debug!("creating display with mode {:?}", mode);

    let display: Box<dyn ConsoleDisplay> = match mode {
        DisplayMode::Auto => {
            if caps.is_interactive {
                match TerminalDisplay::new() {
                    Ok(display) => {
                        debug!("using terminal display");
                        Box::new(display)
                    }
                    Err(e) => {
                        debug!("terminal display failed ({}), falling back to headless", e);
                        Box::new(HeadlessDisplay::new())
                    }
                }
            } else {
                debug!("not interactive, using headless display");
                Box::new(HeadlessDisplay::new())
            }
        }

        DisplayMode::Terminal => Box::new(TerminalDisplay::new()?),

        DisplayMode::Headless => Box::new(HeadlessDisplay::new()),
    };

    Ok(display)
}
