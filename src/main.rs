use boxcart::archive::ResourceArchive;
use boxcart::display_manager::{create_display, DisplayMode};
use boxcart::rom::PagedRom;
use boxcart::runner::Runner;
use log::{debug, info};
use std::env;
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("boxcart - push-block puzzle engine for banked resource ROMs");
        println!();
        println!("Usage: {} <rom_image>", args[0]);
        println!("Example:");
        println!("  {} game.rom", args[0]);
        println!();
        println!("Controls: arrows/WASD move, Z/X or Enter/Space are the action");
        println!("buttons, Esc or Q quits. Set DISPLAY_MODE=terminal|headless to");
        println!("override display auto-detection.");
        return Ok(());
    }

    let rom_path = &args[1];

    // Load the ROM image with user-friendly error handling
    debug!("Loading ROM image: {}", rom_path);
    let image = match fs::read(rom_path) {
        Ok(image) => image,
        Err(e) => {
            match e.kind() {
                std::io::ErrorKind::NotFound => {
                    eprintln!("Error: ROM image not found: {}", rom_path);
                    eprintln!();
                    eprintln!("Please check:");
                    eprintln!("• File path is correct");
                    eprintln!("• You're running from the right directory");
                    eprintln!("• File exists and is readable");
                }
                std::io::ErrorKind::PermissionDenied => {
                    eprintln!("Error: Permission denied accessing ROM image: {}", rom_path);
                    eprintln!();
                    eprintln!("Please check file permissions.");
                }
                _ => {
                    eprintln!("Error: Cannot open ROM image '{}': {}", rom_path, e);
                }
            }
            std::process::exit(1);
        }
    };

    let archive = ResourceArchive::open(PagedRom::from_image(image))?;
    info!(
        "opened {} ({} resources)",
        rom_path,
        archive.entry_count()
    );

    let display = create_display(DisplayMode::from_env())?;
    let mut runner = Runner::new(archive, display);

    match runner.run() {
        Ok(()) => {
            debug!("session ended normally");
            Ok(())
        }
        Err(e) => {
            eprintln!("\nError during session: {e}");
            Err(Box::new(std::io::Error::other(e)) as Box<dyn std::error::Error>)
        }
    }
}
