//! Pack a project manifest and its asset files into a playable ROM image.
//!
//! The manifest describes project info, tile attributes and maps; the
//! palette and tileset are raw binary sidecar files. An optional base
//! image fills the program pages below the archive.

use boxcart::builder::ArchiveBuilder;
use boxcart::map::map_file_name;
use boxcart::project::Project;
use log::{info, warn};
use std::env;
use std::fs;
use std::process;

struct PackArgs {
    manifest: String,
    output: String,
    base: Option<String>,
    palette: Option<String>,
    tileset: Option<String>,
}

fn usage(program: &str) {
    println!("boxcart-pack - build a resource ROM from a project manifest");
    println!();
    println!("Usage: {} <project.toml> <output.rom> [options]", program);
    println!();
    println!("Options:");
    println!("  --base <file>      base program image for the pages below the archive");
    println!("  --palette <file>   palette bytes for main.pal");
    println!("  --tiles <file>     tile pixel data for main.til");
}

fn parse_args(args: &[String]) -> Result<PackArgs, String> {
    if args.len() < 3 {
        return Err("missing manifest or output path".to_string());
    }
    let mut parsed = PackArgs {
        manifest: args[1].clone(),
        output: args[2].clone(),
        base: None,
        palette: None,
        tileset: None,
    };
    let mut i = 3;
    while i < args.len() {
        let value = args
            .get(i + 1)
            .ok_or_else(|| format!("{} needs a file argument", args[i]))?
            .clone();
        match args[i].as_str() {
            "--base" => parsed.base = Some(value),
            "--palette" => parsed.palette = Some(value),
            "--tiles" => parsed.tileset = Some(value),
            other => return Err(format!("unknown option {}", other)),
        }
        i += 2;
    }
    Ok(parsed)
}

fn read_file(path: &str, what: &str) -> Result<Vec<u8>, String> {
    fs::read(path).map_err(|e| format!("cannot read {} '{}': {}", what, path, e))
}

fn pack(args: &PackArgs) -> Result<(), String> {
    let manifest_text = fs::read_to_string(&args.manifest)
        .map_err(|e| format!("cannot read manifest '{}': {}", args.manifest, e))?;
    let project = Project::from_toml_str(&manifest_text)?;

    let mut builder = ArchiveBuilder::new();
    if let Some(base) = &args.base {
        builder.set_base_image(read_file(base, "base image")?)?;
    }

    builder.add("project.inf", project.inf_bytes())?;
    builder.add("main.atr", project.attr_table_bytes())?;

    match &args.palette {
        Some(path) => builder.add("main.pal", read_file(path, "palette")?)?,
        None => {
            warn!("no palette given, writing an all-black main.pal");
            builder.add("main.pal", vec![0u8; 32])?;
        }
    }
    match &args.tileset {
        Some(path) => builder.add("main.til", read_file(path, "tileset")?)?,
        None => {
            warn!("no tileset given, writing an empty main.til");
            builder.add("main.til", Vec::new())?;
        }
    }

    for map in &project.maps {
        builder.add(&map_file_name(map.id), Project::map_record_bytes(map))?;
    }

    let image = builder.build()?;
    fs::write(&args.output, &image)
        .map_err(|e| format!("cannot write '{}': {}", args.output, e))?;
    info!(
        "packed {} resources into {} ({} bytes)",
        builder.resource_count(),
        args.output,
        image.len()
    );
    println!("{}: {} bytes", args.output, image.len());
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            usage(&args[0]);
            process::exit(2);
        }
    };

    if let Err(e) = pack(&parsed) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
