// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// osk-layout
///
/// Command line front end: print a resolved layout tree, copy or remove a
/// layout with its geometry files, list the geometry files it references.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use log::{error, LevelFilter};

use onscreen_layout::olgf_files::{copy_layout, layout_svg_filenames, remove_layout};
use onscreen_layout::{LayoutError, LayoutLoader, LayoutSettings};

#[derive(Parser, Debug)]
#[command(name = "osk-layout", version, about = "Resolve and manage on-screen keyboard layouts")]
struct Args {
    /// Settings file (defaults to the per-user settings.xml)
    #[arg(short = 's', long = "settings", global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a layout and print the resolved tree
    Show {
        layout: PathBuf,

        /// Color scheme recorded on every key
        #[arg(long = "color-scheme")]
        color_scheme: Option<String>,
    },
    /// Duplicate a layout together with its geometry files
    Copy { src: PathBuf, dst: PathBuf },
    /// Delete a layout and its geometry files
    Remove { layout: PathBuf },
    /// List the geometry files a layout references
    Files { layout: PathBuf },
}

fn init_logging() {
    let mut builder = env_logger::Builder::new();
    match std::env::var("RUST_LOG") {
        Ok(filter) => {
            builder.parse_filters(&filter);
        }
        Err(_) => {
            builder.filter_level(LevelFilter::Info);
        }
    }
    builder.init();
}

fn load_settings(path: Option<&Path>) -> LayoutSettings {
    match path {
        Some(path) => LayoutSettings::load_or_default(path),
        None => LayoutSettings::load_default(),
    }
}

fn show(settings: &mut LayoutSettings, layout: &Path, color_scheme: Option<&str>) -> Result<(), LayoutError> {
    // includes next to the layout win over the configured search paths
    if let Some(dir) = layout.parent() {
        settings.search_paths.insert(0, dir.to_path_buf());
    }

    let loader = LayoutLoader::new(settings);
    match loader.load(None, layout, color_scheme)? {
        Some(root) => print!("{}", root.tree().dump()),
        None => println!("{}: empty layout", layout.display()),
    }
    Ok(())
}

fn run(args: Args) -> Result<(), LayoutError> {
    match args.command {
        Command::Show { layout, color_scheme } => {
            let mut settings = load_settings(args.settings.as_deref());
            show(&mut settings, &layout, color_scheme.as_deref())
        }
        Command::Copy { src, dst } => copy_layout(&src, &dst),
        Command::Remove { layout } => remove_layout(&layout),
        Command::Files { layout } => {
            for file in layout_svg_filenames(&layout)? {
                println!("{}", file.display());
            }
            Ok(())
        }
    }
}

fn main() {
    init_logging();
    let args = Args::parse();

    if let Err(e) = run(args) {
        error!("LAYOUT: {}", e);
        process::exit(1);
    }
}
