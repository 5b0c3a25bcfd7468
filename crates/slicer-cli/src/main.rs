//! # Sprite Slicer
//!
//! Command line entry point for the sprite sheet slicer.
//!
//! Every subcommand drives one `SessionState`:
//! - inspect: grid shape of a sheet
//! - pack: packed canvas with range highlight
//! - select: two-click range selection
//! - export: frames of a range as PNG files
//! - preview: looping playback of a range

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    let cli = app::Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive(format!("sprite_slicer={level}").parse()?)
                .add_directive(format!("slicer_core={level}").parse()?),
        )
        .init();

    info!("Sprite Slicer {}", env!("CARGO_PKG_VERSION"));

    app::run(cli)
}
