//! RegionTiles CLI - Command-line interface
//!
//! Renders region tiles from a JSON fixture and inspects the region-type
//! hierarchy.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use regiontiles::config::{config_file_path, ConfigFile};
use regiontiles::logging::init_logging;

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "regiontiles")]
#[command(about = "Zoom-adaptive administrative region tiles", long_about = None)]
struct Cli {
    /// Config file (default: ~/.regiontiles/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one tile as GeoJSON
    Render(commands::render::RenderArgs),
    /// Print the region-type layers of a fixture
    Layers(commands::layers::LayersArgs),
    /// Write a default config file if none exists
    Init,
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.unwrap_or_else(config_file_path);

    if let Command::Init = cli.command {
        return commands::init::run(&config_path);
    }

    let config = ConfigFile::load_from(&config_path).map_err(CliError::Config)?;
    let _guard = init_logging(&config.logging).map_err(CliError::LoggingInit)?;
    tracing::debug!(path = %config_path.display(), "Configuration loaded");

    match cli.command {
        Command::Render(args) => commands::render::run(args, &config),
        Command::Layers(args) => commands::layers::run(args),
        Command::Init => Ok(()),
    }
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        e.exit();
    }
}
