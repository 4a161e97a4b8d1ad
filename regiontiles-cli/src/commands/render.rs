//! `render` command: render one tile from a fixture.

use std::path::PathBuf;

use clap::Args;
use regiontiles::backend::MemoryBackend;
use regiontiles::config::ConfigFile;
use regiontiles::coord::{tile_containing, Tile};
use regiontiles::output::{encode, OutputFormat};
use regiontiles::render::TileRenderer;
use tracing::info;

use crate::error::CliError;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// JSON fixture holding regions and statistics
    #[arg(long)]
    pub fixture: PathBuf,

    /// Zoom level
    #[arg(long)]
    pub zoom: u8,

    /// Tile column
    #[arg(long, requires = "row", conflicts_with_all = ["lat", "lon"])]
    pub column: Option<u32>,

    /// Tile row
    #[arg(long, requires = "column")]
    pub row: Option<u32>,

    /// Latitude of a point inside the tile (instead of column/row)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude of a point inside the tile (instead of column/row)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Output format
    #[arg(long, default_value = "json")]
    pub format: String,

    /// Write placeholder statistics instead of querying them
    #[arg(long)]
    pub no_statistics: bool,

    /// Output file (default: stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl RenderArgs {
    fn tile(&self, renderer: &TileRenderer) -> Result<Tile, CliError> {
        let (column, row) = match (self.column, self.row, self.lat, self.lon) {
            (Some(column), Some(row), _, _) => (column, row),
            (_, _, Some(lat), Some(lon)) => tile_containing(lat, lon, self.zoom).ok_or_else(|| {
                CliError::InvalidTile(format!("({}, {}) is outside the map", lat, lon))
            })?,
            _ => {
                return Err(CliError::InvalidTile(
                    "either --column/--row or --lat/--lon is required".to_string(),
                ))
            }
        };
        Ok(renderer.tile(column, row, self.zoom)?)
    }
}

pub fn run(args: RenderArgs, config: &ConfigFile) -> Result<(), CliError> {
    let format: OutputFormat = args.format.parse()?;

    let mut renderer = TileRenderer::new(&config.render);
    if args.no_statistics {
        renderer = renderer.with_statistics(false);
    }
    let tile = args.tile(&renderer)?;

    let backend = MemoryBackend::load(&args.fixture).map_err(CliError::Fixture)?;
    let data = renderer.render(&backend, &tile)?;
    let encoded = encode(&data, format)?;

    info!(
        column = tile.column(),
        row = tile.row(),
        zoom = tile.zoom(),
        regions = data.len(),
        "Tile rendered"
    );

    match &args.output {
        Some(path) => std::fs::write(path, encoded).map_err(|error| CliError::FileWrite {
            path: path.clone(),
            error,
        })?,
        None => println!("{}", encoded),
    }
    Ok(())
}
