//! `layers` command: partition a fixture's region-type hierarchy.

use std::path::PathBuf;

use clap::Args;
use regiontiles::backend::MemoryBackend;
use regiontiles::hierarchy::{region_type_layers, LayerSet};

use crate::error::CliError;

#[derive(Debug, Args)]
pub struct LayersArgs {
    /// JSON fixture holding region_type_edges
    #[arg(long)]
    pub fixture: PathBuf,
}

pub fn run(args: LayersArgs) -> Result<(), CliError> {
    let backend = MemoryBackend::load(&args.fixture).map_err(CliError::Fixture)?;
    let layers = region_type_layers(&backend)?;
    print!("{}", describe(layers));
    Ok(())
}

/// One line per layer: index, source path length, region types.
fn describe(layers: &LayerSet) -> String {
    let mut out = String::new();
    for (i, layer) in layers.iter().enumerate() {
        let types: Vec<&str> = layer.iter().map(String::as_str).collect();
        out.push_str(&format!(
            "Layer {} (path length {}): {}\n",
            i,
            layers.path_length(i).unwrap_or(0),
            types.join(", ")
        ));
    }
    out
}
