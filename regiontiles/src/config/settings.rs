//! Settings structs and their defaults.

use std::path::PathBuf;

pub use crate::resolution::DEFAULT_DETAIL_ZOOM;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Default bounding box padding, in tiles per side.
pub const DEFAULT_PADDING: f64 = 0.01;

pub const DEFAULT_LOG_DIRECTORY: &str = "logs";
pub const DEFAULT_LOG_FILE: &str = "regiontiles.log";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Complete configuration file contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub render: RenderSettings,
    pub logging: LoggingSettings,
}

/// `[render]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Tile width and height in pixels.
    pub tile_size: u32,
    /// Zoom from which area filtering is disabled.
    pub detail_zoom: u8,
    /// Bounding box padding in tiles per side.
    pub padding: f64,
    /// Whether renders query the statistics store.
    pub include_statistics: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            detail_zoom: DEFAULT_DETAIL_ZOOM,
            padding: DEFAULT_PADDING,
            include_statistics: true,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_LOG_DIRECTORY),
            file: DEFAULT_LOG_FILE.to_string(),
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
