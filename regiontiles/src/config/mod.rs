//! Configuration for RegionTiles.
//!
//! Settings are read from an INI file at `~/.regiontiles/config.ini`. A
//! missing file yields the defaults; any key present overrides its default.
//!
//! ```ini
//! [render]
//! tile_size = 256
//! detail_zoom = 15
//! padding = 0.01
//! include_statistics = true
//!
//! [logging]
//! directory = logs
//! file = regiontiles.log
//! filter = info
//! ```

mod file;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, LoggingSettings, RenderSettings, DEFAULT_DETAIL_ZOOM, DEFAULT_LOG_DIRECTORY,
    DEFAULT_LOG_FILE, DEFAULT_LOG_FILTER, DEFAULT_PADDING, DEFAULT_TILE_SIZE,
};
