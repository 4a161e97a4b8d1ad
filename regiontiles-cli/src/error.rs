//! CLI error handling with user-friendly messages.

use std::fmt;
use std::path::PathBuf;
use std::process;

use regiontiles::backend::BackendError;
use regiontiles::config::ConfigFileError;
use regiontiles::coord::CoordError;
use regiontiles::hierarchy::HierarchyError;
use regiontiles::logging::LoggingError;
use regiontiles::output::OutputError;
use regiontiles::render::RenderError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(LoggingError),
    /// Configuration error
    Config(ConfigFileError),
    /// Fixture could not be loaded
    Fixture(BackendError),
    /// Invalid tile address or arguments
    InvalidTile(String),
    /// Render failed
    Render(RenderError),
    /// Encoding failed or the format is unsupported
    Output(OutputError),
    /// Hierarchy could not be partitioned
    Hierarchy(HierarchyError),
    /// Failed to write output file
    FileWrite { path: PathBuf, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Output(OutputError::UnsupportedFormat(_)) = self {
            eprintln!();
            eprintln!("Supported formats: json, geojson");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Fixture(e) => write!(f, "Failed to load fixture: {}", e),
            CliError::InvalidTile(msg) => write!(f, "Invalid tile: {}", msg),
            CliError::Render(e) => write!(f, "Failed to render tile: {}", e),
            CliError::Output(e) => write!(f, "{}", e),
            CliError::Hierarchy(e) => write!(f, "{}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::Fixture(e) => Some(e),
            CliError::Render(e) => Some(e),
            CliError::Output(e) => Some(e),
            CliError::Hierarchy(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::InvalidTile(_) => None,
        }
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::InvalidTile(e.to_string())
    }
}

impl From<RenderError> for CliError {
    fn from(e: RenderError) -> Self {
        CliError::Render(e)
    }
}

impl From<OutputError> for CliError {
    fn from(e: OutputError) -> Self {
        CliError::Output(e)
    }
}

impl From<HierarchyError> for CliError {
    fn from(e: HierarchyError) -> Self {
        CliError::Hierarchy(e)
    }
}
