//! Crate-level error type.

use thiserror::Error;

use crate::backend::BackendError;
use crate::config::ConfigFileError;
use crate::coord::CoordError;
use crate::hierarchy::HierarchyError;
use crate::logging::LoggingError;
use crate::output::OutputError;
use crate::render::RenderError;
use crate::resolution::ResolutionError;

/// Any error produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Coord(#[from] CoordError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    Config(#[from] ConfigFileError),

    #[error(transparent)]
    Logging(#[from] LoggingError),
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
