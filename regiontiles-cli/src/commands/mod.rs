//! CLI command implementations.
//!
//! - [`render`] - Render one tile from a fixture
//! - [`layers`] - Print the region-type layers of a fixture
//! - [`init`] - Configuration initialization

pub mod init;
pub mod layers;
pub mod render;
