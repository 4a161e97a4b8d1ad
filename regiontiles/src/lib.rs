//! RegionTiles - zoom-adaptive administrative region tiles
//!
//! This library assembles map tiles describing statistical regions: for a
//! requested tile it gathers the region polygons intersecting that tile,
//! annotated with their multi-year statistics, at a resolution appropriate
//! to the zoom level.
//!
//! # Modules
//!
//! - [`coord`] - Tile addressing and the Web Mercator projection
//! - [`resolution`] - Coordinate precision and minimum feature area per zoom
//! - [`hierarchy`] - Partitioning of the region-type hierarchy into layers
//! - [`backend`] - Spatial and statistics backends the renderer queries
//! - [`region`] - Assembled regions, statistics and per-tile results
//! - [`render`] - Per-tile assembly of regions and statistics
//! - [`output`] - GeoJSON encoding of rendered tiles
//! - [`config`] - INI configuration file handling
//! - [`logging`] - Tracing subscriber setup

pub mod backend;
pub mod config;
pub mod coord;
pub mod error;
pub mod hierarchy;
pub mod logging;
pub mod output;
pub mod region;
pub mod render;
pub mod resolution;

pub use error::Error;
