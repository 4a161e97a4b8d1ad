//! Zoom-dependent resolution parameters.
//!
//! The spatial backend simplifies and filters geometry before returning it.
//! This module computes the parameters for that work purely from the tile's
//! pixel size and zoom level:
//!
//! - **Decimal precision**: how many decimal digits coordinates are rounded
//!   to, chosen so rounding never moves a vertex by more than half a pixel.
//! - **Minimum feature area**: the smallest real-world area (m²) a region
//!   must cover to occupy at least [`MIN_FEATURE_PIXELS`] pixels on screen.
//!
//! At or above the detail zoom area filtering is disabled and one extra
//! digit of precision is emitted.

use thiserror::Error;

use crate::coord::{MAX_ZOOM, MIN_ZOOM};

/// Ground resolution at zoom 1, in meters per pixel.
pub const METERS_PER_PIXEL_AT_ZOOM_1: f64 = 78206.0;

/// Pixels a feature must cover on screen to be included.
pub const MIN_FEATURE_PIXELS: f64 = 40.0;

/// Pixels an island must cover on screen to be included.
pub const MIN_ISLAND_PIXELS: f64 = 4.0;

/// Zoom level at which area filtering stops and precision gains a digit.
pub const DEFAULT_DETAIL_ZOOM: u8 = 15;

/// Invalid inputs to the resolution functions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolutionError {
    #[error("Invalid tile size {width}x{height}: dimensions must be non-zero")]
    InvalidTileSize { width: u32, height: u32 },

    #[error("Invalid zoom level {0}: must be between {MIN_ZOOM} and {MAX_ZOOM}")]
    InvalidZoom(u8),
}

fn validate(width: u32, height: u32, zoom: u8) -> Result<(), ResolutionError> {
    if width == 0 || height == 0 {
        return Err(ResolutionError::InvalidTileSize { width, height });
    }
    if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
        return Err(ResolutionError::InvalidZoom(zoom));
    }
    Ok(())
}

#[inline]
fn zoom_factor(zoom: u8) -> f64 {
    2.0_f64.powi(zoom as i32 - 1)
}

/// Degrees of arc covered by one pixel.
///
/// At zoom 1 a tile spans ~180 degrees east-west and ~90 degrees
/// north-south; each further zoom level halves both.
pub fn degrees_per_pixel(width: u32, height: u32, zoom: u8) -> Result<f64, ResolutionError> {
    validate(width, height, zoom)?;

    let factor = zoom_factor(zoom);
    let ew_degrees = 180.0 / factor;
    let ns_degrees = 90.0 / factor;

    Ok((ew_degrees / width as f64).min(ns_degrees / height as f64))
}

fn area_for_pixels(zoom: u8, pixels: f64) -> u64 {
    // http://wiki.openstreetmap.org/wiki/Zoom_levels
    let meters_per_pixel = METERS_PER_PIXEL_AT_ZOOM_1 / zoom_factor(zoom);
    (meters_per_pixel * meters_per_pixel * pixels) as u64
}

/// Smallest area (m²) a region must cover to be drawn at this zoom.
pub fn minimum_feature_area(width: u32, height: u32, zoom: u8) -> Result<u64, ResolutionError> {
    validate(width, height, zoom)?;
    Ok(area_for_pixels(zoom, MIN_FEATURE_PIXELS))
}

/// Smallest area (m²) an island region must cover to be drawn at this zoom.
///
/// Islands are kept when they pass either this threshold or the general
/// [`minimum_feature_area`], so small coastal regions stay visible.
pub fn minimum_island_area(width: u32, height: u32, zoom: u8) -> Result<u64, ResolutionError> {
    validate(width, height, zoom)?;
    Ok(area_for_pixels(zoom, MIN_ISLAND_PIXELS))
}

/// Decimal digits needed to keep coordinate rounding under half a pixel.
///
/// 1 degree per pixel gives precision 0, 0.1 gives 1, 0.01 gives 2, and so on.
pub fn decimal_precision(width: u32, height: u32, zoom: u8) -> Result<u32, ResolutionError> {
    let degrees = degrees_per_pixel(width, height, zoom)?;
    let digits = (-(degrees / 2.0).log10()).ceil();
    Ok(digits.max(0.0) as u32)
}

/// Area thresholds passed to the spatial backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaFilter {
    /// Regions larger than this are included.
    pub min_area: u64,
    /// Island regions larger than this are included.
    pub min_island_area: u64,
}

impl AreaFilter {
    /// Whether a feature of `area` square meters passes the filter.
    pub fn accepts(&self, area: f64, is_island: bool) -> bool {
        area > self.min_area as f64 || (is_island && area > self.min_island_area as f64)
    }
}

/// Everything the spatial backend needs to simplify and filter one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionParams {
    /// Decimal digits coordinates are rounded to.
    pub precision: u32,
    /// Area thresholds, or `None` when every feature passes.
    pub area_filter: Option<AreaFilter>,
}

/// Derives [`ResolutionParams`] for a tile size and zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionPolicy {
    detail_zoom: u8,
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DETAIL_ZOOM)
    }
}

impl ResolutionPolicy {
    /// Create a policy that disables area filtering from `detail_zoom` on.
    pub fn new(detail_zoom: u8) -> Self {
        Self { detail_zoom }
    }

    pub fn detail_zoom(&self) -> u8 {
        self.detail_zoom
    }

    /// Whether `zoom` renders at full detail.
    pub fn is_detailed(&self, zoom: u8) -> bool {
        zoom >= self.detail_zoom
    }

    /// Compute the backend parameters for one tile.
    pub fn params(&self, width: u32, height: u32, zoom: u8) -> Result<ResolutionParams, ResolutionError> {
        let precision = decimal_precision(width, height, zoom)?;

        if self.is_detailed(zoom) {
            return Ok(ResolutionParams {
                precision: precision + 1,
                area_filter: None,
            });
        }

        Ok(ResolutionParams {
            precision,
            area_filter: Some(AreaFilter {
                min_area: minimum_feature_area(width, height, zoom)?,
                min_island_area: minimum_island_area(width, height, zoom)?,
            }),
        })
    }
}
