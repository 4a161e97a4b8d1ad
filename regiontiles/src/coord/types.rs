//! Coordinate type definitions

use thiserror::Error;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Zoom levels a region tile can be rendered at.
///
/// Zoom 0 has no meaningful resolution parameters (the whole world fits in
/// less than one tile width), and by zoom 20 the minimum feature area has
/// already rounded down to zero square meters.
pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 20;

/// Errors produced when constructing tile addresses.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Zoom level outside `MIN_ZOOM..=MAX_ZOOM`.
    #[error("Invalid zoom level {0}: must be between {MIN_ZOOM} and {MAX_ZOOM}")]
    InvalidZoom(u8),

    /// Tile pixel dimensions must both be non-zero.
    #[error("Invalid tile size {width}x{height}: dimensions must be non-zero")]
    InvalidTileSize { width: u32, height: u32 },

    /// Column or row does not exist at the given zoom level.
    #[error("Tile ({column}, {row}) does not exist at zoom {zoom}")]
    OutOfRange { column: u32, row: u32, zoom: u8 },
}

/// A fractional position in the Web Mercator tile grid.
///
/// Integral values address tile corners; fractional values address points
/// inside a tile. Column increases eastward, row increases southward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileCoord {
    /// X position in tiles, 0 at the antimeridian (west edge)
    pub column: f64,
    /// Y position in tiles, 0 at the north edge
    pub row: f64,
    /// Zoom level
    pub zoom: u8,
}

impl TileCoord {
    /// Create a grid coordinate.
    pub fn new(column: f64, row: f64, zoom: u8) -> Self {
        Self { column, row, zoom }
    }

    /// Move `distance` tiles west.
    #[inline]
    pub fn left(&self, distance: f64) -> Self {
        Self::new(self.column - distance, self.row, self.zoom)
    }

    /// Move `distance` tiles east.
    #[inline]
    pub fn right(&self, distance: f64) -> Self {
        Self::new(self.column + distance, self.row, self.zoom)
    }

    /// Move `distance` tiles north.
    #[inline]
    pub fn up(&self, distance: f64) -> Self {
        Self::new(self.column, self.row - distance, self.zoom)
    }

    /// Move `distance` tiles south.
    #[inline]
    pub fn down(&self, distance: f64) -> Self {
        Self::new(self.column, self.row + distance, self.zoom)
    }
}

/// A geographic position in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Geographic extent described by its north-west and south-east corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub north_west: Location,
    pub south_east: Location,
}

impl BoundingBox {
    pub fn new(north_west: Location, south_east: Location) -> Self {
        Self {
            north_west,
            south_east,
        }
    }

    /// Build a box from `[min_lon, min_lat, max_lon, max_lat]` bounds.
    pub fn from_bounds([min_lon, min_lat, max_lon, max_lat]: [f64; 4]) -> Self {
        Self::new(
            Location::new(max_lat, min_lon),
            Location::new(min_lat, max_lon),
        )
    }

    pub fn min_lon(&self) -> f64 {
        self.north_west.lon
    }

    pub fn max_lon(&self) -> f64 {
        self.south_east.lon
    }

    pub fn min_lat(&self) -> f64 {
        self.south_east.lat
    }

    pub fn max_lat(&self) -> f64 {
        self.north_west.lat
    }

    /// Width in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_lon() - self.min_lon()
    }

    /// Height in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_lat() - self.min_lat()
    }

    /// Whether two boxes overlap (touching edges count as overlap).
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_lon() <= other.max_lon()
            && self.max_lon() >= other.min_lon()
            && self.min_lat() <= other.max_lat()
            && self.max_lat() >= other.min_lat()
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.min_lon() <= other.min_lon()
            && self.max_lon() >= other.max_lon()
            && self.min_lat() <= other.min_lat()
            && self.max_lat() >= other.max_lat()
    }
}
