//! Tile addressing module
//!
//! Provides the tile grid coordinates a render request is addressed by,
//! neighbor-by-fraction movement used for padding, and conversion of grid
//! positions to geographic locations through a [`Projection`].

mod types;

pub use types::{
    BoundingBox, CoordError, Location, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON,
    MIN_ZOOM,
};

use std::f64::consts::PI;

/// Converts tile grid positions to geographic locations.
///
/// Implementations must be thread-safe so one projection can be shared by
/// every render running in the hosting server.
pub trait Projection: Send + Sync {
    /// Geographic location of a (possibly fractional) grid position.
    fn coordinate_location(&self, coord: &TileCoord) -> Location;
}

/// Spherical Web Mercator, the slippy-map tiling used by web map clients.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl Projection for WebMercator {
    #[inline]
    fn coordinate_location(&self, coord: &TileCoord) -> Location {
        let n = 2.0_f64.powi(coord.zoom as i32);

        let lon = coord.column / n * 360.0 - 180.0;

        // Inverse Web Mercator
        let y = coord.row / n;
        let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
        let lat = lat_rad * 180.0 / PI;

        Location::new(lat, lon)
    }
}

/// Finds the tile containing a geographic location.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (`MIN_ZOOM` to `MAX_ZOOM`)
///
/// # Returns
///
/// The `(column, row)` of the containing tile, or `None` when the location
/// lies outside the Web Mercator world.
#[inline]
pub fn tile_containing(lat: f64, lon: f64, zoom: u8) -> Option<(u32, u32)> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) || !(MIN_LON..=MAX_LON).contains(&lon) {
        return None;
    }

    let n = 2.0_f64.powi(zoom as i32);
    let max_index = n as u32 - 1;

    let column = ((lon + 180.0) / 360.0 * n) as u32;
    let lat_rad = lat * PI / 180.0;
    let row = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n) as u32;

    Some((column.min(max_index), row.min(max_index)))
}

/// A render request: one tile of the grid plus its pixel dimensions.
///
/// # Example
///
/// ```
/// use regiontiles::coord::Tile;
///
/// let tile = Tile::new(301, 367, 10, 256, 256).unwrap();
/// assert_eq!(tile.column(), 301);
/// assert_eq!(tile.zoom(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    column: u32,
    row: u32,
    zoom: u8,
    width: u32,
    height: u32,
}

impl Tile {
    /// Create a tile, validating zoom, grid position and pixel size.
    pub fn new(column: u32, row: u32, zoom: u8, width: u32, height: u32) -> Result<Self, CoordError> {
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            return Err(CoordError::InvalidZoom(zoom));
        }
        if width == 0 || height == 0 {
            return Err(CoordError::InvalidTileSize { width, height });
        }
        let tiles_per_side = 1u32 << zoom;
        if column >= tiles_per_side || row >= tiles_per_side {
            return Err(CoordError::OutOfRange { column, row, zoom });
        }

        Ok(Self {
            column,
            row,
            zoom,
            width,
            height,
        })
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Grid position of the north-west corner.
    pub fn top_left(&self) -> TileCoord {
        TileCoord::new(self.column as f64, self.row as f64, self.zoom)
    }

    /// Grid position of the south-east corner.
    pub fn bottom_right(&self) -> TileCoord {
        self.top_left().right(1.0).down(1.0)
    }

    /// Geographic extent of the tile, grown by `padding` tiles on each side.
    ///
    /// A padding of `0.01` adds one percent of the tile's extent per side.
    pub fn bounding_box(&self, projection: &dyn Projection, padding: f64) -> BoundingBox {
        let mut top_left = self.top_left();
        let mut bottom_right = self.bottom_right();

        if padding > 0.0 {
            top_left = top_left.left(padding).up(padding);
            bottom_right = bottom_right.right(padding).down(padding);
        }

        BoundingBox::new(
            projection.coordinate_location(&top_left),
            projection.coordinate_location(&bottom_right),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(column: u32, row: u32, zoom: u8) -> Tile {
        Tile::new(column, row, zoom, 256, 256).unwrap()
    }

    #[test]
    fn test_tile_containing_montreal() {
        // Montreal: 45.5017°N, 73.5673°W
        let (column, row) = tile_containing(45.5017, -73.5673, 10).unwrap();
        assert_eq!(column, 302);
        assert_eq!(row, 366);
    }

    #[test]
    fn test_tile_containing_rejects_polar_latitude() {
        assert!(tile_containing(89.0, 0.0, 5).is_none());
        assert!(tile_containing(0.0, 181.0, 5).is_none());
    }

    #[test]
    fn test_top_left_is_north_west_corner() {
        let t = tile(1, 1, 1);
        let location = WebMercator.coordinate_location(&t.top_left());
        assert!(location.lat.abs() < 1e-9, "row 1 of 2 starts at the equator");
        assert!(location.lon.abs() < 1e-9, "column 1 of 2 starts at the prime meridian");
    }

    #[test]
    fn test_bottom_right_is_one_tile_away() {
        let t = tile(3, 5, 4);
        let corner = t.bottom_right();
        assert_eq!(corner.column, 4.0);
        assert_eq!(corner.row, 6.0);
        assert_eq!(corner.zoom, 4);
    }

    #[test]
    fn test_neighbor_by_fraction() {
        let coord = TileCoord::new(10.0, 20.0, 6);
        assert_eq!(coord.left(0.25).column, 9.75);
        assert_eq!(coord.right(0.25).column, 10.25);
        assert_eq!(coord.up(0.5).row, 19.5);
        assert_eq!(coord.down(0.5).row, 20.5);
    }

    #[test]
    fn test_world_tile_spans_all_longitudes() {
        let t = tile(0, 0, 1);
        let bbox = t.bounding_box(&WebMercator, 0.0);
        assert!((bbox.min_lon() - -180.0).abs() < 1e-9);
        assert!((bbox.max_lon() - 0.0).abs() < 1e-9);
        assert!((bbox.max_lat() - MAX_LAT).abs() < 1e-6);
        assert!(bbox.min_lat().abs() < 1e-9);
    }

    #[test]
    fn test_padded_box_grows_one_percent_per_side() {
        let t = tile(301, 367, 10);
        let bbox = t.bounding_box(&WebMercator, 0.0);
        let padded = t.bounding_box(&WebMercator, 0.01);

        assert!(padded.contains(&bbox));

        let expected_pad = bbox.width() * 0.01;
        assert!((bbox.min_lon() - padded.min_lon() - expected_pad).abs() < 1e-9);
        assert!((padded.max_lon() - bbox.max_lon() - expected_pad).abs() < 1e-9);
        assert!(padded.max_lat() > bbox.max_lat());
        assert!(padded.min_lat() < bbox.min_lat());
    }

    #[test]
    fn test_tile_rejects_zoom_zero() {
        assert_eq!(
            Tile::new(0, 0, 0, 256, 256),
            Err(CoordError::InvalidZoom(0))
        );
    }

    #[test]
    fn test_tile_rejects_zoom_above_max() {
        assert!(matches!(
            Tile::new(0, 0, MAX_ZOOM + 1, 256, 256),
            Err(CoordError::InvalidZoom(_))
        ));
    }

    #[test]
    fn test_tile_rejects_empty_size() {
        assert_eq!(
            Tile::new(0, 0, 3, 0, 256),
            Err(CoordError::InvalidTileSize {
                width: 0,
                height: 256
            })
        );
    }

    #[test]
    fn test_tile_rejects_out_of_range_position() {
        assert!(matches!(
            Tile::new(4, 0, 2, 256, 256),
            Err(CoordError::OutOfRange { .. })
        ));
        assert!(Tile::new(3, 3, 2, 256, 256).is_ok());
    }

    #[test]
    fn test_bounding_box_intersects() {
        let a = BoundingBox::from_bounds([-10.0, -10.0, 10.0, 10.0]);
        let b = BoundingBox::from_bounds([5.0, 5.0, 20.0, 20.0]);
        let c = BoundingBox::from_bounds([11.0, 11.0, 20.0, 20.0]);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_tile_containing_roundtrip(
                lat in -85.0..85.0_f64,
                lon in -179.99..179.99_f64,
                zoom in MIN_ZOOM..=MAX_ZOOM
            ) {
                let (column, row) = tile_containing(lat, lon, zoom).unwrap();
                let t = Tile::new(column, row, zoom, 256, 256)?;
                let bbox = t.bounding_box(&WebMercator, 0.0);

                // Allow for floating point error at the tile edges
                let eps = 1e-9;
                prop_assert!(bbox.min_lon() - eps <= lon && lon <= bbox.max_lon() + eps);
                prop_assert!(bbox.min_lat() - eps <= lat && lat <= bbox.max_lat() + eps);
            }

            #[test]
            fn test_padding_always_contains_unpadded(
                column_raw in 0u32..1_000_000,
                row_raw in 0u32..1_000_000,
                zoom in MIN_ZOOM..=MAX_ZOOM,
                padding in 0.0..0.5_f64
            ) {
                let side = 1u32 << zoom;
                let t = Tile::new(column_raw % side, row_raw % side, zoom, 256, 256)?;
                let bbox = t.bounding_box(&WebMercator, 0.0);
                let padded = t.bounding_box(&WebMercator, padding);
                prop_assert!(padded.contains(&bbox));
            }
        }
    }
}
