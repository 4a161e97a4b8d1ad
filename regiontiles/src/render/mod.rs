//! Per-tile assembly of regions and statistics.
//!
//! [`TileRenderer::render`] turns one tile request into a [`TileData`]:
//!
//! 1. Derive precision and area thresholds for the tile's zoom
//! 2. Query the spatial backend with the padded bounding box
//! 3. Build one [`Region`] per returned row, in the backend's order
//! 4. Attach statistics, or a placeholder entry when they are disabled
//!
//! A render either returns a complete `TileData` or an error; nothing
//! partially assembled is ever handed back.

use thiserror::Error;
use tracing::{debug, instrument};

use crate::backend::{
    BackendConnector, BackendError, RegionId, RegionQuery, RegionRow, SpatialBackend, StatRow,
    StatisticsStore, UnknownValueType, ValueType,
};
use crate::config::RenderSettings;
use crate::coord::{CoordError, Projection, Tile, WebMercator};
use crate::region::{Region, StatValue, StatisticKey, Statistics, TileData};
use crate::resolution::{ResolutionError, ResolutionPolicy};

/// Errors that abort a render.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// Resolution parameters could not be derived for the tile.
    #[error("Invalid tile: {0}")]
    InvalidTile(#[from] ResolutionError),

    /// A backend call failed; the error is passed through unchanged.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A statistic row carried an unrecognized value-type tag.
    #[error(transparent)]
    UnknownValueType(#[from] UnknownValueType),

    /// A statistic row referenced a region the spatial query did not return.
    #[error("Statistic row references unknown region {0}")]
    UnknownRegion(RegionId),
}

/// Assembles tiles from a backend.
///
/// One renderer is shared by every request; each render opens its own
/// backend session.
pub struct TileRenderer {
    policy: ResolutionPolicy,
    projection: Box<dyn Projection>,
    padding: f64,
    tile_size: u32,
    include_statistics: bool,
}

impl std::fmt::Debug for TileRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileRenderer")
            .field("policy", &self.policy)
            .field("padding", &self.padding)
            .field("tile_size", &self.tile_size)
            .field("include_statistics", &self.include_statistics)
            .finish_non_exhaustive()
    }
}

impl Default for TileRenderer {
    fn default() -> Self {
        Self::new(&RenderSettings::default())
    }
}

impl TileRenderer {
    /// Create a renderer using Web Mercator.
    pub fn new(settings: &RenderSettings) -> Self {
        Self {
            policy: ResolutionPolicy::new(settings.detail_zoom),
            projection: Box::new(WebMercator),
            padding: settings.padding,
            tile_size: settings.tile_size,
            include_statistics: settings.include_statistics,
        }
    }

    /// Replace the projection used for tile corners.
    pub fn with_projection(mut self, projection: impl Projection + 'static) -> Self {
        self.projection = Box::new(projection);
        self
    }

    /// Enable or disable statistics queries.
    pub fn with_statistics(mut self, include: bool) -> Self {
        self.include_statistics = include;
        self
    }

    pub fn policy(&self) -> &ResolutionPolicy {
        &self.policy
    }

    pub fn include_statistics(&self) -> bool {
        self.include_statistics
    }

    /// Square tile of the configured size.
    pub fn tile(&self, column: u32, row: u32, zoom: u8) -> Result<Tile, CoordError> {
        Tile::new(column, row, zoom, self.tile_size, self.tile_size)
    }

    /// Render one tile.
    #[instrument(
        skip(self, connector, tile),
        fields(tile.column = tile.column(), tile.row = tile.row(), tile.zoom = tile.zoom())
    )]
    pub fn render<C: BackendConnector>(
        &self,
        connector: &C,
        tile: &Tile,
    ) -> Result<TileData, RenderError> {
        let params = self
            .policy
            .params(tile.width(), tile.height(), tile.zoom())?;
        let query = RegionQuery {
            bbox: tile.bounding_box(self.projection.as_ref(), self.padding),
            zoom: tile.zoom(),
            precision: params.precision,
            area_filter: params.area_filter,
        };

        let mut session = connector.open_session()?;

        let rows = session.query_regions(&query)?;
        debug!(
            regions = rows.len(),
            precision = params.precision,
            filtered = params.area_filter.is_some(),
            "Spatial query complete"
        );

        let mut data = TileData::new(*tile, self.include_statistics);
        for row in rows {
            let id = row.id;
            data.push_region(id, self.region_from_row(row));
        }

        if self.include_statistics && !data.is_empty() {
            let stats = session.query_statistics(&data.backend_ids())?;
            debug!(rows = stats.len(), "Statistics query complete");
            merge_statistics(&mut data, &stats)?;
        }

        Ok(data)
    }

    fn region_from_row(&self, row: RegionRow) -> Region {
        let parents = row.parent_labels();
        let statistics = if self.include_statistics {
            Statistics::new()
        } else {
            Statistics::placeholder()
        };

        Region {
            id: Region::composite_id(&row.region_type, &row.uid),
            uid: row.uid,
            name: row.name,
            region_type: row.region_type,
            parents,
            geometry_geojson: row.geometry_geojson,
            geometry_svg: row.geometry_svg,
            statistics,
        }
    }
}

/// Value of a statistic row, selected by its type tag.
fn stat_value(row: &StatRow) -> Result<Option<StatValue>, UnknownValueType> {
    Ok(match row.value_type.parse::<ValueType>()? {
        ValueType::Integer => row.value_integer.map(StatValue::Integer),
        ValueType::Float => row.value_float.map(StatValue::Float),
    })
}

/// Merge statistic rows into the regions they belong to.
fn merge_statistics(data: &mut TileData, rows: &[StatRow]) -> Result<(), RenderError> {
    for row in rows {
        let value = stat_value(row)?;
        let region = data
            .region_mut(row.region_id)
            .ok_or(RenderError::UnknownRegion(row.region_id))?;
        region.statistics.insert(
            StatisticKey::new(row.year, row.indicator.as_str()),
            value,
            row.note.as_deref(),
        );
    }
    Ok(())
}
