//! Spatial and statistics backends.
//!
//! The renderer never touches a database directly. It opens one
//! [`BackendSession`] per render through a [`BackendConnector`] and issues
//! two queries on it:
//!
//! 1. [`SpatialBackend::query_regions`] - region polygons intersecting the
//!    padded tile, already clipped, simplified and area-filtered.
//! 2. [`StatisticsStore::query_statistics`] - every statistic row for the
//!    regions returned by the first query.
//!
//! The session is dropped when the render returns, on success or failure.
//!
//! # Implementors
//!
//! - [`MemoryBackend`] - In-process backend loaded from a JSON fixture

mod memory;

pub use memory::{Fixture, MemoryBackend, MemorySession, RegionRecord, StatisticRecord};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::coord::BoundingBox;
use crate::resolution::AreaFilter;

/// Backend identifier of a region.
pub type RegionId = i64;

/// Errors reported by a backend.
///
/// The renderer propagates these unchanged; retrying is the caller's call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    /// Could not open a session.
    #[error("Backend connection failed: {0}")]
    Connection(String),

    /// A query failed.
    #[error("Backend query failed: {0}")]
    Query(String),

    /// Source data could not be read or decoded.
    #[error("Invalid backend data: {0}")]
    Data(String),
}

/// Parameters of one spatial query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionQuery {
    /// Padded tile extent to intersect regions with.
    pub bbox: BoundingBox,
    /// Tile zoom, selecting the pre-simplified polygon set.
    pub zoom: u8,
    /// Decimal digits to round output coordinates to.
    pub precision: u32,
    /// Area thresholds; `None` returns every intersecting region.
    pub area_filter: Option<AreaFilter>,
}

/// One region returned by the spatial backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRow {
    pub id: RegionId,
    /// External identifier, unique within its region type.
    pub uid: String,
    pub region_type: String,
    pub name: String,
    /// Comma-joined parent labels; `None` or empty for top-level regions.
    pub parents: Option<String>,
    /// GeoJSON geometry, clipped to the query box.
    pub geometry_geojson: String,
    /// Optional SVG path of the geometry in Web Mercator.
    pub geometry_svg: Option<String>,
}

impl RegionRow {
    /// Parent labels split out of the comma-joined list.
    pub fn parent_labels(&self) -> Vec<String> {
        match self.parents.as_deref() {
            Some(list) if !list.is_empty() => list.split(',').map(str::to_string).collect(),
            _ => Vec::new(),
        }
    }
}

/// One statistic value for one region and year.
///
/// Exactly one of `value_integer` / `value_float` is meaningful, selected by
/// `value_type`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub region_id: RegionId,
    pub indicator: String,
    pub year: i32,
    pub value_type: String,
    pub value_integer: Option<i64>,
    pub value_float: Option<f64>,
    pub note: Option<String>,
}

/// Statistic value-type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    Float,
}

/// A statistic row carried a tag other than `integer` or `float`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown value type '{0}'")]
pub struct UnknownValueType(pub String);

impl FromStr for ValueType {
    type Err = UnknownValueType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "integer" => Ok(ValueType::Integer),
            "float" => Ok(ValueType::Float),
            other => Err(UnknownValueType(other.to_string())),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Integer => write!(f, "integer"),
            ValueType::Float => write!(f, "float"),
        }
    }
}

/// Source of clipped, simplified region geometry.
pub trait SpatialBackend {
    /// Regions intersecting `query.bbox`, in stable display order.
    ///
    /// Only polygonal intersections are returned.
    fn query_regions(&mut self, query: &RegionQuery) -> Result<Vec<RegionRow>, BackendError>;
}

/// Source of yearly indicator values.
pub trait StatisticsStore {
    /// Every statistic row for the given regions.
    fn query_statistics(&mut self, region_ids: &[RegionId]) -> Result<Vec<StatRow>, BackendError>;
}

/// A scoped backend session serving both query kinds.
pub trait BackendSession: SpatialBackend + StatisticsStore {}

impl<T: SpatialBackend + StatisticsStore> BackendSession for T {}

/// Opens backend sessions, one per render.
///
/// Implementations must be thread-safe: a server renders several tiles
/// concurrently, each through its own session.
pub trait BackendConnector: Send + Sync {
    type Session: BackendSession;

    fn open_session(&self) -> Result<Self::Session, BackendError>;
}
