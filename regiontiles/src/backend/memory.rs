//! In-process backend backed by a JSON fixture.
//!
//! Holds every region with a precomputed bounding box and area, so it can
//! honor the spatial backend contract (bbox intersection, area filtering,
//! polygonal geometry only, display ordering, coordinate rounding) without
//! a spatial database. Geometry is returned whole rather than clipped to
//! the tile.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{
    BackendConnector, BackendError, RegionId, RegionQuery, RegionRow, SpatialBackend, StatRow,
    StatisticsStore,
};
use crate::coord::BoundingBox;
use crate::hierarchy::RegionTypeSource;

/// A region as stored by the memory backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub id: RegionId,
    pub uid: String,
    #[serde(rename = "type")]
    pub region_type: String,
    pub name: String,
    #[serde(default)]
    pub parents: Vec<String>,
    /// Display order; lower positions are drawn first.
    #[serde(default)]
    pub position: i64,
    /// `[min_lon, min_lat, max_lon, max_lat]`
    pub bbox: [f64; 4],
    /// Area in square meters.
    pub area_m2: f64,
    #[serde(default)]
    pub is_island: bool,
    /// GeoJSON geometry object.
    pub geometry: Value,
    #[serde(default)]
    pub svg: Option<String>,
}

/// A statistic as stored by the memory backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticRecord {
    pub region_id: RegionId,
    pub indicator: String,
    pub year: i32,
    pub value_type: String,
    #[serde(default)]
    pub value_integer: Option<i64>,
    #[serde(default)]
    pub value_float: Option<f64>,
    #[serde(default)]
    pub note: Option<String>,
}

impl From<&StatisticRecord> for StatRow {
    fn from(record: &StatisticRecord) -> Self {
        StatRow {
            region_id: record.region_id,
            indicator: record.indicator.clone(),
            year: record.year,
            value_type: record.value_type.clone(),
            value_integer: record.value_integer,
            value_float: record.value_float,
            note: record.note.clone(),
        }
    }
}

/// Complete dataset served by a [`MemoryBackend`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    /// `(parent_region_type, region_type)` pairs.
    #[serde(default)]
    pub region_type_edges: Vec<(String, String)>,
    #[serde(default)]
    pub regions: Vec<RegionRecord>,
    #[serde(default)]
    pub statistics: Vec<StatisticRecord>,
}

/// Connector handing out sessions over a shared, immutable [`Fixture`].
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    data: Arc<Fixture>,
}

impl MemoryBackend {
    pub fn new(fixture: Fixture) -> Self {
        Self {
            data: Arc::new(fixture),
        }
    }

    /// Parse a fixture from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, BackendError> {
        let fixture: Fixture =
            serde_json::from_str(json).map_err(|e| BackendError::Data(e.to_string()))?;
        Ok(Self::new(fixture))
    }

    /// Load a fixture from a JSON file.
    pub fn load(path: &Path) -> Result<Self, BackendError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| BackendError::Data(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn fixture(&self) -> &Fixture {
        &self.data
    }
}

impl BackendConnector for MemoryBackend {
    type Session = MemorySession;

    fn open_session(&self) -> Result<MemorySession, BackendError> {
        Ok(MemorySession {
            data: Arc::clone(&self.data),
        })
    }
}

impl RegionTypeSource for MemoryBackend {
    fn region_type_edges(&self) -> Result<Vec<(String, String)>, BackendError> {
        Ok(self.data.region_type_edges.clone())
    }
}

/// One render's view of a [`MemoryBackend`].
#[derive(Debug)]
pub struct MemorySession {
    data: Arc<Fixture>,
}

fn is_polygonal(geometry: &Value) -> bool {
    matches!(
        geometry.get("type").and_then(Value::as_str),
        Some("Polygon") | Some("MultiPolygon")
    )
}

/// Round every number inside a GeoJSON `coordinates` tree.
fn round_coordinates(value: &Value, precision: u32) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| round_coordinates(item, precision))
                .collect(),
        ),
        Value::Number(n) => {
            let Some(x) = n.as_f64() else {
                return value.clone();
            };
            let scale = 10f64.powi(precision as i32);
            serde_json::Number::from_f64((x * scale).round() / scale)
                .map(Value::Number)
                .unwrap_or_else(|| value.clone())
        }
        other => other.clone(),
    }
}

fn rounded_geometry(geometry: &Value, precision: u32) -> Value {
    let mut rounded = geometry.clone();
    if let Some(coordinates) = geometry.get("coordinates") {
        rounded["coordinates"] = round_coordinates(coordinates, precision);
    }
    rounded
}

impl SpatialBackend for MemorySession {
    fn query_regions(&mut self, query: &RegionQuery) -> Result<Vec<RegionRow>, BackendError> {
        let mut matches: Vec<&RegionRecord> = self
            .data
            .regions
            .iter()
            .filter(|r| BoundingBox::from_bounds(r.bbox).intersects(&query.bbox))
            .filter(|r| {
                query
                    .area_filter
                    .map_or(true, |f| f.accepts(r.area_m2, r.is_island))
            })
            .filter(|r| is_polygonal(&r.geometry))
            .collect();

        matches.sort_by_key(|r| (r.position, r.id));

        debug!(
            candidates = self.data.regions.len(),
            matched = matches.len(),
            zoom = query.zoom,
            "Memory backend region query"
        );

        Ok(matches
            .into_iter()
            .map(|r| RegionRow {
                id: r.id,
                uid: r.uid.clone(),
                region_type: r.region_type.clone(),
                name: r.name.clone(),
                parents: Some(r.parents.join(",")),
                geometry_geojson: rounded_geometry(&r.geometry, query.precision).to_string(),
                geometry_svg: r.svg.clone(),
            })
            .collect())
    }
}

impl StatisticsStore for MemorySession {
    fn query_statistics(&mut self, region_ids: &[RegionId]) -> Result<Vec<StatRow>, BackendError> {
        Ok(self
            .data
            .statistics
            .iter()
            .filter(|s| region_ids.contains(&s.region_id))
            .map(StatRow::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolution::AreaFilter;
    use serde_json::json;

    fn square(min_lon: f64, min_lat: f64, size: f64) -> Value {
        json!({
            "type": "Polygon",
            "coordinates": [[
                [min_lon, min_lat],
                [min_lon + size, min_lat],
                [min_lon + size, min_lat + size],
                [min_lon, min_lat + size],
                [min_lon, min_lat]
            ]]
        })
    }

    fn region(id: RegionId, position: i64, bbox: [f64; 4], area_m2: f64) -> RegionRecord {
        RegionRecord {
            id,
            uid: format!("{}", id * 10),
            region_type: "Subdivision".to_string(),
            name: format!("Region {}", id),
            parents: vec!["Province-24".to_string()],
            position,
            bbox,
            area_m2,
            is_island: false,
            geometry: square(bbox[0], bbox[1], bbox[2] - bbox[0]),
            svg: None,
        }
    }

    fn query(bbox: [f64; 4], area_filter: Option<AreaFilter>) -> RegionQuery {
        RegionQuery {
            bbox: BoundingBox::from_bounds(bbox),
            zoom: 8,
            precision: 3,
            area_filter,
        }
    }

    fn backend(regions: Vec<RegionRecord>) -> MemoryBackend {
        MemoryBackend::new(Fixture {
            regions,
            ..Fixture::default()
        })
    }

    #[test]
    fn test_query_filters_by_bbox() {
        let backend = backend(vec![
            region(1, 0, [0.0, 0.0, 1.0, 1.0], 1e9),
            region(2, 1, [5.0, 5.0, 6.0, 6.0], 1e9),
        ]);
        let mut session = backend.open_session().unwrap();

        let rows = session
            .query_regions(&query([-1.0, -1.0, 2.0, 2.0], None))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 1);
    }

    #[test]
    fn test_query_orders_by_position() {
        let backend = backend(vec![
            region(1, 5, [0.0, 0.0, 1.0, 1.0], 1e9),
            region(2, 1, [0.0, 0.0, 1.0, 1.0], 1e9),
            region(3, 3, [0.0, 0.0, 1.0, 1.0], 1e9),
        ]);
        let mut session = backend.open_session().unwrap();

        let rows = session
            .query_regions(&query([-1.0, -1.0, 2.0, 2.0], None))
            .unwrap();
        let ids: Vec<RegionId> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_query_applies_area_filter() {
        let mut island = region(3, 2, [0.0, 0.0, 1.0, 1.0], 500.0);
        island.is_island = true;
        let backend = backend(vec![
            region(1, 0, [0.0, 0.0, 1.0, 1.0], 5000.0),
            region(2, 1, [0.0, 0.0, 1.0, 1.0], 500.0),
            island,
        ]);
        let mut session = backend.open_session().unwrap();
        let filter = AreaFilter {
            min_area: 1000,
            min_island_area: 100,
        };

        let rows = session
            .query_regions(&query([-1.0, -1.0, 2.0, 2.0], Some(filter)))
            .unwrap();
        let ids: Vec<RegionId> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_query_drops_non_polygonal_geometry() {
        let mut line = region(2, 1, [0.0, 0.0, 1.0, 1.0], 1e9);
        line.geometry = json!({"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]});
        let backend = backend(vec![region(1, 0, [0.0, 0.0, 1.0, 1.0], 1e9), line]);
        let mut session = backend.open_session().unwrap();

        let rows = session
            .query_regions(&query([-1.0, -1.0, 2.0, 2.0], None))
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_query_rounds_coordinates() {
        let mut record = region(1, 0, [0.0, 0.0, 1.0, 1.0], 1e9);
        record.geometry = square(0.123456, 0.987654, 0.5);
        let backend = backend(vec![record]);
        let mut session = backend.open_session().unwrap();

        let rows = session
            .query_regions(&query([-1.0, -1.0, 2.0, 2.0], None))
            .unwrap();
        let geometry: Value = serde_json::from_str(&rows[0].geometry_geojson).unwrap();
        assert_eq!(geometry["coordinates"][0][0], json!([0.123, 0.988]));
    }

    #[test]
    fn test_query_joins_parents() {
        let mut record = region(1, 0, [0.0, 0.0, 1.0, 1.0], 1e9);
        record.parents = vec!["Province-24".into(), "Division-2466".into()];
        let backend = backend(vec![record]);
        let mut session = backend.open_session().unwrap();

        let rows = session
            .query_regions(&query([-1.0, -1.0, 2.0, 2.0], None))
            .unwrap();
        assert_eq!(rows[0].parents.as_deref(), Some("Province-24,Division-2466"));
    }

    #[test]
    fn test_statistics_filtered_by_region() {
        let stat = |region_id| StatisticRecord {
            region_id,
            indicator: "Population".to_string(),
            year: 2011,
            value_type: "integer".to_string(),
            value_integer: Some(100),
            value_float: None,
            note: None,
        };
        let backend = MemoryBackend::new(Fixture {
            statistics: vec![stat(1), stat(2), stat(3)],
            ..Fixture::default()
        });
        let mut session = backend.open_session().unwrap();

        let rows = session.query_statistics(&[1, 3]).unwrap();
        let ids: Vec<RegionId> = rows.iter().map(|r| r.region_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_fixture_from_json() {
        let json = r#"{
            "region_type_edges": [["Province", "Division"]],
            "regions": [{
                "id": 7,
                "uid": "24",
                "type": "Province",
                "name": "Quebec",
                "bbox": [-79.8, 45.0, -57.1, 62.6],
                "area_m2": 1.5e12,
                "geometry": {"type": "Polygon", "coordinates": []}
            }],
            "statistics": []
        }"#;
        let backend = MemoryBackend::from_json_str(json).unwrap();

        assert_eq!(
            backend.region_type_edges().unwrap(),
            vec![("Province".to_string(), "Division".to_string())]
        );
        let region = &backend.fixture().regions[0];
        assert_eq!(region.region_type, "Province");
        assert!(region.parents.is_empty());
        assert!(!region.is_island);
    }

    #[test]
    fn test_fixture_invalid_json() {
        assert!(matches!(
            MemoryBackend::from_json_str("{ not json"),
            Err(BackendError::Data(_))
        ));
    }
}
