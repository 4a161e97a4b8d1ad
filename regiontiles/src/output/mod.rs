//! Serialization of rendered tiles.
//!
//! The only supported representation is a GeoJSON feature collection. Each
//! region becomes one feature whose id is the region's composite id, whose
//! properties carry the name, type, uid, parent labels and statistics, and
//! whose geometry is the backend's GeoJSON embedded verbatim.
//!
//! ```json
//! {
//!   "type": "FeatureCollection",
//!   "features": [{
//!     "type": "Feature",
//!     "id": "Division-2466",
//!     "properties": {
//!       "name": "Montreal",
//!       "type": "Division",
//!       "uid": "2466",
//!       "parents": ["Province-24"],
//!       "statistics": {"2011": {"Population": {"value": 1886481}}}
//!     },
//!     "geometry": {"type": "Polygon", "coordinates": [...]}
//!   }]
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::value::RawValue;
use thiserror::Error;

use crate::region::{Region, StatisticEntry, TileData};

/// Errors raised while encoding a tile.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The requested format is not supported.
    #[error("Unsupported output format '{0}'")]
    UnsupportedFormat(String),

    /// A region's geometry text is not valid JSON.
    #[error("Region {id} has invalid geometry: {reason}")]
    InvalidGeometry { id: String, reason: String },

    /// JSON serialization failed.
    #[error("Failed to serialize tile: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Output representations of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// GeoJSON feature collection.
    Json,
}

impl OutputFormat {
    /// Format for a tile file extension such as `json` or `geojson`.
    pub fn from_extension(extension: &str) -> Result<Self, OutputError> {
        extension.trim_start_matches('.').parse()
    }

    /// MIME type of encoded tiles.
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" | "geojson" => Ok(OutputFormat::Json),
            _ => Err(OutputError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "JSON"),
        }
    }
}

#[derive(Serialize)]
struct FeatureCollection<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    features: Vec<Feature<'a>>,
}

#[derive(Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    id: &'a str,
    properties: Properties<'a>,
    geometry: &'a RawValue,
}

#[derive(Serialize)]
struct Properties<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    region_type: &'a str,
    uid: &'a str,
    parents: &'a [String],
    statistics: BTreeMap<i32, BTreeMap<&'a str, &'a StatisticEntry>>,
}

fn feature(region: &Region) -> Result<Feature<'_>, OutputError> {
    let geometry: &RawValue = serde_json::from_str(&region.geometry_geojson).map_err(|e| {
        OutputError::InvalidGeometry {
            id: region.id.clone(),
            reason: e.to_string(),
        }
    })?;

    Ok(Feature {
        kind: "Feature",
        id: &region.id,
        properties: Properties {
            name: &region.name,
            region_type: &region.region_type,
            uid: &region.uid,
            parents: &region.parents,
            statistics: region.statistics.by_year(),
        },
        geometry,
    })
}

/// Encode a rendered tile.
pub fn encode(data: &TileData, format: OutputFormat) -> Result<String, OutputError> {
    match format {
        OutputFormat::Json => {
            let features = data
                .regions()
                .iter()
                .map(feature)
                .collect::<Result<Vec<_>, _>>()?;
            let collection = FeatureCollection {
                kind: "FeatureCollection",
                features,
            };
            Ok(serde_json::to_string(&collection)?)
        }
    }
}

/// Encode a rendered tile in the format named by `format`.
pub fn encode_as(data: &TileData, format: &str) -> Result<String, OutputError> {
    encode(data, format.parse()?)
}
