//! Assembled regions and the per-tile result.
//!
//! A [`TileData`] is created fresh for every render and holds the regions
//! intersecting one tile, in the spatial backend's display order, each with
//! its merged [`Statistics`].

mod statistics;

pub use statistics::{
    StatValue, StatisticEntry, StatisticKey, Statistics, PLACEHOLDER_INDICATOR, PLACEHOLDER_YEAR,
};

use std::collections::HashMap;

use crate::backend::RegionId;
use crate::coord::Tile;

/// One region of a rendered tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Composite identifier `"<type>-<uid>"`.
    pub id: String,
    pub uid: String,
    pub name: String,
    pub region_type: String,
    /// Labels of the parent regions, outermost first.
    pub parents: Vec<String>,
    /// GeoJSON geometry text, passed through unmodified.
    pub geometry_geojson: String,
    pub geometry_svg: Option<String>,
    pub statistics: Statistics,
}

impl Region {
    /// Composite identifier of a region of `region_type` with `uid`.
    pub fn composite_id(region_type: &str, uid: &str) -> String {
        format!("{}-{}", region_type, uid)
    }
}

/// Regions and statistics of one rendered tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileData {
    tile: Tile,
    regions: Vec<Region>,
    /// Backend region id → position in `regions`.
    index: HashMap<RegionId, usize>,
    include_statistics: bool,
}

impl TileData {
    pub fn new(tile: Tile, include_statistics: bool) -> Self {
        Self {
            tile,
            regions: Vec::new(),
            index: HashMap::new(),
            include_statistics,
        }
    }

    /// Append a region, keeping it addressable by its backend id.
    pub fn push_region(&mut self, backend_id: RegionId, region: Region) {
        self.index.insert(backend_id, self.regions.len());
        self.regions.push(region);
    }

    /// Mutable access to the region returned for `backend_id`.
    pub fn region_mut(&mut self, backend_id: RegionId) -> Option<&mut Region> {
        let position = *self.index.get(&backend_id)?;
        self.regions.get_mut(position)
    }

    pub fn region(&self, backend_id: RegionId) -> Option<&Region> {
        self.index.get(&backend_id).map(|&i| &self.regions[i])
    }

    /// Backend ids of every region, in display order.
    pub fn backend_ids(&self) -> Vec<RegionId> {
        let mut ids: Vec<(usize, RegionId)> = self.index.iter().map(|(&id, &i)| (i, id)).collect();
        ids.sort_unstable();
        ids.into_iter().map(|(_, id)| id).collect()
    }

    pub fn tile(&self) -> &Tile {
        &self.tile
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Whether real statistics were requested for this render.
    pub fn include_statistics(&self) -> bool {
        self.include_statistics
    }
}
