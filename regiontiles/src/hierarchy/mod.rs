//! Region-type hierarchy partitioning.
//!
//! Region types form a parent → child graph (a province contains economic
//! regions, which contain divisions, ...), and a region type can sit under
//! more than one parent. A client resolving which regions contain a point
//! needs one grid per *layer*: a set of region types assigned together.
//!
//! [`partition`] splits the hierarchy into the fewest layers needed. The
//! longest root-to-leaf path becomes the first layer; every later path only
//! contributes the region types no earlier layer already holds. Paths fully
//! covered by earlier layers contribute nothing.
//!
//! ```text
//! Province → EconomicRegion → Division → DisseminationBlock   layer 0: all four
//! MetropolitanArea → Tract → DisseminationBlock               layer 1: {MetropolitanArea, Tract}
//! Province → Division → DisseminationBlock                    (covered)
//! Province → ElectoralRegion → DisseminationBlock             layer 2: {ElectoralRegion}
//! ```
//!
//! Paths of equal length are taken in lexicographic order of their region
//! type names, so the result does not depend on edge order.
//!
//! The layer set is built once per process from a stable dataset, so
//! [`LayerCache`] memoizes it behind a one-time initialization.

mod graph;

pub use graph::{HierarchyPath, RegionTypeGraph, TypeIndex};

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info};

use crate::backend::BackendError;

/// Errors produced while partitioning the region-type hierarchy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HierarchyError {
    /// The parent/child edges contain a cycle.
    #[error("Region type hierarchy contains a cycle: {}", .cycle.join(" -> "))]
    Cycle { cycle: Vec<String> },

    /// The edge list could not be loaded.
    #[error("Failed to load region type edges: {0}")]
    Source(#[from] BackendError),
}

/// One set of region types a client resolves with a single grid.
pub type Layer = BTreeSet<String>;

/// Ordered, pairwise-disjoint layers covering every region type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerSet {
    layers: Vec<Layer>,
    /// Length of the hierarchy path each layer was taken from.
    path_lengths: Vec<usize>,
}

impl LayerSet {
    /// Number of layers (grids a client must request).
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Index of the layer holding `region_type`.
    pub fn layer_of(&self, region_type: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.contains(region_type))
    }

    pub fn contains(&self, region_type: &str) -> bool {
        self.layer_of(region_type).is_some()
    }

    /// Length of the hierarchy path layer `index` was taken from.
    pub fn path_length(&self, index: usize) -> Option<usize> {
        self.path_lengths.get(index).copied()
    }

    /// Total number of region types across all layers.
    pub fn type_count(&self) -> usize {
        self.layers.iter().map(BTreeSet::len).sum()
    }
}

impl<'a> IntoIterator for &'a LayerSet {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

/// Sort paths longest first; equal lengths fall back to comparing names.
fn order_paths(paths: &mut [HierarchyPath]) {
    paths.sort_by(|a, b| (Reverse(a.len()), a).cmp(&(Reverse(b.len()), b)));
}

/// Partition the hierarchy described by `(parent, child)` edges into layers.
///
/// # Errors
///
/// Returns [`HierarchyError::Cycle`] if a region type is its own ancestor.
pub fn partition<P, C>(edges: &[(P, C)]) -> Result<LayerSet, HierarchyError>
where
    P: AsRef<str>,
    C: AsRef<str>,
{
    let graph = RegionTypeGraph::from_edges(edges.iter().map(|(p, c)| (p.as_ref(), c.as_ref())));
    partition_graph(&graph)
}

/// Partition an already built graph into layers.
pub fn partition_graph(graph: &RegionTypeGraph) -> Result<LayerSet, HierarchyError> {
    let mut paths = graph.hierarchy_paths()?;
    order_paths(&mut paths);

    let mut assigned: BTreeSet<&str> = BTreeSet::new();
    let mut layers = Vec::new();
    let mut path_lengths = Vec::new();

    for path in &paths {
        let remainder: Layer = path
            .iter()
            .filter(|t| !assigned.contains(t))
            .map(str::to_string)
            .collect();

        if remainder.is_empty() {
            continue;
        }

        assigned.extend(path.iter());
        layers.push(remainder);
        path_lengths.push(path.len());
    }

    debug!(
        region_types = graph.len(),
        paths = paths.len(),
        layers = layers.len(),
        "Partitioned region type hierarchy"
    );

    Ok(LayerSet {
        layers,
        path_lengths,
    })
}

/// Supplies the parent/child region-type edges.
///
/// In the deployed system this is a table of `(parent_region_type,
/// region_type)` rows.
pub trait RegionTypeSource: Send + Sync {
    fn region_type_edges(&self) -> Result<Vec<(String, String)>, BackendError>;
}

/// Memoizes one [`LayerSet`] for the lifetime of the cache.
///
/// The first successful call computes the layers; every later call returns
/// the same value without touching the source. Concurrent first callers
/// wait on an initialization lock so the layers are computed once. A failed
/// computation is not cached, so a later call retries.
#[derive(Debug, Default)]
pub struct LayerCache {
    layers: OnceLock<LayerSet>,
    init: Mutex<()>,
}

impl LayerCache {
    pub const fn new() -> Self {
        Self {
            layers: OnceLock::new(),
            init: parking_lot::const_mutex(()),
        }
    }

    /// The cached layers, if already computed.
    pub fn get(&self) -> Option<&LayerSet> {
        self.layers.get()
    }

    /// Return the cached layers, computing them from `source` on first use.
    pub fn get_or_compute(&self, source: &dyn RegionTypeSource) -> Result<&LayerSet, HierarchyError> {
        if let Some(layers) = self.layers.get() {
            return Ok(layers);
        }

        let _guard = self.init.lock();
        if let Some(layers) = self.layers.get() {
            return Ok(layers);
        }

        let edges = source.region_type_edges()?;
        let layers = partition(&edges)?;
        info!(
            edges = edges.len(),
            layers = layers.len(),
            "Region type layers computed"
        );

        Ok(self.layers.get_or_init(|| layers))
    }
}

static REGION_TYPE_LAYERS: LayerCache = LayerCache::new();

/// Process-wide region-type layers, computed from `source` on first use.
///
/// Later calls ignore `source` and return the layers computed first.
pub fn region_type_layers(source: &dyn RegionTypeSource) -> Result<&'static LayerSet, HierarchyError> {
    REGION_TYPE_LAYERS.get_or_compute(source)
}
