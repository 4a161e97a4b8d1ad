//! Integration tests for region-type layers.
//!
//! Run with: `cargo test --test hierarchy_integration`

use std::sync::Arc;
use std::thread;

use regiontiles::backend::MemoryBackend;
use regiontiles::hierarchy::{region_type_layers, Layer, LayerSet};

const CENSUS_FIXTURE: &str = include_str!("../../demos/census.json");

fn layer(types: &[&str]) -> Layer {
    types.iter().map(|t| t.to_string()).collect()
}

fn assert_census_layers(layers: &LayerSet) {
    assert_eq!(layers.len(), 3);
    assert_eq!(
        layers.get(0),
        Some(&layer(&[
            "Province",
            "EconomicRegion",
            "Division",
            "Subdivision",
            "DisseminationBlock",
        ]))
    );
    assert_eq!(layers.get(1), Some(&layer(&["MetropolitanArea", "Tract"])));
    assert_eq!(layers.get(2), Some(&layer(&["ElectoralDistrict"])));
    assert_eq!(layers.type_count(), 8);
}

// The process-wide cache can only be initialized once per test binary, so
// every assertion on it lives in this one test.
#[test]
fn test_process_wide_layers_from_fixture() {
    let backend = Arc::new(MemoryBackend::from_json_str(CENSUS_FIXTURE).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let backend = Arc::clone(&backend);
            thread::spawn(move || {
                let layers = region_type_layers(backend.as_ref()).unwrap();
                layers as *const LayerSet as usize
            })
        })
        .collect();
    let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(addresses.windows(2).all(|w| w[0] == w[1]));

    let layers = region_type_layers(backend.as_ref()).unwrap();
    assert_census_layers(layers);
    assert_eq!(layers.layer_of("Tract"), Some(1));
    assert_eq!(layers.path_length(0), Some(5));

    // Later calls return the cached layers whatever the source says
    let other = MemoryBackend::from_json_str(r#"{"region_type_edges": [["X", "Y"]]}"#).unwrap();
    let cached = region_type_layers(&other).unwrap();
    assert!(std::ptr::eq(cached, layers));
}
