//! Serialization of `ConfigFile` to a commented INI string.

use super::settings::ConfigFile;

/// Render `config` as the text written to `config.ini`.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[render]
; Tile edge length in pixels
tile_size = {}
; Zoom level from which every region is rendered regardless of its area
detail_zoom = {}
; Bounding box padding per side, as a fraction of a tile
padding = {}
; Query the statistics store for each tile (false writes placeholders)
include_statistics = {}

[logging]
directory = {}
file = {}
; Log filter used when RUST_LOG is not set (e.g. info, regiontiles=debug)
filter = {}
"#,
        config.render.tile_size,
        config.render.detail_zoom,
        config.render.padding,
        config.render.include_statistics,
        config.logging.directory.display(),
        config.logging.file,
        config.logging.filter,
    )
}
