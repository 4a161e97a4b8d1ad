//! INI parsing: the single place INI keys map to settings fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::coord::{MAX_ZOOM, MIN_ZOOM};

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_value<T: FromStr>(
    props: &Properties,
    section: &str,
    key: &str,
    reason: &str,
) -> Result<Option<T>, ConfigFileError> {
    match props.get(key) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(section, key, v, reason)),
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// Parse an `Ini` into a `ConfigFile`, overlaying values onto the defaults.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [render] section
    if let Some(section) = ini.section(Some("render")) {
        if let Some(size) =
            parse_value::<u32>(section, "render", "tile_size", "must be a positive integer")?
        {
            if size == 0 {
                return Err(invalid("render", "tile_size", "0", "must be a positive integer"));
            }
            config.render.tile_size = size;
        }

        if let Some(zoom) = parse_value::<u8>(
            section,
            "render",
            "detail_zoom",
            "must be an integer zoom level",
        )? {
            if !(MIN_ZOOM..=MAX_ZOOM + 1).contains(&zoom) {
                return Err(invalid(
                    "render",
                    "detail_zoom",
                    &zoom.to_string(),
                    &format!("must be between {} and {}", MIN_ZOOM, MAX_ZOOM + 1),
                ));
            }
            config.render.detail_zoom = zoom;
        }

        if let Some(padding) =
            parse_value::<f64>(section, "render", "padding", "must be a number")?
        {
            if !(0.0..=0.5).contains(&padding) {
                return Err(invalid(
                    "render",
                    "padding",
                    &padding.to_string(),
                    "must be between 0 and 0.5",
                ));
            }
            config.render.padding = padding;
        }

        if let Some(v) = section.get("include_statistics") {
            config.render.include_statistics = parse_bool(v)
                .ok_or_else(|| invalid("render", "include_statistics", v, "must be true or false"))?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
        if let Some(v) = section.get("filter") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.filter = v.to_string();
            }
        }
    }

    Ok(config)
}

/// Expand a leading `~` to the home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ConfigFile, ConfigFileError> {
        let ini = Ini::load_from_str(text).unwrap();
        parse_ini(&ini)
    }

    #[test]
    fn test_empty_ini_gives_defaults() {
        assert_eq!(parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_render_section_overrides() {
        let config = parse(
            "[render]\ntile_size = 512\ndetail_zoom = 13\npadding = 0.05\ninclude_statistics = no\n",
        )
        .unwrap();

        assert_eq!(config.render.tile_size, 512);
        assert_eq!(config.render.detail_zoom, 13);
        assert_eq!(config.render.padding, 0.05);
        assert!(!config.render.include_statistics);
    }

    #[test]
    fn test_logging_section_overrides() {
        let config =
            parse("[logging]\ndirectory = /var/log/regiontiles\nfile = tiles.log\nfilter = debug\n")
                .unwrap();

        assert_eq!(config.logging.directory, PathBuf::from("/var/log/regiontiles"));
        assert_eq!(config.logging.file, "tiles.log");
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn test_blank_logging_values_keep_defaults() {
        let config = parse("[logging]\nfile =\nfilter =   \n").unwrap();
        assert_eq!(config.logging.file, "regiontiles.log");
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_invalid_tile_size() {
        match parse("[render]\ntile_size = big\n") {
            Err(ConfigFileError::InvalidValue { section, key, value, .. }) => {
                assert_eq!(section, "render");
                assert_eq!(key, "tile_size");
                assert_eq!(value, "big");
            }
            other => panic!("expected invalid value, got {:?}", other),
        }
        assert!(parse("[render]\ntile_size = 0\n").is_err());
    }

    #[test]
    fn test_invalid_detail_zoom() {
        assert!(parse("[render]\ndetail_zoom = 0\n").is_err());
        assert!(parse("[render]\ndetail_zoom = 40\n").is_err());
        assert!(parse("[render]\ndetail_zoom = 21\n").is_ok());
    }

    #[test]
    fn test_invalid_padding() {
        assert!(parse("[render]\npadding = -0.1\n").is_err());
        assert!(parse("[render]\npadding = wide\n").is_err());
    }

    #[test]
    fn test_invalid_bool() {
        assert!(parse("[render]\ninclude_statistics = maybe\n").is_err());
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/logs"), home.join("logs"));
        }
    }
}
