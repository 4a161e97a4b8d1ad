//! `init` command: write a default config file.

use std::path::Path;

use regiontiles::config::ConfigFile;

use crate::error::CliError;

pub fn run(path: &Path) -> Result<(), CliError> {
    let existed = path.exists();
    ConfigFile::ensure_exists(path).map_err(CliError::Config)?;

    if existed {
        println!("Config file already exists: {}", path.display());
    } else {
        println!("Wrote default config: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_config() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");

        run(&path).unwrap();

        assert_eq!(ConfigFile::load_from(&path).unwrap(), ConfigFile::default());
    }
}
