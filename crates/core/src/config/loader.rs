//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::Path;

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed schema (defaults when no file was found)
    pub schema: ConfigSchema,
    /// Path the configuration was loaded from, if any
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// With an explicit path the file must exist; otherwise standard locations
    /// are searched and absence falls back to defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = path.map(String::from).or_else(find_config_file);

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }
}

/// Find a configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = [
        ".barbergo-tools.toml",
        "barbergo-tools.toml",
        ".config/barbergo-tools.toml",
    ];

    candidates
        .into_iter()
        .find(|candidate| Path::new(candidate).exists())
        .map(String::from)
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read config file {}: {}", path, e)))?;

    toml::from_str(&content)
        .map_err(Error::from)
        .context(format!("While parsing {}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_without_file() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.schema.project.signing_properties, "key.properties");
    }

    #[test]
    fn test_config_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("barbergo-tools.toml");
        std::fs::write(&path, "[project]\nandroid_dir = \"mobile/android\"\n").unwrap();

        let config = Config::load(path.to_str()).unwrap();
        assert_eq!(config.schema.project.android_dir, "mobile/android");
        assert!(config.path.is_some());
    }

    #[test]
    fn test_config_load_bad_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("barbergo-tools.toml");
        std::fs::write(&path, "[project\n").unwrap();

        assert!(Config::load(path.to_str()).is_err());
    }

    #[test]
    fn test_config_load_explicit_missing_file_is_error() {
        assert!(Config::load(Some("/nonexistent/barbergo-tools.toml")).is_err());
    }
}
