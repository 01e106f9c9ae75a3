use super::import::ImportLayout;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

const HOLDINGS_FILE: &str = "holdings.json";

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Location of the holdings document. Defaults to the platform data dir.
    #[serde(default)]
    pub data_path: Option<String>,
    #[serde(default)]
    pub import: ImportLayout,
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults
    /// when no config file has been set up yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("in", "codito", "mfdelta").context("Could not determine project directories")
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.yaml"))
    }

    pub fn holdings_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        Ok(Self::project_dirs()?.data_dir().join(HOLDINGS_FILE))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        // An empty document parses as null; treat it as all defaults
        if config_str.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
data_path: "/tmp/mf/holdings.json"
import:
  data_start_row: 9
  first_column: 1
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.data_path.as_deref(), Some("/tmp/mf/holdings.json"));
        assert_eq!(config.import.data_start_row, 9);
        assert_eq!(config.import.first_column, 1);
        assert_eq!(
            config.holdings_path().unwrap(),
            PathBuf::from("/tmp/mf/holdings.json")
        );
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("import:\n  first_column: 0\n").unwrap();
        assert!(config.data_path.is_none());
        assert_eq!(config.import.data_start_row, 7);
        assert_eq!(config.import.first_column, 0);

        let config: AppConfig = serde_yaml::from_str("data_path: holdings.json\n").unwrap();
        assert_eq!(config.import, ImportLayout::default());
    }

    #[test]
    fn test_load_empty_file_uses_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_rejects_unknown_shape() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "import: sideways\n").unwrap();
        let err = AppConfig::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
