//! Configuration for the `sd` command

use eyre::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Base styles file
    #[serde(default = "default_styles_path")]
    pub styles_path: PathBuf,

    /// User-editable styles file, overrides the base file
    #[serde(default = "default_user_styles_path")]
    pub user_styles_path: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default)]
    pub log_level: Option<String>,
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("styledb")
}

fn default_styles_path() -> PathBuf {
    data_dir().join("styles.csv")
}

fn default_user_styles_path() -> PathBuf {
    data_dir().join("user_styles.csv")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            styles_path: default_styles_path(),
            user_styles_path: default_user_styles_path(),
            log_level: None,
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::from_file(config_path);
        }

        // Try default locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("styledb").join("config.yml")),
            Some(PathBuf::from("styledb.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Ok(Config::default())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).context(format!("Failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&content).context(format!("Invalid config file: {}", path.display()))
    }
}
