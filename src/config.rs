// src/config.rs
use serde::Deserialize;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Yaml(String),
    UnknownCase(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Failed to read settings: {msg}"),
            ConfigError::Yaml(msg) => write!(f, "Invalid settings file: {msg}"),
            ConfigError::UnknownCase(name) => write!(f, "Unknown case name: {name}"),
        }
    }
}

impl Error for ConfigError {}

/// Settings file layout: one scrape target per case name.
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub target: HashMap<String, TargetConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Search-result URL for the case; the scraper appends `&page=N`.
    pub base_url: String,
    /// Columns whose tuple identifies one physical unit during grouping.
    #[serde(default = "default_group_cols")]
    pub group_cols: Vec<String>,
}

fn default_group_cols() -> Vec<String> {
    ["name", "price", "age", "layout", "area"]
        .map(String::from)
        .to_vec()
}

pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let text = fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
    serde_yaml::from_str(&text).map_err(|e| ConfigError::Yaml(e.to_string()))
}

impl Settings {
    pub fn target_for(&self, case_name: &str) -> Result<&TargetConfig, ConfigError> {
        self.target
            .get(case_name)
            .ok_or_else(|| ConfigError::UnknownCase(case_name.to_string()))
    }
}
