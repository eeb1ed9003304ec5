use crate::error::{CatalogError, Result};
use crate::registry::RegistryConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct RuntimeConfig {
    pub input: PathBuf,
    /// Public operation name, e.g. `"Canny Edge Detection"`.
    pub operation: String,
    #[serde(default)]
    pub registry: RegistryConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Container is picked from the extension; BMP when unknown.
    pub image: PathBuf,
    /// Optional JSON execution summary.
    #[serde(default)]
    pub report_json: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig> {
    let data = fs::read_to_string(path)
        .map_err(|e| CatalogError::Io(format!("failed to read config {}: {e}", path.display())))?;
    parse_config(&data)
        .map_err(|e| CatalogError::Config(format!("failed to parse config {}: {e}", path.display())))
}

fn parse_config(data: &str) -> std::result::Result<RuntimeConfig, serde_json::Error> {
    serde_json::from_str(data)
}
