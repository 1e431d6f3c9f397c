use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub input: Input,
    pub output: Output,
    pub anonymization: Anonymization,
    #[serde(default)]
    pub generalization: Vec<Generalization>,
    #[serde(default)]
    pub column: Vec<Column>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Input {
    pub path: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Output {
    pub path: String,
    /// Report file, or directory receiving a timestamped one
    pub report: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Anonymization {
    pub k: usize,
    pub quasi_identifiers: Vec<String>,
    #[serde(default)]
    pub drop_columns: Vec<String>,
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Generalization {
    pub column: String,
    pub rule: String,
    pub length: Option<usize>,
    pub decimals: Option<u32>,
    pub unknown: Option<String>,
    pub unknown_markers: Option<Vec<String>>,
    #[serde(default)]
    pub supersedes: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Column {
    pub name: String,
    pub datatype: String,
    pub format: Option<String>,
}

impl Config {
    /// Name shown in reports: `input.name`, or the input file stem.
    pub fn table_name(&self) -> String {
        self.input.name.clone().unwrap_or_else(|| {
            Path::new(&self.input.path)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.input.path.clone())
        })
    }
}

/// Resolve `path` against the directory holding the config file.
pub fn resolve_path(base_dir: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Read and parse a TOML config. Returns it with the directory paths resolve against.
pub fn parse_config(path: &Path) -> Result<(Config, PathBuf)> {
    let config_str = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(config_str.as_str())
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok((config, base_dir))
}
