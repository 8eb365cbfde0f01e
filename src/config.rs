use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level run configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CusumConfig {
    /// Time-series input.
    pub input: InputToml,

    /// Output location.
    pub output: OutputToml,

    /// Historical period.
    pub period: PeriodToml,

    /// Detection settings.
    #[serde(default)]
    pub detect: DetectToml,

    /// Execution settings.
    #[serde(default)]
    pub run: RunToml,
}

impl CusumConfig {
    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse config: {}", path.display()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputToml {
    pub folder: PathBuf,
    #[serde(default)]
    pub tiles: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputToml {
    pub dir: PathBuf,
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_file_name() -> String {
    "cumsum_results.tif".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeriodToml {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectToml {
    #[serde(default = "default_bootstraps")]
    pub bootstraps: usize,
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    #[serde(default)]
    pub area_threshold: bool,
    #[serde(default)]
    pub seed: u64,
}

impl Default for DetectToml {
    fn default() -> Self {
        Self {
            bootstraps: default_bootstraps(),
            confidence_threshold: default_confidence_threshold(),
            area_threshold: false,
            seed: 0,
        }
    }
}

fn default_bootstraps() -> usize {
    1000
}
fn default_confidence_threshold() -> f32 {
    0.15
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunToml {
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default = "default_block_size")]
    pub block_size: usize,
}

impl Default for RunToml {
    fn default() -> Self {
        Self {
            workers: None,
            block_size: default_block_size(),
        }
    }
}

fn default_block_size() -> usize {
    256
}
