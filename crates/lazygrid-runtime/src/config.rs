use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_overscan() -> usize {
    3
}

fn default_page_size() -> usize {
    20
}

fn default_ttl_seconds() -> u64 {
    300
}

fn default_enabled() -> bool {
    true
}

fn default_load_threshold() -> f64 {
    200.0
}

/// Grid configuration.
///
/// `row_height` has no sensible default and must always be supplied; the
/// remaining options default to values that suit a typical record browser.
/// Durations are carried as whole seconds so the struct round-trips through
/// TOML config files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Fixed row height in pixels; must be positive and finite
    pub row_height: f64,
    /// Extra rows materialized beyond each edge of the viewport
    #[serde(default = "default_overscan")]
    pub overscan: usize,
    /// Rows requested per page fetch
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Result cache time-to-live
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    #[serde(default = "default_enabled")]
    pub enable_sorting: bool,
    #[serde(default = "default_enabled")]
    pub enable_column_visibility: bool,
    /// Pixel margin before the physical end at which the sentinel fires
    #[serde(default = "default_load_threshold")]
    pub load_threshold: f64,
}

impl GridConfig {
    pub fn new(row_height: f64) -> Self {
        Self {
            row_height,
            overscan: default_overscan(),
            page_size: default_page_size(),
            ttl_seconds: default_ttl_seconds(),
            enable_sorting: default_enabled(),
            enable_column_visibility: default_enabled(),
            load_threshold: default_load_threshold(),
        }
    }

    /// Load configuration from a TOML file. The file must provide at least
    /// `row_height`; everything else falls back to defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GridConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.ttl_seconds as i64)
    }

    /// Fail fast on configuration that would otherwise surface as silent
    /// miscomputation deep inside the windowing math.
    pub fn validate(&self) -> Result<()> {
        if !self.row_height.is_finite() || self.row_height <= 0.0 {
            return Err(Error::Config(format!(
                "row_height must be a positive number, got {}",
                self.row_height
            )));
        }
        if self.page_size == 0 {
            return Err(Error::Config("page_size must be at least 1".to_string()));
        }
        if !self.load_threshold.is_finite() || self.load_threshold < 0.0 {
            return Err(Error::Config(format!(
                "load_threshold must be non-negative, got {}",
                self.load_threshold
            )));
        }
        Ok(())
    }
}
