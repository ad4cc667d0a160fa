//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::signal::DEFAULT_GAP_SIGMA;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    #[serde(default)]
    pub discovery: DiscoveryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Gap segmentation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentationConfig {
    /// Gaps above `mean + gap_sigma * std_dev` split the recording
    #[serde(default = "default_gap_sigma")]
    pub gap_sigma: f64,
}

fn default_gap_sigma() -> f64 {
    DEFAULT_GAP_SIGMA
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            gap_sigma: default_gap_sigma(),
        }
    }
}

/// Run discovery configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    /// File name marking one recorded run
    #[serde(default = "default_run_file_name")]
    pub run_file_name: String,

    /// Number of parent directories forming a run's tag
    #[serde(default = "default_tag_depth")]
    pub tag_depth: usize,

    /// Whether sample CSV files start with a header row
    #[serde(default = "default_has_header")]
    pub has_header: bool,
}

fn default_run_file_name() -> String {
    "eda.csv".to_string()
}

fn default_tag_depth() -> usize {
    3 // view kind / environment / trial
}

fn default_has_header() -> bool {
    true
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            run_file_name: default_run_file_name(),
            tag_depth: default_tag_depth(),
            has_header: default_has_header(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("split-eda").join("config.toml")),
            Some(PathBuf::from("./split-eda.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first readable file among `paths`, falling back to defaults
    ///
    /// Files that exist but fail to load are skipped with a warning.
    pub fn load_first<P: AsRef<Path>>(paths: &[P]) -> Self {
        for path in paths {
            let path_opt: &Path = path.as_ref();
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Segmentation overrides
        if let Ok(sigma) = std::env::var("SPLIT_EDA_GAP_SIGMA") {
            match parse_gap_sigma(&sigma) {
                Some(s) => self.segmentation.gap_sigma = s,
                None => tracing::warn!("Ignoring invalid SPLIT_EDA_GAP_SIGMA: {}", sigma),
            }
        }

        // Discovery overrides
        if let Ok(name) = std::env::var("SPLIT_EDA_RUN_FILE") {
            self.discovery.run_file_name = name;
        }
        if let Ok(depth) = std::env::var("SPLIT_EDA_TAG_DEPTH") {
            if let Ok(d) = depth.parse() {
                self.discovery.tag_depth = d;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("SPLIT_EDA_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("SPLIT_EDA_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// A finite, non-negative threshold multiplier
fn parse_gap_sigma(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite() && *s >= 0.0)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Split EDA Configuration
#
# Environment variables override these settings:
# - SPLIT_EDA_GAP_SIGMA
# - SPLIT_EDA_RUN_FILE
# - SPLIT_EDA_TAG_DEPTH
# - SPLIT_EDA_LOG_LEVEL
# - SPLIT_EDA_LOG_FORMAT

[segmentation]
# A gap between samples splits the recording when it exceeds
# mean + gap_sigma * std_dev of all gaps
gap_sigma = 3.0

[discovery]
# File name marking one recorded run
run_file_name = "eda.csv"

# Number of parent directories forming a run's tag,
# e.g. HMD/flat/1/eda.csv -> (HMD, flat, 1)
tag_depth = 3

# Whether sample CSV files start with a header row
has_header = true

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/split-eda/split-eda.log"
"#
    .to_string()
}
