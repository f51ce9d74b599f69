//! Configuration loading and config file resolution
//!
//! **Purpose:** Defaults for metric thresholds, axis modes, plot layout and
//! logging, read from an optional `sift.toml`.
//!
//! # Config File Resolution
//!
//! 1. Command-line argument (`--config`)
//! 2. Environment variable (`SIFT_CONFIG`)
//! 3. User config file (`<config dir>/sift/config.toml`), when present
//! 4. Built-in defaults
//!
//! A file named explicitly (1 or 2) must exist and parse.

use crate::curves::Axes;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "SIFT_CONFIG";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiftConfig {
    #[serde(default)]
    pub metrics: MetricsConfig,

    #[serde(default)]
    pub axes: AxesConfig,

    #[serde(default)]
    pub plot: PlotConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Thresholds reported by the metrics tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Recall thresholds (records screened)
    #[serde(default = "default_recall")]
    pub recall: Vec<f64>,

    /// WSS thresholds (recall levels)
    #[serde(default = "default_wss")]
    pub wss: Vec<f64>,

    /// ERF thresholds (records screened)
    #[serde(default = "default_erf")]
    pub erf: Vec<f64>,

    /// Confusion-matrix thresholds (recall levels)
    #[serde(default = "default_cm")]
    pub cm: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            recall: default_recall(),
            wss: default_wss(),
            erf: default_erf(),
            cm: default_cm(),
        }
    }
}

/// Axis modes and prior handling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxesConfig {
    /// Include prior records in the label sequence
    #[serde(default)]
    pub priors: bool,

    #[serde(default)]
    pub x_absolute: bool,

    #[serde(default)]
    pub y_absolute: bool,
}

impl AxesConfig {
    pub fn axes(&self) -> Axes {
        Axes::new(self.x_absolute, self.y_absolute)
    }
}

/// Plot layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Image width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Image height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_true")]
    pub show_random: bool,

    #[serde(default = "default_true")]
    pub show_optimal: bool,

    #[serde(default)]
    pub show_legend: bool,

    /// Legend label source: "filename", "model" or "classifier"
    #[serde(default = "default_legend")]
    pub legend: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            show_random: true,
            show_optimal: true,
            show_legend: false,
            legend: default_legend(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_recall() -> Vec<f64> {
    vec![0.1, 0.25, 0.5, 0.75, 0.9]
}

fn default_wss() -> Vec<f64> {
    vec![0.95]
}

fn default_erf() -> Vec<f64> {
    vec![0.10]
}

fn default_cm() -> Vec<f64> {
    vec![0.1, 0.25, 0.5, 0.75, 0.9]
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_true() -> bool {
    true
}

fn default_legend() -> String {
    "filename".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl SiftConfig {
    /// Parse TOML content
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SiftConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the config file and load it, falling back to defaults
    pub fn load(cli_arg: Option<&Path>) -> Result<Self> {
        match resolve_config_path(cli_arg)? {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Reject non-finite thresholds and empty plot dimensions
    pub fn validate(&self) -> Result<()> {
        let lists = [
            ("recall", &self.metrics.recall),
            ("wss", &self.metrics.wss),
            ("erf", &self.metrics.erf),
            ("cm", &self.metrics.cm),
        ];
        for (name, values) in lists {
            if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
                return Err(Error::Config(format!(
                    "metrics.{} contains non-finite threshold {}",
                    name, bad
                )));
            }
        }
        if self.plot.width == 0 || self.plot.height == 0 {
            return Err(Error::Config(format!(
                "plot size must be non-zero, got {}x{}",
                self.plot.width, self.plot.height
            )));
        }
        Ok(())
    }
}

/// Config file to read, if any
///
/// # Returns
/// `Some(path)` for an explicit or existing user file, `None` for defaults
///
/// # Errors
/// `Config` when an explicitly named file does not exist
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Result<Option<PathBuf>> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return explicit_path(path.to_path_buf(), "--config");
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return explicit_path(PathBuf::from(path), CONFIG_ENV_VAR);
        }
    }

    // Priority 3: user config directory
    Ok(user_config_path().filter(|p| p.exists()))
}

fn explicit_path(path: PathBuf, origin: &str) -> Result<Option<PathBuf>> {
    if path.exists() {
        Ok(Some(path))
    } else {
        Err(Error::Config(format!(
            "Config file not found: {} (from {})",
            path.display(),
            origin
        )))
    }
}

/// `<config dir>/sift/config.toml` for the platform
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sift").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SiftConfig::default();
        assert_eq!(config.metrics.recall, vec![0.1, 0.25, 0.5, 0.75, 0.9]);
        assert_eq!(config.metrics.wss, vec![0.95]);
        assert_eq!(config.metrics.erf, vec![0.10]);
        assert_eq!(config.plot.width, 800);
        assert_eq!(config.plot.height, 600);
        assert!(config.plot.show_random);
        assert!(!config.plot.show_legend);
        assert_eq!(config.plot.legend, "filename");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.axes.axes(), Axes::relative());
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = SiftConfig::from_toml_str("").unwrap();
        assert_eq!(config, SiftConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = SiftConfig::from_toml_str(
            r#"
            [metrics]
            wss = [0.9, 0.95]

            [axes]
            x_absolute = true

            [plot]
            show_optimal = false
            legend = "model"
            "#,
        )
        .unwrap();

        assert_eq!(config.metrics.wss, vec![0.9, 0.95]);
        assert_eq!(config.metrics.recall, default_recall());
        assert!(config.axes.x_absolute);
        assert!(!config.axes.y_absolute);
        assert!(!config.plot.show_optimal);
        assert!(config.plot.show_random);
        assert_eq!(config.plot.legend, "model");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        assert!(matches!(
            SiftConfig::from_toml_str("[metrics]\nrecall = \"nope\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_zero_plot_size_rejected() {
        assert!(SiftConfig::from_toml_str("[plot]\nwidth = 0").is_err());
    }

    #[test]
    fn test_cli_path_must_exist() {
        let missing = Path::new("/nonexistent/sift/config.toml");
        assert!(matches!(
            resolve_config_path(Some(missing)),
            Err(Error::Config(_))
        ));
    }
}
