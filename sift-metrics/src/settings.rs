//! Thresholds and axis modes for a metrics run

use serde::{Deserialize, Serialize};
use sift_common::config::SiftConfig;
use sift_common::Axes;

/// What to compute and how to scale it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSettings {
    /// Recall thresholds (records screened)
    pub recall: Vec<f64>,

    /// WSS thresholds (recall levels)
    pub wss: Vec<f64>,

    /// ERF thresholds (records screened)
    pub erf: Vec<f64>,

    /// Confusion-matrix thresholds (recall levels)
    pub cm: Vec<f64>,

    /// Include prior records in the label sequence
    pub priors: bool,

    pub axes: Axes,
}

impl MetricsSettings {
    /// Settings taken from the loaded configuration
    pub fn from_config(config: &SiftConfig) -> Self {
        Self {
            recall: config.metrics.recall.clone(),
            wss: config.metrics.wss.clone(),
            erf: config.metrics.erf.clone(),
            cm: config.metrics.cm.clone(),
            priors: config.axes.priors,
            axes: config.axes.axes(),
        }
    }
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self::from_config(&SiftConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_follow_config_defaults() {
        let settings = MetricsSettings::default();
        assert_eq!(settings.recall, vec![0.1, 0.25, 0.5, 0.75, 0.9]);
        assert_eq!(settings.wss, vec![0.95]);
        assert_eq!(settings.erf, vec![0.10]);
        assert_eq!(settings.cm, vec![0.1, 0.25, 0.5, 0.75, 0.9]);
        assert!(!settings.priors);
        assert_eq!(settings.axes, Axes::relative());
    }

    #[test]
    fn test_settings_from_config_axes() {
        let config = SiftConfig::from_toml_str("[axes]\npriors = true\ny_absolute = true\n").unwrap();
        let settings = MetricsSettings::from_config(&config);
        assert!(settings.priors);
        assert_eq!(settings.axes, Axes::new(false, true));
    }
}
