//! Legend labels for overlaid reviews

use crate::error::PlotError;
use sift_common::state::LabelSource;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// Where a review's legend label comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LegendOption {
    /// State file name without extension
    #[default]
    Filename,
    /// "classifier - feature_extraction - balance_strategy - query_strategy"
    Model,
    /// Classifier name
    Classifier,
}

impl LegendOption {
    /// Label for the review loaded from `path`
    ///
    /// Falls back to the file name when the review records no model settings.
    pub fn label<S: LabelSource + ?Sized>(&self, path: &Path, source: &S) -> String {
        let filename = || {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        };

        match self {
            LegendOption::Filename => filename(),
            LegendOption::Model | LegendOption::Classifier => match source.settings() {
                Some(settings) if *self == LegendOption::Model => settings.model_name(),
                Some(settings) => settings.classifier,
                None => {
                    warn!(
                        "No model settings in {}, using file name as legend",
                        path.display()
                    );
                    filename()
                }
            },
        }
    }
}

impl FromStr for LegendOption {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "filename" => Ok(LegendOption::Filename),
            "model" => Ok(LegendOption::Model),
            "classifier" => Ok(LegendOption::Classifier),
            other => Err(PlotError::InvalidOption(format!(
                "unknown legend option '{}' (expected filename, model or classifier)",
                other
            ))),
        }
    }
}

impl fmt::Display for LegendOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LegendOption::Filename => "filename",
            LegendOption::Model => "model",
            LegendOption::Classifier => "classifier",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_common::state::ReviewLog;

    const LOG: &str = r#"{"n_records": 4, "results": [
        {"record_id": 0, "label": 1, "query_strategy": "prior"},
        {"record_id": 1, "label": 0, "query_strategy": "max", "classifier": "logistic",
         "feature_extraction": "tfidf", "balance_strategy": "double"}
    ]}"#;

    #[test]
    fn test_parse_legend_option() {
        assert_eq!("filename".parse::<LegendOption>().unwrap(), LegendOption::Filename);
        assert_eq!("Model".parse::<LegendOption>().unwrap(), LegendOption::Model);
        assert_eq!("classifier".parse::<LegendOption>().unwrap(), LegendOption::Classifier);
        assert!("colour".parse::<LegendOption>().is_err());
    }

    #[test]
    fn test_labels() {
        let log = ReviewLog::from_json_str(LOG).unwrap();
        let path = Path::new("/runs/sim_3.sqlite");

        assert_eq!(LegendOption::Filename.label(path, &log), "sim_3");
        assert_eq!(
            LegendOption::Model.label(path, &log),
            "logistic - tfidf - double - max"
        );
        assert_eq!(LegendOption::Classifier.label(path, &log), "logistic");
    }

    #[test]
    fn test_label_falls_back_to_filename() {
        let log = ReviewLog::from_labels(2, &[1, 0]).unwrap();
        let path = Path::new("review.json");
        assert_eq!(LegendOption::Model.label(path, &log), "review");
    }
}
