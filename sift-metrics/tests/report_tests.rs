//! Integration tests for metrics report assembly and export

use serde_json::Value;
use sift_common::state::{ReviewLog, ReviewedRecord};
use sift_common::Axes;
use sift_metrics::{compute_metrics, export_reports, MetricValue, MetricsReport, MetricsSettings};
use tempfile::TempDir;

fn record(record_id: i64, label: u8, prior: bool) -> ReviewedRecord {
    ReviewedRecord {
        record_id,
        label,
        query_strategy: Some(if prior { "prior" } else { "max" }.to_string()),
        classifier: Some("nb".to_string()),
        feature_extraction: Some("tfidf".to_string()),
        balance_strategy: Some("double".to_string()),
    }
}

/// 2 priors plus 8 screened records; the truncated log stops after the
/// last relevant record
fn full_and_truncated() -> (ReviewLog, ReviewLog) {
    let screened: [u8; 8] = [0, 1, 1, 0, 1, 0, 0, 0];
    let mut records = vec![record(50, 1, true), record(51, 0, true)];
    records.extend(
        screened
            .iter()
            .enumerate()
            .map(|(i, &l)| record(i as i64 + 10, l, false)),
    );
    let truncated = records[..7].to_vec();
    (
        ReviewLog::new(10, records).unwrap(),
        ReviewLog::new(10, truncated).unwrap(),
    )
}

#[test]
fn test_truncated_and_completed_reports_identical() {
    let (full, truncated) = full_and_truncated();

    for priors in [false, true] {
        for axes in [Axes::relative(), Axes::absolute(), Axes::new(true, false)] {
            let settings = MetricsSettings {
                priors,
                axes,
                ..MetricsSettings::default()
            };
            let a = compute_metrics(&full, &settings).unwrap();
            let b = compute_metrics(&truncated, &settings).unwrap();
            assert_eq!(a, b, "priors={} axes={:?}", priors, axes);
        }
    }
}

#[test]
fn test_recall_values_in_report() {
    let log = ReviewLog::from_labels(4, &[1, 1, 1, 0]).unwrap();
    let settings = MetricsSettings {
        recall: vec![0.5, 1.0],
        ..MetricsSettings::default()
    };
    let report = compute_metrics(&log, &settings).unwrap();

    match &report.item("recall").unwrap().value {
        MetricValue::Pairs(values) => {
            assert_eq!(values.len(), 2);
            assert_eq!(values[0].0, 0.5);
            assert!((values[0].1 - 2.0 / 3.0).abs() < 1e-9);
            assert_eq!(values[1], (1.0, 1.0));
        }
        other => panic!("unexpected recall value {:?}", other),
    }
}

#[test]
fn test_time_to_discovery_excludes_priors() {
    let (full, _) = full_and_truncated();
    let report = compute_metrics(&full, &MetricsSettings::default()).unwrap();
    assert_eq!(
        report.item("td").unwrap().value,
        MetricValue::Discoveries(vec![(11, 2), (12, 3), (14, 5)])
    );

    let with_priors = MetricsSettings {
        priors: true,
        ..MetricsSettings::default()
    };
    let report = compute_metrics(&full, &with_priors).unwrap();
    assert_eq!(
        report.item("td").unwrap().value,
        MetricValue::Discoveries(vec![(50, 1), (11, 4), (12, 5), (14, 7)])
    );
}

#[test]
fn test_json_schema() {
    let log = ReviewLog::from_labels(5, &[1, 0, 1, 1, 0]).unwrap();
    let report = compute_metrics(&log, &MetricsSettings::default()).unwrap();
    let json: Value = serde_json::to_value(&report).unwrap();

    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 11);

    assert_eq!(items[0]["id"], "recall");
    assert_eq!(items[0]["title"], "Recall");
    assert_eq!(items[0]["value"].as_array().unwrap().len(), 5);
    assert_eq!(items[0]["value"][0].as_array().unwrap().len(), 2);

    assert_eq!(items[2]["id"], "loss");
    assert!(items[2]["value"].is_number());

    assert_eq!(items[3]["title"], "Extra Relevant record Found");
    assert_eq!(items[5]["value"][0], serde_json::json!([0, 1]));
    assert_eq!(items[10]["title"], "True Negative Rate (Specificity)");
}

#[test]
fn test_export_single_report_as_object() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.json");
    let log = ReviewLog::from_labels(5, &[1, 0, 1, 1, 0]).unwrap();
    let report = compute_metrics(&log, &MetricsSettings::default()).unwrap();

    export_reports(std::slice::from_ref(&report), &path).unwrap();

    let imported = MetricsReport::import_json(&path).unwrap();
    assert_eq!(imported.version, report.version);
    let ids: Vec<&str> = imported.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["recall", "wss", "loss", "erf", "atd", "td", "tp", "fp", "tn", "fn", "tnr"]
    );
    assert_eq!(imported.item("td"), report.item("td"));
}

#[test]
fn test_export_several_reports_as_array() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reports.json");
    let (full, truncated) = full_and_truncated();
    let reports = vec![
        compute_metrics(&full, &MetricsSettings::default()).unwrap(),
        compute_metrics(&truncated, &MetricsSettings::default()).unwrap(),
    ];

    export_reports(&reports, &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let json: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[test]
fn test_non_finite_threshold_fails() {
    let log = ReviewLog::from_labels(4, &[1, 0, 1, 0]).unwrap();
    let settings = MetricsSettings {
        wss: vec![f64::NAN],
        ..MetricsSettings::default()
    };
    assert!(compute_metrics(&log, &settings).is_err());
}
