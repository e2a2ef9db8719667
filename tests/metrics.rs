//! Tests for the metrics module.

use anyhow::Result;
use ironbrc::metrics::{CounterMetric, GaugeMetric, MetricsCollector};
use ironbrc::testing::*;
use ironbrc::{ExecMode, RunConfig, Runner};
use serde_json::json;

#[test]
fn test_counter_metric() {
    let mut collector = MetricsCollector::new();
    collector.register(Box::new(CounterMetric::with_value("test_counter", 5)));

    let snapshot = collector.snapshot();
    assert_eq!(snapshot.get("test_counter").unwrap(), &json!(5));
}

#[test]
fn test_gauge_metric() {
    let mut collector = MetricsCollector::new();
    collector.register(Box::new(
        GaugeMetric::new("test_gauge", 42.5).with_description("Test gauge"),
    ));

    let json = collector.to_json();
    assert_eq!(json["test_gauge"]["value"], json!(42.5));
    assert_eq!(json["test_gauge"]["description"], json!("Test gauge"));
}

#[test]
fn test_increment_counter() {
    let mut collector = MetricsCollector::new();
    collector.increment_counter("chunks", 2);
    collector.increment_counter("chunks", 3);
    assert_eq!(collector.snapshot()["chunks"], json!(5));
}

#[test]
fn run_stats_export() -> Result<()> {
    let input = MeasurementBuilder::new().keys(4).records(100).build();
    let runner = Runner::new(
        ExecMode::Streaming,
        RunConfig::default().with_workers(2).with_block_size(128),
    );
    let summary = runner.run(input.as_bytes())?;
    let metrics = summary.stats.to_collector();
    let snapshot = metrics.snapshot();

    assert_eq!(snapshot["records"], json!(100));
    assert_eq!(snapshot["keys"], json!(4));
    assert_eq!(snapshot["workers"], json!(2));
    assert_eq!(snapshot["bytes_read"], json!(input.len()));
    assert_eq!(snapshot["chunks"], json!(summary.stats.chunks));
    assert!(summary.stats.chunks > 1);
    assert!(metrics.to_json().get("execution_time_ms").is_some());
    assert!(metrics.render().contains("records: 100"));
    Ok(())
}

#[test]
fn save_metrics_to_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("metrics.json");

    let summary = Runner::default().run(sample_measurements().as_bytes())?;
    summary.stats.to_collector().save_to_file(&path)?;

    let saved: serde_json::Value = serde_json::from_str(&read_to_string(&path)?)?;
    assert_eq!(saved["records"]["value"], json!(10));
    assert_eq!(saved["keys"]["value"], json!(9));
    Ok(())
}

#[test]
fn run_stats_serialize() -> Result<()> {
    let summary = Runner::default().run(&b"A;5.0\nB;5.0"[..])?;
    let value = serde_json::to_value(summary.stats)?;
    assert_eq!(value["mode"], json!("streaming"));
    assert_eq!(value["records"], json!(2));
    Ok(())
}

#[test]
fn counter_starts_at_zero() {
    let mut collector = MetricsCollector::new();
    let counter = CounterMetric::new("bad_lines");
    assert_eq!(counter.count(), 0);
    collector.register(Box::new(counter));
    collector.increment_counter("bad_lines", 4);
    assert_eq!(collector.snapshot()["bad_lines"], json!(4));
}

#[test]
fn elapsed_from_start_and_end() {
    let mut collector = MetricsCollector::new();
    assert!(collector.elapsed().is_none());

    collector.record_start();
    assert!(collector.elapsed().is_none());
    std::thread::sleep(std::time::Duration::from_millis(5));
    collector.record_end();

    let elapsed = collector.elapsed().unwrap();
    assert!(elapsed >= std::time::Duration::from_millis(5));
    assert!(collector.to_json().get("execution_time_ms").is_some());
}

#[test]
fn explicit_elapsed_wins() -> Result<()> {
    let summary = Runner::default().run(sample_measurements().as_bytes())?;
    let mut collector = summary.stats.to_collector();
    collector.record_start();
    collector.record_end();
    assert_eq!(collector.elapsed(), Some(summary.stats.elapsed));
    Ok(())
}
