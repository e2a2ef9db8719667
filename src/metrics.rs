//! Run statistics and metrics reporting.
//!
//! Every run produces a [`RunStats`] with the counters the pipeline already
//! tracks (bytes read, chunks, records, keys, wall time). For reporting, the
//! stats can be exported into a [`MetricsCollector`], which also accepts
//! user-defined [`Metric`]s and can print them or save them as JSON.
//!
//! # Example
//!
//! ```no_run
//! use ironbrc::Runner;
//!
//! # fn main() -> anyhow::Result<()> {
//! let summary = Runner::default().run(&b"Paris;21.5\n"[..])?;
//! let metrics = summary.stats.to_collector();
//! metrics.print();
//! metrics.save_to_file("metrics.json")?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::any::Any;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::runner::ExecMode;

/// Counters gathered during one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub mode: ExecMode,
    pub workers: usize,
    pub bytes_read: u64,
    pub chunks: u64,
    pub records: u64,
    pub keys: u64,
    pub elapsed: Duration,
}

impl RunStats {
    /// Input throughput in MiB/s, or 0 for an instantaneous run.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn throughput_mib_s(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.bytes_read as f64 / (1024.0 * 1024.0) / secs
        }
    }

    /// Export as counters and gauges.
    #[must_use]
    pub fn to_collector(&self) -> MetricsCollector {
        let mut collector = MetricsCollector::new();
        collector.register(Box::new(CounterMetric::with_value(
            "bytes_read",
            self.bytes_read,
        )));
        collector.register(Box::new(CounterMetric::with_value("chunks", self.chunks)));
        collector.register(Box::new(CounterMetric::with_value("records", self.records)));
        collector.register(Box::new(CounterMetric::with_value("keys", self.keys)));
        collector.register(Box::new(CounterMetric::with_value(
            "workers",
            self.workers as u64,
        )));
        collector.register(Box::new(
            GaugeMetric::new("throughput_mib_s", self.throughput_mib_s())
                .with_description("Input bytes processed per second, in MiB"),
        ));
        collector.set_elapsed(self.elapsed);
        collector
    }
}

/// Trait for custom metrics.
pub trait Metric: Send + Sync + Any {
    /// The name of this metric (e.g., `records`, `throughput_mib_s`).
    fn name(&self) -> &str;

    /// The current value of this metric as a JSON value.
    fn value(&self) -> Value;

    /// Optional description of what this metric measures.
    fn description(&self) -> Option<&str> {
        None
    }

    /// Cast to Any for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Named metrics plus the total execution time of a run.
///
/// The time is either set directly from a finished run ([`set_elapsed`]) or
/// measured between [`record_start`] and [`record_end`].
///
/// [`set_elapsed`]: Self::set_elapsed
/// [`record_start`]: Self::record_start
/// [`record_end`]: Self::record_end
#[derive(Default)]
pub struct MetricsCollector {
    metrics: BTreeMap<String, Box<dyn Metric>>,
    start_time: Option<Instant>,
    end_time: Option<Instant>,
    elapsed: Option<Duration>,
}

impl MetricsCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a metric, replacing any existing metric with the same name.
    pub fn register(&mut self, metric: Box<dyn Metric>) {
        self.metrics.insert(metric.name().to_string(), metric);
    }

    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = Some(elapsed);
    }

    /// Record the start time of a run.
    pub fn record_start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Record the end time of a run.
    pub fn record_end(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// The explicitly set time, else the time between start and end.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed.or(match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(end.duration_since(start)),
            _ => None,
        })
    }

    /// Increment a counter metric by name, creating it if missing.
    ///
    /// A non-counter metric registered under `name` is replaced.
    pub fn increment_counter(&mut self, name: &str, value: u64) {
        let current = self
            .metrics
            .get(name)
            .and_then(|m| m.as_any().downcast_ref::<CounterMetric>())
            .map_or(0, |c| c.count);
        self.register(Box::new(CounterMetric::with_value(name, current + value)));
    }

    /// Get all metrics as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut metrics_json = serde_json::Map::new();

        for (name, metric) in &self.metrics {
            let mut metric_obj = serde_json::Map::new();
            metric_obj.insert("value".to_string(), metric.value());
            if let Some(desc) = metric.description() {
                metric_obj.insert("description".to_string(), json!(desc));
            }
            metrics_json.insert(name.clone(), Value::Object(metric_obj));
        }

        if let Some(elapsed) = self.elapsed() {
            metrics_json.insert(
                "execution_time_ms".to_string(),
                json!({
                    "value": elapsed.as_millis(),
                    "description": "Total run time in milliseconds",
                }),
            );
        }
        Value::Object(metrics_json)
    }

    /// Render all metrics in a human-readable block.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("========== Run Metrics ==========\n");
        if let Some(elapsed) = self.elapsed() {
            out.push_str(&format!(
                "Execution Time: {:.3}s ({} ms)\n",
                elapsed.as_secs_f64(),
                elapsed.as_millis()
            ));
            out.push_str("---------------------------------\n");
        }
        for (name, metric) in &self.metrics {
            match metric.description() {
                Some(desc) => out.push_str(&format!("{name}: {} ({desc})\n", metric.value())),
                None => out.push_str(&format!("{name}: {}\n", metric.value())),
            }
        }
        out.push_str("=================================\n");
        out
    }

    /// Print all metrics to stderr, keeping stdout free for the report.
    pub fn print(&self) {
        eprint!("{}", self.render());
    }

    /// Save all metrics to a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written to.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let formatted = serde_json::to_string_pretty(&self.to_json())?;
        let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        file.write_all(formatted.as_bytes())
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    /// Get a snapshot of all metric names and values.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.metrics
            .iter()
            .map(|(name, metric)| (name.clone(), metric.value()))
            .collect()
    }
}

// ========== Built-in Metrics ==========

/// A simple counter metric.
pub struct CounterMetric {
    name: String,
    count: u64,
}

impl CounterMetric {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_value(name, 0)
    }

    pub fn with_value(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }

    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }
}

impl Metric for CounterMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Value {
        json!(self.count)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A gauge metric that holds a single numeric value.
pub struct GaugeMetric {
    name: String,
    value: f64,
    description: Option<String>,
}

impl GaugeMetric {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Metric for GaugeMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Value {
        json!(self.value)
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
