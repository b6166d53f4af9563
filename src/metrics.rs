//! Prometheus metrics for the preview pipeline.
//!
//! Recording is a no-op until a recorder is installed with
//! [`install_prometheus`].

use std::time::{Duration, Instant};

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tokio::task::JoinHandle;
use tracing::debug;

/// How often recorded histogram samples are drained into summaries.
pub const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

// === Metric Name Constants ===

/// Fetch latency metric name.
pub const METRIC_FETCH_LATENCY: &str = "fetch_latency_ms";
/// Rows returned per preview metric name.
pub const METRIC_PREVIEW_ROWS: &str = "preview_rows";
/// Successful previews counter metric name.
pub const METRIC_PREVIEWS_SERVED: &str = "previews_served_total";
/// Failed previews counter metric name.
pub const METRIC_PREVIEW_FAILURES: &str = "preview_failures_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_FETCH_LATENCY,
        "Outbound resource fetch latency in milliseconds"
    );
    describe_histogram!(METRIC_PREVIEW_ROWS, "Rows returned per preview");

    describe_counter!(
        METRIC_PREVIEWS_SERVED,
        "Total number of previews served"
    );
    describe_counter!(
        METRIC_PREVIEW_FAILURES,
        "Total number of failed previews, by error kind"
    );

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and return its render handle.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Periodically run recorder upkeep so histogram buffers stay bounded
/// between scrapes.
pub fn spawn_upkeep(handle: PrometheusHandle, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            handle.run_upkeep();
        }
    })
}

/// Record outbound fetch latency.
pub fn record_fetch_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_FETCH_LATENCY).record(latency_ms);
}

/// Record a successful preview.
pub fn record_preview_served(rows: usize) {
    counter!(METRIC_PREVIEWS_SERVED).increment(1);
    histogram!(METRIC_PREVIEW_ROWS).record(rows as f64);
}

/// Record a failed preview.
pub fn inc_preview_failures(kind: &'static str) {
    counter!(METRIC_PREVIEW_FAILURES, "kind" => kind).increment(1);
}
