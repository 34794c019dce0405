//! Metrics collection and Prometheus export.
//!
//! Installs the Prometheus recorder and records the domain counters.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the recorder. Call once at startup before any metric is recorded.
pub fn init_metrics() -> Result<(), anyhow::Error> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {}", e))?;

    METRICS_HANDLE
        .set(handle)
        .map_err(|_| anyhow::anyhow!("metrics handle already initialized"))
}

/// Current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

pub fn record_registration() {
    counter!("navi_registrations_total").increment(1);
}

pub fn record_login(outcome: &'static str) {
    counter!("navi_logins_total", "outcome" => outcome).increment(1);
}

pub fn record_bus_action(action: &'static str) {
    counter!("navi_bus_actions_total", "action" => action).increment(1);
}

pub fn record_emergency_broadcast() {
    counter!("navi_emergency_broadcasts_total").increment(1);
}
