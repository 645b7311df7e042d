//! Metrics and telemetry for alias resolution
//!
//! This module provides Prometheus metrics for resolution outcomes, latency
//! and the size of the configured rule table.

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_gauge, register_histogram_vec, CounterVec, Encoder, Gauge,
    HistogramVec, TextEncoder,
};

lazy_static! {
    /// Total resolutions by resolver and outcome
    pub static ref RESOLUTIONS_TOTAL: CounterVec = register_counter_vec!(
        "kuba_alias_resolutions_total",
        "Total alias resolutions",
        &["resolver", "outcome"]
    ).unwrap();

    /// Resolution latency
    pub static ref RESOLUTION_DURATION: HistogramVec = register_histogram_vec!(
        "kuba_alias_resolution_duration_seconds",
        "Alias resolution latency in seconds",
        &["resolver"],
        vec![0.000_01, 0.000_1, 0.001, 0.01, 0.1, 1.0]
    ).unwrap();

    /// Rule table reloads
    pub static ref RELOADS_TOTAL: CounterVec = register_counter_vec!(
        "kuba_alias_reloads_total",
        "Total alias rule table reloads",
        &["status"]
    ).unwrap();

    /// Rules currently loaded by the configured resolver
    ///
    /// Process-wide: with several `ConfiguredResolver` instances it reports
    /// the count of whichever one was built or reloaded last.
    pub static ref CONFIGURED_RULES: Gauge = register_gauge!(
        "kuba_alias_configured_rules",
        "Number of alias rules currently loaded"
    ).unwrap();
}

/// Outcome label for a single resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// No alias history
    Empty,
    /// A timeline was returned
    Found,
    /// The resolver failed
    Error,
}

impl ResolutionOutcome {
    /// Label value used in metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionOutcome::Empty => "empty",
            ResolutionOutcome::Found => "found",
            ResolutionOutcome::Error => "error",
        }
    }
}

/// Get metrics in Prometheus text format
///
/// # Returns
///
/// Result containing the formatted metrics string, or an error if encoding fails
pub fn gather_metrics() -> Result<String, String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| format!("Failed to encode metrics: {}", e))?;

    String::from_utf8(buffer).map_err(|e| format!("Metrics contain invalid UTF-8: {}", e))
}

/// Record a resolution
#[inline]
pub fn record_resolution(resolver: &str, outcome: ResolutionOutcome, duration_secs: f64) {
    RESOLUTIONS_TOTAL
        .with_label_values(&[resolver, outcome.as_str()])
        .inc();

    RESOLUTION_DURATION
        .with_label_values(&[resolver])
        .observe(duration_secs);
}

/// Record a rule table reload
#[inline]
pub fn record_reload(success: bool) {
    let status = if success { "success" } else { "error" };
    RELOADS_TOTAL.with_label_values(&[status]).inc();
}

/// Update the loaded rule count
///
/// Overwrites the value set by any other resolver instance.
#[inline]
pub fn update_configured_rules(count: usize) {
    CONFIGURED_RULES.set(count as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_resolution() {
        record_resolution("metrics-test", ResolutionOutcome::Found, 0.000_2);
        let count = RESOLUTIONS_TOTAL
            .with_label_values(&["metrics-test", "found"])
            .get();
        assert!(count >= 1.0);

        let metrics = gather_metrics().expect("Failed to gather metrics");
        assert!(metrics.contains("kuba_alias_resolutions_total"));
        assert!(metrics.contains("kuba_alias_resolution_duration_seconds"));
    }

    #[test]
    fn test_record_reload() {
        record_reload(false);
        let metrics = gather_metrics().expect("Failed to gather metrics");
        assert!(metrics.contains("kuba_alias_reloads_total"));
    }

    #[test]
    fn test_configured_rules_gauge_is_exported() {
        update_configured_rules(3);
        let metrics = gather_metrics().expect("Failed to gather metrics");
        // Shared by every resolver in the process, so only the name is stable here
        assert!(metrics.contains("kuba_alias_configured_rules"));
        assert!(!metrics.contains("\nalias_resolutions_total"));
    }
}
