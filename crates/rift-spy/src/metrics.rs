//! Prometheus metrics for the request-matching ledger.
use lazy_static::lazy_static;
use prometheus::{register_counter_vec, CounterVec, Encoder, TextEncoder};

lazy_static! {
    /// Log entries persisted through the spy
    pub static ref ENTRIES_SAVED_TOTAL: CounterVec = register_counter_vec!(
        "rift_spy_entries_saved_total",
        "Total number of log entries saved to the request history",
        &["result"]  // result: matched|unmatched
    )
    .unwrap();

    /// Replay queries against the history
    pub static ref FIND_TOTAL: CounterVec = register_counter_vec!(
        "rift_spy_find_total",
        "Total number of find queries against the request history",
        &["result"]  // result: hit|miss
    )
    .unwrap();

    /// Matcher failures recovered while scanning history
    pub static ref MATCHER_ERRORS_TOTAL: CounterVec = register_counter_vec!(
        "rift_spy_matcher_errors_total",
        "Total number of recorded entries the matcher failed to evaluate",
        &["operation"]  // operation: find|reset_match
    )
    .unwrap();
}

/// Gather all registered metrics in text exposition format
pub fn collect_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

pub fn record_entry_saved(found: bool) {
    let result = if found { "matched" } else { "unmatched" };
    ENTRIES_SAVED_TOTAL.with_label_values(&[result]).inc();
}

pub fn record_find(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    FIND_TOTAL.with_label_values(&[result]).inc();
}

pub fn record_matcher_error(operation: &str) {
    MATCHER_ERRORS_TOTAL.with_label_values(&[operation]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_show_up_in_exposition() {
        record_entry_saved(true);
        record_entry_saved(false);
        record_find(false);
        record_matcher_error("find");

        let text = collect_metrics();
        assert!(text.contains("rift_spy_entries_saved_total{result=\"matched\"}"));
        assert!(text.contains("rift_spy_entries_saved_total{result=\"unmatched\"}"));
        assert!(text.contains("rift_spy_find_total{result=\"miss\"}"));
        assert!(text.contains("rift_spy_matcher_errors_total{operation=\"find\"}"));
    }

    #[test]
    fn test_saved_counter_increments() {
        let before = ENTRIES_SAVED_TOTAL.with_label_values(&["matched"]).get();
        record_entry_saved(true);
        let after = ENTRIES_SAVED_TOTAL.with_label_values(&["matched"]).get();
        assert!(after >= before + 1.0);
    }
}
