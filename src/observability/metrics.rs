//! Metrics collection.
//!
//! # Metrics
//! - `accounts_fetch_total` (counter): RPC calls by method and outcome
//! - `accounts_fetch_duration_seconds` (histogram): RPC round-trip latency
//! - `accounts_decoded_total` (counter): accounts decoded by record type
//! - `accounts_decode_failures_total` (counter): skipped accounts by record type

use std::time::Instant;

/// Record a completed RPC call.
pub fn record_fetch(method: &'static str, outcome: &'static str, start: Instant) {
    ::metrics::counter!("accounts_fetch_total", "method" => method, "outcome" => outcome)
        .increment(1);
    ::metrics::histogram!("accounts_fetch_duration_seconds", "method" => method)
        .record(start.elapsed().as_secs_f64());
}

/// Record successfully decoded accounts for one fetch.
pub fn record_decoded(record: &'static str, count: usize) {
    ::metrics::counter!("accounts_decoded_total", "record" => record).increment(count as u64);
}

/// Record one skipped account.
pub fn record_decode_failure(record: &'static str) {
    ::metrics::counter!("accounts_decode_failures_total", "record" => record).increment(1);
}
