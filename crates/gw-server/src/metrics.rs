//! Prometheus-backed implementation of `memgate`'s `PipelineMetrics` hook.
//! Reports aggregate request counts and latencies only, never per-user
//! activity.

use std::time::Duration;

use memgate::observability::PipelineMetrics;
use metrics::{counter, histogram};

pub struct GatewayMetrics;

impl PipelineMetrics for GatewayMetrics {
    fn record_insert(&self, latency: Duration, result: &Result<(), String>) {
        record("insert", latency, result);
    }

    fn record_search(&self, latency: Duration, result: &Result<(), String>) {
        record("search", latency, result);
    }

    fn record_chat(&self, latency: Duration, result: &Result<(), String>) {
        record("chat", latency, result);
    }
}

fn record(flow: &'static str, latency: Duration, result: &Result<(), String>) {
    let status = if result.is_ok() { "success" } else { "failure" };
    counter!("memgate_requests_total", "flow" => flow, "status" => status).increment(1);
    histogram!("memgate_latency_seconds", "flow" => flow).record(latency.as_secs_f64());
}
