//! Structured logging and a pluggable metrics sink around the three request
//! flows, in the same "typed event + key-value logger + global hook" shape
//! this gateway's teacher crate used for its own pipeline stages.

use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::Duration;

use sha2::{Digest, Sha256};

/// Which of the three request flows an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineFlow {
    Insert,
    Search,
    Chat,
}

impl fmt::Display for PipelineFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PipelineFlow::Insert => "insert",
            PipelineFlow::Search => "search",
            PipelineFlow::Chat => "chat",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineEventStatus {
    Success,
    Failure,
}

impl fmt::Display for PipelineEventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PipelineEventStatus::Success => "success",
            PipelineEventStatus::Failure => "failure",
        })
    }
}

/// One completed (or failed) pipeline flow. `principal_hash` is a short,
/// non-reversible digest — principals are PII-adjacent and never appear raw
/// in a log line.
#[derive(Debug, Clone)]
pub struct PipelineEvent {
    pub flow: PipelineFlow,
    pub status: PipelineEventStatus,
    pub latency: Duration,
    pub request_id: String,
    pub principal_hash: Option<String>,
    pub error: Option<String>,
}

impl PipelineEvent {
    pub fn format_key_values(&self) -> String {
        let mut out = format!(
            "flow={} status={} latency_ms={} request_id={}",
            self.flow,
            self.status,
            self.latency.as_millis(),
            escape_kv(&self.request_id),
        );
        if let Some(hash) = &self.principal_hash {
            out.push(' ');
            out.push_str("principal_hash=");
            out.push_str(&escape_kv(hash));
        }
        if let Some(error) = &self.error {
            out.push(' ');
            out.push_str("error=");
            out.push_str(&escape_kv(error));
        }
        out
    }
}

fn escape_kv(value: &str) -> String {
    if value.contains(' ') || value.contains('"') {
        format!("{value:?}")
    } else {
        value.to_string()
    }
}

/// Hash `principal` down to a short, non-reversible tag suitable for logs.
/// `None` stays `None` — absence is not PII.
pub(crate) fn redact_principal(principal: Option<&str>) -> Option<String> {
    principal.map(|p| {
        let mut hasher = Sha256::new();
        hasher.update(p.as_bytes());
        hex::encode(hasher.finalize())[..12].to_string()
    })
}

/// Sink for flow completion metrics. Implement this to wire into whatever
/// metrics backend the deployment uses (`/metrics`, Prometheus, a counter
/// registry — the gateway doesn't care).
pub trait PipelineMetrics: Send + Sync {
    fn record_insert(&self, latency: Duration, result: &Result<(), String>);
    fn record_search(&self, latency: Duration, result: &Result<(), String>);
    fn record_chat(&self, latency: Duration, result: &Result<(), String>);
}

pub trait PipelineEventLogger: Send + Sync {
    fn log(&self, event: &PipelineEvent);
}

/// Writes one key-value line per event to any `Write` sink, and mirrors it
/// through `tracing` at `info`/`warn` depending on status.
pub struct KeyValueLogger {
    writer: std::sync::Mutex<Box<dyn std::io::Write + Send>>,
}

impl KeyValueLogger {
    pub fn new(writer: Box<dyn std::io::Write + Send>) -> Self {
        Self {
            writer: std::sync::Mutex::new(writer),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }
}

impl PipelineEventLogger for KeyValueLogger {
    fn log(&self, event: &PipelineEvent) {
        let line = event.format_key_values();
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{line}");
        }
        match event.status {
            PipelineEventStatus::Success => tracing::info!(target: "memgate::pipeline", "{line}"),
            PipelineEventStatus::Failure => tracing::warn!(target: "memgate::pipeline", "{line}"),
        }
    }
}

static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
static LOGGER: OnceLock<RwLock<Option<Arc<dyn PipelineEventLogger>>>> = OnceLock::new();

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    METRICS.get_or_init(|| RwLock::new(None))
}

fn logger_lock() -> &'static RwLock<Option<Arc<dyn PipelineEventLogger>>> {
    LOGGER.get_or_init(|| RwLock::new(None))
}

/// Install a global metrics sink. Last writer wins; intended to be called
/// once at startup.
pub fn set_pipeline_metrics(metrics: Arc<dyn PipelineMetrics>) {
    *metrics_lock().write().expect("poisoned") = Some(metrics);
}

/// Install a global event logger. Defaults to emitting through `tracing`
/// directly if never called.
pub fn set_pipeline_logger(logger: Arc<dyn PipelineEventLogger>) {
    *logger_lock().write().expect("poisoned") = Some(logger);
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    metrics_lock().read().expect("poisoned").clone()
}

pub(crate) fn emit(event: PipelineEvent) {
    if let Some(logger) = logger_lock().read().expect("poisoned").clone() {
        logger.log(&event);
        return;
    }
    let line = event.format_key_values();
    match event.status {
        PipelineEventStatus::Success => tracing::info!(target: "memgate::pipeline", "{line}"),
        PipelineEventStatus::Failure => tracing::warn!(target: "memgate::pipeline", "{line}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_principal_to_fixed_length_hash() {
        let hash = redact_principal(Some("alice")).unwrap();
        assert_eq!(hash.len(), 12);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn absent_principal_stays_absent() {
        assert!(redact_principal(None).is_none());
    }

    #[test]
    fn format_key_values_quotes_values_with_spaces() {
        let event = PipelineEvent {
            flow: PipelineFlow::Insert,
            status: PipelineEventStatus::Failure,
            latency: Duration::from_millis(42),
            request_id: "req-1".into(),
            principal_hash: None,
            error: Some("vector store unreachable: connection refused".into()),
        };
        let line = event.format_key_values();
        assert!(line.contains("flow=insert"));
        assert!(line.contains("status=failure"));
        assert!(line.contains("latency_ms=42"));
        assert!(line.contains("error=\"vector store unreachable: connection refused\""));
    }
}
