use ferrous_probe_domain::ErrorKind;
use std::time::Duration;

/// Observability sink for lookups. Implementations must not block.
pub trait LookupMetricsPort: Send + Sync {
    fn record_error(&self, target: &str, kind: ErrorKind);

    fn record_success(&self, target: &str, latency: Duration, rcode: &str, qtype: &str);

    /// Prometheus text exposition of everything recorded so far.
    fn render_prometheus(&self) -> String {
        String::new()
    }
}

pub struct NoopLookupMetrics;

impl LookupMetricsPort for NoopLookupMetrics {
    fn record_error(&self, _target: &str, _kind: ErrorKind) {}

    fn record_success(&self, _target: &str, _latency: Duration, _rcode: &str, _qtype: &str) {}
}
