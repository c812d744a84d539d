use dashmap::DashMap;
use ferrous_probe_application::ports::LookupMetricsPort;
use ferrous_probe_domain::ErrorKind;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Default)]
struct LatencySum {
    count: u64,
    total_us: u64,
}

/// In-process lookup counters, rendered in the Prometheus text format.
#[derive(Default)]
pub struct LookupMetrics {
    successful_lookups: AtomicU64,
    failed_lookups: AtomicU64,

    errors: DashMap<(String, &'static str), u64>,

    rcodes: DashMap<(String, String), u64>,

    latency: DashMap<(String, String), LatencySum>,
}

impl LookupMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn successful_lookups(&self) -> u64 {
        self.successful_lookups.load(Ordering::Relaxed)
    }

    pub fn failed_lookups(&self) -> u64 {
        self.failed_lookups.load(Ordering::Relaxed)
    }

    pub fn error_count(&self, target: &str, kind: ErrorKind) -> u64 {
        self.errors
            .get(&(target.to_string(), kind.as_str()))
            .map(|v| *v)
            .unwrap_or(0)
    }

    pub fn rcode_count(&self, target: &str, rcode: &str) -> u64 {
        self.rcodes
            .get(&(target.to_string(), rcode.to_string()))
            .map(|v| *v)
            .unwrap_or(0)
    }

    pub fn avg_latency_ms(&self, target: &str, qtype: &str) -> Option<f64> {
        let entry = self.latency.get(&(target.to_string(), qtype.to_string()))?;
        if entry.count == 0 {
            return None;
        }
        Some(entry.total_us as f64 / entry.count as f64 / 1000.0)
    }
}

fn sorted<K, F>(map: &DashMap<K, u64>, labels: F) -> Vec<(String, u64)>
where
    K: Eq + std::hash::Hash,
    F: Fn(&K) -> String,
{
    let mut rows: Vec<(String, u64)> = map
        .iter()
        .map(|entry| (labels(entry.key()), *entry.value()))
        .collect();
    rows.sort();
    rows
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

impl LookupMetricsPort for LookupMetrics {
    fn record_error(&self, target: &str, kind: ErrorKind) {
        self.failed_lookups.fetch_add(1, Ordering::Relaxed);
        *self
            .errors
            .entry((target.to_string(), kind.as_str()))
            .or_insert(0) += 1;
    }

    fn record_success(&self, target: &str, latency: Duration, rcode: &str, qtype: &str) {
        self.successful_lookups.fetch_add(1, Ordering::Relaxed);
        *self
            .rcodes
            .entry((target.to_string(), rcode.to_string()))
            .or_insert(0) += 1;

        let mut sum = self
            .latency
            .entry((target.to_string(), qtype.to_string()))
            .or_default();
        sum.count += 1;
        sum.total_us += latency.as_micros() as u64;
    }

    fn render_prometheus(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "# HELP dns_lookup_total Lookups by final status.");
        let _ = writeln!(out, "# TYPE dns_lookup_total counter");
        let _ = writeln!(out, "dns_lookup_total{{status=\"success\"}} {}", self.successful_lookups());
        let _ = writeln!(out, "dns_lookup_total{{status=\"error\"}} {}", self.failed_lookups());

        let _ = writeln!(out, "# HELP dns_lookup_errors_total Failed lookups by target and reason.");
        let _ = writeln!(out, "# TYPE dns_lookup_errors_total counter");
        for (labels, value) in sorted(&self.errors, |(target, kind)| {
            format!("target=\"{}\",error=\"{}\"", escape(target), kind)
        }) {
            let _ = writeln!(out, "dns_lookup_errors_total{{{}}} {}", labels, value);
        }

        let _ = writeln!(out, "# HELP dns_lookup_rcode_total Answered lookups by target and rcode.");
        let _ = writeln!(out, "# TYPE dns_lookup_rcode_total counter");
        for (labels, value) in sorted(&self.rcodes, |(target, rcode)| {
            format!("target=\"{}\",rcode=\"{}\"", escape(target), escape(rcode))
        }) {
            let _ = writeln!(out, "dns_lookup_rcode_total{{{}}} {}", labels, value);
        }

        let _ = writeln!(out, "# HELP dns_lookup_duration_seconds Latency of answered lookups.");
        let _ = writeln!(out, "# TYPE dns_lookup_duration_seconds summary");
        let mut latency: Vec<(String, u64, u64)> = self
            .latency
            .iter()
            .map(|entry| {
                let (target, qtype) = entry.key();
                (
                    format!("target=\"{}\",qtype=\"{}\"", escape(target), escape(qtype)),
                    entry.count,
                    entry.total_us,
                )
            })
            .collect();
        latency.sort();
        for (labels, count, total_us) in latency {
            let _ = writeln!(
                out,
                "dns_lookup_duration_seconds_sum{{{}}} {}",
                labels,
                total_us as f64 / 1_000_000.0
            );
            let _ = writeln!(out, "dns_lookup_duration_seconds_count{{{}}} {}", labels, count);
        }

        out
    }
}
