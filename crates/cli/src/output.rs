use ferrous_probe_domain::{AggregateResult, AnswerRecord, DnsTarget, QueryOutcome};

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub pretty: bool,
    /// Print the error text of failed targets.
    pub debug: bool,
    /// Answers slower than this many seconds are reported as warnings.
    pub warn_threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Ok,
    Warn,
    Failed,
}

impl Level {
    fn symbol(self, pretty: bool) -> &'static str {
        match (self, pretty) {
            (Level::Ok, true) => "✅ ",
            (Level::Warn, true) => "⚠️ ",
            (Level::Failed, true) => "❌ ",
            (Level::Ok, false) => "[OK] ",
            (Level::Warn, false) => "[WARN] ",
            (Level::Failed, false) => "[FAILED] ",
        }
    }
}

pub fn summary_line(result: &AggregateResult) -> String {
    format!(
        "DNS lookup succeeded for {} out of {} servers ({:.4} seconds total)",
        result.succeeded(),
        result.total(),
        result.duration
    )
}

/// Summary line followed by one line per target, ordered by host then
/// protocol.
pub fn render_report(result: &AggregateResult, qtype: &str, options: &ReportOptions) -> Vec<String> {
    let mut rows: Vec<(&String, &QueryOutcome)> = result.details.iter().collect();
    rows.sort_by_cached_key(|(target, outcome)| {
        (host_of(target), outcome.protocol.clone(), target.to_string())
    });

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(summary_line(result));
    for (target, outcome) in rows {
        let (level, message) = describe(target, outcome, qtype, options);
        lines.push(format!("{}{}", level.symbol(options.pretty), message));
    }
    lines
}

pub fn describe(
    target: &str,
    outcome: &QueryOutcome,
    qtype: &str,
    options: &ReportOptions,
) -> (Level, String) {
    if !outcome.is_ok() {
        let message = match (&outcome.error, options.debug) {
            (Some(error), true) => format!("{} - connection issue or error: {}", target, error),
            _ => format!("{} - connection issue or error", target),
        };
        return (Level::Failed, message);
    }

    let time_ms = outcome.time_ms.unwrap_or_default();
    match outcome.rcode.as_deref().unwrap_or("Unknown") {
        "NOERROR" => {}
        "NXDOMAIN" => {
            return (
                Level::Warn,
                format!(
                    "{} - Domain does not exist (rcode: NXDOMAIN) - {:.2} ms",
                    target, time_ms
                ),
            )
        }
        rcode => {
            return (
                Level::Warn,
                format!(
                    "{} - No valid answer (rcode: {}) - {:.2} ms",
                    target, rcode, time_ms
                ),
            )
        }
    }

    let answers: Vec<&AnswerRecord> = outcome
        .answers
        .iter()
        .filter(|answer| answer.record_type.eq_ignore_ascii_case(qtype))
        .collect();

    if answers.is_empty() {
        return (
            Level::Warn,
            format!(
                "{} - {} - No {} records found - {:.2} ms",
                target, outcome.protocol, qtype, time_ms
            ),
        );
    }

    let level = if time_ms / 1000.0 > options.warn_threshold {
        Level::Warn
    } else {
        Level::Ok
    };

    let first_ttl = answers[0].ttl;
    let message = if answers.iter().all(|answer| answer.ttl == first_ttl) {
        let values: Vec<&str> = answers.iter().map(|answer| answer.value.as_str()).collect();
        format!(
            "{} - {} - {:.5}ms - TTL: {}s - {}",
            target,
            outcome.protocol,
            time_ms,
            first_ttl,
            values.join(", ")
        )
    } else {
        let values: Vec<String> = answers
            .iter()
            .map(|answer| format!("{} (TTL: {})", answer.value, answer.ttl))
            .collect();
        format!(
            "{} - {} - {:.5}ms - {}",
            target,
            outcome.protocol,
            time_ms,
            values.join(", ")
        )
    };

    (level, message)
}

fn host_of(target: &str) -> String {
    target
        .parse::<DnsTarget>()
        .map(|t| t.server_name())
        .unwrap_or_else(|_| target.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn options() -> ReportOptions {
        ReportOptions {
            pretty: false,
            debug: false,
            warn_threshold: 1.0,
        }
    }

    fn answered(target: &str, time_ms: f64, rcode: &str, answers: Vec<AnswerRecord>) -> QueryOutcome {
        let mut outcome = QueryOutcome::success(target, &[], time_ms, rcode.to_string());
        outcome.answers = answers;
        outcome
    }

    fn a(value: &str, ttl: u32) -> AnswerRecord {
        AnswerRecord::new("example.com.", "A", ttl, value)
    }

    #[test]
    fn test_common_ttl_printed_once() {
        let outcome = answered(
            "udp://1.1.1.1:53",
            12.5,
            "NOERROR",
            vec![a("1.2.3.4", 60), a("5.6.7.8", 60)],
        );
        let (level, line) = describe("udp://1.1.1.1:53", &outcome, "A", &options());
        assert_eq!(level, Level::Ok);
        assert_eq!(
            line,
            "udp://1.1.1.1:53 - Do53 - 12.50000ms - TTL: 60s - 1.2.3.4, 5.6.7.8"
        );
    }

    #[test]
    fn test_mixed_ttls_printed_per_value() {
        let outcome = answered(
            "udp://1.1.1.1:53",
            1.0,
            "NOERROR",
            vec![a("1.2.3.4", 60), a("5.6.7.8", 30)],
        );
        let (_, line) = describe("udp://1.1.1.1:53", &outcome, "A", &options());
        assert!(line.ends_with("1.2.3.4 (TTL: 60), 5.6.7.8 (TTL: 30)"));
    }

    #[test]
    fn test_answers_filtered_to_query_type() {
        let cname = AnswerRecord::new("www.example.com.", "CNAME", 300, "example.com.");
        let outcome = answered("tcp://9.9.9.9:53", 3.0, "NOERROR", vec![cname, a("1.2.3.4", 60)]);
        let (_, line) = describe("tcp://9.9.9.9:53", &outcome, "A", &options());
        assert!(line.ends_with("TTL: 60s - 1.2.3.4"));

        let (level, line) = describe("tcp://9.9.9.9:53", &outcome, "AAAA", &options());
        assert_eq!(level, Level::Warn);
        assert!(line.contains("No AAAA records found"));
    }

    #[test]
    fn test_slow_and_nxdomain_are_warnings() {
        let slow = answered("udp://1.1.1.1:53", 1500.0, "NOERROR", vec![a("1.2.3.4", 60)]);
        assert_eq!(describe("udp://1.1.1.1:53", &slow, "A", &options()).0, Level::Warn);

        let missing = answered("udp://1.1.1.1:53", 5.0, "NXDOMAIN", vec![]);
        let (level, line) = describe("udp://1.1.1.1:53", &missing, "A", &options());
        assert_eq!(level, Level::Warn);
        assert!(line.contains("Domain does not exist"));

        let refused = answered("udp://1.1.1.1:53", 5.0, "REFUSED", vec![]);
        let (_, line) = describe("udp://1.1.1.1:53", &refused, "A", &options());
        assert!(line.contains("No valid answer (rcode: REFUSED)"));
    }

    #[test]
    fn test_failure_shows_error_only_in_debug() {
        let failed = QueryOutcome::failure("quic://dns.adguard-dns.com:853", &[], "query failed: timeout");
        let target = "quic://dns.adguard-dns.com:853";

        let (level, line) = describe(target, &failed, "A", &options());
        assert_eq!(level, Level::Failed);
        assert_eq!(line, "quic://dns.adguard-dns.com:853 - connection issue or error");

        let debug = ReportOptions { debug: true, ..options() };
        let (_, line) = describe(target, &failed, "A", &debug);
        assert!(line.ends_with("connection issue or error: query failed: timeout"));
    }

    #[test]
    fn test_report_sorted_by_host_then_protocol() {
        let mut details = HashMap::new();
        for target in ["tls://9.9.9.9:853", "udp://1.1.1.1:53", "udp://9.9.9.9:53"] {
            details.insert(
                target.to_string(),
                answered(target, 1.0, "NOERROR", vec![a("1.2.3.4", 60)]),
            );
        }
        details.insert(
            "tcp://1.1.1.1:53".to_string(),
            QueryOutcome::failure("tcp://1.1.1.1:53", &[], "query failed"),
        );
        let result = AggregateResult {
            details,
            duration: 0.25,
        };

        let pretty = ReportOptions { pretty: true, ..options() };
        let lines = render_report(&result, "A", &pretty);
        assert_eq!(
            lines[0],
            "DNS lookup succeeded for 3 out of 4 servers (0.2500 seconds total)"
        );
        assert!(lines[1].starts_with("❌ tcp://1.1.1.1:53"));
        assert!(lines[2].starts_with("✅ udp://1.1.1.1:53"));
        assert!(lines[3].starts_with("✅ udp://9.9.9.9:53"));
        assert!(lines[4].starts_with("✅ tls://9.9.9.9:853"));
    }
}
