use crate::ports::{DnsExchangePort, ExchangeRequest, LookupMetricsPort};
use crate::services::answer_decoder::{decode_answers, trim_dot};
use ferrous_probe_domain::normalize::normalize_qtype;
use ferrous_probe_domain::{
    rcode_label, DomainError, ErrorKind, LookupTarget, QueryOutcome, RecordType,
};
use hickory_proto::op::Message;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Fixed pause between attempts against the same target.
pub const RETRY_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_RETRIES: u32 = 3;

#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub tls_insecure: bool,
    /// Total attempts, including the first. Values below 1 are treated as 1.
    pub retries: u32,
    /// Applies to each attempt separately.
    pub timeout: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            tls_insecure: false,
            retries: DEFAULT_RETRIES,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

enum Attempt {
    Answered(Message, Duration),
    Empty,
    Failed(DomainError),
    Cancelled,
}

/// Queries one target with retries, racing every attempt against `cancel`.
pub struct QueryTargetUseCase {
    exchanger: Arc<dyn DnsExchangePort>,
    metrics: Arc<dyn LookupMetricsPort>,
}

impl QueryTargetUseCase {
    pub fn new(exchanger: Arc<dyn DnsExchangePort>, metrics: Arc<dyn LookupMetricsPort>) -> Self {
        Self { exchanger, metrics }
    }

    pub async fn execute(
        &self,
        domain: &str,
        qtype: &str,
        target: &LookupTarget,
        options: &QueryOptions,
        cancel: &CancellationToken,
    ) -> (String, QueryOutcome) {
        let key = target.key();

        let record_type = match normalize_qtype(qtype) {
            Ok(rt) => rt,
            Err(e) => return (key.clone(), self.fail(&key, target, ErrorKind::InvalidQtype, e.to_string())),
        };

        if options.tls_insecure && target.target.scheme().is_encrypted() {
            warn!(target = %key, "TLS certificate verification is DISABLED - USE ONLY FOR TESTING");
        }

        let request = ExchangeRequest {
            target: target.target.clone(),
            domain: Arc::from(domain),
            record_type,
            tls_insecure: options.tls_insecure,
            timeout: options.timeout,
        };

        let retries = options.retries.max(1);
        let mut last_error: Option<DomainError> = None;

        for attempt in 1..=retries {
            if cancel.is_cancelled() {
                return (key.clone(), self.cancelled(&key, target));
            }

            match self.attempt(&request, cancel).await {
                Attempt::Answered(message, rtt) => {
                    let outcome = self.succeed(&key, target, record_type, &message, rtt);
                    return (key, outcome);
                }
                Attempt::Empty => {
                    let outcome =
                        self.fail(&key, target, ErrorKind::NoResponse, "no response received");
                    return (key, outcome);
                }
                Attempt::Cancelled => return (key.clone(), self.cancelled(&key, target)),
                Attempt::Failed(e) => {
                    debug!(target = %key, attempt, retries, error = %e, "DNS attempt failed");
                    last_error = Some(e);
                }
            }

            if attempt < retries {
                tokio::select! {
                    _ = cancel.cancelled() => return (key.clone(), self.cancelled(&key, target)),
                    _ = tokio::time::sleep(RETRY_DELAY) => {}
                }
            }
        }

        let message = match last_error {
            Some(e) => format!("query failed: {}", e),
            None => "query failed".to_string(),
        };
        let outcome = self.fail(&key, target, ErrorKind::QueryFailed, message);
        (key, outcome)
    }

    /// Runs the exchange on its own task so a hung transport cannot outlive
    /// the caller's cancellation.
    async fn attempt(&self, request: &ExchangeRequest, cancel: &CancellationToken) -> Attempt {
        let exchanger = Arc::clone(&self.exchanger);
        let owned = request.clone();
        let started = Instant::now();

        let mut handle = tokio::spawn(async move {
            match tokio::time::timeout(owned.timeout, exchanger.exchange(&owned)).await {
                Ok(result) => result,
                Err(_) => Err(DomainError::TransportTimeout {
                    server: owned.target.to_string(),
                }),
            }
        });

        tokio::select! {
            _ = cancel.cancelled() => {
                handle.abort();
                Attempt::Cancelled
            }
            joined = &mut handle => match joined {
                Ok(Ok(Some(message))) => Attempt::Answered(message, started.elapsed()),
                Ok(Ok(None)) => Attempt::Empty,
                Ok(Err(e)) => Attempt::Failed(e),
                Err(e) => Attempt::Failed(DomainError::TransportFailure {
                    server: request.target.to_string(),
                    reason: format!("exchange task ended abnormally: {}", e),
                }),
            },
        }
    }

    fn succeed(
        &self,
        key: &str,
        target: &LookupTarget,
        record_type: RecordType,
        message: &Message,
        rtt: Duration,
    ) -> QueryOutcome {
        let time_ms = rtt.as_micros() as f64 / 1000.0;
        let rcode = rcode_label(u16::from(message.response_code()));

        self.metrics
            .record_success(key, rtt, &rcode, record_type.as_str());

        let mut outcome = QueryOutcome::success(key, &target.tags, time_ms, rcode);
        if let Some(question) = message.queries().first() {
            outcome.name = Some(trim_dot(question.name()));
            outcome.qtype = Some(RecordType::name_of(u16::from(question.query_type())));
        }
        outcome.answers = decode_answers(message);

        debug!(
            target = %key,
            rcode = outcome.rcode.as_deref().unwrap_or_default(),
            answers = outcome.answers.len(),
            time_ms,
            "DNS query answered"
        );
        outcome
    }

    fn cancelled(&self, key: &str, target: &LookupTarget) -> QueryOutcome {
        self.fail(
            key,
            target,
            ErrorKind::ContextCancelled,
            format!("context cancelled: {}", DomainError::Cancelled),
        )
    }

    fn fail(
        &self,
        key: &str,
        target: &LookupTarget,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> QueryOutcome {
        self.metrics.record_error(key, kind);
        QueryOutcome::failure(key, &target.tags, message)
    }
}
