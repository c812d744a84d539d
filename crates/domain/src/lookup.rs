use crate::dns_record::AnswerRecord;
use crate::protocol::protocol_label;
use crate::target::DnsTarget;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Upper bound on targets a single request may name.
pub const MAX_DNS_SERVERS_PER_REQUEST: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Ok,
    Error,
}

/// Classification attached to error counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidQtype,
    ContextCancelled,
    QueryFailed,
    NoResponse,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidQtype => "invalid_qtype",
            ErrorKind::ContextCancelled => "context_cancelled",
            ErrorKind::QueryFailed => "query_failed",
            ErrorKind::NoResponse => "no_response",
        }
    }
}

/// Server address plus caller-supplied tags, as received on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsServer {
    pub target: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl DnsServer {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// A validated target ready for the fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTarget {
    pub target: DnsTarget,
    pub tags: Arc<[String]>,
}

impl LookupTarget {
    pub fn new(target: DnsTarget, tags: Vec<String>) -> Self {
        Self {
            target,
            tags: tags.into(),
        }
    }

    pub fn key(&self) -> String {
        self.target.to_string()
    }
}

impl TryFrom<&DnsServer> for LookupTarget {
    type Error = crate::target::TargetError;

    fn try_from(server: &DnsServer) -> Result<Self, Self::Error> {
        Ok(Self::new(server.target.parse()?, server.tags.clone()))
    }
}

/// Result of querying one target, after retries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
    #[serde(rename = "command_status")]
    pub status: QueryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qtype: Option<String>,
    #[serde(default)]
    pub answers: Vec<AnswerRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "dns_protocol")]
    pub protocol: String,
}

impl QueryOutcome {
    pub fn failure(target: &str, tags: &[String], error: impl Into<String>) -> Self {
        Self {
            status: QueryStatus::Error,
            time_ms: None,
            tags: tags.to_vec(),
            rcode: None,
            name: None,
            qtype: None,
            answers: Vec::new(),
            error: Some(error.into()),
            protocol: protocol_label(target).to_string(),
        }
    }

    pub fn success(target: &str, tags: &[String], time_ms: f64, rcode: String) -> Self {
        Self {
            status: QueryStatus::Ok,
            time_ms: Some(time_ms),
            tags: tags.to_vec(),
            rcode: Some(rcode),
            name: None,
            qtype: None,
            answers: Vec::new(),
            error: None,
            protocol: protocol_label(target).to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == QueryStatus::Ok
    }
}

/// Outcomes keyed by canonical target, plus wall time in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub details: HashMap<String, QueryOutcome>,
    pub duration: f64,
}

impl AggregateResult {
    pub fn total(&self) -> usize {
        self.details.len()
    }

    pub fn succeeded(&self) -> usize {
        self.details.values().filter(|o| o.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }
}

/// Textual name for a DNS response code.
pub fn rcode_label(code: u16) -> String {
    match code {
        0 => "NOERROR".to_string(),
        1 => "FORMERR".to_string(),
        2 => "SERVFAIL".to_string(),
        3 => "NXDOMAIN".to_string(),
        4 => "NOTIMP".to_string(),
        5 => "REFUSED".to_string(),
        other => format!("UNKNOWN({})", other),
    }
}
