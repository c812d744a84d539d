use ferrous_probe_application::use_cases::LookupRequest;
use ferrous_probe_domain::{DnsServer, DomainError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsLookupRequest {
    pub domain: String,
    pub qtype: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_servers: Vec<DnsServer>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub tls_insecure_skip_verify: bool,
}

impl From<DnsLookupRequest> for LookupRequest {
    fn from(req: DnsLookupRequest) -> Self {
        LookupRequest {
            domain: req.domain,
            qtype: req.qtype,
            servers: req.dns_servers,
            tls_insecure: req.tls_insecure_skip_verify,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReverseLookupRequest {
    pub reverse_ip: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_servers: Vec<DnsServer>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub tls_insecure_skip_verify: bool,
}

impl TryFrom<ReverseLookupRequest> for LookupRequest {
    type Error = DomainError;

    fn try_from(req: ReverseLookupRequest) -> Result<Self, Self::Error> {
        LookupRequest::reverse(&req.reverse_ip, req.dns_servers, req.tls_insecure_skip_verify)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCreatedResponse {
    pub task_id: String,
    pub message: String,
}
