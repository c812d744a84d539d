use crate::lookup::MAX_DNS_SERVERS_PER_REQUEST;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Query behaviour shared by every lookup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_servers_per_request")]
    pub max_servers_per_request: usize,

    /// Ceiling on in-flight queries within one fan-out.
    #[serde(default = "default_max_concurrent_queries")]
    pub max_concurrent_queries: usize,

    /// Attempts per target, including the first.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl DnsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_servers_per_request: default_max_servers_per_request(),
            max_concurrent_queries: default_max_concurrent_queries(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_max_servers_per_request() -> usize {
    MAX_DNS_SERVERS_PER_REQUEST
}

fn default_max_concurrent_queries() -> usize {
    500
}

fn default_max_retries() -> u32 {
    3
}
