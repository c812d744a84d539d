use async_trait::async_trait;
use ferrous_probe_domain::{DnsTarget, DomainError, RecordType};
use hickory_proto::op::Message;
use std::sync::Arc;
use std::time::Duration;

/// One query to one server.
#[derive(Debug, Clone)]
pub struct ExchangeRequest {
    pub target: DnsTarget,
    pub domain: Arc<str>,
    pub record_type: RecordType,
    pub tls_insecure: bool,
    pub timeout: Duration,
}

#[async_trait]
pub trait DnsExchangePort: Send + Sync {
    /// Sends the query over the target's transport.
    ///
    /// `Ok(None)` means the transport finished without error but produced
    /// no message.
    async fn exchange(&self, request: &ExchangeRequest) -> Result<Option<Message>, DomainError>;
}
