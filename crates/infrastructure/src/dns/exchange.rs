use super::message_builder::MessageBuilder;
use super::transport::{self, tcp::TcpTransport, DnsTransport};
use async_trait::async_trait;
use ferrous_probe_application::ports::{DnsExchangePort, ExchangeRequest};
use ferrous_probe_domain::{DnsScheme, DomainError};
use hickory_proto::op::{Message, MessageType};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Floor for the TCP retry budget after a truncated UDP answer.
const MIN_TCP_FALLBACK_BUDGET: Duration = Duration::from_millis(500);

/// Sends queries over the wire transport matching each target's scheme.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransportExchanger;

impl TransportExchanger {
    pub fn new() -> Self {
        Self
    }
}

fn check_response(request: &ExchangeRequest, id: u16, bytes: &[u8]) -> Result<Option<Message>, DomainError> {
    if bytes.is_empty() {
        return Ok(None);
    }

    let message = MessageBuilder::parse_response(bytes)?;

    if message.message_type() != MessageType::Response {
        return Err(DomainError::InvalidDnsResponse(format!(
            "{} answered with a query message",
            request.target
        )));
    }
    if message.id() != id {
        return Err(DomainError::InvalidDnsResponse(format!(
            "{} answered with id {} (expected {})",
            request.target,
            message.id(),
            id
        )));
    }

    Ok(Some(message))
}

#[async_trait]
impl DnsExchangePort for TransportExchanger {
    async fn exchange(&self, request: &ExchangeRequest) -> Result<Option<Message>, DomainError> {
        let started = Instant::now();

        let (id, query_bytes) = match request.target.scheme() {
            DnsScheme::Quic => (
                0,
                MessageBuilder::build_query_with_id(0, &request.domain, request.record_type)?,
            ),
            _ => MessageBuilder::build_query(&request.domain, request.record_type)?,
        };

        let dns_transport = transport::create_transport(&request.target, request.tls_insecure)?;
        let response = dns_transport.send(&query_bytes, request.timeout).await?;

        let message = match check_response(request, id, &response.bytes)? {
            Some(message) => message,
            None => return Ok(None),
        };

        if !message.truncated() || request.target.scheme() != DnsScheme::Udp {
            return Ok(Some(message));
        }

        // Same address, same query, over TCP.
        let Some(addr) = request.target.socket_addr() else {
            return Ok(Some(message));
        };
        debug!(server = %addr, "Response truncated (TC bit), retrying via TCP");

        let budget = request
            .timeout
            .checked_sub(started.elapsed())
            .unwrap_or(MIN_TCP_FALLBACK_BUDGET)
            .max(MIN_TCP_FALLBACK_BUDGET);
        let tcp_response = TcpTransport::new(addr).send(&query_bytes, budget).await?;

        check_response(request, id, &tcp_response.bytes)
    }
}
