//! QUIC Transport for DNS queries, DNS-over-QUIC (RFC 9250)
//!
//! One bidirectional stream per query, length-prefixed like TCP. The
//! message id must be 0 on the wire.

use super::resolver::resolve_target;
use super::tcp::{read_with_length_prefix, send_with_length_prefix};
use super::tls_config::doq_client_config;
use super::{remaining, DnsTransport, TransportResponse};
use async_trait::async_trait;
use bytes::Bytes;
use ferrous_probe_domain::{DnsTarget, DomainError};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// DoQ error code for a clean close (RFC 9250 §4.3)
const DOQ_NO_ERROR: u32 = 0;

pub struct QuicTransport {
    target: DnsTarget,
    insecure: bool,
}

impl QuicTransport {
    pub fn new(target: DnsTarget, insecure: bool) -> Self {
        Self { target, insecure }
    }

    fn timeout_error(&self) -> DomainError {
        DomainError::TransportTimeout {
            server: self.target.to_string(),
        }
    }

    fn failure(&self, reason: String) -> DomainError {
        DomainError::TransportFailure {
            server: self.target.to_string(),
            reason,
        }
    }

    fn client_config(&self) -> Result<quinn::ClientConfig, DomainError> {
        let crypto = quinn::crypto::rustls::QuicClientConfig::try_from(doq_client_config(self.insecure))
            .map_err(|e| self.failure(format!("invalid QUIC TLS config: {}", e)))?;
        Ok(quinn::ClientConfig::new(Arc::new(crypto)))
    }

    fn endpoint(&self, server_addr: SocketAddr) -> Result<quinn::Endpoint, DomainError> {
        let bind: SocketAddr = if server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };
        quinn::Endpoint::client(bind)
            .map_err(|e| DomainError::IoError(format!("Failed to bind QUIC endpoint: {}", e)))
    }

    async fn exchange_on(
        &self,
        conn: &quinn::Connection,
        message_bytes: &[u8],
        deadline: Instant,
    ) -> Result<Vec<u8>, DomainError> {
        let (mut send_stream, mut recv_stream) = tokio::time::timeout(remaining(deadline), conn.open_bi())
            .await
            .map_err(|_| self.timeout_error())?
            .map_err(|e| self.failure(format!("failed to open QUIC stream: {}", e)))?;

        tokio::time::timeout(remaining(deadline), send_with_length_prefix(&mut send_stream, message_bytes))
            .await
            .map_err(|_| self.timeout_error())??;

        send_stream
            .finish()
            .map_err(|e| self.failure(format!("failed to finish QUIC send stream: {}", e)))?;

        tokio::time::timeout(remaining(deadline), read_with_length_prefix(&mut recv_stream))
            .await
            .map_err(|_| self.timeout_error())?
    }
}

#[async_trait]
impl DnsTransport for QuicTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let deadline = Instant::now() + timeout;
        let server_addr = resolve_target(&self.target, remaining(deadline)).await?;
        let endpoint = self.endpoint(server_addr)?;

        let connecting = endpoint
            .connect_with(self.client_config()?, server_addr, &self.target.server_name())
            .map_err(|e| self.failure(format!("failed to initiate QUIC connection: {}", e)))?;

        let conn = tokio::time::timeout(remaining(deadline), connecting)
            .await
            .map_err(|_| self.timeout_error())?
            .map_err(|e| DomainError::TransportConnectionRefused {
                server: format!("{}({}): {}", self.target, server_addr, e),
            })?;

        debug!(server = %server_addr, hostname = %self.target.server_name(), "QUIC connection established");

        let result = self.exchange_on(&conn, message_bytes, deadline).await;

        conn.close(quinn::VarInt::from_u32(DOQ_NO_ERROR), b"");

        let response_bytes = result?;
        debug!(server = %server_addr, response_len = response_bytes.len(), "QUIC response received");

        Ok(TransportResponse {
            bytes: Bytes::from(response_bytes),
            protocol_used: "QUIC",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "QUIC"
    }
}
