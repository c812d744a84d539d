//! TLS Transport for DNS queries, DNS-over-TLS (RFC 7858)
//!
//! Every query opens a fresh TCP connection and TLS handshake so the
//! measured time covers the full exchange.

use super::resolver::resolve_target;
use super::tcp::{connect_tcp, read_with_length_prefix, send_with_length_prefix};
use super::tls_config::tls_client_config;
use super::{remaining, DnsTransport, TransportResponse};
use async_trait::async_trait;
use bytes::Bytes;
use ferrous_probe_domain::{DnsTarget, DomainError};
use rustls::pki_types::ServerName;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::Instant;
use tokio_rustls::client::TlsStream;
use tracing::debug;

pub struct TlsTransport {
    target: DnsTarget,
    insecure: bool,
}

impl TlsTransport {
    pub fn new(target: DnsTarget, insecure: bool) -> Self {
        Self { target, insecure }
    }

    fn server_name(&self) -> Result<ServerName<'static>, DomainError> {
        ServerName::try_from(self.target.server_name()).map_err(|e| DomainError::TransportFailure {
            server: self.target.to_string(),
            reason: format!("invalid TLS server name: {}", e),
        })
    }

    fn timeout_error(&self) -> DomainError {
        DomainError::TransportTimeout {
            server: self.target.to_string(),
        }
    }

    async fn connect(&self, deadline: Instant) -> Result<TlsStream<TcpStream>, DomainError> {
        let server_name = self.server_name()?;
        let server_addr = resolve_target(&self.target, remaining(deadline)).await?;
        let tcp_stream = connect_tcp(server_addr, remaining(deadline)).await?;

        let connector = tokio_rustls::TlsConnector::from(tls_client_config(self.insecure));
        let stream = tokio::time::timeout(remaining(deadline), connector.connect(server_name, tcp_stream))
            .await
            .map_err(|_| self.timeout_error())?
            .map_err(|e| DomainError::TransportFailure {
                server: self.target.to_string(),
                reason: format!("TLS handshake failed: {}", e),
            })?;

        debug!(server = %server_addr, hostname = %self.target.server_name(), "TLS connection established");
        Ok(stream)
    }
}

#[async_trait]
impl DnsTransport for TlsTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let deadline = Instant::now() + timeout;
        let mut stream = self.connect(deadline).await?;

        tokio::time::timeout(remaining(deadline), send_with_length_prefix(&mut stream, message_bytes))
            .await
            .map_err(|_| self.timeout_error())??;

        let response_bytes = tokio::time::timeout(remaining(deadline), read_with_length_prefix(&mut stream))
            .await
            .map_err(|_| self.timeout_error())??;

        debug!(server = %self.target, response_len = response_bytes.len(), "TLS response received");

        Ok(TransportResponse {
            bytes: Bytes::from(response_bytes),
            protocol_used: "TLS",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TLS"
    }
}
