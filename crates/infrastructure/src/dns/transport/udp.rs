//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is (no framing). If the response has the TC bit set
//! the caller retries over TCP.

use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use bytes::Bytes;
use ferrous_probe_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn bind_addr(&self) -> SocketAddr {
        if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        }
    }

    fn timeout_error(&self) -> DomainError {
        DomainError::TransportTimeout {
            server: self.server_addr.to_string(),
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let socket = UdpSocket::bind(self.bind_addr())
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind UDP socket: {}", e)))?;

        // Connected sockets drop datagrams from other peers.
        socket.connect(self.server_addr).await.map_err(|e| {
            DomainError::TransportConnectionRefused {
                server: format!("{}: {}", self.server_addr, e),
            }
        })?;

        let bytes_sent = tokio::time::timeout(timeout, socket.send(message_bytes))
            .await
            .map_err(|_| self.timeout_error())?
            .map_err(|e| DomainError::TransportFailure {
                server: self.server_addr.to_string(),
                reason: format!("send failed: {}", e),
            })?;

        debug!(server = %self.server_addr, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let bytes_received = tokio::time::timeout(timeout, socket.recv(&mut recv_buf))
            .await
            .map_err(|_| self.timeout_error())?
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused {
                    server: self.server_addr.to_string(),
                },
                _ => DomainError::TransportFailure {
                    server: self.server_addr.to_string(),
                    reason: format!("receive failed: {}", e),
                },
            })?;

        if bytes_received == MAX_UDP_RESPONSE_SIZE {
            warn!(server = %self.server_addr, "UDP response filled the receive buffer");
        }

        recv_buf.truncate(bytes_received);
        debug!(server = %self.server_addr, bytes_received, "UDP response received");

        Ok(TransportResponse {
            bytes: Bytes::from(recv_buf),
            protocol_used: "UDP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}
