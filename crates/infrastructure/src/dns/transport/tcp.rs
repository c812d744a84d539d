use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use bytes::Bytes;
use ferrous_probe_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

const MAX_TCP_MESSAGE_SIZE: usize = 65535;

/// DNS over TCP (RFC 1035 §4.2.2), two-byte length prefix framing.
pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }
}

pub(crate) async fn connect_tcp(
    server_addr: SocketAddr,
    timeout: Duration,
) -> Result<TcpStream, DomainError> {
    let stream = tokio::time::timeout(timeout, TcpStream::connect(server_addr))
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: server_addr.to_string(),
        })?
        .map_err(|e| DomainError::TransportConnectionRefused {
            server: format!("{}: {}", server_addr, e),
        })?;

    stream
        .set_nodelay(true)
        .map_err(|e| DomainError::IoError(format!("Failed to set TCP_NODELAY on {}: {}", server_addr, e)))?;

    Ok(stream)
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let mut stream = connect_tcp(self.server_addr, timeout).await?;

        tokio::time::timeout(timeout, send_with_length_prefix(&mut stream, message_bytes))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server_addr.to_string(),
            })??;

        debug!(server = %self.server_addr, message_len = message_bytes.len(), "TCP query sent");

        let response_bytes = tokio::time::timeout(timeout, read_with_length_prefix(&mut stream))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server_addr.to_string(),
            })??;

        debug!(server = %self.server_addr, response_len = response_bytes.len(), "TCP response received");

        Ok(TransportResponse {
            bytes: Bytes::from(response_bytes),
            protocol_used: "TCP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}

pub(crate) async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> Result<(), DomainError>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        DomainError::IoError(format!("DNS message too large: {} bytes", message_bytes.len()))
    })?;

    let mut framed = Vec::with_capacity(message_bytes.len() + 2);
    framed.extend_from_slice(&length.to_be_bytes());
    framed.extend_from_slice(message_bytes);

    stream
        .write_all(&framed)
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to write DNS message: {}", e)))?;
    stream
        .flush()
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to flush stream: {}", e)))?;

    Ok(())
}

pub(crate) async fn read_with_length_prefix<S>(stream: &mut S) -> Result<Vec<u8>, DomainError>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to read response length: {}", e)))?;

    let response_len = u16::from_be_bytes(len_buf) as usize;
    if response_len > MAX_TCP_MESSAGE_SIZE {
        return Err(DomainError::InvalidDnsResponse(format!(
            "Response too large: {} bytes (max {})",
            response_len, MAX_TCP_MESSAGE_SIZE
        )));
    }

    let mut response = vec![0u8; response_len];
    stream
        .read_exact(&mut response)
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to read response body: {}", e)))?;

    Ok(response)
}
