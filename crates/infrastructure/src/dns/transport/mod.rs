#[cfg(feature = "dns-over-https")]
pub mod https;
#[cfg(feature = "dns-over-quic")]
pub mod quic;
pub mod resolver;
pub mod tcp;
#[cfg(feature = "dns-over-rustls")]
pub mod tls;
pub mod tls_config;
pub mod udp;

use async_trait::async_trait;
use bytes::Bytes;
use ferrous_probe_domain::{DnsScheme, DnsTarget, DomainError};
use std::time::Duration;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Bytes,
    pub protocol_used: &'static str,
}

#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}

pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
    #[cfg(feature = "dns-over-rustls")]
    Tls(tls::TlsTransport),
    #[cfg(feature = "dns-over-https")]
    Https(https::HttpsTransport),
    #[cfg(feature = "dns-over-quic")]
    Quic(quic::QuicTransport),
}

impl Transport {
    pub async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            #[cfg(feature = "dns-over-rustls")]
            Self::Tls(t) => DnsTransport::send(t, message_bytes, timeout).await,
            #[cfg(feature = "dns-over-https")]
            Self::Https(t) => DnsTransport::send(t, message_bytes, timeout).await,
            #[cfg(feature = "dns-over-quic")]
            Self::Quic(t) => DnsTransport::send(t, message_bytes, timeout).await,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(_) => "UDP",
            Self::Tcp(_) => "TCP",
            #[cfg(feature = "dns-over-rustls")]
            Self::Tls(_) => "TLS",
            #[cfg(feature = "dns-over-https")]
            Self::Https(_) => "HTTPS",
            #[cfg(feature = "dns-over-quic")]
            Self::Quic(_) => "QUIC",
        }
    }
}

/// Time left before `deadline`, zero once it has passed.
pub(crate) fn remaining(deadline: tokio::time::Instant) -> Duration {
    deadline.saturating_duration_since(tokio::time::Instant::now())
}

fn requires_ip(target: &DnsTarget) -> Result<std::net::SocketAddr, DomainError> {
    target.socket_addr().ok_or_else(|| DomainError::TransportFailure {
        server: target.to_string(),
        reason: "plain DNS requires an IP address".to_string(),
    })
}

fn feature_disabled(target: &DnsTarget, feature: &str) -> DomainError {
    DomainError::TransportFailure {
        server: target.to_string(),
        reason: format!("enable the '{}' feature to use this scheme", feature),
    }
}

/// Picks the transport for `target`. Hostnames are resolved lazily by the
/// encrypted transports.
pub fn create_transport(target: &DnsTarget, tls_insecure: bool) -> Result<Transport, DomainError> {
    match target.scheme() {
        DnsScheme::Udp => Ok(Transport::Udp(udp::UdpTransport::new(requires_ip(target)?))),
        DnsScheme::Tcp => Ok(Transport::Tcp(tcp::TcpTransport::new(requires_ip(target)?))),

        #[cfg(feature = "dns-over-rustls")]
        DnsScheme::Tls => Ok(Transport::Tls(tls::TlsTransport::new(target.clone(), tls_insecure))),
        #[cfg(not(feature = "dns-over-rustls"))]
        DnsScheme::Tls => Err(feature_disabled(target, "dns-over-rustls")),

        #[cfg(feature = "dns-over-https")]
        DnsScheme::Https => Ok(Transport::Https(https::HttpsTransport::new(target, tls_insecure)?)),
        #[cfg(not(feature = "dns-over-https"))]
        DnsScheme::Https => Err(feature_disabled(target, "dns-over-https")),

        #[cfg(feature = "dns-over-quic")]
        DnsScheme::Quic => Ok(Transport::Quic(quic::QuicTransport::new(target.clone(), tls_insecure))),
        #[cfg(not(feature = "dns-over-quic"))]
        DnsScheme::Quic => Err(feature_disabled(target, "dns-over-quic")),
    }
}
