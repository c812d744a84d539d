//! HTTPS Transport for DNS queries, DNS-over-HTTPS (RFC 8484)
//!
//! Sends DNS queries as HTTP POST requests with `application/dns-message`
//! content type. The request body is the raw DNS wire format message, and
//! the response body contains the raw DNS wire format response.

use super::tls_config::ensure_crypto_provider;
use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use ferrous_probe_domain::{DnsTarget, DomainError};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

fn build_client(insecure: bool) -> reqwest::Client {
    ensure_crypto_provider();
    reqwest::Client::builder()
        .use_rustls_tls()
        .danger_accept_invalid_certs(insecure)
        .pool_max_idle_per_host(0)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

static VERIFIED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| build_client(false));
static INSECURE_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| build_client(true));

pub struct HttpsTransport {
    url: String,
    insecure: bool,
}

impl HttpsTransport {
    pub fn new(target: &DnsTarget, insecure: bool) -> Result<Self, DomainError> {
        let url = target.url().ok_or_else(|| DomainError::TransportFailure {
            server: target.to_string(),
            reason: "not an HTTPS target".to_string(),
        })?;
        Ok(Self { url, insecure })
    }

    fn client(&self) -> &'static reqwest::Client {
        if self.insecure {
            &INSECURE_CLIENT
        } else {
            &VERIFIED_CLIENT
        }
    }

    fn request_error(&self, e: reqwest::Error) -> DomainError {
        if e.is_timeout() {
            DomainError::TransportTimeout {
                server: self.url.clone(),
            }
        } else if e.is_connect() {
            DomainError::TransportConnectionRefused {
                server: format!("{}: {}", self.url, e),
            }
        } else {
            DomainError::TransportFailure {
                server: self.url.clone(),
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl DnsTransport for HttpsTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        debug!(url = %self.url, message_len = message_bytes.len(), "Sending DoH query");

        let response = self
            .client()
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, DNS_MESSAGE_CONTENT_TYPE)
            .header(reqwest::header::ACCEPT, DNS_MESSAGE_CONTENT_TYPE)
            .body(message_bytes.to_vec())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::TransportFailure {
                server: self.url.clone(),
                reason: format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            });
        }

        let response_bytes = response.bytes().await.map_err(|e| self.request_error(e))?;

        debug!(url = %self.url, response_len = response_bytes.len(), "DoH response received");

        Ok(TransportResponse {
            bytes: response_bytes,
            protocol_used: "HTTPS",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "HTTPS"
    }
}
