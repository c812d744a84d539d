use crate::dto::{DnsLookupRequest, ReverseLookupRequest, TaskCreatedResponse, TaskStatusResponse};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("api error ({status}): {body}")]
    Api { status: u16, body: String },
}

/// HTTP client for a running job API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// `insecure` disables certificate checks on an `https` base URL.
    pub fn new(base_url: &str, timeout: Duration, insecure: bool) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .user_agent(concat!("ferrous-probe/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .danger_accept_invalid_certs(insecure)
            .build()
            .map_err(|source| ClientError::Http {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn enqueue_lookup(&self, request: &DnsLookupRequest) -> Result<String, ClientError> {
        self.post_task("/dns-lookup", request).await
    }

    pub async fn enqueue_reverse_lookup(
        &self,
        request: &ReverseLookupRequest,
    ) -> Result<String, ClientError> {
        self.post_task("/reverse-lookup", request).await
    }

    pub async fn get_task_status(&self, task_id: &str) -> Result<TaskStatusResponse, ClientError> {
        let url = format!("{}/tasks/{}", self.base_url, task_id);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Http { url: url.clone(), source })?;
        decode(url, response).await
    }

    async fn post_task<T: Serialize>(&self, path: &str, payload: &T) -> Result<String, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|source| ClientError::Http { url: url.clone(), source })?;

        let created: TaskCreatedResponse = decode(url, response).await?;
        Ok(created.task_id)
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    url: String,
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Api {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json()
        .await
        .map_err(|source| ClientError::Http { url, source })
}
