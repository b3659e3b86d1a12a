// src/api/http.rs
use std::sync::Arc;
use std::time::Instant;

use reqwest::{multipart::Form, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::types::ApiEnvelope;
use crate::utils::{
    config::Config,
    error::{ClientError, Result},
    metrics::Metrics,
};

/// Shared HTTP plumbing: base URL joining, envelope decoding, metrics.
#[derive(Clone)]
pub struct ApiTransport {
    client: Client,
    base_url: String,
    metrics: Arc<Metrics>,
}

impl ApiTransport {
    pub fn new(config: &Config, metrics: Arc<Metrics>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.get_request_timeout())
            .connect_timeout(config.get_connect_timeout())
            .user_agent(concat!("finguard-kyc/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api.base_url.trim().trim_end_matches('/').to_string(),
            metrics,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let request = self.client.get(self.url(path)).query(query);
        self.send(path, request).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).json(body);
        self.send(path, request).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        let request = self.client.post(self.url(path)).multipart(form);
        self.send(path, request).await
    }

    async fn send<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> Result<T> {
        let started = Instant::now();
        let result = Self::exchange(request).await;
        let elapsed = started.elapsed();

        self.metrics.record_request(elapsed, result.is_ok());
        match &result {
            Ok(_) => debug!(endpoint = path, elapsed_ms = elapsed.as_millis() as u64, "Request succeeded"),
            Err(e) => warn!(endpoint = path, elapsed_ms = elapsed.as_millis() as u64, "Request failed: {}", e),
        }

        result
    }

    async fn exchange<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        decode_envelope(status, &body)
    }
}

/// Maps a raw response onto the crate's error taxonomy. A parseable envelope
/// wins over the HTTP status, since the backend reports refusals as 4xx/5xx
/// with `success: false`.
pub(crate) fn decode_envelope<T: DeserializeOwned>(status: reqwest::StatusCode, body: &str) -> Result<T> {
    match serde_json::from_str::<ApiEnvelope<T>>(body) {
        Ok(envelope) => envelope.into_result(),
        Err(e) if status.is_success() => Err(ClientError::Decode(e.to_string())),
        Err(_) => Err(ClientError::Transport(format!("HTTP {}: {}", status, snippet(body)))),
    }
}

fn snippet(body: &str) -> &str {
    let body = body.trim();
    match body.char_indices().nth(120) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
