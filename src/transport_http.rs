//! HTTP archive-gateway transport.
//!
//! Talks to the archive gateway that fronts the message platform. The two
//! gate predicates are lightweight GET probes that fail soft — a 403 or
//! 404 means "no", not an error — while search is a POST that surfaces
//! rate limiting as [`TransportError::RateLimited`] so the fetch layer can
//! back off and retry.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::GatewayConfig;
use crate::models::{RawItem, RequesterId, SourceId};
use crate::transport::{ArchiveTransport, TransportError};

pub struct HttpGatewayTransport {
    base_url: String,
    token: String,
    rate_limit_fallback: Duration,
    client: reqwest::Client,
}

/// Body of a probe response: `{ "granted": bool }`.
#[derive(Debug, Deserialize)]
struct ProbeResponse {
    granted: bool,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    channel_id: i64,
    query: &'a str,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<SearchResponseItem>,
}

#[derive(Debug, Deserialize)]
struct SearchResponseItem {
    id: i64,
    /// Message text or caption; the gateway sends whichever is present.
    #[serde(default)]
    text: String,
}

impl HttpGatewayTransport {
    pub fn new(config: &GatewayConfig, rate_limit_fallback: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            rate_limit_fallback,
            client,
        })
    }

    async fn probe(&self, path: &str) -> Result<bool, TransportError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .send()
            .await?;

        match response.status() {
            StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => {
                let body: ProbeResponse = response.json().await?;
                Ok(body.granted)
            }
            status => Err(TransportError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[async_trait]
impl ArchiveTransport for HttpGatewayTransport {
    async fn is_member(
        &self,
        requester: RequesterId,
        source: SourceId,
    ) -> Result<bool, TransportError> {
        self.probe(&format!("/channels/{}/members/{}", source, requester))
            .await
    }

    async fn has_required_permission(&self, source: SourceId) -> Result<bool, TransportError> {
        self.probe(&format!("/channels/{}/permissions/self", source))
            .await
    }

    async fn search_source(
        &self,
        source: SourceId,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RawItem>, TransportError> {
        let request = SearchRequest {
            channel_id: source.0,
            query,
            limit,
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = parse_retry_after(
                response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|value| value.to_str().ok()),
                self.rate_limit_fallback,
            );
            return Err(TransportError::RateLimited { retry_after });
        }

        if !response.status().is_success() {
            return Err(TransportError::Status {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body: SearchResponse = response.json().await?;
        Ok(body
            .items
            .into_iter()
            .map(|item| RawItem {
                source,
                item_id: item.id,
                body: item.text,
            })
            .collect())
    }
}

/// Interpret a `Retry-After` header as whole seconds, falling back to the
/// configured interval when the header is absent or malformed.
fn parse_retry_after(header: Option<&str>, fallback: Duration) -> Duration {
    header
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(fallback)
}
