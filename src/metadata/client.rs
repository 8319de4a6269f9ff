//! reqwest-backed metadata source

use super::{MetadataSource, extract};
use crate::config::MetadataConfig;
use crate::error::{Error, Result};
use crate::types::{MetadataRecord, UserId};
use crate::utils::truncate_chars;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Queries `<base_url>?<user_id_param>=<id>` once per identifier
#[derive(Debug, Clone)]
pub struct HttpMetadataClient {
    http_client: reqwest::Client,
    base_url: Url,
    user_id_param: String,
    bearer_token: Option<String>,
    timeout: Duration,
    max_error_body_chars: usize,
}

impl HttpMetadataClient {
    /// Create a client from configuration
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the base URL does not parse, or
    /// [`Error::Network`] if the HTTP client cannot be built.
    pub fn new(config: &MetadataConfig) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim()).map_err(|e| {
            Error::config(
                "metadata.base_url",
                format!("invalid URL '{}': {}", config.base_url, e),
            )
        })?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            user_id_param: config.user_id_param.clone(),
            bearer_token: config.bearer_token.clone(),
            timeout: config.timeout,
            max_error_body_chars: config.max_error_body_chars,
        })
    }

    /// The request URL for one identifier, with the identifier URL-encoded
    pub fn endpoint_for(&self, user_id: &UserId) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair(&self.user_id_param, user_id.as_str());
        url
    }

    fn describe(&self, e: &reqwest::Error) -> String {
        if e.is_timeout() {
            format!("request timed out after {} seconds", self.timeout.as_secs_f64())
        } else if e.is_connect() {
            format!("connection failed: {e}")
        } else if e.is_decode() {
            format!("response body is not valid JSON: {e}")
        } else {
            format!("request failed: {e}")
        }
    }
}

#[async_trait]
impl MetadataSource for HttpMetadataClient {
    async fn fetch(&self, user_id: &UserId) -> MetadataRecord {
        let url = self.endpoint_for(user_id);

        let mut request = self.http_client.get(url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let message = self.describe(&e);
                warn!(user_id = %user_id, error = %message, "Metadata request failed");
                return MetadataRecord::transport_failure(user_id, message);
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(user_id = %user_id, status = status.as_u16(), "Metadata service returned an error");
            return MetadataRecord::http_failure(
                user_id,
                status.as_u16(),
                truncate_chars(body.trim(), self.max_error_body_chars),
            );
        }

        match response.json::<serde_json::Value>().await {
            Ok(body) => {
                debug!(user_id = %user_id, "Fetched metadata");
                extract::record_from_body(user_id, &body)
            }
            Err(e) => {
                let message = self.describe(&e);
                warn!(user_id = %user_id, error = %message, "Unreadable metadata response");
                MetadataRecord::transport_failure(user_id, message)
            }
        }
    }
}
