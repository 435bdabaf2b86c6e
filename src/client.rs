//! HTTP client for the analytics/forecasting service.
//!
//! The service is a black box: one POST endpoint accepts the current
//! selection and returns aggregated monthly counts plus forecast image
//! references. There is no retry, no backoff, and no client-side timeout
//! beyond the transport default; a failed request simply surfaces as a
//! [`ClientError`] and the user retries by changing the selection.

use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::types::{RepoStats, Selection};

/// Errors surfaced by [`AnalyticsClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connection refused, DNS, body decode).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("analytics service returned {0}")]
    Status(StatusCode),
}

/// Wire shape of the POST body understood by the analytics service.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsRequest<'a> {
    repository: &'a str,
    data_type: &'a str,
    model_type: &'a str,
}

/// Client for the analytics service.
///
/// Cheap to clone; wraps a pooled [`reqwest::Client`].
#[derive(Clone)]
pub struct AnalyticsClient {
    http: Client,
    api_url: String,
    image_url: String,
}

impl AnalyticsClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            api_url: config.api_url.clone(),
            image_url: config.image_url.clone(),
        }
    }

    /// POST the selection and parse the aggregated response.
    ///
    /// Missing response fields deserialize to empty series and absent image
    /// references, so a partial payload is a success, not an error.
    pub async fn fetch_stats(&self, selection: &Selection) -> Result<RepoStats, ClientError> {
        let body = StatsRequest {
            repository: &selection.repository,
            data_type: selection.category.as_str(),
            model_type: selection.model.as_str(),
        };
        debug!(
            repository = %selection.repository,
            category = selection.category.as_str(),
            model = selection.model.as_str(),
            "requesting repository stats"
        );

        let response = self
            .http
            .post(format!("{}/api/github", self.api_url))
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }
        Ok(response.json().await?)
    }

    /// Fetch forecast image bytes.
    ///
    /// Absolute URLs (cloud storage) are fetched as-is; relative
    /// `/static/images/...` paths resolve against the configured image origin.
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        let absolute = self.resolve_image_url(url);
        let response = self.http.get(&absolute).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }
        Ok(response.bytes().await?.to_vec())
    }

    fn resolve_image_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}/{}", self.image_url, url.trim_start_matches('/'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_client() -> AnalyticsClient {
        AnalyticsClient::new(&Config {
            api_url: "http://api.test".to_string(),
            image_url: "http://images.test".to_string(),
        })
    }

    #[test]
    fn request_body_uses_service_field_names() {
        let body = StatsRequest {
            repository: "a/b",
            data_type: "issues",
            model_type: "lstm",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "repository": "a/b",
                "dataType": "issues",
                "modelType": "lstm"
            })
        );
    }

    #[test]
    fn relative_image_paths_resolve_against_image_origin() {
        let client = test_client();
        assert_eq!(
            client.resolve_image_url("/static/images/loss.png"),
            "http://images.test/static/images/loss.png"
        );
        assert_eq!(
            client.resolve_image_url("static/images/loss.png"),
            "http://images.test/static/images/loss.png"
        );
    }

    #[test]
    fn absolute_image_urls_pass_through() {
        let client = test_client();
        assert_eq!(
            client.resolve_image_url("https://storage.example.com/img.png"),
            "https://storage.example.com/img.png"
        );
    }
}
