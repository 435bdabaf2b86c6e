//! Runtime configuration for the backend origins.
//!
//! The dashboard talks to two origins: the analytics service that answers
//! `/api/github` posts, and the host that serves generated forecast images
//! under `/static/images`. In most deployments they are the same host, so the
//! image origin defaults to the API origin.

/// Backend origins used by [`crate::client::AnalyticsClient`].
#[derive(Clone, Debug)]
pub struct Config {
    /// Origin of the analytics service, without a trailing slash.
    pub api_url: String,
    /// Origin serving forecast image renders, without a trailing slash.
    pub image_url: String,
}

impl Config {
    /// Read configuration from `GITCAST_API_URL` and `GITCAST_IMAGE_URL`,
    /// falling back to the local development defaults.
    pub fn from_env() -> Self {
        let api_url = std::env::var("GITCAST_API_URL")
            .map(normalize_origin)
            .unwrap_or_else(|_| "http://localhost:5000".to_string());
        let image_url = std::env::var("GITCAST_IMAGE_URL")
            .map(normalize_origin)
            .unwrap_or_else(|_| api_url.clone());
        Self { api_url, image_url }
    }
}

/// Strip trailing slashes so request paths can always be appended verbatim.
fn normalize_origin(origin: String) -> String {
    origin.trim_end_matches('/').to_string()
}
