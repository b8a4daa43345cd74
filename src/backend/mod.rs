//! Client for the remote authentication API.
//!
//! Every call is a single attempt; failures surface to the caller as
//! [`ApiError`]. Authenticated calls send `Authorization: JWT <access>`.

mod error;
mod tokens;
mod types;
mod users;

pub use self::error::ApiError;
pub use self::types::{TokenPair, UserProfile};
pub use self::users::ProfileUpdate;

use crate::APP_USER_AGENT;
use reqwest::{header::AUTHORIZATION, Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Authorization scheme expected by the remote API.
pub const AUTH_SCHEME: &str = "JWT";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for the API rooted at `base_url`.
    ///
    /// # Errors
    /// Returns `ApiError::Configuration` if the URL is missing or not an
    /// absolute http(s) URL, or if the HTTP client cannot be created.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(ApiError::Configuration("API base URL is not set".to_string()));
        }

        let parsed = Url::parse(trimmed)
            .map_err(|e| ApiError::Configuration(format!("invalid API base URL {trimmed}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ApiError::Configuration(format!(
                "API base URL must be http(s) with a host: {trimmed}"
            )));
        }

        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            // Paths always start with '/', keep any prefix of the base URL.
            base_url: trimmed.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check whether the API answers at all, whatever the status.
    pub async fn reachable(&self) -> bool {
        match self.http.get(&self.base_url).send().await {
            Ok(response) => {
                debug!("API answered health probe with {}", response.status());
                true
            }
            Err(e) => {
                debug!("API health probe failed: {e}");
                false
            }
        }
    }

    fn request(&self, method: Method, path: &str, access: Option<&SecretString>) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{path}", self.base_url));
        match access {
            Some(token) => builder.header(AUTHORIZATION, authorization(token)),
            None => builder,
        }
    }

    /// Send a request and keep only success responses.
    async fn send(&self, path: &str, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(|source| ApiError::Transport {
            path: path.to_string(),
            source,
        })?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            debug!("{path} responded with {status}");
            Err(ApiError::Status {
                path: path.to_string(),
                status,
            })
        }
    }
}

async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::InvalidResponse {
            path: path.to_string(),
            reason: e.to_string(),
        })
}

fn authorization(token: &SecretString) -> String {
    format!("{AUTH_SCHEME} {}", token.expose_secret())
}
