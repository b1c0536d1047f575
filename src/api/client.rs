//! HTTP client for the Share Trips REST backend.

use std::time::Duration;

use reqwest::{multipart, Client, RequestBuilder, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::session::SessionCookies;

/// Errors returned by [`ApiClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status {status}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Body of a non-2xx response, if this error carries one.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Raw response of a form submission: status and body text, whatever the status.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Client for the Share Trips backend.
///
/// Every request carries `Authorization: Bearer <token>` when the session
/// cookies hold an access token.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    cookies: SessionCookies,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the backend (e.g., "http://localhost:8000")
    /// * `timeout_sec` - Request timeout in seconds
    /// * `cookies` - Session cookies the access token is read from
    pub fn new(base_url: &str, timeout_sec: u64, cookies: SessionCookies) -> Result<Self, ApiError> {
        let parsed =
            Url::parse(base_url).map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()?;

        // Ensure base_url doesn't have trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            cookies,
        })
    }

    /// Get the base URL of the backend.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.cookies.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET `path` and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!("GET {}", path);
        let response = self.authorize(self.client.get(self.url(path))).send().await?;
        Self::decode(response).await
    }

    /// POST `body` as JSON to `path` and decode the JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST {}", path);
        let response = self
            .authorize(self.client.post(self.url(path)))
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// PUT text `fields` as a multipart form.
    ///
    /// Non-2xx statuses are not errors here: the caller inspects
    /// [`ApiResponse::status`] and the body. Only transport failures are.
    pub async fn put_form(
        &self,
        path: &str,
        fields: Vec<(String, String)>,
    ) -> Result<ApiResponse, ApiError> {
        debug!("PUT {} ({} form fields)", path, fields.len());
        let form = fields
            .into_iter()
            .fold(multipart::Form::new(), |form, (name, value)| {
                form.text(name, value)
            });

        let response = self
            .authorize(self.client.put(self.url(path)))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Ok(ApiResponse { status, body })
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
