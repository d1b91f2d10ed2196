///! API client for the campus admin backend

use crate::session::Session;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by [`ApiClient`]
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status, when the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            ApiError::Serialization(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Pull a readable message out of an error body.
///
/// FastAPI answers `{"detail": "..."}` or, for validation errors,
/// `{"detail": [{"msg": "..."}, ...]}`. Anything else is passed through.
pub fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("detail") {
            Some(serde_json::Value::String(detail)) => return detail.clone(),
            Some(serde_json::Value::Array(items)) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if !messages.is_empty() {
                    return messages.join("; ");
                }
            }
            _ => {}
        }
    }
    body.trim().to_string()
}

/// Encode one path segment
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Session) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Build request with authentication header
    async fn build_request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "sending request");

        let mut request = self.client.request(method, &url);

        if let Some(token) = self.session.token().await {
            request = request.bearer_auth(token);
        }

        request
    }

    /// Turn a non-2xx response into [`ApiError::Api`]
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let mut message = error_message(&body);
        if message.is_empty() {
            message = status.canonical_reason().unwrap_or("unknown error").to_string();
        }

        tracing::warn!(status = status.as_u16(), %message, "request rejected");
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Decode a JSON body; an empty body decodes as `null`
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let response = Self::check(response).await?;
        let body = response.text().await?;
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        Ok(serde_json::from_str(body)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .build_request(reqwest::Method::GET, path)
            .await
            .send()
            .await?;

        Self::decode(response).await
    }

    /// GET a plain-text body
    pub async fn get_text(&self, path: &str) -> Result<String> {
        let response = self
            .build_request(reqwest::Method::GET, path)
            .await
            .send()
            .await?;

        Ok(Self::check(response).await?.text().await?)
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let response = self
            .build_request(reqwest::Method::POST, path)
            .await
            .json(body)
            .send()
            .await?;

        Self::decode(response).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let response = self
            .build_request(reqwest::Method::PATCH, path)
            .await
            .json(body)
            .send()
            .await?;

        Self::decode(response).await
    }

    /// PATCH where the response body is not needed
    pub async fn patch_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        self.patch::<IgnoredAny, _>(path, body).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self
            .build_request(reqwest::Method::DELETE, path)
            .await
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}
