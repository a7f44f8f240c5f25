//! HTTP client: base URL, bearer auth, body encoding and response
//! normalization.
//!
//! ARCHITECTURE
//! ============
//! [`ApiClient`] builds an [`HttpRequest`] and hands it to a [`Transport`].
//! The production transport is [`ReqwestTransport`]; tests swap in a
//! recording mock. Everything the backend contract cares about (which
//! headers are sent, how bodies are encoded, how failures are classified)
//! is decided in `ApiClient`, not in the transport.
//!
//! ERROR HANDLING
//! ==============
//! - Transport failure (no response) -> [`ApiError::Connectivity`].
//! - Non-2xx -> [`ApiError::Http`] with the body's `error` or `message`
//!   field, or `"request failed: <status> <reason>"` when absent.
//! - 2xx with a non-JSON body -> [`ApiError::Malformed`].
//!
//! Every call is a single attempt.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;
use crate::config::{ClientConfig, ConfigError, Timeouts};
use crate::storage::TokenStore;
use crate::util::image::ImageFile;

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const JSON_CONTENT_TYPE: &str = "application/json";

// =============================================================================
// REQUEST / RESPONSE MODEL
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Delete => Self::DELETE,
        }
    }
}

/// One part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartPart {
    Text { name: String, value: String },
    File { name: String, file: ImageFile },
}

/// Multipart form under construction. The transport picks the boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<MultipartPart>,
}

impl MultipartForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts.push(MultipartPart::Text { name: name.to_owned(), value: value.into() });
        self
    }

    #[must_use]
    pub fn file(mut self, name: &str, file: ImageFile) -> Self {
        self.parts.push(MultipartPart::File { name: name.to_owned(), file });
        self
    }

    #[must_use]
    pub fn parts(&self) -> &[MultipartPart] {
        &self.parts
    }

    /// Value of the first text part called `name`.
    #[must_use]
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            MultipartPart::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// First file part called `name`.
    #[must_use]
    pub fn file_part(&self, name: &str) -> Option<&ImageFile> {
        self.parts.iter().find_map(|part| match part {
            MultipartPart::File { name: n, file } if n == name => Some(file),
            _ => None,
        })
    }

    fn into_reqwest(self) -> Result<reqwest::multipart::Form, reqwest::Error> {
        let mut form = reqwest::multipart::Form::new();
        for part in self.parts {
            form = match part {
                MultipartPart::Text { name, value } => form.text(name, value),
                MultipartPart::File { name, file } => {
                    let part = reqwest::multipart::Part::bytes(file.bytes)
                        .file_name(file.file_name)
                        .mime_str(&file.mime_type)?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(MultipartForm),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

/// No response was received.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

// =============================================================================
// TRANSPORT
// =============================================================================

/// Sends one request and returns whatever the server answered.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns an error if the reqwest client cannot be built.
    pub fn new(timeouts: Timeouts) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(timeouts.request())
            .connect_timeout(timeouts.connect())
            .build()
            .map_err(|e| ConfigError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.http.request(request.method.into(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => {
                let bytes = serde_json::to_vec(&value).map_err(|e| TransportError(e.to_string()))?;
                builder.body(bytes)
            }
            RequestBody::Multipart(form) => {
                builder.multipart(form.into_reqwest().map_err(|e| TransportError(e.to_string()))?)
            }
        };

        let response = builder.send().await.map_err(|e| TransportError(e.to_string()))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| TransportError(e.to_string()))?;
        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            body,
        })
    }
}

// =============================================================================
// API CLIENT
// =============================================================================

/// Request builder bound to one backend origin and one token slot.
///
/// Cheap to clone; clones share the transport and the token store.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    tokens: TokenStore,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: &str, tokens: TokenStore, transport: Arc<dyn Transport>) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_owned(), tokens, transport }
    }

    /// Build a client with the reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &ClientConfig, tokens: TokenStore) -> Result<Self, ConfigError> {
        let transport = ReqwestTransport::new(config.timeouts)?;
        Ok(Self::new(&config.base_url, tokens, Arc::new(transport)))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Issue one request and return the parsed JSON body.
    ///
    /// # Errors
    ///
    /// See the module docs for the classification of failures.
    pub async fn request(&self, method: Method, path: &str, body: RequestBody) -> Result<Value, ApiError> {
        let request = self.build_request(method, path, body);
        tracing::debug!(
            method = method.as_str(),
            %path,
            authenticated = request.header(AUTHORIZATION).is_some(),
            "api request"
        );

        let response = self.transport.send(request).await.map_err(|error| {
            tracing::warn!(method = method.as_str(), %path, %error, "api request got no response");
            ApiError::connectivity(error)
        })?;

        let result = normalize_response(response);
        if let Err(error) = &result {
            tracing::debug!(method = method.as_str(), %path, status = ?error.status(), %error, "api request failed");
        }
        result
    }

    /// Like [`Self::request`], decoding the body into `T`.
    ///
    /// # Errors
    ///
    /// As [`Self::request`], plus [`ApiError::Malformed`] if the body does
    /// not match `T`.
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<T, ApiError> {
        let value = self.request(method, path, body).await?;
        decode(value)
    }

    /// Liveness probe against `GET /health`.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Self::request`].
    pub async fn health(&self) -> Result<Value, ApiError> {
        self.request(Method::Get, "/health", RequestBody::Empty).await
    }

    pub(crate) fn build_request(&self, method: Method, path: &str, body: RequestBody) -> HttpRequest {
        let mut headers = Vec::new();
        if let Some(token) = self.tokens.get() {
            headers.push((AUTHORIZATION.to_owned(), format!("Bearer {token}")));
        }
        if matches!(body, RequestBody::Json(_)) {
            headers.push((CONTENT_TYPE.to_owned(), JSON_CONTENT_TYPE.to_owned()));
        }
        HttpRequest { method, url: format!("{}{path}", self.base_url), headers, body }
    }
}

/// Decode a JSON body into a typed value.
///
/// # Errors
///
/// Returns [`ApiError::Malformed`] when the shape does not match.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(ApiError::malformed)
}

fn parse_body(body: &str) -> Result<Value, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body)
}

fn error_field(body: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(ToOwned::to_owned)
}

pub(crate) fn normalize_response(response: HttpResponse) -> Result<Value, ApiError> {
    let parsed = parse_body(&response.body);
    if (200..300).contains(&response.status) {
        return parsed.map_err(ApiError::malformed);
    }

    let body = parsed.ok();
    let message = body.as_ref().and_then(error_field).unwrap_or_else(|| {
        format!("request failed: {} {}", response.status, response.status_text)
            .trim_end()
            .to_owned()
    });
    Err(ApiError::Http { status: response.status, message, body })
}
