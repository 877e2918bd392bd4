//! HTTP utilities for SemaphoreUI REST API calls

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Header carrying a client-generated key on create requests
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Errors raised by the transport layer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to send request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API request failed: {status} {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected response code: {actual} (expected {expected})")]
    UnexpectedStatus {
        expected: StatusCode,
        actual: StatusCode,
    },

    #[error("failed to parse response JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("path parameter `{0}` has no value")]
    MissingPathParam(String),

    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status carried by this error, if the server answered
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::UnexpectedStatus { actual, .. } => Some(*actual),
            Self::Request(err) => err.status(),
            _ => None,
        }
    }

    /// Short operator hint for the failure
    /// Security: never echoes the raw response body
    pub fn hint(&self) -> Option<&'static str> {
        match self.status()?.as_u16() {
            401 => Some("Authentication failed. Check the API token."),
            403 => Some("Permission denied. The token's user lacks access to this project."),
            404 => Some("Resource not found. It may have been removed outside of this provider."),
            409 => Some("Resource conflict. The resource may already exist or be in use."),
            429 => Some("Rate limit exceeded. Please try again later."),
            400 => Some("Invalid request. Check the attribute values."),
            500..=599 => Some("SemaphoreUI server error. Please try again."),
            _ => None,
        }
    }
}

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// A manually constructed request, for payloads the typed calls cannot express
#[derive(Debug, Clone)]
pub struct Operation {
    pub method: Method,
    /// Path with `{name}` placeholders, relative to the API base
    pub path_template: &'static str,
    pub path_params: Vec<(&'static str, String)>,
    pub expected_status: StatusCode,
}

impl Operation {
    pub fn new(method: Method, path_template: &'static str, expected_status: StatusCode) -> Self {
        Self {
            method,
            path_template,
            path_params: Vec::new(),
            expected_status,
        }
    }

    pub fn with_param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.path_params.push((name, value.to_string()));
        self
    }

    /// Expand the path template, URL-encoding each parameter
    pub fn path(&self) -> Result<String, ApiError> {
        let mut path = String::with_capacity(self.path_template.len());
        let mut rest = self.path_template;

        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            let name = &rest[start + 1..start + len];
            let value = self
                .path_params
                .iter()
                .find(|(param, _)| *param == name)
                .map(|(_, value)| value)
                .ok_or_else(|| ApiError::MissingPathParam(name.to_string()))?;

            path.push_str(&rest[..start]);
            path.push_str(&urlencoding::encode(value));
            rest = &rest[start + len + 1..];
        }
        path.push_str(rest);

        Ok(path)
    }
}

/// HTTP client wrapper for SemaphoreUI API calls
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(tls_skip_verify: bool) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("semaphoreui-provider/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(tls_skip_verify)
            .build()?;

        Ok(Self { client })
    }

    fn request(&self, method: Method, url: &str, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, url);
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get(&self, url: &str, token: Option<&str>) -> Result<Value, ApiError> {
        tracing::debug!("GET {}", url);
        let (_, body) = self.send(self.request(Method::GET, url, token)).await?;
        parse_body(&body)
    }

    /// Make a POST request with a JSON body
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        url: &str,
        token: Option<&str>,
        body: &B,
        idempotency_key: Option<&str>,
    ) -> Result<Value, ApiError> {
        tracing::debug!("POST {}", url);

        let mut request = self.request(Method::POST, url, token).json(body);
        if let Some(key) = idempotency_key {
            request = request.header(IDEMPOTENCY_KEY_HEADER, key);
        }

        let (_, body) = self.send(request).await?;
        parse_body(&body)
    }

    /// Make a PUT request with a JSON body
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        url: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<Value, ApiError> {
        tracing::debug!("PUT {}", url);
        let (_, body) = self
            .send(self.request(Method::PUT, url, token).json(body))
            .await?;
        parse_body(&body)
    }

    /// Make a DELETE request
    pub async fn delete(&self, url: &str, token: Option<&str>) -> Result<Value, ApiError> {
        tracing::debug!("DELETE {}", url);
        let (_, body) = self.send(self.request(Method::DELETE, url, token)).await?;
        parse_body(&body)
    }

    /// Send a request and require exactly `expected` as the response status
    pub async fn submit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
        body: Option<&B>,
        expected: StatusCode,
    ) -> Result<Value, ApiError> {
        tracing::debug!("{} {} (expecting {})", method, url, expected);

        let mut request = self.request(method, url, token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let (status, body) = self.send(request).await?;
        if status != expected {
            return Err(ApiError::UnexpectedStatus {
                expected,
                actual: status,
            });
        }

        parse_body(&body)
    }

    async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, String), ApiError> {
        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            let sanitized = sanitize_for_log(&body);
            tracing::error!("API error: {} - {}", status, sanitized);
            return Err(ApiError::Status {
                status,
                body: sanitized,
            });
        }

        Ok((status, body))
    }
}

/// Parse a response body, treating an empty body as `null`
fn parse_body(body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}
