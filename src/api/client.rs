//! SemaphoreUI Client
//!
//! Main client for interacting with the SemaphoreUI API, combining the base
//! URL, the API token and HTTP functionality.

use super::http::{ApiError, HttpClient, Operation};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

/// Main SemaphoreUI client
#[derive(Clone)]
pub struct SemaphoreClient {
    pub http: HttpClient,
    base_url: String,
    api_token: Option<String>,
}

impl SemaphoreClient {
    /// Create a new client for the API rooted at `base_url` (e.g. `https://semaphore.example.com/api`)
    pub fn new(
        base_url: &str,
        api_token: Option<&str>,
        tls_skip_verify: bool,
    ) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url)?;
        let http = HttpClient::new(tls_skip_verify)?;

        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            api_token: api_token.filter(|t| !t.is_empty()).map(str::to_string),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    /// List a collection endpoint
    pub async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let response = self.http.get(&self.url(path), self.token()).await?;
        if response.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(response)?)
    }

    /// Create an object; the server may or may not echo it back
    pub async fn create<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        idempotency_key: &str,
    ) -> Result<Value, ApiError> {
        self.http
            .post(&self.url(path), self.token(), body, Some(idempotency_key))
            .await
    }

    /// Replace an object
    pub async fn update<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        self.http.put(&self.url(path), self.token(), body).await?;
        Ok(())
    }

    /// Remove an object
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.http.delete(&self.url(path), self.token()).await?;
        Ok(())
    }

    /// Execute a manually constructed operation
    pub async fn submit<B: Serialize + ?Sized>(
        &self,
        operation: &Operation,
        body: Option<&B>,
    ) -> Result<Value, ApiError> {
        let url = self.url(&operation.path()?);
        self.http
            .submit(
                operation.method.clone(),
                &url,
                self.token(),
                body,
                operation.expected_status,
            )
            .await
    }
}

// =========================================================================
// Integration API paths
// =========================================================================

/// Collection of a project's integrations
pub fn project_integrations_path(project_id: i64) -> String {
    format!("/project/{}/integrations", project_id)
}

/// A single integration
pub fn project_integration_path(project_id: i64, integration_id: i64) -> String {
    format!("{}/{}", project_integrations_path(project_id), integration_id)
}

/// Collection of an integration's matchers
pub fn integration_matchers_path(project_id: i64, integration_id: i64) -> String {
    format!(
        "{}/matchers",
        project_integration_path(project_id, integration_id)
    )
}

/// A single matcher
pub fn integration_matcher_path(project_id: i64, integration_id: i64, matcher_id: i64) -> String {
    format!(
        "{}/{}",
        integration_matchers_path(project_id, integration_id),
        matcher_id
    )
}

/// Collection of an integration's extract values
pub fn integration_values_path(project_id: i64, integration_id: i64) -> String {
    format!("{}/values", project_integration_path(project_id, integration_id))
}

/// A single extract value
pub fn integration_value_path(project_id: i64, integration_id: i64, value_id: i64) -> String {
    format!(
        "{}/{}",
        integration_values_path(project_id, integration_id),
        value_id
    )
}
