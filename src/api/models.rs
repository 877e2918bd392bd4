//! SemaphoreUI API payloads
//!
//! Wire shapes for integrations and their matchers and extract values, as the
//! server returns them from list endpoints and accepts them on create/update.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

/// Remote record with a server-assigned ID and a display name
pub trait RemoteRecord {
    fn id(&self) -> i64;
    fn name(&self) -> &str;
}

/// Authentication method for an integration webhook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    Token,
    Github,
    Bitbucket,
    Hmac,
    Basic,
}

/// Where a matcher or extract value looks in the incoming request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestPart {
    Body,
    Header,
}

/// Matcher comparison method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMethod {
    Equals,
    Unequals,
    Contains,
}

/// Format of the incoming request body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyDataType {
    Json,
    Xml,
    String,
}

/// Kind of variable an extract value populates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    Environment,
    Task,
}

/// The server reports "no value" as either `null` or `""`
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) if s.is_empty() => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// `0` stands for "unset" on optional foreign keys
fn zero_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.filter(|id| *id != 0))
}

/// Integration (webhook) as stored on the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Integration {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub template_id: i64,
    #[serde(default)]
    pub searchable: bool,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub auth_method: Option<AuthMethod>,
    #[serde(default, deserialize_with = "zero_as_none")]
    pub auth_secret_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub auth_header: Option<String>,
}

/// Body of an integration create request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegrationRequest {
    pub project_id: i64,
    pub name: String,
    pub template_id: i64,
    pub searchable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_method: Option<AuthMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_secret_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_header: Option<String>,
}

/// Integration matcher as stored on the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationMatcher {
    pub id: i64,
    pub integration_id: i64,
    pub name: String,
    pub match_type: RequestPart,
    pub method: MatchMethod,
    pub body_data_type: BodyDataType,
    pub key: String,
    pub value: String,
}

/// Body of a matcher create or update request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegrationMatcherRequest {
    pub name: String,
    pub match_type: RequestPart,
    pub method: MatchMethod,
    pub body_data_type: BodyDataType,
    pub key: String,
    pub value: String,
}

/// Integration extract value as stored on the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationExtractValue {
    pub id: i64,
    pub integration_id: i64,
    pub name: String,
    pub value_source: RequestPart,
    pub body_data_type: BodyDataType,
    pub key: String,
    pub variable: String,
    pub variable_type: VariableType,
}

/// Body of an extract value create or update request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegrationExtractValueRequest {
    pub name: String,
    pub value_source: RequestPart,
    pub body_data_type: BodyDataType,
    pub key: String,
    pub variable: String,
    pub variable_type: VariableType,
}

impl RemoteRecord for Integration {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl RemoteRecord for IntegrationMatcher {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl RemoteRecord for IntegrationExtractValue {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integration_decodes_empty_auth_fields_as_none() {
        let integration: Integration = serde_json::from_value(json!({
            "id": 7,
            "project_id": 42,
            "name": "deploy hook",
            "template_id": 3,
            "searchable": false,
            "auth_method": "",
            "auth_secret_id": null,
            "auth_header": ""
        }))
        .unwrap();

        assert_eq!(integration.auth_method, None);
        assert_eq!(integration.auth_secret_id, None);
        assert_eq!(integration.auth_header, None);
    }

    #[test]
    fn test_integration_decodes_without_optional_fields() {
        let integration: Integration = serde_json::from_value(json!({
            "id": 7,
            "project_id": 42,
            "name": "deploy hook",
            "template_id": 3
        }))
        .unwrap();

        assert!(!integration.searchable);
        assert_eq!(integration.auth_method, None);
    }

    #[test]
    fn test_integration_decodes_auth_fields() {
        let integration: Integration = serde_json::from_value(json!({
            "id": 7,
            "project_id": 42,
            "name": "deploy hook",
            "template_id": 3,
            "auth_method": "github",
            "auth_secret_id": 11,
            "auth_header": "X-Hub-Signature"
        }))
        .unwrap();

        assert_eq!(integration.auth_method, Some(AuthMethod::Github));
        assert_eq!(integration.auth_secret_id, Some(11));
        assert_eq!(integration.auth_header.as_deref(), Some("X-Hub-Signature"));
    }

    #[test]
    fn test_request_omits_unset_auth_fields() {
        let request = IntegrationRequest {
            project_id: 1,
            name: "hook".to_string(),
            template_id: 2,
            searchable: true,
            auth_method: None,
            auth_secret_id: None,
            auth_header: None,
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({"project_id": 1, "name": "hook", "template_id": 2, "searchable": true})
        );
    }

    #[test]
    fn test_matcher_rejects_unknown_method() {
        let result = serde_json::from_value::<IntegrationMatcher>(json!({
            "id": 1,
            "integration_id": 2,
            "name": "m",
            "match_type": "body",
            "method": "regex",
            "body_data_type": "json",
            "key": "k",
            "value": "v"
        }));

        assert!(result.is_err());
    }
}
