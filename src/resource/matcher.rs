//! Integration matchers
//!
//! Conditions an incoming webhook must meet before a searchable integration
//! triggers its template. The server's matcher payload has no `project_id`;
//! state takes it from the scope.

use super::schema::{Attribute, AttributeType, ResourceSchema};
use super::ResourceKind;
use crate::api::client;
use crate::api::models::{BodyDataType, IntegrationMatcher, IntegrationMatcherRequest, MatchMethod, RequestPart};
use crate::error::ProviderError;
use crate::import_id::ImportFields;
use serde::{Deserialize, Serialize};

/// Integration the collection lives under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IntegrationScope {
    pub project_id: i64,
    pub integration_id: i64,
}

impl IntegrationScope {
    pub(super) fn from_import(fields: &ImportFields) -> Result<Self, ProviderError> {
        Ok(Self {
            project_id: fields.get("project")?,
            integration_id: fields.get("integration")?,
        })
    }
}

/// State of a `semaphoreui_project_integration_matcher`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationMatcherModel {
    #[serde(default)]
    pub id: Option<i64>,
    pub project_id: i64,
    pub integration_id: i64,
    pub name: String,
    pub match_type: RequestPart,
    pub method: MatchMethod,
    pub body_data_type: BodyDataType,
    pub key: String,
    pub value: String,
}

pub struct IntegrationMatcherKind;

impl ResourceKind for IntegrationMatcherKind {
    const TYPE_NAME: &'static str = "semaphoreui_project_integration_matcher";
    const DISPLAY_NAME: &'static str = "Integration Matcher";
    const KIND: &'static str = "integration matcher";
    const IMPORT_LABELS: &'static [&'static str] = &["project", "integration", "matcher"];
    const LOOKUP_BY_NAME: bool = false;

    type Scope = IntegrationScope;
    type Remote = IntegrationMatcher;
    type Model = IntegrationMatcherModel;
    type CreateRequest = IntegrationMatcherRequest;
    type UpdateRequest = IntegrationMatcherRequest;

    fn collection_path(scope: &IntegrationScope) -> String {
        client::integration_matchers_path(scope.project_id, scope.integration_id)
    }

    fn item_path(scope: &IntegrationScope, id: i64) -> String {
        client::integration_matcher_path(scope.project_id, scope.integration_id, id)
    }

    fn scope_of(model: &IntegrationMatcherModel) -> IntegrationScope {
        IntegrationScope {
            project_id: model.project_id,
            integration_id: model.integration_id,
        }
    }

    fn id_of(model: &IntegrationMatcherModel) -> Option<i64> {
        model.id
    }

    fn name_of(model: &IntegrationMatcherModel) -> &str {
        &model.name
    }

    fn scope_from_import(fields: &ImportFields) -> Result<(IntegrationScope, i64), ProviderError> {
        Ok((IntegrationScope::from_import(fields)?, fields.get("matcher")?))
    }

    fn to_model(remote: IntegrationMatcher, scope: &IntegrationScope) -> IntegrationMatcherModel {
        IntegrationMatcherModel {
            id: Some(remote.id),
            project_id: scope.project_id,
            integration_id: remote.integration_id,
            name: remote.name,
            match_type: remote.match_type,
            method: remote.method,
            body_data_type: remote.body_data_type,
            key: remote.key,
            value: remote.value,
        }
    }

    fn create_request(model: &IntegrationMatcherModel) -> IntegrationMatcherRequest {
        IntegrationMatcherRequest {
            name: model.name.clone(),
            match_type: model.match_type,
            method: model.method,
            body_data_type: model.body_data_type,
            key: model.key.clone(),
            value: model.value.clone(),
        }
    }

    fn update_request(model: &IntegrationMatcherModel, _id: i64) -> IntegrationMatcherRequest {
        Self::create_request(model)
    }

    fn schema() -> ResourceSchema {
        ResourceSchema {
            type_name: Self::TYPE_NAME,
            description: "Manages integration matchers. Matchers define conditions that must be \
                          met for an integration webhook to trigger a template execution.",
            import_id_format: "project/<project_id>/integration/<integration_id>/matcher/<matcher_id>"
                .to_string(),
            attributes: vec![
                Attribute::computed("id", AttributeType::Int64, "The matcher ID."),
                Attribute::required(
                    "project_id",
                    AttributeType::Int64,
                    "The project ID that the integration belongs to.",
                )
                .requires_replace(),
                Attribute::required(
                    "integration_id",
                    AttributeType::Int64,
                    "The integration ID that this matcher belongs to.",
                )
                .requires_replace(),
                Attribute::required("name", AttributeType::String, "The display name of the matcher."),
                Attribute::required(
                    "match_type",
                    AttributeType::String,
                    "Where to look for the match.",
                )
                .one_of(&["body", "header"]),
                Attribute::required("method", AttributeType::String, "The comparison method.")
                    .one_of(&["equals", "unequals", "contains"]),
                Attribute::required(
                    "body_data_type",
                    AttributeType::String,
                    "The data type of the body.",
                )
                .one_of(&["json", "xml", "string"]),
                Attribute::required(
                    "key",
                    AttributeType::String,
                    "The key to match against in the body or header.",
                ),
                Attribute::required("value", AttributeType::String, "The value to compare against."),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import_id::parse_import_fields;
    use serde_json::json;

    #[test]
    fn test_to_model_fills_project_from_scope() {
        let remote: IntegrationMatcher = serde_json::from_value(json!({
            "id": 3,
            "integration_id": 7,
            "name": "only main",
            "match_type": "body",
            "method": "equals",
            "body_data_type": "json",
            "key": "ref",
            "value": "refs/heads/main"
        }))
        .unwrap();

        let scope = IntegrationScope {
            project_id: 42,
            integration_id: 7,
        };
        let model = IntegrationMatcherKind::to_model(remote, &scope);

        assert_eq!(model.id, Some(3));
        assert_eq!(model.project_id, 42);
        assert_eq!(model.integration_id, 7);
        assert_eq!(model.method, MatchMethod::Equals);
    }

    #[test]
    fn test_scope_from_import() {
        let fields = parse_import_fields(
            "project/42/integration/7/matcher/3",
            IntegrationMatcherKind::IMPORT_LABELS,
        )
        .unwrap();

        let (scope, id) = IntegrationMatcherKind::scope_from_import(&fields).unwrap();
        assert_eq!(
            scope,
            IntegrationScope {
                project_id: 42,
                integration_id: 7
            }
        );
        assert_eq!(id, 3);
    }

    #[test]
    fn test_item_path() {
        let scope = IntegrationScope {
            project_id: 1,
            integration_id: 2,
        };
        assert_eq!(
            IntegrationMatcherKind::item_path(&scope, 3),
            "/project/1/integrations/2/matchers/3"
        );
    }

    #[test]
    fn test_schema_requires_every_matcher_field() {
        let problems = IntegrationMatcherKind::schema()
            .validate(&json!({"project_id": 1, "integration_id": 2}))
            .unwrap_err();
        assert_eq!(problems.len(), 6);
    }
}
