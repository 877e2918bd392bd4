//! Project integrations (webhooks that trigger a template)

use super::schema::{Attribute, AttributeType, ResourceSchema};
use super::{ResourceKind, UpdateStrategy};
use crate::api::client;
use crate::api::models::{AuthMethod, Integration, IntegrationRequest};
use crate::api::Operation;
use crate::error::ProviderError;
use crate::import_id::ImportFields;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

/// Project the collection lives under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ProjectScope {
    pub project_id: i64,
}

/// State of a `semaphoreui_project_integration`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationModel {
    #[serde(default)]
    pub id: Option<i64>,
    pub project_id: i64,
    pub name: String,
    pub template_id: i64,
    #[serde(default)]
    pub searchable: bool,
    #[serde(default)]
    pub auth_method: Option<AuthMethod>,
    #[serde(default)]
    pub auth_secret_id: Option<i64>,
    #[serde(default)]
    pub auth_header: Option<String>,
}

pub struct IntegrationKind;

impl ResourceKind for IntegrationKind {
    const TYPE_NAME: &'static str = "semaphoreui_project_integration";
    const DISPLAY_NAME: &'static str = "Project Integration";
    const KIND: &'static str = "project integration";
    const IMPORT_LABELS: &'static [&'static str] = &["project", "integration"];
    const LOOKUP_BY_NAME: bool = true;

    type Scope = ProjectScope;
    type Remote = Integration;
    type Model = IntegrationModel;
    type CreateRequest = IntegrationRequest;
    // The PUT endpoint wants the full record, `id` included
    type UpdateRequest = Integration;

    fn collection_path(scope: &ProjectScope) -> String {
        client::project_integrations_path(scope.project_id)
    }

    fn item_path(scope: &ProjectScope, id: i64) -> String {
        client::project_integration_path(scope.project_id, id)
    }

    fn scope_of(model: &IntegrationModel) -> ProjectScope {
        ProjectScope {
            project_id: model.project_id,
        }
    }

    fn id_of(model: &IntegrationModel) -> Option<i64> {
        model.id
    }

    fn name_of(model: &IntegrationModel) -> &str {
        &model.name
    }

    fn scope_from_import(fields: &ImportFields) -> Result<(ProjectScope, i64), ProviderError> {
        let scope = ProjectScope {
            project_id: fields.get("project")?,
        };
        Ok((scope, fields.get("integration")?))
    }

    fn to_model(remote: Integration, _scope: &ProjectScope) -> IntegrationModel {
        IntegrationModel {
            id: Some(remote.id),
            project_id: remote.project_id,
            name: remote.name,
            template_id: remote.template_id,
            searchable: remote.searchable,
            auth_method: remote.auth_method,
            auth_secret_id: remote.auth_secret_id,
            auth_header: remote.auth_header,
        }
    }

    fn create_request(model: &IntegrationModel) -> IntegrationRequest {
        IntegrationRequest {
            project_id: model.project_id,
            name: model.name.clone(),
            template_id: model.template_id,
            searchable: model.searchable,
            auth_method: model.auth_method,
            auth_secret_id: model.auth_secret_id,
            auth_header: model.auth_header.clone(),
        }
    }

    fn update_request(model: &IntegrationModel, id: i64) -> Integration {
        Integration {
            id,
            project_id: model.project_id,
            name: model.name.clone(),
            template_id: model.template_id,
            searchable: model.searchable,
            auth_method: model.auth_method,
            auth_secret_id: model.auth_secret_id,
            auth_header: model.auth_header.clone(),
        }
    }

    fn update_strategy(scope: &ProjectScope, id: i64) -> UpdateStrategy {
        UpdateStrategy::Submit(
            Operation::new(
                Method::PUT,
                "/project/{project_id}/integrations/{integration_id}",
                StatusCode::NO_CONTENT,
            )
            .with_param("project_id", scope.project_id)
            .with_param("integration_id", id),
        )
    }

    fn schema() -> ResourceSchema {
        ResourceSchema {
            type_name: Self::TYPE_NAME,
            description: "Manages integrations (webhooks) for a project. Integrations enable \
                          external systems to trigger template executions via HTTP requests.",
            import_id_format: "project/<project_id>/integration/<integration_id>".to_string(),
            attributes: vec![
                Attribute::computed("id", AttributeType::Int64, "The integration ID."),
                Attribute::required(
                    "project_id",
                    AttributeType::Int64,
                    "The project ID that the integration belongs to.",
                )
                .requires_replace(),
                Attribute::required(
                    "name",
                    AttributeType::String,
                    "The display name of the integration.",
                ),
                Attribute::required(
                    "template_id",
                    AttributeType::Int64,
                    "The template ID that this integration will trigger.",
                ),
                Attribute::optional_computed(
                    "searchable",
                    AttributeType::Bool,
                    "When enabled, incoming webhooks are routed through the project alias \
                     using matchers. Defaults to false.",
                ),
                Attribute::optional(
                    "auth_method",
                    AttributeType::String,
                    "Authentication method for the webhook. No authentication when unset.",
                )
                .one_of(&["token", "github", "bitbucket", "hmac", "basic"]),
                Attribute::optional(
                    "auth_secret_id",
                    AttributeType::Int64,
                    "ID of the project key holding the authentication secret.",
                ),
                Attribute::optional(
                    "auth_header",
                    AttributeType::String,
                    "Custom header name for `token` authentication (e.g. `X-Webhook-Token`).",
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import_id::parse_import_fields;
    use serde_json::json;

    fn model() -> IntegrationModel {
        IntegrationModel {
            id: None,
            project_id: 42,
            name: "deploy hook".to_string(),
            template_id: 3,
            searchable: true,
            auth_method: Some(AuthMethod::Token),
            auth_secret_id: Some(5),
            auth_header: Some("X-Token".to_string()),
        }
    }

    #[test]
    fn test_update_request_carries_id() {
        let body = serde_json::to_value(IntegrationKind::update_request(&model(), 7)).unwrap();
        assert_eq!(body["id"], 7);
        assert_eq!(body["project_id"], 42);
        assert_eq!(body["auth_method"], "token");
    }

    #[test]
    fn test_create_request_has_no_id() {
        let body = serde_json::to_value(IntegrationKind::create_request(&model())).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["template_id"], 3);
    }

    #[test]
    fn test_update_goes_through_manual_operation() {
        let scope = ProjectScope { project_id: 42 };
        match IntegrationKind::update_strategy(&scope, 7) {
            UpdateStrategy::Submit(op) => {
                assert_eq!(op.method, Method::PUT);
                assert_eq!(op.expected_status, StatusCode::NO_CONTENT);
                assert_eq!(op.path().unwrap(), "/project/42/integrations/7");
            }
            UpdateStrategy::Typed => panic!("integration update must inject the ID"),
        }
    }

    #[test]
    fn test_scope_from_import() {
        let fields = parse_import_fields("project/42/integration/7", IntegrationKind::IMPORT_LABELS).unwrap();
        let (scope, id) = IntegrationKind::scope_from_import(&fields).unwrap();
        assert_eq!(scope, ProjectScope { project_id: 42 });
        assert_eq!(id, 7);
    }

    #[test]
    fn test_model_defaults_optional_attributes() {
        let model: IntegrationModel = serde_json::from_value(json!({
            "project_id": 1,
            "name": "hook",
            "template_id": 2
        }))
        .unwrap();

        assert_eq!(model.id, None);
        assert!(!model.searchable);
        assert_eq!(model.auth_method, None);
    }

    #[test]
    fn test_schema_accepts_minimal_plan() {
        let plan = json!({"project_id": 1, "name": "hook", "template_id": 2});
        assert!(IntegrationKind::schema().validate(&plan).is_ok());
    }

    #[test]
    fn test_schema_rejects_unknown_auth_method() {
        let plan = json!({"project_id": 1, "name": "hook", "template_id": 2, "auth_method": "oauth"});
        let problems = IntegrationKind::schema().validate(&plan).unwrap_err();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("auth_method"));
    }
}
