//! Integration extract values
//!
//! Pull data out of webhook payloads into template variables.

use super::matcher::IntegrationScope;
use super::schema::{Attribute, AttributeType, ResourceSchema};
use super::ResourceKind;
use crate::api::client;
use crate::api::models::{
    BodyDataType, IntegrationExtractValue, IntegrationExtractValueRequest, RequestPart, VariableType,
};
use crate::error::ProviderError;
use crate::import_id::ImportFields;
use serde::{Deserialize, Serialize};

/// State of a `semaphoreui_project_integration_extract_value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationExtractValueModel {
    #[serde(default)]
    pub id: Option<i64>,
    pub project_id: i64,
    pub integration_id: i64,
    pub name: String,
    pub value_source: RequestPart,
    pub body_data_type: BodyDataType,
    pub key: String,
    pub variable: String,
    pub variable_type: VariableType,
}

pub struct ExtractValueKind;

impl ResourceKind for ExtractValueKind {
    const TYPE_NAME: &'static str = "semaphoreui_project_integration_extract_value";
    const DISPLAY_NAME: &'static str = "Integration Extract Value";
    const KIND: &'static str = "integration extract value";
    const IMPORT_LABELS: &'static [&'static str] = &["project", "integration", "extract_value"];
    const LOOKUP_BY_NAME: bool = false;

    type Scope = IntegrationScope;
    type Remote = IntegrationExtractValue;
    type Model = IntegrationExtractValueModel;
    type CreateRequest = IntegrationExtractValueRequest;
    type UpdateRequest = IntegrationExtractValueRequest;

    fn collection_path(scope: &IntegrationScope) -> String {
        client::integration_values_path(scope.project_id, scope.integration_id)
    }

    fn item_path(scope: &IntegrationScope, id: i64) -> String {
        client::integration_value_path(scope.project_id, scope.integration_id, id)
    }

    fn scope_of(model: &IntegrationExtractValueModel) -> IntegrationScope {
        IntegrationScope {
            project_id: model.project_id,
            integration_id: model.integration_id,
        }
    }

    fn id_of(model: &IntegrationExtractValueModel) -> Option<i64> {
        model.id
    }

    fn name_of(model: &IntegrationExtractValueModel) -> &str {
        &model.name
    }

    fn scope_from_import(fields: &ImportFields) -> Result<(IntegrationScope, i64), ProviderError> {
        Ok((IntegrationScope::from_import(fields)?, fields.get("extract_value")?))
    }

    fn to_model(remote: IntegrationExtractValue, scope: &IntegrationScope) -> IntegrationExtractValueModel {
        IntegrationExtractValueModel {
            id: Some(remote.id),
            project_id: scope.project_id,
            integration_id: remote.integration_id,
            name: remote.name,
            value_source: remote.value_source,
            body_data_type: remote.body_data_type,
            key: remote.key,
            variable: remote.variable,
            variable_type: remote.variable_type,
        }
    }

    fn create_request(model: &IntegrationExtractValueModel) -> IntegrationExtractValueRequest {
        IntegrationExtractValueRequest {
            name: model.name.clone(),
            value_source: model.value_source,
            body_data_type: model.body_data_type,
            key: model.key.clone(),
            variable: model.variable.clone(),
            variable_type: model.variable_type,
        }
    }

    fn update_request(model: &IntegrationExtractValueModel, _id: i64) -> IntegrationExtractValueRequest {
        Self::create_request(model)
    }

    fn schema() -> ResourceSchema {
        ResourceSchema {
            type_name: Self::TYPE_NAME,
            description: "Manages integration extract values. Extract values define how to \
                          extract data from webhook payloads and pass them as variables to \
                          template executions.",
            import_id_format:
                "project/<project_id>/integration/<integration_id>/extract_value/<extract_value_id>"
                    .to_string(),
            attributes: vec![
                Attribute::computed("id", AttributeType::Int64, "The extract value ID."),
                Attribute::required(
                    "project_id",
                    AttributeType::Int64,
                    "The project ID that the integration belongs to.",
                )
                .requires_replace(),
                Attribute::required(
                    "integration_id",
                    AttributeType::Int64,
                    "The integration ID that this extract value belongs to.",
                )
                .requires_replace(),
                Attribute::required(
                    "name",
                    AttributeType::String,
                    "The display name of the extract value.",
                ),
                Attribute::required(
                    "value_source",
                    AttributeType::String,
                    "Where to extract the value from.",
                )
                .one_of(&["body", "header"]),
                Attribute::required(
                    "body_data_type",
                    AttributeType::String,
                    "The data type of the body.",
                )
                .one_of(&["json", "xml", "string"]),
                Attribute::required(
                    "key",
                    AttributeType::String,
                    "The key to extract from the body or header.",
                ),
                Attribute::required(
                    "variable",
                    AttributeType::String,
                    "The variable name to store the extracted value.",
                ),
                Attribute::required(
                    "variable_type",
                    AttributeType::String,
                    "The type of variable to set.",
                )
                .one_of(&["environment", "task"]),
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
    fn test_scope_from_import_uses_extract_value_label() {
        let fields = parse_import_fields(
            "project/1/integration/2/extract_value/9",
            ExtractValueKind::IMPORT_LABELS,
        )
        .unwrap();
        let (scope, id) = ExtractValueKind::scope_from_import(&fields).unwrap();

        assert_eq!(scope.project_id, 1);
        assert_eq!(scope.integration_id, 2);
        assert_eq!(id, 9);
    }

    #[test]
    fn test_create_request_shape() {
        let model = IntegrationExtractValueModel {
            id: Some(9),
            project_id: 1,
            integration_id: 2,
            name: "branch".to_string(),
            value_source: RequestPart::Body,
            body_data_type: BodyDataType::Json,
            key: "ref".to_string(),
            variable: "BRANCH".to_string(),
            variable_type: VariableType::Environment,
        };

        let body = serde_json::to_value(ExtractValueKind::create_request(&model)).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "branch",
                "value_source": "body",
                "body_data_type": "json",
                "key": "ref",
                "variable": "BRANCH",
                "variable_type": "environment"
            })
        );
    }

    #[test]
    fn test_schema_rejects_bad_variable_type() {
        let plan = json!({
            "project_id": 1,
            "integration_id": 2,
            "name": "branch",
            "value_source": "body",
            "body_data_type": "json",
            "key": "ref",
            "variable": "BRANCH",
            "variable_type": "global"
        });
        let problems = ExtractValueKind::schema().validate(&plan).unwrap_err();
        assert_eq!(problems, vec!["attribute `variable_type` must be one of environment, task, got \"global\"".to_string()]);
    }
}
