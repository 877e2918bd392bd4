//! Attribute schemas
//!
//! Each resource kind declares its attributes here. The declarations drive
//! plan validation, replace-only change detection and the `schema` command.

use serde::Serialize;
use serde_json::{Map, Value};

/// Attribute value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Int64,
    String,
    Bool,
}

impl AttributeType {
    fn accepts(self, value: &Value) -> bool {
        match self {
            AttributeType::Int64 => value.as_i64().is_some(),
            AttributeType::String => value.is_string(),
            AttributeType::Bool => value.is_boolean(),
        }
    }
}

/// Who supplies the attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    Required,
    Optional,
    /// Set by the server only
    Computed,
    /// Optional in configuration, defaulted when absent
    OptionalComputed,
}

/// Declaration of one attribute
#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    pub mode: AttributeMode,
    /// Changing this attribute needs a new object
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub requires_replace: bool,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub one_of: &'static [&'static str],
    pub description: &'static str,
}

impl Attribute {
    fn new(
        name: &'static str,
        attr_type: AttributeType,
        mode: AttributeMode,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            attr_type,
            mode,
            requires_replace: false,
            one_of: &[],
            description,
        }
    }

    pub fn required(name: &'static str, attr_type: AttributeType, description: &'static str) -> Self {
        Self::new(name, attr_type, AttributeMode::Required, description)
    }

    pub fn optional(name: &'static str, attr_type: AttributeType, description: &'static str) -> Self {
        Self::new(name, attr_type, AttributeMode::Optional, description)
    }

    pub fn computed(name: &'static str, attr_type: AttributeType, description: &'static str) -> Self {
        Self::new(name, attr_type, AttributeMode::Computed, description)
    }

    pub fn optional_computed(
        name: &'static str,
        attr_type: AttributeType,
        description: &'static str,
    ) -> Self {
        Self::new(name, attr_type, AttributeMode::OptionalComputed, description)
    }

    pub fn requires_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }

    pub fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.one_of = values;
        self
    }
}

/// Schema of one resource kind
#[derive(Debug, Clone, Serialize)]
pub struct ResourceSchema {
    pub type_name: &'static str,
    pub description: &'static str,
    pub import_id_format: String,
    pub attributes: Vec<Attribute>,
}

impl ResourceSchema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check a plan document, collecting every problem
    pub fn validate(&self, plan: &Value) -> Result<(), Vec<String>> {
        let Some(object) = plan.as_object() else {
            return Err(vec!["plan must be an object".to_string()]);
        };

        let mut problems = Vec::new();

        for attr in &self.attributes {
            if attr.mode == AttributeMode::Computed {
                continue;
            }

            match object.get(attr.name) {
                None | Some(Value::Null) => {
                    if attr.mode == AttributeMode::Required {
                        problems.push(format!("missing required attribute `{}`", attr.name));
                    }
                }
                Some(value) if !attr.attr_type.accepts(value) => {
                    problems.push(format!(
                        "attribute `{}` must be of type {}",
                        attr.name,
                        type_label(attr.attr_type)
                    ));
                }
                Some(Value::String(s)) if !attr.one_of.is_empty() && !attr.one_of.contains(&s.as_str()) => {
                    problems.push(format!(
                        "attribute `{}` must be one of {}, got \"{}\"",
                        attr.name,
                        attr.one_of.join(", "),
                        s
                    ));
                }
                Some(_) => {}
            }
        }

        for key in object.keys() {
            if self.attribute(key).is_none() {
                problems.push(format!("unknown attribute `{}`", key));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }

    /// Replace-only attributes whose value differs between two documents
    pub fn replace_changes(&self, prior: &Map<String, Value>, planned: &Map<String, Value>) -> Vec<&'static str> {
        self.attributes
            .iter()
            .filter(|a| a.requires_replace)
            .filter(|a| prior.get(a.name) != planned.get(a.name))
            .map(|a| a.name)
            .collect()
    }
}

fn type_label(attr_type: AttributeType) -> &'static str {
    match attr_type {
        AttributeType::Int64 => "int64",
        AttributeType::String => "string",
        AttributeType::Bool => "bool",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ResourceSchema {
        ResourceSchema {
            type_name: "sample",
            description: "sample",
            import_id_format: "project/<id>".to_string(),
            attributes: vec![
                Attribute::computed("id", AttributeType::Int64, "ID"),
                Attribute::required("project_id", AttributeType::Int64, "Project").requires_replace(),
                Attribute::required("name", AttributeType::String, "Name"),
                Attribute::required("kind", AttributeType::String, "Kind").one_of(&["a", "b"]),
                Attribute::optional_computed("enabled", AttributeType::Bool, "Enabled"),
            ],
        }
    }

    #[test]
    fn test_valid_plan_passes() {
        let plan = json!({"project_id": 1, "name": "x", "kind": "a"});
        assert!(sample().validate(&plan).is_ok());
    }

    #[test]
    fn test_computed_attribute_ignored_in_plan() {
        let plan = json!({"id": "not-a-number", "project_id": 1, "name": "x", "kind": "b"});
        assert!(sample().validate(&plan).is_ok());
    }

    #[test]
    fn test_collects_every_problem() {
        let plan = json!({"project_id": "1", "kind": "c", "enabled": "yes", "extra": 1});
        let problems = sample().validate(&plan).unwrap_err();

        assert_eq!(problems.len(), 5);
        assert!(problems.contains(&"attribute `project_id` must be of type int64".to_string()));
        assert!(problems.contains(&"missing required attribute `name`".to_string()));
        assert!(problems.contains(&"attribute `kind` must be one of a, b, got \"c\"".to_string()));
        assert!(problems.contains(&"attribute `enabled` must be of type bool".to_string()));
        assert!(problems.contains(&"unknown attribute `extra`".to_string()));
    }

    #[test]
    fn test_non_object_plan_rejected() {
        assert!(sample().validate(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_replace_changes() {
        let prior = json!({"project_id": 1, "name": "x"});
        let planned = json!({"project_id": 2, "name": "y"});

        let changes = sample().replace_changes(prior.as_object().unwrap(), planned.as_object().unwrap());
        assert_eq!(changes, vec!["project_id"]);
    }
}
