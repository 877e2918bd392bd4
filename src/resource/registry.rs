//! Resource Registry - the resource types this provider manages
//!
//! Maps type names to the [`ResourceType`] tag used to dispatch into the
//! generic lifecycle, and keeps the schemas of all types.

use super::schema::ResourceSchema;
use super::{ExtractValueKind, IntegrationKind, IntegrationMatcherKind, ResourceKind};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Every resource type, in registration order
pub const ALL_RESOURCE_TYPES: &[ResourceType] = &[
    ResourceType::Integration,
    ResourceType::IntegrationMatcher,
    ResourceType::IntegrationExtractValue,
];

/// Tag for one resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Integration,
    IntegrationMatcher,
    IntegrationExtractValue,
}

impl ResourceType {
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Integration => IntegrationKind::TYPE_NAME,
            Self::IntegrationMatcher => IntegrationMatcherKind::TYPE_NAME,
            Self::IntegrationExtractValue => ExtractValueKind::TYPE_NAME,
        }
    }

    /// Name accepted on the command line besides the full type name
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Integration => "integration",
            Self::IntegrationMatcher => "matcher",
            Self::IntegrationExtractValue => "extract_value",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Integration => IntegrationKind::DISPLAY_NAME,
            Self::IntegrationMatcher => IntegrationMatcherKind::DISPLAY_NAME,
            Self::IntegrationExtractValue => ExtractValueKind::DISPLAY_NAME,
        }
    }

    pub fn schema(self) -> &'static ResourceSchema {
        let index = ALL_RESOURCE_TYPES
            .iter()
            .position(|t| *t == self)
            .unwrap_or_default();
        &get_schemas()[index]
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        get_resource_type(s).ok_or_else(|| {
            format!(
                "unknown resource type `{}` (expected one of: {})",
                s,
                get_all_type_names().join(", ")
            )
        })
    }
}

/// Schemas of all types, built on first access
static SCHEMAS: OnceLock<Vec<ResourceSchema>> = OnceLock::new();

/// Get the schemas of all resource types, in registration order
pub fn get_schemas() -> &'static [ResourceSchema] {
    SCHEMAS.get_or_init(|| {
        ALL_RESOURCE_TYPES
            .iter()
            .map(|t| match t {
                ResourceType::Integration => IntegrationKind::schema(),
                ResourceType::IntegrationMatcher => IntegrationMatcherKind::schema(),
                ResourceType::IntegrationExtractValue => ExtractValueKind::schema(),
            })
            .collect()
    })
}

/// Get a resource type by full or short name
pub fn get_resource_type(name: &str) -> Option<ResourceType> {
    ALL_RESOURCE_TYPES
        .iter()
        .copied()
        .find(|t| t.type_name() == name || t.short_name() == name)
}

/// Get all type names (for help output)
pub fn get_all_type_names() -> Vec<&'static str> {
    ALL_RESOURCE_TYPES.iter().map(|t| t.type_name()).collect()
}
