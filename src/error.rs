//! Provider errors and the diagnostics shown to operators.

use crate::api::ApiError;
use crate::resource::resolver::Target;
use std::fmt;
use std::num::ParseIntError;
use thiserror::Error;

/// Errors surfaced by lifecycle operations. None are retried.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("malformed import ID `{raw}`: {reason}")]
    MalformedImportId { raw: String, reason: String },

    #[error("invalid identifier value `{segment}`: {source}")]
    InvalidIdentifierValue {
        segment: String,
        #[source]
        source: ParseIntError,
    },

    #[error("could not read {kind}s: {source}")]
    CollectionFetchFailed {
        kind: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("{kind} with {target} not found")]
    EntityNotFound { kind: &'static str, target: Target },

    #[error("could not create {kind}: {source}")]
    CreateFailed {
        kind: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("created {kind} `{name}` but could not read it back: {source}")]
    PostCreateReadFailed {
        kind: &'static str,
        name: String,
        #[source]
        source: Box<ProviderError>,
    },

    #[error("could not update {kind} {id}: {source}")]
    UpdateFailed {
        kind: &'static str,
        id: i64,
        #[source]
        source: ApiError,
    },

    #[error("could not remove {kind} {id}: {source}")]
    DeleteFailed {
        kind: &'static str,
        id: i64,
        #[source]
        source: ApiError,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("state serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// User-visible report of a failed operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub summary: String,
    pub detail: String,
    pub hint: Option<&'static str>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.summary, self.detail)?;
        if let Some(hint) = self.hint {
            write!(f, "\nHint: {}", hint)?;
        }
        Ok(())
    }
}

impl ProviderError {
    /// Build the diagnostic for an operation on `display_name` (e.g. "Integration Matcher")
    pub fn diagnostic(&self, display_name: &str) -> Diagnostic {
        let summary = match self {
            Self::MalformedImportId { .. } | Self::InvalidIdentifierValue { .. } => {
                format!("Invalid {} Import ID", display_name)
            }
            Self::CreateFailed { .. } => format!("Error Creating SemaphoreUI {}", display_name),
            Self::UpdateFailed { .. } => format!("Error Updating SemaphoreUI {}", display_name),
            Self::DeleteFailed { .. } => format!("Error Removing SemaphoreUI {}", display_name),
            Self::InvalidConfiguration(_) => format!("Invalid SemaphoreUI {} Configuration", display_name),
            Self::CollectionFetchFailed { .. }
            | Self::EntityNotFound { .. }
            | Self::PostCreateReadFailed { .. }
            | Self::Serialization(_) => format!("Error Reading SemaphoreUI {}", display_name),
        };

        let mut detail = self.to_string();
        if let Self::PostCreateReadFailed { .. } = self {
            detail.push_str(
                ". The object exists on the server but is not tracked in state; \
                 import it or remove it manually",
            );
        }

        Diagnostic {
            summary,
            detail,
            hint: self.api_error().and_then(ApiError::hint),
        }
    }

    /// Underlying transport error, if any
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::CollectionFetchFailed { source, .. }
            | Self::CreateFailed { source, .. }
            | Self::UpdateFailed { source, .. }
            | Self::DeleteFailed { source, .. } => Some(source),
            Self::PostCreateReadFailed { source, .. } => source.api_error(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_target() {
        let err = ProviderError::EntityNotFound {
            kind: "integration matcher",
            target: Target::Id(99),
        };
        assert_eq!(err.to_string(), "integration matcher with ID 99 not found");

        let err = ProviderError::EntityNotFound {
            kind: "project integration",
            target: Target::Name("webhook".to_string()),
        };
        assert_eq!(err.to_string(), "project integration with name webhook not found");
    }

    #[test]
    fn test_post_create_diagnostic_is_distinct_from_create() {
        let err = ProviderError::PostCreateReadFailed {
            kind: "integration matcher",
            name: "m1".to_string(),
            source: Box::new(ProviderError::EntityNotFound {
                kind: "integration matcher",
                target: Target::Name("m1".to_string()),
            }),
        };

        let diagnostic = err.diagnostic("Integration Matcher");
        assert_eq!(diagnostic.summary, "Error Reading SemaphoreUI Integration Matcher");
        assert!(diagnostic.detail.starts_with("created integration matcher `m1`"));
        assert!(diagnostic.detail.contains("remove it manually"));
    }

    #[test]
    fn test_import_diagnostic_summary() {
        let err = ProviderError::MalformedImportId {
            raw: "project/1".to_string(),
            reason: "expected 4 segments, got 2".to_string(),
        };
        assert_eq!(
            err.diagnostic("Project Integration").summary,
            "Invalid Project Integration Import ID"
        );
    }
}
