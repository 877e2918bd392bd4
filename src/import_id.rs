//! Composite import IDs
//!
//! Pre-existing remote objects are adopted with an ID of alternating
//! label/value segments, e.g. `project/42/integration/7/matcher/3`.
//! Labels must appear in the order the resource expects them.

use crate::error::ProviderError;
use std::collections::BTreeMap;

/// Decoded import ID: one integer per expected label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFields {
    raw: String,
    values: BTreeMap<String, i64>,
}

impl ImportFields {
    /// Value for `label`
    pub fn get(&self, label: &str) -> Result<i64, ProviderError> {
        self.values
            .get(label)
            .copied()
            .ok_or_else(|| ProviderError::MalformedImportId {
                raw: self.raw.clone(),
                reason: format!("missing `{}` segment", label),
            })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.values.iter().map(|(label, value)| (label.as_str(), *value))
    }
}

/// Parse `raw` against the labels a resource expects, in order
pub fn parse_import_fields(
    raw: &str,
    expected_labels: &[&str],
) -> Result<ImportFields, ProviderError> {
    let malformed = |reason: String| ProviderError::MalformedImportId {
        raw: raw.to_string(),
        reason,
    };

    let segments: Vec<&str> = raw.split('/').collect();

    if segments.len() % 2 != 0 {
        return Err(malformed(format!(
            "odd number of segments ({}), expected label/value pairs",
            segments.len()
        )));
    }
    if segments.len() != expected_labels.len() * 2 {
        return Err(malformed(format!(
            "expected {} segments ({}), got {}",
            expected_labels.len() * 2,
            format_expected(expected_labels),
            segments.len()
        )));
    }
    if let Some(pos) = segments.iter().position(|s| s.is_empty()) {
        return Err(malformed(format!("segment {} is empty", pos + 1)));
    }

    let mut values = BTreeMap::new();
    for (pair, expected) in segments.chunks_exact(2).zip(expected_labels) {
        let (label, value) = (pair[0], pair[1]);

        if label != *expected {
            return Err(malformed(format!(
                "expected label `{}`, got `{}` ({})",
                expected,
                label,
                format_expected(expected_labels)
            )));
        }

        let value: i64 = value
            .parse()
            .map_err(|source| ProviderError::InvalidIdentifierValue {
                segment: value.to_string(),
                source,
            })?;

        values.insert(label.to_string(), value);
    }

    Ok(ImportFields {
        raw: raw.to_string(),
        values,
    })
}

/// Render the expected format, e.g. `project/<id>/integration/<id>`
fn format_expected(labels: &[&str]) -> String {
    labels
        .iter()
        .map(|label| format!("{}/<id>", label))
        .collect::<Vec<_>>()
        .join("/")
}
