//! Property-based tests using proptest
//!
//! These tests cover composite import ID parsing and the first-match
//! collection scan with randomized inputs.

use proptest::prelude::*;
use semaphoreui_provider::api::models::IntegrationMatcher;
use semaphoreui_provider::resource::resolver::{scan, Target};
use semaphoreui_provider::{parse_import_fields, ProviderError};
use serde_json::json;

/// Labels `l0`, `l1`, ... for `n` pairs
fn labels(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("l{}", i)).collect()
}

fn import_id(labels: &[String], values: &[i64]) -> String {
    labels
        .iter()
        .zip(values)
        .map(|(label, value)| format!("{}/{}", label, value))
        .collect::<Vec<_>>()
        .join("/")
}

fn matcher(id: i64, name: &str) -> IntegrationMatcher {
    serde_json::from_value(json!({
        "id": id,
        "integration_id": 1,
        "name": name,
        "match_type": "header",
        "method": "contains",
        "body_data_type": "string",
        "key": "X-Event",
        "value": "push"
    }))
    .expect("valid matcher payload")
}

proptest! {
    /// N well-formed pairs yield exactly N entries with the given values
    #[test]
    fn well_formed_ids_parse(values in prop::collection::vec(any::<i64>(), 1..6)) {
        let labels = labels(values.len());
        let expected: Vec<&str> = labels.iter().map(String::as_str).collect();

        let fields = parse_import_fields(&import_id(&labels, &values), &expected).unwrap();

        prop_assert_eq!(fields.len(), values.len());
        for (label, value) in labels.iter().zip(&values) {
            prop_assert_eq!(fields.get(label).unwrap(), *value);
        }
    }

    /// Dropping or adding a segment is always malformed
    #[test]
    fn wrong_segment_count_is_malformed(
        values in prop::collection::vec(0i64..1000, 1..5),
        extra in "[a-z0-9]{1,6}",
        drop_last in any::<bool>(),
    ) {
        let labels = labels(values.len());
        let expected: Vec<&str> = labels.iter().map(String::as_str).collect();

        let mut raw = import_id(&labels, &values);
        if drop_last {
            raw = raw.rsplit_once('/').map(|(head, _)| head.to_string()).unwrap_or_default();
        } else {
            raw = format!("{}/{}", raw, extra);
        }

        let result = parse_import_fields(&raw, &expected);
        let is_malformed = matches!(result, Err(ProviderError::MalformedImportId { .. }));
        prop_assert!(is_malformed);
    }

    /// A non-integer value is an invalid identifier, never a panic
    #[test]
    fn non_integer_value_is_invalid(
        values in prop::collection::vec(0i64..1000, 1..5),
        position in any::<prop::sample::Index>(),
        junk in "[a-z][a-z0-9]{0,8}",
    ) {
        let labels = labels(values.len());
        let expected: Vec<&str> = labels.iter().map(String::as_str).collect();
        let bad = position.index(values.len());

        let raw = labels
            .iter()
            .zip(&values)
            .enumerate()
            .map(|(i, (label, value))| {
                if i == bad {
                    format!("{}/{}", label, junk)
                } else {
                    format!("{}/{}", label, value)
                }
            })
            .collect::<Vec<_>>()
            .join("/");

        let result = parse_import_fields(&raw, &expected);
        let is_invalid = matches!(result, Err(ProviderError::InvalidIdentifierValue { .. }));
        prop_assert!(is_invalid);
    }

    /// Scanning by name returns the earliest record with that name
    #[test]
    fn scan_returns_first_match(
        names in prop::collection::vec(prop_oneof!["alpha", "beta", "gamma"], 0..20),
        wanted in prop_oneof!["alpha", "beta", "gamma"],
    ) {
        let items: Vec<IntegrationMatcher> = names
            .iter()
            .enumerate()
            .map(|(i, name)| matcher(i as i64 + 1, name))
            .collect();

        let expected_id = names.iter().position(|n| *n == wanted).map(|i| i as i64 + 1);
        let found = scan(items, &Target::Name(wanted.to_string())).map(|m| m.id);

        prop_assert_eq!(found, expected_id);
    }

    /// Scanning by ID finds exactly the record with that ID
    #[test]
    fn scan_by_id(count in 0usize..20, wanted in 0i64..25) {
        let items: Vec<IntegrationMatcher> = (1..=count as i64).map(|id| matcher(id, "m")).collect();

        let found = scan(items, &Target::Id(wanted)).map(|m| m.id);
        let expected = (wanted >= 1 && wanted <= count as i64).then_some(wanted);

        prop_assert_eq!(found, expected);
    }
}
