//! Resource Resolver
//!
//! Locates one record of a kind by fetching its whole collection and scanning
//! it. The server is the only source of truth: nothing is cached, so every
//! call costs one list request.

use super::ResourceKind;
use crate::api::models::RemoteRecord;
use crate::api::SemaphoreClient;
use crate::error::ProviderError;
use std::fmt;
use std::marker::PhantomData;

/// What a resolver is looking for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Id(i64),
    Name(String),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Id(id) => write!(f, "ID {}", id),
            Target::Name(name) => write!(f, "name {}", name),
        }
    }
}

impl Target {
    /// Whether `record` is the one being looked for
    pub fn matches<R: RemoteRecord>(&self, record: &R) -> bool {
        match self {
            Target::Id(id) => record.id() == *id,
            Target::Name(name) => record.name() == name.as_str(),
        }
    }
}

/// First record matching `target`, in server order
pub fn scan<R: RemoteRecord>(items: Vec<R>, target: &Target) -> Option<R> {
    items.into_iter().find(|item| target.matches(item))
}

/// Fetch-and-scan lookup for one resource kind
pub struct Resolver<'a, K: ResourceKind> {
    client: &'a SemaphoreClient,
    _kind: PhantomData<K>,
}

impl<'a, K: ResourceKind> Resolver<'a, K> {
    pub fn new(client: &'a SemaphoreClient) -> Self {
        Self {
            client,
            _kind: PhantomData,
        }
    }

    /// Resolve the record with server-assigned `id`
    pub async fn resolve_by_id(&self, scope: &K::Scope, id: i64) -> Result<K::Model, ProviderError> {
        self.resolve(scope, Target::Id(id)).await
    }

    /// Resolve the first record named `name`
    /// Names are not unique on the server; the earliest listed record wins.
    pub async fn resolve_by_name(&self, scope: &K::Scope, name: &str) -> Result<K::Model, ProviderError> {
        self.resolve(scope, Target::Name(name.to_string())).await
    }

    async fn resolve(&self, scope: &K::Scope, target: Target) -> Result<K::Model, ProviderError> {
        let path = K::collection_path(scope);
        tracing::debug!("resolving {} with {} from {}", K::KIND, target, path);

        let items: Vec<K::Remote> =
            self.client
                .list(&path)
                .await
                .map_err(|source| ProviderError::CollectionFetchFailed {
                    kind: K::KIND,
                    source,
                })?;

        let count = items.len();
        match scan(items, &target) {
            Some(remote) => Ok(K::to_model(remote, scope)),
            None => {
                tracing::warn!("{} with {} not among {} listed", K::KIND, target, count);
                Err(ProviderError::EntityNotFound {
                    kind: K::KIND,
                    target,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: i64,
        name: &'static str,
    }

    impl RemoteRecord for Item {
        fn id(&self) -> i64 {
            self.id
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    fn items() -> Vec<Item> {
        vec![
            Item { id: 1, name: "alpha" },
            Item { id: 2, name: "beta" },
            Item { id: 3, name: "beta" },
        ]
    }

    #[test]
    fn test_scan_by_id() {
        assert_eq!(scan(items(), &Target::Id(2)), Some(Item { id: 2, name: "beta" }));
    }

    #[test]
    fn test_scan_by_name_prefers_first() {
        let found = scan(items(), &Target::Name("beta".to_string())).unwrap();
        assert_eq!(found.id, 2);
    }

    #[test]
    fn test_scan_missing_id() {
        assert_eq!(scan(items(), &Target::Id(99)), None);
    }

    #[test]
    fn test_scan_name_is_case_sensitive() {
        assert_eq!(scan(items(), &Target::Name("Alpha".to_string())), None);
    }

    #[test]
    fn test_scan_empty_collection() {
        assert_eq!(scan(Vec::<Item>::new(), &Target::Id(1)), None);
    }
}
