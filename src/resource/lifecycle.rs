//! Resource lifecycle
//!
//! Create, read, update, delete and import for any [`ResourceKind`], plus the
//! data-source lookup. Each call is an independent round trip; the
//! create-then-resolve sequence is not atomic.

use super::resolver::Resolver;
use super::{ResourceKind, UpdateStrategy};
use crate::api::SemaphoreClient;
use crate::error::ProviderError;
use crate::import_id::parse_import_fields;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

/// Data-source query: the scope plus an ID or (where allowed) a name
#[derive(Debug, Clone, Deserialize)]
pub struct LookupQuery<S> {
    #[serde(flatten)]
    pub scope: S,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Lifecycle operations of one resource kind
pub struct Resource<'a, K: ResourceKind> {
    client: &'a SemaphoreClient,
    resolver: Resolver<'a, K>,
}

impl<'a, K: ResourceKind> Resource<'a, K> {
    pub fn new(client: &'a SemaphoreClient) -> Self {
        Self {
            client,
            resolver: Resolver::new(client),
        }
    }

    /// Validate a plan or state document against the schema and decode it
    pub fn decode(document: Value) -> Result<K::Model, ProviderError> {
        K::schema()
            .validate(&document)
            .map_err(|problems| ProviderError::InvalidConfiguration(problems.join("; ")))?;
        Ok(serde_json::from_value(document)?)
    }

    /// Create the object, then read it back to learn its server-assigned ID
    pub async fn create(&self, plan: &K::Model) -> Result<K::Model, ProviderError> {
        let scope = K::scope_of(plan);
        let name = K::name_of(plan);
        let path = K::collection_path(&scope);
        let idempotency_key = Uuid::new_v4().to_string();

        tracing::info!("creating {} `{}` at {}", K::KIND, name, path);

        let response = self
            .client
            .create(&path, &K::create_request(plan), &idempotency_key)
            .await
            .map_err(|source| ProviderError::CreateFailed {
                kind: K::KIND,
                source,
            })?;

        // Most endpoints answer with an empty body; fall back to the name
        let resolved = match created_id(&response) {
            Some(id) => self.resolver.resolve_by_id(&scope, id).await,
            None => self.resolver.resolve_by_name(&scope, name).await,
        };

        resolved.map_err(|source| {
            tracing::error!("{} `{}` created but not readable: {}", K::KIND, name, source);
            ProviderError::PostCreateReadFailed {
                kind: K::KIND,
                name: name.to_string(),
                source: Box::new(source),
            }
        })
    }

    /// Refresh state from the server
    pub async fn read(&self, state: &K::Model) -> Result<K::Model, ProviderError> {
        let id = required_id::<K>(state)?;
        self.resolver.resolve_by_id(&K::scope_of(state), id).await
    }

    /// Apply `plan` to the object tracked by `prior`
    pub async fn update(&self, prior: &K::Model, plan: &K::Model) -> Result<K::Model, ProviderError> {
        let replaced = replace_changes::<K>(prior, plan)?;
        if !replaced.is_empty() {
            return Err(ProviderError::InvalidConfiguration(format!(
                "changing {} requires replacing the {}",
                replaced.join(", "),
                K::KIND
            )));
        }

        let id = K::id_of(plan)
            .or_else(|| K::id_of(prior))
            .ok_or_else(missing_id::<K>)?;
        let scope = K::scope_of(plan);
        let body = K::update_request(plan, id);

        tracing::info!("updating {} {}", K::KIND, id);

        let result = match K::update_strategy(&scope, id) {
            UpdateStrategy::Typed => self.client.update(&K::item_path(&scope, id), &body).await,
            UpdateStrategy::Submit(operation) => {
                self.client.submit(&operation, Some(&body)).await.map(|_| ())
            }
        };
        result.map_err(|source| ProviderError::UpdateFailed {
            kind: K::KIND,
            id,
            source,
        })?;

        self.resolver.resolve_by_id(&scope, id).await
    }

    /// Remove the object tracked by `state`
    pub async fn delete(&self, state: &K::Model) -> Result<(), ProviderError> {
        let id = required_id::<K>(state)?;
        let path = K::item_path(&K::scope_of(state), id);

        tracing::info!("removing {} {}", K::KIND, id);

        self.client
            .delete(&path)
            .await
            .map_err(|source| ProviderError::DeleteFailed {
                kind: K::KIND,
                id,
                source,
            })
    }

    /// Adopt an existing object from its composite import ID
    pub async fn import(&self, raw_id: &str) -> Result<K::Model, ProviderError> {
        let fields = parse_import_fields(raw_id, K::IMPORT_LABELS)?;
        let (scope, id) = K::scope_from_import(&fields)?;

        tracing::info!("importing {} {} from `{}`", K::KIND, id, raw_id);

        self.resolver.resolve_by_id(&scope, id).await
    }

    /// Data-source read by ID, or by name for kinds that allow it
    pub async fn lookup(&self, query: &LookupQuery<K::Scope>) -> Result<K::Model, ProviderError> {
        match (query.id, query.name.as_deref()) {
            (Some(id), None) => self.resolver.resolve_by_id(&query.scope, id).await,
            (None, Some(name)) if K::LOOKUP_BY_NAME => {
                self.resolver.resolve_by_name(&query.scope, name).await
            }
            _ if K::LOOKUP_BY_NAME => Err(ProviderError::InvalidConfiguration(
                "exactly one of `id` or `name` must be set".to_string(),
            )),
            _ => Err(ProviderError::InvalidConfiguration(format!(
                "`id` is required to look up a {} and `name` cannot be set",
                K::KIND
            ))),
        }
    }
}

/// Positive ID echoed by a create response, if any
fn created_id(response: &Value) -> Option<i64> {
    response
        .get("id")
        .and_then(Value::as_i64)
        .filter(|id| *id > 0)
}

fn required_id<K: ResourceKind>(model: &K::Model) -> Result<i64, ProviderError> {
    K::id_of(model).ok_or_else(missing_id::<K>)
}

fn missing_id<K: ResourceKind>() -> ProviderError {
    ProviderError::InvalidConfiguration(format!("{} state has no `id`", K::KIND))
}

fn replace_changes<K: ResourceKind>(
    prior: &K::Model,
    plan: &K::Model,
) -> Result<Vec<&'static str>, ProviderError> {
    let prior = serde_json::to_value(prior)?;
    let plan = serde_json::to_value(plan)?;

    match (prior.as_object(), plan.as_object()) {
        (Some(prior), Some(plan)) => Ok(K::schema().replace_changes(prior, plan)),
        _ => Ok(Vec::new()),
    }
}
