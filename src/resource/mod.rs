//! Resource abstraction layer
//!
//! Every entity kind the provider manages follows the same shape: a schema,
//! a scope of parent IDs, a remote payload and a state model, plus the
//! conversions between them. [`ResourceKind`] captures that shape once and
//! [`Resource`] implements the lifecycle over any kind.
//!
//! # Architecture
//!
//! - [`registry`] - Maps type names to kinds for dispatch
//! - [`resolver`] - Fetch-and-scan lookup of one record by ID or name
//! - [`lifecycle`] - Create, read, update, delete, import and lookup
//! - [`schema`] - Attribute declarations and plan validation
//!
//! # Example
//!
//! ```ignore
//! use semaphoreui_provider::api::SemaphoreClient;
//! use semaphoreui_provider::resource::{IntegrationMatcherKind, Resource};
//!
//! async fn import(client: &SemaphoreClient) -> anyhow::Result<()> {
//!     let matcher = Resource::<IntegrationMatcherKind>::new(client)
//!         .import("project/42/integration/7/matcher/3")
//!         .await?;
//!     println!("{}", matcher.name);
//!     Ok(())
//! }
//! ```

mod extract_value;
mod integration;
pub mod lifecycle;
mod matcher;
pub mod registry;
pub mod resolver;
pub mod schema;

use crate::api::models::RemoteRecord;
use crate::api::Operation;
use crate::error::ProviderError;
use crate::import_id::ImportFields;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

pub use extract_value::{ExtractValueKind, IntegrationExtractValueModel};
pub use integration::{IntegrationKind, IntegrationModel, ProjectScope};
pub use lifecycle::{LookupQuery, Resource};
pub use matcher::{IntegrationMatcherKind, IntegrationMatcherModel, IntegrationScope};
pub use registry::*;
pub use resolver::Resolver;
pub use schema::ResourceSchema;

/// How an update reaches the server
#[derive(Debug, Clone)]
pub enum UpdateStrategy {
    /// PUT the declared update request to the item endpoint
    Typed,
    /// Send the update request through a manually constructed operation
    Submit(Operation),
}

/// One kind of remote entity
pub trait ResourceKind {
    /// Type name in configuration, e.g. `semaphoreui_project_integration`
    const TYPE_NAME: &'static str;
    /// Title-case name used in diagnostics
    const DISPLAY_NAME: &'static str;
    /// Lower-case name used in error messages
    const KIND: &'static str;
    /// Labels of the composite import ID, in order
    const IMPORT_LABELS: &'static [&'static str];
    /// Whether the data source may look the entity up by name
    const LOOKUP_BY_NAME: bool;

    /// Parent IDs under which the collection lives
    type Scope: Debug + Clone + DeserializeOwned;
    /// Payload returned by the collection endpoint
    type Remote: RemoteRecord + DeserializeOwned;
    /// State representation
    type Model: Debug + Clone + Serialize + DeserializeOwned;
    type CreateRequest: Serialize;
    type UpdateRequest: Serialize;

    fn collection_path(scope: &Self::Scope) -> String;
    fn item_path(scope: &Self::Scope, id: i64) -> String;

    fn scope_of(model: &Self::Model) -> Self::Scope;
    fn id_of(model: &Self::Model) -> Option<i64>;
    fn name_of(model: &Self::Model) -> &str;

    /// Scope and entity ID encoded in an import ID
    fn scope_from_import(fields: &ImportFields) -> Result<(Self::Scope, i64), ProviderError>;

    fn to_model(remote: Self::Remote, scope: &Self::Scope) -> Self::Model;
    fn create_request(model: &Self::Model) -> Self::CreateRequest;
    fn update_request(model: &Self::Model, id: i64) -> Self::UpdateRequest;

    fn update_strategy(_scope: &Self::Scope, _id: i64) -> UpdateStrategy {
        UpdateStrategy::Typed
    }

    fn schema() -> ResourceSchema;
}
