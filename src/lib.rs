//! SemaphoreUI provider
//!
//! Manages SemaphoreUI project integrations, integration matchers and
//! integration extract values through the server's HTTP API, reconciling
//! what the server returns into declarative state documents.

pub mod api;
pub mod config;
pub mod error;
pub mod import_id;
pub mod resource;

pub use error::{Diagnostic, ProviderError};
pub use import_id::{parse_import_fields, ImportFields};
