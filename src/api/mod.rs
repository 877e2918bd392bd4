//! SemaphoreUI API interaction module
//!
//! This module provides the transport the provider is built on: an HTTP
//! client, a SemaphoreUI client holding base URL and credentials, and the
//! wire payloads of the integration endpoints.
//!
//! # Module Structure
//!
//! - [`client`] - Main client and endpoint path builders
//! - [`http`] - HTTP utilities, manual operations and transport errors
//! - [`models`] - Request and response payloads
//!
//! # Example
//!
//! ```ignore
//! use semaphoreui_provider::api::{client, SemaphoreClient};
//! use semaphoreui_provider::api::models::Integration;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = SemaphoreClient::new("http://localhost:3000/api", Some("token"), false)?;
//!     let integrations: Vec<Integration> =
//!         client.list(&client::project_integrations_path(1)).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
pub mod models;

pub use client::SemaphoreClient;
pub use http::{ApiError, Operation};
