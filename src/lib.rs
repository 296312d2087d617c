//! Azure Resource Manager client library.
//!
//! Per-service clients build ARM requests, send them through a shared
//! pipeline, check the status against each operation's allow-list and
//! decode the response. List operations return a [`Pager`]; long-running
//! operations return a [`Poller`] that can be saved as a resume token and
//! picked up later.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use armsdk::{eventhub, ClientOptions, StaticTokenCredential};
//!
//! #[tokio::main]
//! async fn main() -> armsdk::Result<()> {
//!     let credential = Arc::new(StaticTokenCredential::new("token"));
//!     let factory = eventhub::ClientFactory::new("subscription-id", credential, ClientOptions::default())?;
//!
//!     // Single request
//!     let hub = factory
//!         .new_event_hubs_client()
//!         .get("my-rg", "my-namespace", "my-hub")
//!         .await?;
//!     println!("Event Hub: {:?}", hub.name);
//!
//!     // Every page of a list operation
//!     let namespaces = factory
//!         .new_namespaces_client()
//!         .new_list_by_resource_group_pager("my-rg")
//!         .collect_all()
//!         .await?;
//!     println!("Found {} namespaces", namespaces.len());
//!
//!     // Long-running operation
//!     let mut poller = factory
//!         .new_namespaces_client()
//!         .begin_delete("my-rg", "old-namespace", None)
//!         .await?;
//!     poller.poll_until_done(None).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Services
//!
//! - [`eventhub`] - Event Hubs namespaces, hubs and authorization rules
//! - [`dashboard`] - Managed Grafana workspaces
//! - [`compute`] - managed disk snapshots
//! - [`resources`] - any resource addressed by ID
//!
//! # Testing
//!
//! With the `fake` feature, the `fake` module provides in-process servers
//! that answer with canned responses, so clients can be tested without Azure.
//!
//! # Configuration
//!
//! [`EnvConfig::from_env`] reads:
//!
//! - `AZURE_SUBSCRIPTION_ID` (required) - subscription to operate on
//! - `AZURE_ACCESS_TOKEN` (required) - bearer token for ARM
//! - `AZURE_RESOURCE_MANAGER_ENDPOINT` (optional) - overrides the cloud's endpoint
//! - `AZURE_CLOUD` (optional) - `public` (default), `china` or `usgovernment`

mod client;
mod credential;
mod error;
mod models;
mod options;
mod pager;
mod poller;
mod request;
mod resource_id;
mod services;

pub mod cli;
#[cfg(feature = "fake")]
pub mod fake;
pub mod output;

// Re-export services
pub use services::{compute, dashboard, eventhub, resources};

// Re-export core types
pub use client::ArmClient;
pub use credential::{AccessToken, FakeCredential, StaticTokenCredential, TokenCredential, ARM_SCOPE};
pub use error::{ArmError, ResponseError, Result};
pub use options::{ClientOptions, Cloud, EnvConfig};
pub use request::{ArmRequest, RawResponse};
pub use resource_id::ResourceId;

// Re-export paging and polling
pub use pager::{ListResult, Paged, Pager};
pub use poller::{
    is_terminal_state, FinalStateVia, PollUntilDoneOptions, Poller, DEFAULT_POLL_FREQUENCY,
    FAKE_POLLER_STATUS, FAKE_STATUS_SUFFIX,
};

// Re-export shared models
pub use models::{CreatedByType, ErrorAdditionalInfo, ErrorDetail, ErrorResponse, SystemData};
