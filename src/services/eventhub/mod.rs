//! Microsoft.EventHub resource provider.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use armsdk::eventhub::ClientFactory;
//! use armsdk::{ClientOptions, StaticTokenCredential};
//!
//! # async fn example() -> armsdk::Result<()> {
//! let credential = Arc::new(StaticTokenCredential::new("token"));
//! let factory = ClientFactory::new("subscription-id", credential, ClientOptions::default())?;
//!
//! let hub = factory
//!     .new_event_hubs_client()
//!     .get("my-rg", "my-namespace", "my-hub")
//!     .await?;
//! println!("{:?}", hub.name);
//! # Ok(())
//! # }
//! ```

mod eventhubs;
mod models;
mod namespaces;

use std::sync::Arc;

use crate::client::ArmClient;
use crate::credential::TokenCredential;
use crate::error::Result;
use crate::options::ClientOptions;

pub use eventhubs::{EventHubsClient, EventHubsListByNamespaceOptions};
pub use models::*;
pub use namespaces::{NamespacesBeginCreateOrUpdateOptions, NamespacesBeginDeleteOptions, NamespacesClient};

/// API version used by every Event Hubs operation.
pub const API_VERSION: &str = "2024-05-01-preview";

/// Creates Event Hubs clients that share one pipeline and subscription.
#[derive(Debug, Clone)]
pub struct ClientFactory {
    client: ArmClient,
    subscription_id: String,
}

impl ClientFactory {
    /// Create a factory for the given subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline can't be built from `options`.
    pub fn new(
        subscription_id: impl Into<String>,
        credential: Arc<dyn TokenCredential>,
        options: ClientOptions,
    ) -> Result<Self> {
        Ok(Self {
            client: ArmClient::new(credential, options)?,
            subscription_id: subscription_id.into(),
        })
    }

    /// Create a factory on top of an existing pipeline.
    pub fn with_client(subscription_id: impl Into<String>, client: ArmClient) -> Self {
        Self {
            client,
            subscription_id: subscription_id.into(),
        }
    }

    /// Create a new [`EventHubsClient`].
    pub fn new_event_hubs_client(&self) -> EventHubsClient {
        EventHubsClient::with_client(self.subscription_id.clone(), self.client.clone())
    }

    /// Create a new [`NamespacesClient`].
    pub fn new_namespaces_client(&self) -> NamespacesClient {
        NamespacesClient::with_client(self.subscription_id.clone(), self.client.clone())
    }
}
