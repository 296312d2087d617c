//! Microsoft.Compute resource provider (managed disk snapshots).

mod models;
mod snapshots;

use std::sync::Arc;

use crate::client::ArmClient;
use crate::credential::TokenCredential;
use crate::error::Result;
use crate::options::ClientOptions;

pub use models::*;
pub use snapshots::{
    SnapshotsBeginCreateOrUpdateOptions, SnapshotsBeginDeleteOptions, SnapshotsBeginGrantAccessOptions,
    SnapshotsBeginRevokeAccessOptions, SnapshotsBeginUpdateOptions, SnapshotsClient,
};

/// API version used by every snapshot operation.
pub const API_VERSION: &str = "2024-03-02";

/// Creates compute clients that share one pipeline and subscription.
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

    /// Create a new [`SnapshotsClient`].
    pub fn new_snapshots_client(&self) -> SnapshotsClient {
        SnapshotsClient::with_client(self.subscription_id.clone(), self.client.clone())
    }
}
