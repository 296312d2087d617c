//! Microsoft.Dashboard resource provider (Azure Managed Grafana).

mod grafana;
mod models;

use std::sync::Arc;

use crate::client::ArmClient;
use crate::credential::TokenCredential;
use crate::error::Result;
use crate::options::ClientOptions;

pub use grafana::{GrafanaBeginCreateOptions, GrafanaBeginDeleteOptions, GrafanaClient};
pub use models::*;

/// API version used by every Managed Grafana operation.
pub const API_VERSION: &str = "2023-09-01";

/// Creates Managed Grafana clients that share one pipeline and subscription.
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

    /// Create a new [`GrafanaClient`].
    pub fn new_grafana_client(&self) -> GrafanaClient {
        GrafanaClient::with_client(self.subscription_id.clone(), self.client.clone())
    }
}
