//! Microsoft.Resources operations on arbitrary resources.
//!
//! Generic operations address a resource by its full ID and take the
//! provider's API version as an argument.

mod generic;
mod models;

use std::sync::Arc;

use crate::client::ArmClient;
use crate::credential::TokenCredential;
use crate::error::Result;
use crate::options::ClientOptions;

pub use generic::{GenericResourcesBeginDeleteByIdOptions, GenericResourcesClient};
pub use models::*;

/// Creates generic resource clients that share one pipeline.
#[derive(Debug, Clone)]
pub struct ClientFactory {
    client: ArmClient,
}

impl ClientFactory {
    /// Create a factory.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline can't be built from `options`.
    pub fn new(credential: Arc<dyn TokenCredential>, options: ClientOptions) -> Result<Self> {
        Ok(Self {
            client: ArmClient::new(credential, options)?,
        })
    }

    /// Create a factory on top of an existing pipeline.
    pub fn with_client(client: ArmClient) -> Self {
        Self { client }
    }

    /// Create a new [`GenericResourcesClient`].
    pub fn new_generic_resources_client(&self) -> GenericResourcesClient {
        GenericResourcesClient::with_client(self.client.clone())
    }
}
