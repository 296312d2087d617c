//! Resources addressed by ID.

use reqwest::Method;

use super::models::GenericResource;
use crate::client::ArmClient;
use crate::error::{ArmError, Result};
use crate::poller::Poller;
use crate::request::{ArmRequest, UrlPath};

const RESOURCE_ID_PATH: &str = "/{resourceId}";

/// Optional parameters for [`GenericResourcesClient::begin_delete_by_id`].
#[derive(Debug, Clone, Default)]
pub struct GenericResourcesBeginDeleteByIdOptions {
    /// Resume a previously started operation instead of starting a new one.
    pub resume_token: Option<String>,
}

/// Client for operations on any resource, addressed by its ID.
#[derive(Debug, Clone)]
pub struct GenericResourcesClient {
    client: ArmClient,
}

impl GenericResourcesClient {
    /// Create a client on top of an existing pipeline.
    pub fn with_client(client: ArmClient) -> Self {
        Self { client }
    }

    /// Get a resource by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID or API version is empty, the request fails
    /// or the service answers with a status other than 200.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, resource_id: &str, api_version: &str) -> Result<GenericResource> {
        let request = self.resource_request(Method::GET, resource_id, api_version)?;
        let response = self.client.execute(&request, &[200]).await?;
        response.json()
    }

    /// Start deleting a resource by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID or API version is empty, the request fails
    /// or the service answers with a status other than 200, 202 or 204.
    #[tracing::instrument(skip(self, options))]
    pub async fn begin_delete_by_id(
        &self,
        resource_id: &str,
        api_version: &str,
        options: Option<&GenericResourcesBeginDeleteByIdOptions>,
    ) -> Result<Poller<()>> {
        self.client
            .begin(
                || self.resource_request(Method::DELETE, resource_id, api_version),
                &[200, 202, 204],
                None,
                options.and_then(|o| o.resume_token.as_deref()),
            )
            .await
    }

    fn resource_request(
        &self,
        method: Method,
        resource_id: &str,
        api_version: &str,
    ) -> Result<ArmRequest> {
        if api_version.is_empty() {
            return Err(ArmError::EmptyParameter("apiVersion"));
        }
        let path = UrlPath::new(RESOURCE_ID_PATH).raw_param("resourceId", resource_id)?;
        self.client.request(method, &path, api_version)
    }
}
