//! Event Hubs namespaces.

use reqwest::Method;

use super::models::{
    CheckNameAvailabilityParameter, CheckNameAvailabilityResult, EHNamespace, EHNamespaceListResult,
};
use super::API_VERSION;
use crate::client::ArmClient;
use crate::error::Result;
use crate::pager::Pager;
use crate::poller::Poller;
use crate::request::{ArmRequest, UrlPath};

const NAMESPACES_PATH: &str = "/subscriptions/{subscriptionId}/providers/Microsoft.EventHub/namespaces";
const NAMESPACES_BY_GROUP_PATH: &str =
    "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.EventHub/namespaces";
const NAMESPACE_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.EventHub/namespaces/{namespaceName}";
const CHECK_NAME_PATH: &str =
    "/subscriptions/{subscriptionId}/providers/Microsoft.EventHub/checkNameAvailability";

/// Optional parameters for [`NamespacesClient::begin_create_or_update`].
#[derive(Debug, Clone, Default)]
pub struct NamespacesBeginCreateOrUpdateOptions {
    /// Resume a previously started operation instead of starting a new one.
    pub resume_token: Option<String>,
}

/// Optional parameters for [`NamespacesClient::begin_delete`].
#[derive(Debug, Clone, Default)]
pub struct NamespacesBeginDeleteOptions {
    /// Resume a previously started operation instead of starting a new one.
    pub resume_token: Option<String>,
}

/// Client for Event Hubs namespaces.
#[derive(Debug, Clone)]
pub struct NamespacesClient {
    client: ArmClient,
    subscription_id: String,
}

impl NamespacesClient {
    /// Create a client on top of an existing pipeline.
    pub fn with_client(subscription_id: impl Into<String>, client: ArmClient) -> Self {
        Self {
            client,
            subscription_id: subscription_id.into(),
        }
    }

    /// Start creating or updating a namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200, 201 or 202.
    #[tracing::instrument(skip(self, parameters, options))]
    pub async fn begin_create_or_update(
        &self,
        resource_group_name: &str,
        namespace_name: &str,
        parameters: &EHNamespace,
        options: Option<&NamespacesBeginCreateOrUpdateOptions>,
    ) -> Result<Poller<EHNamespace>> {
        self.client
            .begin(
                || {
                    self.namespace_request(Method::PUT, resource_group_name, namespace_name)?
                        .json(parameters)
                },
                &[200, 201, 202],
                None,
                options.and_then(|o| o.resume_token.as_deref()),
            )
            .await
    }

    /// Start deleting a namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200, 202 or 204.
    #[tracing::instrument(skip(self, options))]
    pub async fn begin_delete(
        &self,
        resource_group_name: &str,
        namespace_name: &str,
        options: Option<&NamespacesBeginDeleteOptions>,
    ) -> Result<Poller<()>> {
        self.client
            .begin(
                || self.namespace_request(Method::DELETE, resource_group_name, namespace_name),
                &[200, 202, 204],
                None,
                options.and_then(|o| o.resume_token.as_deref()),
            )
            .await
    }

    /// Get a namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200 or 201.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, resource_group_name: &str, namespace_name: &str) -> Result<EHNamespace> {
        let request = self.namespace_request(Method::GET, resource_group_name, namespace_name)?;
        let response = self.client.execute(&request, &[200, 201]).await?;
        response.json()
    }

    /// Update the tags, SKU or properties of a namespace.
    ///
    /// A 202 response carries no body, so the returned namespace is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200, 201 or 202.
    #[tracing::instrument(skip(self, parameters))]
    pub async fn update(
        &self,
        resource_group_name: &str,
        namespace_name: &str,
        parameters: &EHNamespace,
    ) -> Result<EHNamespace> {
        let request = self
            .namespace_request(Method::PATCH, resource_group_name, namespace_name)?
            .json(parameters)?;
        let response = self.client.execute(&request, &[200, 201, 202]).await?;
        response.json()
    }

    /// List every namespace in the subscription.
    pub fn new_list_pager(&self) -> Pager<EHNamespaceListResult> {
        let request = UrlPath::new(NAMESPACES_PATH)
            .subscription(&self.subscription_id)
            .and_then(|path| self.client.request(Method::GET, &path, API_VERSION));
        Pager::new(self.client.clone(), request, &[200])
    }

    /// List the namespaces in a resource group.
    pub fn new_list_by_resource_group_pager(
        &self,
        resource_group_name: &str,
    ) -> Pager<EHNamespaceListResult> {
        let request = UrlPath::new(NAMESPACES_BY_GROUP_PATH)
            .param("resourceGroupName", resource_group_name)
            .and_then(|p| p.subscription(&self.subscription_id))
            .and_then(|path| self.client.request(Method::GET, &path, API_VERSION));
        Pager::new(self.client.clone(), request, &[200])
    }

    /// Check whether a namespace name is available.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service answers with a
    /// status other than 200.
    #[tracing::instrument(skip(self))]
    pub async fn check_name_availability(
        &self,
        parameters: &CheckNameAvailabilityParameter,
    ) -> Result<CheckNameAvailabilityResult> {
        let path = UrlPath::new(CHECK_NAME_PATH).subscription(&self.subscription_id)?;
        let request = self
            .client
            .request(Method::POST, &path, API_VERSION)?
            .json(parameters)?;
        let response = self.client.execute(&request, &[200]).await?;
        response.json()
    }

    fn namespace_request(
        &self,
        method: Method,
        resource_group_name: &str,
        namespace_name: &str,
    ) -> Result<ArmRequest> {
        let path = UrlPath::new(NAMESPACE_PATH)
            .param("resourceGroupName", resource_group_name)?
            .param("namespaceName", namespace_name)?
            .subscription(&self.subscription_id)?;
        self.client.request(method, &path, API_VERSION)
    }
}
