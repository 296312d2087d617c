//! Grafana workspaces.

use reqwest::Method;

use super::models::{
    EnterpriseDetails, GrafanaAvailablePluginListResponse, ManagedGrafana,
    ManagedGrafanaListResponse, ManagedGrafanaUpdateParameters,
};
use super::API_VERSION;
use crate::client::ArmClient;
use crate::error::Result;
use crate::pager::Pager;
use crate::poller::{FinalStateVia, Poller};
use crate::request::{ArmRequest, UrlPath};

const GRAFANA_PATH: &str = "/subscriptions/{subscriptionId}/providers/Microsoft.Dashboard/grafana";
const GRAFANA_BY_GROUP_PATH: &str =
    "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Dashboard/grafana";
const WORKSPACE_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Dashboard/grafana/{workspaceName}";

/// Optional parameters for [`GrafanaClient::begin_create`].
#[derive(Debug, Clone, Default)]
pub struct GrafanaBeginCreateOptions {
    /// Resume a previously started operation instead of starting a new one.
    pub resume_token: Option<String>,
}

/// Optional parameters for [`GrafanaClient::begin_delete`].
#[derive(Debug, Clone, Default)]
pub struct GrafanaBeginDeleteOptions {
    /// Resume a previously started operation instead of starting a new one.
    pub resume_token: Option<String>,
}

/// Client for Azure Managed Grafana workspaces.
#[derive(Debug, Clone)]
pub struct GrafanaClient {
    client: ArmClient,
    subscription_id: String,
}

impl GrafanaClient {
    /// Create a client on top of an existing pipeline.
    pub fn with_client(subscription_id: impl Into<String>, client: ArmClient) -> Self {
        Self {
            client,
            subscription_id: subscription_id.into(),
        }
    }

    /// Get the enterprise plan details of a workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200.
    #[tracing::instrument(skip(self))]
    pub async fn check_enterprise_details(
        &self,
        resource_group_name: &str,
        workspace_name: &str,
    ) -> Result<EnterpriseDetails> {
        let request = self.workspace_request(
            Method::POST,
            Some("checkEnterpriseDetails"),
            resource_group_name,
            workspace_name,
        )?;
        let response = self.client.execute(&request, &[200]).await?;
        response.json()
    }

    /// Start creating a workspace.
    ///
    /// The final workspace is read from the original URL once the
    /// `Azure-AsyncOperation` monitor reports success.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200 or 201.
    #[tracing::instrument(skip(self, parameters, options))]
    pub async fn begin_create(
        &self,
        resource_group_name: &str,
        workspace_name: &str,
        parameters: &ManagedGrafana,
        options: Option<&GrafanaBeginCreateOptions>,
    ) -> Result<Poller<ManagedGrafana>> {
        self.client
            .begin(
                || {
                    self.workspace_request(Method::PUT, None, resource_group_name, workspace_name)?
                        .json(parameters)
                },
                &[200, 201],
                Some(FinalStateVia::AzureAsyncOperation),
                options.and_then(|o| o.resume_token.as_deref()),
            )
            .await
    }

    /// Start deleting a workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200, 202 or 204.
    #[tracing::instrument(skip(self, options))]
    pub async fn begin_delete(
        &self,
        resource_group_name: &str,
        workspace_name: &str,
        options: Option<&GrafanaBeginDeleteOptions>,
    ) -> Result<Poller<()>> {
        self.client
            .begin(
                || self.workspace_request(Method::DELETE, None, resource_group_name, workspace_name),
                &[200, 202, 204],
                None,
                options.and_then(|o| o.resume_token.as_deref()),
            )
            .await
    }

    /// List the plugins that can be installed in a workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_available_plugins(
        &self,
        resource_group_name: &str,
        workspace_name: &str,
    ) -> Result<GrafanaAvailablePluginListResponse> {
        let request = self.workspace_request(
            Method::POST,
            Some("fetchAvailablePlugins"),
            resource_group_name,
            workspace_name,
        )?;
        let response = self.client.execute(&request, &[200]).await?;
        response.json()
    }

    /// Get a workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, resource_group_name: &str, workspace_name: &str) -> Result<ManagedGrafana> {
        let request = self.workspace_request(Method::GET, None, resource_group_name, workspace_name)?;
        let response = self.client.execute(&request, &[200]).await?;
        response.json()
    }

    /// List every workspace in the subscription.
    pub fn new_list_pager(&self) -> Pager<ManagedGrafanaListResponse> {
        let request = UrlPath::new(GRAFANA_PATH)
            .subscription(&self.subscription_id)
            .and_then(|path| self.client.request(Method::GET, &path, API_VERSION));
        Pager::new(self.client.clone(), request, &[200])
    }

    /// List the workspaces in a resource group.
    pub fn new_list_by_resource_group_pager(
        &self,
        resource_group_name: &str,
    ) -> Pager<ManagedGrafanaListResponse> {
        let request = UrlPath::new(GRAFANA_BY_GROUP_PATH)
            .param("resourceGroupName", resource_group_name)
            .and_then(|p| p.subscription(&self.subscription_id))
            .and_then(|path| self.client.request(Method::GET, &path, API_VERSION));
        Pager::new(self.client.clone(), request, &[200])
    }

    /// Update a workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200 or 202.
    #[tracing::instrument(skip(self, parameters))]
    pub async fn update(
        &self,
        resource_group_name: &str,
        workspace_name: &str,
        parameters: &ManagedGrafanaUpdateParameters,
    ) -> Result<ManagedGrafana> {
        let request = self
            .workspace_request(Method::PATCH, None, resource_group_name, workspace_name)?
            .json(parameters)?;
        let response = self.client.execute(&request, &[200, 202]).await?;
        response.json()
    }

    fn workspace_request(
        &self,
        method: Method,
        action: Option<&str>,
        resource_group_name: &str,
        workspace_name: &str,
    ) -> Result<ArmRequest> {
        let template = match action {
            Some(action) => format!("{WORKSPACE_PATH}/{action}"),
            None => WORKSPACE_PATH.to_string(),
        };
        let path = UrlPath::new(&template)
            .param("resourceGroupName", resource_group_name)?
            .param("workspaceName", workspace_name)?
            .subscription(&self.subscription_id)?;
        self.client.request(method, &path, API_VERSION)
    }
}
