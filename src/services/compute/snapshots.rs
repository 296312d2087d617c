//! Managed disk snapshots.

use reqwest::Method;

use super::models::{AccessUri, GrantAccessData, Snapshot, SnapshotList, SnapshotUpdate};
use super::API_VERSION;
use crate::client::ArmClient;
use crate::error::Result;
use crate::pager::Pager;
use crate::poller::{FinalStateVia, Poller};
use crate::request::{ArmRequest, UrlPath};

const SNAPSHOTS_PATH: &str = "/subscriptions/{subscriptionId}/providers/Microsoft.Compute/snapshots";
const SNAPSHOTS_BY_GROUP_PATH: &str =
    "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Compute/snapshots";
const SNAPSHOT_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Compute/snapshots/{snapshotName}";

macro_rules! resume_options {
    ($($(#[$doc:meta])* $name:ident;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Default)]
            pub struct $name {
                /// Resume a previously started operation instead of starting a new one.
                pub resume_token: Option<String>,
            }
        )*
    };
}

resume_options! {
    /// Optional parameters for [`SnapshotsClient::begin_create_or_update`].
    SnapshotsBeginCreateOrUpdateOptions;
    /// Optional parameters for [`SnapshotsClient::begin_delete`].
    SnapshotsBeginDeleteOptions;
    /// Optional parameters for [`SnapshotsClient::begin_grant_access`].
    SnapshotsBeginGrantAccessOptions;
    /// Optional parameters for [`SnapshotsClient::begin_revoke_access`].
    SnapshotsBeginRevokeAccessOptions;
    /// Optional parameters for [`SnapshotsClient::begin_update`].
    SnapshotsBeginUpdateOptions;
}

/// Client for managed disk snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotsClient {
    client: ArmClient,
    subscription_id: String,
}

impl SnapshotsClient {
    /// Create a client on top of an existing pipeline.
    pub fn with_client(subscription_id: impl Into<String>, client: ArmClient) -> Self {
        Self {
            client,
            subscription_id: subscription_id.into(),
        }
    }

    /// Start creating or updating a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200 or 202.
    #[tracing::instrument(skip(self, snapshot, options))]
    pub async fn begin_create_or_update(
        &self,
        resource_group_name: &str,
        snapshot_name: &str,
        snapshot: &Snapshot,
        options: Option<&SnapshotsBeginCreateOrUpdateOptions>,
    ) -> Result<Poller<Snapshot>> {
        self.client
            .begin(
                || {
                    self.snapshot_request(Method::PUT, None, resource_group_name, snapshot_name)?
                        .json(snapshot)
                },
                &[200, 202],
                None,
                options.and_then(|o| o.resume_token.as_deref()),
            )
            .await
    }

    /// Start deleting a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200, 202 or 204.
    #[tracing::instrument(skip(self, options))]
    pub async fn begin_delete(
        &self,
        resource_group_name: &str,
        snapshot_name: &str,
        options: Option<&SnapshotsBeginDeleteOptions>,
    ) -> Result<Poller<()>> {
        self.client
            .begin(
                || self.snapshot_request(Method::DELETE, None, resource_group_name, snapshot_name),
                &[200, 202, 204],
                None,
                options.and_then(|o| o.resume_token.as_deref()),
            )
            .await
    }

    /// Get a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, resource_group_name: &str, snapshot_name: &str) -> Result<Snapshot> {
        let request = self.snapshot_request(Method::GET, None, resource_group_name, snapshot_name)?;
        let response = self.client.execute(&request, &[200]).await?;
        response.json()
    }

    /// Start granting SAS access to a snapshot.
    ///
    /// The SAS URI is read from the `Location` header once the operation
    /// finishes.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200 or 202.
    #[tracing::instrument(skip(self, grant_access_data, options))]
    pub async fn begin_grant_access(
        &self,
        resource_group_name: &str,
        snapshot_name: &str,
        grant_access_data: &GrantAccessData,
        options: Option<&SnapshotsBeginGrantAccessOptions>,
    ) -> Result<Poller<AccessUri>> {
        self.client
            .begin(
                || {
                    self.snapshot_request(
                        Method::POST,
                        Some("beginGetAccess"),
                        resource_group_name,
                        snapshot_name,
                    )?
                    .json(grant_access_data)
                },
                &[200, 202],
                Some(FinalStateVia::Location),
                options.and_then(|o| o.resume_token.as_deref()),
            )
            .await
    }

    /// List every snapshot in the subscription.
    pub fn new_list_pager(&self) -> Pager<SnapshotList> {
        let request = UrlPath::new(SNAPSHOTS_PATH)
            .subscription(&self.subscription_id)
            .and_then(|path| self.client.request(Method::GET, &path, API_VERSION));
        Pager::new(self.client.clone(), request, &[200])
    }

    /// List the snapshots in a resource group.
    pub fn new_list_by_resource_group_pager(&self, resource_group_name: &str) -> Pager<SnapshotList> {
        let request = UrlPath::new(SNAPSHOTS_BY_GROUP_PATH)
            .param("resourceGroupName", resource_group_name)
            .and_then(|p| p.subscription(&self.subscription_id))
            .and_then(|path| self.client.request(Method::GET, &path, API_VERSION));
        Pager::new(self.client.clone(), request, &[200])
    }

    /// Start revoking SAS access to a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200, 202 or 204.
    #[tracing::instrument(skip(self, options))]
    pub async fn begin_revoke_access(
        &self,
        resource_group_name: &str,
        snapshot_name: &str,
        options: Option<&SnapshotsBeginRevokeAccessOptions>,
    ) -> Result<Poller<()>> {
        self.client
            .begin(
                || {
                    self.snapshot_request(
                        Method::POST,
                        Some("endGetAccess"),
                        resource_group_name,
                        snapshot_name,
                    )
                },
                &[200, 202, 204],
                Some(FinalStateVia::Location),
                options.and_then(|o| o.resume_token.as_deref()),
            )
            .await
    }

    /// Start updating a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200 or 202.
    #[tracing::instrument(skip(self, snapshot, options))]
    pub async fn begin_update(
        &self,
        resource_group_name: &str,
        snapshot_name: &str,
        snapshot: &SnapshotUpdate,
        options: Option<&SnapshotsBeginUpdateOptions>,
    ) -> Result<Poller<Snapshot>> {
        self.client
            .begin(
                || {
                    self.snapshot_request(Method::PATCH, None, resource_group_name, snapshot_name)?
                        .json(snapshot)
                },
                &[200, 202],
                None,
                options.and_then(|o| o.resume_token.as_deref()),
            )
            .await
    }

    fn snapshot_request(
        &self,
        method: Method,
        action: Option<&str>,
        resource_group_name: &str,
        snapshot_name: &str,
    ) -> Result<ArmRequest> {
        let template = match action {
            Some(action) => format!("{SNAPSHOT_PATH}/{action}"),
            None => SNAPSHOT_PATH.to_string(),
        };
        let path = UrlPath::new(&template)
            .param("resourceGroupName", resource_group_name)?
            .param("snapshotName", snapshot_name)?
            .subscription(&self.subscription_id)?;
        self.client.request(method, &path, API_VERSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::FakeCredential;
    use crate::error::ArmError;
    use crate::options::ClientOptions;
    use std::sync::Arc;

    fn client(subscription_id: &str) -> SnapshotsClient {
        let pipeline = ArmClient::new(Arc::new(FakeCredential), ClientOptions::default()).unwrap();
        SnapshotsClient::with_client(subscription_id, pipeline)
    }

    #[test]
    fn test_revoke_access_path() {
        let req = client("sub")
            .snapshot_request(Method::POST, Some("endGetAccess"), "rg", "snap 1")
            .unwrap();
        assert_eq!(
            req.url().path(),
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Compute/snapshots/snap%201/endGetAccess"
        );
        assert_eq!(req.url().query(), Some("api-version=2024-03-02"));
    }

    #[tokio::test]
    async fn test_begin_rejects_empty_subscription() {
        let err = client("")
            .begin_delete("rg", "snap", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ArmError::EmptyParameter("client.subscriptionID")));
    }
}
