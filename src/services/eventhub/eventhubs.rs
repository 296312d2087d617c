//! Event Hubs and their authorization rules.

use reqwest::Method;

use super::models::{
    AccessKeys, AuthorizationRule, AuthorizationRuleListResult, Eventhub, EventhubListResult,
    RegenerateAccessKeyParameters,
};
use super::API_VERSION;
use crate::client::ArmClient;
use crate::error::Result;
use crate::pager::Pager;
use crate::request::{ArmRequest, UrlPath};

const EVENTHUBS_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.EventHub/namespaces/{namespaceName}/eventhubs";
const EVENTHUB_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.EventHub/namespaces/{namespaceName}/eventhubs/{eventHubName}";
const RULES_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.EventHub/namespaces/{namespaceName}/eventhubs/{eventHubName}/authorizationRules";
const RULE_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.EventHub/namespaces/{namespaceName}/eventhubs/{eventHubName}/authorizationRules/{authorizationRuleName}";

/// Optional parameters for [`EventHubsClient::new_list_by_namespace_pager`].
#[derive(Debug, Clone, Default)]
pub struct EventHubsListByNamespaceOptions {
    /// Number of entries to skip, used with `$skipToken`.
    pub skip: Option<i32>,
    /// Maximum number of entries per page.
    pub top: Option<i32>,
}

/// Client for Event Hubs inside a namespace.
#[derive(Debug, Clone)]
pub struct EventHubsClient {
    client: ArmClient,
    subscription_id: String,
}

impl EventHubsClient {
    /// Create a client on top of an existing pipeline.
    pub fn with_client(subscription_id: impl Into<String>, client: ArmClient) -> Self {
        Self {
            client,
            subscription_id: subscription_id.into(),
        }
    }

    /// Create or update an Event Hub.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200.
    #[tracing::instrument(skip(self, parameters))]
    pub async fn create_or_update(
        &self,
        resource_group_name: &str,
        namespace_name: &str,
        event_hub_name: &str,
        parameters: &Eventhub,
    ) -> Result<Eventhub> {
        let request = self
            .eventhub_request(Method::PUT, resource_group_name, namespace_name, event_hub_name)?
            .json(parameters)?;
        let response = self.client.execute(&request, &[200]).await?;
        response.json()
    }

    /// Delete an Event Hub.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200 or 204.
    #[tracing::instrument(skip(self))]
    pub async fn delete(
        &self,
        resource_group_name: &str,
        namespace_name: &str,
        event_hub_name: &str,
    ) -> Result<()> {
        let request =
            self.eventhub_request(Method::DELETE, resource_group_name, namespace_name, event_hub_name)?;
        self.client.execute(&request, &[200, 204]).await?;
        Ok(())
    }

    /// Get an Event Hub.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200.
    #[tracing::instrument(skip(self))]
    pub async fn get(
        &self,
        resource_group_name: &str,
        namespace_name: &str,
        event_hub_name: &str,
    ) -> Result<Eventhub> {
        let request =
            self.eventhub_request(Method::GET, resource_group_name, namespace_name, event_hub_name)?;
        let response = self.client.execute(&request, &[200]).await?;
        response.json()
    }

    /// List the Event Hubs in a namespace.
    pub fn new_list_by_namespace_pager(
        &self,
        resource_group_name: &str,
        namespace_name: &str,
        options: Option<&EventHubsListByNamespaceOptions>,
    ) -> Pager<EventhubListResult> {
        let request = self.list_by_namespace_request(resource_group_name, namespace_name, options);
        Pager::new(self.client.clone(), request, &[200])
    }

    /// Create or update an authorization rule of an Event Hub.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200.
    #[tracing::instrument(skip(self, parameters))]
    pub async fn create_or_update_authorization_rule(
        &self,
        resource_group_name: &str,
        namespace_name: &str,
        event_hub_name: &str,
        authorization_rule_name: &str,
        parameters: &AuthorizationRule,
    ) -> Result<AuthorizationRule> {
        let path = self.rule_path(
            RULE_PATH,
            resource_group_name,
            namespace_name,
            event_hub_name,
            authorization_rule_name,
        )?;
        let request = self
            .client
            .request(Method::PUT, &path, API_VERSION)?
            .json(parameters)?;
        let response = self.client.execute(&request, &[200]).await?;
        response.json()
    }

    /// Delete an authorization rule of an Event Hub.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200 or 204.
    #[tracing::instrument(skip(self))]
    pub async fn delete_authorization_rule(
        &self,
        resource_group_name: &str,
        namespace_name: &str,
        event_hub_name: &str,
        authorization_rule_name: &str,
    ) -> Result<()> {
        let path = self.rule_path(
            RULE_PATH,
            resource_group_name,
            namespace_name,
            event_hub_name,
            authorization_rule_name,
        )?;
        let request = self.client.request(Method::DELETE, &path, API_VERSION)?;
        self.client.execute(&request, &[200, 204]).await?;
        Ok(())
    }

    /// Get an authorization rule of an Event Hub.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200.
    #[tracing::instrument(skip(self))]
    pub async fn get_authorization_rule(
        &self,
        resource_group_name: &str,
        namespace_name: &str,
        event_hub_name: &str,
        authorization_rule_name: &str,
    ) -> Result<AuthorizationRule> {
        let path = self.rule_path(
            RULE_PATH,
            resource_group_name,
            namespace_name,
            event_hub_name,
            authorization_rule_name,
        )?;
        let request = self.client.request(Method::GET, &path, API_VERSION)?;
        let response = self.client.execute(&request, &[200]).await?;
        response.json()
    }

    /// List the authorization rules of an Event Hub.
    pub fn new_list_authorization_rules_pager(
        &self,
        resource_group_name: &str,
        namespace_name: &str,
        event_hub_name: &str,
    ) -> Pager<AuthorizationRuleListResult> {
        let request = UrlPath::new(RULES_PATH)
            .param("resourceGroupName", resource_group_name)
            .and_then(|p| p.param("namespaceName", namespace_name))
            .and_then(|p| p.param("eventHubName", event_hub_name))
            .and_then(|p| p.subscription(&self.subscription_id))
            .and_then(|path| self.client.request(Method::GET, &path, API_VERSION));
        Pager::new(self.client.clone(), request, &[200])
    }

    /// Get the connection strings and keys of an authorization rule.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200.
    #[tracing::instrument(skip(self))]
    pub async fn list_keys(
        &self,
        resource_group_name: &str,
        namespace_name: &str,
        event_hub_name: &str,
        authorization_rule_name: &str,
    ) -> Result<AccessKeys> {
        let path = self.rule_path(
            &format!("{RULE_PATH}/listKeys"),
            resource_group_name,
            namespace_name,
            event_hub_name,
            authorization_rule_name,
        )?;
        let request = self.client.request(Method::POST, &path, API_VERSION)?;
        let response = self.client.execute(&request, &[200]).await?;
        response.json()
    }

    /// Regenerate a key of an authorization rule.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is empty, the request fails or the
    /// service answers with a status other than 200.
    #[tracing::instrument(skip(self, parameters))]
    pub async fn regenerate_keys(
        &self,
        resource_group_name: &str,
        namespace_name: &str,
        event_hub_name: &str,
        authorization_rule_name: &str,
        parameters: &RegenerateAccessKeyParameters,
    ) -> Result<AccessKeys> {
        let path = self.rule_path(
            &format!("{RULE_PATH}/regenerateKeys"),
            resource_group_name,
            namespace_name,
            event_hub_name,
            authorization_rule_name,
        )?;
        let request = self
            .client
            .request(Method::POST, &path, API_VERSION)?
            .json(parameters)?;
        let response = self.client.execute(&request, &[200]).await?;
        response.json()
    }

    fn eventhub_request(
        &self,
        method: Method,
        resource_group_name: &str,
        namespace_name: &str,
        event_hub_name: &str,
    ) -> Result<ArmRequest> {
        let path = UrlPath::new(EVENTHUB_PATH)
            .param("resourceGroupName", resource_group_name)?
            .param("namespaceName", namespace_name)?
            .param("eventHubName", event_hub_name)?
            .subscription(&self.subscription_id)?;
        self.client.request(method, &path, API_VERSION)
    }

    fn list_by_namespace_request(
        &self,
        resource_group_name: &str,
        namespace_name: &str,
        options: Option<&EventHubsListByNamespaceOptions>,
    ) -> Result<ArmRequest> {
        let path = UrlPath::new(EVENTHUBS_PATH)
            .param("resourceGroupName", resource_group_name)?
            .param("namespaceName", namespace_name)?
            .subscription(&self.subscription_id)?;
        let request = self.client.request(Method::GET, &path, API_VERSION)?;
        Ok(request
            .query_opt("$skip", options.and_then(|o| o.skip))
            .query_opt("$top", options.and_then(|o| o.top)))
    }

    fn rule_path(
        &self,
        template: &str,
        resource_group_name: &str,
        namespace_name: &str,
        event_hub_name: &str,
        authorization_rule_name: &str,
    ) -> Result<UrlPath> {
        UrlPath::new(template)
            .param("resourceGroupName", resource_group_name)?
            .param("namespaceName", namespace_name)?
            .param("eventHubName", event_hub_name)?
            .param("authorizationRuleName", authorization_rule_name)?
            .subscription(&self.subscription_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::FakeCredential;
    use crate::error::ArmError;
    use crate::options::ClientOptions;
    use std::sync::Arc;

    fn client(subscription_id: &str) -> EventHubsClient {
        let pipeline = ArmClient::new(Arc::new(FakeCredential), ClientOptions::default()).unwrap();
        EventHubsClient::with_client(subscription_id, pipeline)
    }

    #[test]
    fn test_list_by_namespace_request_query() {
        let options = EventHubsListByNamespaceOptions {
            skip: Some(5),
            top: Some(10),
        };
        let req = client("sub")
            .list_by_namespace_request("rg", "ns", Some(&options))
            .unwrap();
        assert_eq!(req.url().path(), "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.EventHub/namespaces/ns/eventhubs");
        let query: Vec<(String, String)> = req.url().query_pairs().into_owned().collect();
        assert!(query.contains(&("api-version".to_string(), API_VERSION.to_string())));
        assert!(query.contains(&("$skip".to_string(), "5".to_string())));
        assert!(query.contains(&("$top".to_string(), "10".to_string())));
    }

    #[test]
    fn test_rule_path_requires_every_parameter() {
        let err = client("sub")
            .rule_path(RULE_PATH, "rg", "ns", "hub", "")
            .unwrap_err();
        assert!(matches!(err, ArmError::EmptyParameter("authorizationRuleName")));

        let err = client("")
            .rule_path(RULE_PATH, "rg", "ns", "hub", "rule")
            .unwrap_err();
        assert!(matches!(err, ArmError::EmptyParameter("client.subscriptionID")));
    }

    #[tokio::test]
    async fn test_empty_parameter_fails_before_sending() {
        let err = client("sub").get("", "ns", "hub").await.unwrap_err();
        assert_eq!(err.to_string(), "parameter resourceGroupName cannot be empty");
    }
}
