//! Azure Managed Grafana models.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::SystemData;
use crate::pager::ListResult;

/// Provisioning state of a Grafana workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProvisioningState {
    Accepted,
    Creating,
    Updating,
    Deleting,
    Succeeded,
    Failed,
    Canceled,
    Deleted,
    NotSpecified,
    #[serde(other)]
    Unknown,
}

/// Whether the workspace accepts traffic from the public internet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublicNetworkAccess {
    Enabled,
    Disabled,
    #[serde(other)]
    Unknown,
}

/// Whether the workspace is zone redundant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneRedundancy {
    Enabled,
    Disabled,
    #[serde(other)]
    Unknown,
}

/// Whether API keys can be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiKey {
    Enabled,
    Disabled,
    #[serde(other)]
    Unknown,
}

/// Whether outbound IPs are fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeterministicOutboundIp {
    Enabled,
    Disabled,
    #[serde(other)]
    Unknown,
}

/// Workspace SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSku {
    /// SKU name, e.g. `Standard`.
    pub name: String,
}

/// Kind of managed identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManagedServiceIdentityType {
    None,
    SystemAssigned,
    UserAssigned,
    #[serde(rename = "SystemAssigned,UserAssigned")]
    SystemAssignedUserAssigned,
    #[serde(other)]
    Unknown,
}

/// A user-assigned identity.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAssignedIdentity {
    /// Client ID, read-only.
    pub client_id: Option<String>,
    /// Principal ID, read-only.
    pub principal_id: Option<String>,
}

/// Managed identity of a workspace.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedServiceIdentity {
    /// Identity kind.
    #[serde(rename = "type")]
    pub identity_type: ManagedServiceIdentityType,
    /// Principal ID of the system-assigned identity, read-only.
    pub principal_id: Option<String>,
    /// Tenant ID of the system-assigned identity, read-only.
    pub tenant_id: Option<String>,
    /// User-assigned identities, keyed by resource ID.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub user_assigned_identities: HashMap<String, UserAssignedIdentity>,
}

/// Enterprise plan settings.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseConfigurations {
    /// Marketplace plan ID.
    pub marketplace_plan_id: Option<String>,
    /// Whether the plan renews automatically, `Enabled` or `Disabled`.
    pub marketplace_auto_renew: Option<String>,
}

/// Properties of a Grafana workspace.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedGrafanaProperties {
    /// API key setting.
    pub api_key: Option<ApiKey>,
    /// Scope of the auto-generated domain name label.
    pub auto_generated_domain_name_label_scope: Option<String>,
    /// Outbound IP setting.
    #[serde(rename = "deterministicOutboundIP")]
    pub deterministic_outbound_ip: Option<DeterministicOutboundIp>,
    /// Enterprise plan settings.
    pub enterprise_configurations: Option<EnterpriseConfigurations>,
    /// Major Grafana version.
    pub grafana_major_version: Option<String>,
    /// Public network access setting.
    pub public_network_access: Option<PublicNetworkAccess>,
    /// Zone redundancy setting.
    pub zone_redundancy: Option<ZoneRedundancy>,
    /// Workspace endpoint, read-only.
    pub endpoint: Option<String>,
    /// Full Grafana version, read-only.
    pub grafana_version: Option<String>,
    /// Outbound IPs, read-only.
    #[serde(rename = "outboundIPs", default, skip_serializing_if = "Vec::is_empty")]
    pub outbound_ips: Vec<String>,
    /// Provisioning state, read-only.
    pub provisioning_state: Option<ProvisioningState>,
}

/// An Azure Managed Grafana workspace.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedGrafana {
    /// Resource ID.
    pub id: Option<String>,
    /// Resource name.
    pub name: Option<String>,
    /// Resource type.
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    /// Geo-location.
    pub location: Option<String>,
    /// Resource tags.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
    /// Workspace SKU.
    pub sku: Option<ResourceSku>,
    /// Managed identity.
    pub identity: Option<ManagedServiceIdentity>,
    /// Workspace properties.
    pub properties: Option<ManagedGrafanaProperties>,
    /// Creation and modification metadata.
    pub system_data: Option<SystemData>,
}

/// Updatable properties of a Grafana workspace.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedGrafanaPropertiesUpdateParameters {
    /// API key setting.
    pub api_key: Option<ApiKey>,
    /// Outbound IP setting.
    #[serde(rename = "deterministicOutboundIP")]
    pub deterministic_outbound_ip: Option<DeterministicOutboundIp>,
    /// Enterprise plan settings.
    pub enterprise_configurations: Option<EnterpriseConfigurations>,
    /// Major Grafana version.
    pub grafana_major_version: Option<String>,
    /// Public network access setting.
    pub public_network_access: Option<PublicNetworkAccess>,
    /// Zone redundancy setting.
    pub zone_redundancy: Option<ZoneRedundancy>,
}

/// Body of a workspace update.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagedGrafanaUpdateParameters {
    /// New SKU.
    pub sku: Option<ResourceSku>,
    /// New managed identity.
    pub identity: Option<ManagedServiceIdentity>,
    /// New tags.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
    /// New properties.
    pub properties: Option<ManagedGrafanaPropertiesUpdateParameters>,
}

/// Term of a SaaS subscription.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionTerm {
    /// Unit of the term, e.g. `P1M`.
    pub term_unit: Option<String>,
    /// Start of the term.
    pub start_date: Option<DateTime<Utc>>,
    /// End of the term.
    pub end_date: Option<DateTime<Utc>>,
}

/// SaaS subscription backing an enterprise plan.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaasSubscriptionDetails {
    /// Marketplace offer ID.
    pub offer_id: Option<String>,
    /// Marketplace plan ID.
    pub plan_id: Option<String>,
    /// Marketplace publisher ID.
    pub publisher_id: Option<String>,
    /// Subscription term.
    pub term: Option<SubscriptionTerm>,
}

/// Free trial availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailablePromotion {
    None,
    FreeTrial,
    #[serde(other)]
    Unknown,
}

/// Free trial state of the subscription.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceTrialQuota {
    /// Whether a free trial is available.
    pub available_promotion: Option<AvailablePromotion>,
    /// Workspace using the trial.
    pub grafana_resource_id: Option<String>,
    /// Trial start.
    pub trial_start_at: Option<DateTime<Utc>>,
    /// Trial end.
    pub trial_end_at: Option<DateTime<Utc>>,
}

/// Enterprise plan details of a workspace.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseDetails {
    /// Free trial state.
    pub marketplace_trial_quota: Option<MarketplaceTrialQuota>,
    /// SaaS subscription.
    pub saas_subscription_details: Option<SaasSubscriptionDetails>,
}

/// A plugin that can be installed in a workspace.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrafanaAvailablePlugin {
    /// Plugin ID.
    pub plugin_id: Option<String>,
    /// Plugin name.
    pub name: Option<String>,
}

/// Plugins that can be installed in a workspace.
pub type GrafanaAvailablePluginListResponse = ListResult<GrafanaAvailablePlugin>;

/// A page of Grafana workspaces.
pub type ManagedGrafanaListResponse = ListResult<ManagedGrafana>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_managed_grafana_deserialize() {
        let json = r#"{
            "id": "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Dashboard/grafana/ws",
            "name": "ws",
            "location": "westus",
            "sku": {"name": "Standard"},
            "identity": {"type": "SystemAssigned", "principalId": "p"},
            "properties": {
                "provisioningState": "Succeeded",
                "endpoint": "https://ws.grafana.azure.com",
                "deterministicOutboundIP": "Enabled",
                "outboundIPs": ["1.2.3.4"]
            }
        }"#;
        let grafana: ManagedGrafana = serde_json::from_str(json).unwrap();
        let props = grafana.properties.unwrap();
        assert_eq!(props.provisioning_state, Some(ProvisioningState::Succeeded));
        assert_eq!(props.deterministic_outbound_ip, Some(DeterministicOutboundIp::Enabled));
        assert_eq!(props.outbound_ips, vec!["1.2.3.4".to_string()]);
        assert_eq!(
            grafana.identity.unwrap().identity_type,
            ManagedServiceIdentityType::SystemAssigned
        );
    }

    #[test]
    fn test_identity_combined_type() {
        let identity: ManagedServiceIdentity =
            serde_json::from_str(r#"{"type":"SystemAssigned,UserAssigned"}"#).unwrap();
        assert_eq!(
            identity.identity_type,
            ManagedServiceIdentityType::SystemAssignedUserAssigned
        );
    }
}
