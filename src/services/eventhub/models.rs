//! Event Hubs models.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::SystemData;
use crate::pager::ListResult;

/// Status of an Event Hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityStatus {
    Active,
    Disabled,
    Restoring,
    SendDisabled,
    ReceiveDisabled,
    Creating,
    Deleting,
    Renaming,
    #[serde(other)]
    Unknown,
}

/// Cleanup policy applied when messages exceed the retention time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CleanupPolicyRetentionDescription {
    Delete,
    Compact,
    #[serde(other)]
    Unknown,
}

/// Retention settings of an Event Hub.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionDescription {
    /// What happens to expired events.
    pub cleanup_policy: Option<CleanupPolicyRetentionDescription>,
    /// Retention time for deleted events, in hours.
    pub retention_time_in_hours: Option<i64>,
    /// Minimum compaction lag for tombstone markers, in hours.
    pub tombstone_retention_time_in_hours: Option<i32>,
}

/// Capture file encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodingCaptureDescription {
    Avro,
    AvroDeflate,
    #[serde(other)]
    Unknown,
}

/// Where captured events are stored.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureDestinationProperties {
    /// Blob naming convention.
    pub archive_name_format: Option<String>,
    /// Blob container name.
    pub blob_container: Option<String>,
    /// Resource ID of the storage account.
    #[serde(rename = "storageAccountResourceId")]
    pub storage_account_resource_id: Option<String>,
}

/// Capture destination.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureDestination {
    /// Destination name, e.g. `EventHubArchive.AzureBlockBlob`.
    pub name: Option<String>,
    /// Destination settings.
    pub properties: Option<CaptureDestinationProperties>,
}

/// Capture settings of an Event Hub.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureDescription {
    /// Whether capture is enabled.
    pub enabled: Option<bool>,
    /// Capture file encoding.
    pub encoding: Option<EncodingCaptureDescription>,
    /// Capture window, in seconds.
    pub interval_in_seconds: Option<i32>,
    /// Capture window, in bytes.
    pub size_limit_in_bytes: Option<i32>,
    /// Where captured events go.
    pub destination: Option<CaptureDestination>,
    /// Whether empty archives are skipped.
    pub skip_empty_archives: Option<bool>,
}

/// Properties of an Event Hub.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventhubProperties {
    /// Capture settings.
    pub capture_description: Option<CaptureDescription>,
    /// Days to retain events.
    pub message_retention_in_days: Option<i64>,
    /// Number of partitions.
    pub partition_count: Option<i64>,
    /// Retention settings.
    pub retention_description: Option<RetentionDescription>,
    /// Entity status.
    pub status: Option<EntityStatus>,
    /// Partition IDs, read-only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partition_ids: Vec<String>,
    /// Creation time, read-only.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time, read-only.
    pub updated_at: Option<DateTime<Utc>>,
}

/// An Event Hub inside a namespace.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eventhub {
    /// Resource ID.
    pub id: Option<String>,
    /// Resource name.
    pub name: Option<String>,
    /// Resource type.
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    /// Geo-location of the namespace.
    pub location: Option<String>,
    /// Event Hub properties.
    pub properties: Option<EventhubProperties>,
    /// Creation and modification metadata.
    pub system_data: Option<SystemData>,
}

/// Rights granted by an authorization rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessRights {
    Manage,
    Send,
    Listen,
    #[serde(other)]
    Unknown,
}

/// Properties of an authorization rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationRuleProperties {
    /// Rights associated with the rule.
    #[serde(default)]
    pub rights: Vec<AccessRights>,
}

/// A shared access authorization rule.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationRule {
    /// Resource ID.
    pub id: Option<String>,
    /// Resource name.
    pub name: Option<String>,
    /// Resource type.
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    /// Geo-location of the namespace.
    pub location: Option<String>,
    /// Rule properties.
    pub properties: Option<AuthorizationRuleProperties>,
    /// Creation and modification metadata.
    pub system_data: Option<SystemData>,
}

/// Connection strings and keys of an authorization rule.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessKeys {
    /// Primary connection string.
    pub primary_connection_string: Option<String>,
    /// Secondary connection string.
    pub secondary_connection_string: Option<String>,
    /// Primary alias connection string, for geo-DR namespaces.
    pub alias_primary_connection_string: Option<String>,
    /// Secondary alias connection string, for geo-DR namespaces.
    pub alias_secondary_connection_string: Option<String>,
    /// Primary shared access key.
    pub primary_key: Option<String>,
    /// Secondary shared access key.
    pub secondary_key: Option<String>,
    /// Name of the rule.
    pub key_name: Option<String>,
}

impl std::fmt::Display for AccessKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccessKeys({})", self.key_name.as_deref().unwrap_or("-"))
    }
}

/// Which key to regenerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyType {
    PrimaryKey,
    SecondaryKey,
}

/// Body of a regenerate keys request.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateAccessKeyParameters {
    /// Which key to regenerate.
    pub key_type: KeyType,
    /// Optional key value to set instead of a random one.
    pub key: Option<String>,
}

impl RegenerateAccessKeyParameters {
    /// Regenerate the given key.
    pub fn new(key_type: KeyType) -> Self {
        Self {
            key_type,
            key: None,
        }
    }
}

/// SKU name of a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkuName {
    Basic,
    Standard,
    Premium,
    #[serde(other)]
    Unknown,
}

/// SKU tier of a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkuTier {
    Basic,
    Standard,
    Premium,
    #[serde(other)]
    Unknown,
}

/// Namespace SKU.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sku {
    /// SKU name.
    pub name: SkuName,
    /// SKU tier.
    pub tier: Option<SkuTier>,
    /// Throughput units.
    pub capacity: Option<i32>,
}

/// Properties of an Event Hubs namespace.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EHNamespaceProperties {
    /// Alternate name for geo-DR.
    pub alternate_name: Option<String>,
    /// Whether SAS authentication is disabled.
    pub disable_local_auth: Option<bool>,
    /// Whether auto-inflate is enabled.
    pub is_auto_inflate_enabled: Option<bool>,
    /// Whether Kafka is enabled.
    pub kafka_enabled: Option<bool>,
    /// Upper limit of throughput units when auto-inflate is enabled.
    pub maximum_throughput_units: Option<i32>,
    /// Minimum TLS version, e.g. `1.2`.
    pub minimum_tls_version: Option<String>,
    /// Public network access, `Enabled` or `Disabled`.
    pub public_network_access: Option<String>,
    /// Whether zone redundancy is enabled.
    pub zone_redundant: Option<bool>,
    /// Creation time, read-only.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time, read-only.
    pub updated_at: Option<DateTime<Utc>>,
    /// Metric ID, read-only.
    pub metric_id: Option<String>,
    /// Provisioning state, read-only.
    pub provisioning_state: Option<String>,
    /// Service Bus endpoint, read-only.
    pub service_bus_endpoint: Option<String>,
    /// Namespace status, read-only.
    pub status: Option<String>,
}

/// An Event Hubs namespace.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EHNamespace {
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
    /// Namespace SKU.
    pub sku: Option<Sku>,
    /// Namespace properties.
    pub properties: Option<EHNamespaceProperties>,
    /// Creation and modification metadata.
    pub system_data: Option<SystemData>,
}

/// Body of a name availability check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckNameAvailabilityParameter {
    /// Name to check.
    pub name: String,
}

/// Why a name is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnavailableReason {
    None,
    InvalidName,
    SubscriptionIsDisabled,
    NameInUse,
    NameInLockdown,
    TooManyNamespaceInCurrentSubscription,
    #[serde(other)]
    Unknown,
}

/// Result of a name availability check.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckNameAvailabilityResult {
    /// Whether the name is available.
    pub name_available: Option<bool>,
    /// Why the name is unavailable.
    pub reason: Option<UnavailableReason>,
    /// Detailed message.
    pub message: Option<String>,
}

/// A page of Event Hubs.
pub type EventhubListResult = ListResult<Eventhub>;

/// A page of authorization rules.
pub type AuthorizationRuleListResult = ListResult<AuthorizationRule>;

/// A page of namespaces.
pub type EHNamespaceListResult = ListResult<EHNamespace>;
