//! Compute snapshot models.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pager::ListResult;

/// Storage type backing a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotStorageAccountTypes {
    #[serde(rename = "Standard_LRS")]
    StandardLrs,
    #[serde(rename = "Premium_LRS")]
    PremiumLrs,
    #[serde(rename = "Standard_ZRS")]
    StandardZrs,
    #[serde(other)]
    Unknown,
}

/// Snapshot SKU.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSku {
    /// Storage type.
    pub name: Option<SnapshotStorageAccountTypes>,
    /// SKU tier, read-only.
    pub tier: Option<String>,
}

/// How the snapshot's source data is obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiskCreateOption {
    Empty,
    Attach,
    FromImage,
    Import,
    Copy,
    Restore,
    Upload,
    CopyStart,
    ImportSecure,
    UploadPreparedSecure,
    CopyFromSanSnapshot,
    #[serde(other)]
    Unknown,
}

/// Source of a snapshot.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationData {
    /// How the source data is obtained.
    pub create_option: DiskCreateOption,
    /// Resource ID of the source disk or snapshot.
    pub source_resource_id: Option<String>,
    /// Source blob URI, used with `Import`.
    pub source_uri: Option<String>,
    /// Storage account holding `source_uri`.
    pub storage_account_id: Option<String>,
    /// Size in bytes of an upload, used with `Upload`.
    pub upload_size_bytes: Option<i64>,
    /// Unique ID of the source, read-only.
    pub source_unique_id: Option<String>,
}

impl CreationData {
    /// Copy from an existing disk or snapshot.
    pub fn copy_from(source_resource_id: impl Into<String>) -> Self {
        Self {
            create_option: DiskCreateOption::Copy,
            source_resource_id: Some(source_resource_id.into()),
            source_uri: None,
            storage_account_id: None,
            upload_size_bytes: None,
            source_unique_id: None,
        }
    }
}

/// State of a disk or snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiskState {
    Unattached,
    Attached,
    Reserved,
    Frozen,
    #[serde(rename = "ActiveSAS")]
    ActiveSas,
    #[serde(rename = "ActiveSASFrozen")]
    ActiveSasFrozen,
    ReadyToUpload,
    ActiveUpload,
    #[serde(other)]
    Unknown,
}

/// Operating system of the source disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatingSystemTypes {
    Windows,
    Linux,
    #[serde(other)]
    Unknown,
}

/// Properties of a snapshot.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotProperties {
    /// Source of the snapshot. Required on create.
    pub creation_data: Option<CreationData>,
    /// Size in GiB.
    #[serde(rename = "diskSizeGB")]
    pub disk_size_gb: Option<i32>,
    /// Whether the snapshot is incremental.
    pub incremental: Option<bool>,
    /// Operating system of the source disk.
    pub os_type: Option<OperatingSystemTypes>,
    /// Whether public network access is allowed.
    pub public_network_access: Option<String>,
    /// Size in bytes, read-only.
    pub disk_size_bytes: Option<i64>,
    /// Disk state, read-only.
    pub disk_state: Option<DiskState>,
    /// Provisioning state, read-only.
    pub provisioning_state: Option<String>,
    /// Creation time, read-only.
    pub time_created: Option<DateTime<Utc>>,
    /// Unique ID, read-only.
    pub unique_id: Option<String>,
}

/// A managed disk snapshot.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Resource ID.
    pub id: Option<String>,
    /// Resource name.
    pub name: Option<String>,
    /// Resource type.
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    /// Geo-location. Required on create.
    pub location: Option<String>,
    /// Resource tags.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
    /// Snapshot SKU.
    pub sku: Option<SnapshotSku>,
    /// Snapshot properties.
    pub properties: Option<SnapshotProperties>,
    /// Disk that owns the snapshot, read-only.
    pub managed_by: Option<String>,
}

/// Updatable properties of a snapshot.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotUpdateProperties {
    /// New size in GiB.
    #[serde(rename = "diskSizeGB")]
    pub disk_size_gb: Option<i32>,
    /// New operating system type.
    pub os_type: Option<OperatingSystemTypes>,
    /// Whether public network access is allowed.
    pub public_network_access: Option<String>,
}

/// Body of a snapshot update.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotUpdate {
    /// New SKU.
    pub sku: Option<SnapshotSku>,
    /// New tags.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
    /// New properties.
    pub properties: Option<SnapshotUpdateProperties>,
}

/// Access granted by a SAS URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessLevel {
    None,
    Read,
    Write,
    #[serde(other)]
    Unknown,
}

/// Request for a SAS URI to a snapshot.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantAccessData {
    /// Level of access.
    pub access: AccessLevel,
    /// Lifetime of the SAS in seconds.
    pub duration_in_seconds: i32,
    /// Whether to also return a SAS for the VM guest state.
    pub get_secure_vm_guest_state_sas: Option<bool>,
}

impl GrantAccessData {
    /// Request `access` for `duration_in_seconds`.
    pub fn new(access: AccessLevel, duration_in_seconds: i32) -> Self {
        Self {
            access,
            duration_in_seconds,
            get_secure_vm_guest_state_sas: None,
        }
    }
}

/// SAS URIs returned by a grant.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessUri {
    /// SAS for the snapshot data.
    #[serde(rename = "accessSAS")]
    pub access_sas: Option<String>,
    /// SAS for the VM guest state.
    #[serde(rename = "securityDataAccessSAS")]
    pub security_data_access_sas: Option<String>,
}

/// A page of snapshots.
pub type SnapshotList = ListResult<Snapshot>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_deserialize() {
        let json = r#"{
            "name": "snap",
            "location": "westus",
            "sku": {"name": "Standard_ZRS", "tier": "Standard"},
            "properties": {
                "creationData": {"createOption": "Copy", "sourceResourceId": "/subscriptions/s/disks/d"},
                "diskSizeGB": 32,
                "diskState": "ActiveSAS",
                "timeCreated": "2024-01-02T03:04:05Z"
            }
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(
            snapshot.sku.unwrap().name,
            Some(SnapshotStorageAccountTypes::StandardZrs)
        );
        let props = snapshot.properties.unwrap();
        assert_eq!(props.disk_size_gb, Some(32));
        assert_eq!(props.disk_state, Some(DiskState::ActiveSas));
        assert_eq!(props.creation_data.unwrap().create_option, DiskCreateOption::Copy);
        assert!(props.time_created.is_some());
    }

    #[test]
    fn test_grant_access_serialize() {
        let body = serde_json::to_value(GrantAccessData::new(AccessLevel::Read, 3600)).unwrap();
        assert_eq!(body, serde_json::json!({"access": "Read", "durationInSeconds": 3600}));
    }

    #[test]
    fn test_access_uri_field_names() {
        let uri: AccessUri = serde_json::from_str(r#"{"accessSAS":"https://blob/sas"}"#).unwrap();
        assert_eq!(uri.access_sas.as_deref(), Some("https://blob/sas"));
        assert!(uri.security_data_access_sas.is_none());
    }
}
