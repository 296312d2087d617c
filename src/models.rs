//! Models shared by every resource provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of identity that created or last modified a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreatedByType {
    /// A user.
    User,
    /// An application.
    Application,
    /// A managed identity.
    ManagedIdentity,
    /// A key.
    Key,
    /// A value this crate doesn't know about.
    #[serde(other)]
    Unknown,
}

/// Metadata about the creation and last modification of a resource.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemData {
    /// When the resource was created.
    pub created_at: Option<DateTime<Utc>>,
    /// The identity that created the resource.
    pub created_by: Option<String>,
    /// The kind of identity that created the resource.
    pub created_by_type: Option<CreatedByType>,
    /// When the resource was last modified.
    pub last_modified_at: Option<DateTime<Utc>>,
    /// The identity that last modified the resource.
    pub last_modified_by: Option<String>,
    /// The kind of identity that last modified the resource.
    pub last_modified_by_type: Option<CreatedByType>,
}

/// Additional information attached to an error.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorAdditionalInfo {
    /// The additional info type.
    #[serde(rename = "type")]
    pub info_type: Option<String>,
    /// The additional info.
    pub info: Option<serde_json::Value>,
}

/// The error detail of an ARM error response.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    /// The error code.
    pub code: Option<String>,
    /// The error message.
    pub message: Option<String>,
    /// The error target.
    pub target: Option<String>,
    /// Nested errors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ErrorDetail>,
    /// Additional info.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_info: Vec<ErrorAdditionalInfo>,
}

/// The standard ARM error envelope, `{"error": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// The error object.
    #[serde(default)]
    pub error: ErrorDetail,
}

impl ErrorResponse {
    /// Build an error envelope with a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: Some(code.into()),
                message: Some(message.into()),
                ..Default::default()
            },
        }
    }
}
