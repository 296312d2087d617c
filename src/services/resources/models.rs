//! Generic resource models.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// SKU of an arbitrary resource.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericSku {
    /// SKU name.
    pub name: Option<String>,
    /// SKU tier.
    pub tier: Option<String>,
    /// SKU size.
    pub size: Option<String>,
    /// SKU family.
    pub family: Option<String>,
    /// SKU capacity.
    pub capacity: Option<i32>,
}

/// Any ARM resource, with its provider-specific properties left untyped.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericResource {
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
    /// Kind of resource.
    pub kind: Option<String>,
    /// Resource that manages this one.
    pub managed_by: Option<String>,
    /// Resource SKU.
    pub sku: Option<GenericSku>,
    /// Managed identity, as returned by the provider.
    pub identity: Option<serde_json::Value>,
    /// Marketplace plan, as returned by the provider.
    pub plan: Option<serde_json::Value>,
    /// Provider-specific properties.
    pub properties: Option<serde_json::Value>,
}
