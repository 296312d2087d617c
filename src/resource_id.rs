//! Azure resource ID parsing.

use std::fmt;
use std::str::FromStr;

use crate::error::{ArmError, Result};

const SUBSCRIPTIONS: &str = "subscriptions";
const RESOURCE_GROUPS: &str = "resourceGroups";
const PROVIDERS: &str = "providers";

/// A parsed ARM resource ID.
///
/// Accepts subscription, resource group and provider resource IDs, including
/// nested child resources:
///
/// ```
/// use armsdk::ResourceId;
///
/// let id: ResourceId = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.EventHub/namespaces/ns/eventhubs/hub"
///     .parse()
///     .unwrap();
/// assert_eq!(id.subscription_id(), "sub");
/// assert_eq!(id.resource_group_name(), Some("rg"));
/// assert_eq!(id.resource_type(), "Microsoft.EventHub/namespaces/eventhubs");
/// assert_eq!(id.name(), "hub");
/// assert_eq!(id.parent().unwrap().name(), "ns");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId {
    subscription_id: String,
    resource_group: Option<String>,
    provider: Option<String>,
    types: Vec<(String, String)>,
}

impl ResourceId {
    /// Parse a resource ID.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::InvalidResourceId`] if the ID is malformed.
    pub fn parse(id: &str) -> Result<Self> {
        let invalid = || ArmError::InvalidResourceId(id.to_string());

        let trimmed = id.trim().trim_end_matches('/');
        let rest = trimmed.strip_prefix('/').ok_or_else(invalid)?;
        let segments: Vec<&str> = rest.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(invalid());
        }

        let mut iter = segments.into_iter();
        match (iter.next(), iter.next()) {
            (Some(key), Some(sub)) if key.eq_ignore_ascii_case(SUBSCRIPTIONS) => {
                let mut parsed = Self {
                    subscription_id: sub.to_string(),
                    resource_group: None,
                    provider: None,
                    types: Vec::new(),
                };

                let mut remaining: Vec<&str> = iter.collect();
                if remaining.len() >= 2 && remaining[0].eq_ignore_ascii_case(RESOURCE_GROUPS) {
                    parsed.resource_group = Some(remaining[1].to_string());
                    remaining.drain(..2);
                }
                if remaining.is_empty() {
                    return Ok(parsed);
                }
                if remaining.len() < 4 || !remaining[0].eq_ignore_ascii_case(PROVIDERS) {
                    return Err(invalid());
                }
                parsed.provider = Some(remaining[1].to_string());

                let pairs = &remaining[2..];
                if pairs.len() % 2 != 0 {
                    return Err(invalid());
                }
                parsed.types = pairs
                    .chunks(2)
                    .map(|pair| (pair[0].to_string(), pair[1].to_string()))
                    .collect();
                Ok(parsed)
            }
            _ => Err(invalid()),
        }
    }

    /// The subscription ID.
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// The resource group name, if the resource lives in one.
    pub fn resource_group_name(&self) -> Option<&str> {
        self.resource_group.as_deref()
    }

    /// The resource provider namespace, e.g. `Microsoft.Compute`.
    pub fn provider_namespace(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// The full resource type, e.g. `Microsoft.EventHub/namespaces/eventhubs`.
    pub fn resource_type(&self) -> String {
        match &self.provider {
            Some(provider) => {
                let mut ty = provider.clone();
                for (segment, _) in &self.types {
                    ty.push('/');
                    ty.push_str(segment);
                }
                ty
            }
            None if self.resource_group.is_some() => "Microsoft.Resources/resourceGroups".to_string(),
            None => "Microsoft.Resources/subscriptions".to_string(),
        }
    }

    /// The resource name.
    pub fn name(&self) -> &str {
        self.types
            .last()
            .map(|(_, name)| name.as_str())
            .or(self.resource_group.as_deref())
            .unwrap_or(&self.subscription_id)
    }

    /// The ID of the enclosing resource.
    ///
    /// A top-level resource's parent is its resource group, a resource
    /// group's parent is its subscription, and a subscription has none.
    pub fn parent(&self) -> Option<ResourceId> {
        let mut parent = self.clone();
        if parent.types.len() > 1 {
            parent.types.pop();
        } else if !parent.types.is_empty() {
            parent.types.clear();
            parent.provider = None;
        } else if parent.resource_group.is_some() {
            parent.resource_group = None;
        } else {
            return None;
        }
        Some(parent)
    }
}

impl FromStr for ResourceId {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{SUBSCRIPTIONS}/{}", self.subscription_id)?;
        if let Some(rg) = &self.resource_group {
            write!(f, "/{RESOURCE_GROUPS}/{rg}")?;
        }
        if let Some(provider) = &self.provider {
            write!(f, "/{PROVIDERS}/{provider}")?;
            for (ty, name) in &self.types {
                write!(f, "/{ty}/{name}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_top_level_resource() {
        let id = ResourceId::parse(
            "/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.Compute/snapshots/snap",
        )
        .unwrap();
        assert_eq!(id.subscription_id(), "sub-1");
        assert_eq!(id.resource_group_name(), Some("rg-1"));
        assert_eq!(id.provider_namespace(), Some("Microsoft.Compute"));
        assert_eq!(id.resource_type(), "Microsoft.Compute/snapshots");
        assert_eq!(id.name(), "snap");

        let parent = id.parent().unwrap();
        assert_eq!(parent.to_string(), "/subscriptions/sub-1/resourceGroups/rg-1");
        assert_eq!(parent.resource_type(), "Microsoft.Resources/resourceGroups");
        assert_eq!(parent.parent().unwrap().name(), "sub-1");
        assert!(parent.parent().unwrap().parent().is_none());
    }

    #[test]
    fn test_parse_is_case_insensitive_on_keywords() {
        let id: ResourceId = "/SUBSCRIPTIONS/sub/RESOURCEGROUPS/rg/PROVIDERS/Microsoft.Dashboard/grafana/g1/"
            .parse()
            .unwrap();
        assert_eq!(id.name(), "g1");
        assert_eq!(
            id.to_string(),
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Dashboard/grafana/g1"
        );
    }

    #[test]
    fn test_parse_rejects_malformed_ids() {
        for bad in [
            "",
            "subscriptions/sub",
            "/subscriptions",
            "/resourceGroups/rg",
            "/subscriptions/sub//resourceGroups/rg",
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Compute",
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Compute/snapshots",
            "/subscriptions/sub/resourceGroups/rg/something/else",
        ] {
            assert!(
                matches!(ResourceId::parse(bad), Err(ArmError::InvalidResourceId(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
