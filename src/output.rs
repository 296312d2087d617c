//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::compute::Snapshot;
use crate::dashboard::ManagedGrafana;
use crate::eventhub::{EHNamespace, Eventhub};
use crate::resources::GenericResource;

/// Trait for human-readable key-value output.
///
/// Implemented by resource types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Header line plus divider shared by every resource.
fn header(kind: &str, name: Option<&str>) -> Vec<String> {
    let header = format!("{kind}: {}", name.unwrap_or("<unnamed>"));
    let divider = "─".repeat(header.len().max(30));
    vec![header, divider]
}

fn push_opt(lines: &mut Vec<String>, label: &str, value: Option<impl std::fmt::Display>) {
    if let Some(value) = value {
        lines.push(format!("{:<16}{}", format!("{label}:"), value));
    }
}

impl PrettyPrint for GenericResource {
    fn pretty_print(&self) -> String {
        let mut lines = header("Resource", self.name.as_deref());

        push_opt(&mut lines, "ID", self.id.as_deref());
        push_opt(&mut lines, "Type", self.resource_type.as_deref());
        push_opt(&mut lines, "Location", self.location.as_deref());
        push_opt(&mut lines, "Kind", self.kind.as_deref());
        push_opt(&mut lines, "Managed By", self.managed_by.as_deref());

        if let Some(ref sku) = self.sku {
            push_opt(&mut lines, "SKU", sku.name.as_deref());
        }

        if !self.tags.is_empty() {
            let mut tags: Vec<_> = self.tags.iter().map(|(k, v)| format!("{k}={v}")).collect();
            tags.sort();
            lines.push(format!("Tags:           {}", tags.join(", ")));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for EHNamespace {
    fn pretty_print(&self) -> String {
        let mut lines = header("Namespace", self.name.as_deref());

        push_opt(&mut lines, "Location", self.location.as_deref());

        if let Some(ref sku) = self.sku {
            lines.push(format!("SKU:            {:?}", sku.name));
        }

        if let Some(ref props) = self.properties {
            push_opt(&mut lines, "Status", props.status.as_deref());
            push_opt(&mut lines, "Provisioning", props.provisioning_state.as_deref());
            push_opt(&mut lines, "Endpoint", props.service_bus_endpoint.as_deref());
            push_opt(&mut lines, "Created", props.created_at.map(|t| t.format(TIME_FORMAT)));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Eventhub {
    fn pretty_print(&self) -> String {
        let mut lines = header("Event Hub", self.name.as_deref());

        if let Some(ref props) = self.properties {
            push_opt(&mut lines, "Partitions", props.partition_count);
            push_opt(&mut lines, "Retention", props.message_retention_in_days.map(|d| format!("{d} days")));
            if let Some(ref status) = props.status {
                lines.push(format!("Status:         {status:?}"));
            }
            push_opt(&mut lines, "Created", props.created_at.map(|t| t.format(TIME_FORMAT)));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for ManagedGrafana {
    fn pretty_print(&self) -> String {
        let mut lines = header("Grafana", self.name.as_deref());

        push_opt(&mut lines, "Location", self.location.as_deref());

        if let Some(ref sku) = self.sku {
            lines.push(format!("SKU:            {}", sku.name));
        }

        if let Some(ref props) = self.properties {
            push_opt(&mut lines, "Endpoint", props.endpoint.as_deref());
            push_opt(&mut lines, "Version", props.grafana_version.as_deref());
            if let Some(ref state) = props.provisioning_state {
                lines.push(format!("Provisioning:   {state:?}"));
            }
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Snapshot {
    fn pretty_print(&self) -> String {
        let mut lines = header("Snapshot", self.name.as_deref());

        push_opt(&mut lines, "Location", self.location.as_deref());

        if let Some(ref props) = self.properties {
            push_opt(&mut lines, "Size", props.disk_size_gb.map(|gb| format!("{gb} GB")));
            if let Some(ref state) = props.disk_state {
                lines.push(format!("State:          {state:?}"));
            }
            if props.incremental == Some(true) {
                lines.push("Incremental:    yes".to_string());
            }
            push_opt(&mut lines, "Created", props.time_created.map(|t| t.format(TIME_FORMAT)));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_resource_pretty_print_format() {
        let resource: GenericResource = serde_json::from_value(serde_json::json!({
            "id": "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Web/sites/app",
            "name": "app",
            "type": "Microsoft.Web/sites",
            "tags": {"env": "prod", "app": "web"}
        }))
        .unwrap();

        let output = resource.pretty_print();
        assert!(output.starts_with("Resource: app"));
        assert!(output.contains("Type:           Microsoft.Web/sites"));
        assert!(output.contains("Tags:           app=web, env=prod"));
    }

    #[test]
    fn test_unnamed_resource() {
        let output = Snapshot::default().pretty_print();
        assert!(output.starts_with("Snapshot: <unnamed>"));
    }
}
