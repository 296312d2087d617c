//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the armctl binary.

use clap::{Parser, Subcommand, ValueEnum};

use crate::error::{ArmError, Result};
use crate::resource_id::ResourceId;

/// Azure Resource Manager command-line interface.
#[derive(Parser, Debug)]
#[command(name = "armctl", about = "Azure Resource Manager CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Log requests and polling to stderr.
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get any resource by its ID.
    Get {
        /// Full resource ID, starting with `/subscriptions/`.
        resource_id: ResourceId,

        /// API version of the resource's provider.
        #[arg(long)]
        api_version: String,
    },

    /// Delete any resource by its ID.
    Delete {
        /// Full resource ID, starting with `/subscriptions/`.
        resource_id: ResourceId,

        /// API version of the resource's provider.
        #[arg(long)]
        api_version: String,

        /// Wait for the deletion to finish instead of printing a resume token.
        #[arg(long)]
        wait: bool,
    },

    /// List resources of one kind.
    List {
        /// The kind of resource to list.
        kind: Kind,

        /// Only list resources in this resource group.
        #[arg(long)]
        resource_group: Option<String>,

        /// Event Hubs namespace (required for eventhubs).
        #[arg(long)]
        namespace: Option<String>,
    },
}

/// Resource kinds that can be listed.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    /// Event Hubs namespaces.
    #[value(alias = "namespaces")]
    EventhubNamespaces,
    /// Event Hubs within a namespace.
    #[value(alias = "hubs")]
    Eventhubs,
    /// Managed Grafana workspaces.
    #[value(alias = "workspaces")]
    Grafana,
    /// Managed disk snapshots.
    Snapshots,
}

/// Unwrap an optional argument, reporting `name` when it is missing or empty.
///
/// # Errors
///
/// Returns [`ArmError::EmptyParameter`] naming the missing argument.
pub fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ArmError::EmptyParameter(name))
}
