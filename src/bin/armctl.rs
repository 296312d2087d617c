//! Azure Resource Manager CLI binary.
//!
//! A command-line interface for reading, listing and deleting ARM resources.

use std::process::ExitCode;
use std::sync::Arc;

use armsdk::cli::{required, Cli, Command, Kind};
use armsdk::output::PrettyPrint;
use armsdk::{compute, dashboard, eventhub, resources, ArmClient, EnvConfig, StaticTokenCredential};
use clap::Parser;
use serde::Serialize;
use tabled::{Table, Tabled};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = match EnvConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set AZURE_SUBSCRIPTION_ID and AZURE_ACCESS_TOKEN environment variables");
            return ExitCode::FAILURE;
        }
    };

    match run(config, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: EnvConfig, cli: Cli) -> armsdk::Result<()> {
    let credential = Arc::new(StaticTokenCredential::new(config.access_token));
    let client = ArmClient::new(credential, config.options)?;
    let subscription_id = config.subscription_id;

    match cli.command {
        Command::Get {
            resource_id,
            api_version,
        } => {
            let resource = resources::ClientFactory::with_client(client)
                .new_generic_resources_client()
                .get_by_id(&resource_id.to_string(), &api_version)
                .await?;
            output_single(&resource, cli.json)
        }
        Command::Delete {
            resource_id,
            api_version,
            wait,
        } => handle_delete(client, &resource_id.to_string(), &api_version, wait).await,
        Command::List {
            kind,
            resource_group,
            namespace,
        } => {
            handle_list(
                client,
                subscription_id,
                kind,
                resource_group.as_deref(),
                namespace.as_deref(),
                cli.json,
            )
            .await
        }
    }
}

async fn handle_delete(client: ArmClient, resource_id: &str, api_version: &str, wait: bool) -> armsdk::Result<()> {
    let mut poller = resources::ClientFactory::with_client(client)
        .new_generic_resources_client()
        .begin_delete_by_id(resource_id, api_version, None)
        .await?;

    if wait {
        poller.poll_until_done(None).await?;
        println!("Deleted {resource_id}");
    } else if poller.done() {
        println!("Deleted {resource_id}");
    } else {
        println!("Deletion started (status: {})", poller.status());
        println!("Resume token: {}", poller.resume_token()?);
    }
    Ok(())
}

async fn handle_list(
    client: ArmClient,
    subscription_id: String,
    kind: Kind,
    resource_group: Option<&str>,
    namespace: Option<&str>,
    json: bool,
) -> armsdk::Result<()> {
    match kind {
        Kind::EventhubNamespaces => {
            let namespaces = eventhub::ClientFactory::with_client(subscription_id, client).new_namespaces_client();
            let pager = match resource_group {
                Some(rg) => namespaces.new_list_by_resource_group_pager(rg),
                None => namespaces.new_list_pager(),
            };
            output_list(&pager.collect_all().await?, json, NamespaceRow::from)
        }
        Kind::Eventhubs => {
            let scope = required(resource_group, "resourceGroupName")
                .and_then(|rg| Ok((rg, required(namespace, "namespaceName")?)));
            let (rg, ns) = match scope {
                Ok(scope) => scope,
                Err(e) => {
                    eprintln!("Hint: Use 'armctl list eventhubs --resource-group <rg> --namespace <ns>'");
                    return Err(e);
                }
            };
            let hubs = eventhub::ClientFactory::with_client(subscription_id, client)
                .new_event_hubs_client()
                .new_list_by_namespace_pager(rg, ns, None)
                .collect_all()
                .await?;
            output_list(&hubs, json, EventhubRow::from)
        }
        Kind::Grafana => {
            let grafana = dashboard::ClientFactory::with_client(subscription_id, client).new_grafana_client();
            let pager = match resource_group {
                Some(rg) => grafana.new_list_by_resource_group_pager(rg),
                None => grafana.new_list_pager(),
            };
            output_list(&pager.collect_all().await?, json, GrafanaRow::from)
        }
        Kind::Snapshots => {
            let snapshots = compute::ClientFactory::with_client(subscription_id, client).new_snapshots_client();
            let pager = match resource_group {
                Some(rg) => snapshots.new_list_by_resource_group_pager(rg),
                None => snapshots.new_list_pager(),
            };
            output_list(&pager.collect_all().await?, json, SnapshotRow::from)
        }
    }
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> armsdk::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_list<'a, T, R, F>(items: &'a [T], json: bool, to_row: F) -> armsdk::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&'a T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} total", items.len());
    }
    Ok(())
}

// Table row types for non-JSON output

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

#[derive(Tabled)]
struct NamespaceRow {
    name: String,
    location: String,
    sku: String,
    status: String,
}

impl From<&eventhub::EHNamespace> for NamespaceRow {
    fn from(n: &eventhub::EHNamespace) -> Self {
        Self {
            name: text(n.name.as_deref()),
            location: text(n.location.as_deref()),
            sku: n
                .sku
                .as_ref()
                .map(|s| format!("{:?}", s.name))
                .unwrap_or_default(),
            status: text(n.properties.as_ref().and_then(|p| p.status.as_deref())),
        }
    }
}

#[derive(Tabled)]
struct EventhubRow {
    name: String,
    partitions: String,
    status: String,
}

impl From<&eventhub::Eventhub> for EventhubRow {
    fn from(h: &eventhub::Eventhub) -> Self {
        let props = h.properties.as_ref();
        Self {
            name: text(h.name.as_deref()),
            partitions: props
                .and_then(|p| p.partition_count)
                .map(|c| c.to_string())
                .unwrap_or_default(),
            status: props
                .and_then(|p| p.status.as_ref())
                .map(|s| format!("{s:?}"))
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct GrafanaRow {
    name: String,
    location: String,
    endpoint: String,
}

impl From<&dashboard::ManagedGrafana> for GrafanaRow {
    fn from(g: &dashboard::ManagedGrafana) -> Self {
        Self {
            name: text(g.name.as_deref()),
            location: text(g.location.as_deref()),
            endpoint: text(g.properties.as_ref().and_then(|p| p.endpoint.as_deref())),
        }
    }
}

#[derive(Tabled)]
struct SnapshotRow {
    name: String,
    location: String,
    #[tabled(rename = "size (GB)")]
    size_gb: String,
    state: String,
}

impl From<&compute::Snapshot> for SnapshotRow {
    fn from(s: &compute::Snapshot) -> Self {
        let props = s.properties.as_ref();
        Self {
            name: text(s.name.as_deref()),
            location: text(s.location.as_deref()),
            size_gb: props
                .and_then(|p| p.disk_size_gb)
                .map(|gb| gb.to_string())
                .unwrap_or_default(),
            state: props
                .and_then(|p| p.disk_state.as_ref())
                .map(|d| format!("{d:?}"))
                .unwrap_or_default(),
        }
    }
}
