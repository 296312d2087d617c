//! CLI argument parsing tests.

use armsdk::cli::{required, Cli, Command, Kind};
use armsdk::ArmError;
use clap::Parser;

const ID: &str = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Web/sites/app";

#[test]
fn test_cli_parses_get_subcommand() {
    let cli = Cli::parse_from(["armctl", "get", ID, "--api-version", "2022-03-01"]);

    assert!(!cli.json);
    assert!(!cli.verbose);
    match cli.command {
        Command::Get {
            resource_id,
            api_version,
        } => {
            assert_eq!(resource_id.to_string(), ID);
            assert_eq!(resource_id.name(), "app");
            assert_eq!(api_version, "2022-03-01");
        }
        _ => panic!("Expected Get command"),
    }
}

#[test]
fn test_get_requires_api_version() {
    let result = Cli::try_parse_from(["armctl", "get", ID]);
    assert!(result.is_err());
}

#[test]
fn test_invalid_resource_id_is_rejected() {
    for bad in ["sites/app", "/subscriptions", "/subscriptions/sub/providers/Microsoft.Web"] {
        let result = Cli::try_parse_from(["armctl", "get", bad, "--api-version", "1"]);
        assert!(result.is_err(), "accepted {bad}");

        let result = Cli::try_parse_from(["armctl", "delete", bad, "--api-version", "1"]);
        assert!(result.is_err(), "accepted {bad}");
    }
}

#[test]
fn test_cli_parses_delete_subcommand() {
    let cli = Cli::parse_from(["armctl", "delete", ID, "--api-version", "1", "--wait"]);

    match cli.command {
        Command::Delete {
            resource_id, wait, ..
        } => {
            assert_eq!(resource_id.to_string(), ID);
            assert!(wait);
        }
        _ => panic!("Expected Delete command"),
    }
}

#[test]
fn test_delete_does_not_wait_by_default() {
    let cli = Cli::parse_from(["armctl", "delete", ID, "--api-version", "1"]);
    assert!(matches!(cli.command, Command::Delete { wait: false, .. }));
}

#[test]
fn test_cli_parses_list_subcommand() {
    let cli = Cli::parse_from([
        "armctl",
        "list",
        "eventhubs",
        "--resource-group",
        "rg",
        "--namespace",
        "ns",
    ]);

    match cli.command {
        Command::List {
            kind,
            resource_group,
            namespace,
        } => {
            assert_eq!(kind, Kind::Eventhubs);
            assert_eq!(resource_group.as_deref(), Some("rg"));
            assert_eq!(namespace.as_deref(), Some("ns"));
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_list_kinds() {
    for (arg, expected) in [
        ("eventhub-namespaces", Kind::EventhubNamespaces),
        ("namespaces", Kind::EventhubNamespaces),
        ("grafana", Kind::Grafana),
        ("snapshots", Kind::Snapshots),
    ] {
        let cli = Cli::parse_from(["armctl", "list", arg]);
        match cli.command {
            Command::List { kind, .. } => assert_eq!(kind, expected, "kind for {arg}"),
            _ => panic!("Expected List command"),
        }
    }
}

#[test]
fn test_unknown_kind_is_rejected() {
    let result = Cli::try_parse_from(["armctl", "list", "virtual-machines"]);
    assert!(result.is_err());
}

#[test]
fn test_global_flags() {
    // --json before subcommand
    let cli = Cli::parse_from(["armctl", "--json", "list", "grafana"]);
    assert!(cli.json);

    // flags after subcommand (global)
    let cli = Cli::parse_from(["armctl", "list", "grafana", "--json", "-v"]);
    assert!(cli.json);
    assert!(cli.verbose);
}

#[test]
fn test_required_names_missing_argument() {
    assert_eq!(required(Some("rg"), "resourceGroupName").unwrap(), "rg");

    let err = required(None, "resourceGroupName").unwrap_err();
    assert!(matches!(err, ArmError::EmptyParameter("resourceGroupName")));

    let err = required(Some(""), "namespaceName").unwrap_err();
    assert!(matches!(err, ArmError::EmptyParameter("namespaceName")));
}

#[test]
fn test_list_eventhubs_without_resource_group() {
    let cli = Cli::parse_from(["armctl", "list", "eventhubs", "--namespace", "ns"]);
    let Command::List {
        resource_group,
        namespace,
        ..
    } = cli.command
    else {
        panic!("Expected List command");
    };

    let err = required(resource_group.as_deref(), "resourceGroupName").unwrap_err();
    assert!(matches!(err, ArmError::EmptyParameter("resourceGroupName")));
    assert_eq!(required(namespace.as_deref(), "namespaceName").unwrap(), "ns");
}
