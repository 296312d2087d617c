//! Grafana, snapshot and generic resource client tests against wiremock.

use std::sync::Arc;

use armsdk::compute::{self, SnapshotStorageAccountTypes};
use armsdk::dashboard::{self, ManagedGrafanaUpdateParameters};
use armsdk::resources;
use armsdk::{ArmClient, ArmError, ClientOptions, StaticTokenCredential};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WORKSPACE: &str =
    "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Dashboard/grafana/ws";
const SITE: &str = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Web/sites/app";

fn client(server: &MockServer) -> ArmClient {
    ArmClient::new(
        Arc::new(StaticTokenCredential::new("test-token")),
        ClientOptions::with_endpoint(server.uri()),
    )
    .unwrap()
}

fn grafana(server: &MockServer) -> dashboard::GrafanaClient {
    dashboard::ClientFactory::with_client("sub", client(server)).new_grafana_client()
}

#[tokio::test]
async fn test_check_enterprise_details() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{WORKSPACE}/checkEnterpriseDetails")))
        .and(query_param("api-version", "2023-09-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "saasSubscriptionDetails": {"offerId": "grafana-enterprise", "planId": "monthly"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let details = grafana(&mock_server)
        .check_enterprise_details("rg", "ws")
        .await
        .unwrap();

    let saas = details.saas_subscription_details.unwrap();
    assert_eq!(saas.offer_id.as_deref(), Some("grafana-enterprise"));
}

#[tokio::test]
async fn test_fetch_available_plugins() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{WORKSPACE}/fetchAvailablePlugins")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [{"pluginId": "grafana-piechart-panel", "name": "Pie Chart"}]
        })))
        .mount(&mock_server)
        .await;

    let plugins = grafana(&mock_server)
        .fetch_available_plugins("rg", "ws")
        .await
        .unwrap();

    assert_eq!(plugins.value.len(), 1);
    assert_eq!(plugins.value[0].plugin_id.as_deref(), Some("grafana-piechart-panel"));
}

#[tokio::test]
async fn test_update_accepted_without_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(WORKSPACE))
        .and(body_json(serde_json::json!({"tags": {"team": "obs"}})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&mock_server)
        .await;

    let params = ManagedGrafanaUpdateParameters {
        tags: [("team".to_string(), "obs".to_string())].into(),
        ..Default::default()
    };
    let workspace = grafana(&mock_server)
        .update("rg", "ws", &params)
        .await
        .unwrap();

    assert_eq!(workspace, Default::default());
}

#[tokio::test]
async fn test_grafana_get_rejects_created() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let err = grafana(&mock_server).get("rg", "ws").await.unwrap_err();
    assert_eq!(err.status_code(), Some(201));
}

#[tokio::test]
async fn test_snapshot_list_pager() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions/sub/providers/Microsoft.Compute/snapshots"))
        .and(query_param("api-version", "2024-03-02"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [
                {"name": "a", "sku": {"name": "Standard_ZRS"}},
                {"name": "b", "sku": {"name": "Premium_LRS"}}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let snapshots = compute::ClientFactory::with_client("sub", client(&mock_server))
        .new_snapshots_client()
        .new_list_pager()
        .collect_all()
        .await
        .unwrap();

    assert_eq!(snapshots.len(), 2);
    let sku = snapshots[0].sku.as_ref().unwrap();
    assert_eq!(sku.name, Some(SnapshotStorageAccountTypes::StandardZrs));
}

#[tokio::test]
async fn test_pager_with_empty_subscription_fails_on_first_page() {
    let mock_server = MockServer::start().await;

    let mut pager = compute::ClientFactory::with_client("", client(&mock_server))
        .new_snapshots_client()
        .new_list_pager();

    assert!(pager.more());
    let err = pager.next_page().await.unwrap_err();
    assert!(matches!(err, ArmError::EmptyParameter("client.subscriptionID")));
}

#[tokio::test]
async fn test_get_by_id_keeps_id_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SITE))
        .and(query_param("api-version", "2022-03-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": SITE,
            "name": "app",
            "type": "Microsoft.Web/sites",
            "properties": {"state": "Running"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resource = resources::ClientFactory::with_client(client(&mock_server))
        .new_generic_resources_client()
        .get_by_id(SITE, "2022-03-01")
        .await
        .unwrap();

    assert_eq!(resource.name.as_deref(), Some("app"));
    assert_eq!(resource.properties.unwrap()["state"], "Running");
}

#[tokio::test]
async fn test_generic_resource_arguments_are_required() {
    let mock_server = MockServer::start().await;
    let generic = resources::ClientFactory::with_client(client(&mock_server)).new_generic_resources_client();

    let err = generic.get_by_id("", "2022-03-01").await.unwrap_err();
    assert!(matches!(err, ArmError::EmptyParameter("resourceId")));

    let err = generic.begin_delete_by_id(SITE, "", None).await.unwrap_err();
    assert!(matches!(err, ArmError::EmptyParameter("apiVersion")));
}
