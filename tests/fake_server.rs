//! End-to-end tests: real clients against the in-process fake servers.

#![cfg(feature = "fake")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use armsdk::compute::{self, AccessLevel, AccessUri, GrantAccessData};
use armsdk::dashboard;
use armsdk::eventhub::{self, EHNamespace, Eventhub, EventhubListResult};
use armsdk::fake::compute::SnapshotsServer;
use armsdk::fake::dashboard::GrafanaServer;
use armsdk::fake::eventhub::{EventHubsServer, NamespacesServer, ServerFactory};
use armsdk::fake::resources::GenericResourcesServer;
use armsdk::fake::{ErrorResponder, FakeServer, PagerResponder, PollerResponder, Responder};
use armsdk::resources::{self, GenericResource};
use armsdk::{ArmError, FakeCredential, ListResult, PollUntilDoneOptions};

fn fast() -> PollUntilDoneOptions {
    PollUntilDoneOptions::with_frequency(Duration::from_millis(5))
}

fn hub(name: &str) -> Eventhub {
    Eventhub {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

fn snapshot(name: &str) -> compute::Snapshot {
    compute::Snapshot {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

async fn eventhub_factory(server: &FakeServer) -> eventhub::ClientFactory {
    eventhub::ClientFactory::new("sub", Arc::new(FakeCredential), server.client_options()).unwrap()
}

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = FakeServer::start(EventHubsServer::default()).await.unwrap();
    let server2 = FakeServer::start(EventHubsServer::default()).await.unwrap();

    assert_ne!(server1.url(), server2.url());
    assert!(server1.url().starts_with("http://127.0.0.1:"));

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = FakeServer::start(EventHubsServer::default()).await.unwrap();
    let factory = eventhub_factory(&server).await;

    server.shutdown().await;

    let err = factory
        .new_event_hubs_client()
        .get("rg", "ns", "hub")
        .await
        .unwrap_err();
    assert!(matches!(err, ArmError::Http(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_shutdown_cancels_in_flight_callback() {
    let fake = EventHubsServer::default().with_get(|_, _, name| {
        std::thread::sleep(Duration::from_millis(800));
        Ok(Responder::new(200, hub(name)))
    });
    let server = FakeServer::start(fake).await.unwrap();
    let hubs = eventhub_factory(&server).await.new_event_hubs_client();

    let request = tokio::spawn(async move { hubs.get("rg", "ns", "slow").await });
    tokio::time::sleep(Duration::from_millis(200)).await;
    server.shutdown().await;

    let err = request.await.unwrap().unwrap_err();
    assert_eq!(err.status_code(), Some(503));
    assert_eq!(err.error_code(), Some("FakeServerShutdown"));
}

#[tokio::test]
async fn test_blocking_callback_does_not_stall_runtime() {
    let fake = EventHubsServer::default().with_get(|_, _, name| {
        std::thread::sleep(Duration::from_millis(300));
        Ok(Responder::new(200, hub(name)))
    });
    let server = FakeServer::start(fake).await.unwrap();
    let hubs = eventhub_factory(&server).await.new_event_hubs_client();

    let request = tokio::spawn(async move { hubs.get("rg", "ns", "slow").await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    server.shutdown().await;

    let err = request.await.unwrap().unwrap_err();
    assert_eq!(err.error_code(), Some("FakeServerShutdown"));
}

// =============================================================================
// Single Response Tests
// =============================================================================

#[tokio::test]
async fn test_get_through_fake() {
    let fake = EventHubsServer::default().with_get(|rg, ns, name| {
        assert_eq!((rg, ns), ("rg", "ns"));
        Ok(Responder::new(200, hub(name)))
    });
    let server = FakeServer::start(fake).await.unwrap();

    let hub = eventhub_factory(&server)
        .await
        .new_event_hubs_client()
        .get("rg", "ns", "orders")
        .await
        .unwrap();
    assert_eq!(hub.name.as_deref(), Some("orders"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_request_body_reaches_callback() {
    let fake = EventHubsServer::default().with_create_or_update(|_, _, name, mut body| {
        body.name = Some(name.to_string());
        Ok(Responder::new(200, body))
    });
    let server = FakeServer::start(fake).await.unwrap();

    let mut params = hub("ignored");
    params.location = Some("westus".to_string());
    let created = eventhub_factory(&server)
        .await
        .new_event_hubs_client()
        .create_or_update("rg", "ns", "orders", &params)
        .await
        .unwrap();

    assert_eq!(created.name.as_deref(), Some("orders"));
    assert_eq!(created.location.as_deref(), Some("westus"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_not_implemented() {
    let server = FakeServer::start(EventHubsServer::default()).await.unwrap();

    let err = eventhub_factory(&server)
        .await
        .new_event_hubs_client()
        .list_keys("rg", "ns", "hub", "rule")
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(501));
    assert_eq!(err.error_code(), Some("FakeNotImplemented"));
    let ArmError::Response(response) = err else {
        panic!("expected a response error");
    };
    assert_eq!(
        response.message().as_deref(),
        Some("fake for method EventHubsClient::list_keys not implemented")
    );

    server.shutdown().await;
}

#[tokio::test]
async fn test_error_responder() {
    let fake = EventHubsServer::default().with_get(|_, _, _| {
        Err(ErrorResponder::new(404, "EntityNotFound").with_message("no such hub"))
    });
    let server = FakeServer::start(fake).await.unwrap();

    let err = eventhub_factory(&server)
        .await
        .new_event_hubs_client()
        .get("rg", "ns", "hub")
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert_eq!(err.error_code(), Some("EntityNotFound"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_unexpected_status() {
    let fake = EventHubsServer::default().with_get(|_, _, name| Ok(Responder::new(202, hub(name))));
    let server = FakeServer::start(fake).await.unwrap();

    let err = eventhub_factory(&server)
        .await
        .new_event_hubs_client()
        .get("rg", "ns", "hub")
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    let ArmError::Response(response) = err else {
        panic!("expected a response error");
    };
    assert_eq!(
        response.message().as_deref(),
        Some("unexpected status code 202. acceptable values are 200")
    );

    server.shutdown().await;
}

#[tokio::test]
async fn test_responder_headers() {
    let fake = GrafanaServer::default().with_get(|_, name| {
        Ok(Responder::new(200, dashboard::ManagedGrafana {
            name: Some(name.to_string()),
            ..Default::default()
        })
        .with_header("x-ms-request-id", "req-1"))
    });
    let server = FakeServer::start(fake).await.unwrap();

    let workspace = dashboard::ClientFactory::new("sub", Arc::new(FakeCredential), server.client_options())
        .unwrap()
        .new_grafana_client()
        .get("rg", "ws")
        .await
        .unwrap();
    assert_eq!(workspace.name.as_deref(), Some("ws"));

    server.shutdown().await;
}

// =============================================================================
// Pager Tests
// =============================================================================

#[tokio::test]
async fn test_pager_sequencing() {
    let fake = EventHubsServer::default().with_list_by_namespace(|_, _, options| {
        assert_eq!(options.top, Some(2));
        let mut pager = PagerResponder::new();
        pager
            .add_page(200, EventhubListResult::new(vec![hub("a"), hub("b")], None))
            .add_page(200, EventhubListResult::new(vec![hub("c")], None));
        pager
    });
    let server = FakeServer::start(fake).await.unwrap();

    let options = eventhub::EventHubsListByNamespaceOptions {
        top: Some(2),
        ..Default::default()
    };
    let mut pager = eventhub_factory(&server)
        .await
        .new_event_hubs_client()
        .new_list_by_namespace_pager("rg", "ns", Some(&options));

    let first = pager.next_page().await.unwrap();
    assert_eq!(first.value.len(), 2);
    let link = first.next_link.unwrap();
    assert!(link.starts_with(server.url()));
    assert!(link.contains("%24skipToken=fake-page-1"));
    assert!(link.contains("%24top=2"));

    let second = pager.next_page().await.unwrap();
    assert_eq!(second.value[0].name.as_deref(), Some("c"));
    assert!(second.next_link.is_none());
    assert!(!pager.more());

    server.shutdown().await;
}

#[tokio::test]
async fn test_pager_restarts_after_exhaustion() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let fake = NamespacesServer::default().with_list(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        let mut pager = PagerResponder::new();
        pager.add_page(200, ListResult::new(vec![EHNamespace::default()], None));
        pager
    });
    let server = FakeServer::start(fake).await.unwrap();
    let namespaces = eventhub_factory(&server).await.new_namespaces_client();

    assert_eq!(namespaces.new_list_pager().collect_all().await.unwrap().len(), 1);
    assert_eq!(namespaces.new_list_pager().collect_all().await.unwrap().len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    server.shutdown().await;
}

#[tokio::test]
async fn test_pager_error_entry() {
    let fake = SnapshotsServer::default().with_list_by_resource_group(|_| {
        let mut pager = PagerResponder::new();
        pager
            .add_page(200, ListResult::new(vec![compute::Snapshot::default()], None))
            .add_error(ErrorResponder::new(503, "ServiceUnavailable"))
            .add_page(200, ListResult::new(vec![snapshot("last")], None));
        pager
    });
    let server = FakeServer::start(fake).await.unwrap();

    let mut pager = compute::ClientFactory::new("sub", Arc::new(FakeCredential), server.client_options())
        .unwrap()
        .new_snapshots_client()
        .new_list_by_resource_group_pager("rg");

    pager.next_page().await.unwrap();
    let err = pager.next_page().await.unwrap_err();
    assert_eq!(err.status_code(), Some(503));
    assert_eq!(err.error_code(), Some("ServiceUnavailable"));

    // a failed page can be retried
    assert!(pager.more());
    let last = pager.next_page().await.unwrap();
    assert_eq!(last.value[0].name.as_deref(), Some("last"));
    assert!(!pager.more());

    server.shutdown().await;
}

#[tokio::test]
async fn test_pager_unexpected_status() {
    let fake = NamespacesServer::default().with_list_by_resource_group(|_| {
        let mut pager = PagerResponder::new();
        pager.add_page(206, ListResult::<EHNamespace>::default());
        pager
    });
    let server = FakeServer::start(fake).await.unwrap();

    let err = eventhub_factory(&server)
        .await
        .new_namespaces_client()
        .new_list_by_resource_group_pager("rg")
        .next_page()
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(500));
    assert_eq!(err.error_code(), Some("FakeUnexpectedStatus"));

    server.shutdown().await;
}

// =============================================================================
// Poller Tests
// =============================================================================

#[tokio::test]
async fn test_poller_sequencing() {
    let fake = NamespacesServer::default().with_begin_create_or_update(|_, name, mut body| {
        body.name = Some(name.to_string());
        let mut poller = PollerResponder::new();
        poller
            .add_non_terminal_response(201)
            .add_non_terminal_response(202)
            .set_terminal_response(200, body);
        Ok(poller)
    });
    let server = FakeServer::start(fake).await.unwrap();

    let mut poller = eventhub_factory(&server)
        .await
        .new_namespaces_client()
        .begin_create_or_update("rg", "ns", &EHNamespace::default(), None)
        .await
        .unwrap();

    assert!(!poller.done());
    let response = poller.poll().await.unwrap();
    assert_eq!(response.status, 202);
    assert!(!poller.done());

    let namespace = poller.poll_until_done(Some(&fast())).await.unwrap();
    assert!(poller.done());
    assert_eq!(namespace.name.as_deref(), Some("ns"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_poller_terminal_error() {
    let fake = SnapshotsServer::default().with_begin_grant_access(|_, _, data| {
        assert_eq!(data.access, AccessLevel::Read);
        let mut poller = PollerResponder::<AccessUri>::new();
        poller
            .add_non_terminal_response(202)
            .set_terminal_error(ErrorResponder::new(409, "OperationNotAllowed"));
        Ok(poller)
    });
    let server = FakeServer::start(fake).await.unwrap();

    let mut poller = compute::ClientFactory::new("sub", Arc::new(FakeCredential), server.client_options())
        .unwrap()
        .new_snapshots_client()
        .begin_grant_access("rg", "snap", &GrantAccessData::new(AccessLevel::Read, 60), None)
        .await
        .unwrap();

    let err = poller.poll_until_done(Some(&fast())).await.unwrap_err();
    assert_eq!(err.status_code(), Some(409));
    assert_eq!(err.error_code(), Some("OperationNotAllowed"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_poller_resume_token_with_fake() {
    let fake = GenericResourcesServer::default().with_begin_delete_by_id(|id, api_version| {
        assert!(id.starts_with("/subscriptions/"));
        assert_eq!(api_version, "2022-03-01");
        let mut poller = PollerResponder::new();
        poller
            .add_non_terminal_response(202)
            .set_terminal_response(200, ());
        Ok(poller)
    });
    let server = FakeServer::start(fake).await.unwrap();
    let generic = resources::ClientFactory::new(Arc::new(FakeCredential), server.client_options())
        .unwrap()
        .new_generic_resources_client();
    let id = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Web/sites/app";

    let poller = generic.begin_delete_by_id(id, "2022-03-01", None).await.unwrap();
    let token = poller.resume_token().unwrap();

    let options = resources::GenericResourcesBeginDeleteByIdOptions {
        resume_token: Some(token),
    };
    let mut resumed = generic
        .begin_delete_by_id(id, "2022-03-01", Some(&options))
        .await
        .unwrap();
    resumed.poll_until_done(Some(&fast())).await.unwrap();
    assert!(resumed.done());

    server.shutdown().await;
}

#[tokio::test]
async fn test_poller_callback_error() {
    let fake = GrafanaServer::default()
        .with_begin_delete(|_, _| Err(ErrorResponder::new(404, "ResourceNotFound")));
    let server = FakeServer::start(fake).await.unwrap();

    let err = dashboard::ClientFactory::new("sub", Arc::new(FakeCredential), server.client_options())
        .unwrap()
        .new_grafana_client()
        .begin_delete("rg", "ws", None)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), Some("ResourceNotFound"));

    server.shutdown().await;
}

// =============================================================================
// Factory Tests
// =============================================================================

#[tokio::test]
async fn test_server_factory_serves_every_client() {
    let factory = ServerFactory {
        event_hubs_server: EventHubsServer::default()
            .with_get(|_, _, name| Ok(Responder::new(200, hub(name)))),
        namespaces_server: NamespacesServer::default().with_get(|_, name| {
            Ok(Responder::new(200, EHNamespace {
                name: Some(name.to_string()),
                ..Default::default()
            }))
        }),
    };
    let server = FakeServer::start(factory).await.unwrap();
    let clients = eventhub_factory(&server).await;

    let hub = clients.new_event_hubs_client().get("rg", "ns", "h").await.unwrap();
    let namespace = clients.new_namespaces_client().get("rg", "ns").await.unwrap();
    assert_eq!(hub.name.as_deref(), Some("h"));
    assert_eq!(namespace.name.as_deref(), Some("ns"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_get_by_id_through_fake() {
    let fake = GenericResourcesServer::default().with_get_by_id(|id, _| {
        Ok(Responder::new(200, GenericResource {
            id: Some(id.to_string()),
            ..Default::default()
        }))
    });
    let server = FakeServer::start(fake).await.unwrap();
    let id = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Web/sites/app";

    let resource = resources::ClientFactory::new(Arc::new(FakeCredential), server.client_options())
        .unwrap()
        .new_generic_resources_client()
        .get_by_id(id, "2022-03-01")
        .await
        .unwrap();
    assert_eq!(resource.id.as_deref(), Some(id));

    server.shutdown().await;
}
