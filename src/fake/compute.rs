//! Fakes for the managed disk snapshot client.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::Router;
use serde::{Deserialize, Serialize};

use super::server::{not_implemented, respond, Fake, FakeContext, FakeRequest, FakeService};
use super::{debug_callbacks, rg_route, sub_route, FakePollerResult, FakeResult, PagerResponder, ResourceGroupParams};
use crate::compute::{AccessUri, GrantAccessData, Snapshot, SnapshotList, SnapshotUpdate};

const SNAPSHOT: &str = rg_route!("Microsoft.Compute", "/snapshots/:snapshot_name");
const GRANT_ACCESS: &str = rg_route!("Microsoft.Compute", "/snapshots/:snapshot_name/beginGetAccess");
const REVOKE_ACCESS: &str = rg_route!("Microsoft.Compute", "/snapshots/:snapshot_name/endGetAccess");
const SNAPSHOTS: &str = sub_route!("Microsoft.Compute", "/snapshots");
const SNAPSHOTS_BY_GROUP: &str = rg_route!("Microsoft.Compute", "/snapshots");

#[derive(Debug, Deserialize)]
struct SnapshotParams {
    resource_group_name: String,
    snapshot_name: String,
}

type SnapshotPollerFn<B, R> = Arc<dyn Fn(&str, &str, B) -> FakePollerResult<R> + Send + Sync>;

/// Fake for [`SnapshotsClient`](crate::compute::SnapshotsClient).
#[derive(Clone, Default)]
pub struct SnapshotsServer {
    begin_create_or_update: Option<SnapshotPollerFn<Snapshot, Snapshot>>,
    begin_delete: Option<SnapshotPollerFn<(), ()>>,
    get: Option<Arc<dyn Fn(&str, &str) -> FakeResult<Snapshot> + Send + Sync>>,
    begin_grant_access: Option<SnapshotPollerFn<GrantAccessData, AccessUri>>,
    list: Option<Arc<dyn Fn() -> PagerResponder<SnapshotList> + Send + Sync>>,
    list_by_resource_group: Option<Arc<dyn Fn(&str) -> PagerResponder<SnapshotList> + Send + Sync>>,
    begin_revoke_access: Option<SnapshotPollerFn<(), ()>>,
    begin_update: Option<SnapshotPollerFn<SnapshotUpdate, Snapshot>>,
}

debug_callbacks!(SnapshotsServer {
    begin_create_or_update,
    begin_delete,
    get,
    begin_grant_access,
    list,
    list_by_resource_group,
    begin_revoke_access,
    begin_update,
});

impl SnapshotsServer {
    /// Fake `begin_create_or_update`; allowed statuses: 200, 202.
    #[must_use]
    pub fn with_begin_create_or_update<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, Snapshot) -> FakePollerResult<Snapshot> + Send + Sync + 'static,
    {
        self.begin_create_or_update = Some(Arc::new(f));
        self
    }

    /// Fake `begin_delete`; allowed statuses: 200, 202, 204.
    #[must_use]
    pub fn with_begin_delete<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str) -> FakePollerResult<()> + Send + Sync + 'static,
    {
        self.begin_delete = Some(Arc::new(move |rg, name, ()| f(rg, name)));
        self
    }

    /// Fake `get`; allowed statuses: 200.
    #[must_use]
    pub fn with_get<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str) -> FakeResult<Snapshot> + Send + Sync + 'static,
    {
        self.get = Some(Arc::new(f));
        self
    }

    /// Fake `begin_grant_access`; allowed statuses: 200, 202.
    #[must_use]
    pub fn with_begin_grant_access<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, GrantAccessData) -> FakePollerResult<AccessUri> + Send + Sync + 'static,
    {
        self.begin_grant_access = Some(Arc::new(f));
        self
    }

    /// Fake `new_list_pager`; allowed statuses: 200.
    #[must_use]
    pub fn with_list<F>(mut self, f: F) -> Self
    where
        F: Fn() -> PagerResponder<SnapshotList> + Send + Sync + 'static,
    {
        self.list = Some(Arc::new(f));
        self
    }

    /// Fake `new_list_by_resource_group_pager`; allowed statuses: 200.
    #[must_use]
    pub fn with_list_by_resource_group<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> PagerResponder<SnapshotList> + Send + Sync + 'static,
    {
        self.list_by_resource_group = Some(Arc::new(f));
        self
    }

    /// Fake `begin_revoke_access`; allowed statuses: 200, 202, 204.
    #[must_use]
    pub fn with_begin_revoke_access<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str) -> FakePollerResult<()> + Send + Sync + 'static,
    {
        self.begin_revoke_access = Some(Arc::new(move |rg, name, ()| f(rg, name)));
        self
    }

    /// Fake `begin_update`; allowed statuses: 200, 202.
    #[must_use]
    pub fn with_begin_update<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, SnapshotUpdate) -> FakePollerResult<Snapshot> + Send + Sync + 'static,
    {
        self.begin_update = Some(Arc::new(f));
        self
    }
}

impl FakeService for SnapshotsServer {
    fn routes(self: Arc<Self>, ctx: &FakeContext) -> Router {
        Router::new()
            .route(
                SNAPSHOT,
                put(begin_create_or_update)
                    .delete(begin_delete)
                    .get(get_snapshot)
                    .patch(begin_update),
            )
            .route(GRANT_ACCESS, post(begin_grant_access))
            .route(REVOKE_ACCESS, post(begin_revoke_access))
            .route(SNAPSHOTS, get(list))
            .route(SNAPSHOTS_BY_GROUP, get(list_by_resource_group))
            .with_state(Fake::new(self, ctx))
    }
}

/// Reads the callback's body argument from the request.
type BodyReader<B> = fn(&FakeRequest) -> Result<B, Response>;

fn no_body(_: &FakeRequest) -> Result<(), Response> {
    Ok(())
}

/// Dispatch a long-running snapshot operation.
async fn snapshot_poll<B, R>(
    fake: Fake<SnapshotsServer>,
    callback: Option<SnapshotPollerFn<B, R>>,
    name: &'static str,
    (p, req): (SnapshotParams, FakeRequest),
    read_body: BodyReader<B>,
    allowed: &'static [u16],
) -> Response
where
    B: 'static,
    R: Serialize + Send + 'static,
{
    let Some(callback) = callback else {
        return not_implemented(name);
    };
    let ctx = fake.ctx.clone();
    fake.ctx
        .dispatch(move || {
            ctx.next_poll(&req, allowed, || {
                let body = read_body(&req)?;
                callback(&p.resource_group_name, &p.snapshot_name, body).map_err(IntoResponse::into_response)
            })
        })
        .await
}

async fn begin_create_or_update(
    State(fake): State<Fake<SnapshotsServer>>,
    Path(p): Path<SnapshotParams>,
    req: FakeRequest,
) -> Response {
    let callback = fake.server.begin_create_or_update.clone();
    let name = "SnapshotsClient::begin_create_or_update";
    snapshot_poll(fake, callback, name, (p, req), FakeRequest::json, &[200, 202]).await
}

async fn begin_delete(
    State(fake): State<Fake<SnapshotsServer>>,
    Path(p): Path<SnapshotParams>,
    req: FakeRequest,
) -> Response {
    let callback = fake.server.begin_delete.clone();
    let name = "SnapshotsClient::begin_delete";
    snapshot_poll(fake, callback, name, (p, req), no_body, &[200, 202, 204]).await
}

async fn get_snapshot(State(fake): State<Fake<SnapshotsServer>>, Path(p): Path<SnapshotParams>) -> Response {
    let Some(callback) = fake.server.get.clone() else {
        return not_implemented("SnapshotsClient::get");
    };
    fake.ctx
        .dispatch(move || respond(callback(&p.resource_group_name, &p.snapshot_name), &[200]))
        .await
}

async fn begin_grant_access(
    State(fake): State<Fake<SnapshotsServer>>,
    Path(p): Path<SnapshotParams>,
    req: FakeRequest,
) -> Response {
    let callback = fake.server.begin_grant_access.clone();
    let name = "SnapshotsClient::begin_grant_access";
    snapshot_poll(fake, callback, name, (p, req), FakeRequest::json, &[200, 202]).await
}

async fn begin_revoke_access(
    State(fake): State<Fake<SnapshotsServer>>,
    Path(p): Path<SnapshotParams>,
    req: FakeRequest,
) -> Response {
    let callback = fake.server.begin_revoke_access.clone();
    let name = "SnapshotsClient::begin_revoke_access";
    snapshot_poll(fake, callback, name, (p, req), no_body, &[200, 202, 204]).await
}

async fn begin_update(
    State(fake): State<Fake<SnapshotsServer>>,
    Path(p): Path<SnapshotParams>,
    req: FakeRequest,
) -> Response {
    let callback = fake.server.begin_update.clone();
    let name = "SnapshotsClient::begin_update";
    snapshot_poll(fake, callback, name, (p, req), FakeRequest::json, &[200, 202]).await
}

async fn list(State(fake): State<Fake<SnapshotsServer>>, req: FakeRequest) -> Response {
    let Some(callback) = fake.server.list.clone() else {
        return not_implemented("SnapshotsClient::new_list_pager");
    };
    let ctx = fake.ctx.clone();
    fake.ctx
        .dispatch(move || ctx.next_page(&req, &[200], || callback()))
        .await
}

async fn list_by_resource_group(
    State(fake): State<Fake<SnapshotsServer>>,
    Path(p): Path<ResourceGroupParams>,
    req: FakeRequest,
) -> Response {
    let Some(callback) = fake.server.list_by_resource_group.clone() else {
        return not_implemented("SnapshotsClient::new_list_by_resource_group_pager");
    };
    let ctx = fake.ctx.clone();
    fake.ctx
        .dispatch(move || ctx.next_page(&req, &[200], || callback(&p.resource_group_name)))
        .await
}

/// All compute fakes behind one server.
#[derive(Debug, Clone, Default)]
pub struct ServerFactory {
    /// Fake for the snapshots client.
    pub snapshots_server: SnapshotsServer,
}

impl FakeService for ServerFactory {
    fn routes(self: Arc<Self>, ctx: &FakeContext) -> Router {
        Arc::new(Arc::unwrap_or_clone(self).snapshots_server).routes(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::server::router;
    use crate::fake::PollerResponder;
    use crate::pager::ListResult;
    use axum::body::Body as HttpBody;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn get_request(uri: &str) -> Request<HttpBody> {
        Request::builder()
            .uri(uri)
            .header("host", "127.0.0.1:9")
            .body(HttpBody::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_pages_link_to_the_same_route() {
        let fake = SnapshotsServer::default().with_list_by_resource_group(|_| {
            let mut pager = PagerResponder::new();
            pager
                .add_page(200, ListResult::new(vec![Snapshot::default()], None))
                .add_page(200, ListResult::new(vec![Snapshot::default(), Snapshot::default()], None));
            pager
        });
        let app = router(fake, &FakeContext::default());
        let uri = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Compute/snapshots?api-version=2024-03-02";

        let first = body_json(app.clone().oneshot(get_request(uri)).await.unwrap()).await;
        assert_eq!(first["value"].as_array().unwrap().len(), 1);
        let next = url::Url::parse(first["nextLink"].as_str().unwrap()).unwrap();
        assert!(next.query().unwrap().contains("%24skipToken=fake-page-1"));

        let next_uri = format!("{}?{}", next.path(), next.query().unwrap());
        let second = body_json(app.oneshot(get_request(&next_uri)).await.unwrap()).await;
        assert_eq!(second["value"].as_array().unwrap().len(), 2);
        assert!(second.get("nextLink").is_none());
    }

    #[tokio::test]
    async fn test_revoke_access_without_body() {
        let fake = SnapshotsServer::default().with_begin_revoke_access(|_, _| {
            let mut poller = PollerResponder::new();
            poller.set_terminal_response(200, ());
            Ok(poller)
        });
        let app = router(fake, &FakeContext::default());

        let request = Request::builder()
            .method("POST")
            .uri("/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Compute/snapshots/s/endGetAccess")
            .header("host", "127.0.0.1:9")
            .body(HttpBody::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["fake-poller-status"], "Succeeded");
    }
}
