//! Fakes for the Managed Grafana client.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::Router;
use serde::Deserialize;

use super::server::{not_implemented, respond, Fake, FakeContext, FakeRequest, FakeService};
use super::{debug_callbacks, rg_route, sub_route, FakePollerResult, FakeResult, PagerResponder, ResourceGroupParams};
use crate::dashboard::{
    EnterpriseDetails, GrafanaAvailablePluginListResponse, ManagedGrafana, ManagedGrafanaListResponse,
    ManagedGrafanaUpdateParameters,
};

const WORKSPACE: &str = rg_route!("Microsoft.Dashboard", "/grafana/:workspace_name");
const CHECK_ENTERPRISE: &str = rg_route!(
    "Microsoft.Dashboard",
    "/grafana/:workspace_name/checkEnterpriseDetails"
);
const FETCH_PLUGINS: &str = rg_route!(
    "Microsoft.Dashboard",
    "/grafana/:workspace_name/fetchAvailablePlugins"
);
const WORKSPACES: &str = sub_route!("Microsoft.Dashboard", "/grafana");
const WORKSPACES_BY_GROUP: &str = rg_route!("Microsoft.Dashboard", "/grafana");

#[derive(Debug, Deserialize)]
struct WorkspaceParams {
    resource_group_name: String,
    workspace_name: String,
}

type WorkspaceFn<R> = Arc<dyn Fn(&str, &str) -> FakeResult<R> + Send + Sync>;

/// Fake for [`GrafanaClient`](crate::dashboard::GrafanaClient).
#[derive(Clone, Default)]
pub struct GrafanaServer {
    check_enterprise_details: Option<WorkspaceFn<EnterpriseDetails>>,
    begin_create: Option<Arc<dyn Fn(&str, &str, ManagedGrafana) -> FakePollerResult<ManagedGrafana> + Send + Sync>>,
    begin_delete: Option<Arc<dyn Fn(&str, &str) -> FakePollerResult<()> + Send + Sync>>,
    fetch_available_plugins: Option<WorkspaceFn<GrafanaAvailablePluginListResponse>>,
    get: Option<WorkspaceFn<ManagedGrafana>>,
    list: Option<Arc<dyn Fn() -> PagerResponder<ManagedGrafanaListResponse> + Send + Sync>>,
    list_by_resource_group: Option<Arc<dyn Fn(&str) -> PagerResponder<ManagedGrafanaListResponse> + Send + Sync>>,
    update: Option<
        Arc<dyn Fn(&str, &str, ManagedGrafanaUpdateParameters) -> FakeResult<ManagedGrafana> + Send + Sync>,
    >,
}

debug_callbacks!(GrafanaServer {
    check_enterprise_details,
    begin_create,
    begin_delete,
    fetch_available_plugins,
    get,
    list,
    list_by_resource_group,
    update,
});

impl GrafanaServer {
    /// Fake `check_enterprise_details`; allowed statuses: 200.
    #[must_use]
    pub fn with_check_enterprise_details<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str) -> FakeResult<EnterpriseDetails> + Send + Sync + 'static,
    {
        self.check_enterprise_details = Some(Arc::new(f));
        self
    }

    /// Fake `begin_create`; allowed statuses: 200, 201.
    #[must_use]
    pub fn with_begin_create<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, ManagedGrafana) -> FakePollerResult<ManagedGrafana> + Send + Sync + 'static,
    {
        self.begin_create = Some(Arc::new(f));
        self
    }

    /// Fake `begin_delete`; allowed statuses: 200, 202, 204.
    #[must_use]
    pub fn with_begin_delete<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str) -> FakePollerResult<()> + Send + Sync + 'static,
    {
        self.begin_delete = Some(Arc::new(f));
        self
    }

    /// Fake `fetch_available_plugins`; allowed statuses: 200.
    #[must_use]
    pub fn with_fetch_available_plugins<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str) -> FakeResult<GrafanaAvailablePluginListResponse> + Send + Sync + 'static,
    {
        self.fetch_available_plugins = Some(Arc::new(f));
        self
    }

    /// Fake `get`; allowed statuses: 200.
    #[must_use]
    pub fn with_get<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str) -> FakeResult<ManagedGrafana> + Send + Sync + 'static,
    {
        self.get = Some(Arc::new(f));
        self
    }

    /// Fake `new_list_pager`; allowed statuses: 200.
    #[must_use]
    pub fn with_list<F>(mut self, f: F) -> Self
    where
        F: Fn() -> PagerResponder<ManagedGrafanaListResponse> + Send + Sync + 'static,
    {
        self.list = Some(Arc::new(f));
        self
    }

    /// Fake `new_list_by_resource_group_pager`; allowed statuses: 200.
    #[must_use]
    pub fn with_list_by_resource_group<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> PagerResponder<ManagedGrafanaListResponse> + Send + Sync + 'static,
    {
        self.list_by_resource_group = Some(Arc::new(f));
        self
    }

    /// Fake `update`; allowed statuses: 200, 202.
    #[must_use]
    pub fn with_update<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, ManagedGrafanaUpdateParameters) -> FakeResult<ManagedGrafana> + Send + Sync + 'static,
    {
        self.update = Some(Arc::new(f));
        self
    }
}

impl FakeService for GrafanaServer {
    fn routes(self: Arc<Self>, ctx: &FakeContext) -> Router {
        Router::new()
            .route(
                WORKSPACE,
                put(begin_create)
                    .delete(begin_delete)
                    .get(get_workspace)
                    .patch(update),
            )
            .route(CHECK_ENTERPRISE, post(check_enterprise_details))
            .route(FETCH_PLUGINS, post(fetch_available_plugins))
            .route(WORKSPACES, get(list))
            .route(WORKSPACES_BY_GROUP, get(list_by_resource_group))
            .with_state(Fake::new(self, ctx))
    }
}

/// Dispatch a body-less, single-response workspace operation.
async fn workspace_op<R>(
    fake: Fake<GrafanaServer>,
    callback: Option<WorkspaceFn<R>>,
    name: &'static str,
    p: WorkspaceParams,
) -> Response
where
    R: serde::Serialize + 'static,
{
    let Some(callback) = callback else {
        return not_implemented(name);
    };
    fake.ctx
        .dispatch(move || respond(callback(&p.resource_group_name, &p.workspace_name), &[200]))
        .await
}

async fn check_enterprise_details(
    State(fake): State<Fake<GrafanaServer>>,
    Path(p): Path<WorkspaceParams>,
) -> Response {
    let callback = fake.server.check_enterprise_details.clone();
    workspace_op(fake, callback, "GrafanaClient::check_enterprise_details", p).await
}

async fn fetch_available_plugins(
    State(fake): State<Fake<GrafanaServer>>,
    Path(p): Path<WorkspaceParams>,
) -> Response {
    let callback = fake.server.fetch_available_plugins.clone();
    workspace_op(fake, callback, "GrafanaClient::fetch_available_plugins", p).await
}

async fn get_workspace(State(fake): State<Fake<GrafanaServer>>, Path(p): Path<WorkspaceParams>) -> Response {
    let callback = fake.server.get.clone();
    workspace_op(fake, callback, "GrafanaClient::get", p).await
}

async fn begin_create(
    State(fake): State<Fake<GrafanaServer>>,
    Path(p): Path<WorkspaceParams>,
    req: FakeRequest,
) -> Response {
    let Some(callback) = fake.server.begin_create.clone() else {
        return not_implemented("GrafanaClient::begin_create");
    };
    let ctx = fake.ctx.clone();
    fake.ctx
        .dispatch(move || {
            ctx.next_poll(&req, &[200, 201], || {
                let body = req.json()?;
                callback(&p.resource_group_name, &p.workspace_name, body).map_err(IntoResponse::into_response)
            })
        })
        .await
}

async fn begin_delete(
    State(fake): State<Fake<GrafanaServer>>,
    Path(p): Path<WorkspaceParams>,
    req: FakeRequest,
) -> Response {
    let Some(callback) = fake.server.begin_delete.clone() else {
        return not_implemented("GrafanaClient::begin_delete");
    };
    let ctx = fake.ctx.clone();
    fake.ctx
        .dispatch(move || {
            ctx.next_poll(&req, &[200, 202, 204], || {
                callback(&p.resource_group_name, &p.workspace_name).map_err(IntoResponse::into_response)
            })
        })
        .await
}

async fn update(
    State(fake): State<Fake<GrafanaServer>>,
    Path(p): Path<WorkspaceParams>,
    req: FakeRequest,
) -> Response {
    let Some(callback) = fake.server.update.clone() else {
        return not_implemented("GrafanaClient::update");
    };
    fake.ctx
        .dispatch(move || match req.json() {
            Ok(body) => respond(callback(&p.resource_group_name, &p.workspace_name, body), &[200, 202]),
            Err(response) => response,
        })
        .await
}

async fn list(State(fake): State<Fake<GrafanaServer>>, req: FakeRequest) -> Response {
    let Some(callback) = fake.server.list.clone() else {
        return not_implemented("GrafanaClient::new_list_pager");
    };
    let ctx = fake.ctx.clone();
    fake.ctx
        .dispatch(move || ctx.next_page(&req, &[200], || callback()))
        .await
}

async fn list_by_resource_group(
    State(fake): State<Fake<GrafanaServer>>,
    Path(p): Path<ResourceGroupParams>,
    req: FakeRequest,
) -> Response {
    let Some(callback) = fake.server.list_by_resource_group.clone() else {
        return not_implemented("GrafanaClient::new_list_by_resource_group_pager");
    };
    let ctx = fake.ctx.clone();
    fake.ctx
        .dispatch(move || ctx.next_page(&req, &[200], || callback(&p.resource_group_name)))
        .await
}

/// All Managed Grafana fakes behind one server.
#[derive(Debug, Clone, Default)]
pub struct ServerFactory {
    /// Fake for the Grafana client.
    pub grafana_server: GrafanaServer,
}

impl FakeService for ServerFactory {
    fn routes(self: Arc<Self>, ctx: &FakeContext) -> Router {
        Arc::new(Arc::unwrap_or_clone(self).grafana_server).routes(ctx)
    }
}
