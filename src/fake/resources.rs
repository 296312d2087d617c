//! Fakes for the generic resources client.
//!
//! Every path is a resource ID, so this fake claims all routes and should be
//! served on its own.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use super::server::{fake_error, not_implemented, respond, Fake, FakeContext, FakeRequest, FakeService};
use super::{debug_callbacks, FakePollerResult, FakeResult};
use crate::resources::GenericResource;

const RESOURCE_ID: &str = "/*resource_id";

/// Fake for [`GenericResourcesClient`](crate::resources::GenericResourcesClient).
///
/// Callbacks receive the resource ID with its leading `/` and the request's
/// `api-version`.
#[derive(Clone, Default)]
pub struct GenericResourcesServer {
    get_by_id: Option<Arc<dyn Fn(&str, &str) -> FakeResult<GenericResource> + Send + Sync>>,
    begin_delete_by_id: Option<Arc<dyn Fn(&str, &str) -> FakePollerResult<()> + Send + Sync>>,
}

debug_callbacks!(GenericResourcesServer {
    get_by_id,
    begin_delete_by_id,
});

impl GenericResourcesServer {
    /// Fake `get_by_id`; allowed statuses: 200.
    #[must_use]
    pub fn with_get_by_id<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str) -> FakeResult<GenericResource> + Send + Sync + 'static,
    {
        self.get_by_id = Some(Arc::new(f));
        self
    }

    /// Fake `begin_delete_by_id`; allowed statuses: 200, 202, 204.
    #[must_use]
    pub fn with_begin_delete_by_id<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str) -> FakePollerResult<()> + Send + Sync + 'static,
    {
        self.begin_delete_by_id = Some(Arc::new(f));
        self
    }
}

impl FakeService for GenericResourcesServer {
    fn routes(self: Arc<Self>, ctx: &FakeContext) -> Router {
        Router::new()
            .route(RESOURCE_ID, get(get_by_id).delete(begin_delete_by_id))
            .with_state(Fake::new(self, ctx))
    }
}

/// The resource ID and API version of a request.
fn resource_args(resource_id: &str, req: &FakeRequest) -> Result<(String, String), Response> {
    let api_version = req.query("api-version").ok_or_else(|| {
        fake_error(400, "MissingApiVersionParameter", "the api-version query parameter is required")
    })?;
    Ok((format!("/{resource_id}"), api_version))
}

async fn get_by_id(
    State(fake): State<Fake<GenericResourcesServer>>,
    Path(resource_id): Path<String>,
    req: FakeRequest,
) -> Response {
    let Some(callback) = fake.server.get_by_id.clone() else {
        return not_implemented("GenericResourcesClient::get_by_id");
    };
    fake.ctx
        .dispatch(move || match resource_args(&resource_id, &req) {
            Ok((id, api_version)) => respond(callback(&id, &api_version), &[200]),
            Err(response) => response,
        })
        .await
}

async fn begin_delete_by_id(
    State(fake): State<Fake<GenericResourcesServer>>,
    Path(resource_id): Path<String>,
    req: FakeRequest,
) -> Response {
    let Some(callback) = fake.server.begin_delete_by_id.clone() else {
        return not_implemented("GenericResourcesClient::begin_delete_by_id");
    };
    let ctx = fake.ctx.clone();
    fake.ctx
        .dispatch(move || {
            ctx.next_poll(&req, &[200, 202, 204], || {
                let (id, api_version) = resource_args(&resource_id, &req)?;
                callback(&id, &api_version).map_err(IntoResponse::into_response)
            })
        })
        .await
}

/// All generic resource fakes behind one server.
#[derive(Debug, Clone, Default)]
pub struct ServerFactory {
    /// Fake for the generic resources client.
    pub generic_resources_server: GenericResourcesServer,
}

impl FakeService for ServerFactory {
    fn routes(self: Arc<Self>, ctx: &FakeContext) -> Router {
        Arc::new(Arc::unwrap_or_clone(self).generic_resources_server).routes(ctx)
    }
}
