//! In-process HTTP server hosting fake services.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request, State};
use axum::http::header::HOST;
use axum::http::Method;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::responder::{json_response, ErrorResponder, PagerResponder, PollerResponder, Responder};
use super::tracker::{PagerStep, PollerStep, Tracker};
use crate::models::ErrorResponse;
use crate::options::ClientOptions;
use crate::poller::FAKE_STATUS_SUFFIX;

/// A set of fake routes that can be served by a [`FakeServer`].
pub trait FakeService: Send + Sync + 'static {
    /// Build the routes for this service.
    fn routes(self: Arc<Self>, ctx: &FakeContext) -> Router;
}

/// State shared by every route of one [`FakeServer`].
#[derive(Clone, Default)]
pub struct FakeContext {
    cancel: CancellationToken,
    pagers: Arc<Tracker>,
    pollers: Arc<Tracker>,
}

impl std::fmt::Debug for FakeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeContext")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl FakeContext {
    /// Run a callback on the blocking pool, racing server shutdown.
    pub(crate) async fn dispatch<F>(&self, handler: F) -> Response
    where
        F: FnOnce() -> Response + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        tokio::task::spawn_blocking(move || {
            let _ = tx.send(handler());
        });

        tokio::select! {
            () = self.cancel.cancelled() => {
                fake_error(503, "FakeServerShutdown", "fake server is shutting down")
            }
            result = rx => result.unwrap_or_else(|_| {
                fake_error(500, "FakeCallbackPanicked", "fake callback panicked")
            }),
        }
    }

    /// Serve the next page for `request`, calling `start` on the first one.
    pub(crate) fn next_page<T, F>(&self, request: &FakeRequest, allowed: &'static [u16], start: F) -> Response
    where
        T: Serialize + Send + 'static,
        F: FnOnce() -> PagerResponder<T>,
    {
        let path = request.path();
        if !self.pagers.contains(path) {
            let mut responder = start();
            responder.inject_next_links(&request.url);
            self.pagers.insert(path, Box::new(PagerStep::new(responder, allowed)));
        }
        self.pagers
            .advance(path)
            .unwrap_or_else(|| fake_error(500, "FakeNoResponses", "pager entry vanished"))
    }

    /// Serve the next step of a long-running operation, calling `start` when
    /// the operation is not yet tracked.
    pub(crate) fn next_poll<T, F>(&self, request: &FakeRequest, allowed: &'static [u16], start: F) -> Response
    where
        T: Serialize + Send + 'static,
        F: FnOnce() -> Result<PollerResponder<T>, Response>,
    {
        let path = request.path();
        if !self.pollers.contains(path) {
            match start() {
                Ok(responder) => {
                    self.pollers.insert(path, Box::new(PollerStep::new(responder, allowed)));
                }
                Err(response) => return response,
            }
        }
        self.pollers
            .advance(path)
            .unwrap_or_else(|| fake_error(500, "FakeNoResponses", "poller entry vanished"))
    }
}

/// Route state: the service's callbacks plus the server context.
pub(crate) struct Fake<S> {
    pub(crate) server: Arc<S>,
    pub(crate) ctx: FakeContext,
}

impl<S> Clone for Fake<S> {
    fn clone(&self) -> Self {
        Self {
            server: self.server.clone(),
            ctx: self.ctx.clone(),
        }
    }
}

impl<S> Fake<S> {
    pub(crate) fn new(server: Arc<S>, ctx: &FakeContext) -> Self {
        Self {
            server,
            ctx: ctx.clone(),
        }
    }
}

/// The parts of an incoming request the fake handlers need.
#[derive(Debug, Clone)]
pub(crate) struct FakeRequest {
    pub(crate) url: Url,
    pub(crate) body: Bytes,
}

impl FakeRequest {
    pub(crate) fn path(&self) -> &str {
        self.url.path()
    }

    pub(crate) fn query(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// Parse the JSON request body.
    pub(crate) fn json<T: DeserializeOwned>(&self) -> Result<T, Response> {
        serde_json::from_slice(&self.body).map_err(|e| {
            fake_error(400, "InvalidRequestContent", format!("failed to parse request body: {e}"))
        })
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for FakeRequest {
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let host = req
            .headers()
            .get(HOST)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("127.0.0.1")
            .to_string();
        let uri = req.uri().clone();
        let body = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let url = Url::parse(&format!("http://{host}{uri}"))
            .map_err(|e| fake_error(400, "InvalidRequestUrl", e.to_string()))?;
        Ok(Self { url, body })
    }
}

/// Turn a callback result into a response, enforcing the status allow-list.
pub(crate) fn respond<T: Serialize>(
    result: Result<Responder<T>, ErrorResponder>,
    allowed: &[u16],
) -> Response {
    match result {
        Ok(responder) if allowed.contains(&responder.status()) => responder.into_response(),
        Ok(responder) => unexpected_status(responder.status(), allowed),
        Err(err) => err.into_response(),
    }
}

pub(crate) fn not_implemented(method: &str) -> Response {
    fake_error(
        501,
        "FakeNotImplemented",
        format!("fake for method {method} not implemented"),
    )
}

pub(crate) fn unexpected_status(status: u16, allowed: &[u16]) -> Response {
    let acceptable = allowed
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    fake_error(
        500,
        "FakeUnexpectedStatus",
        format!("unexpected status code {status}. acceptable values are {acceptable}"),
    )
}

pub(crate) fn fake_error(status: u16, code: &str, message: impl Into<String>) -> Response {
    json_response(status, &ErrorResponse::new(code, message))
}

/// Answer fake poller status requests before they reach the routes.
async fn fake_status(State(ctx): State<FakeContext>, req: Request, next: Next) -> Response {
    if req.method() == Method::GET {
        let path = req.uri().path();
        if path.ends_with(FAKE_STATUS_SUFFIX) {
            tracing::debug!(path, "fake poller status request");
            return ctx.pollers.advance(path).unwrap_or_else(|| {
                fake_error(404, "FakePollerNotFound", format!("no fake poller tracked for {path}"))
            });
        }
    }
    next.run(req).await
}

async fn route_not_found(req: Request) -> Response {
    fake_error(
        404,
        "FakeRouteNotFound",
        format!("no fake route for {} {}", req.method(), req.uri().path()),
    )
}

/// Build the complete router for a service, including fake status handling.
///
/// The fallback is registered before the layer so status polls on paths
/// without a route still reach [`fake_status`].
pub(crate) fn router<S: FakeService>(service: S, ctx: &FakeContext) -> Router {
    Arc::new(service)
        .routes(ctx)
        .fallback(route_not_found)
        .layer(middleware::from_fn_with_state(ctx.clone(), fake_status))
}

/// An HTTP server running fake services on a random local port.
///
/// Point a client at it with [`client_options`](FakeServer::client_options).
#[derive(Debug)]
pub struct FakeServer {
    url: String,
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

impl FakeServer {
    /// Start serving `service` on `127.0.0.1` with an OS-assigned port.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener can't be bound.
    pub async fn start<S: FakeService>(service: S) -> std::io::Result<Self> {
        let ctx = FakeContext::default();
        let app = router(service, &ctx);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::warn!(error = %e, "fake server stopped");
            }
        });

        tracing::debug!(%addr, "fake server listening");

        Ok(Self {
            url: format!("http://{addr}"),
            handle,
            cancel: ctx.cancel,
        })
    }

    /// Base URL of the server.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Client options that send every request to this server.
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions::with_endpoint(self.url.clone())
    }

    /// Cancel in-flight dispatches and stop the server.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        self.handle.abort();
        let _ = self.handle.await;
    }
}
