//! Fakes for the Event Hubs clients.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::Router;
use serde::Deserialize;

use super::server::{not_implemented, respond, Fake, FakeContext, FakeRequest, FakeService};
use super::{debug_callbacks, rg_route, sub_route, FakePollerResult, FakeResult, PagerResponder, ResourceGroupParams};
use crate::eventhub::{
    AccessKeys, AuthorizationRule, AuthorizationRuleListResult, CheckNameAvailabilityParameter,
    CheckNameAvailabilityResult, EHNamespace, EHNamespaceListResult, Eventhub, EventHubsListByNamespaceOptions,
    EventhubListResult, RegenerateAccessKeyParameters,
};

const NAMESPACE: &str = rg_route!("Microsoft.EventHub", "/namespaces/:namespace_name");
const EVENTHUBS: &str = rg_route!("Microsoft.EventHub", "/namespaces/:namespace_name/eventhubs");
const EVENTHUB: &str = rg_route!("Microsoft.EventHub", "/namespaces/:namespace_name/eventhubs/:event_hub_name");
const RULES: &str = rg_route!(
    "Microsoft.EventHub",
    "/namespaces/:namespace_name/eventhubs/:event_hub_name/authorizationRules"
);
const RULE: &str = rg_route!(
    "Microsoft.EventHub",
    "/namespaces/:namespace_name/eventhubs/:event_hub_name/authorizationRules/:authorization_rule_name"
);
const LIST_KEYS: &str = rg_route!(
    "Microsoft.EventHub",
    "/namespaces/:namespace_name/eventhubs/:event_hub_name/authorizationRules/:authorization_rule_name/listKeys"
);
const REGENERATE_KEYS: &str = rg_route!(
    "Microsoft.EventHub",
    "/namespaces/:namespace_name/eventhubs/:event_hub_name/authorizationRules/:authorization_rule_name/regenerateKeys"
);
const NAMESPACES: &str = sub_route!("Microsoft.EventHub", "/namespaces");
const NAMESPACES_BY_GROUP: &str = rg_route!("Microsoft.EventHub", "/namespaces");
const CHECK_NAME: &str = sub_route!("Microsoft.EventHub", "/checkNameAvailability");

#[derive(Debug, Deserialize)]
struct NamespaceParams {
    resource_group_name: String,
    namespace_name: String,
}

#[derive(Debug, Deserialize)]
struct EventhubParams {
    resource_group_name: String,
    namespace_name: String,
    event_hub_name: String,
}

#[derive(Debug, Deserialize)]
struct RuleParams {
    resource_group_name: String,
    namespace_name: String,
    event_hub_name: String,
    authorization_rule_name: String,
}

type EventhubFn<B, R> = Arc<dyn Fn(&str, &str, &str, B) -> FakeResult<R> + Send + Sync>;
type RuleFn<B, R> = Arc<dyn Fn(&str, &str, &str, &str, B) -> FakeResult<R> + Send + Sync>;

/// Fake for [`EventHubsClient`](crate::eventhub::EventHubsClient).
#[derive(Clone, Default)]
pub struct EventHubsServer {
    create_or_update: Option<EventhubFn<Eventhub, Eventhub>>,
    delete: Option<EventhubFn<(), ()>>,
    get: Option<EventhubFn<(), Eventhub>>,
    list_by_namespace: Option<
        Arc<dyn Fn(&str, &str, EventHubsListByNamespaceOptions) -> PagerResponder<EventhubListResult> + Send + Sync>,
    >,
    create_or_update_authorization_rule: Option<RuleFn<AuthorizationRule, AuthorizationRule>>,
    delete_authorization_rule: Option<RuleFn<(), ()>>,
    get_authorization_rule: Option<RuleFn<(), AuthorizationRule>>,
    list_authorization_rules:
        Option<Arc<dyn Fn(&str, &str, &str) -> PagerResponder<AuthorizationRuleListResult> + Send + Sync>>,
    list_keys: Option<RuleFn<(), AccessKeys>>,
    regenerate_keys: Option<RuleFn<RegenerateAccessKeyParameters, AccessKeys>>,
}

debug_callbacks!(EventHubsServer {
    create_or_update,
    delete,
    get,
    list_by_namespace,
    create_or_update_authorization_rule,
    delete_authorization_rule,
    get_authorization_rule,
    list_authorization_rules,
    list_keys,
    regenerate_keys,
});

impl EventHubsServer {
    /// Fake `create_or_update`; allowed statuses: 200.
    #[must_use]
    pub fn with_create_or_update<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, &str, Eventhub) -> FakeResult<Eventhub> + Send + Sync + 'static,
    {
        self.create_or_update = Some(Arc::new(f));
        self
    }

    /// Fake `delete`; allowed statuses: 200, 204.
    #[must_use]
    pub fn with_delete<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, &str) -> FakeResult<()> + Send + Sync + 'static,
    {
        self.delete = Some(Arc::new(move |rg, ns, hub, ()| f(rg, ns, hub)));
        self
    }

    /// Fake `get`; allowed statuses: 200.
    #[must_use]
    pub fn with_get<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, &str) -> FakeResult<Eventhub> + Send + Sync + 'static,
    {
        self.get = Some(Arc::new(move |rg, ns, hub, ()| f(rg, ns, hub)));
        self
    }

    /// Fake `new_list_by_namespace_pager`; allowed statuses: 200.
    #[must_use]
    pub fn with_list_by_namespace<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, EventHubsListByNamespaceOptions) -> PagerResponder<EventhubListResult>
            + Send
            + Sync
            + 'static,
    {
        self.list_by_namespace = Some(Arc::new(f));
        self
    }

    /// Fake `create_or_update_authorization_rule`; allowed statuses: 200.
    #[must_use]
    pub fn with_create_or_update_authorization_rule<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, &str, &str, AuthorizationRule) -> FakeResult<AuthorizationRule>
            + Send
            + Sync
            + 'static,
    {
        self.create_or_update_authorization_rule = Some(Arc::new(f));
        self
    }

    /// Fake `delete_authorization_rule`; allowed statuses: 200, 204.
    #[must_use]
    pub fn with_delete_authorization_rule<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, &str, &str) -> FakeResult<()> + Send + Sync + 'static,
    {
        self.delete_authorization_rule = Some(Arc::new(move |rg, ns, hub, rule, ()| f(rg, ns, hub, rule)));
        self
    }

    /// Fake `get_authorization_rule`; allowed statuses: 200.
    #[must_use]
    pub fn with_get_authorization_rule<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, &str, &str) -> FakeResult<AuthorizationRule> + Send + Sync + 'static,
    {
        self.get_authorization_rule = Some(Arc::new(move |rg, ns, hub, rule, ()| f(rg, ns, hub, rule)));
        self
    }

    /// Fake `new_list_authorization_rules_pager`; allowed statuses: 200.
    #[must_use]
    pub fn with_list_authorization_rules<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, &str) -> PagerResponder<AuthorizationRuleListResult> + Send + Sync + 'static,
    {
        self.list_authorization_rules = Some(Arc::new(f));
        self
    }

    /// Fake `list_keys`; allowed statuses: 200.
    #[must_use]
    pub fn with_list_keys<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, &str, &str) -> FakeResult<AccessKeys> + Send + Sync + 'static,
    {
        self.list_keys = Some(Arc::new(move |rg, ns, hub, rule, ()| f(rg, ns, hub, rule)));
        self
    }

    /// Fake `regenerate_keys`; allowed statuses: 200.
    #[must_use]
    pub fn with_regenerate_keys<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, &str, &str, RegenerateAccessKeyParameters) -> FakeResult<AccessKeys>
            + Send
            + Sync
            + 'static,
    {
        self.regenerate_keys = Some(Arc::new(f));
        self
    }
}

impl FakeService for EventHubsServer {
    fn routes(self: Arc<Self>, ctx: &FakeContext) -> Router {
        Router::new()
            .route(
                EVENTHUB,
                put(create_or_update).delete(delete_eventhub).get(get_eventhub),
            )
            .route(EVENTHUBS, get(list_by_namespace))
            .route(
                RULE,
                put(create_or_update_rule).delete(delete_rule).get(get_rule),
            )
            .route(RULES, get(list_rules))
            .route(LIST_KEYS, post(list_keys))
            .route(REGENERATE_KEYS, post(regenerate_keys))
            .with_state(Fake::new(self, ctx))
    }
}

/// Calls an Event Hub callback with the route's parameters and body.
async fn eventhub_op<B, R>(
    fake: Fake<EventHubsServer>,
    callback: Option<EventhubFn<B, R>>,
    name: &'static str,
    p: EventhubParams,
    body: impl FnOnce() -> Result<B, Response> + Send + 'static,
    allowed: &'static [u16],
) -> Response
where
    B: 'static,
    R: serde::Serialize + 'static,
{
    let Some(callback) = callback else {
        return not_implemented(name);
    };
    fake.ctx
        .dispatch(move || {
            let body = match body() {
                Ok(body) => body,
                Err(response) => return response,
            };
            respond(
                callback(&p.resource_group_name, &p.namespace_name, &p.event_hub_name, body),
                allowed,
            )
        })
        .await
}

/// Calls an authorization rule callback with the route's parameters and body.
async fn rule_op<B, R>(
    fake: Fake<EventHubsServer>,
    callback: Option<RuleFn<B, R>>,
    name: &'static str,
    p: RuleParams,
    body: impl FnOnce() -> Result<B, Response> + Send + 'static,
    allowed: &'static [u16],
) -> Response
where
    B: 'static,
    R: serde::Serialize + 'static,
{
    let Some(callback) = callback else {
        return not_implemented(name);
    };
    fake.ctx
        .dispatch(move || {
            let body = match body() {
                Ok(body) => body,
                Err(response) => return response,
            };
            respond(
                callback(
                    &p.resource_group_name,
                    &p.namespace_name,
                    &p.event_hub_name,
                    &p.authorization_rule_name,
                    body,
                ),
                allowed,
            )
        })
        .await
}

async fn create_or_update(
    State(fake): State<Fake<EventHubsServer>>,
    Path(p): Path<EventhubParams>,
    req: FakeRequest,
) -> Response {
    let callback = fake.server.create_or_update.clone();
    eventhub_op(fake, callback, "EventHubsClient::create_or_update", p, move || req.json(), &[200]).await
}

async fn delete_eventhub(State(fake): State<Fake<EventHubsServer>>, Path(p): Path<EventhubParams>) -> Response {
    let callback = fake.server.delete.clone();
    eventhub_op(fake, callback, "EventHubsClient::delete", p, || Ok(()), &[200, 204]).await
}

async fn get_eventhub(State(fake): State<Fake<EventHubsServer>>, Path(p): Path<EventhubParams>) -> Response {
    let callback = fake.server.get.clone();
    eventhub_op(fake, callback, "EventHubsClient::get", p, || Ok(()), &[200]).await
}

async fn list_by_namespace(
    State(fake): State<Fake<EventHubsServer>>,
    Path(p): Path<NamespaceParams>,
    req: FakeRequest,
) -> Response {
    let Some(callback) = fake.server.list_by_namespace.clone() else {
        return not_implemented("EventHubsClient::new_list_by_namespace_pager");
    };
    let ctx = fake.ctx.clone();
    fake.ctx
        .dispatch(move || {
            ctx.next_page(&req, &[200], || {
                let options = EventHubsListByNamespaceOptions {
                    skip: req.query("$skip").and_then(|v| v.parse().ok()),
                    top: req.query("$top").and_then(|v| v.parse().ok()),
                };
                callback(&p.resource_group_name, &p.namespace_name, options)
            })
        })
        .await
}

async fn create_or_update_rule(
    State(fake): State<Fake<EventHubsServer>>,
    Path(p): Path<RuleParams>,
    req: FakeRequest,
) -> Response {
    let callback = fake.server.create_or_update_authorization_rule.clone();
    rule_op(
        fake,
        callback,
        "EventHubsClient::create_or_update_authorization_rule",
        p,
        move || req.json(),
        &[200],
    )
    .await
}

async fn delete_rule(State(fake): State<Fake<EventHubsServer>>, Path(p): Path<RuleParams>) -> Response {
    let callback = fake.server.delete_authorization_rule.clone();
    rule_op(fake, callback, "EventHubsClient::delete_authorization_rule", p, || Ok(()), &[200, 204]).await
}

async fn get_rule(State(fake): State<Fake<EventHubsServer>>, Path(p): Path<RuleParams>) -> Response {
    let callback = fake.server.get_authorization_rule.clone();
    rule_op(fake, callback, "EventHubsClient::get_authorization_rule", p, || Ok(()), &[200]).await
}

async fn list_rules(
    State(fake): State<Fake<EventHubsServer>>,
    Path(p): Path<EventhubParams>,
    req: FakeRequest,
) -> Response {
    let Some(callback) = fake.server.list_authorization_rules.clone() else {
        return not_implemented("EventHubsClient::new_list_authorization_rules_pager");
    };
    let ctx = fake.ctx.clone();
    fake.ctx
        .dispatch(move || {
            ctx.next_page(&req, &[200], || {
                callback(&p.resource_group_name, &p.namespace_name, &p.event_hub_name)
            })
        })
        .await
}

async fn list_keys(State(fake): State<Fake<EventHubsServer>>, Path(p): Path<RuleParams>) -> Response {
    let callback = fake.server.list_keys.clone();
    rule_op(fake, callback, "EventHubsClient::list_keys", p, || Ok(()), &[200]).await
}

async fn regenerate_keys(
    State(fake): State<Fake<EventHubsServer>>,
    Path(p): Path<RuleParams>,
    req: FakeRequest,
) -> Response {
    let callback = fake.server.regenerate_keys.clone();
    rule_op(fake, callback, "EventHubsClient::regenerate_keys", p, move || req.json(), &[200]).await
}

type NamespaceFn<B, R> = Arc<dyn Fn(&str, &str, B) -> FakeResult<R> + Send + Sync>;
type NamespacePollerFn<B, R> = Arc<dyn Fn(&str, &str, B) -> FakePollerResult<R> + Send + Sync>;

/// Fake for [`NamespacesClient`](crate::eventhub::NamespacesClient).
#[derive(Clone, Default)]
pub struct NamespacesServer {
    begin_create_or_update: Option<NamespacePollerFn<EHNamespace, EHNamespace>>,
    begin_delete: Option<NamespacePollerFn<(), ()>>,
    get: Option<NamespaceFn<(), EHNamespace>>,
    update: Option<NamespaceFn<EHNamespace, EHNamespace>>,
    list: Option<Arc<dyn Fn() -> PagerResponder<EHNamespaceListResult> + Send + Sync>>,
    list_by_resource_group: Option<Arc<dyn Fn(&str) -> PagerResponder<EHNamespaceListResult> + Send + Sync>>,
    check_name_availability: Option<
        Arc<dyn Fn(CheckNameAvailabilityParameter) -> FakeResult<CheckNameAvailabilityResult> + Send + Sync>,
    >,
}

debug_callbacks!(NamespacesServer {
    begin_create_or_update,
    begin_delete,
    get,
    update,
    list,
    list_by_resource_group,
    check_name_availability,
});

impl NamespacesServer {
    /// Fake `begin_create_or_update`; allowed statuses: 200, 201, 202.
    #[must_use]
    pub fn with_begin_create_or_update<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, EHNamespace) -> FakePollerResult<EHNamespace> + Send + Sync + 'static,
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
        self.begin_delete = Some(Arc::new(move |rg, ns, ()| f(rg, ns)));
        self
    }

    /// Fake `get`; allowed statuses: 200, 201.
    #[must_use]
    pub fn with_get<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str) -> FakeResult<EHNamespace> + Send + Sync + 'static,
    {
        self.get = Some(Arc::new(move |rg, ns, ()| f(rg, ns)));
        self
    }

    /// Fake `update`; allowed statuses: 200, 201, 202.
    #[must_use]
    pub fn with_update<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, EHNamespace) -> FakeResult<EHNamespace> + Send + Sync + 'static,
    {
        self.update = Some(Arc::new(f));
        self
    }

    /// Fake `new_list_pager`; allowed statuses: 200.
    #[must_use]
    pub fn with_list<F>(mut self, f: F) -> Self
    where
        F: Fn() -> PagerResponder<EHNamespaceListResult> + Send + Sync + 'static,
    {
        self.list = Some(Arc::new(f));
        self
    }

    /// Fake `new_list_by_resource_group_pager`; allowed statuses: 200.
    #[must_use]
    pub fn with_list_by_resource_group<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> PagerResponder<EHNamespaceListResult> + Send + Sync + 'static,
    {
        self.list_by_resource_group = Some(Arc::new(f));
        self
    }

    /// Fake `check_name_availability`; allowed statuses: 200.
    #[must_use]
    pub fn with_check_name_availability<F>(mut self, f: F) -> Self
    where
        F: Fn(CheckNameAvailabilityParameter) -> FakeResult<CheckNameAvailabilityResult> + Send + Sync + 'static,
    {
        self.check_name_availability = Some(Arc::new(f));
        self
    }
}

impl FakeService for NamespacesServer {
    fn routes(self: Arc<Self>, ctx: &FakeContext) -> Router {
        Router::new()
            .route(
                NAMESPACE,
                put(begin_create_or_update_namespace)
                    .delete(begin_delete_namespace)
                    .get(get_namespace)
                    .patch(update_namespace),
            )
            .route(NAMESPACES, get(list_namespaces))
            .route(NAMESPACES_BY_GROUP, get(list_namespaces_by_group))
            .route(CHECK_NAME, post(check_name_availability))
            .with_state(Fake::new(self, ctx))
    }
}

async fn begin_create_or_update_namespace(
    State(fake): State<Fake<NamespacesServer>>,
    Path(p): Path<NamespaceParams>,
    req: FakeRequest,
) -> Response {
    let Some(callback) = fake.server.begin_create_or_update.clone() else {
        return not_implemented("NamespacesClient::begin_create_or_update");
    };
    let ctx = fake.ctx.clone();
    fake.ctx
        .dispatch(move || {
            ctx.next_poll(&req, &[200, 201, 202], || {
                let body = req.json()?;
                callback(&p.resource_group_name, &p.namespace_name, body).map_err(IntoResponse::into_response)
            })
        })
        .await
}

async fn begin_delete_namespace(
    State(fake): State<Fake<NamespacesServer>>,
    Path(p): Path<NamespaceParams>,
    req: FakeRequest,
) -> Response {
    let Some(callback) = fake.server.begin_delete.clone() else {
        return not_implemented("NamespacesClient::begin_delete");
    };
    let ctx = fake.ctx.clone();
    fake.ctx
        .dispatch(move || {
            ctx.next_poll(&req, &[200, 202, 204], || {
                callback(&p.resource_group_name, &p.namespace_name, ()).map_err(IntoResponse::into_response)
            })
        })
        .await
}

async fn get_namespace(State(fake): State<Fake<NamespacesServer>>, Path(p): Path<NamespaceParams>) -> Response {
    let Some(callback) = fake.server.get.clone() else {
        return not_implemented("NamespacesClient::get");
    };
    fake.ctx
        .dispatch(move || respond(callback(&p.resource_group_name, &p.namespace_name, ()), &[200, 201]))
        .await
}

async fn update_namespace(
    State(fake): State<Fake<NamespacesServer>>,
    Path(p): Path<NamespaceParams>,
    req: FakeRequest,
) -> Response {
    let Some(callback) = fake.server.update.clone() else {
        return not_implemented("NamespacesClient::update");
    };
    fake.ctx
        .dispatch(move || match req.json() {
            Ok(body) => respond(
                callback(&p.resource_group_name, &p.namespace_name, body),
                &[200, 201, 202],
            ),
            Err(response) => response,
        })
        .await
}

async fn list_namespaces(State(fake): State<Fake<NamespacesServer>>, req: FakeRequest) -> Response {
    let Some(callback) = fake.server.list.clone() else {
        return not_implemented("NamespacesClient::new_list_pager");
    };
    let ctx = fake.ctx.clone();
    fake.ctx
        .dispatch(move || ctx.next_page(&req, &[200], || callback()))
        .await
}

async fn list_namespaces_by_group(
    State(fake): State<Fake<NamespacesServer>>,
    Path(p): Path<ResourceGroupParams>,
    req: FakeRequest,
) -> Response {
    let Some(callback) = fake.server.list_by_resource_group.clone() else {
        return not_implemented("NamespacesClient::new_list_by_resource_group_pager");
    };
    let ctx = fake.ctx.clone();
    fake.ctx
        .dispatch(move || ctx.next_page(&req, &[200], || callback(&p.resource_group_name)))
        .await
}

async fn check_name_availability(State(fake): State<Fake<NamespacesServer>>, req: FakeRequest) -> Response {
    let Some(callback) = fake.server.check_name_availability.clone() else {
        return not_implemented("NamespacesClient::check_name_availability");
    };
    fake.ctx
        .dispatch(move || match req.json() {
            Ok(body) => respond(callback(body), &[200]),
            Err(response) => response,
        })
        .await
}

/// All Event Hubs fakes behind one server.
#[derive(Debug, Clone, Default)]
pub struct ServerFactory {
    /// Fake for the Event Hubs client.
    pub event_hubs_server: EventHubsServer,
    /// Fake for the namespaces client.
    pub namespaces_server: NamespacesServer,
}

impl FakeService for ServerFactory {
    fn routes(self: Arc<Self>, ctx: &FakeContext) -> Router {
        let factory = Arc::unwrap_or_clone(self);
        Arc::new(factory.event_hubs_server)
            .routes(ctx)
            .merge(Arc::new(factory.namespaces_server).routes(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::server::router;
    use crate::fake::{ErrorResponder, Responder};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    const HUB_URI: &str = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.EventHub/namespaces/ns/eventhubs/my%20hub?api-version=2024-05-01-preview";

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("host", "127.0.0.1:9")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_path_parameters_are_decoded() {
        let fake = EventHubsServer::default().with_get(|rg, ns, hub| {
            assert_eq!((rg, ns), ("rg", "ns"));
            Ok(Responder::new(200, Eventhub {
                name: Some(hub.to_string()),
                ..Default::default()
            }))
        });
        let app = router(fake, &FakeContext::default());

        let response = app.oneshot(get_request(HUB_URI)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["name"], "my hub");
    }

    #[tokio::test]
    async fn test_missing_callback_is_not_implemented() {
        let app = router(EventHubsServer::default(), &FakeContext::default());

        let response = app.oneshot(get_request(HUB_URI)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(
            body_json(response).await["error"]["message"],
            "fake for method EventHubsClient::get not implemented"
        );
    }

    #[tokio::test]
    async fn test_error_responder() {
        let fake = EventHubsServer::default()
            .with_get(|_, _, _| Err(ErrorResponder::new(404, "EntityNotFound")));
        let app = router(fake, &FakeContext::default());

        let response = app.oneshot(get_request(HUB_URI)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["x-ms-error-code"], "EntityNotFound");
    }

    #[tokio::test]
    async fn test_unexpected_status() {
        let fake = EventHubsServer::default()
            .with_get(|_, _, _| Ok(Responder::new(201, Eventhub::default())));
        let app = router(fake, &FakeContext::default());

        let response = app.oneshot(get_request(HUB_URI)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["error"]["message"],
            "unexpected status code 201. acceptable values are 200"
        );
    }

    #[tokio::test]
    async fn test_factory_routes_both_servers() {
        let factory = ServerFactory {
            namespaces_server: NamespacesServer::default()
                .with_get(|_, ns| Ok(Responder::new(200, EHNamespace {
                    name: Some(ns.to_string()),
                    ..Default::default()
                }))),
            ..Default::default()
        };
        let app = router(factory, &FakeContext::default());

        let response = app
            .clone()
            .oneshot(get_request(
                "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.EventHub/namespaces/ns?api-version=1",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get_request(HUB_URI)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }
}
