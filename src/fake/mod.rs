//! Fake ARM services for tests.
//!
//! Each fake server mirrors one client: it has an optional callback per
//! operation, set with a `with_*` builder. A [`FakeServer`] serves them over
//! real HTTP on a local port, so the regular clients, pagers and pollers can
//! be exercised end to end without touching Azure.
//!
//! Callbacks return a [`Responder`] (or [`PagerResponder`] /
//! [`PollerResponder`] for list and long-running operations), or an
//! [`ErrorResponder`] to simulate a service error. Operations without a
//! callback answer 501, and a status outside the operation's allow-list
//! answers 500.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use armsdk::fake::{eventhub::EventHubsServer, FakeServer, Responder};
//! use armsdk::eventhub::{ClientFactory, Eventhub};
//! use armsdk::FakeCredential;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fake = EventHubsServer::default().with_get(|_rg, _ns, name| {
//!     Ok(Responder::new(200, Eventhub {
//!         name: Some(name.to_string()),
//!         ..Default::default()
//!     }))
//! });
//! let server = FakeServer::start(fake).await?;
//!
//! let factory = ClientFactory::new("sub", Arc::new(FakeCredential), server.client_options())?;
//! let hub = factory.new_event_hubs_client().get("rg", "ns", "hub").await?;
//! assert_eq!(hub.name.as_deref(), Some("hub"));
//!
//! server.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod compute;
pub mod dashboard;
pub mod eventhub;
pub mod resources;
mod responder;
mod server;
mod tracker;

use serde::Deserialize;

pub use responder::{ErrorResponder, PagerResponder, PollerResponder, Responder, FAKE_POLLER_IN_PROGRESS};
pub use server::{FakeContext, FakeServer, FakeService};

/// What a single-shot fake callback returns.
pub type FakeResult<T> = Result<Responder<T>, ErrorResponder>;

/// What a long-running fake callback returns.
pub type FakePollerResult<T> = Result<PollerResponder<T>, ErrorResponder>;

/// Path parameters of routes scoped to a resource group.
#[derive(Debug, Deserialize)]
pub(crate) struct ResourceGroupParams {
    pub(crate) resource_group_name: String,
}

/// Route prefix for resource-group-scoped resources of a provider.
macro_rules! rg_route {
    ($provider:literal, $rest:literal) => {
        concat!(
            "/subscriptions/:subscription_id/resourceGroups/:resource_group_name/providers/",
            $provider,
            $rest
        )
    };
}

/// Route prefix for subscription-scoped resources of a provider.
macro_rules! sub_route {
    ($provider:literal, $rest:literal) => {
        concat!("/subscriptions/:subscription_id/providers/", $provider, $rest)
    };
}

pub(crate) use {rg_route, sub_route};

/// Set-callback field lists are long; show which ones are set.
macro_rules! debug_callbacks {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let mut set = Vec::new();
                $(
                    if self.$field.is_some() {
                        set.push(stringify!($field));
                    }
                )*
                f.debug_struct(stringify!($ty)).field("callbacks", &set).finish()
            }
        }
    };
}

pub(crate) use debug_callbacks;
