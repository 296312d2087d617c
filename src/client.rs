//! ARM request pipeline.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Service clients build [`ArmRequest`]s and hand them to [`ArmClient`],
//! which sends them and checks the status code against the operation's
//! allow-list.

use std::sync::Arc;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::credential::{TokenCredential, ARM_SCOPE};
use crate::error::{ArmError, Result};
use crate::options::ClientOptions;
use crate::poller::{FinalStateVia, Poller};
use crate::request::{join_paths, ArmRequest, RawResponse, UrlPath};

const USER_AGENT: &str = concat!("armsdk/", env!("CARGO_PKG_VERSION"));

/// Shared ARM pipeline.
///
/// Owns the HTTP connection pool, the endpoint and the credential. Every
/// service client created from a factory holds a clone; clones share the
/// same underlying connection pool.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use armsdk::{ArmClient, ClientOptions, StaticTokenCredential};
///
/// # fn example() -> armsdk::Result<()> {
/// let credential = Arc::new(StaticTokenCredential::new("token"));
/// let client = ArmClient::new(credential, ClientOptions::default())?;
/// assert_eq!(client.endpoint().as_str(), "https://management.azure.com/");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ArmClient {
    http: Client,
    endpoint: Arc<Url>,
    credential: Arc<dyn TokenCredential>,
}

impl std::fmt::Debug for ArmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArmClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl ArmClient {
    /// Create a pipeline with the given credential and options.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL.
    pub fn new(credential: Arc<dyn TokenCredential>, options: ClientOptions) -> Result<Self> {
        let endpoint = Url::parse(options.resolved_endpoint())?;

        let user_agent = match &options.application_id {
            Some(id) => format!("{id} {USER_AGENT}"),
            None => USER_AGENT.to_string(),
        };

        let http = Client::builder()
            .user_agent(user_agent)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(options.timeout)
            .build()
            .map_err(ArmError::Http)?;

        Ok(Self {
            http,
            endpoint: Arc::new(endpoint),
            credential,
        })
    }

    /// Get the endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Start a request for an expanded URL path, with `api-version` set.
    pub(crate) fn request(
        &self,
        method: reqwest::Method,
        path: &UrlPath,
        api_version: &str,
    ) -> Result<ArmRequest> {
        let url = join_paths(&self.endpoint, path.as_str())?;
        Ok(ArmRequest::new(method, url).query("api-version", api_version))
    }

    /// Send a request and read the whole response.
    ///
    /// Transport errors are returned as-is; the status code is not checked.
    #[tracing::instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    pub async fn send(&self, request: &ArmRequest) -> Result<RawResponse> {
        let token = self.credential.get_token(&[ARM_SCOPE]).await?;

        let mut builder = self
            .http
            .request(request.method().clone(), request.url().clone())
            .bearer_auth(&token.token)
            .header(ACCEPT, "application/json");

        if let Some(body) = request.body() {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_vec());
        }

        let response = builder.send().await.map_err(ArmError::Http)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(ArmError::Http)?.to_vec();

        tracing::debug!(status, bytes = body.len(), "received response");

        Ok(RawResponse {
            method: request.method().clone(),
            url: request.url().clone(),
            status,
            headers,
            body,
        })
    }

    /// Send a request and require one of the `allowed` status codes.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::Response`] for any other status code.
    pub async fn execute(&self, request: &ArmRequest, allowed: &[u16]) -> Result<RawResponse> {
        let response = self.send(request).await?;
        Self::check_status(response, allowed)
    }

    /// Start a long-running operation, or resume one from `resume_token`
    /// without sending anything.
    pub(crate) async fn begin<T: DeserializeOwned + Default>(
        &self,
        request: impl FnOnce() -> Result<ArmRequest>,
        allowed: &[u16],
        final_state_via: Option<FinalStateVia>,
        resume_token: Option<&str>,
    ) -> Result<Poller<T>> {
        if let Some(token) = resume_token {
            tracing::debug!("resuming poller from token");
            return Poller::from_resume_token(self.clone(), token);
        }
        let request = request()?;
        let response = self.execute(&request, allowed).await?;
        Poller::new(self.clone(), response, final_state_via)
    }

    /// Check a response status against an allow-list.
    pub(crate) fn check_status(response: RawResponse, allowed: &[u16]) -> Result<RawResponse> {
        if response.has_status(allowed) {
            return Ok(response);
        }
        tracing::debug!(status = response.status, ?allowed, "unexpected status code");
        Err(response.into_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::StaticTokenCredential;

    fn client(endpoint: &str) -> ArmClient {
        ArmClient::new(
            Arc::new(StaticTokenCredential::new("test-token")),
            ClientOptions::with_endpoint(endpoint),
        )
        .unwrap()
    }

    #[test]
    fn test_client_debug() {
        let debug = format!("{:?}", client("https://management.azure.com"));
        assert!(debug.contains("ArmClient"));
        assert!(debug.contains("endpoint"));
        // Token should not be in debug output
        assert!(!debug.contains("test-token"));
    }

    #[test]
    fn test_request_sets_api_version() {
        let client = client("https://management.azure.com/");
        let path = UrlPath::new("/subscriptions/{subscriptionId}")
            .subscription("sub")
            .unwrap();
        let req = client
            .request(reqwest::Method::GET, &path, "2023-09-01")
            .unwrap();
        assert_eq!(
            req.url().as_str(),
            "https://management.azure.com/subscriptions/sub?api-version=2023-09-01"
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = ArmClient::new(
            Arc::new(StaticTokenCredential::new("t")),
            ClientOptions::with_endpoint("not a url"),
        );
        assert!(matches!(result, Err(ArmError::Url(_))));
    }
}
