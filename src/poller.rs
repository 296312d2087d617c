//! Long-running operation polling.
//!
//! A `begin_*` operation returns a [`Poller`] built from its initial
//! response. The poller works out how the service reports progress, polls
//! until a terminal state is reached and then fetches the final result.
//!
//! Supported progress reporting, checked in this order:
//!
//! 1. `Fake-Poller-Status` header, sent by the fake servers
//! 2. `Azure-AsyncOperation` header
//! 3. `Operation-Location` header
//! 4. `Location` header
//! 5. `properties.provisioningState` in the body of a PUT or PATCH
//!
//! A 202 to any other method without a polling URL is an error, since the
//! operation was accepted but can't be tracked. Any other initial response
//! is treated as already complete.

use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::ArmClient;
use crate::error::{ArmError, Result};
use crate::request::{ArmRequest, RawResponse};

/// Default delay between polls when the service doesn't suggest one.
pub const DEFAULT_POLL_FREQUENCY: Duration = Duration::from_secs(30);

/// Header carrying the operation status on fake server responses.
pub const FAKE_POLLER_STATUS: &str = "Fake-Poller-Status";

/// Path suffix the fake servers serve poll requests on.
pub const FAKE_STATUS_SUFFIX: &str = "/get/fake/status";

const AZURE_ASYNC_OPERATION: &str = "Azure-AsyncOperation";
const OPERATION_LOCATION: &str = "Operation-Location";
const LOCATION: &str = "Location";

pub(crate) const STATUS_IN_PROGRESS: &str = "InProgress";
pub(crate) const STATUS_SUCCEEDED: &str = "Succeeded";
pub(crate) const STATUS_FAILED: &str = "Failed";
pub(crate) const STATUS_CANCELED: &str = "Canceled";

/// Status codes a poll response may carry.
const VALID_POLL_CODES: &[u16] = &[200, 201, 202, 204];

/// Where the final result of a long-running operation is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinalStateVia {
    /// The body of the `Azure-AsyncOperation` status monitor.
    AzureAsyncOperation,
    /// A GET of the `Location` header URL.
    Location,
    /// A GET of the original request URL.
    OriginalUri,
    /// A GET of the `Operation-Location` resource location.
    OperationLocation,
}

/// Options for [`Poller::poll_until_done`].
#[derive(Debug, Clone, Default)]
pub struct PollUntilDoneOptions {
    /// Delay between polls when the service sends no `Retry-After`.
    /// Defaults to [`DEFAULT_POLL_FREQUENCY`].
    pub frequency: Option<Duration>,
}

impl PollUntilDoneOptions {
    /// Poll with a fixed frequency.
    pub fn with_frequency(frequency: Duration) -> Self {
        Self {
            frequency: Some(frequency),
        }
    }
}

/// Returns true for `Succeeded`, `Failed` and `Canceled`, ignoring case.
pub fn is_terminal_state(status: &str) -> bool {
    is_succeeded(status) || is_failed(status)
}

fn is_succeeded(status: &str) -> bool {
    status.eq_ignore_ascii_case(STATUS_SUCCEEDED)
}

fn is_failed(status: &str) -> bool {
    status.eq_ignore_ascii_case(STATUS_FAILED) || status.eq_ignore_ascii_case(STATUS_CANCELED)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
enum Strategy {
    Fake,
    AsyncOperation,
    OperationLocation,
    Location,
    Body,
    Done,
}

/// Everything needed to continue polling; this is what a resume token holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PollState {
    strategy: Strategy,
    method: String,
    original_url: Url,
    poll_url: Url,
    location: Option<Url>,
    resource_location: Option<Url>,
    final_state_via: Option<FinalStateVia>,
    status: String,
}

/// Polls a long-running operation to completion.
pub struct Poller<T> {
    client: ArmClient,
    state: PollState,
    last: Option<RawResponse>,
    _result: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for Poller<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Poller")
            .field("strategy", &self.state.strategy)
            .field("status", &self.state.status)
            .field("poll_url", &self.state.poll_url.as_str())
            .finish_non_exhaustive()
    }
}

impl<T: DeserializeOwned + Default> Poller<T> {
    /// Build a poller from the initial response of a long-running operation.
    ///
    /// The response must already have passed the operation's status check.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::UnsupportedPollingResponse`] if a polling header
    /// holds an invalid URL or a 202 carries no polling URL at all, or a
    /// parse error if the body is malformed.
    pub fn new(
        client: ArmClient,
        response: RawResponse,
        final_state_via: Option<FinalStateVia>,
    ) -> Result<Self> {
        let method = response.method.as_str().to_string();
        let original_url = response.url.clone();
        let location = header_url(&response, LOCATION)?;

        let (strategy, poll_url, status) = if let Some(status) = response.header(FAKE_POLLER_STATUS) {
            let mut url = original_url.clone();
            let path = format!("{}{FAKE_STATUS_SUFFIX}", url.path());
            url.set_path(&path);
            (Strategy::Fake, url, status.to_string())
        } else if let Some(url) = header_url(&response, AZURE_ASYNC_OPERATION)? {
            let status = provisioning_state(&response)?
                .unwrap_or_else(|| STATUS_IN_PROGRESS.to_string());
            (Strategy::AsyncOperation, url, status)
        } else if let Some(url) = header_url(&response, OPERATION_LOCATION)? {
            let status = provisioning_state(&response)?
                .unwrap_or_else(|| STATUS_IN_PROGRESS.to_string());
            (Strategy::OperationLocation, url, status)
        } else if let Some(url) = location.clone() {
            (Strategy::Location, url, initial_state(&response)?)
        } else if response.method == Method::PUT || response.method == Method::PATCH {
            (Strategy::Body, original_url.clone(), initial_state(&response)?)
        } else if response.status == 202 {
            return Err(ArmError::UnsupportedPollingResponse(
                "response is missing polling URL".to_string(),
            ));
        } else {
            (Strategy::Done, original_url.clone(), STATUS_SUCCEEDED.to_string())
        };

        tracing::debug!(?strategy, %status, "created poller");

        Ok(Self {
            client,
            state: PollState {
                strategy,
                method,
                original_url,
                poll_url,
                location,
                resource_location: None,
                final_state_via,
                status,
            },
            last: Some(response),
            _result: PhantomData,
        })
    }

    /// Rebuild a poller from a token returned by [`resume_token`](Self::resume_token).
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::InvalidResumeToken`] if the token is malformed.
    pub fn from_resume_token(client: ArmClient, token: &str) -> Result<Self> {
        let state: PollState = serde_json::from_str(token)
            .map_err(|e| ArmError::InvalidResumeToken(e.to_string()))?;
        if state.strategy == Strategy::Done {
            return Err(ArmError::InvalidResumeToken(
                "token describes a completed operation".to_string(),
            ));
        }
        Method::from_bytes(state.method.as_bytes())
            .map_err(|_| ArmError::InvalidResumeToken(format!("invalid method '{}'", state.method)))?;

        Ok(Self {
            client,
            state,
            last: None,
            _result: PhantomData,
        })
    }

    /// Whether the operation reached a terminal state.
    pub fn done(&self) -> bool {
        is_terminal_state(&self.state.status)
    }

    /// The last status reported by the service.
    pub fn status(&self) -> &str {
        &self.state.status
    }

    /// Serialize the poller so it can be resumed later, possibly in another process.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::PollerDone`] once the operation has finished.
    pub fn resume_token(&self) -> Result<String> {
        if self.done() {
            return Err(ArmError::PollerDone);
        }
        Ok(serde_json::to_string(&self.state)?)
    }

    /// Poll the operation once and return the raw status response.
    ///
    /// Once the operation is done no request is sent and the last response
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns the service's error if the poll fails or the operation
    /// reached `Failed` or `Canceled`.
    #[tracing::instrument(skip(self), fields(status = %self.state.status))]
    pub async fn poll(&mut self) -> Result<RawResponse> {
        if self.done() {
            return self.last.clone().ok_or(ArmError::PollerDone);
        }

        let request = ArmRequest::new(Method::GET, self.state.poll_url.clone());
        let response = self.client.send(&request).await?;
        self.last = Some(response.clone());

        let status = match self.state.strategy {
            Strategy::Location => location_state(&response)?,
            _ if !response.has_status(VALID_POLL_CODES) => return Err(response.into_error()),
            Strategy::Fake => response
                .header(FAKE_POLLER_STATUS)
                .map(str::to_string)
                .ok_or_else(|| {
                    ArmError::UnsupportedPollingResponse(format!(
                        "response is missing {FAKE_POLLER_STATUS} header"
                    ))
                })?,
            Strategy::AsyncOperation | Strategy::OperationLocation => {
                let body = response.json_value();
                if self.state.strategy == Strategy::OperationLocation {
                    if let Some(rl) = body.get("resourceLocation").and_then(|v| v.as_str()) {
                        self.state.resource_location = Some(Url::parse(rl)?);
                    }
                }
                body.get("status")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        ArmError::UnsupportedPollingResponse(
                            "status monitor response is missing the status property".to_string(),
                        )
                    })?
            }
            Strategy::Body => body_state(&response)?,
            Strategy::Done => STATUS_SUCCEEDED.to_string(),
        };

        if self.state.strategy == Strategy::Location {
            if let Some(url) = header_url(&response, LOCATION)? {
                self.state.poll_url = url;
            }
        }

        tracing::debug!(http_status = response.status, %status, "polled operation");
        self.state.status = status;

        if is_failed(&self.state.status) {
            return Err(response.into_error());
        }
        Ok(response)
    }

    /// Fetch the final result.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::PollerNotDone`] before the operation is done, or
    /// the service's error if it failed.
    pub async fn result(&mut self) -> Result<T> {
        if !self.done() {
            return Err(ArmError::PollerNotDone);
        }
        if is_failed(&self.state.status) {
            return Err(self.failure());
        }

        let final_url = match self.final_get_url() {
            FinalGet::Empty => return Ok(T::default()),
            FinalGet::Last => None,
            FinalGet::Url(url) => Some(url),
        };

        if let Some(url) = final_url {
            tracing::debug!(%url, "fetching final result");
            let request = ArmRequest::new(Method::GET, url);
            self.last = Some(self.client.send(&request).await?);
        }

        let Some(response) = self.last.as_ref() else {
            return Ok(T::default());
        };
        if !response.has_status(VALID_POLL_CODES) {
            return Err(response.clone().into_error());
        }
        if response.status == 204 {
            return Ok(T::default());
        }
        response.json()
    }

    /// Poll until the operation is done, then return its result.
    ///
    /// Between polls it sleeps for the delay suggested by the service's
    /// `Retry-After` headers, or the configured frequency.
    ///
    /// # Errors
    ///
    /// Returns the first error from polling or from fetching the result.
    pub async fn poll_until_done(&mut self, options: Option<&PollUntilDoneOptions>) -> Result<T> {
        let frequency = options
            .and_then(|o| o.frequency)
            .unwrap_or(DEFAULT_POLL_FREQUENCY);

        if self.done() {
            return self.result().await;
        }

        loop {
            self.poll().await?;
            if self.done() {
                return self.result().await;
            }

            let delay = self
                .last
                .as_ref()
                .and_then(retry_after)
                .unwrap_or(frequency);
            tracing::debug!(delay_ms = delay.as_millis() as u64, "waiting before next poll");
            tokio::time::sleep(delay).await;
        }
    }

    fn failure(&self) -> ArmError {
        match &self.last {
            Some(response) => response.clone().into_error(),
            None => ArmError::UnsupportedPollingResponse(format!(
                "operation finished with status {}",
                self.state.status
            )),
        }
    }

    fn final_get_url(&self) -> FinalGet {
        let state = &self.state;
        let method = state.method.as_str();
        let put_or_patch = method == "PUT" || method == "PATCH";

        if method == "DELETE" {
            return FinalGet::Empty;
        }

        match state.strategy {
            Strategy::Fake | Strategy::Location | Strategy::Body | Strategy::Done => FinalGet::Last,
            Strategy::AsyncOperation => {
                if put_or_patch {
                    FinalGet::Url(state.original_url.clone())
                } else if method == "POST" {
                    match (state.final_state_via, &state.location) {
                        (Some(FinalStateVia::AzureAsyncOperation), _) => FinalGet::Last,
                        (Some(FinalStateVia::OriginalUri), _) => {
                            FinalGet::Url(state.original_url.clone())
                        }
                        (_, Some(location)) => FinalGet::Url(location.clone()),
                        (_, None) => FinalGet::Last,
                    }
                } else {
                    FinalGet::Last
                }
            }
            Strategy::OperationLocation => {
                if let (Some(FinalStateVia::Location), Some(location)) =
                    (state.final_state_via, &state.location)
                {
                    FinalGet::Url(location.clone())
                } else if let Some(resource_location) = &state.resource_location {
                    FinalGet::Url(resource_location.clone())
                } else if put_or_patch {
                    FinalGet::Url(state.original_url.clone())
                } else if let (true, Some(location)) = (method == "POST", &state.location) {
                    FinalGet::Url(location.clone())
                } else {
                    FinalGet::Last
                }
            }
        }
    }
}

enum FinalGet {
    /// The operation has no result body.
    Empty,
    /// The result is the last response received.
    Last,
    /// The result must be fetched from this URL.
    Url(Url),
}

fn header_url(response: &RawResponse, name: &str) -> Result<Option<Url>> {
    match response.header(name) {
        Some(value) if !value.is_empty() => Url::parse(value).map(Some).map_err(|_| {
            ArmError::UnsupportedPollingResponse(format!("invalid polling URL '{value}' in {name}"))
        }),
        _ => Ok(None),
    }
}

/// Reads `properties.provisioningState` from the body, if there is one.
fn provisioning_state(response: &RawResponse) -> Result<Option<String>> {
    if response.is_empty_body() {
        return Ok(None);
    }
    let body: serde_json::Value = serde_json::from_slice(&response.body)?;
    Ok(body
        .get("properties")
        .and_then(|p| p.get("provisioningState"))
        .and_then(|s| s.as_str())
        .map(str::to_string))
}

/// State implied by an initial response without a status monitor.
fn initial_state(response: &RawResponse) -> Result<String> {
    let provisioning = provisioning_state(response)?;
    let status = match (response.status, provisioning) {
        (200 | 201, Some(state)) => state,
        (200, None) | (204, _) => STATUS_SUCCEEDED.to_string(),
        _ => STATUS_IN_PROGRESS.to_string(),
    };
    Ok(status)
}

fn location_state(response: &RawResponse) -> Result<String> {
    let provisioning = if (200..300).contains(&response.status) {
        provisioning_state(response).unwrap_or(None)
    } else {
        None
    };
    let status = match (response.status, provisioning) {
        (_, Some(state)) => state,
        (202, None) => STATUS_IN_PROGRESS.to_string(),
        (200..=299, None) => STATUS_SUCCEEDED.to_string(),
        _ => STATUS_FAILED.to_string(),
    };
    Ok(status)
}

fn body_state(response: &RawResponse) -> Result<String> {
    let status = match response.status {
        204 => STATUS_SUCCEEDED.to_string(),
        202 => STATUS_IN_PROGRESS.to_string(),
        _ => provisioning_state(response)?.unwrap_or_else(|| STATUS_SUCCEEDED.to_string()),
    };
    Ok(status)
}

/// Delay requested by the service, from `retry-after-ms`,
/// `x-ms-retry-after-ms` or `Retry-After` (seconds or an HTTP date).
pub(crate) fn retry_after(response: &RawResponse) -> Option<Duration> {
    for name in ["retry-after-ms", "x-ms-retry-after-ms"] {
        if let Some(ms) = response.header(name).and_then(|v| v.trim().parse::<u64>().ok()) {
            if ms > 0 {
                return Some(Duration::from_millis(ms));
            }
        }
    }

    let value = response.header("retry-after")?.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return (secs > 0).then(|| Duration::from_secs(secs));
    }
    let at = DateTime::parse_from_rfc2822(value).ok()?.with_timezone(&Utc);
    (at - Utc::now()).to_std().ok().filter(|d| !d.is_zero())
}
