//! Canned responses returned by fake callbacks.

use std::collections::VecDeque;

use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use url::Url;

use crate::models::ErrorResponse;
use crate::poller::STATUS_SUCCEEDED;

/// Value of the fake poller header while an operation is still running.
pub const FAKE_POLLER_IN_PROGRESS: &str = "FakePollerInProgress";

const ERROR_CODE_HEADER: &str = "x-ms-error-code";

const POLLER_STATUS_HEADER: HeaderName = HeaderName::from_static("fake-poller-status");

/// A successful response for a single-shot operation.
#[derive(Debug, Clone)]
pub struct Responder<T> {
    status: u16,
    value: T,
    headers: HeaderMap,
}

impl<T> Responder<T> {
    /// Respond with `status` and `value` as the JSON body.
    pub fn new(status: u16, value: T) -> Self {
        Self {
            status,
            value,
            headers: HeaderMap::new(),
        }
    }

    /// Add a response header. Invalid names or values are ignored.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// The HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }
}

impl<T: Serialize> Responder<T> {
    pub(crate) fn into_response(self) -> Response {
        let mut response = json_response(self.status, &self.value);
        response.headers_mut().extend(self.headers);
        response
    }
}

/// An error response, as the service would send for a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponder {
    status: u16,
    error_code: String,
    message: Option<String>,
}

impl ErrorResponder {
    /// Respond with `status` and the ARM error code `error_code`.
    pub fn new(status: u16, error_code: impl Into<String>) -> Self {
        Self {
            status,
            error_code: error_code.into(),
            message: None,
        }
    }

    /// Set the `error.message` of the body.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The ARM error code.
    pub fn error_code(&self) -> &str {
        &self.error_code
    }
}

impl IntoResponse for ErrorResponder {
    fn into_response(self) -> Response {
        let message = self
            .message
            .unwrap_or_else(|| format!("fake error {}", self.error_code));
        let body = ErrorResponse::new(self.error_code.clone(), message);
        let mut response = json_response(self.status, &body);
        if let Ok(code) = HeaderValue::from_str(&self.error_code) {
            response.headers_mut().insert(ERROR_CODE_HEADER, code);
        }
        response
    }
}

#[derive(Debug, Clone)]
enum PageEntry<T> {
    Page {
        status: u16,
        page: T,
        next_link: Option<String>,
    },
    Error(ErrorResponder),
}

/// An ordered sequence of pages and errors for a list operation.
///
/// The fake server fills in `nextLink` on every page but the last, so a
/// client pager walks the whole sequence.
#[derive(Debug, Clone)]
pub struct PagerResponder<T> {
    entries: VecDeque<PageEntry<T>>,
}

impl<T> Default for PagerResponder<T> {
    fn default() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }
}

impl<T> PagerResponder<T> {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page.
    pub fn add_page(&mut self, status: u16, page: T) -> &mut Self {
        self.entries.push_back(PageEntry::Page {
            status,
            page,
            next_link: None,
        });
        self
    }

    /// Append an error.
    pub fn add_error(&mut self, error: ErrorResponder) -> &mut Self {
        self.entries.push_back(PageEntry::Error(error));
        self
    }

    /// Whether any entries remain.
    pub fn more(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Point each page except the last at the next one.
    ///
    /// Links reuse the request URL with a `$skipToken` per page, so
    /// follow-up requests land on the same route.
    pub(crate) fn inject_next_links(&mut self, request_url: &Url) {
        let Some(last_page) = self
            .entries
            .iter()
            .rposition(|e| matches!(e, PageEntry::Page { .. }))
        else {
            return;
        };

        let mut page_number = 0;
        for entry in self.entries.iter_mut().take(last_page) {
            if let PageEntry::Page { next_link, .. } = entry {
                page_number += 1;
                *next_link = Some(fake_page_link(request_url, page_number));
            }
        }
    }
}

impl<T: Serialize> PagerResponder<T> {
    pub(crate) fn next_response(&mut self) -> Option<Step> {
        Some(match self.entries.pop_front()? {
            PageEntry::Page {
                status,
                page,
                next_link,
            } => {
                let mut value = serde_json::to_value(&page).unwrap_or(serde_json::Value::Null);
                if let (Some(link), Some(obj)) = (next_link, value.as_object_mut()) {
                    obj.insert("nextLink".to_string(), serde_json::Value::String(link));
                }
                Step::Checked(status, json_response(status, &value))
            }
            PageEntry::Error(err) => Step::Error(err.into_response()),
        })
    }
}

fn fake_page_link(request_url: &Url, page_number: usize) -> String {
    let mut url = request_url.clone();
    let kept: Vec<(String, String)> = request_url
        .query_pairs()
        .filter(|(k, _)| k != "$skipToken")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("$skipToken", &format!("fake-page-{page_number}"));
    url.to_string()
}

#[derive(Debug, Clone)]
enum NonTerminal {
    Status(u16),
    Error(ErrorResponder),
}

#[derive(Debug, Clone)]
enum Terminal<T> {
    Success(u16, T),
    Error(ErrorResponder),
}

/// The steps of a long-running operation: any number of in-progress
/// responses followed by a terminal success or error.
#[derive(Debug, Clone)]
pub struct PollerResponder<T> {
    non_terminal: VecDeque<NonTerminal>,
    terminal: Option<Terminal<T>>,
}

impl<T> Default for PollerResponder<T> {
    fn default() -> Self {
        Self {
            non_terminal: VecDeque::new(),
            terminal: None,
        }
    }
}

impl<T> PollerResponder<T> {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an in-progress response with the given status.
    pub fn add_non_terminal_response(&mut self, status: u16) -> &mut Self {
        self.non_terminal.push_back(NonTerminal::Status(status));
        self
    }

    /// Append a transient error. Polling continues after it.
    pub fn add_non_terminal_error(&mut self, error: ErrorResponder) -> &mut Self {
        self.non_terminal.push_back(NonTerminal::Error(error));
        self
    }

    /// Finish the operation successfully with `value` as the result.
    pub fn set_terminal_response(&mut self, status: u16, value: T) -> &mut Self {
        self.terminal = Some(Terminal::Success(status, value));
        self
    }

    /// Finish the operation with an error.
    pub fn set_terminal_error(&mut self, error: ErrorResponder) -> &mut Self {
        self.terminal = Some(Terminal::Error(error));
        self
    }

    /// Whether any steps remain.
    pub fn more(&self) -> bool {
        !self.non_terminal.is_empty() || self.terminal.is_some()
    }
}

/// One response taken from a pager or poller responder.
pub(crate) enum Step {
    /// A status the operation's allow-list applies to.
    Checked(u16, Response),
    /// An error, sent as-is.
    Error(Response),
}

impl<T: Serialize> PollerResponder<T> {
    pub(crate) fn next_response(&mut self) -> Option<Step> {
        if let Some(step) = self.non_terminal.pop_front() {
            return Some(match step {
                NonTerminal::Status(status) => {
                    let mut response = empty_response(status);
                    response.headers_mut().insert(
                        POLLER_STATUS_HEADER,
                        HeaderValue::from_static(FAKE_POLLER_IN_PROGRESS),
                    );
                    Step::Checked(status, response)
                }
                NonTerminal::Error(err) => Step::Error(err.into_response()),
            });
        }

        Some(match self.terminal.take()? {
            Terminal::Success(status, value) => {
                let mut response = json_response(status, &value);
                response.headers_mut().insert(
                    POLLER_STATUS_HEADER,
                    HeaderValue::from_static(STATUS_SUCCEEDED),
                );
                Step::Checked(status, response)
            }
            Terminal::Error(err) => Step::Error(err.into_response()),
        })
    }
}

/// A JSON response; values that serialize to `null` get an empty body.
pub(crate) fn json_response<T: Serialize + ?Sized>(status: u16, value: &T) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Null) => status.into_response(),
        Ok(value) => (status, axum::Json(value)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(ErrorResponse::new("FakeSerializationFailed", e.to_string())),
        )
            .into_response(),
    }
}

fn empty_response(status: u16) -> Response {
    StatusCode::from_u16(status)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pager::ListResult;
    use crate::poller::FAKE_POLLER_STATUS;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_responder_sets_code() {
        let response = ErrorResponder::new(404, "ResourceNotFound").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[ERROR_CODE_HEADER], "ResourceNotFound");
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "ResourceNotFound");
    }

    #[tokio::test]
    async fn test_pager_links_every_page_but_the_last() {
        let url = Url::parse("http://127.0.0.1:1234/subscriptions/s/things?api-version=1").unwrap();
        let mut pager = PagerResponder::new();
        pager
            .add_page(200, ListResult::new(vec![1], None))
            .add_error(ErrorResponder::new(503, "Busy"))
            .add_page(200, ListResult::new(vec![2], None))
            .add_page(200, ListResult::new(vec![3], None));
        pager.inject_next_links(&url);

        let Some(Step::Checked(200, first)) = pager.next_response() else {
            panic!("expected first page");
        };
        assert_eq!(
            body_json(first).await["nextLink"],
            "http://127.0.0.1:1234/subscriptions/s/things?api-version=1&%24skipToken=fake-page-1"
        );
        let Some(Step::Error(error)) = pager.next_response() else {
            panic!("expected error entry");
        };
        assert_eq!(error.status(), StatusCode::SERVICE_UNAVAILABLE);
        let Some(Step::Checked(_, second)) = pager.next_response() else {
            panic!("expected second page");
        };
        assert!(body_json(second).await["nextLink"]
            .as_str()
            .unwrap()
            .ends_with("fake-page-2"));
        let Some(Step::Checked(_, last)) = pager.next_response() else {
            panic!("expected last page");
        };
        assert!(body_json(last).await.get("nextLink").is_none());
        assert!(!pager.more());
    }

    #[test]
    fn test_poller_steps_in_order() {
        let mut poller = PollerResponder::new();
        poller
            .add_non_terminal_response(201)
            .add_non_terminal_error(ErrorResponder::new(429, "TooManyRequests"))
            .set_terminal_response(200, "done");

        match poller.next_response() {
            Some(Step::Checked(201, response)) => {
                assert_eq!(response.headers()[FAKE_POLLER_STATUS], FAKE_POLLER_IN_PROGRESS);
            }
            _ => panic!("expected in-progress step"),
        }
        assert!(matches!(poller.next_response(), Some(Step::Error(_))));
        match poller.next_response() {
            Some(Step::Checked(200, response)) => {
                assert_eq!(response.headers()[FAKE_POLLER_STATUS], STATUS_SUCCEEDED);
            }
            _ => panic!("expected terminal step"),
        }
        assert!(!poller.more());
        assert!(poller.next_response().is_none());
    }
}
