//! Error types for ARM operations.

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

const SEPARATOR: &str =
    "--------------------------------------------------------------------------------";

/// Errors that can occur during ARM operations.
#[derive(Debug, Error)]
pub enum ArmError {
    /// Configuration is missing or incomplete.
    #[error("ARM configuration required: {0}")]
    ConfigMissing(String),

    /// A required path parameter was empty.
    #[error("parameter {0} cannot be empty")]
    EmptyParameter(&'static str),

    /// A resource ID could not be parsed.
    #[error("invalid resource ID '{0}'")]
    InvalidResourceId(String),

    /// The service answered with a status code outside the operation's allow-list.
    #[error("{0}")]
    Response(Box<ResponseError>),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The credential could not produce a token.
    #[error("credential error: {0}")]
    Credential(String),

    /// `next_page` was called after the last page.
    #[error("no more pages")]
    NoMorePages,

    /// `result` was called before the long-running operation finished.
    #[error("poller is in a non-terminal state")]
    PollerNotDone,

    /// A resume token was requested from a finished poller.
    #[error("poller is in a terminal state")]
    PollerDone,

    /// The resume token is malformed.
    #[error("invalid resume token: {0}")]
    InvalidResumeToken(String),

    /// The initial response of a long-running operation can't be polled.
    #[error("unsupported polling response: {0}")]
    UnsupportedPollingResponse(String),
}

impl ArmError {
    /// Returns the HTTP status code when this is a [`ResponseError`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ArmError::Response(err) => Some(err.status_code),
            _ => None,
        }
    }

    /// Returns the ARM error code when this is a [`ResponseError`] that carried one.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            ArmError::Response(err) => err.error_code.as_deref(),
            _ => None,
        }
    }
}

impl From<ResponseError> for ArmError {
    fn from(err: ResponseError) -> Self {
        ArmError::Response(Box::new(err))
    }
}

/// An HTTP response whose status code the operation did not accept.
///
/// The raw response details are kept so callers can inspect them; the
/// [`Display`](fmt::Display) output matches the layout used across the
/// Azure SDKs.
#[derive(Debug, Clone)]
pub struct ResponseError {
    /// Request method.
    pub method: String,
    /// Request URL, without the query string.
    pub url: String,
    /// Response status code.
    pub status_code: u16,
    /// ARM error code from `x-ms-error-code` or the body's `error.code`.
    pub error_code: Option<String>,
    /// Raw response body.
    pub body: String,
}

impl ResponseError {
    /// Returns the `error.message` field of the body, if any.
    pub fn message(&self) -> Option<String> {
        let json: serde_json::Value = serde_json::from_str(&self.body).ok()?;
        json.get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = StatusCode::from_u16(self.status_code)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("");

        writeln!(f, "{} {}", self.method, self.url)?;
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "RESPONSE {}: {} {}", self.status_code, self.status_code, reason)?;
        writeln!(
            f,
            "ERROR CODE: {}",
            self.error_code.as_deref().unwrap_or("UNAVAILABLE")
        )?;
        writeln!(f, "{SEPARATOR}")?;
        if self.body.trim().is_empty() {
            writeln!(f, "Response contained no body")?;
        } else {
            match serde_json::from_str::<serde_json::Value>(&self.body) {
                Ok(json) => writeln!(
                    f,
                    "{}",
                    serde_json::to_string_pretty(&json).unwrap_or_else(|_| self.body.clone())
                )?,
                Err(_) => writeln!(f, "{}", self.body)?,
            }
        }
        write!(f, "{SEPARATOR}")
    }
}

/// Result type alias for ARM operations.
pub type Result<T> = core::result::Result<T, ArmError>;
