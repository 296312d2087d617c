//! Per-path state for multi-request fake operations.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use axum::response::Response;
use serde::Serialize;

use super::responder::{PagerResponder, PollerResponder, Step as ResponderStep};
use super::server::unexpected_status;
use crate::poller::FAKE_STATUS_SUFFIX;

/// One request's worth of progress through a pager or poller responder.
pub(crate) trait Step: Send {
    /// Produce the next response, and whether the entry is finished.
    fn next(&mut self) -> (Response, bool);
}

pub(crate) struct PagerStep<T> {
    responder: PagerResponder<T>,
    allowed: &'static [u16],
}

impl<T> PagerStep<T> {
    pub(crate) fn new(responder: PagerResponder<T>, allowed: &'static [u16]) -> Self {
        Self { responder, allowed }
    }
}

impl<T: Serialize + Send> Step for PagerStep<T> {
    fn next(&mut self) -> (Response, bool) {
        match self.responder.next_response() {
            Some(ResponderStep::Checked(status, _)) if !self.allowed.contains(&status) => {
                (unexpected_status(status, self.allowed), true)
            }
            Some(ResponderStep::Checked(_, response)) | Some(ResponderStep::Error(response)) => {
                (response, !self.responder.more())
            }
            None => (no_remaining_responses("PagerResponder"), true),
        }
    }
}

pub(crate) struct PollerStep<T> {
    responder: PollerResponder<T>,
    allowed: &'static [u16],
}

impl<T> PollerStep<T> {
    pub(crate) fn new(responder: PollerResponder<T>, allowed: &'static [u16]) -> Self {
        Self { responder, allowed }
    }
}

impl<T: Serialize + Send> Step for PollerStep<T> {
    fn next(&mut self) -> (Response, bool) {
        match self.responder.next_response() {
            Some(ResponderStep::Checked(status, _)) if !self.allowed.contains(&status) => {
                (unexpected_status(status, self.allowed), true)
            }
            Some(ResponderStep::Checked(_, response)) | Some(ResponderStep::Error(response)) => {
                (response, !self.responder.more())
            }
            None => (no_remaining_responses("PollerResponder"), true),
        }
    }
}

fn no_remaining_responses(kind: &str) -> Response {
    super::server::fake_error(500, "FakeNoResponses", format!("{kind} has no remaining responses"))
}

/// Responders in flight, keyed by request path.
///
/// Follow-up requests (next pages, fake status polls) share the path of the
/// request that created the entry; the fake status suffix is stripped.
#[derive(Default)]
pub(crate) struct Tracker {
    entries: Mutex<HashMap<String, Box<dyn Step>>>,
}

impl Tracker {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Box<dyn Step>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn key(path: &str) -> &str {
        path.strip_suffix(FAKE_STATUS_SUFFIX).unwrap_or(path)
    }

    pub(crate) fn contains(&self, path: &str) -> bool {
        self.lock().contains_key(Self::key(path))
    }

    pub(crate) fn insert(&self, path: &str, step: Box<dyn Step>) {
        self.lock().insert(Self::key(path).to_string(), step);
    }

    /// Advance the entry for `path`, removing it once finished.
    pub(crate) fn advance(&self, path: &str) -> Option<Response> {
        let key = Self::key(path);
        let mut entries = self.lock();
        let (response, finished) = entries.get_mut(key)?.next();
        if finished {
            entries.remove(key);
        }
        Some(response)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }
}
