//! In-memory transport that replays canned responses.
//!
//! Used by the session and facade tests (and handy for view prototyping)
//! to exercise every backend path without a server. Each `(method, path)`
//! pair has its own reply queue; the last reply in a queue is sticky so a
//! single `on_get` serves any number of identical requests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::{HttpTransport, Method, TransportError};

/// A canned reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// 2xx with this body.
    Body(Vec<u8>),
    /// Non-2xx with this status and body.
    Status(u16, String),
    /// The request never reached the backend.
    Unreachable,
}

impl MockReply {
    /// A 2xx reply carrying a JSON text body.
    pub fn json(body: &str) -> Self {
        Self::Body(body.as_bytes().to_vec())
    }

    fn into_result(self) -> Result<Vec<u8>, TransportError> {
        match self {
            Self::Body(body) => Ok(body),
            Self::Status(status, body) => Err(TransportError::Status { status, body }),
            Self::Unreachable => Err(TransportError::Request("connection refused".into())),
        }
    }
}

/// A request observed by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl RecordedRequest {
    /// Looks up a query parameter by name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct MockState {
    replies: HashMap<(Method, String), VecDeque<MockReply>>,
    requests: Vec<RecordedRequest>,
}

/// A [`HttpTransport`] backed by reply queues instead of a network.
///
/// Unconfigured routes answer `404`.
#[derive(Default)]
pub struct MockTransport {
    state: Mutex<MockState>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for `GET path`.
    pub fn on_get(&self, path: &str, reply: MockReply) -> &Self {
        self.push(Method::Get, path, reply)
    }

    /// Queues a reply for `POST path`.
    pub fn on_post(&self, path: &str, reply: MockReply) -> &Self {
        self.push(Method::Post, path, reply)
    }

    /// Every request seen so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.lock().requests.last().cloned()
    }

    fn push(&self, method: Method, path: &str, reply: MockReply) -> &Self {
        self.lock()
            .replies
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the recorded requests
        // from the assertions that follow.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn respond(&self, request: RecordedRequest) -> Result<Vec<u8>, TransportError> {
        let mut state = self.lock();
        let key = (request.method, request.path.clone());
        state.requests.push(request);

        let reply = match state.replies.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        reply
            .unwrap_or_else(|| MockReply::Status(404, format!("no route for {} {}", key.0, key.1)))
            .into_result()
    }
}

impl HttpTransport for MockTransport {
    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<u8>, TransportError> {
        self.respond(RecordedRequest {
            method: Method::Get,
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
            body: None,
        })
    }

    async fn post(
        &self,
        path: &str,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError> {
        self.respond(RecordedRequest {
            method: Method::Post,
            path: path.to_string(),
            query: Vec::new(),
            body: Some(body),
        })
    }
}
