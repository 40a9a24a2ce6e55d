//! In-memory transport for unit tests.

use std::collections::VecDeque;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Reply, Transport};

/// Replays queued replies in order and records every request it executes.
/// An exhausted script answers with `NoResponse`.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    replies: VecDeque<Reply>,
    seen: Vec<HttpRequest>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_ok(&mut self, status: u16, body: &str) {
        self.replies.push_back(Ok(HttpResponse::new(status, body)));
    }

    pub(crate) fn push_err(&mut self, err: TransportError) {
        self.replies.push_back(Err(err));
    }

    pub(crate) fn requests(&self) -> &[HttpRequest] {
        &self.seen
    }
}

impl Transport for ScriptedTransport {
    fn execute(&mut self, request: &HttpRequest) -> Reply {
        self.seen.push(request.clone());
        self.replies
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::NoResponse("script exhausted".into())))
    }
}
