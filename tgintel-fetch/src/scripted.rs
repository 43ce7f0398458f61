//! Scripted transport for tests and offline runs.
//!
//! The queue and the call log use `std::sync::Mutex`: the accessors are
//! synchronous and no lock is held across an await.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::trace;

use crate::error::TransportError;
use crate::transport::{RawResponse, RequestDescriptor, Transport};

/// A [`Transport`] that replays queued results and records every request.
///
/// When the queue is empty, calls fail with [`TransportError::Unreachable`].
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    queue: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    calls: Mutex<Vec<RequestDescriptor>>,
}

impl ScriptedTransport {
    /// Creates an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn push_response(&self, response: RawResponse) {
        self.push(Ok(response));
    }

    /// Queues a 200 JSON response.
    pub fn push_json(&self, value: serde_json::Value) {
        self.push(Ok(RawResponse::ok_json(&value)));
    }

    /// Queues a failure.
    pub fn push_error(&self, error: TransportError) {
        self.push(Err(error));
    }

    fn push(&self, item: Result<RawResponse, TransportError>) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(item);
        }
    }

    /// Returns every request seen so far.
    pub fn calls(&self) -> Vec<RequestDescriptor> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Returns how many requests were made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn invoke(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError> {
        trace!(operation = request.operation, "Scripted invoke");
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }
        self.queue
            .lock()
            .ok()
            .and_then(|mut q| q.pop_front())
            .unwrap_or_else(|| Err(TransportError::Unreachable("no scripted response".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tgintel_core::ProviderId;
    use url::Url;

    fn request() -> RequestDescriptor {
        RequestDescriptor::get(
            ProviderId::BotsArchive,
            "bot_id_lookup",
            Url::parse("https://botsarchive.com/getBotID.php?username=%40x").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_replays_in_order() {
        let transport = ScriptedTransport::new();
        transport.push_json(serde_json::json!({"id": 1}));
        transport.push_response(RawResponse::new(500, "boom"));

        assert_eq!(transport.invoke(&request()).await.unwrap().status, 200);
        assert_eq!(transport.invoke(&request()).await.unwrap().status, 500);
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_queue_is_unreachable() {
        let transport = ScriptedTransport::new();
        let err = transport.invoke(&request()).await.unwrap_err();
        assert!(matches!(err, TransportError::Unreachable(_)));
        assert_eq!(transport.calls()[0].operation, "bot_id_lookup");
    }
}
