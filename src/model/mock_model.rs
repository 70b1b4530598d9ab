//! # Mock Completion Model for Testing
//!
//! Provides a `MockCompletionModel` that implements the `CompletionModel` trait
//! for use in tests. Replies are scripted up front: queued replies are served
//! first, then the fallback reply is returned for every further call. Every
//! call is counted so retry behaviour can be asserted.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rig::{
    completion::{
        AssistantContent, CompletionError, CompletionModel, CompletionRequest, CompletionResponse,
    },
    one_or_many::OneOrMany,
};
use tokio::sync::Mutex;

/// A scripted reply: text, or a provider failure with a message
type Reply = Result<String, String>;

/// A mock completion model for testing purposes.
#[derive(Debug, Clone)]
pub struct MockCompletionModel {
    queued: Arc<Mutex<VecDeque<Reply>>>,
    fallback: Arc<Mutex<Reply>>,
    calls: Arc<AtomicUsize>,
}

impl MockCompletionModel {
    /// Creates a new mock model that replies with empty text.
    pub fn new() -> Self {
        Self {
            queued: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Arc::new(Mutex::new(Ok(String::new()))),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sets the reply returned once the queue is drained.
    pub async fn set_text_response(&self, text: &str) {
        *self.fallback.lock().await = Ok(text.to_string());
    }

    /// Makes every call fail once the queue is drained.
    pub async fn set_error_response(&self, message: &str) {
        *self.fallback.lock().await = Err(message.to_string());
    }

    /// Queues a text reply for the next call.
    pub async fn push_text_response(&self, text: &str) {
        self.queued.lock().await.push_back(Ok(text.to_string()));
    }

    /// Queues a provider failure for the next call.
    pub async fn push_error_response(&self, message: &str) {
        self.queued.lock().await.push_back(Err(message.to_string()));
    }

    /// Number of completion calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockCompletionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionModel for MockCompletionModel {
    type Response = String;

    async fn completion(
        &self,
        _completion_request: CompletionRequest,
    ) -> Result<CompletionResponse<Self::Response>, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let queued = self.queued.lock().await.pop_front();
        let reply = match queued {
            Some(reply) => reply,
            None => self.fallback.lock().await.clone(),
        };
        match reply {
            Ok(text) => Ok(CompletionResponse {
                choice: OneOrMany::one(AssistantContent::text(&text)),
                raw_response: text,
            }),
            Err(message) => Err(CompletionError::ProviderError(message)),
        }
    }
}
