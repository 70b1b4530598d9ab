use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use governor::DefaultDirectRateLimiter;
use rig::completion::{CompletionError, CompletionModel, CompletionRequest, CompletionResponse};
use tracing::{Instrument, debug, debug_span, info_span, warn};

/// Shared count of the completion requests sent through a throttled model
#[derive(Debug, Clone, Default)]
pub struct RequestCounter(Arc<AtomicU64>);

impl RequestCounter {
    /// Number of requests sent so far, failed ones included
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Completion model that spends one quota permit per request
///
/// When the per minute quota is used up the request waits for the next
/// permit instead of failing.
#[derive(Clone)]
pub struct ThrottledCompletionModel<M: CompletionModel> {
    model: M,
    quota: Arc<DefaultDirectRateLimiter>,
    requests: RequestCounter,
}

impl<M> ThrottledCompletionModel<M>
where
    M: CompletionModel,
{
    pub fn new(model: M, quota: DefaultDirectRateLimiter) -> Self {
        Self {
            model,
            quota: Arc::new(quota),
            requests: RequestCounter::default(),
        }
    }

    /// Handle on the request count, shared with every clone of this model
    pub fn requests(&self) -> RequestCounter {
        self.requests.clone()
    }
}

impl<M: CompletionModel> CompletionModel for ThrottledCompletionModel<M> {
    type Response = M::Response;

    async fn completion(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse<Self::Response>, CompletionError> {
        if self.quota.check().is_err() {
            warn!("Completion quota used up, waiting for the next permit");
            self.quota
                .until_ready()
                .instrument(debug_span!("quota_wait"))
                .await;
        }

        let number = self.requests.next();
        debug!("Sending completion request #{}", number);
        let response = self
            .model
            .completion(request)
            .instrument(info_span!("completion", request = number))
            .await;
        if let Err(e) = &response {
            warn!("Completion request #{} failed: {}", number, e);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::mock_model::MockCompletionModel;
    use governor::{Quota, RateLimiter};
    use rig::completion::AssistantContent;
    use std::num::NonZeroU32;

    fn quota(per_minute: u32) -> DefaultDirectRateLimiter {
        RateLimiter::direct(Quota::per_minute(NonZeroU32::new(per_minute).unwrap()))
    }

    #[tokio::test]
    async fn test_forwards_choice() {
        let mock = MockCompletionModel::new();
        mock.set_text_response("forwarded").await;
        let model = ThrottledCompletionModel::new(mock.clone(), quota(60));

        let response = model.completion_request("hi").send().await.unwrap();

        let text: Vec<String> = response
            .choice
            .iter()
            .filter_map(|c| match c {
                AssistantContent::Text(text) => Some(text.text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(text, vec!["forwarded".to_string()]);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_counts_requests_across_clones() {
        let mock = MockCompletionModel::new();
        mock.push_error_response("service unavailable").await;
        mock.set_text_response("ok").await;
        let model = ThrottledCompletionModel::new(mock, quota(60));
        let requests = model.requests();
        let copy = model.clone();

        assert!(model.completion_request("first").send().await.is_err());
        assert!(copy.completion_request("second").send().await.is_ok());

        assert_eq!(requests.get(), 2);
        assert_eq!(copy.requests().get(), 2);
    }
}
