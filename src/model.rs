//! # LLM Client Module
//!
//! This module provides the client used for every completion request of the
//! assistant, with built-in rate limiting to prevent API quota exhaustion.
//!
//! ## Key Components
//!
//! - `Client`: A client wrapping the completion model
//! - `ThrottledCompletionModel`: A wrapper that spends one quota permit per request and counts requests
//!
//! ## Features
//!
//! - Configurable completion quota per minute
//! - Running count of completion requests, reported after a session
//! - API key loaded from the `API_KEY` environment variable
//! - Instrumentation with tracing spans for monitoring
//! - Type-safe model integration with the `rig` framework

use std::num::NonZeroU32;

use governor::{Quota, RateLimiter};
use rig::{completion::CompletionModel, providers::gemini};

use crate::config::{AssistantConfig, api_key_from_env};
use crate::error::Result;

#[cfg(test)]
pub(crate) mod mock_model;
pub mod throttled;

pub use throttled::{RequestCounter, ThrottledCompletionModel};

#[derive(Debug, Clone)]
pub struct Client<C>
where
    C: CompletionModel,
{
    completion_model: C,
}

impl Client<ThrottledCompletionModel<gemini::completion::CompletionModel>> {
    pub fn new_gemini_from_env(config: &AssistantConfig) -> Result<Self> {
        let api_key = api_key_from_env()?;
        let gemini_client = gemini::Client::new(&api_key);
        Ok(Self::new_gemini(gemini_client, config))
    }

    pub fn new_gemini(gemini_client: gemini::Client, config: &AssistantConfig) -> Self {
        let quota = NonZeroU32::new(config.completion_quota_per_minute).unwrap_or(NonZeroU32::MIN);
        let completion_model = ThrottledCompletionModel::new(
            gemini_client.completion_model(&config.model),
            RateLimiter::direct(Quota::per_minute(quota)),
        );
        Self { completion_model }
    }

    /// Count of completion requests sent by this client and its clones
    pub fn requests(&self) -> RequestCounter {
        self.completion_model.requests()
    }
}

impl<C> Client<C>
where
    C: CompletionModel,
{
    /// Wrap an already configured completion model
    pub fn new(completion_model: C) -> Self {
        Self { completion_model }
    }

    pub fn completion(&self) -> &C {
        &self.completion_model
    }
}
