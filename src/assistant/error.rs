//! Error types for the assistant module

use crate::error::Error as CrateError;
use rig::completion::CompletionError;
use thiserror::Error;

/// Errors that can occur while ranking URLs for a question
#[derive(Debug, Error)]
pub enum RankError {
    /// The completion request itself failed
    #[error("Ranking request failed: {0}")]
    Completion(#[from] CompletionError),

    /// Every reply of the model was not the expected JSON document
    #[error("Model returned malformed JSON on all {attempts} attempts: {source}")]
    MalformedResponse {
        /// Number of requests made
        attempts: u32,
        /// Parse error of the last reply
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that can occur while generating an answer
#[derive(Debug, Error)]
pub enum AnswerError {
    /// The completion request itself failed
    #[error("Answer request failed: {0}")]
    Completion(#[from] CompletionError),
}

impl From<RankError> for CrateError {
    fn from(err: RankError) -> Self {
        CrateError::Rank(err.to_string())
    }
}

impl From<AnswerError> for CrateError {
    fn from(err: AnswerError) -> Self {
        CrateError::Answer(err.to_string())
    }
}
