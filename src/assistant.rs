//! # College Assistant Module
//!
//! This module answers questions about the college from the knowledge map.
//! Every question goes through two completion requests:
//!
//! 1. Ranking: the model picks up to three URLs out of every known URL
//! 2. Answering: the model answers from the text of those pages
//!
//! ## Key Components
//!
//! - `CollegeAssistant`: Holds the client, the knowledge map and the configuration
//! - `rank_urls`: URL ranking with JSON validation and bounded retries
//! - `generate_answer`: Answer generation from page texts
//!
//! ## Failure Handling
//!
//! `CollegeAssistant::try_ask` reports ranking and answering failures as
//! errors. `CollegeAssistant::ask` always produces a reply: a failed ranking
//! is answered without context and a failed answer becomes a fixed apology.

mod answer;
mod error;
mod prompts;
mod ranker;

pub use answer::generate_answer;
pub use error::{AnswerError, RankError};
pub use prompts::{answer_preamble, question_prompt, ranking_preamble, render_context};
pub use ranker::{MAX_RANKED_URLS, parse_ranked_urls, rank_urls};

use rig::{
    agent::AgentBuilder,
    completion::{Completion as _, CompletionError, CompletionModel},
    message::{AssistantContent, Message},
};
use serde::Serialize;
use tracing::{debug, error, instrument, warn};

use crate::config::AssistantConfig;
use crate::error::Result;
use crate::knowledge::KnowledgeMap;
use crate::model::Client;

/// Reply shown when no answer could be generated
pub const FALLBACK_ANSWER: &str = "An error occurred while processing your request.";

/// Send one completion request at temperature 0 and return its text
///
/// Transport and provider failures are retried up to `max_retries` times
/// without delay.
async fn complete_text<C>(
    model: &C,
    preamble: &str,
    prompt: &str,
    max_retries: u32,
) -> std::result::Result<String, CompletionError>
where
    C: CompletionModel + Clone,
{
    let agent = AgentBuilder::new(model.clone())
        .preamble(preamble)
        .temperature(0.0)
        .build();

    let mut retries_left = max_retries;
    loop {
        let result = match agent.completion(Message::user(prompt), Vec::new()).await {
            Ok(builder) => builder.send().await,
            Err(e) => Err(e),
        };

        match result {
            Ok(response) => {
                let text = response
                    .choice
                    .iter()
                    .filter_map(|c| match c {
                        AssistantContent::Text(text) => Some(text.text.clone()),
                        _ => {
                            warn!(tool_call=?c, "Model attempted non-text response");
                            None
                        }
                    })
                    .collect::<Vec<String>>()
                    .join("\n");
                return Ok(text);
            }
            Err(e @ (CompletionError::HttpError(_) | CompletionError::ProviderError(_)))
                if retries_left > 0 =>
            {
                warn!(error = %e, retries_left, "Completion failed, retrying");
                retries_left -= 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// An answer together with the pages it was generated from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    /// Reply text of the model
    pub text: String,

    /// URLs chosen by the ranking step
    pub sources: Vec<String>,
}

/// Answers questions about the college from a prebuilt knowledge map
#[derive(Debug, Clone)]
pub struct CollegeAssistant<C>
where
    C: CompletionModel,
{
    client: Client<C>,
    knowledge: KnowledgeMap,
    config: AssistantConfig,
}

impl<C> CollegeAssistant<C>
where
    C: CompletionModel + Clone,
{
    /// Create an assistant over a knowledge map
    pub fn new(client: Client<C>, knowledge: KnowledgeMap, config: AssistantConfig) -> Self {
        Self {
            client,
            knowledge,
            config,
        }
    }

    /// Get the knowledge map reference
    pub fn knowledge(&self) -> &KnowledgeMap {
        &self.knowledge
    }

    /// Get the configuration reference
    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Rank the known URLs for a question
    pub async fn rank(&self, question: &str) -> std::result::Result<Vec<String>, RankError> {
        rank_urls(
            self.client.completion(),
            question,
            &self.knowledge.urls(),
            self.config.json_retries,
            self.config.max_retries,
        )
        .await
    }

    /// Answer from the pages behind the given URLs
    pub async fn answer_from(
        &self,
        question: &str,
        urls: &[String],
    ) -> std::result::Result<String, AnswerError> {
        let contents: Vec<Option<&str>> = urls.iter().map(|url| self.knowledge.get(url)).collect();
        for (url, content) in urls.iter().zip(&contents) {
            if content.is_none() {
                debug!("Ranked URL {} is not in the knowledge map", url);
            }
        }

        generate_answer(
            self.client.completion(),
            &self.config.institution,
            question,
            &contents,
            self.config.max_retries,
        )
        .await
    }

    /// Answer a question, reporting any failure
    #[instrument(skip(self))]
    pub async fn try_ask(&self, question: &str) -> Result<Answer> {
        let sources = self.rank(question).await?;
        let text = self.answer_from(question, &sources).await?;
        Ok(Answer { text, sources })
    }

    /// Answer a question, falling back instead of failing
    #[instrument(skip(self))]
    pub async fn ask(&self, question: &str) -> Answer {
        let sources = self.rank(question).await.unwrap_or_else(|e| {
            error!("Error in ranking: {}", e);
            Vec::new()
        });

        let text = self
            .answer_from(question, &sources)
            .await
            .unwrap_or_else(|e| {
                error!("Error in chatbot_response: {}", e);
                FALLBACK_ANSWER.to_string()
            });

        Answer { text, sources }
    }
}
