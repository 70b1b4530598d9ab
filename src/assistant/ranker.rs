//! URL ranking: narrows every known URL down to the few worth reading

use rig::completion::CompletionModel;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use super::complete_text;
use super::error::RankError;
use super::prompts::{question_prompt, ranking_preamble};

/// Maximum number of URLs handed to the answer generator
pub const MAX_RANKED_URLS: usize = 3;

/// Shape of the ranking reply
#[derive(Debug, Deserialize)]
struct RankedUrls {
    #[serde(default)]
    urls: Vec<String>,
}

/// Parse a ranking reply, tolerating a Markdown `json` code fence around it
///
/// Only a reply that is not JSON at all is an error. A JSON document of the
/// wrong shape, such as a bare array or a `null` list, ranks nothing.
pub fn parse_ranked_urls(reply: &str) -> Result<Vec<String>, serde_json::Error> {
    let unfenced = reply.replace("```json\n", "").replace("\n```", "");
    let document: serde_json::Value = serde_json::from_str(&unfenced)?;
    let mut urls = match serde_json::from_value::<RankedUrls>(document) {
        Ok(ranked) => ranked.urls,
        Err(e) => {
            warn!("Ranking reply has an unexpected shape: {}", e);
            return Ok(Vec::new());
        }
    };
    if urls.len() > MAX_RANKED_URLS {
        debug!("Model ranked {} URLs, keeping {}", urls.len(), MAX_RANKED_URLS);
        urls.truncate(MAX_RANKED_URLS);
    }
    Ok(urls)
}

/// Ask the model for the URLs most relevant to a question
///
/// A reply that is not the expected JSON document triggers a fresh request,
/// up to `json_retries` times. A failed request is not retried here; transport
/// retries happen per request, up to `max_retries` times.
///
/// # Returns
///
/// Up to three URLs, most relevant first. An empty list means the model found
/// nothing relevant.
#[instrument(skip(model, urls), fields(candidates = urls.len()))]
pub async fn rank_urls<C>(
    model: &C,
    question: &str,
    urls: &[&str],
    json_retries: u32,
    max_retries: u32,
) -> Result<Vec<String>, RankError>
where
    C: CompletionModel + Clone,
{
    info!("Fetching top 3 URLs for question: {}", question);
    if urls.is_empty() {
        debug!("No candidate URLs, skipping ranking request");
        return Ok(Vec::new());
    }

    let preamble = ranking_preamble(urls);
    let prompt = question_prompt(question);
    let attempts = json_retries + 1;

    let mut attempt = 1;
    loop {
        let reply = complete_text(model, &preamble, &prompt, max_retries).await?;
        debug!("Ranking reply: {}", reply);

        match parse_ranked_urls(&reply) {
            Ok(ranked) => {
                debug!("Top 3 URLs: {:?}", ranked);
                return Ok(ranked);
            }
            Err(e) if attempt < attempts => {
                error!("JSON decode error: {}", e);
                info!("Retrying ranking, retries left: {}", attempts - attempt);
                attempt += 1;
            }
            Err(e) => {
                error!("Max retries exceeded for ranking: {}", e);
                return Err(RankError::MalformedResponse {
                    attempts,
                    source: e,
                });
            }
        }
    }
}
