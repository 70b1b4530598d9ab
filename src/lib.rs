//! # collegebot - Question answering over a college website
//!
//! This crate crawls a college website, cleans the text of each page and
//! answers natural-language questions about the college. Answers are produced
//! by a two-stage LLM pipeline: the model first picks the most relevant pages
//! out of every known URL, then writes an answer from the text of those pages.
//!
//! ## Features
//!
//! - Sitemap collection and URL filtering
//! - Breadth-first link crawling from a seed page
//! - Batched HTML fetching and HTML to text conversion
//! - Site-specific header and footer stripping
//! - An in-memory knowledge map built once and then read-only
//! - LLM URL ranking with JSON validation and bounded retries
//! - Answer generation with a fixed fallback message
//!
//! ## Example
//!
//! ```rust,no_run
//! use collegebot::assistant::CollegeAssistant;
//! use collegebot::config::AssistantConfig;
//! use collegebot::knowledge::KnowledgeMap;
//! use collegebot::model::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AssistantConfig::from_env();
//!     let client = Client::new_gemini_from_env(&config)?;
//!
//!     // Crawl the sitemaps once; the map is read-only afterwards
//!     let knowledge = KnowledgeMap::build(&config).await?;
//!     let assistant = CollegeAssistant::new(client, knowledge, config);
//!
//!     let answer = assistant.ask("Who is the head of the cs department?").await;
//!     println!("{}", answer.text);
//!     Ok(())
//! }
//! ```

mod error;
pub mod assistant;
pub mod config;
pub mod crawler;
pub mod knowledge;
pub mod model;

pub use error::Error;

/// Re-export of types module for public use
pub mod prelude {
    pub use crate::assistant::CollegeAssistant;
    pub use crate::config::AssistantConfig;
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::knowledge::KnowledgeMap;
}
