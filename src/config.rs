//! # Assistant Configuration Module
//!
//! Configuration for the whole question answering pipeline: where the
//! knowledge comes from, which model answers and how failures are retried.
//! Defaults reproduce the deployment for Government Arts College, Salem.
//!
//! Values are read from the process environment, after loading a `.env`
//! file when one is present.

use std::path::PathBuf;

use crate::crawler::CrawlerConfig;
use crate::error::{Error, Result};

/// Environment variable holding the LLM API key
pub const API_KEY_VAR: &str = "API_KEY";

/// Environment variable overriding the completion model
pub const MODEL_VAR: &str = "LLM_MODEL";

/// Configuration for the assistant
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Institution name used in the answer persona
    pub institution: String,

    /// Sitemap listing the regular pages of the site
    pub pages_sitemap: String,

    /// Sitemap listing the staff and faculty profiles
    pub team_sitemap: String,

    /// Seed page of the link crawler
    pub crawl_seed: String,

    /// File written by the link crawler
    pub output_path: PathBuf,

    /// Completion model name
    pub model: String,

    /// Extra ranking attempts after a malformed JSON reply
    pub json_retries: u32,

    /// Extra attempts after a transport or provider failure of a single call
    pub max_retries: u32,

    /// Completion requests allowed per minute
    pub completion_quota_per_minute: u32,

    /// Crawler settings
    pub crawler: CrawlerConfig,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            institution: "GAC Salem 7".to_string(),
            pages_sitemap: "https://gacsalem7.ac.in/wp-sitemap-posts-page-1.xml".to_string(),
            team_sitemap: "https://gacsalem7.ac.in/wp-sitemap-posts-our_team-1.xml".to_string(),
            crawl_seed: "https://gacsalem7.ac.in/staff/".to_string(),
            output_path: PathBuf::from("collage_data.txt"),
            model: "gemini-2.0-flash".to_string(),
            json_retries: 2,
            max_retries: 2,
            completion_quota_per_minute: 2000,
            crawler: CrawlerConfig::default(),
        }
    }
}

/// Builder for AssistantConfig
#[derive(Debug, Default)]
pub struct AssistantConfigBuilder {
    config: AssistantConfig,
}

impl AssistantConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: AssistantConfig::default(),
        }
    }

    /// Set the institution name
    pub fn institution(mut self, institution: impl Into<String>) -> Self {
        self.config.institution = institution.into();
        self
    }

    /// Set the sitemap of regular pages
    pub fn pages_sitemap(mut self, url: impl Into<String>) -> Self {
        self.config.pages_sitemap = url.into();
        self
    }

    /// Set the sitemap of staff profiles
    pub fn team_sitemap(mut self, url: impl Into<String>) -> Self {
        self.config.team_sitemap = url.into();
        self
    }

    /// Set the link crawler seed
    pub fn crawl_seed(mut self, url: impl Into<String>) -> Self {
        self.config.crawl_seed = url.into();
        self
    }

    /// Set the link crawler output file
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = path.into();
        self
    }

    /// Set the completion model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the number of ranking retries after malformed JSON
    pub fn json_retries(mut self, json_retries: u32) -> Self {
        self.config.json_retries = json_retries;
        self
    }

    /// Set the number of retries after a failed completion call
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// Set the completion quota per minute
    pub fn completion_quota_per_minute(mut self, quota: u32) -> Self {
        self.config.completion_quota_per_minute = quota;
        self
    }

    /// Set the crawler configuration
    pub fn crawler(mut self, crawler: CrawlerConfig) -> Self {
        self.config.crawler = crawler;
        self
    }

    /// Build the configuration
    pub fn build(self) -> AssistantConfig {
        self.config
    }
}

impl AssistantConfig {
    /// Create a new builder
    pub fn builder() -> AssistantConfigBuilder {
        AssistantConfigBuilder::new()
    }

    /// Default configuration with overrides from the environment
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        let mut config = Self::default();
        if let Ok(model) = dotenv::var(MODEL_VAR) {
            if !model.is_empty() {
                config.model = model;
            }
        }
        config
    }
}

/// Read the LLM API key from the environment
pub fn api_key_from_env() -> Result<String> {
    let _ = dotenv::dotenv();
    dotenv::var(API_KEY_VAR)
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| Error::Config(format!("{} environment variable must be set", API_KEY_VAR)))
}
