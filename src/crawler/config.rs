//! # Crawler Configuration Module
//!
//! This module provides configuration options for fetching and cleaning pages
//! of the college website. It uses a builder pattern for flexible configuration.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: The main configuration struct with crawler parameters
//! - `CrawlerConfigBuilder`: Builder pattern implementation for easier configuration
//!
//! ## Features
//!
//! - Defaults matching the Government Arts College, Salem site layout
//! - Control over fetch concurrency, timeouts and the user agent
//! - Regex patterns for the site header and footer boilerplate
//! - Crawl completeness switch for the link crawler

use std::time::Duration;

/// Header block of the site navigation, from the `* Home` entry to `* STUDENTS`
pub const DEFAULT_HEADER_PATTERN: &str = r"\* Home[\s\S]*?\* STUDENTS";

/// Footer block of the site, anchored on the office phone number and the postal address
pub const DEFAULT_FOOTER_PATTERN: &str =
    r"__0427-2413273[\s\S]*?Government Arts College \(Autonomous\),Salem-636007\s*__";

/// Footer block as rendered on pages reached by the link crawler
pub const CRAWL_FOOTER_PATTERN: &str = r"(?s)__\n\n### Who we are.*?__";

/// Configuration for the crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Maximum number of pages the link crawler visits
    pub max_pages: usize,

    /// Follow every qualifying link instead of one new link per visited page
    pub exhaustive: bool,

    /// Number of pages fetched concurrently within one batch
    pub fetch_concurrency: usize,

    /// Timeout for a single HTTP request in seconds
    pub request_timeout_secs: u64,

    /// User agent to use for requests
    pub user_agent: String,

    /// Line width used when rendering HTML as text
    pub text_width: usize,

    /// Regex for the header block stripped from every page
    pub header_pattern: String,

    /// Regex for the footer block stripped from every page
    pub footer_pattern: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 500,
            exhaustive: false,
            fetch_concurrency: 8,
            request_timeout_secs: 30,
            user_agent: format!("collegebot/{}", env!("CARGO_PKG_VERSION")),
            text_width: 1000,
            header_pattern: DEFAULT_HEADER_PATTERN.to_string(),
            footer_pattern: DEFAULT_FOOTER_PATTERN.to_string(),
        }
    }
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the maximum number of pages to crawl
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    /// Set whether the link crawler follows every qualifying link
    pub fn exhaustive(mut self, exhaustive: bool) -> Self {
        self.config.exhaustive = exhaustive;
        self
    }

    /// Set the number of concurrent page fetches
    pub fn fetch_concurrency(mut self, fetch_concurrency: usize) -> Self {
        self.config.fetch_concurrency = fetch_concurrency.max(1);
        self
    }

    /// Set the request timeout in seconds
    pub fn request_timeout_secs(mut self, request_timeout_secs: u64) -> Self {
        self.config.request_timeout_secs = request_timeout_secs;
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the text rendering width
    pub fn text_width(mut self, text_width: usize) -> Self {
        self.config.text_width = text_width;
        self
    }

    /// Set the header regex
    pub fn header_pattern(mut self, header_pattern: impl Into<String>) -> Self {
        self.config.header_pattern = header_pattern.into();
        self
    }

    /// Set the footer regex
    pub fn footer_pattern(mut self, footer_pattern: impl Into<String>) -> Self {
        self.config.footer_pattern = footer_pattern.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }

    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
