//! Header and footer removal for extracted page text

use regex::Regex;
use tracing::{debug, instrument};

use crate::crawler::config::{CrawlerConfig, DEFAULT_FOOTER_PATTERN, DEFAULT_HEADER_PATTERN};
use crate::crawler::error::CrawlError;

/// Strips the navigation header and the contact footer shared by every page
///
/// Patterns are compiled once when the cleaner is built, so an invalid custom
/// pattern is reported at startup and cleaning itself cannot fail.
#[derive(Debug, Clone)]
pub struct ContentCleaner {
    header: Regex,
    footer: Regex,
}

impl ContentCleaner {
    /// Create a cleaner from header and footer regexes
    pub fn new(header_pattern: &str, footer_pattern: &str) -> Result<Self, CrawlError> {
        Ok(Self {
            header: Regex::new(header_pattern)?,
            footer: Regex::new(footer_pattern)?,
        })
    }

    /// Create a cleaner from the patterns of a crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, CrawlError> {
        Self::new(&config.header_pattern, &config.footer_pattern)
    }

    /// Remove the header block, trimming surrounding whitespace
    pub fn remove_header(&self, content: &str) -> String {
        self.header.replace_all(content, "").trim().to_string()
    }

    /// Remove the footer block, trimming surrounding whitespace
    pub fn remove_footer(&self, content: &str) -> String {
        self.footer.replace_all(content, "").trim().to_string()
    }

    /// Remove the header, then the footer
    #[instrument(skip_all, fields(len = content.len()))]
    pub fn clean(&self, content: &str) -> String {
        let cleaned = self.remove_footer(&self.remove_header(content));
        debug!("Cleaned content from {} to {} bytes", content.len(), cleaned.len());
        cleaned
    }
}

impl Default for ContentCleaner {
    fn default() -> Self {
        Self {
            header: Regex::new(DEFAULT_HEADER_PATTERN).expect("default header pattern is valid"),
            footer: Regex::new(DEFAULT_FOOTER_PATTERN).expect("default footer pattern is valid"),
        }
    }
}
