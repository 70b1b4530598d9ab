//! # Website Crawler Module
//!
//! This module gathers the raw material for the knowledge map: it discovers
//! page URLs, fetches their HTML, converts it to plain text and strips the
//! boilerplate every page of the college site shares.
//!
//! ## Key Components
//!
//! - `fetch_sitemap_urls`: Collects `<loc>` entries from an XML sitemap
//! - `filter_urls`: Drops archive pages, documents, images and fragments
//! - `crawl_subpages`: Breadth-first link discovery from a seed page
//! - `extract_pages`: Batched HTML fetch and HTML to text conversion
//! - `ContentCleaner`: Header and footer removal
//!
//! ## Usage
//!
//! The sitemap path feeds the knowledge map used to answer questions. The
//! link crawler is an alternate discovery path used to dump the site text
//! to a file.

mod cleaner;
mod config;
mod error;
mod extraction;
mod filter;
mod link_crawler;
mod sitemap;

pub use cleaner::ContentCleaner;
pub use config::{
    CRAWL_FOOTER_PATTERN, CrawlerConfig, CrawlerConfigBuilder, DEFAULT_FOOTER_PATTERN,
    DEFAULT_HEADER_PATTERN,
};
pub use error::CrawlError;
pub use extraction::{extract_pages, html_to_text};
pub use filter::{filter_urls, is_excluded};
pub use link_crawler::{crawl_subpages, is_valid_subpage, save_site_text};
pub use sitemap::{fetch_sitemap_urls, parse_sitemap};

use serde::{Deserialize, Serialize};

/// Plain text of a fetched page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// URL the page was fetched from
    pub url: String,

    /// Text rendering of the page HTML
    pub content: String,
}

/// Build the HTTP client shared by every crawler request
pub fn http_client(config: &CrawlerConfig) -> Result<reqwest::Client, CrawlError> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.request_timeout())
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_text() {
        let page = PageText {
            url: "https://site/a/".to_string(),
            content: "About us".to_string(),
        };

        assert_eq!(page.url, "https://site/a/");
        assert_eq!(page.content, "About us");
    }

    #[test]
    fn test_http_client_builds_from_config() {
        let config = CrawlerConfig::builder().user_agent("collegebot-test").build();
        assert!(http_client(&config).is_ok());
    }
}
