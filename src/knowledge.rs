//! # Knowledge Map
//!
//! The retrieval corpus of the assistant: a mapping from page URL to the
//! cleaned text of that page. It is built once, from the "pages" and "team"
//! sitemaps of the site, and only read afterwards.
//!
//! ## Build Process
//!
//! 1. Collect the URLs of both sitemaps
//! 2. Filter the "pages" URLs (team profiles are kept as listed)
//! 3. Fetch and convert every page to text
//! 4. Strip the shared header and footer
//! 5. Key each cleaned text by its source URL
//!
//! A sitemap or batch that fails is logged and contributes no pages, so a
//! partially reachable site still yields a usable map.

use std::collections::BTreeMap;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, instrument};

use crate::config::AssistantConfig;
use crate::crawler::{
    self, ContentCleaner, CrawlError, PageText, extract_pages, fetch_sitemap_urls, filter_urls,
};

/// Read-only mapping from page URL to cleaned page text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeMap {
    pages: BTreeMap<String, String>,
}

impl KnowledgeMap {
    /// Crawl the configured sitemaps and build the map
    #[instrument(skip_all)]
    pub async fn build(config: &AssistantConfig) -> Result<Self, CrawlError> {
        info!("Mapping URLs to content...");
        let client = crawler::http_client(&config.crawler)?;
        let cleaner = ContentCleaner::from_config(&config.crawler)?;

        let progress = ProgressBar::new(4);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .map_err(|e| CrawlError::Other(format!("Invalid progress template: {}", e)))?
                .progress_chars("##-"),
        );

        progress.set_message("Reading pages sitemap");
        let page_urls = filter_urls(collect_urls(&client, &config.pages_sitemap).await);
        progress.inc(1);

        progress.set_message("Reading team sitemap");
        let team_urls = collect_urls(&client, &config.team_sitemap).await;
        progress.inc(1);

        progress.set_message("Fetching pages");
        let pages = extract_batch(&client, &page_urls, config).await;
        progress.inc(1);

        progress.set_message("Fetching team profiles");
        let team = extract_batch(&client, &team_urls, config).await;
        progress.inc(1);
        progress.finish_and_clear();

        let knowledge = Self::from_pages(pages.into_iter().chain(team), &cleaner);
        info!("Mapped {} URLs to content.", knowledge.len());
        Ok(knowledge)
    }

    /// Build a map from already extracted pages
    ///
    /// Later pages replace earlier ones with the same URL.
    pub fn from_pages<I>(pages: I, cleaner: &ContentCleaner) -> Self
    where
        I: IntoIterator<Item = PageText>,
    {
        let pages = pages
            .into_iter()
            .map(|page| {
                let content = cleaner.clean(&page.content);
                (page.url, content)
            })
            .collect();
        Self { pages }
    }

    /// Every URL in the map
    pub fn urls(&self) -> Vec<&str> {
        self.pages.keys().map(String::as_str).collect()
    }

    /// Cleaned text of a page
    pub fn get(&self, url: &str) -> Option<&str> {
        self.pages.get(url).map(String::as_str)
    }

    /// Number of pages in the map
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the map holds no page
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl FromIterator<(String, String)> for KnowledgeMap {
    /// Collect already cleaned `(url, text)` pairs, e.g. fixture data
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            pages: iter.into_iter().collect(),
        }
    }
}

/// Sitemap URLs, or nothing when the sitemap cannot be read
async fn collect_urls(client: &reqwest::Client, sitemap_url: &str) -> Vec<String> {
    fetch_sitemap_urls(client, sitemap_url)
        .await
        .unwrap_or_else(|e| {
            error!("Error fetching URLs from sitemap {}: {}", sitemap_url, e);
            Vec::new()
        })
}

/// Extracted pages, or nothing when the whole batch fails
async fn extract_batch(
    client: &reqwest::Client,
    urls: &[String],
    config: &AssistantConfig,
) -> Vec<PageText> {
    extract_pages(client, urls, &config.crawler)
        .await
        .unwrap_or_else(|e| {
            error!("Error in extract_data: {}", e);
            Vec::new()
        })
}
