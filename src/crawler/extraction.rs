//! Page fetching and text conversion for the crawler module

use futures::{StreamExt, stream};
use tracing::{debug, info, instrument, warn};

use crate::crawler::error::CrawlError;
use crate::crawler::{CrawlerConfig, PageText};

/// Fetch the HTML of a single page
#[instrument(skip(client))]
pub(crate) async fn fetch_html(client: &reqwest::Client, url: &str) -> Result<String, CrawlError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CrawlError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.text().await?)
}

/// Convert HTML to plain text
///
/// List items render as `* item` lines, the shape the header pattern expects.
pub fn html_to_text(html: &str, width: usize) -> Result<String, CrawlError> {
    html2text::from_read(html.as_bytes(), width)
        .map_err(|e| CrawlError::ContentExtraction(e.to_string()))
}

/// Fetch a batch of pages and convert each one to text
///
/// Pages are fetched concurrently, bounded by the configured concurrency, and
/// returned in input order. A page that fails to fetch or convert is logged and
/// left out of the result.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `urls` - The pages to fetch
/// * `config` - The crawler configuration
///
/// # Returns
///
/// The text of every page that was fetched, or an error when a non-empty
/// batch produced no page at all
#[instrument(skip_all, fields(batch = urls.len()))]
pub async fn extract_pages(
    client: &reqwest::Client,
    urls: &[String],
    config: &CrawlerConfig,
) -> Result<Vec<PageText>, CrawlError> {
    info!("Extracting data from {} URLs...", urls.len());

    let results: Vec<Result<PageText, CrawlError>> = stream::iter(urls)
        .map(|url| async move {
            let html = fetch_html(client, url).await?;
            let content = html_to_text(&html, config.text_width)?;
            Ok::<_, CrawlError>(PageText {
                url: url.clone(),
                content,
            })
        })
        .buffered(config.fetch_concurrency.max(1))
        .collect()
        .await;

    let mut pages = Vec::with_capacity(results.len());
    for (url, result) in urls.iter().zip(results) {
        match result {
            Ok(page) => pages.push(page),
            Err(e) => warn!("Dropping {}: {}", url, e),
        }
    }

    if pages.is_empty() && !urls.is_empty() {
        return Err(CrawlError::ContentExtraction(format!(
            "none of the {} pages could be extracted",
            urls.len()
        )));
    }

    debug!("Extracted {} documents.", pages.len());
    Ok(pages)
}
