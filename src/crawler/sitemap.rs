//! Sitemap collection for the crawler module

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, info, instrument};

use crate::crawler::error::CrawlError;

/// Fetch an XML sitemap and return every `<loc>` entry in document order
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `sitemap_url` - URL of the sitemap document
///
/// # Returns
///
/// The URLs listed in the sitemap
#[instrument(skip(client))]
pub async fn fetch_sitemap_urls(
    client: &reqwest::Client,
    sitemap_url: &str,
) -> Result<Vec<String>, CrawlError> {
    info!("Fetching URLs from sitemap: {}", sitemap_url);

    let response = client.get(sitemap_url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CrawlError::Status {
            url: sitemap_url.to_string(),
            status: status.as_u16(),
        });
    }

    let xml = response.text().await?;
    let urls = parse_sitemap(&xml)?;

    debug!("Fetched {} URLs from {}", urls.len(), sitemap_url);
    Ok(urls)
}

/// Collect the text of every `<loc>` element of a sitemap document
///
/// Works for both `<urlset>` and `<sitemapindex>` documents since only the
/// `loc` elements are inspected.
pub fn parse_sitemap(xml: &str) -> Result<Vec<String>, CrawlError> {
    let mut reader = Reader::from_str(xml);
    let mut urls = Vec::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"loc" => {
                current = Some(String::new());
            }
            Ok(Event::Text(e)) => {
                if let Some(loc) = current.as_mut() {
                    let text = e
                        .unescape()
                        .map_err(|e| CrawlError::SitemapParse(e.to_string()))?;
                    loc.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(loc) = current.as_mut() {
                    loc.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"loc" => {
                if let Some(loc) = current.take() {
                    let loc = loc.trim();
                    if !loc.is_empty() {
                        urls.push(loc.to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(CrawlError::SitemapParse(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
    }

    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const URLSET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://site/a/</loc><lastmod>2024-01-01</lastmod></url>
  <url><loc>https://site/a.pdf</loc></url>
  <url><loc>
    https://site/a-2024-01-01/
  </loc></url>
</urlset>"#;

    #[test]
    fn test_parse_urlset() {
        let urls = parse_sitemap(URLSET).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://site/a/".to_string(),
                "https://site/a.pdf".to_string(),
                "https://site/a-2024-01-01/".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_sitemap_index_and_escapes() {
        let xml = r#"<sitemapindex><sitemap><loc>https://site/s.xml?a=1&amp;b=2</loc></sitemap></sitemapindex>"#;
        let urls = parse_sitemap(xml).unwrap();
        assert_eq!(urls, vec!["https://site/s.xml?a=1&b=2".to_string()]);
    }

    #[test]
    fn test_parse_without_locs() {
        assert!(parse_sitemap("<urlset></urlset>").unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed_xml() {
        let result = parse_sitemap("<urlset><url><loc>https://site/</url></urlset>");
        assert!(matches!(result, Err(CrawlError::SitemapParse(_))));
    }

    #[tokio::test]
    async fn test_fetch_sitemap_urls() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/sitemap.xml")
            .with_status(200)
            .with_header("content-type", "application/xml")
            .with_body(URLSET)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let urls = fetch_sitemap_urls(&client, &format!("{}/sitemap.xml", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(urls.len(), 3);
        assert_eq!(urls[0], "https://site/a/");
    }

    #[tokio::test]
    async fn test_fetch_sitemap_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing.xml")
            .with_status(404)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let result = fetch_sitemap_urls(&client, &format!("{}/missing.xml", server.url())).await;

        assert!(matches!(result, Err(CrawlError::Status { status: 404, .. })));
    }
}
