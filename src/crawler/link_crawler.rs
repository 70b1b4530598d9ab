//! Breadth-first link crawler for the crawler module
//!
//! Discovery starts at a seed page and follows same-site links. Unless the
//! crawler is configured as exhaustive, only the first new qualifying link of
//! each visited page is queued, so a crawl does not reach the whole site.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::crawler::cleaner::ContentCleaner;
use crate::crawler::error::CrawlError;
use crate::crawler::extraction::extract_pages;
use crate::crawler::CrawlerConfig;

/// Host and port of a URL, the notion of "same site" used by the crawler
fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Check whether a discovered link should be crawled
///
/// A link qualifies when it is on the same site, is not a PDF, carries no
/// percent-encoded characters and ends with a slash.
pub fn is_valid_subpage(url: &str, base_domain: &str) -> bool {
    let same_domain = Url::parse(url)
        .ok()
        .and_then(|parsed| authority(&parsed))
        .is_some_and(|domain| domain == base_domain);

    same_domain && !url.ends_with(".pdf") && !url.contains('%') && url.ends_with('/')
}

/// Resolve every `<a href>` of a page against the page URL
fn extract_links(html: &str, page_url: &Url) -> Result<Vec<String>, CrawlError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]")
        .map_err(|e| CrawlError::HtmlParse(format!("Failed to parse link selector: {}", e)))?;

    Ok(document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| page_url.join(href).ok())
        .map(String::from)
        .collect())
}

/// Crawl the site from a seed page and return the visited pages in visit order
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `seed` - The page to start from
/// * `config` - The crawler configuration
///
/// # Returns
///
/// The URLs of every page that was visited
#[instrument(skip(client, config))]
pub async fn crawl_subpages(
    client: &reqwest::Client,
    seed: &str,
    config: &CrawlerConfig,
) -> Result<Vec<String>, CrawlError> {
    let seed_url = Url::parse(seed)?;
    let base_domain = authority(&seed_url)
        .ok_or_else(|| CrawlError::Other(format!("Seed URL has no host: {}", seed)))?;

    let mut visited = Vec::new();
    let mut visited_set = HashSet::new();
    let mut frontier = VecDeque::from([seed_url.to_string()]);
    let mut discovered = HashSet::new();

    while let Some(current) = frontier.pop_front() {
        if visited.len() >= config.max_pages {
            info!("Reached the page limit of {}", config.max_pages);
            break;
        }

        // A revisited page is fetched and scanned again; its already discovered
        // links are skipped, so it can queue a later link this time.
        info!("Visiting: {}", current);
        let response = client.get(&current).send().await?;
        let status = response.status();
        if visited_set.insert(current.clone()) {
            visited.push(current.clone());
        }
        if !status.is_success() {
            warn!("Skipping links of {}: status {}", current, status);
            continue;
        }
        let html = response.text().await?;

        let page_url = Url::parse(&current)?;
        for link in extract_links(&html, &page_url)? {
            if is_valid_subpage(&link, &base_domain) && !discovered.contains(&link) {
                debug!("Discovered: {}", link);
                discovered.insert(link.clone());
                frontier.push_back(link);
                if !config.exhaustive {
                    break;
                }
            }
        }
    }

    info!("Visited {} pages", visited.len());
    Ok(visited)
}

/// Crawl from a seed page and write the cleaned text of every page to a file
///
/// The cleaned pages are concatenated without a separator and the file is
/// overwritten on every run.
#[instrument(skip(client, config, cleaner))]
pub async fn save_site_text(
    client: &reqwest::Client,
    seed: &str,
    config: &CrawlerConfig,
    cleaner: &ContentCleaner,
    path: &Path,
) -> Result<PathBuf, CrawlError> {
    let urls = crawl_subpages(client, seed, config).await?;
    let pages = extract_pages(client, &urls, config).await?;

    let text: String = pages.iter().map(|page| cleaner.clean(&page.content)).collect();
    tokio::fs::write(path, text).await?;

    info!("Saved {} pages to {}", pages.len(), path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn page(links: &[&str]) -> String {
        let anchors: String = links
            .iter()
            .map(|href| format!(r#"<a href="{}">link</a>"#, href))
            .collect();
        format!("<html><body><p>Staff page</p>{}</body></html>", anchors)
    }

    #[test]
    fn test_is_valid_subpage() {
        let base = "gacsalem7.ac.in";
        assert!(is_valid_subpage("https://gacsalem7.ac.in/staff/", base));
        assert!(!is_valid_subpage("https://gacsalem7.ac.in/staff", base));
        assert!(!is_valid_subpage("https://gacsalem7.ac.in/doc.pdf", base));
        assert!(!is_valid_subpage("https://gacsalem7.ac.in/caf%C3%A9/", base));
        assert!(!is_valid_subpage("https://example.com/staff/", base));
        assert!(!is_valid_subpage("not a url/", base));
    }

    #[test]
    fn test_blog_links_still_qualify() {
        // Only the domain, PDF, percent and trailing slash checks apply here
        let base = "gacsalem7.ac.in";
        assert!(is_valid_subpage("https://gacsalem7.ac.in/blog/", base));
    }

    #[test]
    fn test_extract_links_resolves_relative() {
        let base = Url::parse("https://site/staff/").unwrap();
        let links = extract_links(&page(&["../about/", "https://other/x/", "dept/"]), &base).unwrap();
        assert_eq!(
            links,
            vec![
                "https://site/about/".to_string(),
                "https://other/x/".to_string(),
                "https://site/staff/dept/".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_crawl_follows_one_link_per_page() {
        let mut server = Server::new_async().await;
        let _seed = server
            .mock("GET", "/staff/")
            .with_body(page(&["/a/", "/b/", "/c/"]))
            .create_async()
            .await;
        let _a = server
            .mock("GET", "/a/")
            .with_body(page(&["/staff/", "/b/"]))
            .create_async()
            .await;
        let _b = server
            .mock("GET", "/b/")
            .with_body(page(&["/c/"]))
            .create_async()
            .await;
        let _c = server
            .mock("GET", "/c/")
            .with_body(page(&[]))
            .create_async()
            .await;

        let seed = format!("{}/staff/", server.url());
        let client = reqwest::Client::new();
        let visited = crawl_subpages(&client, &seed, &CrawlerConfig::default())
            .await
            .unwrap();

        // /a/ queues the seed again; the second seed visit skips /a/ and queues /b/
        let expected: Vec<String> = ["/staff/", "/a/", "/b/", "/c/"]
            .iter()
            .map(|path| format!("{}{}", server.url(), path))
            .collect();
        assert_eq!(visited, expected);
    }

    #[tokio::test]
    async fn test_seed_is_fetched_again_when_linked_back() {
        let mut server = Server::new_async().await;
        let seed_mock = server
            .mock("GET", "/staff/")
            .with_body(page(&["/a/", "/b/"]))
            .expect(2)
            .create_async()
            .await;
        let _a = server
            .mock("GET", "/a/")
            .with_body(page(&["/staff/"]))
            .create_async()
            .await;
        let _b = server
            .mock("GET", "/b/")
            .with_body(page(&["/staff/"]))
            .create_async()
            .await;

        let seed = format!("{}/staff/", server.url());
        let client = reqwest::Client::new();
        let visited = crawl_subpages(&client, &seed, &CrawlerConfig::default())
            .await
            .unwrap();

        seed_mock.assert_async().await;
        assert_eq!(visited.len(), 3);
        assert_eq!(visited[0], seed);
        assert!(visited.contains(&format!("{}/b/", server.url())));
    }

    #[tokio::test]
    async fn test_exhaustive_crawl_reaches_every_page() {
        let mut server = Server::new_async().await;
        let _seed = server
            .mock("GET", "/staff/")
            .with_body(page(&["/a/", "/b/", "/file.pdf", "/c"]))
            .create_async()
            .await;
        let _a = server
            .mock("GET", "/a/")
            .with_body(page(&["/b/"]))
            .create_async()
            .await;
        let _b = server
            .mock("GET", "/b/")
            .with_body(page(&[]))
            .create_async()
            .await;

        let seed = format!("{}/staff/", server.url());
        let client = reqwest::Client::new();
        let config = CrawlerConfig::builder().exhaustive(true).build();
        let visited = crawl_subpages(&client, &seed, &config).await.unwrap();

        assert_eq!(visited.len(), 3);
        assert!(visited.contains(&format!("{}/b/", server.url())));
    }

    #[tokio::test]
    async fn test_save_site_text() {
        let mut server = Server::new_async().await;
        let _seed = server
            .mock("GET", "/staff/")
            .with_body("<html><body><p>Principal</p></body></html>")
            .expect_at_least(1)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collage_data.txt");
        let seed = format!("{}/staff/", server.url());
        let client = reqwest::Client::new();

        let written = save_site_text(
            &client,
            &seed,
            &CrawlerConfig::default(),
            &ContentCleaner::default(),
            &path,
        )
        .await
        .unwrap();

        assert_eq!(written, path);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Principal");
    }
}
