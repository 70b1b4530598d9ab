//! URL filtering for the crawler module
//!
//! Sitemaps of the college site list archive pages, uploaded documents and
//! dated notices next to the pages worth answering questions from. The filter
//! drops the former and keeps everything else in its original order.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Substrings that disqualify a URL wherever they appear
const EXCLUDED_FRAGMENTS: &[&str] = &["void(0)", "/blog/", "#", "%", "po-pso-co"];

/// File extensions that are never pages
const EXCLUDED_SUFFIXES: &[&str] = &[".pdf", ".png"];

/// Dates as `D-M-YYYY`, year ranges as `YYYY-YYYY` and ISO dates as `YYYY-MM-DD`
static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,2}-\d{1,2}-\d{4}|\d{4}-\d{4}|\d{4}-\d{1,2}-\d{1,2}")
        .expect("date pattern is valid")
});

/// Check whether a URL matches any exclusion rule
pub fn is_excluded(url: &str) -> bool {
    EXCLUDED_SUFFIXES.iter().any(|suffix| url.ends_with(suffix))
        || EXCLUDED_FRAGMENTS.iter().any(|fragment| url.contains(fragment))
        || DATE_PATTERN.is_match(url)
}

/// Keep the URLs that pass every exclusion rule, preserving order
pub fn filter_urls<I, S>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let filtered: Vec<String> = urls
        .into_iter()
        .map(Into::into)
        .filter(|url| !is_excluded(url))
        .collect();

    debug!(
        "Filtered URLs: {:?}... (total: {})",
        &filtered[..filtered.len().min(5)],
        filtered.len()
    );
    filtered
}
