//! HTML link extraction
//!
//! Pulls `<a href>` targets out of fetched pages and resolves them against
//! the page URL, ready for scope filtering.

use scraper::{Html, Selector};
use url::Url;

/// Returns true if a Content-Type header denotes hypertext
///
/// Matches anything mentioning `html` (`text/html`, `application/xhtml+xml`).
/// A missing content type is never hypertext.
pub fn is_hypertext(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("html"))
        .unwrap_or(false)
}

/// Extracts all anchor links from an HTML document
///
/// # Arguments
///
/// * `body` - Raw page bytes; invalid UTF-8 is replaced, not rejected
/// * `base_url` - The page URL for resolving relative links
///
/// # Returns
///
/// Absolute http(s) URLs without fragments, in document order. Duplicates
/// are kept; the crawler's visited set takes care of them.
///
/// # Example
///
/// ```
/// use trawl::crawler::extract_links;
/// use url::Url;
///
/// let html = br#"<html><body><a href="/docs/b#top">B</a></body></html>"#;
/// let base = Url::parse("http://site.example/docs/a").unwrap();
/// assert_eq!(extract_links(html, &base), vec!["http://site.example/docs/b"]);
/// ```
pub fn extract_links(body: &[u8], base_url: &Url) -> Vec<String> {
    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);

    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded:
/// - empty hrefs
/// - javascript:, mailto:, tel:, data: and other non-HTTP(S) schemes
/// - Invalid URLs
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();
    let href = href.split('#').next().unwrap_or_default();

    if href.is_empty() {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }
    absolute_url.set_fragment(None);

    Some(absolute_url.to_string())
}
