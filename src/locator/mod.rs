//! Source classification for crawl locators
//!
//! A locator is either a repository root on a known provider (crawled through
//! the provider API) or anything else, which becomes a web scope crawled by
//! following links.

mod repo;
mod scope;

pub use repo::{parse_auth, parse_repo_locator, Provider, RepoAuth, RepoTarget};
pub use scope::{split_scope, WebScope, SCOPE_MARKER};

/// What a single crawl walks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlTarget {
    /// Hyperlink traversal bounded by a URL prefix
    Web(WebScope),

    /// Issues, pull requests and files of a hosted repository
    Repo(RepoTarget),
}

impl CrawlTarget {
    /// Returns true for repository targets
    pub fn is_repo(&self) -> bool {
        matches!(self, Self::Repo(_))
    }
}

/// Classifies a locator into a crawl target
///
/// The scope marker is removed first; the resulting seed is then checked
/// against the repository root pattern. Locators that do not match
/// (including unknown hosts and malformed repository paths) fall through to a
/// web scope instead of failing.
///
/// # Examples
///
/// ```
/// use trawl::locator::{classify, CrawlTarget};
///
/// assert!(classify("github.com/acme/widgets").is_repo());
///
/// match classify("http://site.example/docs*/index.html") {
///     CrawlTarget::Web(scope) => {
///         assert_eq!(scope.seed_url, "http://site.example/docs/index.html");
///         assert_eq!(scope.scope_prefix, "http://site.example/docs");
///     }
///     CrawlTarget::Repo(_) => unreachable!(),
/// }
/// ```
pub fn classify(locator: &str) -> CrawlTarget {
    let locator = locator.trim();
    let (seed_url, _) = split_scope(locator);

    match parse_repo_locator(&seed_url) {
        Some(repo) => CrawlTarget::Repo(repo),
        None => {
            // TODO: surface a warning once product decides whether repo-looking
            // locators on unknown hosts should be rejected instead of crawled.
            CrawlTarget::Web(WebScope::from_locator(locator))
        }
    }
}
