use url::Url;

/// Marker separating the scope-restriction prefix from the rest of the seed
pub const SCOPE_MARKER: char = '*';

/// A bounded web crawl: where to start and which URLs may be followed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebScope {
    /// First URL fetched
    pub seed_url: String,

    /// Prefix every followed link must start with
    pub scope_prefix: String,
}

impl WebScope {
    /// Builds a scope from a locator, see [`split_scope`]
    ///
    /// Seed and prefix are put in the serialized form discovered links take
    /// (lowercase host, percent-encoded path, no default port) so that prefix
    /// matching and the visited set agree with them. Text that does not parse
    /// as a URL is kept as written.
    pub fn from_locator(locator: &str) -> Self {
        let (seed_url, scope_prefix) = split_scope(locator);
        Self {
            seed_url: canonical_url(&seed_url),
            scope_prefix: canonical_prefix(&scope_prefix),
        }
    }

    /// Returns true if `url` lies inside the scope-restriction prefix
    pub fn contains(&self, url: &str) -> bool {
        url.starts_with(&self.scope_prefix)
    }
}

fn canonical_url(raw: &str) -> String {
    Url::parse(raw)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Like [`canonical_url`], without the `/` the serializer adds to an empty
/// path: a prefix such as `http://site.example` must keep matching
/// `http://site.example.org/`.
fn canonical_prefix(raw: &str) -> String {
    let Ok(url) = Url::parse(raw) else {
        return raw.to_string();
    };

    let mut prefix = url.to_string();
    if url.path() == "/" && url.query().is_none() && !raw.ends_with('/') && prefix.ends_with('/') {
        prefix.pop();
    }
    prefix
}

/// Splits a locator on its first scope marker
///
/// `http://site.com/faq/*home` starts at `/faq/home` but may crawl all of
/// `/faq/`. Without a marker the locator is both seed and prefix. Only the
/// first marker is removed.
///
/// # Returns
///
/// `(seed_url, scope_prefix)`
///
/// # Examples
///
/// ```
/// use trawl::locator::split_scope;
///
/// let (seed, prefix) = split_scope("http://site.com/faq/*home");
/// assert_eq!(seed, "http://site.com/faq/home");
/// assert_eq!(prefix, "http://site.com/faq/");
///
/// let (seed, prefix) = split_scope("http://site.com/docs");
/// assert_eq!(seed, prefix);
/// ```
pub fn split_scope(locator: &str) -> (String, String) {
    match locator.split_once(SCOPE_MARKER) {
        Some((prefix, rest)) => (format!("{}{}", prefix, rest), prefix.to_string()),
        None => (locator.to_string(), locator.to_string()),
    }
}
