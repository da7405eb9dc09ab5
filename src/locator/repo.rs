use std::fmt;

/// Supported repository hosting providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    GitHub,
}

impl Provider {
    /// Resolves a provider from a host name (lowercase, without `www.`)
    pub fn from_host(host: &str) -> Option<Self> {
        match host {
            "github.com" => Some(Self::GitHub),
            _ => None,
        }
    }

    /// Canonical host name of the provider
    pub fn host(&self) -> &'static str {
        match self {
            Self::GitHub => "github.com",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitHub => write!(f, "github"),
        }
    }
}

/// Credential embedded in a repository locator
#[derive(Clone, PartialEq, Eq)]
pub enum RepoAuth {
    /// `user:password` pair sent as HTTP basic auth
    Basic { username: String, password: String },

    /// Bare token
    Token(String),
}

// Secrets never reach logs.
impl fmt::Debug for RepoAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Token(_) => f.debug_tuple("Token").field(&"<redacted>").finish(),
        }
    }
}

/// A hosted repository addressed through its provider's API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoTarget {
    pub provider: Provider,
    pub auth: Option<RepoAuth>,
    pub organization: String,
    pub repository: String,
}

impl RepoTarget {
    /// `org/repo` form used in logs and API paths
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.organization, self.repository)
    }
}

impl fmt::Display for RepoTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.full_name())
    }
}

/// Parses an embedded credential
///
/// `user:password` becomes basic auth (split on the first `:`), anything
/// else non-empty is a bare token, and an empty string means anonymous.
pub fn parse_auth(raw: &str) -> Option<RepoAuth> {
    if raw.is_empty() {
        return None;
    }

    match raw.split_once(':') {
        Some((username, password)) => Some(RepoAuth::Basic {
            username: username.to_string(),
            password: password.to_string(),
        }),
        None => Some(RepoAuth::Token(raw.to_string())),
    }
}

/// Parses a repository root locator
///
/// Accepted form: `[http[s]://][cred@][www.]host/org/repo[/]`, where `host`
/// is a known provider and `repo` may end in `.git`. Anything else (deeper
/// paths, query strings, unknown hosts) returns `None` so the caller can fall
/// back to a web crawl.
///
/// # Examples
///
/// ```
/// use trawl::locator::{parse_repo_locator, Provider};
///
/// let repo = parse_repo_locator("https://github.com/acme/widgets").unwrap();
/// assert_eq!(repo.provider, Provider::GitHub);
/// assert_eq!(repo.organization, "acme");
/// assert_eq!(repo.repository, "widgets");
///
/// assert!(parse_repo_locator("https://github.com/acme/widgets/issues").is_none());
/// assert!(parse_repo_locator("https://gitlab.com/acme/widgets").is_none());
/// ```
pub fn parse_repo_locator(locator: &str) -> Option<RepoTarget> {
    let rest = locator
        .strip_prefix("https://")
        .or_else(|| locator.strip_prefix("http://"))
        .unwrap_or(locator);

    let (authority, path) = rest.split_once('/')?;

    let (auth, host) = match authority.rsplit_once('@') {
        Some((cred, host)) => (parse_auth(cred), host),
        None => (None, authority),
    };

    let host = host.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let provider = Provider::from_host(host)?;

    let path = path.strip_suffix('/').unwrap_or(path);
    if path.contains(|c: char| c == '?' || c == '#') {
        return None;
    }

    let (organization, repository) = path.split_once('/')?;
    if organization.is_empty() || repository.is_empty() || repository.contains('/') {
        return None;
    }

    let repository = repository.strip_suffix(".git").unwrap_or(repository);
    if repository.is_empty() {
        return None;
    }

    Some(RepoTarget {
        provider,
        auth,
        organization: organization.to_string(),
        repository: repository.to_string(),
    })
}
