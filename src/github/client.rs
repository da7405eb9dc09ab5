//! Minimal GitHub REST client
//!
//! Covers the endpoints the repository walker needs: issue and pull request
//! listings (paginated through the `Link` header), pull request details and
//! the contents API.

use crate::config::GithubConfig;
use crate::github::types::{ContentEntry, ContentFile, Issue, PullDetail, PullSummary};
use crate::locator::{RepoAuth, RepoTarget};
use crate::{Result, TrawlError};
use reqwest::header::{ACCEPT, AUTHORIZATION, LINK};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use url::Url;

const ACCEPT_JSON: &str = "application/vnd.github+json";

/// Authenticated handle on the GitHub API
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_base: Url,
    auth: Option<RepoAuth>,
    per_page: u32,
}

impl GitHubClient {
    /// Creates a client against `config.api_base`
    ///
    /// `auth` comes from the locator; when absent, the configured token (if
    /// any) is used instead. No credential at all means anonymous access.
    pub fn new(http: Client, config: &GithubConfig, auth: Option<RepoAuth>) -> Result<Self> {
        let mut base = config.api_base.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let api_base =
            Url::parse(&base).map_err(|_| TrawlError::InvalidApiBase(config.api_base.clone()))?;
        if api_base.cannot_be_a_base() {
            return Err(TrawlError::InvalidApiBase(config.api_base.clone()));
        }

        let auth = auth.or_else(|| {
            config
                .token
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| RepoAuth::Token(t.to_string()))
        });

        Ok(Self {
            http,
            api_base,
            auth,
            per_page: config.per_page,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    /// Builds `{api_base}repos/{org}/{repo}/{tail...}`
    fn repo_url<'s, I>(&self, repo: &RepoTarget, tail: I) -> Result<Url>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let mut url = self.api_base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| TrawlError::InvalidApiBase(self.api_base.to_string()))?;
            segments
                .pop_if_empty()
                .push("repos")
                .push(&repo.organization)
                .push(&repo.repository)
                .extend(tail.into_iter().filter(|s| !s.is_empty()));
        }
        Ok(url)
    }

    fn listing_url(&self, repo: &RepoTarget, endpoint: &str) -> Result<Url> {
        let mut url = self.repo_url(repo, [endpoint])?;
        url.query_pairs_mut()
            .append_pair("per_page", &self.per_page.to_string());
        Ok(url)
    }

    fn request(&self, url: Url) -> RequestBuilder {
        let request = self.http.get(url).header(ACCEPT, ACCEPT_JSON);
        match &self.auth {
            Some(RepoAuth::Basic { username, password }) => {
                request.basic_auth(username, Some(password))
            }
            Some(RepoAuth::Token(token)) => request.header(AUTHORIZATION, format!("token {}", token)),
            None => request,
        }
    }

    async fn send(&self, url: Url) -> Result<Response> {
        tracing::debug!("GET {}", url);
        let response = self
            .request(url.clone())
            .send()
            .await
            .map_err(|source| TrawlError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrawlError::Provider {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let body = self.send(url).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Issues of the repository (pull requests included, see [`Issue::is_pull_request`])
    pub fn list_issues(&self, repo: &RepoTarget) -> Result<Pages<'_, Issue>> {
        Ok(Pages::new(self, self.listing_url(repo, "issues")?))
    }

    pub fn list_pulls(&self, repo: &RepoTarget) -> Result<Pages<'_, PullSummary>> {
        Ok(Pages::new(self, self.listing_url(repo, "pulls")?))
    }

    pub async fn pull_detail(&self, repo: &RepoTarget, number: u64) -> Result<PullDetail> {
        let number = number.to_string();
        let url = self.repo_url(repo, ["pulls", number.as_str()])?;
        self.get_json(url).await
    }

    /// Lists a directory; `""` is the repository root
    pub async fn list_contents(&self, repo: &RepoTarget, path: &str) -> Result<Vec<ContentEntry>> {
        let url = self.repo_url(repo, std::iter::once("contents").chain(path.split('/')))?;
        self.get_json(url).await
    }

    pub async fn file_contents(&self, repo: &RepoTarget, path: &str) -> Result<ContentFile> {
        let url = self.repo_url(repo, std::iter::once("contents").chain(path.split('/')))?;
        self.get_json(url).await
    }
}

/// Lazily paginated listing
///
/// The next page is requested only once the current one is used up.
#[derive(Debug)]
pub struct Pages<'a, T> {
    client: &'a GitHubClient,
    next_url: Option<Url>,
    buffer: VecDeque<T>,
}

impl<'a, T: DeserializeOwned> Pages<'a, T> {
    fn new(client: &'a GitHubClient, first: Url) -> Self {
        Self {
            client,
            next_url: Some(first),
            buffer: VecDeque::new(),
        }
    }

    /// Returns the next entry, fetching another page when needed
    pub async fn next_entry(&mut self) -> Result<Option<T>> {
        loop {
            if let Some(entry) = self.buffer.pop_front() {
                return Ok(Some(entry));
            }

            let Some(url) = self.next_url.take() else {
                return Ok(None);
            };

            let response = self.client.send(url).await?;
            self.next_url = response
                .headers()
                .get(LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_next_link)
                .and_then(|next| Url::parse(&next).ok());

            let body = response.bytes().await?;
            let page: Vec<T> = serde_json::from_slice(&body)?;
            tracing::debug!("received page of {} entries", page.len());
            self.buffer.extend(page);
        }
    }
}

/// Extracts the `rel="next"` target from a `Link` header
///
/// # Examples
///
/// ```
/// use trawl::github::parse_next_link;
///
/// let header = r#"<https://api.github.com/repositories/1/issues?page=2>; rel="next", <https://api.github.com/repositories/1/issues?page=5>; rel="last""#;
/// assert_eq!(
///     parse_next_link(header).as_deref(),
///     Some("https://api.github.com/repositories/1/issues?page=2")
/// );
/// ```
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|p| {
            let p = p.trim();
            p == r#"rel="next""# || p == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')?
            .strip_suffix('>')
            .map(str::to_string)
    })
}
