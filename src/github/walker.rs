//! Repository traversal strategy
//!
//! Emits, in order: issues, pull requests, then every file of the default
//! branch in breadth-first order. All three share one byte budget; once it
//! is exceeded the walk stops where it is, mid-category if need be. There is
//! no depth limit on the file tree.

use crate::config::GithubConfig;
use crate::crawler::Emitter;
use crate::github::client::GitHubClient;
use crate::github::types::{ContentFile, EntryKind};
use crate::locator::RepoTarget;
use crate::output::{CrawlItem, RepoRecord, TicketRecord};
use crate::state::{AbortReason, CrawlBudget, CrawlRunState};
use crate::{Result, TrawlError};
use reqwest::Client;
use std::collections::VecDeque;

/// Budget-checked hand-off of items to the consumer
struct Sink<'a> {
    emitter: &'a Emitter,
    budget: CrawlBudget,
    state: CrawlRunState,
}

impl Sink<'_> {
    /// Emits `item`; returns false when the walk must stop
    async fn offer(&mut self, item: CrawlItem) -> bool {
        if !self.state.can_emit(&self.budget) {
            tracing::warn!(
                "item budget of {} reached, stopping before {}",
                self.budget.max_items,
                item.source_url
            );
            self.state.abort(AbortReason::SizeExceeded);
            return false;
        }

        let size = item.size();
        if !self.emitter.emit(item).await {
            self.state.mark_cancelled();
            return false;
        }
        self.state.record_emission(size);

        if self.state.over_byte_budget(&self.budget) {
            tracing::warn!(
                "stopping repository crawl because of size ({} of {} bytes)",
                self.state.bytes_emitted(),
                self.budget.max_total_bytes
            );
            self.state.abort(AbortReason::SizeExceeded);
            return false;
        }
        true
    }
}

/// Runs a repository crawl to completion and returns the final run state
///
/// API failures end the walk; they are logged and recorded as a fault.
pub(crate) async fn run_repo_crawl(
    http: Client,
    config: GithubConfig,
    repo: RepoTarget,
    budget: CrawlBudget,
    emitter: Emitter,
) -> CrawlRunState {
    let mut state = CrawlRunState::new();
    state.start();

    let client = match GitHubClient::new(http, &config, repo.auth.clone()) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("cannot crawl {}: {}", repo, e);
            state.mark_faulted();
            return state;
        }
    };
    if !client.is_authenticated() {
        tracing::info!("no credentials for {}, using anonymous access", repo);
    }

    let mut sink = Sink {
        emitter: &emitter,
        budget,
        state,
    };

    let walked = tokio::select! {
        biased;
        _ = emitter.cancelled() => None,
        result = walk(&client, &repo, &mut sink) => Some(result),
    };

    match walked {
        None => {
            tracing::info!("repository crawl of {} cancelled", repo);
            sink.state.mark_cancelled();
        }
        Some(Ok(())) => sink.state.drain(),
        Some(Err(e)) => {
            tracing::error!("repository crawl of {} failed: {}", repo, e);
            sink.state.mark_faulted();
        }
    }

    sink.state
}

async fn walk(client: &GitHubClient, repo: &RepoTarget, sink: &mut Sink<'_>) -> Result<()> {
    if !walk_issues(client, repo, sink).await? {
        return Ok(());
    }
    if !walk_pulls(client, repo, sink).await? {
        return Ok(());
    }
    walk_tree(client, repo, sink).await?;
    Ok(())
}

async fn walk_issues(client: &GitHubClient, repo: &RepoTarget, sink: &mut Sink<'_>) -> Result<bool> {
    let mut issues = client.list_issues(repo)?;

    while let Some(issue) = issues.next_entry().await? {
        if issue.is_pull_request() {
            tracing::trace!("skipping pull request {} in issue listing", issue.url);
            continue;
        }

        let record = RepoRecord::Issue(TicketRecord {
            title: issue.title,
            state: issue.state,
            comment_count: issue.comments,
            body: issue.body,
        });
        if !sink.offer(CrawlItem::record(issue.url, record)?).await {
            return Ok(false);
        }
    }
    Ok(true)
}

async fn walk_pulls(client: &GitHubClient, repo: &RepoTarget, sink: &mut Sink<'_>) -> Result<bool> {
    let mut pulls = client.list_pulls(repo)?;

    while let Some(pull) = pulls.next_entry().await? {
        let detail = client.pull_detail(repo, pull.number).await?;

        let record = RepoRecord::PullRequest(TicketRecord {
            title: pull.title,
            state: pull.state,
            comment_count: detail.comments,
            body: pull.body,
        });
        if !sink.offer(CrawlItem::record(pull.url, record)?).await {
            return Ok(false);
        }
    }
    Ok(true)
}

async fn walk_tree(client: &GitHubClient, repo: &RepoTarget, sink: &mut Sink<'_>) -> Result<bool> {
    let mut pending: VecDeque<_> = client.list_contents(repo, "").await?.into();

    while let Some(entry) = pending.pop_front() {
        match entry.kind {
            EntryKind::Dir => {
                tracing::debug!("expanding directory {}", entry.path);
                pending.extend(client.list_contents(repo, &entry.path).await?);
            }
            EntryKind::File => {
                let file = client.file_contents(repo, &entry.path).await?;
                let Some(item) = file_item(file, sink.budget.max_item_bytes) else {
                    continue;
                };
                if !sink.offer(item).await {
                    return Ok(false);
                }
            }
            kind => tracing::debug!("skipping {:?} entry {}", kind, entry.path),
        }
    }
    Ok(true)
}

/// Turns a fetched file into an item, or None if there is nothing to emit
fn file_item(file: ContentFile, max_item_bytes: usize) -> Option<CrawlItem> {
    let mut body = match decode_file(&file) {
        Ok(Some(body)) if !body.is_empty() => body,
        Ok(_) => {
            tracing::debug!("skipping {}: no inline content", file.path);
            return None;
        }
        Err(e) => {
            tracing::warn!("skipping file: {}", e);
            return None;
        }
    };

    if body.len() > max_item_bytes {
        tracing::warn!("ignoring the rest of {}: too big", file.path);
        body.truncate(max_item_bytes);
    }

    let content_type = mime_guess::from_path(&file.path)
        .first()
        .map(|mime| mime.to_string());
    Some(CrawlItem::raw(file.url, body, content_type))
}

fn decode_file(file: &ContentFile) -> Result<Option<Vec<u8>>> {
    file.decoded().map_err(|e| TrawlError::Decode {
        path: file.path.clone(),
        message: e.to_string(),
    })
}
