//! Web traversal worker
//!
//! Breadth-first crawl from a seed URL, following only links that start with
//! the scope prefix. One worker owns the frontier and the run state; items
//! are pushed to the consumer through an [`Emitter`].
//!
//! Per URL:
//! 1. Skip if visited, otherwise mark visited before fetching
//! 2. Fetch; failures and non-success statuses are skipped
//! 3. Stop with `SizeExceeded` if the item cap is already reached
//! 4. Emit, then stop with `SizeExceeded` if the byte budget is now exceeded
//! 5. Enqueue in-scope links one level deeper, or note depth exhaustion

use crate::crawler::fetcher::{Fetched, Fetcher};
use crate::crawler::frontier::{Frontier, QueuedUrl};
use crate::crawler::parser::{extract_links, is_hypertext};
use crate::crawler::stream::Emitter;
use crate::locator::WebScope;
use crate::output::CrawlItem;
use crate::state::{AbortReason, CrawlBudget, CrawlRunState};
use url::Url;

/// Runs a web crawl to completion and returns the final run state
pub(crate) async fn run_web_crawl(
    fetcher: Fetcher,
    scope: WebScope,
    budget: CrawlBudget,
    emitter: Emitter,
) -> CrawlRunState {
    let mut state = CrawlRunState::new();
    state.start();

    tracing::info!(
        "starting web crawl at {} (scope {})",
        scope.seed_url,
        scope.scope_prefix
    );

    let mut frontier = Frontier::seeded(scope.seed_url.clone());

    while let Some(queued) = frontier.pop() {
        if emitter.is_cancelled() {
            tracing::info!("web crawl cancelled");
            state.mark_cancelled();
            return state;
        }

        if !state.mark_visited(&queued.url) {
            continue;
        }

        tracing::debug!("processing {} (depth {})", queued.url, queued.depth);

        let fetched = tokio::select! {
            biased;
            _ = emitter.cancelled() => {
                tracing::info!("web crawl cancelled during fetch of {}", queued.url);
                state.mark_cancelled();
                return state;
            }
            fetched = fetcher.fetch(&queued.url) => fetched,
        };

        let Some(fetched) = fetched else {
            continue;
        };

        if !state.can_emit(&budget) {
            tracing::warn!(
                "item budget of {} reached, stopping before {}",
                budget.max_items,
                queued.url
            );
            state.abort(AbortReason::SizeExceeded);
            return state;
        }

        let descend = budget.allows_descent(queued.depth);
        let links = if descend {
            discover_links(&queued.url, &fetched)
        } else {
            Vec::new()
        };

        let size = fetched.body.len();
        let item = CrawlItem::raw(queued.url.clone(), fetched.body, fetched.content_type);
        if !emitter.emit(item).await {
            tracing::info!("web crawl cancelled while emitting {}", queued.url);
            state.mark_cancelled();
            return state;
        }
        state.record_emission(size);

        if state.over_byte_budget(&budget) {
            tracing::warn!(
                "byte budget exceeded after {} ({} of {} bytes)",
                queued.url,
                state.bytes_emitted(),
                budget.max_total_bytes
            );
            state.abort(AbortReason::SizeExceeded);
            return state;
        }

        if !descend {
            tracing::debug!("depth budget exhausted at {}", queued.url);
            state.note_depth_exhausted();
            continue;
        }

        enqueue_in_scope(&mut frontier, &state, &scope, links, queued.depth + 1);
    }

    tracing::debug!("frontier exhausted");
    state.drain();
    state
}

/// Extracts links from a fetched page if it is hypertext
///
/// Kept synchronous: the parsed document is not `Send` and must not live
/// across an await point.
fn discover_links(page_url: &str, fetched: &Fetched) -> Vec<String> {
    if !is_hypertext(fetched.content_type.as_deref()) {
        return Vec::new();
    }

    match Url::parse(page_url) {
        Ok(base) => extract_links(&fetched.body, &base),
        Err(e) => {
            tracing::debug!("cannot resolve links against {}: {}", page_url, e);
            Vec::new()
        }
    }
}

fn enqueue_in_scope(
    frontier: &mut Frontier,
    state: &CrawlRunState,
    scope: &WebScope,
    links: Vec<String>,
    depth: u32,
) {
    for link in links {
        if !scope.contains(&link) || state.has_visited(&link) {
            continue;
        }
        tracing::debug!("descendant {}", link);
        frontier.push(QueuedUrl::new(link, depth));
    }
}
