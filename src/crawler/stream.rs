//! Output stream plumbing between a crawl worker and its consumer
//!
//! The worker runs as a spawned task and pushes events into a bounded
//! channel. The consumer side is a [`CrawlStream`], which yields items
//! lazily and keeps the final [`CrawlOutcome`] once the worker reports it.
//!
//! The worker always sends a final `Finished` event, including when it
//! panics, so a consumer never waits on a channel nobody will close.

use crate::output::CrawlItem;
use crate::state::{AbortReason, CrawlOutcome, CrawlRunState};
use futures::{FutureExt, Stream};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Message from a crawl worker to the consumer
#[derive(Debug)]
pub(crate) enum CrawlEvent {
    Item(CrawlItem),
    Finished(CrawlOutcome),
}

/// Worker-side handle for pushing items to the consumer
#[derive(Debug)]
pub(crate) struct Emitter {
    tx: mpsc::Sender<CrawlEvent>,
    cancel: CancellationToken,
}

impl Emitter {
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the crawl is cancelled
    pub(crate) async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    /// Sends `item` to the consumer, waiting on backpressure
    ///
    /// Returns false if the crawl was cancelled or the consumer is gone;
    /// the worker should stop in either case.
    pub(crate) async fn emit(&self, item: CrawlItem) -> bool {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            sent = self.tx.send(CrawlEvent::Item(item)) => sent.is_ok(),
        }
    }
}

/// Spawns a crawl worker and returns the consumer end of its output
///
/// `work` receives the [`Emitter`] and resolves to the worker's final run
/// state, which is turned into the stream's outcome.
pub(crate) fn launch<F, Fut>(capacity: usize, cancel: CancellationToken, work: F) -> CrawlStream
where
    F: FnOnce(Emitter) -> Fut,
    Fut: Future<Output = CrawlRunState> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let emitter = Emitter {
        tx: tx.clone(),
        cancel: cancel.clone(),
    };
    let worker = work(emitter);

    tokio::spawn(async move {
        let outcome = match AssertUnwindSafe(worker).catch_unwind().await {
            Ok(state) => state.finish(),
            Err(_) => {
                tracing::error!("crawl worker panicked; ending stream");
                CrawlOutcome::faulted()
            }
        };

        tracing::info!(
            "crawl finished: {} items, {} bytes, abort reason {:?}",
            outcome.items_emitted,
            outcome.bytes_emitted,
            outcome.abort_reason
        );

        // Fails only if the consumer already dropped the stream
        let _ = tx.send(CrawlEvent::Finished(outcome)).await;
    });

    CrawlStream {
        rx,
        cancel,
        outcome: None,
        finished: false,
    }
}

/// Lazy, finite, single-pass sequence of crawl items
///
/// Implements [`Stream`]; [`next_item`](Self::next_item) is the same thing
/// without importing `StreamExt`. Dropping the stream cancels the crawl.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> trawl::Result<()> {
/// use trawl::{Config, Crawler};
///
/// let crawler = Crawler::new(Config::default())?;
/// let mut stream = crawler.crawl("https://docs.example.com/guide/*");
/// while let Some(item) = stream.next_item().await {
///     println!("{} ({} bytes)", item.source_url, item.size());
/// }
/// println!("stopped because: {:?}", stream.abort_reason());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CrawlStream {
    rx: mpsc::Receiver<CrawlEvent>,
    cancel: CancellationToken,
    outcome: Option<CrawlOutcome>,
    finished: bool,
}

impl CrawlStream {
    /// Waits for the next item; `None` once the crawl has ended
    pub async fn next_item(&mut self) -> Option<CrawlItem> {
        futures::StreamExt::next(self).await
    }

    /// Final diagnostics, available once the stream is exhausted
    pub fn outcome(&self) -> Option<&CrawlOutcome> {
        self.outcome.as_ref()
    }

    /// Why the crawl stopped early, if it did
    pub fn abort_reason(&self) -> Option<AbortReason> {
        self.outcome.as_ref().and_then(|o| o.abort_reason)
    }

    /// Asks the worker to stop
    ///
    /// Items still buffered in the channel are discarded; the stream then
    /// ends with an outcome marked cancelled.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Drains the stream, returning every item and the final outcome
    pub async fn collect(mut self) -> (Vec<CrawlItem>, CrawlOutcome) {
        let mut items = Vec::new();
        while let Some(item) = self.next_item().await {
            items.push(item);
        }
        let outcome = self.outcome.take().unwrap_or_else(CrawlOutcome::faulted);
        (items, outcome)
    }
}

impl Stream for CrawlStream {
    type Item = CrawlItem;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if this.finished {
                return Poll::Ready(None);
            }

            match this.rx.poll_recv(cx) {
                Poll::Ready(Some(CrawlEvent::Item(item))) => {
                    if this.cancel.is_cancelled() {
                        continue;
                    }
                    return Poll::Ready(Some(item));
                }
                Poll::Ready(Some(CrawlEvent::Finished(outcome))) => {
                    this.outcome = Some(outcome);
                    this.finished = true;
                }
                Poll::Ready(None) => {
                    // Worker task vanished without a final report
                    tracing::error!("crawl worker exited without a final report");
                    this.outcome = Some(CrawlOutcome::faulted());
                    this.finished = true;
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl Drop for CrawlStream {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
