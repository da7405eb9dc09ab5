//! Rendering crawl items and outcomes for the command line

use crate::output::CrawlItem;
use crate::state::CrawlOutcome;
use serde::Serialize;
use std::io::{self, Write};

/// How items are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFormat {
    /// `size<TAB>content-type<TAB>url`
    Tsv,

    /// One JSON object per line, including the content as text
    JsonLines,
}

#[derive(Serialize)]
struct JsonItem<'a> {
    url: &'a str,
    content_type: Option<&'a str>,
    size: usize,
    text: &'a str,
}

/// Writes one item in the requested format
pub fn write_item<W: Write>(out: &mut W, item: &CrawlItem, format: ItemFormat) -> io::Result<()> {
    match format {
        ItemFormat::Tsv => writeln!(
            out,
            "{}\t{}\t{}",
            item.size(),
            item.content_type.as_deref().unwrap_or("-"),
            item.source_url
        ),
        ItemFormat::JsonLines => {
            let text = item.text();
            let line = JsonItem {
                url: &item.source_url,
                content_type: item.content_type.as_deref(),
                size: item.size(),
                text: &text,
            };
            serde_json::to_writer(&mut *out, &line)?;
            writeln!(out)
        }
    }
}

/// Formats the final crawl summary line
pub fn summary_line(outcome: &CrawlOutcome) -> String {
    let reason = outcome
        .abort_reason
        .map(|r| r.to_string())
        .unwrap_or_else(|| "none".to_string());

    let mut line = format!(
        "items={} bytes={} abort_reason={}",
        outcome.items_emitted, outcome.bytes_emitted, reason
    );
    if outcome.cancelled {
        line.push_str(" cancelled");
    }
    if outcome.faulted {
        line.push_str(" faulted");
    }
    line
}
