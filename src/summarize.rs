//! Summarizer stage: best-effort snippet extraction for each item.
//!
//! For each item the stage tries, in order:
//!
//! 1. A feed-provided override: OpenAI rejects generic page fetches, so
//!    its summaries come from a url-to-snippet map built once per run
//!    from the OpenAI news feed.
//! 2. A single-attempt page fetch followed by extractor dispatch keyed by
//!    source/domain: arXiv abstract pages get the labeled abstract block,
//!    everything else gets the generic chain (meta description, then
//!    `og:description`, then the first substantial paragraph).
//!
//! Failures are per-item and non-fatal: the item proceeds with
//! `summary = None` and a warn event. Page fetches run on a bounded pool
//! behind a [`PolitenessGate`], and an optional run deadline skips any
//! fetch that has not started in time. Partial results are valid.

use futures::stream::{self, StreamExt};
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::collectors::openai;
use crate::feeds::fetch_feed;
use crate::http::{PolitenessGate, get_text};
use crate::models::NewsItem;
use crate::utils::{clip, collapse_ws, fix_encoding, truncate_for_log};

/// Minimum length for a body paragraph to count as a summary candidate.
const MIN_PARAGRAPH_CHARS: usize = 80;

/// Knobs for the summarize stage.
#[derive(Debug, Clone)]
pub struct SummarizeOptions {
    /// Per-fetch timeout.
    pub timeout: Duration,
    /// Minimum interval between page-fetch starts.
    pub request_delay: Duration,
    /// Maximum summary length in characters.
    pub max_chars: usize,
    /// Width of the fetch worker pool.
    pub concurrency: usize,
    /// Retry budget for the override feed fetch; page fetches are always
    /// single-attempt.
    pub max_retries: usize,
    /// Run-level deadline; fetches not started by then are skipped.
    pub deadline: Option<Instant>,
}

/// Page extraction strategy, keyed by source identifier or domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extractor {
    /// Academic abstract pages: the labeled abstract block.
    ArxivAbstract,
    /// Shared fallback: meta description, og:description, first paragraph.
    Generic,
}

impl Extractor {
    fn for_item(source: &str, domain: &str) -> Self {
        if source.to_lowercase().contains("arxiv") || domain.contains("arxiv.org") {
            Extractor::ArxivAbstract
        } else {
            Extractor::Generic
        }
    }

    fn extract(self, doc: &Html) -> Option<String> {
        match self {
            Extractor::ArxivAbstract => extract_arxiv_abstract(doc),
            Extractor::Generic => extract_meta_description(doc)
                .or_else(|| extract_og_description(doc))
                .or_else(|| extract_first_paragraph(doc)),
        }
    }
}

/// Summarize a batch.
///
/// Consumes the input batch and returns a fresh one with `summary` filled
/// where extraction succeeded and titles run through the encoding repair.
pub async fn summarize_batch(
    client: &reqwest::Client,
    items: Vec<NewsItem>,
    opts: &SummarizeOptions,
) -> Vec<NewsItem> {
    let overrides = if items.iter().any(|i| uses_feed_override(i)) {
        build_openai_overrides(client, opts).await
    } else {
        HashMap::new()
    };

    let total = items.len();
    let gate = PolitenessGate::new(opts.request_delay);

    stream::iter(items.into_iter().enumerate())
        .map(|(i, mut item)| {
            let overrides = &overrides;
            let gate = &gate;
            async move {
                item.title = fix_encoding(item.title.trim());
                info!(
                    index = i + 1,
                    total,
                    title = %truncate_for_log(&item.title, 90),
                    "summarizing"
                );
                let summary = summarize_item(client, &item, overrides, gate, opts).await;
                item.summary = summary;
                item
            }
        })
        .buffered(opts.concurrency.max(1))
        .collect()
        .await
}

fn uses_feed_override(item: &NewsItem) -> bool {
    item.source == openai::SOURCE || item.domain().contains("openai.com")
}

/// Build the url-to-snippet override map from the OpenAI news feed.
///
/// A failed feed fetch degrades to an empty map: affected items simply go
/// without summaries.
async fn build_openai_overrides(
    client: &reqwest::Client,
    opts: &SummarizeOptions,
) -> HashMap<String, String> {
    match fetch_feed(client, openai::FEED_URL, opts.timeout, opts.max_retries).await {
        Ok(entries) => {
            let map: HashMap<String, String> = entries
                .iter()
                .filter(|e| !e.link_text().is_empty() && !e.description_text().is_empty())
                .map(|e| {
                    (
                        e.link_text().to_string(),
                        clip(&fix_encoding(e.description_text()), opts.max_chars),
                    )
                })
                .collect();
            info!(entries = map.len(), "feed_overrides_loaded");
            map
        }
        Err(e) => {
            warn!(error = %e, feed = openai::FEED_URL, "feed_overrides_failed");
            HashMap::new()
        }
    }
}

async fn summarize_item(
    client: &reqwest::Client,
    item: &NewsItem,
    overrides: &HashMap<String, String>,
    gate: &PolitenessGate,
    opts: &SummarizeOptions,
) -> Option<String> {
    let url = item.url.trim();
    if url.is_empty() {
        return None;
    }

    if uses_feed_override(item) {
        if let Some(snippet) = overrides.get(url) {
            return Some(snippet.clone());
        }
    }

    if let Some(deadline) = opts.deadline {
        if Instant::now() >= deadline {
            warn!(%url, "deadline_exceeded; skipping fetch");
            return None;
        }
    }

    gate.acquire().await;

    let body = match get_text(client, url, opts.timeout).await {
        Ok(body) => body,
        Err(e) => {
            warn!(%url, error = %e, "fetch_failed");
            return None;
        }
    };

    let doc = Html::parse_document(&body);
    let text = Extractor::for_item(&item.source, &item.domain()).extract(&doc)?;
    let normalized = clip(&fix_encoding(&text), opts.max_chars);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

fn extract_meta_description(doc: &Html) -> Option<String> {
    let selector = Selector::parse(r#"meta[name="description"]"#).unwrap();
    doc.select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn extract_og_description(doc: &Html) -> Option<String> {
    let selector = Selector::parse(r#"meta[property="og:description"]"#).unwrap();
    doc.select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn extract_first_paragraph(doc: &Html) -> Option<String> {
    let selector = Selector::parse("p").unwrap();
    doc.select(&selector)
        .map(|p| collapse_ws(&p.text().collect::<Vec<_>>().join(" ")))
        .find(|text| text.chars().count() >= MIN_PARAGRAPH_CHARS)
}

fn extract_arxiv_abstract(doc: &Html) -> Option<String> {
    let selector = Selector::parse("blockquote.abstract").unwrap();
    let block = doc.select(&selector).next()?;
    let text = collapse_ws(&block.text().collect::<Vec<_>>().join(" "));
    let text = text.strip_prefix("Abstract:").unwrap_or(&text).trim().to_string();
    if text.is_empty() { None } else { Some(text) }
}
