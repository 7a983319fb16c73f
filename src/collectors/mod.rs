//! Headline collection from the source registry.
//!
//! Each submodule covers one source and exports
//! `fetch_headlines(client, opts)` returning raw [`NewsItem`]s with
//! `source`, `title`, `url`, and (for feed-backed sources) the raw
//! `published_at` string.
//!
//! | Source | Module | Method |
//! |--------|--------|--------|
//! | OpenAI News | [`openai`] | RSS |
//! | arXiv cs.AI | [`arxiv`] | RSS |
//! | VentureBeat AI | [`venturebeat`] | RSS, filtered to `/ai/` links |
//! | TechCrunch AI | [`techcrunch`] | HTML index |
//! | The Verge AI | [`verge`] | HTML index |
//! | DeepMind blog | [`deepmind`] | HTML index |
//! | MIT Tech Review AI | [`techreview`] | HTML index |
//!
//! Sources run sequentially with an inter-source delay. One source
//! failing (timeout, non-2xx after retries, parse error) is logged and
//! skipped; the rest of the run proceeds.

pub mod arxiv;
pub mod deepmind;
pub mod openai;
pub mod techcrunch;
pub mod techreview;
pub mod venturebeat;
pub mod verge;

use std::error::Error;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info};

use crate::models::NewsItem;

/// Knobs shared by every collector.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Maximum items kept per source.
    pub limit_per_source: usize,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry budget for index/feed fetches.
    pub max_retries: usize,
    /// Delay between sources.
    pub source_delay: Duration,
}

const SOURCES: [&str; 7] = [
    openai::SOURCE,
    arxiv::SOURCE,
    venturebeat::SOURCE,
    techcrunch::SOURCE,
    verge::SOURCE,
    deepmind::SOURCE,
    techreview::SOURCE,
];

async fn fetch_source(
    name: &str,
    client: &reqwest::Client,
    opts: &CollectOptions,
) -> Result<Vec<NewsItem>, Box<dyn Error>> {
    match name {
        openai::SOURCE => openai::fetch_headlines(client, opts).await,
        arxiv::SOURCE => arxiv::fetch_headlines(client, opts).await,
        venturebeat::SOURCE => venturebeat::fetch_headlines(client, opts).await,
        techcrunch::SOURCE => techcrunch::fetch_headlines(client, opts).await,
        verge::SOURCE => verge::fetch_headlines(client, opts).await,
        deepmind::SOURCE => deepmind::fetch_headlines(client, opts).await,
        techreview::SOURCE => techreview::fetch_headlines(client, opts).await,
        other => Err(format!("unknown source: {other}").into()),
    }
}

/// Collect headlines from every registered source.
///
/// Never fails as a whole: per-source errors are logged with their elapsed
/// time and the remaining sources still run.
pub async fn collect_all(client: &reqwest::Client, opts: &CollectOptions) -> Vec<NewsItem> {
    let mut results = Vec::new();

    for (i, name) in SOURCES.into_iter().enumerate() {
        let started = Instant::now();
        info!(source = name, "source_start");

        match fetch_source(name, client, opts).await {
            Ok(items) => {
                info!(
                    source = name,
                    items = items.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "source_ok"
                );
                results.extend(items);
            }
            Err(e) => {
                error!(
                    source = name,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "source_error"
                );
            }
        }

        if i + 1 < SOURCES.len() {
            sleep(opts.source_delay).await;
        }
    }

    info!(total = results.len(), "collect_done");
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_names_are_distinct() {
        let mut names = SOURCES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SOURCES.len());
    }
}
