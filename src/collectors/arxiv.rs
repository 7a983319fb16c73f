//! arXiv cs.AI feed collector.

use std::error::Error;

use crate::collectors::CollectOptions;
use crate::feeds::{FeedEntry, fetch_feed};
use crate::models::NewsItem;

pub const SOURCE: &str = "arxiv_cs_ai";
pub const FEED_URL: &str = "https://export.arxiv.org/rss/cs.AI";

pub async fn fetch_headlines(
    client: &reqwest::Client,
    opts: &CollectOptions,
) -> Result<Vec<NewsItem>, Box<dyn Error>> {
    let entries = fetch_feed(client, FEED_URL, opts.timeout, opts.max_retries).await?;
    Ok(entries_to_items(&entries, opts.limit_per_source))
}

fn entries_to_items(entries: &[FeedEntry], limit: usize) -> Vec<NewsItem> {
    entries
        .iter()
        .filter(|e| !e.title_text().is_empty() && !e.link_text().is_empty())
        .take(limit)
        .map(|e| NewsItem::new(SOURCE, e.title_text(), e.link_text(), e.pub_date.clone()))
        .collect()
}
