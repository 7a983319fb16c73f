//! VentureBeat collector.
//!
//! VentureBeat has no AI-only feed; the site feed is filtered down to
//! links under `/ai/`.

use std::error::Error;

use crate::collectors::CollectOptions;
use crate::feeds::{FeedEntry, fetch_feed};
use crate::models::NewsItem;

pub const SOURCE: &str = "venturebeat_ai";
pub const FEED_URL: &str = "http://feeds.venturebeat.com/VentureBeat";

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
        .filter(|e| !e.title_text().is_empty() && e.link_text().contains("/ai/"))
        .take(limit)
        .map(|e| NewsItem::new(SOURCE, e.title_text(), e.link_text(), e.pub_date.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::parse_feed;

    #[test]
    fn test_entries_to_items_keeps_only_ai_section() {
        let xml = r#"<rss version="2.0"><channel>
            <item><title>AI story</title><link>https://venturebeat.com/ai/some-story/</link></item>
            <item><title>Games story</title><link>https://venturebeat.com/games/other-story/</link></item>
            <item><title>Another AI story</title><link>https://venturebeat.com/ai/more/</link></item>
        </channel></rss>"#;

        let items = entries_to_items(&parse_feed(xml).unwrap(), 10);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.url.contains("/ai/")));
    }
}
