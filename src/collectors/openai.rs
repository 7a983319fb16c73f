//! OpenAI news feed collector.
//!
//! OpenAI's site rejects generic page fetches, so both headline collection
//! and (later) summary lookup go through the published RSS feed. The
//! Summarizer reuses [`FEED_URL`] to build its url-to-snippet override map.

use std::error::Error;

use crate::collectors::CollectOptions;
use crate::feeds::{FeedEntry, fetch_feed};
use crate::models::NewsItem;

pub const SOURCE: &str = "openai";
pub const FEED_URL: &str = "https://openai.com/news/rss.xml";

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::parse_feed;

    #[test]
    fn test_entries_to_items_keeps_raw_pub_date() {
        let xml = r#"<rss version="2.0"><channel>
            <item>
              <title>Introducing a new model</title>
              <link>https://openai.com/news/new-model</link>
              <pubDate>Wed, 03 Jan 2024 09:00:00 GMT</pubDate>
            </item>
            <item>
              <title></title>
              <link>https://openai.com/news/untitled</link>
            </item>
        </channel></rss>"#;

        let items = entries_to_items(&parse_feed(xml).unwrap(), 10);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source, SOURCE);
        assert_eq!(items[0].title, "Introducing a new model");
        assert_eq!(
            items[0].published_at.as_deref(),
            Some("Wed, 03 Jan 2024 09:00:00 GMT")
        );
    }

    #[test]
    fn test_entries_to_items_respects_limit() {
        let xml = r#"<rss version="2.0"><channel>
            <item><title>A</title><link>https://openai.com/news/a</link></item>
            <item><title>B</title><link>https://openai.com/news/b</link></item>
            <item><title>C</title><link>https://openai.com/news/c</link></item>
        </channel></rss>"#;

        let items = entries_to_items(&parse_feed(xml).unwrap(), 2);
        assert_eq!(items.len(), 2);
    }
}
