//! RSS 2.0 feed parsing.
//!
//! Feed-backed sources (OpenAI, arXiv, VentureBeat) are consumed through
//! this module. Only the fields the pipeline cares about are mapped:
//! title, link, description, and the raw `pubDate` string. Timestamps are
//! passed through untouched; parsing them is the Digest Builder's problem.

use quick_xml::de::from_str;
use serde::Deserialize;
use std::error::Error;
use std::time::Duration;

use crate::http::get_text_with_backoff;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<FeedEntry>,
}

/// One `<item>` from an RSS 2.0 channel.
#[derive(Debug, Deserialize)]
pub struct FeedEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "pubDate", default)]
    pub pub_date: Option<String>,
}

impl FeedEntry {
    /// Trimmed title, or `""` when absent.
    pub fn title_text(&self) -> &str {
        self.title.as_deref().unwrap_or_default().trim()
    }

    /// Trimmed link, or `""` when absent.
    pub fn link_text(&self) -> &str {
        self.link.as_deref().unwrap_or_default().trim()
    }

    /// Trimmed description, or `""` when absent.
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or_default().trim()
    }
}

/// Parse an RSS document into its entries.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>, Box<dyn Error>> {
    let cleaned = scrub_html_entities_for_xml(xml);
    let rss: Rss = from_str(&cleaned)?;
    Ok(rss.channel.items)
}

/// Fetch and parse an RSS feed, with Collector-grade retries.
pub async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
    max_retries: usize,
) -> Result<Vec<FeedEntry>, Box<dyn Error>> {
    let body = get_text_with_backoff(client, url, timeout, max_retries).await?;
    parse_feed(&body)
}

// Feeds in the wild carry HTML entities the XML parser rejects.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
