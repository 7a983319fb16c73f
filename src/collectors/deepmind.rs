//! Google DeepMind blog collector.
//!
//! The blog index links cards by `/blog/...` hrefs, with the headline in
//! an `<h3>` somewhere in an enclosing card element rather than in the
//! anchor itself, so the title comes from a short ancestor walk.

use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use url::Url;

use crate::collectors::CollectOptions;
use crate::http::get_text_with_backoff;
use crate::models::NewsItem;
use crate::utils::collapse_ws;

pub const SOURCE: &str = "deepmind_google_blog";
pub const INDEX_URL: &str = "https://deepmind.google/blog/";
const BASE_URL: &str = "https://deepmind.google";

pub async fn fetch_headlines(
    client: &reqwest::Client,
    opts: &CollectOptions,
) -> Result<Vec<NewsItem>, Box<dyn Error>> {
    let html = get_text_with_backoff(client, INDEX_URL, opts.timeout, opts.max_retries).await?;
    Ok(parse_index(&html, opts.limit_per_source))
}

fn parse_index(html: &str, limit: usize) -> Vec<NewsItem> {
    let base = Url::parse(BASE_URL).unwrap();
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a[href^='/blog/']").unwrap();
    let title_selector = Selector::parse("h3").unwrap();

    document
        .select(&link_selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?.trim();
            if href.starts_with("/blog/page") {
                return None;
            }
            let resolved = base.join(href).ok()?;
            let title = find_card_title(element, &title_selector)?;
            Some(NewsItem::new(SOURCE, &title, resolved.as_str(), None))
        })
        .unique_by(|item| item.url.clone())
        .take(limit)
        .collect()
}

// Walk up to four ancestors looking for the card's h3 headline.
fn find_card_title(element: ElementRef<'_>, title_selector: &Selector) -> Option<String> {
    for ancestor in element.ancestors().take(4) {
        if let Some(el) = ElementRef::wrap(ancestor) {
            if let Some(h3) = el.select(title_selector).next() {
                let text = collapse_ws(&h3.text().collect::<Vec<_>>().join(" "));
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    None
}
