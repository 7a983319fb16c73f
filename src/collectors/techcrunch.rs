//! TechCrunch AI category collector.

use itertools::Itertools;
use scraper::{Html, Selector};
use std::error::Error;

use crate::collectors::CollectOptions;
use crate::http::get_text_with_backoff;
use crate::models::NewsItem;
use crate::utils::collapse_ws;

pub const SOURCE: &str = "techcrunch_ai";
pub const INDEX_URL: &str = "https://techcrunch.com/category/artificial-intelligence/";

pub async fn fetch_headlines(
    client: &reqwest::Client,
    opts: &CollectOptions,
) -> Result<Vec<NewsItem>, Box<dyn Error>> {
    let html = get_text_with_backoff(client, INDEX_URL, opts.timeout, opts.max_retries).await?;
    Ok(parse_index(&html, opts.limit_per_source))
}

fn parse_index(html: &str, limit: usize) -> Vec<NewsItem> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a.post-block__title__link, h2 a, h3 a").unwrap();

    document
        .select(&selector)
        .filter_map(|element| {
            let title = collapse_ws(&element.text().collect::<Vec<_>>().join(" "));
            let link = element.value().attr("href")?.trim();
            if title.is_empty() || !link.starts_with("https://techcrunch.com/") {
                return None;
            }
            Some(NewsItem::new(SOURCE, &title, link, None))
        })
        .unique_by(|item| item.url.clone())
        .take(limit)
        .collect()
}
