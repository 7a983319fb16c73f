//! The Verge AI section collector.

use itertools::Itertools;
use scraper::{Html, Selector};
use std::error::Error;
use url::Url;

use crate::collectors::CollectOptions;
use crate::http::get_text_with_backoff;
use crate::models::NewsItem;
use crate::utils::collapse_ws;

pub const SOURCE: &str = "verge_ai";
pub const INDEX_URL: &str = "https://www.theverge.com/ai-artificial-intelligence";
const BASE_URL: &str = "https://www.theverge.com";

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
    let selector = Selector::parse("h2 a, h3 a").unwrap();

    document
        .select(&selector)
        .filter_map(|element| {
            let title = collapse_ws(&element.text().collect::<Vec<_>>().join(" "));
            let href = element.value().attr("href")?.trim();
            let resolved = base.join(href).ok()?;
            if title.is_empty() || !resolved.as_str().starts_with("https://www.theverge.com/") {
                return None;
            }
            Some(NewsItem::new(SOURCE, &title, resolved.as_str(), None))
        })
        .unique_by(|item| item.url.clone())
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"<html><body>
        <h2><a href="/ai-artificial-intelligence/2024/1/2/model-launch">A model launches</a></h2>
        <h3><a href="https://www.theverge.com/2024/1/3/chip-story">A chip story</a></h3>
        <h2><a href="https://www.example.com/elsewhere">Elsewhere</a></h2>
    </body></html>"#;

    #[test]
    fn test_parse_index_resolves_relative_links() {
        let items = parse_index(FIXTURE, 10);
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].url,
            "https://www.theverge.com/ai-artificial-intelligence/2024/1/2/model-launch"
        );
        assert_eq!(items[1].url, "https://www.theverge.com/2024/1/3/chip-story");
    }
}
