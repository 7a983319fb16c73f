//! MIT Technology Review AI section collector.

use itertools::Itertools;
use scraper::{Html, Selector};
use std::error::Error;
use url::Url;

use crate::collectors::CollectOptions;
use crate::http::get_text_with_backoff;
use crate::models::NewsItem;
use crate::utils::collapse_ws;

pub const SOURCE: &str = "techreview_ai";
pub const INDEX_URL: &str = "https://www.technologyreview.com/artificial-intelligence/";
const BASE_URL: &str = "https://www.technologyreview.com";

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
            if title.is_empty()
                || !resolved
                    .as_str()
                    .starts_with("https://www.technologyreview.com/")
            {
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
        <h3><a href="/2024/01/02/policy-piece/">A policy piece on AI regulation</a></h3>
        <h2><a href="https://www.technologyreview.com/2024/01/03/vision-story/">A vision story</a></h2>
        <h2><a href="https://partner.example.com/ad">Sponsored</a></h2>
    </body></html>"#;

    #[test]
    fn test_parse_index_keeps_only_site_links() {
        let items = parse_index(FIXTURE, 10);
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].url,
            "https://www.technologyreview.com/2024/01/02/policy-piece/"
        );
    }
}
