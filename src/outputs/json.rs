//! JSON snapshot reading and writing.
//!
//! Batch snapshots, pretty-printed UTF-8 JSON arrays of item objects,
//! are the interchange format between stages, and the shape downstream
//! consumers (e.g. notification integrations) read. Field names and types
//! live in [`crate::models::NewsItem`] and must stay compatible.

use std::error::Error;
use tokio::fs;
use tracing::info;

use crate::models::{Digest, NewsItem};

/// Write a batch snapshot.
pub async fn write_batch(path: &str, items: &[NewsItem]) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(items)?;
    fs::write(path, json).await?;
    info!(%path, count = items.len(), "wrote batch snapshot");
    Ok(())
}

/// Read a batch snapshot.
///
/// An unreadable or unparsable batch file is one of the few fatal errors
/// in the pipeline.
pub async fn read_batch(path: &str) -> Result<Vec<NewsItem>, Box<dyn Error>> {
    let raw = fs::read_to_string(path).await?;
    let items: Vec<NewsItem> = serde_json::from_str(&raw)?;
    info!(%path, count = items.len(), "read batch snapshot");
    Ok(items)
}

/// Write the digest snapshot.
pub async fn write_digest(path: &str, digest: &Digest) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(digest)?;
    fs::write(path, json).await?;
    info!(%path, total_items = digest.total_items, "wrote digest snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_items() -> Vec<NewsItem> {
        let mut a = NewsItem::new(
            "openai",
            "A title",
            "https://openai.com/news/a",
            Some("Tue, 02 Jan 2024 10:00:00 GMT".to_string()),
        );
        a.summary = Some("A summary.".to_string());
        a.topics = vec!["product_updates".to_string()];
        a.url_normalized = Some("https://openai.com/news/a".to_string());

        let b = NewsItem::new("verge_ai", "B title", "https://www.theverge.com/b", None);
        vec![a, b]
    }

    #[test]
    fn test_batch_round_trip_in_memory() {
        let items = sample_items();
        let json = serde_json::to_string_pretty(&items).unwrap();
        let back: Vec<NewsItem> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, items);
    }

    #[tokio::test]
    async fn test_batch_round_trip_through_file() {
        let items = sample_items();
        let path = std::env::temp_dir()
            .join(format!("ai_news_digest_batch_{}.json", std::process::id()))
            .to_string_lossy()
            .to_string();

        write_batch(&path, &items).await.unwrap();
        let back = read_batch(&path).await.unwrap();
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(back, items);
    }

    #[tokio::test]
    async fn test_read_batch_missing_file_is_error() {
        let path = std::env::temp_dir()
            .join("ai_news_digest_definitely_missing.json")
            .to_string_lossy()
            .to_string();
        assert!(read_batch(&path).await.is_err());
    }
}
