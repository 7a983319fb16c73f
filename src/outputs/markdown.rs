//! Digest document rendering.
//!
//! Renders the grouped, ordered buckets into the Markdown digest: a
//! heading with the generation timestamp, a total-count line, then one
//! `##` section per non-empty bucket in priority order. The per-bucket
//! cap is applied here and only here; the JSON snapshot stays complete.

use crate::models::NewsItem;

/// Render the digest document.
///
/// `generated_at` is the local generation timestamp used in the heading;
/// `total_items` counts the full deduplicated set, not the capped view.
pub fn digest_markdown(
    buckets: &[(&str, Vec<&NewsItem>)],
    total_items: usize,
    generated_at: &str,
    bucket_cap: usize,
) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("# AI Digest — {generated_at}\n"));
    lines.push(format!("Total items: **{total_items}**\n"));

    for (topic, bucket) in buckets {
        lines.push(format!("\n## {topic}\n"));
        for item in bucket.iter().take(bucket_cap) {
            lines.push(format_item(item));
        }
    }

    lines.join("\n")
}

fn format_item(item: &NewsItem) -> String {
    let published = item.published_at.as_deref().unwrap_or("");
    let mut entry = format!("- **{}** ({}) — {}\n", item.title, item.source, published);
    if let Some(summary) = item.summary.as_deref().filter(|s| !s.is_empty()) {
        entry.push_str(&format!("  - {summary}\n"));
    }
    entry.push_str(&format!("  - {}\n", item.url));
    entry
}
