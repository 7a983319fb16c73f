//! Digest Builder stage: bucketing and ordering.
//!
//! Items are bucketed by primary topic (first label in `topics`), buckets
//! are emitted in a fixed priority order, and each bucket is sorted most
//! recent first with undated items last. Bucketing is a partition: every
//! item lands in exactly one bucket, so nothing is dropped here. The
//! per-bucket cap is applied only when rendering the document.

use chrono::Utc;
use std::collections::HashMap;

use crate::classify::FALLBACK_TOPIC;
use crate::models::{Digest, NewsItem};
use crate::utils::parse_published;

/// Bucket emission order for the digest document.
pub const TOPIC_ORDER: [&str; 8] = [
    "product_updates",
    "security_safety",
    "llm_agents_reasoning",
    "computer_vision",
    "research_papers",
    "business_market",
    "policy_society",
    "general_ai_news",
];

/// Default per-bucket item cap in the rendered document. The snapshot is
/// never capped.
pub const DEFAULT_BUCKET_CAP: usize = 25;

/// First label in `topics`, falling back to the catch-all label for the
/// (upstream-guaranteed-impossible) empty case.
pub fn primary_topic(item: &NewsItem) -> &str {
    item.topics.first().map(String::as_str).unwrap_or(FALLBACK_TOPIC)
}

/// Bucket and sort items for emission.
///
/// Buckets follow [`TOPIC_ORDER`]; topics outside the fixed list (custom
/// taxonomies) are appended afterwards in first-seen order so the
/// partition stays complete. Absent buckets are omitted, not emitted
/// empty.
pub fn build_buckets(items: &[NewsItem]) -> Vec<(&str, Vec<&NewsItem>)> {
    let mut by_topic: HashMap<&str, Vec<&NewsItem>> = HashMap::new();
    for item in items {
        by_topic.entry(primary_topic(item)).or_default().push(item);
    }

    let mut ordered = Vec::new();
    for topic in TOPIC_ORDER {
        if let Some(mut bucket) = by_topic.remove(topic) {
            sort_bucket(&mut bucket);
            ordered.push((topic, bucket));
        }
    }
    if !by_topic.is_empty() {
        for item in items {
            let topic = primary_topic(item);
            if let Some(mut bucket) = by_topic.remove(topic) {
                sort_bucket(&mut bucket);
                ordered.push((topic, bucket));
            }
        }
    }
    ordered
}

// Parsable dates first (descending), undated last, title as the final
// deterministic tie-break.
fn sort_bucket(bucket: &mut [&NewsItem]) {
    bucket.sort_by_key(|item| {
        match item
            .published_at
            .as_deref()
            .and_then(parse_published)
        {
            Some(dt) => (0u8, -dt.timestamp(), item.title.clone()),
            None => (1u8, 0, item.title.clone()),
        }
    });
}

/// Assemble the machine-readable snapshot over the full item set.
pub fn make_snapshot(items: Vec<NewsItem>) -> Digest {
    Digest {
        generated_at: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        total_items: items.len(),
        items,
    }
}
