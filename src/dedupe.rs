//! Deduplicator stage: one surviving item per canonical URL.
//!
//! Items are grouped by the canonical form of their URL; within a group
//! the survivor is the item with the smallest selection key
//! `(source_priority, Reverse(has_summary), Reverse(title_length))`:
//! prefer canonical/primary sources over aggregators and mirrors, then
//! items with a usable summary, then the longer title. Fully tied keys
//! fall back to lexicographic `(title, url)` so the survivor does not
//! depend on input order.
//!
//! Items with a blank URL or title, or a URL that fails to canonicalize,
//! are dropped with a warn event rather than failing the batch.

use once_cell::sync::Lazy;
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::models::NewsItem;
use crate::utils::canonicalize;

/// Fixed per-source rank; lower is preferred. Unranked sources get the
/// largest possible rank and lose every tie.
static SOURCE_PRIORITY: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    HashMap::from([
        ("openai", 1),
        ("deepmind_google_blog", 2),
        ("arxiv_cs_ai", 3),
        ("techcrunch_ai", 4),
        ("verge_ai", 5),
        ("venturebeat_ai", 6),
    ])
});

pub fn source_priority(source: &str) -> u32 {
    SOURCE_PRIORITY
        .get(source.trim())
        .copied()
        .unwrap_or(u32::MAX)
}

type SelectionKey = (u32, Reverse<bool>, Reverse<usize>, String, String);

fn selection_key(item: &NewsItem) -> SelectionKey {
    (
        source_priority(&item.source),
        Reverse(item.has_summary()),
        Reverse(item.title.trim().chars().count()),
        item.title.clone(),
        item.url.clone(),
    )
}

/// Deduplicate a batch by canonical URL.
///
/// Attaches `url_normalized` to every surviving item; no two survivors
/// share one. First-seen group order is preserved in the output.
pub fn dedupe(items: Vec<NewsItem>) -> Vec<NewsItem> {
    let before = items.len();
    let mut kept: Vec<NewsItem> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();
    let mut dropped = 0usize;

    for mut item in items {
        if item.url.trim().is_empty() || item.title.trim().is_empty() {
            warn!(
                source = %item.source,
                title = %item.title,
                "dedupe_dropped_blank_field"
            );
            dropped += 1;
            continue;
        }

        let norm = canonicalize(&item.url);
        if norm.is_empty() {
            warn!(source = %item.source, url = %item.url, "dedupe_dropped_malformed_url");
            dropped += 1;
            continue;
        }
        item.url_normalized = Some(norm.clone());

        match index_by_key.get(&norm) {
            None => {
                index_by_key.insert(norm, kept.len());
                kept.push(item);
            }
            Some(&idx) => {
                if selection_key(&item) < selection_key(&kept[idx]) {
                    kept[idx] = item;
                }
            }
        }
    }

    info!(before, after = kept.len(), dropped, "dedupe_done");
    kept
}
