//! Data models for headline records and the assembled digest.
//!
//! This module defines the two structures that cross stage boundaries:
//! - [`NewsItem`]: a single headline record, threaded through every stage
//! - [`Digest`]: the machine-readable snapshot emitted at the end of a run
//!
//! `NewsItem` field names are the on-disk interchange contract: every stage
//! persists its batch as a JSON array of these objects, and downstream
//! consumers depend on the names and types staying put.

use serde::{Deserialize, Serialize};

/// A single headline record.
///
/// Items are immutable value records that accumulate optional fields stage
/// by stage: the Collector produces `source`/`title`/`url`/`published_at`,
/// the Summarizer fills `summary`, the Classifier fills `topics`, and the
/// Deduplicator attaches `url_normalized`. No stage removes a field added
/// earlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Short identifier of the originating source (e.g. `"openai"`).
    pub source: String,
    /// Headline display text.
    pub title: String,
    /// Absolute resource URL.
    pub url: String,
    /// Source-native publish timestamp string, when the source provided
    /// one. Kept raw; parsing happens only at digest-sort time.
    #[serde(default)]
    pub published_at: Option<String>,
    /// Short descriptive snippet added by the Summarizer; `None` when
    /// extraction failed or has not run yet.
    #[serde(default)]
    pub summary: Option<String>,
    /// Ordered topic labels added by the Classifier. Absent from batches
    /// that have not been classified yet.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
    /// Canonical form of `url`, attached by the Deduplicator. Used only as
    /// the dedupe key, never displayed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_normalized: Option<String>,
}

impl NewsItem {
    /// Build a freshly collected item with no derived fields yet.
    pub fn new(source: &str, title: &str, url: &str, published_at: Option<String>) -> Self {
        Self {
            source: source.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            published_at,
            summary: None,
            topics: Vec::new(),
            url_normalized: None,
        }
    }

    /// Lowercased host of `url`, or `""` when the URL does not parse.
    pub fn domain(&self) -> String {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
            .unwrap_or_default()
    }

    /// Whether the item carries a usable (non-empty) summary.
    pub fn has_summary(&self) -> bool {
        self.summary.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// The machine-readable digest snapshot.
///
/// Contains the full deduplicated item set regardless of the per-bucket
/// presentation cap applied to the Markdown document.
#[derive(Debug, Serialize, Deserialize)]
pub struct Digest {
    /// Generation timestamp, UTC at second precision with a trailing `Z`.
    pub generated_at: String,
    /// Total number of items in `items`.
    pub total_items: usize,
    /// The full deduplicated item set, in Deduplicator output order.
    pub items: Vec<NewsItem>,
}
