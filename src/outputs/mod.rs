//! Output generation modules for the interchange snapshots and digest.
//!
//! # Submodules
//!
//! - [`json`]: reads/writes batch snapshots (the pretty-printed JSON array
//!   that stages persist between themselves) and the digest snapshot
//! - [`markdown`]: renders the human-readable digest document
//!
//! # Output files
//!
//! ```text
//! out_dir/
//! ├── ai_news.json               # raw collected batch
//! ├── ai_news_with_summary.json  # after Summarizer
//! ├── ai_news_classified.json    # after Classifier
//! ├── ai_news_deduped.json       # after Deduplicator
//! ├── ai_digest.md               # grouped, capped document
//! └── ai_digest.json             # full machine-readable snapshot
//! ```

pub mod json;
pub mod markdown;
