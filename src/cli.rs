//! Command-line interface definitions for the digest pipeline.
//!
//! Every knob can be provided as a flag or an environment variable and
//! has a sane default, so a bare `ai_news_digest` run works.

use clap::Parser;

/// Command-line arguments for the AI news digest pipeline.
///
/// # Examples
///
/// ```sh
/// # Full run: collect, summarize, classify, dedupe, digest
/// ai_news_digest -o ./out
///
/// # Re-run the transformation stages over a pre-collected batch
/// ai_news_digest -o ./out --input ./out/ai_news.json
///
/// # Tighter politeness window and shorter summaries
/// ai_news_digest -o ./out --request-delay-ms 1500 --max-summary-chars 200
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for stage snapshots and the digest
    #[arg(short, long, default_value = "./out")]
    pub out_dir: String,

    /// Pre-collected batch file to run the pipeline over (skips collection)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Maximum headlines kept per source
    #[arg(long, env = "NEWS_LIMIT_PER_SOURCE", default_value_t = 10)]
    pub limit_per_source: usize,

    /// Per-request network timeout in seconds
    #[arg(long, env = "NEWS_TIMEOUT_SECS", default_value_t = 12)]
    pub timeout_secs: u64,

    /// Minimum interval between requests in milliseconds
    #[arg(long, env = "NEWS_REQUEST_DELAY_MS", default_value_t = 600)]
    pub request_delay_ms: u64,

    /// Maximum summary length in characters
    #[arg(long, env = "NEWS_MAX_SUMMARY_CHARS", default_value_t = 320)]
    pub max_summary_chars: usize,

    /// Width of the summary fetch worker pool
    #[arg(long, env = "NEWS_CONCURRENCY", default_value_t = 4)]
    pub concurrency: usize,

    /// Retry budget for index/feed fetches
    #[arg(long, env = "NEWS_MAX_RETRIES", default_value_t = 3)]
    pub max_retries: usize,

    /// Per-bucket item cap in the digest document (snapshot is never capped)
    #[arg(long, env = "NEWS_BUCKET_CAP", default_value_t = 25)]
    pub bucket_cap: usize,

    /// Run deadline in seconds; summary fetches not started by then are
    /// skipped and the digest is emitted over whatever completed
    #[arg(long, env = "NEWS_RUN_DEADLINE_SECS")]
    pub run_deadline_secs: Option<u64>,
}
