//! # AI News Digest
//!
//! A batch pipeline that collects AI news headlines from RSS feeds and
//! HTML index pages, attaches best-effort summaries, classifies items
//! against a keyword taxonomy, deduplicates by canonical URL, and emits a
//! topic-grouped Markdown digest plus a full JSON snapshot.
//!
//! ## Usage
//!
//! ```sh
//! ai_news_digest -o ./out
//! ```
//!
//! ## Architecture
//!
//! The application is a straight pipeline; each stage consumes the
//! previous stage's full batch and persists its own as a JSON snapshot:
//!
//! 1. **Collect**: headline records from every registered source
//!    (skippable with `--input` over a pre-collected batch)
//! 2. **Summarize**: snippet extraction on a bounded, rate-limited pool
//! 3. **Classify**: rule-based multi-label topics
//! 4. **Dedupe**: one survivor per canonical URL
//! 5. **Digest**: bucketed, ordered Markdown + machine-readable JSON

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod classify;
mod cli;
mod collectors;
mod dedupe;
mod digest;
mod feeds;
mod http;
mod models;
mod outputs;
mod summarize;
mod utils;

use cli::Cli;
use collectors::CollectOptions;
use summarize::SummarizeOptions;

const USER_AGENT: &str = concat!("ai_news_digest/", env!("CARGO_PKG_VERSION"));

fn out_path(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    info!(out_dir = %args.out_dir, input = ?args.input, "pipeline_start");

    // Early check: everything downstream writes here.
    if let Err(e) = utils::ensure_writable_dir(&args.out_dir).await {
        error!(
            path = %args.out_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
    let timeout = Duration::from_secs(args.timeout_secs);
    let request_delay = Duration::from_millis(args.request_delay_ms);

    // ---- Collect (or load a pre-collected batch) ----
    let raw_items = match &args.input {
        Some(path) => outputs::json::read_batch(path).await?,
        None => {
            let opts = CollectOptions {
                limit_per_source: args.limit_per_source,
                timeout,
                max_retries: args.max_retries,
                source_delay: request_delay,
            };
            let items = collectors::collect_all(&client, &opts).await;
            outputs::json::write_batch(&out_path(&args.out_dir, "ai_news.json"), &items).await?;
            items
        }
    };
    info!(count = raw_items.len(), "collect_stage_done");

    // ---- Summarize ----
    let deadline = args
        .run_deadline_secs
        .map(|secs| tokio::time::Instant::now() + Duration::from_secs(secs));
    let summarize_opts = SummarizeOptions {
        timeout,
        request_delay,
        max_chars: args.max_summary_chars,
        concurrency: args.concurrency,
        max_retries: args.max_retries,
        deadline,
    };
    let summarized = summarize::summarize_batch(&client, raw_items, &summarize_opts).await;
    outputs::json::write_batch(
        &out_path(&args.out_dir, "ai_news_with_summary.json"),
        &summarized,
    )
    .await?;
    let with_summary = summarized.iter().filter(|i| i.has_summary()).count();
    info!(count = summarized.len(), with_summary, "summarize_stage_done");

    // ---- Classify ----
    let taxonomy = classify::Taxonomy::builtin();
    let classified = classify::classify_batch(&taxonomy, summarized);
    outputs::json::write_batch(
        &out_path(&args.out_dir, "ai_news_classified.json"),
        &classified,
    )
    .await?;
    info!(count = classified.len(), "classify_stage_done");

    // ---- Dedupe ----
    let deduped = dedupe::dedupe(classified);
    outputs::json::write_batch(&out_path(&args.out_dir, "ai_news_deduped.json"), &deduped).await?;
    info!(count = deduped.len(), "dedupe_stage_done");

    // ---- Digest ----
    let generated_local = Local::now().format("%Y-%m-%d %H:%M").to_string();
    let document = {
        let buckets = digest::build_buckets(&deduped);
        outputs::markdown::digest_markdown(
            &buckets,
            deduped.len(),
            &generated_local,
            args.bucket_cap,
        )
    };
    let document_path = out_path(&args.out_dir, "ai_digest.md");
    tokio::fs::write(&document_path, document).await?;
    info!(path = %document_path, "wrote digest document");

    let snapshot = digest::make_snapshot(deduped);
    outputs::json::write_digest(&out_path(&args.out_dir, "ai_digest.json"), &snapshot).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        total_items = snapshot.total_items,
        "pipeline_done"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_path_joins_without_doubled_slash() {
        assert_eq!(out_path("./out", "ai_news.json"), "./out/ai_news.json");
        assert_eq!(out_path("./out/", "ai_news.json"), "./out/ai_news.json");
    }
}
