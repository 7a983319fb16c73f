//! HTTP fetch plumbing with retry and politeness control.
//!
//! The module uses a trait-based design:
//! - [`FetchText`]: core trait for fetching a URL's body as text
//! - [`TextFetcher`]: wraps a shared `reqwest::Client`
//! - [`RetryFetch`]: decorator that adds exponential backoff to any
//!   [`FetchText`] implementation
//!
//! Collector fetches go through [`get_text_with_backoff`]; Summarizer page
//! fetches are deliberately single-attempt ([`get_text`]) because a missed
//! summary is non-fatal.
//!
//! # Retry Strategy
//!
//! - Exponential backoff starting at the base delay
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use rand::{Rng, rng};
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant as StdInstant};
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep, sleep_until};
use tracing::{error, warn};

/// Trait for fetching a URL's body as text.
pub trait FetchText {
    /// Fetch `url` and return the response body.
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// [`FetchText`] implementation over a shared `reqwest::Client`.
///
/// Non-2xx responses (including 429) surface as errors so the retry
/// decorator treats them like any other transient failure.
#[derive(Debug)]
pub struct TextFetcher<'a> {
    pub client: &'a reqwest::Client,
    pub timeout: StdDuration,
}

impl FetchText for TextFetcher<'_> {
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let resp = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.text().await?)
    }
}

/// Decorator that adds exponential backoff retry to any [`FetchText`].
pub struct RetryFetch<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryFetch<T>
where
    T: FetchText,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> FetchText for RetryFetch<T>
where
    T: FetchText,
{
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let total_t0 = StdInstant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        error!(
                            %url,
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
                            error = %e,
                            "fetch exhausted retries"
                        );
                        return Err(e);
                    }

                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        %url,
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "fetch attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Fetch a page body with retries, for Collector index/feed requests.
pub async fn get_text_with_backoff(
    client: &reqwest::Client,
    url: &str,
    timeout: StdDuration,
    max_retries: usize,
) -> Result<String, Box<dyn Error>> {
    let fetcher = RetryFetch::new(TextFetcher { client, timeout }, max_retries, StdDuration::from_secs(1));
    fetcher.fetch(url).await
}

/// Fetch a page body once, for Summarizer page requests.
pub async fn get_text(
    client: &reqwest::Client,
    url: &str,
    timeout: StdDuration,
) -> Result<String, Box<dyn Error>> {
    TextFetcher { client, timeout }.fetch(url).await
}

/// Minimum-interval gate shared by a bounded worker pool.
///
/// Each worker calls [`PolitenessGate::acquire`] before starting a request;
/// request starts are spaced at least `interval` apart regardless of pool
/// width, preserving the one-request-per-politeness-window behavior of a
/// sequential rate-limited loop.
#[derive(Debug)]
pub struct PolitenessGate {
    interval: StdDuration,
    next_slot: Mutex<Instant>,
}

impl PolitenessGate {
    pub fn new(interval: StdDuration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(Instant::now()),
        }
    }

    /// Wait until this caller's request slot opens.
    pub async fn acquire(&self) {
        let at = {
            let mut slot = self.next_slot.lock().await;
            let at = (*slot).max(Instant::now());
            *slot = at + self.interval;
            at
        };
        sleep_until(at).await;
    }
}
