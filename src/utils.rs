//! Shared utilities: URL canonicalization, text normalization, date
//! parsing, and file system checks.
//!
//! Everything here is pure (except [`ensure_writable_dir`]) and recovers
//! locally from bad input: a malformed URL canonicalizes to `""`, an
//! unparsable timestamp yields `None`. No function in this module fails a
//! batch.

use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::info;
use url::Url;

static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Character that shows up when UTF-8 text was mis-decoded as Latin-1.
const MOJIBAKE_MARKER: char = 'â';

/// Canonicalize a URL into its deduplication key.
///
/// - lowercases the host (a property of URL parsing itself)
/// - strips trailing `/` from the path unless the path is exactly `/`
/// - drops the fragment
/// - drops every query parameter whose key starts with `utm_`
///   (case-insensitive), preserving the relative order of the rest
/// - leaves scheme and remaining path/query untouched
///
/// Deterministic and idempotent. Malformed input yields `""`; callers
/// treat such items as unmergeable rather than failing the batch.
pub fn canonicalize(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url.trim()) else {
        return String::new();
    };

    parsed.set_fragment(None);

    let path = parsed.path().to_string();
    if path != "/" && path.ends_with('/') {
        parsed.set_path(path.trim_end_matches('/'));
    }

    if let Some(query) = parsed.query() {
        let kept = query
            .split('&')
            .filter(|pair| !pair.to_lowercase().starts_with("utm_"))
            .collect::<Vec<_>>()
            .join("&");
        if kept.is_empty() {
            parsed.set_query(None);
        } else {
            parsed.set_query(Some(&kept));
        }
    }

    parsed.to_string()
}

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_ws(text: &str) -> String {
    RE_WS.replace_all(text, " ").trim().to_string()
}

/// Normalize and length-limit a snippet.
///
/// Whitespace is collapsed first. Text longer than `max_chars` is cut to
/// `max_chars - 1` characters (trailing whitespace trimmed) with a single
/// ellipsis appended; shorter text is kept whole.
pub fn clip(text: &str, max_chars: usize) -> String {
    let t = collapse_ws(text);
    if t.chars().count() <= max_chars {
        return t;
    }
    let cut: String = t.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

/// Best-effort repair of UTF-8 text that was mis-decoded as Latin-1
/// (e.g. `Weâ\u{80}\u{99}re` for `We’re`).
///
/// The repair re-encodes the text as Latin-1 bytes and decodes them as
/// UTF-8, and is applied only when it strictly reduces the number of
/// `â` marker characters. Anything else (unencodable input, invalid
/// UTF-8, no measurable improvement) returns the original unchanged.
/// Full mojibake correction is a non-goal.
pub fn fix_encoding(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        let cp = c as u32;
        if cp > 0xFF {
            return text.to_string();
        }
        bytes.push(cp as u8);
    }

    match String::from_utf8(bytes) {
        Ok(fixed) => {
            let before = text.matches(MOJIBAKE_MARKER).count();
            let after = fixed.matches(MOJIBAKE_MARKER).count();
            if before > after { fixed } else { text.to_string() }
        }
        Err(_) => text.to_string(),
    }
}

/// Parse a feed timestamp string, trying known formats in order:
///
/// 1. RFC 2822 (`Tue, 02 Jan 2024 10:00:00 GMT` or `... +0000`)
/// 2. ISO-8601 with numeric offset (`2024-01-02T10:00:00+0000`)
/// 3. RFC 3339 (`2024-01-02T10:00:00Z`)
///
/// Unparsable or empty input yields `None`, never an error; such items
/// sort into the digest's undated partition.
pub fn parse_published(raw: &str) -> Option<DateTime<FixedOffset>> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(t) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(t, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt);
    }
    None
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` characters with an ellipsis appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        format!("{}…", s.chars().take(max).collect::<String>())
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if missing, then probes it with a throwaway
/// file. An unwritable output directory is one of the few fatal errors
/// in the pipeline.
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!(%path, "Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_strips_trailing_slash() {
        assert_eq!(
            canonicalize("https://example.com/posts/"),
            "https://example.com/posts"
        );
        // Root path stays as-is.
        assert_eq!(canonicalize("https://example.com/"), "https://example.com/");
    }

    #[test]
    fn test_canonicalize_lowercases_host() {
        assert_eq!(
            canonicalize("https://Example.COM/Posts"),
            "https://example.com/Posts"
        );
    }

    #[test]
    fn test_canonicalize_drops_fragment() {
        assert_eq!(
            canonicalize("https://example.com/a#section-2"),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_canonicalize_strips_utm_params_preserving_order() {
        assert_eq!(
            canonicalize("https://example.com/a?utm_source=x&id=3&UTM_medium=y&b=2"),
            "https://example.com/a?id=3&b=2"
        );
        // Query that was all utm_* disappears entirely.
        assert_eq!(
            canonicalize("https://example.com/a?utm_source=x"),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_canonicalize_malformed_yields_empty() {
        assert_eq!(canonicalize("not a url"), "");
        assert_eq!(canonicalize(""), "");
        assert_eq!(canonicalize("/relative/path"), "");
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let inputs = [
            "https://example.com/posts/",
            "https://Example.com/a?utm_source=x&id=3#frag",
            "https://example.com/a//",
            "https://example.com/",
            "not a url",
        ];
        for input in inputs {
            let once = canonicalize(input);
            assert_eq!(canonicalize(&once), once, "not idempotent for {input}");
        }
    }

    #[test]
    fn test_clip_short_text_kept_whole() {
        assert_eq!(clip("a short  snippet", 320), "a short snippet");
    }

    #[test]
    fn test_clip_collapses_whitespace() {
        assert_eq!(clip("  spread \n out\ttext  ", 320), "spread out text");
    }

    #[test]
    fn test_clip_truncates_with_ellipsis() {
        let text = "a".repeat(400);
        let clipped = clip(&text, 320);
        assert_eq!(clipped.chars().count(), 320);
        assert!(clipped.ends_with('…'));
    }

    #[test]
    fn test_clip_counts_chars_not_bytes() {
        let text = "é".repeat(10);
        assert_eq!(clip(&text, 20), text);
    }

    #[test]
    fn test_fix_encoding_repairs_latin1_mojibake() {
        // "We’re" whose UTF-8 bytes were decoded as Latin-1.
        let broken = "We\u{e2}\u{80}\u{99}re";
        assert_eq!(fix_encoding(broken), "We’re");
    }

    #[test]
    fn test_fix_encoding_leaves_clean_text_alone() {
        assert_eq!(fix_encoding("naïve résumé"), "naïve résumé");
        assert_eq!(fix_encoding("plain ascii"), "plain ascii");
        assert_eq!(fix_encoding(""), "");
    }

    #[test]
    fn test_fix_encoding_requires_marker_reduction() {
        // Valid Latin-1 round trip that does not remove any marker: keep
        // the original.
        let text = "â la carte";
        assert_eq!(fix_encoding(text), text);
    }

    #[test]
    fn test_parse_published_rfc2822_named_zone() {
        let dt = parse_published("Tue, 02 Jan 2024 10:00:00 GMT").unwrap();
        assert_eq!(dt.timestamp(), 1704189600);
    }

    #[test]
    fn test_parse_published_rfc2822_numeric_offset() {
        let dt = parse_published("Tue, 02 Jan 2024 10:00:00 +0000").unwrap();
        assert_eq!(dt.timestamp(), 1704189600);
    }

    #[test]
    fn test_parse_published_iso_variants() {
        let with_offset = parse_published("2024-01-02T10:00:00+0000").unwrap();
        let with_z = parse_published("2024-01-02T10:00:00Z").unwrap();
        assert_eq!(with_offset.timestamp(), with_z.timestamp());
    }

    #[test]
    fn test_parse_published_garbage_is_none() {
        assert!(parse_published("").is_none());
        assert!(parse_published("yesterday").is_none());
        assert!(parse_published("02/01/2024").is_none());
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("short", 90), "short");
        let long = "a".repeat(120);
        let out = truncate_for_log(&long, 90);
        assert!(out.starts_with(&"a".repeat(90)));
        assert!(out.ends_with('…'));
    }
}
