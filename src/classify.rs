//! Classifier stage: rule-based multi-label topic assignment.
//!
//! Matching is pure substring containment on a lowercased haystack built
//! from title, summary, source, and URL. There is no tokenization,
//! stemming, or word-boundary checking. Partial-word hits (e.g. `tool` inside
//! `toolbox`) are an accepted approximation: the taxonomy was tuned
//! against substring semantics.
//!
//! The taxonomy is an explicit immutable table passed into [`classify`],
//! so tests can substitute their own.

use crate::models::NewsItem;

/// Label prepended unconditionally for arXiv-linked items.
pub const RESEARCH_TOPIC: &str = "research_papers";

/// Label assigned when nothing else matched; `topics` is never empty.
pub const FALLBACK_TOPIC: &str = "general_ai_news";

/// Ordered topic-to-keywords table plus the fallback label.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    /// Topics in declaration order; assignment order follows this.
    pub rules: Vec<(String, Vec<String>)>,
    pub fallback: String,
}

impl Taxonomy {
    /// The built-in taxonomy.
    pub fn builtin() -> Self {
        let rules = [
            (
                RESEARCH_TOPIC,
                vec!["arxiv", "preprint", "benchmark", "dataset", "theorem", "algorithm"],
            ),
            (
                "llm_agents_reasoning",
                vec!["llm", "agent", "agents", "reasoning", "chain-of-thought", "tool", "tools", "codex"],
            ),
            (
                "security_safety",
                vec!["security", "safety", "prompt injection", "jailbreak", "red team", "preparedness"],
            ),
            (
                "computer_vision",
                vec!["vision", "visual", "multimodal", "image", "video", "vlm", "ocr", "forgery"],
            ),
            (
                "product_updates",
                vec!["release", "introducing", "launch", "update", "availability", "pricing", "api", "platform"],
            ),
            (
                "policy_society",
                vec!["policy", "regulation", "law", "governance", "ethics", "education", "literacy"],
            ),
            (
                "business_market",
                vec!["funding", "acquisition", "ipo", "revenue", "enterprise", "partnership", "deal", "market"],
            ),
        ];

        Self {
            rules: rules
                .into_iter()
                .map(|(topic, keywords)| {
                    (
                        topic.to_string(),
                        keywords.into_iter().map(String::from).collect(),
                    )
                })
                .collect(),
            fallback: FALLBACK_TOPIC.to_string(),
        }
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Assign topic labels for one item's fields.
///
/// Pure and deterministic: same inputs, same labels in the same order.
/// The result is never empty.
pub fn classify(
    taxonomy: &Taxonomy,
    title: &str,
    summary: &str,
    source: &str,
    url: &str,
) -> Vec<String> {
    let haystack = format!("{title} {summary} {source} {url}").to_lowercase();
    let mut topics: Vec<String> = Vec::new();

    // arXiv items are research papers regardless of keyword hits.
    if haystack.contains("arxiv.org") || source.to_lowercase().contains("arxiv") {
        topics.push(RESEARCH_TOPIC.to_string());
    }

    for (topic, keywords) in &taxonomy.rules {
        if topics.iter().any(|t| t == topic) {
            continue;
        }
        if keywords.iter().any(|kw| haystack.contains(kw.as_str())) {
            topics.push(topic.clone());
        }
    }

    if topics.is_empty() {
        topics.push(taxonomy.fallback.clone());
    }
    topics
}

/// Classify a whole batch, filling each item's `topics`.
pub fn classify_batch(taxonomy: &Taxonomy, items: Vec<NewsItem>) -> Vec<NewsItem> {
    items
        .into_iter()
        .map(|mut item| {
            item.topics = classify(
                taxonomy,
                &item.title,
                item.summary.as_deref().unwrap_or_default(),
                &item.source,
                &item.url,
            );
            item
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> Taxonomy {
        Taxonomy::builtin()
    }

    #[test]
    fn test_arxiv_url_prepends_research_papers() {
        let topics = classify(
            &builtin(),
            "New agent benchmark released",
            "Details at arxiv.org/abs/2401.00001",
            "techcrunch_ai",
            "https://techcrunch.com/2024/01/02/new-agent-benchmark",
        );
        assert_eq!(topics[0], RESEARCH_TOPIC);
        // Other keyword hits still accumulate after the hard rule.
        assert!(topics.contains(&"llm_agents_reasoning".to_string()));
    }

    #[test]
    fn test_arxiv_source_triggers_hard_rule() {
        let topics = classify(
            &builtin(),
            "An unassuming paper title",
            "",
            "arxiv_cs_ai",
            "https://example.org/mirror/2401.00001",
        );
        assert_eq!(topics[0], RESEARCH_TOPIC);
    }

    #[test]
    fn test_no_match_falls_back() {
        let topics = classify(
            &builtin(),
            "Quarterly newsletter",
            "",
            "somewhere",
            "https://example.com/newsletter",
        );
        assert_eq!(topics, vec![FALLBACK_TOPIC.to_string()]);
    }

    #[test]
    fn test_multiple_topics_in_taxonomy_order() {
        let topics = classify(
            &builtin(),
            "Introducing a safety update for our vision API",
            "",
            "openai",
            "https://openai.com/news/safety-update",
        );
        assert_eq!(
            topics,
            vec![
                "security_safety".to_string(),
                "computer_vision".to_string(),
                "product_updates".to_string(),
            ]
        );
    }

    #[test]
    fn test_classification_is_deterministic() {
        let taxonomy = builtin();
        let args = (
            "A reasoning model ships",
            "with tool use",
            "openai",
            "https://openai.com/news/x",
        );
        let first = classify(&taxonomy, args.0, args.1, args.2, args.3);
        let second = classify(&taxonomy, args.0, args.1, args.2, args.3);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_substring_matching_has_no_word_boundaries() {
        // "tool" inside "toolbox" matches; accepted approximation.
        let topics = classify(
            &builtin(),
            "The mechanic's toolbox",
            "",
            "somewhere",
            "https://example.com/toolbox",
        );
        assert!(topics.contains(&"llm_agents_reasoning".to_string()));
    }

    #[test]
    fn test_custom_taxonomy_substitution() {
        let taxonomy = Taxonomy {
            rules: vec![("weather".to_string(), vec!["rain".to_string()])],
            fallback: "other".to_string(),
        };
        assert_eq!(
            classify(&taxonomy, "Rain expected", "", "s", "https://example.com"),
            vec!["weather".to_string()]
        );
        assert_eq!(
            classify(&taxonomy, "Sunny", "", "s", "https://example.com"),
            vec!["other".to_string()]
        );
    }

    #[test]
    fn test_classify_batch_fills_topics() {
        let items = vec![crate::models::NewsItem::new(
            "openai",
            "Introducing a release",
            "https://openai.com/news/release",
            None,
        )];
        let classified = classify_batch(&builtin(), items);
        assert!(!classified[0].topics.is_empty());
    }
}
