//! Evidence retrieval, normalization, and entity-based relevance filtering.
//!
//! Retrieval tries search strategies in order and stops at the first one
//! that yields articles. The relevance filter then asks the chat model which
//! articles stay on the user's topic; its reply is untrusted text, so every
//! interpretation path has a deterministic fallback and the filter never
//! fails past its boundary.

use crate::config::SearchConfig;
use crate::error::PipelineError;
use crate::llm::ChatModel;
use crate::news::{NewsSearch, RawArticle};
use crate::prompts;
use chrono::DateTime;
use serde::Serialize;
use tracing::{debug, info, warn};

/// A provider record reduced to the fields the assessment needs
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub headline: String,
    pub source: String,
    pub date: String,
    pub snippet: String,
    pub url: Option<String>,
}

/// Try each strategy in order; the first non-empty result set wins and the
/// remaining strategies are not attempted. Per-strategy failures are logged
/// and skipped. All exhausted means not-found for the original topic.
pub async fn retrieve<N: NewsSearch>(
    provider: &N,
    strategies: &[String],
    topic: &str,
    search: &SearchConfig,
) -> Result<Vec<Article>, PipelineError> {
    for strategy in strategies {
        debug!("Trying strategy: \"{}\"", strategy);
        match provider.search(strategy).await {
            Ok(articles) if !articles.is_empty() => {
                info!("Strategy \"{}\" returned {} articles", strategy, articles.len());
                return Ok(normalize_articles(articles, search.max_normalized));
            }
            Ok(_) => debug!("Strategy \"{}\" returned no articles", strategy),
            Err(e) => warn!("Strategy \"{}\" failed: {}", strategy, e),
        }
    }
    Err(PipelineError::NoArticles(topic.to_string()))
}

/// Drop records missing a title or description, cap the list, and reduce to
/// the canonical shape. Provider order (recency) is preserved.
pub fn normalize_articles(raw: Vec<RawArticle>, cap: usize) -> Vec<Article> {
    raw.into_iter()
        .filter_map(|a| {
            let headline = a.title.filter(|t| !t.is_empty())?;
            let snippet = a.description?;
            Some(Article {
                headline,
                source: a
                    .source
                    .and_then(|s| s.name)
                    .unwrap_or_else(|| "Unknown".to_string()),
                date: a
                    .published_at
                    .as_deref()
                    .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
                    .map(|t| t.format("%b %-d, %Y").to_string())
                    .unwrap_or_else(|| "Recent".to_string()),
                snippet,
                url: a.url,
            })
        })
        .take(cap)
        .collect()
}

/// Entity-blocking relevance filter with graduated fallback.
///
/// Returns between `min_evidence` and `max_evidence` articles whenever at
/// least `min_evidence` were supplied; with fewer, whatever is available
/// comes back unfiltered.
pub async fn filter_relevant<M: ChatModel>(
    model: &M,
    articles: Vec<Article>,
    topic: &str,
    search: &SearchConfig,
) -> Vec<Article> {
    let digest = article_digest(&articles, search.digest_snippet_len);
    let reply = match model
        .complete(
            prompts::ENTITY_FILTER_SYSTEM,
            &prompts::entity_filter_prompt(topic, &digest),
        )
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Relevance filter unavailable: {}", e);
            return truncated(articles, search.fallback_count);
        }
    };

    apply_filter_reply(&reply, articles, search)
}

/// Interpret the model's keep-list. Precedence: NONE sentinel, ALL sentinel,
/// extracted indices, fallback.
fn apply_filter_reply(reply: &str, articles: Vec<Article>, search: &SearchConfig) -> Vec<Article> {
    let lower = reply.to_lowercase();

    if lower.contains("none") {
        // The model blocked everything; that is over-aggressive by policy.
        warn!("Filter rejected every article, keeping first {}", search.fallback_count);
        return truncated(articles, search.fallback_count);
    }

    if lower.contains("all") {
        return truncated(articles, search.max_evidence);
    }

    let indices = extract_indices(reply, articles.len());
    if indices.is_empty() {
        warn!("No valid indices in filter reply, keeping first {}", search.fallback_count);
        return truncated(articles, search.fallback_count);
    }

    // Survivors keep the order the model returned, not recency order.
    let kept: Vec<Article> = indices.iter().map(|&i| articles[i].clone()).collect();

    if kept.len() < search.min_evidence {
        warn!(
            "Filter kept only {} of {} articles, relaxing to first {}",
            kept.len(),
            articles.len(),
            search.fallback_count
        );
        return truncated(articles, search.fallback_count);
    }

    debug!("Filter kept {} of {} articles", kept.len(), articles.len());
    truncated(kept, search.max_evidence)
}

/// Every digit run in the reply that is a valid 0-based index. The model is
/// not contract-bound to any syntax, so this is a tolerant scan rather than
/// a grammar.
fn extract_indices(reply: &str, len: usize) -> Vec<usize> {
    let mut indices = Vec::new();
    let mut digits = String::new();

    for c in reply.chars().chain(std::iter::once(' ')) {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if !digits.is_empty() {
            if let Ok(i) = digits.parse::<usize>() {
                if i < len {
                    indices.push(i);
                }
            }
            digits.clear();
        }
    }

    indices
}

fn truncated(mut articles: Vec<Article>, cap: usize) -> Vec<Article> {
    articles.truncate(cap);
    articles
}

/// Numbered 0-based digest for the filter prompt: headline plus truncated
/// snippet per article.
fn article_digest(articles: &[Article], snippet_len: usize) -> String {
    articles
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let snippet: String = a.snippet.chars().take(snippet_len).collect();
            format!("{}. {}\n   {}...", i, a.headline, snippet)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Numbered 1-based evidence context for the assessment prompt.
pub fn build_context(articles: &[Article]) -> String {
    articles
        .iter()
        .enumerate()
        .map(|(i, a)| {
            format!(
                "{}. [{} · {}] {}\n   {}",
                i + 1,
                a.source,
                a.date,
                a.headline,
                a.snippet
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn article(n: usize) -> Article {
        Article {
            headline: format!("Headline {n}"),
            source: "Reuters".to_string(),
            date: "Recent".to_string(),
            snippet: format!("Snippet {n}"),
            url: None,
        }
    }

    fn articles(count: usize) -> Vec<Article> {
        (0..count).map(article).collect()
    }

    fn raw(title: Option<&str>, description: Option<&str>) -> RawArticle {
        RawArticle {
            title: title.map(String::from),
            description: description.map(String::from),
            ..Default::default()
        }
    }

    struct StubNews {
        // query -> scripted outcome; Err(()) scripts a provider failure
        script: Vec<(&'static str, Result<usize, ()>)>,
        calls: Mutex<Vec<String>>,
    }

    impl NewsSearch for StubNews {
        async fn search(&self, query: &str) -> Result<Vec<RawArticle>, PipelineError> {
            self.calls.lock().unwrap().push(query.to_string());
            for (q, outcome) in &self.script {
                if *q == query {
                    return match outcome {
                        Ok(count) => Ok((0..*count)
                            .map(|i| raw(Some(&format!("T{i}")), Some("d")))
                            .collect()),
                        Err(()) => Err(PipelineError::Collaborator("boom".to_string())),
                    };
                }
            }
            Ok(vec![])
        }
    }

    struct FailingModel;

    impl ChatModel for FailingModel {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, PipelineError> {
            Err(PipelineError::Collaborator("timeout".to_string()))
        }
    }

    #[tokio::test]
    async fn test_retrieve_stops_at_first_non_empty() {
        let provider = StubNews {
            script: vec![("aaa", Ok(0)), ("bbb", Ok(5)), ("ccc", Ok(9))],
            calls: Mutex::new(vec![]),
        };
        let strategies = vec!["aaa".to_string(), "bbb".to_string(), "ccc".to_string()];

        let result = retrieve(&provider, &strategies, "topic", &SearchConfig::default())
            .await
            .unwrap();

        assert_eq!(result.len(), 5);
        assert_eq!(*provider.calls.lock().unwrap(), vec!["aaa", "bbb"]);
    }

    #[tokio::test]
    async fn test_retrieve_skips_failing_strategy() {
        let provider = StubNews {
            script: vec![("aaa", Err(())), ("bbb", Ok(4))],
            calls: Mutex::new(vec![]),
        };
        let strategies = vec!["aaa".to_string(), "bbb".to_string()];

        let result = retrieve(&provider, &strategies, "topic", &SearchConfig::default())
            .await
            .unwrap();
        assert_eq!(result.len(), 4);
    }

    #[tokio::test]
    async fn test_retrieve_exhaustion_is_not_found() {
        let provider = StubNews {
            script: vec![("aaa", Ok(0)), ("bbb", Err(()))],
            calls: Mutex::new(vec![]),
        };
        let strategies = vec!["aaa".to_string(), "bbb".to_string()];

        let err = retrieve(&provider, &strategies, "tesla recall", &SearchConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NoArticles(t) if t == "tesla recall"));
    }

    #[test]
    fn test_normalize_articles_drops_incomplete_records() {
        let raws = vec![
            raw(Some("Good"), Some("desc")),
            raw(None, Some("desc")),
            raw(Some("No description"), None),
            raw(Some(""), Some("desc")),
        ];
        let normalized = normalize_articles(raws, 15);
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].headline, "Good");
        assert_eq!(normalized[0].source, "Unknown");
        assert_eq!(normalized[0].date, "Recent");
    }

    #[test]
    fn test_normalize_articles_formats_date() {
        let mut record = raw(Some("T"), Some("d"));
        record.published_at = Some("2025-02-10T12:00:00Z".to_string());
        let normalized = normalize_articles(vec![record], 15);
        assert_eq!(normalized[0].date, "Feb 10, 2025");
    }

    #[test]
    fn test_normalize_articles_tolerates_bad_timestamp() {
        let mut record = raw(Some("T"), Some("d"));
        record.published_at = Some("yesterday-ish".to_string());
        let normalized = normalize_articles(vec![record], 15);
        assert_eq!(normalized[0].date, "Recent");
    }

    #[test]
    fn test_normalize_articles_caps_list() {
        let raws: Vec<RawArticle> = (0..20).map(|_| raw(Some("T"), Some("d"))).collect();
        assert_eq!(normalize_articles(raws, 15).len(), 15);
    }

    #[test]
    fn test_filter_none_sentinel_falls_back_to_five() {
        let search = SearchConfig::default();
        let kept = apply_filter_reply("NONE - all blocked", articles(10), &search);
        assert_eq!(kept.len(), 5);
        assert_eq!(kept[0].headline, "Headline 0");
    }

    #[test]
    fn test_filter_all_sentinel_keeps_first_eight() {
        let search = SearchConfig::default();
        let kept = apply_filter_reply("ALL", articles(10), &search);
        assert_eq!(kept.len(), 8);
    }

    #[test]
    fn test_filter_index_list_keeps_model_order() {
        let search = SearchConfig::default();
        let kept = apply_filter_reply("7, 2, 5", articles(10), &search);
        let headlines: Vec<&str> = kept.iter().map(|a| a.headline.as_str()).collect();
        assert_eq!(headlines, vec!["Headline 7", "Headline 2", "Headline 5"]);
    }

    #[test]
    fn test_filter_ignores_out_of_range_indices() {
        let search = SearchConfig::default();
        // 99 is out of range; the two valid survivors are below min_evidence,
        // so the filter is judged too aggressive.
        let kept = apply_filter_reply("1, 2, 99", articles(10), &search);
        assert_eq!(kept.len(), 5);
        assert_eq!(kept[0].headline, "Headline 0");
    }

    #[test]
    fn test_filter_no_digits_falls_back() {
        let search = SearchConfig::default();
        let kept = apply_filter_reply("unable to comply", articles(10), &search);
        assert_eq!(kept.len(), 5);
    }

    #[test]
    fn test_filter_prose_wrapped_indices() {
        let search = SearchConfig::default();
        let kept = apply_filter_reply("Keep articles 0, 3 and 4.", articles(10), &search);
        assert_eq!(kept.len(), 3);
        assert_eq!(kept[1].headline, "Headline 3");
    }

    #[test]
    fn test_filter_caps_survivors_at_max_evidence() {
        let search = SearchConfig::default();
        let kept = apply_filter_reply("0,1,2,3,4,5,6,7,8,9", articles(10), &search);
        assert_eq!(kept.len(), 8);
    }

    #[test]
    fn test_filter_with_fewer_than_fallback_articles() {
        let search = SearchConfig::default();
        let kept = apply_filter_reply("NONE", articles(2), &search);
        assert_eq!(kept.len(), 2);
    }

    #[tokio::test]
    async fn test_filter_model_failure_falls_back() {
        let search = SearchConfig::default();
        let kept = filter_relevant(&FailingModel, articles(10), "topic", &search).await;
        assert_eq!(kept.len(), 5);
    }

    #[test]
    fn test_build_context_numbering_and_layout() {
        let context = build_context(&articles(2));
        assert!(context.starts_with("1. [Reuters · Recent] Headline 0\n   Snippet 0"));
        assert!(context.contains("\n\n2. [Reuters · Recent] Headline 1"));
    }

    #[test]
    fn test_article_digest_truncates_snippets() {
        let mut list = articles(1);
        list[0].snippet = "x".repeat(200);
        let digest = article_digest(&list, 80);
        assert!(digest.starts_with("0. Headline 0"));
        assert!(digest.ends_with("..."));
        // 80 chars of snippet plus the ellipsis
        assert!(digest.len() < 120);
    }
}
