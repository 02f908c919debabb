//! Configuration for collaborator clients and search heuristics.
//!
//! Loads settings from a TOML file or falls back to defaults. API keys may
//! also arrive via `GROQ_API_KEY` / `GNEWS_API_KEY`, which take precedence
//! over the file so keys stay out of checked-in configs. The environment is
//! read here and only here; the pipeline itself works from explicit values.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Default config file path
pub const CONFIG_PATH: &str = "/etc/veritas/config.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VeritasConfig {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub news: NewsConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

/// Chat-model collaborator (OpenAI chat format, Groq-compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API base URL, without the /chat/completions suffix
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Bearer token for the provider
    #[serde(default)]
    pub api_key: String,

    /// Model identifier
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Reply length cap in tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Low temperature for consistent, factual JSON output
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

/// News-search collaborator (GNews-format provider)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// API base URL, without the /search suffix
    #[serde(default = "default_news_base_url")]
    pub base_url: String,

    /// Provider API key, passed as a query parameter
    #[serde(default)]
    pub api_key: String,

    /// Article language filter
    #[serde(default = "default_language")]
    pub language: String,

    /// Provider sort mode; publishedAt keeps results recency-ordered
    #[serde(default = "default_sort_by")]
    pub sort_by: String,

    /// Results requested per search call
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout in seconds
    #[serde(default = "default_news_timeout")]
    pub timeout_secs: u64,
}

/// Search heuristics tunable against the provider's ranking behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Words dropped when deriving content-word strategies
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,

    /// Tokens at or below this length are not content words
    #[serde(default = "default_min_word_len")]
    pub min_word_len: usize,

    /// Articles kept after normalization
    #[serde(default = "default_max_normalized")]
    pub max_normalized: usize,

    /// Evidence set upper bound
    #[serde(default = "default_max_evidence")]
    pub max_evidence: usize,

    /// Below this many survivors the relevance filter is judged too
    /// aggressive and ignored
    #[serde(default = "default_min_evidence")]
    pub min_evidence: usize,

    /// Articles kept when the filter is bypassed
    #[serde(default = "default_fallback_count")]
    pub fallback_count: usize,

    /// Snippet truncation length in the filter digest
    #[serde(default = "default_digest_snippet_len")]
    pub digest_snippet_len: usize,
}

fn default_llm_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_llm_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_temperature() -> f32 {
    0.1
}

fn default_llm_timeout() -> u64 {
    60
}

fn default_news_base_url() -> String {
    "https://gnews.io/api/v4".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_sort_by() -> String {
    "publishedAt".to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_news_timeout() -> u64 {
    15
}

fn default_stop_words() -> Vec<String> {
    [
        "the", "and", "are", "was", "were", "put", "get", "has", "had", "will", "can", "may",
        "for", "with", "from", "about", "this", "that", "what", "how", "why", "when", "today",
        "latest",
    ]
    .iter()
    .map(|w| w.to_string())
    .collect()
}

fn default_min_word_len() -> usize {
    2
}

fn default_max_normalized() -> usize {
    15
}

fn default_max_evidence() -> usize {
    8
}

fn default_min_evidence() -> usize {
    3
}

fn default_fallback_count() -> usize {
    5
}

fn default_digest_snippet_len() -> usize {
    80
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            api_key: String::new(),
            model: default_llm_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: default_news_base_url(),
            api_key: String::new(),
            language: default_language(),
            sort_by: default_sort_by(),
            page_size: default_page_size(),
            timeout_secs: default_news_timeout(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            stop_words: default_stop_words(),
            min_word_len: default_min_word_len(),
            max_normalized: default_max_normalized(),
            max_evidence: default_max_evidence(),
            min_evidence: default_min_evidence(),
            fallback_count: default_fallback_count(),
            digest_snippet_len: default_digest_snippet_len(),
        }
    }
}

impl VeritasConfig {
    /// Load configuration from a file, falling back to defaults on any
    /// problem. Environment keys override the file afterwards.
    pub fn load(path: &Path) -> Self {
        let mut config = match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<VeritasConfig>(&raw) {
                Ok(parsed) => {
                    info!("Loaded config from {}", path.display());
                    parsed
                }
                Err(e) => {
                    warn!("Invalid config at {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config at {}, using defaults", path.display());
                Self::default()
            }
        };

        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            config.llm.api_key = key;
        }
        if let Ok(key) = std::env::var("GNEWS_API_KEY") {
            config.news.api_key = key;
        }

        config
    }
}
