//! Query normalization, best-effort spelling correction, and search
//! strategy derivation.
//!
//! Everything here is a pure transform except the corrector, which makes one
//! chat-model call and degrades to a no-op when anything about the reply is
//! off.

use crate::config::SearchConfig;
use crate::error::PipelineError;
use crate::llm::ChatModel;
use crate::prompts;
use tracing::{debug, warn};

/// Canonical search string: lowercase, quotes removed, punctuation and
/// whitespace runs collapsed to single spaces.
pub fn normalize(raw: &str) -> Result<String, PipelineError> {
    let cleaned = clean_text(raw);
    if cleaned.chars().count() < 2 {
        return Err(PipelineError::QueryTooShort);
    }
    Ok(cleaned)
}

/// Shared cleanup applied to user input and to correction replies.
/// Apostrophes and smart quotes vanish ("don't" becomes "dont"); any other
/// non-word character becomes a space.
fn clean_text(input: &str) -> String {
    let lowered = input.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        match c {
            '\'' | '"' | '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' => {}
            c if c.is_alphanumeric() || c == '_' => out.push(c),
            _ => out.push(' '),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fix spelling via the chat model, keeping the original on any failure.
///
/// A correction is only accepted when its word count matches the input;
/// anything else means the model added or dropped words and cannot be
/// trusted. This stage never errors.
pub async fn correct_spelling<M: ChatModel>(model: &M, query: &str) -> String {
    let reply = match model
        .complete(prompts::SPELLING_SYSTEM, &prompts::spelling_prompt(query))
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Spelling correction unavailable: {}", e);
            return query.to_string();
        }
    };

    let corrected = clean_text(&reply);
    let original_words = query.split_whitespace().count();
    let corrected_words = corrected.split_whitespace().count();

    if corrected_words != original_words {
        debug!(
            "Correction changed word count ({} -> {}), keeping original",
            original_words, corrected_words
        );
        return query.to_string();
    }

    debug!("Corrected: \"{}\" -> \"{}\"", query, corrected);
    corrected
}

/// Ordered candidate search strings: the full query, content words only,
/// and the first three content words. Candidates shorter than three
/// characters are dropped; duplicates collapse to their first occurrence.
///
/// The list can be empty when even the full query is under three characters;
/// retrieval then reports not-found without wasting a provider call.
pub fn build_strategies(query: &str, search: &SearchConfig) -> Vec<String> {
    let content_words: Vec<&str> = query
        .split_whitespace()
        .filter(|w| w.chars().count() > search.min_word_len)
        .filter(|w| !search.stop_words.iter().any(|s| s == w))
        .collect();

    let candidates = [
        query.to_string(),
        content_words.join(" "),
        content_words.iter().take(3).copied().collect::<Vec<_>>().join(" "),
    ];

    let mut strategies: Vec<String> = Vec::new();
    for candidate in candidates {
        if candidate.chars().count() >= 3 && !strategies.contains(&candidate) {
            strategies.push(candidate);
        }
    }
    strategies
}
