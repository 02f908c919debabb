//! Error taxonomy for the verification pipeline.
//!
//! Stages with a fallback policy (spelling correction, relevance filtering)
//! recover from collaborator failures internally and never surface them.
//! Everything else propagates through these variants.

use thiserror::Error;

/// Errors that can escape a verification run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Topic failed validation before any collaborator was contacted.
    #[error("Search query too short")]
    QueryTooShort,

    /// Every search strategy was exhausted with zero results.
    #[error("No articles found for \"{0}\"")]
    NoArticles(String),

    /// A collaborator returned a non-success status or a malformed body.
    #[error("Collaborator failure: {0}")]
    Collaborator(String),

    /// The assessment text contained no brace-delimited JSON object.
    #[error("No JSON found in assessment response")]
    NoJson,

    /// The extracted JSON slice failed to parse.
    #[error("Malformed assessment JSON: {0}")]
    BadJson(#[from] serde_json::Error),
}
