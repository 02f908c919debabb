//! Veritas Core - topic-to-evidence resolution and credibility assessment.
//!
//! Turns a free-text news topic into a curated evidence set and a structured
//! credibility verdict. Two external collaborators do the heavy lifting: a
//! news-search provider supplies recent articles, and an OpenAI-format chat
//! model corrects spelling, filters off-topic evidence, and writes the final
//! assessment. Every model reply is treated as untrusted text and validated
//! before use.

pub mod config;
pub mod error;
pub mod evidence;
pub mod llm;
pub mod news;
pub mod pipeline;
pub mod prompts;
pub mod query;
pub mod verdict;

pub use config::VeritasConfig;
pub use error::PipelineError;
pub use evidence::Article;
pub use llm::{ChatModel, LlmClient};
pub use news::{NewsClient, NewsSearch};
pub use pipeline::{gather_evidence, verify, Verification};
pub use verdict::CredibilityReport;
