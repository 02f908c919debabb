//! The end-to-end verification pipeline.
//!
//! Stages run strictly in sequence: normalize, correct, derive strategies,
//! retrieve, filter, assess, parse. Each stage consumes the previous stage's
//! output read-only, so concurrent runs share nothing and need no locking.

use crate::config::SearchConfig;
use crate::error::PipelineError;
use crate::evidence::{self, Article};
use crate::llm::ChatModel;
use crate::news::NewsSearch;
use crate::prompts;
use crate::query;
use crate::verdict::{self, CredibilityReport};
use tracing::info;

/// Everything one verification run produces
#[derive(Debug)]
pub struct Verification {
    pub topic: String,
    pub evidence: Vec<Article>,
    pub report: CredibilityReport,
}

/// Resolve a raw topic into a curated evidence set: normalize the query,
/// fix spelling best-effort, derive search strategies, retrieve, and filter
/// for relevance.
pub async fn gather_evidence<N, M>(
    news: &N,
    model: &M,
    topic: &str,
    search: &SearchConfig,
) -> Result<Vec<Article>, PipelineError>
where
    N: NewsSearch,
    M: ChatModel,
{
    let normalized = query::normalize(topic)?;
    let corrected = query::correct_spelling(model, &normalized).await;
    let strategies = query::build_strategies(&corrected, search);
    info!("Search strategies: {:?}", strategies);

    let articles = evidence::retrieve(news, &strategies, topic, search).await?;
    Ok(evidence::filter_relevant(model, articles, topic, search).await)
}

/// Full run: gather evidence, ask the model for a credibility assessment of
/// the topic against it, and parse the structured verdict.
pub async fn verify<N, M>(
    news: &N,
    model: &M,
    topic: &str,
    search: &SearchConfig,
) -> Result<Verification, PipelineError>
where
    N: NewsSearch,
    M: ChatModel,
{
    let evidence = gather_evidence(news, model, topic, search).await?;
    info!("Evidence set: {} articles", evidence.len());

    let context = evidence::build_context(&evidence);
    let reply = model
        .complete(
            prompts::ASSESSMENT_SYSTEM,
            &prompts::assessment_prompt(topic, &context, evidence.len()),
        )
        .await?;

    let report = verdict::parse_assessment(&reply)?;
    info!(
        "Verdict: {} ({}/100)",
        report.verdict, report.credibility_score
    );

    Ok(Verification {
        topic: topic.to_string(),
        evidence,
        report,
    })
}
