//! veritasctl - verify a news topic or claim from the command line.
//!
//! Runs one verification: fetch recent articles about the topic, filter them
//! for relevance, and render the model's structured credibility verdict.

mod render;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use veritas_core::config::{VeritasConfig, CONFIG_PATH};
use veritas_core::llm::LlmClient;
use veritas_core::news::NewsClient;
use veritas_core::pipeline;

/// Veritas - news credibility verification
#[derive(Parser)]
#[command(name = "veritasctl")]
#[command(about = "Verify a news topic against live articles", long_about = None)]
#[command(version)]
struct Cli {
    /// Topic or claim to verify
    #[arg(required = true)]
    topic: Vec<String>,

    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the raw JSON report instead of formatted output
    #[arg(long)]
    json: bool,

    /// Stop after evidence gathering and print the article list only
    #[arg(long)]
    evidence_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let topic = cli.topic.join(" ");
    let topic = topic.trim();

    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(CONFIG_PATH));
    let config = VeritasConfig::load(&config_path);

    if config.news.api_key.is_empty() {
        anyhow::bail!("No news API key configured (set GNEWS_API_KEY or [news] api_key)");
    }
    if config.llm.api_key.is_empty() {
        anyhow::bail!("No LLM API key configured (set GROQ_API_KEY or [llm] api_key)");
    }

    let news = NewsClient::new(config.news.clone());
    let model = LlmClient::new(config.llm.clone());

    if cli.evidence_only {
        let evidence = pipeline::gather_evidence(&news, &model, topic, &config.search).await?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&evidence)?);
        } else {
            render::print_articles(&evidence);
        }
        return Ok(());
    }

    let verification = pipeline::verify(&news, &model, topic, &config.search).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&verification.report)?);
    } else {
        render::print_verification(&verification);
    }

    Ok(())
}
