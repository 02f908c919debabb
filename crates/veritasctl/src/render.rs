//! Terminal rendering for verification results.
//!
//! Formatting only; every decision about what the verdict contains was made
//! upstream in veritas_core.

use console::style;
use owo_colors::OwoColorize;
use veritas_core::pipeline::Verification;
use veritas_core::verdict::{CredibilityReport, FlaggedClaim, SuggestedSource};
use veritas_core::Article;

/// Score color bands: green from 75, amber from 50, orange from 30, red below.
fn score_color(score: i64) -> (u8, u8, u8) {
    if score >= 75 {
        (34, 197, 94)
    } else if score >= 50 {
        (245, 158, 11)
    } else if score >= 30 {
        (249, 115, 22)
    } else {
        (239, 68, 68)
    }
}

fn assessment_badge(assessment: &str) -> (&'static str, (u8, u8, u8)) {
    match assessment {
        "Verified" => ("✓", (34, 197, 94)),
        "False" => ("✗", (239, 68, 68)),
        "Misleading" => ("⚠", (249, 115, 22)),
        "Needs Context" => ("◉", (245, 158, 11)),
        _ => ("?", (100, 116, 139)),
    }
}

fn source_color(kind: &str) -> (u8, u8, u8) {
    match kind {
        "News" => (96, 165, 250),
        "Fact-Check" => (244, 114, 182),
        "Academic" => (129, 140, 248),
        "Government" | "Official" => (52, 211, 153),
        _ => (100, 116, 139),
    }
}

pub fn print_articles(articles: &[Article]) {
    println!("{}", style(format!("Evidence ({} articles)", articles.len())).bold());
    println!();
    for (i, article) in articles.iter().enumerate() {
        println!(
            "{}. {} {}",
            i + 1,
            style(&article.headline).bold(),
            style(format!("[{} · {}]", article.source, article.date)).dim()
        );
        if !article.snippet.is_empty() {
            println!("   {}", article.snippet);
        }
        if let Some(url) = &article.url {
            println!("   {}", style(url).dim().underlined());
        }
        println!();
    }
}

pub fn print_verification(verification: &Verification) {
    let report = &verification.report;

    print_score_line(report);
    println!();

    if !report.summary.is_empty() {
        println!("{}", report.summary);
        println!();
    }

    if !report.real_news_confirms.is_empty() {
        println!("{}", style("Confirmed by coverage").bold());
        println!("{}", report.real_news_confirms);
        println!();
    }

    if !report.flagged_claims.is_empty() {
        println!("{}", style("Claims").bold());
        for claim in &report.flagged_claims {
            print_claim(claim);
        }
        println!();
    }

    if !report.suggested_sources.is_empty() {
        println!("{}", style("Where to check further").bold());
        for source in &report.suggested_sources {
            print_source(source);
        }
        println!();
    }

    if !report.analysis_notes.is_empty() {
        println!("{}", style(&report.analysis_notes).dim());
        println!();
    }

    print_articles(&verification.evidence);
}

fn print_score_line(report: &CredibilityReport) {
    let (r, g, b) = score_color(report.credibility_score);
    println!(
        "{} {}  {}",
        style("Credibility:").bold(),
        format!("{}/100", report.credibility_score).truecolor(r, g, b).bold(),
        report.verdict.truecolor(r, g, b)
    );
}

fn print_claim(claim: &FlaggedClaim) {
    let (icon, (r, g, b)) = assessment_badge(&claim.assessment);
    println!(
        "  {} {} {}",
        icon.truecolor(r, g, b),
        style(&claim.claim).bold(),
        format!("[{} · {}%]", claim.assessment, claim.confidence).truecolor(r, g, b)
    );
    if !claim.explanation.is_empty() {
        println!("    {}", claim.explanation);
    }
}

fn print_source(source: &SuggestedSource) {
    let (r, g, b) = source_color(&source.kind);
    println!(
        "  {} {}",
        style(&source.name).bold(),
        source.kind.truecolor(r, g, b)
    );
    if !source.description.is_empty() {
        println!("    {}", source.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_color_bands() {
        assert_eq!(score_color(90), (34, 197, 94));
        assert_eq!(score_color(75), (34, 197, 94));
        assert_eq!(score_color(60), (245, 158, 11));
        assert_eq!(score_color(35), (249, 115, 22));
        assert_eq!(score_color(10), (239, 68, 68));
    }

    #[test]
    fn test_unknown_assessment_gets_neutral_badge() {
        let (icon, color) = assessment_badge("Speculative");
        assert_eq!(icon, "?");
        assert_eq!(color, (100, 116, 139));
    }
}
