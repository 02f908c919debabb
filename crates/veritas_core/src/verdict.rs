//! Structured verdict parsed from the assessment model's reply.
//!
//! Only syntactic validity is guaranteed here: the reply must reduce to one
//! JSON object. Field contents render best-effort downstream, so every field
//! is defaulted rather than validated - a missing score or an unexpected
//! verdict label is the renderer's problem, not a parse failure.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

/// The assessment payload, camelCase on the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CredibilityReport {
    /// 0-100; thresholds for rendering live with the presentation layer
    pub credibility_score: i64,
    /// One of six labels (Credible .. False), not validated
    pub verdict: String,
    pub summary: String,
    pub real_news_confirms: String,
    pub flagged_claims: Vec<FlaggedClaim>,
    pub suggested_sources: Vec<SuggestedSource>,
    pub analysis_notes: String,
}

/// One sub-claim extracted from the topic and assessed separately
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlaggedClaim {
    pub claim: String,
    /// Verified | False | Misleading | Needs Context | Unverified
    pub assessment: String,
    pub explanation: String,
    pub confidence: i64,
}

/// An outlet or organization worth consulting on the topic
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestedSource {
    pub name: String,
    /// News | Fact-Check | Government | Academic
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

/// Extract and parse the JSON object embedded in free-form assessment text.
///
/// Models wrap JSON in markdown fences or pad it with prose despite being
/// told not to; fence tokens are stripped and the slice between the first
/// `{` and the last `}` is what gets parsed.
pub fn parse_assessment(text: &str) -> Result<CredibilityReport, PipelineError> {
    let stripped = text.replace("```json", "").replace("```", "");

    let start = stripped.find('{').ok_or(PipelineError::NoJson)?;
    let end = stripped.rfind('}').ok_or(PipelineError::NoJson)?;
    if end < start {
        return Err(PipelineError::NoJson);
    }

    let report = serde_json::from_str(&stripped[start..=end])?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "credibilityScore": 82,
        "verdict": "Mostly Credible",
        "summary": "Coverage broadly confirms the topic.",
        "realNewsConfirms": "Reuters (Feb 10) confirms the recall figure.",
        "flaggedClaims": [
            {
                "claim": "Tesla recalled 2 million vehicles",
                "assessment": "Verified",
                "explanation": "According to Reuters (Feb 10)...",
                "confidence": 90
            }
        ],
        "suggestedSources": [
            {
                "name": "Reuters",
                "type": "News",
                "description": "Primary wire coverage of the recall"
            }
        ],
        "analysisNotes": "Consistent reporting across outlets."
    }"#;

    #[test]
    fn test_parse_plain_json() {
        let report = parse_assessment(SAMPLE).unwrap();
        assert_eq!(report.credibility_score, 82);
        assert_eq!(report.verdict, "Mostly Credible");
        assert_eq!(report.flagged_claims.len(), 1);
        assert_eq!(report.flagged_claims[0].assessment, "Verified");
        assert_eq!(report.suggested_sources[0].kind, "News");
    }

    #[test]
    fn test_parse_fenced_json_with_prose() {
        let text = format!("Sure, here is the analysis:\n```json\n{SAMPLE}\n```\nLet me know!");
        let report = parse_assessment(&text).unwrap();
        assert_eq!(report.credibility_score, 82);
    }

    #[test]
    fn test_parse_bare_fence_tokens() {
        let text = format!("```\n{SAMPLE}\n```");
        assert!(parse_assessment(&text).is_ok());
    }

    #[test]
    fn test_missing_fields_default() {
        let report = parse_assessment(r#"{"verdict": "Mixed"}"#).unwrap();
        assert_eq!(report.verdict, "Mixed");
        assert_eq!(report.credibility_score, 0);
        assert!(report.flagged_claims.is_empty());
        assert!(report.summary.is_empty());
    }

    #[test]
    fn test_no_braces_is_no_json() {
        assert!(matches!(
            parse_assessment("I could not produce a verdict."),
            Err(PipelineError::NoJson)
        ));
        assert!(matches!(parse_assessment(""), Err(PipelineError::NoJson)));
    }

    #[test]
    fn test_reversed_braces_is_no_json() {
        assert!(matches!(
            parse_assessment("} nothing here {"),
            Err(PipelineError::NoJson)
        ));
    }

    #[test]
    fn test_truncated_json_is_bad_json() {
        let err = parse_assessment(r#"{"credibilityScore": 82, "verdict"}"#).unwrap_err();
        assert!(matches!(err, PipelineError::BadJson(_)));
    }
}
