//! Prompt text for the three collaborator calls.
//!
//! System prompts are constants because they never change; user prompts are
//! builders because they embed per-search data. Keeping both here in one
//! place makes the model's contract reviewable at a glance.

use chrono::Local;

/// System prompt for the spelling-correction call
pub const SPELLING_SYSTEM: &str = "Fix typos only.";

/// User prompt for the spelling-correction call
pub fn spelling_prompt(query: &str) -> String {
    format!("Fix spelling: \"{query}\"\nReturn ONLY the corrected words, same count, no additions.")
}

/// System prompt for the entity-blocking relevance filter
pub const ENTITY_FILTER_SYSTEM: &str = "Block articles about entities user didn't mention.";

/// User prompt for the relevance filter. `digest` is the numbered
/// headline-plus-snippet list built from the normalized articles.
pub fn entity_filter_prompt(topic: &str, digest: &str) -> String {
    format!(
        r#"User searched for: "{topic}"

Articles:
{digest}

ENTITY BLOCKING RULES:
1. Extract ALL country names, company names, and specific entities from each article
2. Check if user mentioned those entities in their search "{topic}"
3. REJECT articles that focus on entities user did NOT mention
4. Example: User searched "US tariffs" (mentions: US)
   - Article about "India's exports to US" -> REJECT (focuses on India, not mentioned)
   - Article about "US-China trade war" -> REJECT (focuses on China, not mentioned)
   - Article about "US announces new tariffs" -> KEEP (general US news)

Return ONLY the numbers of articles to KEEP (e.g., "2,5,7").
If ALL should be kept -> "ALL"
If NONE should be kept -> "NONE"

Numbers to keep:"#
    )
}

/// System prompt for the credibility assessment call
pub const ASSESSMENT_SYSTEM: &str = r#"You are a senior fact-checker and misinformation analyst.
You will be given a topic and a set of real news articles fetched today.
Your job is to verify the topic against those articles.

RULES:
- "Verified"      = at least one credible article confirms this
- "False"         = articles directly contradict this
- "Misleading"    = technically true but missing key context
- "Needs Context" = partially true, needs clarification
- "Unverified"    = genuinely zero coverage in the articles (rare)
- Score 75-95 for confirmed claims. 10-35 for false. 40-70 for mixed.
- Always name the actual source when explaining a verdict
- Break the topic into 3-5 specific sub-claims and assess each separately
- Be decisive - never default to Unverified when you have evidence

CRITICAL: Reply with ONLY a raw JSON object. No markdown. No explanation before or after."#;

/// User prompt for the credibility assessment call
pub fn assessment_prompt(topic: &str, context: &str, article_count: usize) -> String {
    let date = Local::now().format("%B %-d, %Y");
    format!(
        r#"Today is {date}.

TOPIC TO VERIFY: "{topic}"

LIVE NEWS ARTICLES ({article_count} fetched right now):
{context}

Return ONLY this JSON structure:
{{
  "credibilityScore": <0-100>,
  "verdict": "<Credible | Mostly Credible | Mixed | Questionable | Misleading | False>",
  "summary": "<2-3 sentence overview of what these articles actually say>",
  "realNewsConfirms": "<specific facts confirmed by the articles - name sources and dates>",
  "flaggedClaims": [
    {{
      "claim": "<specific sub-claim extracted from the topic>",
      "assessment": "<Verified | False | Misleading | Needs Context | Unverified>",
      "explanation": "<cite specific source: 'According to [Source] ([date])...'>",
      "confidence": <0-100>
    }}
  ],
  "suggestedSources": [
    {{
      "name": "<real outlet or org>",
      "type": "<News|Fact-Check|Government|Academic>",
      "description": "<why check this for this topic>"
    }}
  ],
  "analysisNotes": "<1-2 sentence overall credibility takeaway>"
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spelling_prompt_embeds_query() {
        let prompt = spelling_prompt("bitcon price");
        assert!(prompt.contains("\"bitcon price\""));
        assert!(prompt.contains("same count"));
    }

    #[test]
    fn test_entity_filter_prompt_contains_sentinels() {
        let prompt = entity_filter_prompt("us tariffs", "0. Headline\n   snippet...");
        assert!(prompt.contains("\"us tariffs\""));
        assert!(prompt.contains("\"ALL\""));
        assert!(prompt.contains("\"NONE\""));
        assert!(prompt.contains("Numbers to keep:"));
    }

    #[test]
    fn test_assessment_prompt_contains_schema() {
        let prompt = assessment_prompt("tesla", "1. [Reuters · Recent] Headline", 1);
        assert!(prompt.contains("TOPIC TO VERIFY: \"tesla\""));
        assert!(prompt.contains("credibilityScore"));
        assert!(prompt.contains("flaggedClaims"));
        assert!(prompt.contains("suggestedSources"));
        assert!(prompt.starts_with("Today is "));
    }
}
