//! Chat-model collaborator client (OpenAI chat format).
//!
//! Groq, OpenAI, Mistral and most other hosted providers speak the same
//! messages-array wire format, so one client covers them all. The pipeline
//! treats the model as an unreliable remote procedure: this module only
//! moves text in and out, validation lives with the callers.

use crate::config::LlmConfig;
use crate::error::PipelineError;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// One system-plus-user completion against a chat model.
///
/// Implemented by [`LlmClient`] in production and by scripted stubs in
/// policy tests.
#[allow(async_fn_in_trait)]
pub trait ChatModel {
    async fn complete(&self, system: &str, user: &str) -> Result<String, PipelineError>;
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Production chat client
pub struct LlmClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            config,
        }
    }
}

impl ChatModel for LlmClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, PipelineError> {
        let payload = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });

        debug!("LLM request: {} chars to {}", user.len(), self.config.model);

        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PipelineError::Collaborator(format!("LLM request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            // Error bodies carry {"error": {"message": "..."}}
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| {
                    v.pointer("/error/message")
                        .and_then(|m| m.as_str())
                        .map(String::from)
                })
                .unwrap_or_else(|| status.to_string());
            return Err(PipelineError::Collaborator(format!("LLM error: {message}")));
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Collaborator(format!("Malformed LLM response: {e}")))?;

        reply
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| PipelineError::Collaborator("Empty LLM response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_response_shape() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"2,5,7"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "2,5,7");
    }

    #[test]
    fn test_chat_response_empty_choices() {
        let raw = r#"{"choices":[]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.choices.is_empty());
    }
}
