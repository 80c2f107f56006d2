//! Ollama-backed oracle.
//!
//! Implements all four oracle capabilities against a local Ollama
//! instance. Every call is bounded by a timeout and returns a typed
//! error on failure; the engine maps those errors onto its deterministic
//! fallbacks, so a dead or slow Ollama degrades the assessment instead
//! of breaking it.
//!
//! # Example
//!
//! ```ignore
//! use tally_oracles::OllamaOracle;
//!
//! let oracle = OllamaOracle::new("llama3.1");  // Uses localhost:11434
//! let oracle = OllamaOracle::new("llama3.1").with_base_url("http://192.168.1.100:11434");
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tally_core::error::OracleError;
use tally_core::oracle::{
    AnswerClassifier, Classification, ImportanceScorer, Narrator, RelevanceJudge, SummaryItem,
};

/// Default Ollama API base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default per-call timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CLASSIFY_PROMPT: &str = "You are evaluating an answer to a governance questionnaire.\n\
Question: {question}\n\
Answer: {answer}\n\
Classify the answer as exactly one word: yes (the practice is fully in place), \
partial (partly in place), no (not in place), or unsure (the answer does not say). \
Respond with only that word.";

const RELEVANCE_PROMPT: &str = "A respondent was asked: {question}\n\
They answered: {answer}\n\
That answer was classified as: {classification}\n\
Considering their answer, is the clarifying question below still worth asking?\n\
Clarifying question: {follow_up}\n\
Respond with only yes or no.";

const IMPORTANCE_PROMPT: &str = "Rate how critical the following governance practice is \
on a scale of 1 to 10, where 10 is most critical.\n\
Practice: {question}\n\
Respond with only the number.";

const ANALYZE_PROMPT: &str = "You are reviewing a governance questionnaire response.\n\
Question: {question}\n\
Answer: {answer}\n\
Write one or two sentences of practical insight about this response. \
Be specific and constructive.";

const SUMMARIZE_PROMPT: &str = "An organization completed a governance assessment and scored \
{score:.2} out of 100.\n\n\
Practices in place:\n{strengths}\n\
Practices missing or incomplete:\n{gaps}\n\
Write a concise executive summary: overall posture, the most important \
gaps to address first, and concrete next steps.";

// ────────────────────────────────────────────────────────────────────────────
// Ollama API Types
// ────────────────────────────────────────────────────────────────────────────

/// Message in an Ollama chat request/response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaChatMessage {
    pub role: String,
    pub content: String,
}

/// Request body for Ollama's `/api/chat` endpoint.
#[derive(Debug, Serialize)]
pub struct OllamaChatRequest {
    pub model: String,
    pub messages: Vec<OllamaChatMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<OllamaChatOptions>,
}

/// Chat options for Ollama.
#[derive(Debug, Serialize)]
pub struct OllamaChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
}

/// Response from Ollama's `/api/chat` endpoint.
#[derive(Debug, Deserialize)]
pub struct OllamaChatResponse {
    pub message: OllamaChatMessage,
    pub done: bool,
}

/// Response from Ollama's `/api/tags` endpoint.
#[derive(Debug, Deserialize)]
pub struct OllamaTagsResponse {
    pub models: Vec<OllamaModel>,
}

/// Model information from Ollama's API.
#[derive(Debug, Deserialize)]
pub struct OllamaModel {
    pub name: String,
}

/// Readiness of the Ollama endpoint backing this oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub reachable: bool,
    pub model_present: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// OllamaOracle
// ────────────────────────────────────────────────────────────────────────────

/// Oracle backed by a local Ollama instance.
pub struct OllamaOracle {
    base_url: String,
    model: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OllamaOracle {
    /// Create an oracle against the default URL (localhost:11434).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            client: reqwest::Client::new(),
        }
    }

    /// Create an oracle from the `OLLAMA_HOST` environment variable,
    /// falling back to the default URL.
    pub fn from_env(model: impl Into<String>) -> Self {
        let base_url =
            std::env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(model).with_base_url(base_url)
    }

    /// Point the oracle at a custom base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check that Ollama is reachable and the configured model is pulled.
    pub async fn check_health(&self) -> HealthStatus {
        let url = format!("{}/api/tags", self.base_url);
        let response = match self.client.get(&url).send().await {
            Ok(r) if r.status().is_success() => r,
            _ => {
                return HealthStatus {
                    reachable: false,
                    model_present: false,
                };
            }
        };
        let model_present = match response.json::<OllamaTagsResponse>().await {
            Ok(tags) => tags
                .models
                .iter()
                .any(|m| m.name == self.model || m.name.starts_with(&format!("{}:", self.model))),
            Err(_) => false,
        };
        HealthStatus {
            reachable: true,
            model_present,
        }
    }

    /// One non-streaming chat completion, bounded by the call timeout.
    async fn chat(&self, prompt: String, options: OllamaChatOptions) -> Result<String, OracleError> {
        let url = format!("{}/api/chat", self.base_url);
        let request = OllamaChatRequest {
            model: self.model.clone(),
            messages: vec![OllamaChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            stream: false,
            options: Some(options),
        };

        let send = async {
            let response = self
                .client
                .post(&url)
                .json(&request)
                .send()
                .await
                .map_err(|e| OracleError::Request(e.to_string()))?;
            if !response.status().is_success() {
                return Err(OracleError::Request(format!(
                    "Ollama API returned status {}",
                    response.status()
                )));
            }
            let body: OllamaChatResponse = response
                .json()
                .await
                .map_err(|e| OracleError::BadResponse(e.to_string()))?;
            Ok(body.message.content)
        };

        let content = tokio::time::timeout(Duration::from_secs(self.timeout_secs), send)
            .await
            .map_err(|_| OracleError::Timeout(self.timeout_secs))??;
        debug!(model = %self.model, chars = content.len(), "ollama responded");
        Ok(content)
    }

    fn short_options() -> OllamaChatOptions {
        OllamaChatOptions {
            temperature: Some(0.1),
            num_predict: Some(16),
        }
    }

    fn narrative_options() -> OllamaChatOptions {
        OllamaChatOptions {
            temperature: Some(0.7),
            num_predict: Some(1024),
        }
    }
}

/// Extract the classification token from a model response.
fn parse_classification(text: &str) -> Result<Classification, OracleError> {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|t| !t.is_empty())
        .find_map(Classification::parse)
        .ok_or_else(|| OracleError::BadResponse(format!("no classification token in {text:?}")))
}

/// Extract a yes/no decision from a model response.
fn parse_yes_no(text: &str) -> Result<bool, OracleError> {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|t| !t.is_empty())
        .find_map(|token| match token.to_lowercase().as_str() {
            "yes" => Some(true),
            "no" => Some(false),
            _ => None,
        })
        .ok_or_else(|| OracleError::BadResponse(format!("no yes/no token in {text:?}")))
}

/// Extract the first number from a model response, clamped to [1, 10].
fn parse_importance(text: &str) -> Result<f64, OracleError> {
    text.split(|c: char| !c.is_ascii_digit() && c != '.')
        .filter(|t| !t.is_empty())
        .find_map(|token| token.parse::<f64>().ok())
        .map(|value| value.clamp(1.0, 10.0))
        .ok_or_else(|| OracleError::BadResponse(format!("no number in {text:?}")))
}

fn bullet_list(items: &[SummaryItem]) -> String {
    if items.is_empty() {
        return "(none)\n".to_string();
    }
    let mut out = String::new();
    for item in items {
        out.push_str(&format!(
            "- {} (importance {}/10)\n",
            item.question, item.importance
        ));
    }
    out
}

#[async_trait]
impl AnswerClassifier for OllamaOracle {
    async fn classify(&self, question: &str, answer: &str) -> Result<Classification, OracleError> {
        let prompt = CLASSIFY_PROMPT
            .replace("{question}", question)
            .replace("{answer}", answer);
        let response = self.chat(prompt, Self::short_options()).await?;
        parse_classification(&response)
    }
}

#[async_trait]
impl RelevanceJudge for OllamaOracle {
    async fn should_ask(
        &self,
        question: &str,
        answer: &str,
        classification: Classification,
        follow_up: &str,
    ) -> Result<bool, OracleError> {
        let prompt = RELEVANCE_PROMPT
            .replace("{question}", question)
            .replace("{answer}", answer)
            .replace("{classification}", classification.as_str())
            .replace("{follow_up}", follow_up);
        let response = self.chat(prompt, Self::short_options()).await?;
        parse_yes_no(&response)
    }
}

#[async_trait]
impl ImportanceScorer for OllamaOracle {
    async fn score_importance(&self, question: &str) -> Result<f64, OracleError> {
        let prompt = IMPORTANCE_PROMPT.replace("{question}", question);
        let response = self.chat(prompt, Self::short_options()).await?;
        parse_importance(&response)
    }
}

#[async_trait]
impl Narrator for OllamaOracle {
    async fn analyze_answer(&self, question: &str, answer: &str) -> Result<String, OracleError> {
        let prompt = ANALYZE_PROMPT
            .replace("{question}", question)
            .replace("{answer}", answer);
        let response = self.chat(prompt, Self::narrative_options()).await?;
        Ok(response.trim().to_string())
    }

    async fn summarize(
        &self,
        yes_items: &[SummaryItem],
        no_items: &[SummaryItem],
        final_score: f64,
    ) -> Result<String, OracleError> {
        let prompt = SUMMARIZE_PROMPT
            .replace("{score:.2}", &format!("{final_score:.2}"))
            .replace("{strengths}", &bullet_list(yes_items))
            .replace("{gaps}", &bullet_list(no_items));
        let response = self.chat(prompt, Self::narrative_options()).await?;
        Ok(response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Parsing Tests ====================

    #[test]
    fn classification_token_is_found_in_noise() {
        assert_eq!(
            parse_classification("Yes.").unwrap(),
            Classification::Yes
        );
        assert_eq!(
            parse_classification("The answer is: partial").unwrap(),
            Classification::Partial
        );
        assert_eq!(
            parse_classification("  UNSURE\n").unwrap(),
            Classification::Unsure
        );
    }

    #[test]
    fn classification_without_token_is_an_error() {
        assert!(parse_classification("maybe, hard to tell").is_err());
        assert!(parse_classification("").is_err());
    }

    #[test]
    fn yes_no_parses_first_decision_token() {
        assert!(parse_yes_no("Yes, ask it.").unwrap());
        assert!(!parse_yes_no("no").unwrap());
        assert!(parse_yes_no("definitely worth asking").is_err());
    }

    #[test]
    fn importance_takes_first_number_clamped() {
        assert_eq!(parse_importance("8").unwrap(), 8.0);
        assert_eq!(parse_importance("I'd rate this 7.5 out of 10").unwrap(), 7.5);
        assert_eq!(parse_importance("42").unwrap(), 10.0);
        assert_eq!(parse_importance("0.2").unwrap(), 1.0);
        assert!(parse_importance("very important").is_err());
    }

    // ==================== Wire Format Tests ====================

    #[test]
    fn chat_response_deserializes() {
        let json = r#"{
            "model": "llama3.1",
            "created_at": "2025-01-01T00:00:00Z",
            "message": {"role": "assistant", "content": "yes"},
            "done": true
        }"#;
        let response: OllamaChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.message.content, "yes");
        assert!(response.done);
    }

    #[test]
    fn chat_request_serializes_options() {
        let request = OllamaChatRequest {
            model: "llama3.1".to_string(),
            messages: vec![OllamaChatMessage {
                role: "user".to_string(),
                content: "hello".to_string(),
            }],
            stream: false,
            options: Some(OllamaOracle::short_options()),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"stream\":false"));
        assert!(json.contains("\"num_predict\":16"));
    }

    #[test]
    fn tags_response_deserializes() {
        let json = r#"{"models": [{"name": "llama3.1:8b", "size": 123}]}"#;
        let tags: OllamaTagsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(tags.models[0].name, "llama3.1:8b");
    }

    #[test]
    fn bullet_list_handles_empty_and_items() {
        assert_eq!(bullet_list(&[]), "(none)\n");
        let items = vec![SummaryItem {
            question: "Is MFA enabled?".to_string(),
            answer: "yes".to_string(),
            importance: 8.0,
            analysis: String::new(),
        }];
        assert!(bullet_list(&items).contains("Is MFA enabled? (importance 8/10)"));
    }

    // ==================== Builder Tests ====================

    #[test]
    fn builder_overrides_defaults() {
        let oracle = OllamaOracle::new("llama3.1")
            .with_base_url("http://10.0.0.2:11434")
            .with_timeout(5);
        assert_eq!(oracle.base_url(), "http://10.0.0.2:11434");
        assert_eq!(oracle.model(), "llama3.1");
        assert_eq!(oracle.timeout_secs, 5);
    }

    // ==================== Live Integration Tests ====================

    #[tokio::test]
    #[ignore = "requires Ollama running locally"]
    async fn health_check_reports_reachable() {
        let oracle = OllamaOracle::from_env("llama3.1");
        let health = oracle.check_health().await;
        assert!(health.reachable);
    }

    #[tokio::test]
    #[ignore = "requires Ollama running locally with a model installed"]
    async fn classify_live_answer() {
        let oracle = OllamaOracle::from_env("llama3.1");
        let classification = oracle
            .classify(
                "Is MFA enabled for all organization members?",
                "Yes, it is enforced for everyone via SSO.",
            )
            .await
            .unwrap();
        assert_eq!(classification, Classification::Yes);
    }
}
