//! Oracle traits and their failure fallbacks
//!
//! Four external text-service capabilities feed the engine: answer
//! classification, follow-up relevance, question importance, and narrative
//! generation. Each has a synchronous-looking async contract and a
//! documented deterministic fallback applied by the caller on failure, so
//! scoring completes even when every external service is down.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::OracleError;

/// Discrete judgment of an answer's completeness
///
/// Only `Yes` earns points; the other three values drive adaptive flow
/// control (follow-up triggering), never partial credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Yes,
    Partial,
    No,
    Unsure,
}

impl Classification {
    /// The wire-format string for this classification
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Yes => "yes",
            Classification::Partial => "partial",
            Classification::No => "no",
            Classification::Unsure => "unsure",
        }
    }

    /// Parse a classification token, tolerating surrounding noise case
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "yes" => Some(Classification::Yes),
            "partial" => Some(Classification::Partial),
            "no" => Some(Classification::No),
            "unsure" => Some(Classification::Unsure),
            _ => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification used when the classifier oracle fails or times out
pub const FALLBACK_CLASSIFICATION: Classification = Classification::Unsure;

/// Importance used when the importance oracle fails or times out
pub const DEFAULT_IMPORTANCE: f64 = 5.0;

/// Analysis text used when the narrator fails for a single answer
pub const FALLBACK_ANALYSIS: &str = "Analysis unavailable for this response.";

/// Relevance heuristic applied when the relevance oracle fails
///
/// A follow-up is worth asking when the base answer left a gap: the
/// respondent said no, or only partially covered the practice. `yes` and
/// `unsure` skip the follow-up.
pub fn fallback_should_ask(classification: Classification) -> bool {
    matches!(classification, Classification::Partial | Classification::No)
}

/// One answered question, as handed to the narrator for summarization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryItem {
    pub question: String,
    pub answer: String,
    pub importance: f64,
    pub analysis: String,
}

/// Data-only summary used when the narrator oracle fails
///
/// Lists strengths and gaps straight from the recorded answers, highest
/// importance first, so the caller always gets something reviewable.
pub fn fallback_summary(yes_items: &[SummaryItem], no_items: &[SummaryItem], score: f64) -> String {
    let mut out = format!(
        "Final score: {:.2}/100. Implemented: {} of {} practices.\n",
        score,
        yes_items.len(),
        yes_items.len() + no_items.len()
    );
    if !yes_items.is_empty() {
        out.push_str("\nStrengths:\n");
        for item in yes_items {
            out.push_str(&format!("- {} (importance {}/10)\n", item.question, item.importance));
        }
    }
    if !no_items.is_empty() {
        out.push_str("\nGaps:\n");
        for item in no_items {
            out.push_str(&format!("- {} (importance {}/10)\n", item.question, item.importance));
        }
    }
    out
}

/// Classifies a raw answer against its question
#[async_trait]
pub trait AnswerClassifier: Send + Sync {
    /// Classify `answer` as yes/partial/no/unsure for `question`
    async fn classify(&self, question: &str, answer: &str)
    -> Result<Classification, OracleError>;
}

/// Decides whether a configured follow-up is worth asking
#[async_trait]
pub trait RelevanceJudge: Send + Sync {
    /// Given the base question, the answer just given and its
    /// classification, decide whether `follow_up` should be surfaced
    async fn should_ask(
        &self,
        question: &str,
        answer: &str,
        classification: Classification,
        follow_up: &str,
    ) -> Result<bool, OracleError>;
}

/// Scores how critical a question is, on a 1-10 scale
///
/// Only consulted when a catalog ships without curated importance values.
#[async_trait]
pub trait ImportanceScorer: Send + Sync {
    async fn score_importance(&self, question: &str) -> Result<f64, OracleError>;
}

/// Produces per-answer analyses and the final narrative summary
#[async_trait]
pub trait Narrator: Send + Sync {
    /// Short insight for a single question/answer pair
    async fn analyze_answer(&self, question: &str, answer: &str) -> Result<String, OracleError>;

    /// Comprehensive final summary over all recorded answers
    async fn summarize(
        &self,
        yes_items: &[SummaryItem],
        no_items: &[SummaryItem],
        final_score: f64,
    ) -> Result<String, OracleError>;
}
