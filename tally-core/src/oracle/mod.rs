//! Oracle capability traits and deterministic fallbacks
//!
//! The engine never talks to a text service directly; it goes through the
//! traits defined here so tests can inject scripted implementations.

mod scripted;
mod traits;

pub use scripted::{ScriptedClassifier, ScriptedImportanceScorer, ScriptedJudge, ScriptedNarrator};
pub use traits::{
    AnswerClassifier, Classification, ImportanceScorer, Narrator, RelevanceJudge, SummaryItem,
    DEFAULT_IMPORTANCE, FALLBACK_ANALYSIS, FALLBACK_CLASSIFICATION, fallback_should_ask,
    fallback_summary,
};
