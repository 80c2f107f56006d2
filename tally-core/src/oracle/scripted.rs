//! Scripted oracle implementations for testing
//!
//! Each scripted oracle consumes a queue of canned outcomes, falling back
//! to a configurable default once the queue runs dry, and records the
//! calls it received so tests can assert on them.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::OracleError;

use super::traits::{
    AnswerClassifier, Classification, ImportanceScorer, Narrator, RelevanceJudge, SummaryItem,
};

/// Scripted implementation of [`AnswerClassifier`]
///
/// Queue outcomes with `queue()`/`queue_error()` before use. Each
/// `classify()` consumes one queued outcome; an empty queue yields the
/// default classification.
pub struct ScriptedClassifier {
    default: Classification,
    script: Mutex<VecDeque<Result<Classification, OracleError>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedClassifier {
    /// Create a classifier that answers `default` when the queue is empty
    pub fn new(default: Classification) -> Self {
        Self {
            default,
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a classification outcome
    pub fn queue(&self, classification: Classification) {
        self.script.lock().unwrap().push_back(Ok(classification));
    }

    /// Queue an oracle failure
    pub fn queue_error(&self, message: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(OracleError::Request(message.to_string())));
    }

    /// The (question, answer) pairs received so far
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerClassifier for ScriptedClassifier {
    async fn classify(
        &self,
        question: &str,
        answer: &str,
    ) -> Result<Classification, OracleError> {
        self.calls
            .lock()
            .unwrap()
            .push((question.to_string(), answer.to_string()));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(self.default))
    }
}

/// Scripted implementation of [`RelevanceJudge`]
pub struct ScriptedJudge {
    default: bool,
    script: Mutex<VecDeque<Result<bool, OracleError>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedJudge {
    /// Create a judge that answers `default` when the queue is empty
    pub fn new(default: bool) -> Self {
        Self {
            default,
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a relevance decision
    pub fn queue(&self, should_ask: bool) {
        self.script.lock().unwrap().push_back(Ok(should_ask));
    }

    /// Queue an oracle failure
    pub fn queue_error(&self, message: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(OracleError::Request(message.to_string())));
    }

    /// The follow-up texts the judge was consulted about
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RelevanceJudge for ScriptedJudge {
    async fn should_ask(
        &self,
        _question: &str,
        _answer: &str,
        _classification: Classification,
        follow_up: &str,
    ) -> Result<bool, OracleError> {
        self.calls.lock().unwrap().push(follow_up.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(self.default))
    }
}

/// Scripted implementation of [`ImportanceScorer`]
pub struct ScriptedImportanceScorer {
    script: Mutex<VecDeque<Result<f64, OracleError>>>,
    default: f64,
}

impl ScriptedImportanceScorer {
    pub fn new(default: f64) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default,
        }
    }

    pub fn queue(&self, importance: f64) {
        self.script.lock().unwrap().push_back(Ok(importance));
    }

    pub fn queue_error(&self, message: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(OracleError::Request(message.to_string())));
    }
}

#[async_trait]
impl ImportanceScorer for ScriptedImportanceScorer {
    async fn score_importance(&self, _question: &str) -> Result<f64, OracleError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(self.default))
    }
}

/// Scripted implementation of [`Narrator`]
///
/// Returns fixed texts, or fails every call when constructed with
/// `failing()`.
pub struct ScriptedNarrator {
    analysis: String,
    summary: String,
    fail: bool,
}

impl ScriptedNarrator {
    /// Narrator that returns the given texts on every call
    pub fn new(analysis: &str, summary: &str) -> Self {
        Self {
            analysis: analysis.to_string(),
            summary: summary.to_string(),
            fail: false,
        }
    }

    /// Narrator whose every call fails
    pub fn failing() -> Self {
        Self {
            analysis: String::new(),
            summary: String::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl Narrator for ScriptedNarrator {
    async fn analyze_answer(&self, _question: &str, _answer: &str) -> Result<String, OracleError> {
        if self.fail {
            return Err(OracleError::Timeout(20));
        }
        Ok(self.analysis.clone())
    }

    async fn summarize(
        &self,
        _yes_items: &[SummaryItem],
        _no_items: &[SummaryItem],
        _final_score: f64,
    ) -> Result<String, OracleError> {
        if self.fail {
            return Err(OracleError::Timeout(40));
        }
        Ok(self.summary.clone())
    }
}
