//! Follow-up question catalog
//!
//! Follow-ups are conditional: configured against a base question, they
//! only become candidates when the base answer's classification lands in
//! their trigger set, and only enter a session's queue after the relevance
//! judge (or its fallback heuristic) says they are worth asking.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::oracle::Classification;

/// Structural marker separating a follow-up id from its base question id
pub const FOLLOW_UP_MARKER: &str = "_followup_";

/// Whether an id names a follow-up rather than a base question
pub fn is_follow_up_id(question_id: &str) -> bool {
    question_id.contains(FOLLOW_UP_MARKER)
}

/// The base question id embedded in a follow-up id, if any
pub fn base_question_id(question_id: &str) -> Option<&str> {
    question_id
        .find(FOLLOW_UP_MARKER)
        .map(|idx| &question_id[..idx])
}

/// A conditional clarifying question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUpQuestion {
    pub id: String,
    pub text: String,
    pub max_score: f64,
    pub trigger_classifications: Vec<Classification>,
    pub base_question_id: String,
}

impl FollowUpQuestion {
    /// Whether this follow-up is triggered by the given classification
    pub fn triggered_by(&self, classification: Classification) -> bool {
        self.trigger_classifications.contains(&classification)
    }
}

/// Read-only mapping from base question id to its configured follow-ups
#[derive(Debug, Clone, Default)]
pub struct FollowUpCatalog {
    by_base: HashMap<String, Vec<FollowUpQuestion>>,
}

impl FollowUpCatalog {
    pub(crate) fn new() -> Self {
        Self {
            by_base: HashMap::new(),
        }
    }

    /// Register a follow-up under its base question
    pub(crate) fn insert(&mut self, follow_up: FollowUpQuestion) {
        self.by_base
            .entry(follow_up.base_question_id.clone())
            .or_default()
            .push(follow_up);
    }

    /// All follow-ups configured for a base question
    pub fn all_for(&self, base_question_id: &str) -> &[FollowUpQuestion] {
        self.by_base
            .get(base_question_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Follow-ups for a base question whose trigger set contains the
    /// classification just produced
    pub fn matching(
        &self,
        base_question_id: &str,
        classification: Classification,
    ) -> Vec<&FollowUpQuestion> {
        self.all_for(base_question_id)
            .iter()
            .filter(|f| f.triggered_by(classification))
            .collect()
    }

    /// Look up a follow-up by its own id
    pub fn by_id(&self, follow_up_id: &str) -> Option<&FollowUpQuestion> {
        let base = base_question_id(follow_up_id)?;
        self.all_for(base).iter().find(|f| f.id == follow_up_id)
    }

    /// Total number of configured follow-ups
    pub fn len(&self) -> usize {
        self.by_base.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_base.is_empty()
    }
}
