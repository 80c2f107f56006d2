//! Assessment session state
//!
//! A session owns its weighted catalog snapshot plus everything recorded
//! while the respondent works through it: scores, classifications, the
//! follow-up queue, and the per-answer log the final report is built
//! from. Sessions are pure state; the scheduler drives the transitions.

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::catalog::{Catalog, FollowUpQuestion, Question, is_follow_up_id};
use crate::oracle::Classification;

/// Lifecycle phase of an assessment session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentPhase {
    NotStarted,
    InProgress,
    Completed,
}

/// A question as surfaced to the respondent
///
/// Resolved once when an answer arrives, so downstream code never
/// re-derives whether an id names a base question or a follow-up.
#[derive(Debug, Clone, PartialEq)]
pub enum AskedQuestion {
    Base(Question),
    FollowUp(FollowUpQuestion),
}

impl AskedQuestion {
    pub fn id(&self) -> &str {
        match self {
            AskedQuestion::Base(q) => &q.id,
            AskedQuestion::FollowUp(f) => &f.id,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            AskedQuestion::Base(q) => &q.text,
            AskedQuestion::FollowUp(f) => &f.text,
        }
    }

    pub fn max_score(&self) -> f64 {
        match self {
            AskedQuestion::Base(q) => q.max_score,
            AskedQuestion::FollowUp(f) => f.max_score,
        }
    }

    pub fn is_follow_up(&self) -> bool {
        matches!(self, AskedQuestion::FollowUp(_))
    }
}

/// One answered question, as logged for the final report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: String,
    pub question_text: String,
    pub answer: String,
    pub classification: Classification,
    pub score_earned: f64,
    pub max_score: f64,
    pub importance: f64,
    pub analysis: String,
    pub is_follow_up: bool,
}

/// Mutable state for one in-flight assessment
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    id: String,
    catalog: Catalog,
    phase: AssessmentPhase,
    /// Index into the catalog's question order, advanced past answers
    cursor: usize,
    base_order: Vec<String>,
    pending_follow_ups: VecDeque<FollowUpQuestion>,
    surfaced_follow_up_ids: HashSet<String>,
    question_scores: HashMap<String, f64>,
    records: Vec<AnswerRecord>,
    last_accessed: DateTime<Utc>,
}

impl AssessmentSession {
    pub fn new(catalog: Catalog) -> Self {
        let base_order = catalog.ordered_questions().map(|q| q.id.clone()).collect();
        Self {
            id: Uuid::new_v4().to_string(),
            catalog,
            phase: AssessmentPhase::NotStarted,
            cursor: 0,
            base_order,
            pending_follow_ups: VecDeque::new(),
            surfaced_follow_up_ids: HashSet::new(),
            question_scores: HashMap::new(),
            records: Vec::new(),
            last_accessed: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn phase(&self) -> AssessmentPhase {
        self.phase
    }

    pub fn question_scores(&self) -> &HashMap<String, f64> {
        &self.question_scores
    }

    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    pub fn last_accessed(&self) -> DateTime<Utc> {
        self.last_accessed
    }

    /// Refresh the idle timestamp the registry's TTL sweep reads
    pub fn touch(&mut self) {
        self.last_accessed = Utc::now();
    }

    /// The question the respondent should answer next, if any
    ///
    /// Pending follow-ups drain before remaining base questions. Peek
    /// semantics: repeated calls without an intervening answer return
    /// the same question. `None` means every question is answered.
    pub fn next_question(&mut self) -> Option<AskedQuestion> {
        self.touch();
        if let Some(follow_up) = self.pending_follow_ups.front() {
            return Some(AskedQuestion::FollowUp(follow_up.clone()));
        }
        while self.cursor < self.base_order.len() {
            let id = &self.base_order[self.cursor];
            if !self.question_scores.contains_key(id) {
                let question = self.catalog.find_question(id)?.clone();
                return Some(AskedQuestion::Base(question));
            }
            self.cursor += 1;
        }
        None
    }

    /// Whether every base question and surfaced follow-up is answered
    pub fn is_exhausted(&self) -> bool {
        self.pending_follow_ups.is_empty()
            && self
                .base_order
                .iter()
                .all(|id| self.question_scores.contains_key(id))
    }

    /// Resolve a question id the respondent is answering
    ///
    /// Follow-up ids resolve only after the session surfaced them, so a
    /// caller cannot answer a follow-up that was never asked.
    pub fn resolve(&self, question_id: &str) -> Option<AskedQuestion> {
        if is_follow_up_id(question_id) {
            if !self.surfaced_follow_up_ids.contains(question_id) {
                return None;
            }
            return self
                .catalog
                .follow_ups()
                .by_id(question_id)
                .cloned()
                .map(AskedQuestion::FollowUp);
        }
        self.catalog
            .find_question(question_id)
            .cloned()
            .map(AskedQuestion::Base)
    }

    /// Queue a follow-up for asking; idempotent per follow-up id
    ///
    /// Returns whether the follow-up was newly enqueued.
    pub fn enqueue_follow_up(&mut self, follow_up: FollowUpQuestion) -> bool {
        if !self.surfaced_follow_up_ids.insert(follow_up.id.clone()) {
            return false;
        }
        debug!(session_id = %self.id, follow_up_id = %follow_up.id, "follow-up enqueued");
        self.pending_follow_ups.push_back(follow_up);
        true
    }

    /// Record a scored answer and advance the session
    pub fn record_answer(&mut self, record: AnswerRecord) {
        self.phase = AssessmentPhase::InProgress;
        self.touch();
        if record.is_follow_up {
            self.pending_follow_ups
                .retain(|f| f.id != record.question_id);
        }
        self.question_scores
            .insert(record.question_id.clone(), record.score_earned);
        self.records.push(record);
    }

    /// Whether a question id already has a recorded answer
    pub fn is_answered(&self, question_id: &str) -> bool {
        self.question_scores.contains_key(question_id)
    }

    pub fn mark_completed(&mut self) {
        self.phase = AssessmentPhase::Completed;
    }

    /// Re-derive recorded scores from the catalog's current weights
    ///
    /// Called after a redistribution so earned points track the final
    /// rubric. Base questions rescore from their classification;
    /// follow-up bonuses keep their fixed point values.
    pub fn rescore(&mut self) {
        for record in &mut self.records {
            if record.is_follow_up {
                continue;
            }
            if let Some(question) = self.catalog.find_question(&record.question_id) {
                record.max_score = question.max_score;
                record.importance = question.importance;
                record.score_earned =
                    crate::scoring::score_for(record.classification, question.max_score);
                self.question_scores
                    .insert(record.question_id.clone(), record.score_earned);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RepositoryTool;

    fn session() -> AssessmentSession {
        AssessmentSession::new(Catalog::for_repository(RepositoryTool::Github).unwrap())
    }

    fn record(id: &str, classification: Classification, earned: f64) -> AnswerRecord {
        AnswerRecord {
            question_id: id.to_string(),
            question_text: String::new(),
            answer: "an answer".to_string(),
            classification,
            score_earned: earned,
            max_score: earned,
            importance: 5.0,
            analysis: String::new(),
            is_follow_up: is_follow_up_id(id),
        }
    }

    fn follow_up(session: &AssessmentSession, id: &str) -> FollowUpQuestion {
        session.catalog().follow_ups().by_id(id).unwrap().clone()
    }

    // ==================== Question Flow Tests ====================

    #[test]
    fn next_question_walks_base_questions_in_order() {
        let mut s = session();
        let first = s.next_question().unwrap();
        assert_eq!(first.id(), "github_1");
        assert!(!first.is_follow_up());

        s.record_answer(record("github_1", Classification::Yes, first.max_score()));
        assert_eq!(s.next_question().unwrap().id(), "github_2");
    }

    #[test]
    fn next_question_is_stable_until_answered() {
        let mut s = session();
        assert_eq!(s.next_question().unwrap().id(), s.next_question().unwrap().id());
    }

    #[test]
    fn pending_follow_ups_come_before_base_questions() {
        let mut s = session();
        s.record_answer(record("github_1", Classification::No, 0.0));
        let fu = follow_up(&s, "github_1_followup_1");
        assert!(s.enqueue_follow_up(fu));

        let next = s.next_question().unwrap();
        assert_eq!(next.id(), "github_1_followup_1");
        assert!(next.is_follow_up());

        s.record_answer(record("github_1_followup_1", Classification::Yes, 2.0));
        assert_eq!(s.next_question().unwrap().id(), "github_2");
    }

    #[test]
    fn exhausted_after_all_answers() {
        let mut s = session();
        assert!(!s.is_exhausted());
        while let Some(q) = s.next_question() {
            let id = q.id().to_string();
            s.record_answer(record(&id, Classification::Yes, q.max_score()));
        }
        assert!(s.is_exhausted());
        assert!(s.next_question().is_none());
    }

    // ==================== Follow-Up Queue Tests ====================

    #[test]
    fn enqueue_is_idempotent_per_follow_up() {
        let mut s = session();
        let fu = follow_up(&s, "github_1_followup_1");
        assert!(s.enqueue_follow_up(fu.clone()));
        assert!(!s.enqueue_follow_up(fu));

        s.record_answer(record("github_1_followup_1", Classification::Yes, 2.0));
        // Still gone after being answered.
        assert_ne!(s.next_question().unwrap().id(), "github_1_followup_1");
    }

    #[test]
    fn resolve_rejects_unsurfaced_follow_up() {
        let s = session();
        assert!(s.resolve("github_1_followup_1").is_none());
        assert!(s.resolve("github_1").is_some());
        assert!(s.resolve("nope_99").is_none());
    }

    #[test]
    fn resolve_finds_surfaced_follow_up() {
        let mut s = session();
        let fu = follow_up(&s, "github_1_followup_1");
        s.enqueue_follow_up(fu);
        let resolved = s.resolve("github_1_followup_1").unwrap();
        assert!(resolved.is_follow_up());
        assert_eq!(resolved.max_score(), 2.0);
    }

    // ==================== Lifecycle Tests ====================

    #[test]
    fn phase_moves_to_in_progress_on_first_answer() {
        let mut s = session();
        assert_eq!(s.phase(), AssessmentPhase::NotStarted);
        s.record_answer(record("github_1", Classification::Yes, 10.0));
        assert_eq!(s.phase(), AssessmentPhase::InProgress);
        s.mark_completed();
        assert_eq!(s.phase(), AssessmentPhase::Completed);
    }

    #[test]
    fn answers_accumulate_in_the_record_log() {
        let mut s = session();
        s.record_answer(record("github_1", Classification::Yes, 10.0));
        s.record_answer(record("github_2", Classification::No, 0.0));
        assert_eq!(s.records().len(), 2);
        assert_eq!(s.question_scores().len(), 2);
        assert!(s.is_answered("github_1"));
        assert!(!s.is_answered("github_3"));
    }
}
