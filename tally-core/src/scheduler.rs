//! Adaptive answer scheduling
//!
//! The scheduler is where oracle judgment meets session state: it
//! classifies each raw answer, scores it, asks the relevance judge which
//! configured follow-ups are worth surfacing, and records the outcome.
//! Every oracle failure degrades to a documented deterministic fallback,
//! so an assessment always completes even with every oracle down.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SessionError;
use crate::oracle::{
    AnswerClassifier, Classification, DEFAULT_IMPORTANCE, FALLBACK_ANALYSIS,
    FALLBACK_CLASSIFICATION, ImportanceScorer, Narrator, RelevanceJudge, fallback_should_ask,
};
use crate::scoring::score_for;
use crate::session::{AnswerRecord, AskedQuestion, AssessmentPhase, AssessmentSession};

/// What the respondent gets back for one submitted answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub question_id: String,
    pub classification: Classification,
    pub score_earned: f64,
    pub max_score: f64,
    pub analysis: String,
    /// Follow-up ids newly queued because of this answer
    pub triggered_follow_ups: Vec<String>,
}

/// Drives a session forward one answer at a time
pub struct AdaptiveScheduler {
    classifier: Arc<dyn AnswerClassifier>,
    judge: Arc<dyn RelevanceJudge>,
    importance: Arc<dyn ImportanceScorer>,
    narrator: Arc<dyn Narrator>,
    /// When set, importances come from the oracle per answer instead of
    /// the curated bank values, and weights are recomputed at completion
    dynamic_importance: bool,
}

impl AdaptiveScheduler {
    pub fn new(
        classifier: Arc<dyn AnswerClassifier>,
        judge: Arc<dyn RelevanceJudge>,
        importance: Arc<dyn ImportanceScorer>,
        narrator: Arc<dyn Narrator>,
    ) -> Self {
        Self {
            classifier,
            judge,
            importance,
            narrator,
            dynamic_importance: false,
        }
    }

    /// Score importance per answer via the oracle instead of trusting
    /// the curated bank values
    pub fn with_dynamic_importance(mut self) -> Self {
        self.dynamic_importance = true;
        self
    }

    pub fn dynamic_importance(&self) -> bool {
        self.dynamic_importance
    }

    pub fn narrator(&self) -> &Arc<dyn Narrator> {
        &self.narrator
    }

    /// Classify, score and record one answer, then queue any follow-ups
    /// the judge deems worth asking
    pub async fn submit_answer(
        &self,
        session: &mut AssessmentSession,
        question_id: &str,
        raw_answer: &str,
    ) -> Result<AnswerOutcome, SessionError> {
        if session.phase() == AssessmentPhase::Completed {
            return Err(SessionError::AlreadyCompleted(session.id().to_string()));
        }
        let Some(asked) = session.resolve(question_id) else {
            return Err(SessionError::UnknownQuestion(question_id.to_string()));
        };

        let classification = match self.classifier.classify(asked.text(), raw_answer).await {
            Ok(c) => c,
            Err(err) => {
                warn!(%question_id, %err, "classifier failed, treating answer as unsure");
                FALLBACK_CLASSIFICATION
            }
        };
        let score_earned = score_for(classification, asked.max_score());
        debug!(%question_id, %classification, score_earned, "answer scored");

        let analysis = match self.narrator.analyze_answer(asked.text(), raw_answer).await {
            Ok(text) => text,
            Err(err) => {
                warn!(%question_id, %err, "analysis unavailable, using placeholder");
                FALLBACK_ANALYSIS.to_string()
            }
        };

        let importance = self.importance_of(session, &asked).await;

        session.record_answer(AnswerRecord {
            question_id: asked.id().to_string(),
            question_text: asked.text().to_string(),
            answer: raw_answer.to_string(),
            classification,
            score_earned,
            max_score: asked.max_score(),
            importance,
            analysis: analysis.clone(),
            is_follow_up: asked.is_follow_up(),
        });

        let triggered_follow_ups = match &asked {
            AskedQuestion::Base(question) => {
                self.queue_follow_ups(session, question.id.as_str(), raw_answer, classification)
                    .await
            }
            AskedQuestion::FollowUp(_) => Vec::new(),
        };

        Ok(AnswerOutcome {
            question_id: asked.id().to_string(),
            classification,
            score_earned,
            max_score: asked.max_score(),
            analysis,
            triggered_follow_ups,
        })
    }

    async fn importance_of(&self, session: &mut AssessmentSession, asked: &AskedQuestion) -> f64 {
        match asked {
            AskedQuestion::FollowUp(follow_up) => session
                .catalog()
                .find_question(&follow_up.base_question_id)
                .map(|q| q.importance)
                .unwrap_or(DEFAULT_IMPORTANCE),
            AskedQuestion::Base(question) if self.dynamic_importance => {
                let importance = match self.importance.score_importance(&question.text).await {
                    Ok(value) => value.clamp(1.0, 10.0),
                    Err(err) => {
                        warn!(question_id = %question.id, %err, "importance oracle failed, using default");
                        DEFAULT_IMPORTANCE
                    }
                };
                if let Some(q) = session.catalog_mut().find_question_mut(&question.id) {
                    q.importance = importance;
                }
                importance
            }
            AskedQuestion::Base(question) => question.importance,
        }
    }

    async fn queue_follow_ups(
        &self,
        session: &mut AssessmentSession,
        base_id: &str,
        raw_answer: &str,
        classification: Classification,
    ) -> Vec<String> {
        let candidates: Vec<_> = session
            .catalog()
            .follow_ups()
            .matching(base_id, classification)
            .into_iter()
            .cloned()
            .collect();
        let base_text = session
            .catalog()
            .find_question(base_id)
            .map(|q| q.text.clone())
            .unwrap_or_default();

        let mut triggered = Vec::new();
        for follow_up in candidates {
            if session.is_answered(&follow_up.id) {
                continue;
            }
            let should_ask = match self
                .judge
                .should_ask(&base_text, raw_answer, classification, &follow_up.text)
                .await
            {
                Ok(decision) => decision,
                Err(err) => {
                    warn!(follow_up_id = %follow_up.id, %err, "relevance judge failed, using gap heuristic");
                    fallback_should_ask(classification)
                }
            };
            if should_ask && session.enqueue_follow_up(follow_up.clone()) {
                triggered.push(follow_up.id);
            }
        }
        triggered
    }
}
