//! Public assessment operations
//!
//! `AssessmentEngine` is the facade callers talk to: it owns the session
//! registry and the adaptive scheduler, and exposes the four operations
//! an assessment runs through, from start to shareable result.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::catalog::{
    Catalog, CicdPlatform, DeploymentPlatform, RepositoryTool, pillar_display_name,
};
use crate::error::{CatalogError, SessionError};
use crate::oracle::{Classification, SummaryItem, fallback_summary};
use crate::registry::{RegistryConfig, SessionRegistry};
use crate::scheduler::{AdaptiveScheduler, AnswerOutcome};
use crate::scoring::{self, PillarBreakdown};
use crate::session::{AnswerRecord, AssessmentPhase, AssessmentSession};
use crate::weights;

/// One question as presented in the initial ordered rubric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderedQuestion {
    pub id: String,
    pub text: String,
    pub max_score: f64,
    pub importance: f64,
    pub pillar_id: String,
    pub pillar_name: String,
}

/// Per-pillar weight summary shown alongside the rubric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PillarSummary {
    pub id: String,
    pub name: String,
    pub total_weight: f64,
    pub question_count: usize,
}

/// Everything a caller needs to run a freshly started assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentStart {
    pub session_id: String,
    pub questions: Vec<OrderedQuestion>,
    pub pillars: Vec<PillarSummary>,
}

/// The next question to put in front of the respondent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextQuestion {
    pub id: String,
    pub text: String,
    pub max_score: f64,
    pub is_follow_up: bool,
}

/// Finalized assessment, as cached under its share token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedAssessment {
    pub session_id: String,
    pub final_score: f64,
    pub breakdown: Vec<PillarBreakdown>,
    pub question_results: Vec<AnswerRecord>,
    pub summary: String,
    pub share_token: String,
}

/// Facade over the registry and scheduler
pub struct AssessmentEngine {
    registry: Arc<SessionRegistry>,
    scheduler: AdaptiveScheduler,
}

impl AssessmentEngine {
    pub fn new(scheduler: AdaptiveScheduler) -> Self {
        Self::with_registry(scheduler, Arc::new(SessionRegistry::default()))
    }

    pub fn with_config(scheduler: AdaptiveScheduler, config: RegistryConfig) -> Self {
        Self::with_registry(scheduler, Arc::new(SessionRegistry::new(config)))
    }

    pub fn with_registry(scheduler: AdaptiveScheduler, registry: Arc<SessionRegistry>) -> Self {
        Self {
            registry,
            scheduler,
        }
    }

    /// The shared registry, for spawning the background sweeper
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Start a repository-only assessment with a flat 100-point rubric
    pub async fn start_repository_assessment(
        &self,
        tool: RepositoryTool,
    ) -> Result<AssessmentStart, CatalogError> {
        self.start(Catalog::for_repository(tool)?).await
    }

    /// Start a full assessment across repository, CI/CD and deployment
    pub async fn start_platform_assessment(
        &self,
        tool: RepositoryTool,
        cicd: CicdPlatform,
        deployment: DeploymentPlatform,
    ) -> Result<AssessmentStart, CatalogError> {
        self.start(Catalog::for_platforms(tool, cicd, deployment)?)
            .await
    }

    async fn start(&self, catalog: Catalog) -> Result<AssessmentStart, CatalogError> {
        let start = AssessmentStart {
            session_id: String::new(),
            questions: catalog
                .ordered_questions()
                .map(|q| OrderedQuestion {
                    id: q.id.clone(),
                    text: q.text.clone(),
                    max_score: q.max_score,
                    importance: q.importance,
                    pillar_id: q.pillar_id.clone(),
                    pillar_name: pillar_display_name(&q.pillar_id).to_string(),
                })
                .collect(),
            pillars: catalog
                .pillars()
                .iter()
                .map(|p| PillarSummary {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    total_weight: p.total_weight,
                    question_count: p.questions.len(),
                })
                .collect(),
        };

        let session = AssessmentSession::new(catalog);
        let session_id = self.registry.insert(session).await;
        info!(%session_id, questions = start.questions.len(), "assessment started");
        Ok(AssessmentStart {
            session_id,
            ..start
        })
    }

    /// The question the respondent should answer next; `None` once the
    /// session has no base questions or queued follow-ups left
    pub async fn next_question(
        &self,
        session_id: &str,
    ) -> Result<Option<NextQuestion>, SessionError> {
        let handle = self.registry.session(session_id).await?;
        let mut session = handle.lock().await;
        Ok(session.next_question().map(|asked| NextQuestion {
            id: asked.id().to_string(),
            text: asked.text().to_string(),
            max_score: asked.max_score(),
            is_follow_up: asked.is_follow_up(),
        }))
    }

    /// Submit one answer for classification, scoring and follow-up
    /// triggering
    pub async fn submit_answer(
        &self,
        session_id: &str,
        question_id: &str,
        raw_answer: &str,
    ) -> Result<AnswerOutcome, SessionError> {
        let handle = self.registry.session(session_id).await?;
        let mut session = handle.lock().await;
        self.scheduler
            .submit_answer(&mut session, question_id, raw_answer)
            .await
    }

    /// Finalize the assessment: score, summarize, cache the result under
    /// a share token and evict the session
    pub async fn complete_assessment(
        &self,
        session_id: &str,
    ) -> Result<CompletedAssessment, SessionError> {
        let handle = self.registry.remove(session_id).await?;
        let mut session = handle.lock().await;
        if session.phase() == AssessmentPhase::Completed {
            return Err(SessionError::AlreadyCompleted(session_id.to_string()));
        }

        if self.scheduler.dynamic_importance() {
            let observed: std::collections::HashMap<String, f64> = session
                .records()
                .iter()
                .filter(|r| !r.is_follow_up)
                .map(|r| (r.question_id.clone(), r.importance))
                .collect();
            weights::recompute_with_observed(session.catalog_mut(), &observed);
            session.rescore();
        }

        let final_score = scoring::final_score(session.question_scores());
        let breakdown = scoring::breakdown(session.catalog(), session.question_scores());
        let summary = self.summarize(session.records(), final_score).await;
        session.mark_completed();

        let result = CompletedAssessment {
            session_id: session_id.to_string(),
            final_score,
            breakdown,
            question_results: session.records().to_vec(),
            summary,
            share_token: Uuid::new_v4().to_string(),
        };
        self.registry
            .cache_result(&result.share_token, result.clone())
            .await;
        info!(%session_id, final_score, share_token = %result.share_token, "assessment completed");
        Ok(result)
    }

    /// Fetch a finalized result by its share token
    pub async fn shared_result(
        &self,
        share_token: &str,
    ) -> Result<CompletedAssessment, SessionError> {
        self.registry.shared_result(share_token).await
    }

    async fn summarize(&self, records: &[AnswerRecord], final_score: f64) -> String {
        let mut yes_items = Vec::new();
        let mut no_items = Vec::new();
        for record in records {
            let item = SummaryItem {
                question: record.question_text.clone(),
                answer: record.answer.clone(),
                importance: record.importance,
                analysis: record.analysis.clone(),
            };
            if record.classification == Classification::Yes {
                yes_items.push(item);
            } else {
                no_items.push(item);
            }
        }
        yes_items.sort_by(|a, b| b.importance.total_cmp(&a.importance));
        no_items.sort_by(|a, b| b.importance.total_cmp(&a.importance));

        match self
            .scheduler
            .narrator()
            .summarize(&yes_items, &no_items, final_score)
            .await
        {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(%err, "narrator summary failed, using templated fallback");
                fallback_summary(&yes_items, &no_items, final_score)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{
        ScriptedClassifier, ScriptedImportanceScorer, ScriptedJudge, ScriptedNarrator,
    };

    fn engine_with(classifier: Arc<ScriptedClassifier>, judge: Arc<ScriptedJudge>) -> AssessmentEngine {
        let scheduler = AdaptiveScheduler::new(
            classifier,
            judge,
            Arc::new(ScriptedImportanceScorer::new(5.0)),
            Arc::new(ScriptedNarrator::new("insight", "overall summary")),
        );
        AssessmentEngine::new(scheduler)
    }

    fn engine() -> AssessmentEngine {
        engine_with(
            Arc::new(ScriptedClassifier::new(Classification::Yes)),
            Arc::new(ScriptedJudge::new(true)),
        )
    }

    // ==================== Start Tests ====================

    #[tokio::test]
    async fn start_returns_ordered_weighted_rubric() {
        let engine = engine();
        let start = engine
            .start_repository_assessment(RepositoryTool::Github)
            .await
            .unwrap();

        assert_eq!(start.questions.len(), 5);
        let total: f64 = start.questions.iter().map(|q| q.max_score).sum();
        assert!((total - 100.0).abs() <= 0.01);
        assert!(!start.session_id.is_empty());
        assert!(start.pillars.iter().any(|p| p.id == "governance"));
    }

    #[tokio::test]
    async fn platform_start_spans_all_three_categories() {
        let engine = engine();
        let start = engine
            .start_platform_assessment(
                RepositoryTool::Gitlab,
                CicdPlatform::GitlabCi,
                DeploymentPlatform::Gcp,
            )
            .await
            .unwrap();

        assert_eq!(start.questions.len(), 15);
        assert!(start.questions.iter().any(|q| q.id.starts_with("repo_")));
        assert!(start.questions.iter().any(|q| q.id.starts_with("cicd_")));
        assert!(start.questions.iter().any(|q| q.id.starts_with("deploy_")));
    }

    // ==================== Full Flow Tests ====================

    #[tokio::test]
    async fn all_yes_run_scores_one_hundred() {
        let engine = engine();
        let start = engine
            .start_repository_assessment(RepositoryTool::Github)
            .await
            .unwrap();

        while let Some(q) = engine.next_question(&start.session_id).await.unwrap() {
            engine
                .submit_answer(&start.session_id, &q.id, "yes, fully in place")
                .await
                .unwrap();
        }
        let result = engine.complete_assessment(&start.session_id).await.unwrap();

        assert!((result.final_score - 100.0).abs() <= 0.01);
        assert_eq!(result.summary, "overall summary");
        assert_eq!(result.question_results.len(), 5);
        for pillar in &result.breakdown {
            assert!((pillar.percentage - 100.0).abs() <= 0.05, "{}", pillar.pillar_id);
        }
    }

    #[tokio::test]
    async fn follow_up_bonus_recovers_points_after_a_no() {
        let classifier = Arc::new(ScriptedClassifier::new(Classification::Yes));
        let engine = engine_with(classifier.clone(), Arc::new(ScriptedJudge::new(true)));
        let start = engine
            .start_repository_assessment(RepositoryTool::Github)
            .await
            .unwrap();

        // First base answer is a no, which triggers its follow-up.
        classifier.queue(Classification::No);
        let outcome = engine
            .submit_answer(&start.session_id, "github_1", "not enforced")
            .await
            .unwrap();
        assert_eq!(outcome.triggered_follow_ups, vec!["github_1_followup_1"]);

        let next = engine.next_question(&start.session_id).await.unwrap().unwrap();
        assert_eq!(next.id, "github_1_followup_1");
        assert!(next.is_follow_up);

        let bonus = engine
            .submit_answer(&start.session_id, &next.id, "yes, for admins")
            .await
            .unwrap();
        assert_eq!(bonus.score_earned, 2.0);

        while let Some(q) = engine.next_question(&start.session_id).await.unwrap() {
            engine
                .submit_answer(&start.session_id, &q.id, "yes")
                .await
                .unwrap();
        }
        let result = engine.complete_assessment(&start.session_id).await.unwrap();

        // Lost github_1's points, regained 2.0 from the follow-up bonus.
        let lost = start
            .questions
            .iter()
            .find(|q| q.id == "github_1")
            .unwrap()
            .max_score;
        let expected = 100.0 - lost + 2.0;
        assert!((result.final_score - expected).abs() <= 0.01);
    }

    // ==================== Completion Tests ====================

    #[tokio::test]
    async fn completion_evicts_session_and_caches_result() {
        let engine = engine();
        let start = engine
            .start_repository_assessment(RepositoryTool::Bitbucket)
            .await
            .unwrap();
        engine
            .submit_answer(&start.session_id, "bitbucket_1", "yes")
            .await
            .unwrap();

        let result = engine.complete_assessment(&start.session_id).await.unwrap();

        let err = engine.next_question(&start.session_id).await.unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));

        let shared = engine.shared_result(&result.share_token).await.unwrap();
        assert_eq!(shared.final_score, result.final_score);
        assert_eq!(shared.session_id, start.session_id);
    }

    #[tokio::test]
    async fn completing_twice_is_not_found() {
        let engine = engine();
        let start = engine
            .start_repository_assessment(RepositoryTool::Github)
            .await
            .unwrap();
        engine.complete_assessment(&start.session_id).await.unwrap();

        let err = engine.complete_assessment(&start.session_id).await.unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));
    }

    #[tokio::test]
    async fn narrator_failure_still_produces_a_summary() {
        let scheduler = AdaptiveScheduler::new(
            Arc::new(ScriptedClassifier::new(Classification::Yes)),
            Arc::new(ScriptedJudge::new(false)),
            Arc::new(ScriptedImportanceScorer::new(5.0)),
            Arc::new(ScriptedNarrator::failing()),
        );
        let engine = AssessmentEngine::new(scheduler);
        let start = engine
            .start_repository_assessment(RepositoryTool::Github)
            .await
            .unwrap();
        engine
            .submit_answer(&start.session_id, "github_1", "yes")
            .await
            .unwrap();

        let result = engine.complete_assessment(&start.session_id).await.unwrap();
        assert!(result.summary.contains("Final score:"));
        assert!(result.summary.contains("Strengths:"));
    }

    // ==================== Dynamic Importance Tests ====================

    #[tokio::test]
    async fn dynamic_importance_reweights_at_completion() {
        let importance = Arc::new(ScriptedImportanceScorer::new(5.0));
        let scheduler = AdaptiveScheduler::new(
            Arc::new(ScriptedClassifier::new(Classification::Yes)),
            Arc::new(ScriptedJudge::new(false)),
            importance.clone(),
            Arc::new(ScriptedNarrator::new("insight", "summary")),
        )
        .with_dynamic_importance();
        let engine = AssessmentEngine::new(scheduler);
        let start = engine
            .start_repository_assessment(RepositoryTool::Github)
            .await
            .unwrap();

        // One high-importance answer, the rest at the default.
        importance.queue(10.0);
        while let Some(q) = engine.next_question(&start.session_id).await.unwrap() {
            engine
                .submit_answer(&start.session_id, &q.id, "yes")
                .await
                .unwrap();
        }
        let result = engine.complete_assessment(&start.session_id).await.unwrap();

        // All yes still lands on the full rubric after reweighting.
        assert!((result.final_score - 100.0).abs() <= 0.01);
        let first = result
            .question_results
            .iter()
            .find(|r| r.question_id == "github_1")
            .unwrap();
        let last = result
            .question_results
            .iter()
            .find(|r| r.question_id == "github_5")
            .unwrap();
        assert_eq!(first.importance, 10.0);
        assert!(first.max_score > last.max_score);
    }
}
