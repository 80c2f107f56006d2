//! tally-core: Weighted scoring and adaptive questioning engine
//!
//! This crate provides the foundational components for tally:
//!
//! - **Question catalogs** - [`Catalog`] assembles curated platform banks
//!   into pillars with an exact 100-point rubric
//! - **Weight distribution** - [`weights`] turns 1-10 importances into
//!   point values, flat or hierarchical, reconciled to 100.00
//! - **Sessions** - [`AssessmentSession`] tracks answers, scores and the
//!   follow-up queue for one respondent
//! - **Adaptive scheduling** - [`AdaptiveScheduler`] classifies answers
//!   via injected oracles and decides which follow-ups to surface
//! - **Registry** - [`SessionRegistry`] holds live sessions and cached
//!   results with TTL-based eviction
//! - **Engine** - [`AssessmentEngine`] is the public facade from start
//!   to shareable result
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tally_core::oracle::{Classification, ScriptedClassifier, ScriptedImportanceScorer,
//!     ScriptedJudge, ScriptedNarrator};
//! use tally_core::{AdaptiveScheduler, AssessmentEngine, RepositoryTool};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let scheduler = AdaptiveScheduler::new(
//!     Arc::new(ScriptedClassifier::new(Classification::Yes)),
//!     Arc::new(ScriptedJudge::new(true)),
//!     Arc::new(ScriptedImportanceScorer::new(5.0)),
//!     Arc::new(ScriptedNarrator::new("insight", "summary")),
//! );
//! let engine = AssessmentEngine::new(scheduler);
//!
//! let start = engine.start_repository_assessment(RepositoryTool::Github).await?;
//! while let Some(question) = engine.next_question(&start.session_id).await? {
//!     engine.submit_answer(&start.session_id, &question.id, "yes").await?;
//! }
//! let result = engine.complete_assessment(&start.session_id).await?;
//! println!("score: {}/100", result.final_score);
//! # Ok(())
//! # }
//! ```
//!
//! Oracle implementations that talk to a real model live in the
//! `tally-oracles` crate; this crate only defines the trait seams and
//! deterministic scripted fakes.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod oracle;
pub mod registry;
pub mod scheduler;
pub mod scoring;
pub mod session;
pub mod weights;

// Re-export key types for convenience
pub use catalog::{Catalog, CicdPlatform, DeploymentPlatform, Pillar, Question, RepositoryTool};
pub use engine::{
    AssessmentEngine, AssessmentStart, CompletedAssessment, NextQuestion, OrderedQuestion,
    PillarSummary,
};
pub use error::{CatalogError, OracleError, SessionError, TallyError};
pub use oracle::{
    AnswerClassifier, Classification, ImportanceScorer, Narrator, RelevanceJudge, SummaryItem,
};
pub use registry::{RegistryConfig, SessionRegistry};
pub use scheduler::{AdaptiveScheduler, AnswerOutcome};
pub use scoring::PillarBreakdown;
pub use session::{AnswerRecord, AskedQuestion, AssessmentPhase, AssessmentSession};
