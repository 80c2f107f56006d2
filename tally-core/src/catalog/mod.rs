//! Question catalog assembly
//!
//! A catalog is built once per assessment from the static banks for the
//! platforms the caller selected. Building assigns stable question ids,
//! groups questions into pillars, registers follow-ups, and runs the
//! weight distributor so the finished catalog always carries an exact
//! 100-point rubric.

mod banks;
mod follow_ups;
mod platforms;

use serde::{Deserialize, Serialize};

pub use banks::pillar_display_name;
pub use follow_ups::{
    FOLLOW_UP_MARKER, FollowUpCatalog, FollowUpQuestion, base_question_id, is_follow_up_id,
};
pub use platforms::{CicdPlatform, DeploymentPlatform, RepositoryTool};

use crate::error::CatalogError;
use crate::weights;

use banks::BankEntry;

/// Category ids used by the hierarchical topology
pub const CATEGORY_REPOSITORY: &str = "repository";
pub const CATEGORY_CICD: &str = "cicd";
pub const CATEGORY_DEPLOYMENT: &str = "deployment";

/// A scoreable base question with its distributor-assigned point value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub pillar_id: String,
    /// Criticality on the 1-10 scale, curated or oracle-assigned
    pub importance: f64,
    /// Points awarded for a full `yes`, assigned by the distributor
    pub max_score: f64,
}

/// A named group of questions sharing a weight budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pillar {
    pub id: String,
    pub name: String,
    /// Set for hierarchical catalogs, `None` for flat ones
    pub category_id: Option<String>,
    pub questions: Vec<Question>,
    /// Sum of the pillar's question point values, rounded to 2 decimals
    pub total_weight: f64,
}

impl Pillar {
    /// Sum of curated importances across the pillar's questions
    pub fn importance_sum(&self) -> f64 {
        self.questions.iter().map(|q| q.importance).sum()
    }
}

/// How weight flows from the 100-point budget down to questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Pillars split 100 directly by importance share
    Flat,
    /// Categories split 100 first, pillars split their category's share
    Hierarchical,
}

/// The full question set for one assessment, weighted to 100 points
#[derive(Debug, Clone)]
pub struct Catalog {
    topology: Topology,
    pillars: Vec<Pillar>,
    follow_ups: FollowUpCatalog,
}

impl Catalog {
    /// Build a flat catalog from a single repository tool's bank
    pub fn for_repository(tool: RepositoryTool) -> Result<Self, CatalogError> {
        let mut builder = CatalogBuilder::new(Topology::Flat);
        builder.add_bank(tool.bank(), tool.as_str(), None);
        builder.finish()
    }

    /// Build a hierarchical catalog across repository, CI/CD and
    /// deployment platforms
    pub fn for_platforms(
        tool: RepositoryTool,
        cicd: CicdPlatform,
        deployment: DeploymentPlatform,
    ) -> Result<Self, CatalogError> {
        let mut builder = CatalogBuilder::new(Topology::Hierarchical);
        builder.add_bank(tool.bank(), "repo", Some(CATEGORY_REPOSITORY));
        builder.add_bank(cicd.bank(), "cicd", Some(CATEGORY_CICD));
        builder.add_bank(deployment.bank(), "deploy", Some(CATEGORY_DEPLOYMENT));
        builder.finish()
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn pillars(&self) -> &[Pillar] {
        &self.pillars
    }

    pub fn follow_ups(&self) -> &FollowUpCatalog {
        &self.follow_ups
    }

    /// Questions in presentation order, grouped by pillar
    pub fn ordered_questions(&self) -> impl Iterator<Item = &Question> {
        self.pillars.iter().flat_map(|p| p.questions.iter())
    }

    /// Number of base questions in the catalog
    pub fn question_count(&self) -> usize {
        self.pillars.iter().map(|p| p.questions.len()).sum()
    }

    /// Look up a base question by id
    pub fn find_question(&self, question_id: &str) -> Option<&Question> {
        self.ordered_questions().find(|q| q.id == question_id)
    }

    /// Pillar that owns a base question
    pub fn pillar_of(&self, question_id: &str) -> Option<&Pillar> {
        self.pillars
            .iter()
            .find(|p| p.questions.iter().any(|q| q.id == question_id))
    }

    /// Total of all question point values; 100.00 within rounding slack
    pub fn total_weight(&self) -> f64 {
        self.ordered_questions().map(|q| q.max_score).sum()
    }

    /// Re-run weight distribution after importances changed
    ///
    /// Used when importances are oracle-assigned during the assessment
    /// rather than curated up front. Callers overwrite `importance` on
    /// the affected questions first, then redistribute so the rubric
    /// stays pinned to 100.
    pub fn redistribute(&mut self) {
        match self.topology {
            Topology::Flat => weights::distribute_flat(&mut self.pillars),
            Topology::Hierarchical => weights::distribute_hierarchical(&mut self.pillars),
        }
    }

    /// Mutable walk over every question, for importance updates
    pub(crate) fn questions_mut(&mut self) -> impl Iterator<Item = &mut Question> {
        self.pillars.iter_mut().flat_map(|p| p.questions.iter_mut())
    }

    /// Mutable question lookup for importance updates
    pub fn find_question_mut(&mut self, question_id: &str) -> Option<&mut Question> {
        self.pillars
            .iter_mut()
            .flat_map(|p| p.questions.iter_mut())
            .find(|q| q.id == question_id)
    }
}

struct CatalogBuilder {
    topology: Topology,
    pillars: Vec<Pillar>,
    follow_ups: FollowUpCatalog,
}

impl CatalogBuilder {
    fn new(topology: Topology) -> Self {
        Self {
            topology,
            pillars: Vec::new(),
            follow_ups: FollowUpCatalog::new(),
        }
    }

    /// Append one bank's questions, assigning ids `{prefix}_{n}` (1-based)
    fn add_bank(&mut self, bank: &[BankEntry], prefix: &str, category_id: Option<&str>) {
        for (index, entry) in bank.iter().enumerate() {
            let question_id = format!("{}_{}", prefix, index + 1);
            let question = Question {
                id: question_id.clone(),
                text: entry.text.to_string(),
                pillar_id: entry.pillar.to_string(),
                importance: entry.importance,
                max_score: 0.0,
            };
            self.pillar_for(entry.pillar, category_id).questions.push(question);

            for (fu_index, spec) in entry.follow_ups.iter().enumerate() {
                self.follow_ups.insert(FollowUpQuestion {
                    id: format!("{}{}{}", question_id, FOLLOW_UP_MARKER, fu_index + 1),
                    text: spec.text.to_string(),
                    max_score: spec.max_score,
                    trigger_classifications: spec.triggers.to_vec(),
                    base_question_id: question_id.clone(),
                });
            }
        }
    }

    fn pillar_for(&mut self, pillar_id: &str, category_id: Option<&str>) -> &mut Pillar {
        // Pillar ids are unique across categories, so id alone is the key.
        let position = self.pillars.iter().position(|p| p.id == pillar_id);
        match position {
            Some(idx) => &mut self.pillars[idx],
            None => {
                self.pillars.push(Pillar {
                    id: pillar_id.to_string(),
                    name: pillar_display_name(pillar_id).to_string(),
                    category_id: category_id.map(str::to_string),
                    questions: Vec::new(),
                    total_weight: 0.0,
                });
                self.pillars.last_mut().unwrap()
            }
        }
    }

    fn finish(mut self) -> Result<Catalog, CatalogError> {
        let grand: f64 = self
            .pillars
            .iter()
            .flat_map(|p| p.questions.iter())
            .map(|q| q.importance)
            .sum();
        if self.pillars.is_empty() || grand <= 0.0 {
            return Err(CatalogError::EmptyCatalog);
        }

        match self.topology {
            Topology::Flat => weights::distribute_flat(&mut self.pillars),
            Topology::Hierarchical => weights::distribute_hierarchical(&mut self.pillars),
        }

        Ok(Catalog {
            topology: self.topology,
            pillars: self.pillars,
            follow_ups: self.follow_ups,
        })
    }
}
