//! Score aggregation
//!
//! Scoring is binary: a `yes` classification earns the question's full
//! point value, anything else earns zero. The four-way classification
//! exists for flow control, not partial credit.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Pillar};
use crate::oracle::Classification;
use crate::weights::round2;

/// Points earned for an answer with the given classification
pub fn score_for(classification: Classification, max_score: f64) -> f64 {
    match classification {
        Classification::Yes => max_score,
        _ => 0.0,
    }
}

/// Sum of earned points across all recorded question scores
pub fn final_score(question_scores: &HashMap<String, f64>) -> f64 {
    round2(question_scores.values().sum())
}

/// Earned versus available points for one pillar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarBreakdown {
    pub pillar_id: String,
    pub pillar_name: String,
    pub earned: f64,
    pub max: f64,
    pub percentage: f64,
}

impl PillarBreakdown {
    fn for_pillar(pillar: &Pillar, question_scores: &HashMap<String, f64>) -> Self {
        let earned: f64 = pillar
            .questions
            .iter()
            .filter_map(|q| question_scores.get(&q.id))
            .sum();
        let max = pillar.total_weight;
        let percentage = if max > 0.0 { earned / max * 100.0 } else { 0.0 };
        Self {
            pillar_id: pillar.id.clone(),
            pillar_name: pillar.name.clone(),
            earned: round2(earned),
            max: round2(max),
            percentage: round2(percentage),
        }
    }
}

/// Per-pillar breakdown over the catalog, in catalog order
///
/// Only base-question scores attribute to pillars; follow-up points are
/// bonus points outside the pillar budgets.
pub fn breakdown(catalog: &Catalog, question_scores: &HashMap<String, f64>) -> Vec<PillarBreakdown> {
    catalog
        .pillars()
        .iter()
        .map(|p| PillarBreakdown::for_pillar(p, question_scores))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Question, RepositoryTool};

    // ==================== Binary Scoring Tests ====================

    #[test]
    fn only_yes_earns_points() {
        assert_eq!(score_for(Classification::Yes, 25.0), 25.0);
        assert_eq!(score_for(Classification::Partial, 25.0), 0.0);
        assert_eq!(score_for(Classification::No, 25.0), 0.0);
        assert_eq!(score_for(Classification::Unsure, 25.0), 0.0);
    }

    #[test]
    fn final_score_sums_recorded_points() {
        let scores = HashMap::from([
            ("q1".to_string(), 50.0),
            ("q2".to_string(), 0.0),
            ("q3".to_string(), 12.5),
        ]);
        assert_eq!(final_score(&scores), 62.5);
    }

    #[test]
    fn final_score_of_empty_session_is_zero() {
        assert_eq!(final_score(&HashMap::new()), 0.0);
    }

    // ==================== Breakdown Tests ====================

    #[test]
    fn breakdown_reports_per_pillar_percentages() {
        let catalog = Catalog::for_repository(RepositoryTool::Github).unwrap();
        // Answer yes to everything: each pillar lands on 100 percent.
        let scores: HashMap<String, f64> = catalog
            .ordered_questions()
            .map(|q| (q.id.clone(), q.max_score))
            .collect();

        for pillar in breakdown(&catalog, &scores) {
            assert!((pillar.percentage - 100.0).abs() <= 0.05, "{}", pillar.pillar_id);
            assert!((pillar.earned - pillar.max).abs() <= 0.01);
        }
    }

    #[test]
    fn breakdown_with_no_answers_is_zero_percent() {
        let catalog = Catalog::for_repository(RepositoryTool::Gitlab).unwrap();
        for pillar in breakdown(&catalog, &HashMap::new()) {
            assert_eq!(pillar.earned, 0.0);
            assert_eq!(pillar.percentage, 0.0);
        }
    }

    #[test]
    fn zero_max_pillar_reports_zero_percentage() {
        let pillar = Pillar {
            id: "empty".to_string(),
            name: "Empty".to_string(),
            category_id: None,
            questions: Vec::new(),
            total_weight: 0.0,
        };
        let row = PillarBreakdown::for_pillar(&pillar, &HashMap::new());
        assert_eq!(row.percentage, 0.0);
    }

    #[test]
    fn one_yes_two_nos_earns_half_the_pillar() {
        // Importances [10, 5, 5] distribute to [50, 25, 25].
        let questions: Vec<Question> = [("q1", 10.0), ("q2", 5.0), ("q3", 5.0)]
            .iter()
            .map(|(id, importance)| Question {
                id: id.to_string(),
                text: String::new(),
                pillar_id: "security".to_string(),
                importance: *importance,
                max_score: 0.0,
            })
            .collect();
        let mut pillars = vec![Pillar {
            id: "security".to_string(),
            name: "Security".to_string(),
            category_id: None,
            questions,
            total_weight: 0.0,
        }];
        crate::weights::distribute_flat(&mut pillars);

        let scores = HashMap::from([
            ("q1".to_string(), score_for(Classification::Yes, pillars[0].questions[0].max_score)),
            ("q2".to_string(), score_for(Classification::No, pillars[0].questions[1].max_score)),
            ("q3".to_string(), score_for(Classification::No, pillars[0].questions[2].max_score)),
        ]);

        assert_eq!(final_score(&scores), 50.0);
        let row = PillarBreakdown::for_pillar(&pillars[0], &scores);
        assert_eq!(row.earned, 50.0);
        assert_eq!(row.max, 100.0);
        assert_eq!(row.percentage, 50.0);
    }

    #[test]
    fn follow_up_scores_do_not_attribute_to_pillars() {
        let catalog = Catalog::for_repository(RepositoryTool::Github).unwrap();
        let scores = HashMap::from([("github_1_followup_1".to_string(), 2.0)]);
        let rows = breakdown(&catalog, &scores);
        assert!(rows.iter().all(|r| r.earned == 0.0));
        // The bonus still counts toward the final score.
        assert_eq!(final_score(&scores), 2.0);
    }
}
