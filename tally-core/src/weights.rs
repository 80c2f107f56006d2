//! Weight distribution
//!
//! Turns 1-10 importance values into an exact 100-point rubric. Shares
//! are proportional at every level, rounded to 2 decimals at each store
//! point, and any rounding residual is folded into the single largest
//! question of the largest pillar so the total always lands on 100.00
//! within a cent.

use std::collections::HashMap;

use tracing::debug;

use crate::catalog::{Catalog, Pillar};
use crate::oracle::DEFAULT_IMPORTANCE;

/// Round to 2 decimal places, the precision every stored weight uses
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Flat distribution: pillars split 100 by importance share directly
pub(crate) fn distribute_flat(pillars: &mut [Pillar]) {
    let grand: f64 = pillars.iter().map(Pillar::importance_sum).sum();
    if grand <= 0.0 {
        return;
    }
    for pillar in pillars.iter_mut() {
        let pillar_importance = pillar.importance_sum();
        let share = pillar_importance / grand * 100.0;
        assign_question_weights(pillar, pillar_importance, share);
    }
    reconcile(pillars);
}

/// Hierarchical distribution: categories split 100 first, then pillars
/// split their category's share
pub(crate) fn distribute_hierarchical(pillars: &mut [Pillar]) {
    let grand: f64 = pillars.iter().map(Pillar::importance_sum).sum();
    if grand <= 0.0 {
        return;
    }

    let mut category_importance: HashMap<Option<String>, f64> = HashMap::new();
    for pillar in pillars.iter() {
        *category_importance
            .entry(pillar.category_id.clone())
            .or_default() += pillar.importance_sum();
    }

    for pillar in pillars.iter_mut() {
        let category_total = category_importance[&pillar.category_id];
        let category_share = category_total / grand * 100.0;
        let pillar_importance = pillar.importance_sum();
        let share = pillar_importance / category_total * category_share;
        assign_question_weights(pillar, pillar_importance, share);
    }
    reconcile(pillars);
}

fn assign_question_weights(pillar: &mut Pillar, pillar_importance: f64, share: f64) {
    for question in &mut pillar.questions {
        question.max_score = if pillar_importance > 0.0 {
            round2(question.importance / pillar_importance * share)
        } else {
            0.0
        };
    }
    pillar.total_weight = round2(pillar.questions.iter().map(|q| q.max_score).sum());
}

/// Fold the rounding residual into the largest question of the largest
/// pillar, then restore that pillar's stored total
fn reconcile(pillars: &mut [Pillar]) {
    let total: f64 = pillars
        .iter()
        .flat_map(|p| p.questions.iter())
        .map(|q| q.max_score)
        .sum();
    let residual = 100.0 - total;
    if residual.abs() < 0.005 {
        return;
    }
    debug!(residual, "folding rounding residual into largest question");

    let Some(pillar) = pillars
        .iter_mut()
        .max_by(|a, b| a.total_weight.total_cmp(&b.total_weight))
    else {
        return;
    };
    let Some(question) = pillar
        .questions
        .iter_mut()
        .max_by(|a, b| a.max_score.total_cmp(&b.max_score))
    else {
        return;
    };
    question.max_score = round2(question.max_score + residual);
    pillar.total_weight = round2(pillar.questions.iter().map(|q| q.max_score).sum());
}

/// Re-run distribution using importances observed during the assessment
///
/// Answered questions take their observed importance; unanswered ones
/// take the mean of the observed values, or the default importance when
/// nothing has been observed yet. Keeps the rubric pinned to 100 while
/// importances arrive one answer at a time.
pub fn recompute_with_observed(catalog: &mut Catalog, observed: &HashMap<String, f64>) {
    let placeholder = if observed.is_empty() {
        DEFAULT_IMPORTANCE
    } else {
        observed.values().sum::<f64>() / observed.len() as f64
    };
    for question in catalog.questions_mut() {
        question.importance = observed
            .get(&question.id)
            .copied()
            .unwrap_or(placeholder);
    }
    catalog.redistribute();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Question, RepositoryTool};

    fn pillar(id: &str, category: Option<&str>, importances: &[f64]) -> Pillar {
        Pillar {
            id: id.to_string(),
            name: id.to_string(),
            category_id: category.map(str::to_string),
            questions: importances
                .iter()
                .enumerate()
                .map(|(i, &importance)| Question {
                    id: format!("{id}_{}", i + 1),
                    text: format!("question {i}"),
                    pillar_id: id.to_string(),
                    importance,
                    max_score: 0.0,
                })
                .collect(),
            total_weight: 0.0,
        }
    }

    fn total(pillars: &[Pillar]) -> f64 {
        pillars
            .iter()
            .flat_map(|p| p.questions.iter())
            .map(|q| q.max_score)
            .sum()
    }

    // ==================== Flat Distribution Tests ====================

    #[test]
    fn worked_example_splits_ten_five_five() {
        let mut pillars = vec![pillar("security", None, &[10.0, 5.0, 5.0])];
        distribute_flat(&mut pillars);

        let scores: Vec<f64> = pillars[0].questions.iter().map(|q| q.max_score).collect();
        assert_eq!(scores, vec![50.0, 25.0, 25.0]);
        assert_eq!(pillars[0].total_weight, 100.0);
    }

    #[test]
    fn flat_total_is_always_one_hundred() {
        let cases: Vec<Vec<Vec<f64>>> = vec![
            vec![vec![1.0], vec![1.0], vec![1.0]],
            vec![vec![3.0, 3.0, 3.0], vec![7.0]],
            vec![vec![9.5, 1.5], vec![2.0, 8.0, 4.0], vec![6.0]],
            vec![vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]],
        ];
        for importances in cases {
            let mut pillars: Vec<Pillar> = importances
                .iter()
                .enumerate()
                .map(|(i, imps)| pillar(&format!("p{i}"), None, imps))
                .collect();
            distribute_flat(&mut pillars);
            assert!(
                (total(&pillars) - 100.0).abs() <= 0.01,
                "{:?} -> {}",
                importances,
                total(&pillars)
            );
        }
    }

    #[test]
    fn single_question_pillar_takes_full_pillar_share() {
        let mut pillars = vec![pillar("a", None, &[4.0]), pillar("b", None, &[6.0])];
        distribute_flat(&mut pillars);

        assert_eq!(pillars[0].questions[0].max_score, 40.0);
        assert_eq!(pillars[1].questions[0].max_score, 60.0);
    }

    #[test]
    fn equal_importance_means_equal_weight() {
        let mut pillars = vec![pillar("p", None, &[5.0, 5.0, 5.0, 5.0])];
        distribute_flat(&mut pillars);
        for q in &pillars[0].questions {
            assert_eq!(q.max_score, 25.0);
        }
    }

    #[test]
    fn higher_importance_never_weighs_less() {
        let mut pillars = vec![pillar("p", None, &[2.0, 7.0, 7.0, 9.0])];
        distribute_flat(&mut pillars);
        let scores: Vec<f64> = pillars[0].questions.iter().map(|q| q.max_score).collect();
        assert!(scores[0] < scores[1]);
        assert_eq!(scores[1], scores[2]);
        assert!(scores[2] < scores[3]);
    }

    #[test]
    fn residual_lands_on_largest_question() {
        // 3 equal questions: 33.33 * 3 = 99.99, residual 0.01.
        let mut pillars = vec![pillar("p", None, &[1.0, 1.0, 1.0])];
        distribute_flat(&mut pillars);

        assert!((total(&pillars) - 100.0).abs() < 0.005);
        let max = pillars[0]
            .questions
            .iter()
            .map(|q| q.max_score)
            .fold(f64::MIN, f64::max);
        assert_eq!(max, 33.34);
    }

    // ==================== Hierarchical Distribution Tests ====================

    #[test]
    fn hierarchical_total_is_one_hundred() {
        let mut pillars = vec![
            pillar("security", Some("repository"), &[8.0, 8.0]),
            pillar("governance", Some("repository"), &[7.0]),
            pillar("cicd_security", Some("cicd"), &[9.0, 6.0]),
            pillar("deployment_monitoring", Some("deployment"), &[5.0, 5.0, 3.0]),
        ];
        distribute_hierarchical(&mut pillars);
        assert!((total(&pillars) - 100.0).abs() <= 0.01, "{}", total(&pillars));
    }

    #[test]
    fn hierarchical_category_shares_are_importance_proportional() {
        // Categories weigh 10 and 30, so shares are 25 and 75.
        let mut pillars = vec![
            pillar("a", Some("one"), &[10.0]),
            pillar("b", Some("two"), &[30.0]),
        ];
        distribute_hierarchical(&mut pillars);

        assert_eq!(pillars[0].questions[0].max_score, 25.0);
        assert_eq!(pillars[1].questions[0].max_score, 75.0);
    }

    // ==================== Recompute Tests ====================

    #[test]
    fn recompute_uses_mean_for_unanswered() {
        let mut catalog = Catalog::for_repository(RepositoryTool::Github).unwrap();
        let observed = HashMap::from([
            ("github_1".to_string(), 9.0),
            ("github_2".to_string(), 3.0),
        ]);
        recompute_with_observed(&mut catalog, &observed);

        assert_eq!(catalog.find_question("github_1").unwrap().importance, 9.0);
        // Unanswered questions take the observed mean of 6.0.
        assert_eq!(catalog.find_question("github_3").unwrap().importance, 6.0);
        assert!((catalog.total_weight() - 100.0).abs() <= 0.01);
    }

    #[test]
    fn recompute_without_observations_uses_default() {
        let mut catalog = Catalog::for_repository(RepositoryTool::Bitbucket).unwrap();
        recompute_with_observed(&mut catalog, &HashMap::new());

        for q_id in ["bitbucket_1", "bitbucket_4"] {
            assert_eq!(
                catalog.find_question(q_id).unwrap().importance,
                DEFAULT_IMPORTANCE
            );
        }
        assert!((catalog.total_weight() - 100.0).abs() <= 0.01);
    }

    // ==================== Rounding Tests ====================

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(33.333), 33.33);
        assert_eq!(round2(33.336), 33.34);
        assert_eq!(round2(100.0), 100.0);
    }
}
