//! Entropy-based clustering agreement: homogeneity, completeness, V-measure.
//!
//! Both labelings are reduced to a contingency table, then:
//!
//! - homogeneity  `h = 1 - H(C|K) / H(C)` (1.0 when `H(C) == 0`)
//! - completeness `c = 1 - H(K|C) / H(K)` (1.0 when `H(K) == 0`)
//! - V-measure    `v = (1 + beta) * h * c / (beta * h + c)` (0.0 when `h + c == 0`)
//!
//! where `C` is the reference labeling and `K` the predicted one. Entropies use
//! the natural logarithm. Identical labelings have exactly zero conditional
//! entropies, so they score exactly `(1.0, 1.0, 1.0)`.

use std::collections::HashMap;
use std::hash::Hash;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgreementError {
    #[error("labels_true and labels_pred must have the same length (currently: '{true_len}' vs '{pred_len}').")]
    LengthMismatch { true_len: usize, pred_len: usize },
}

/// Agreement between a predicted labeling and a reference labeling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusteringAgreement {
    pub homogeneity: f64,
    pub completeness: f64,
    pub v_measure: f64,
}

impl From<ClusteringAgreement> for (f64, f64, f64) {
    fn from(value: ClusteringAgreement) -> Self {
        (value.homogeneity, value.completeness, value.v_measure)
    }
}

/// Counts per reference class, per predicted cluster, and per pair.
struct Contingency {
    n: f64,
    class_sizes: Vec<f64>,
    cluster_sizes: Vec<f64>,
    joint: HashMap<(usize, usize), f64>,
}

impl Contingency {
    fn build<T: Eq + Hash>(labels_true: &[T], labels_pred: &[T]) -> Self {
        let mut class_ids: HashMap<&T, usize> = HashMap::new();
        let mut cluster_ids: HashMap<&T, usize> = HashMap::new();
        let mut class_sizes: Vec<f64> = Vec::new();
        let mut cluster_sizes: Vec<f64> = Vec::new();
        let mut joint: HashMap<(usize, usize), f64> = HashMap::new();

        for (t, p) in labels_true.iter().zip(labels_pred.iter()) {
            let next_class = class_ids.len();
            let ci = *class_ids.entry(t).or_insert(next_class);
            if ci == class_sizes.len() {
                class_sizes.push(0.0);
            }
            class_sizes[ci] += 1.0;

            let next_cluster = cluster_ids.len();
            let ki = *cluster_ids.entry(p).or_insert(next_cluster);
            if ki == cluster_sizes.len() {
                cluster_sizes.push(0.0);
            }
            cluster_sizes[ki] += 1.0;

            *joint.entry((ci, ki)).or_insert(0.0) += 1.0;
        }

        Self {
            n: labels_true.len() as f64,
            class_sizes,
            cluster_sizes,
            joint,
        }
    }

    fn entropy(sizes: &[f64], n: f64) -> f64 {
        if sizes.len() <= 1 {
            return 0.0;
        }
        sizes
            .iter()
            .filter(|&&count| count > 0.0)
            .map(|&count| {
                let p = count / n;
                -p * p.ln()
            })
            .sum()
    }

    /// `H(C|K)`: entropy of reference classes given predicted clusters.
    fn class_given_cluster(&self) -> f64 {
        self.joint
            .iter()
            .map(|(&(_, ki), &count)| -(count / self.n) * (count / self.cluster_sizes[ki]).ln())
            .sum()
    }

    /// `H(K|C)`: entropy of predicted clusters given reference classes.
    fn cluster_given_class(&self) -> f64 {
        self.joint
            .iter()
            .map(|(&(ci, _), &count)| -(count / self.n) * (count / self.class_sizes[ci]).ln())
            .sum()
    }
}

/// Homogeneity, completeness and V-measure (beta = 1).
pub fn homogeneity_completeness_v_measure<T: Eq + Hash>(
    labels_true: &[T],
    labels_pred: &[T],
) -> Result<ClusteringAgreement, AgreementError> {
    homogeneity_completeness_v_measure_with_beta(labels_true, labels_pred, 1.0)
}

/// Same as [`homogeneity_completeness_v_measure`] with a custom V-measure
/// weight: `beta > 1` favours completeness, `beta < 1` favours homogeneity.
pub fn homogeneity_completeness_v_measure_with_beta<T: Eq + Hash>(
    labels_true: &[T],
    labels_pred: &[T],
    beta: f64,
) -> Result<ClusteringAgreement, AgreementError> {
    if labels_true.len() != labels_pred.len() {
        return Err(AgreementError::LengthMismatch {
            true_len: labels_true.len(),
            pred_len: labels_pred.len(),
        });
    }
    if labels_true.is_empty() {
        return Ok(ClusteringAgreement {
            homogeneity: 1.0,
            completeness: 1.0,
            v_measure: 1.0,
        });
    }

    let table = Contingency::build(labels_true, labels_pred);
    let entropy_classes = Contingency::entropy(&table.class_sizes, table.n);
    let entropy_clusters = Contingency::entropy(&table.cluster_sizes, table.n);

    let homogeneity = if entropy_classes == 0.0 {
        1.0
    } else {
        (1.0 - table.class_given_cluster() / entropy_classes).clamp(0.0, 1.0)
    };
    let completeness = if entropy_clusters == 0.0 {
        1.0
    } else {
        (1.0 - table.cluster_given_class() / entropy_clusters).clamp(0.0, 1.0)
    };
    let v_measure = if homogeneity + completeness == 0.0 {
        0.0
    } else {
        (1.0 + beta) * homogeneity * completeness / (beta * homogeneity + completeness)
    };

    Ok(ClusteringAgreement {
        homogeneity,
        completeness,
        v_measure,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn identical_labelings_score_exactly_one() {
        let labels = ["a", "b", "b", "c", "a"];
        let score = homogeneity_completeness_v_measure(&labels, &labels).unwrap();
        assert_eq!(<(f64, f64, f64)>::from(score), (1.0, 1.0, 1.0));
    }

    #[test]
    fn renamed_labelings_score_exactly_one() {
        let truth = [0, 0, 1, 1, 2];
        let pred = [7, 7, 3, 3, 9];
        let score = homogeneity_completeness_v_measure(&truth, &pred).unwrap();
        assert_eq!(score.homogeneity, 1.0);
        assert_eq!(score.completeness, 1.0);
        assert_eq!(score.v_measure, 1.0);
    }

    #[test]
    fn merging_classes_keeps_completeness_but_loses_homogeneity() {
        // Reference: three classes. Prediction merges the first two.
        let truth = ["x", "y", "z"];
        let pred = ["p", "p", "q"];
        let score = homogeneity_completeness_v_measure(&truth, &pred).unwrap();

        // H(C) = ln 3, H(C|K) = 2/3 ln 2.
        let expected_h = 1.0 - (2.0 / 3.0) * 2f64.ln() / 3f64.ln();
        assert!(approx_eq(score.homogeneity, expected_h, 1e-12));
        assert_eq!(score.completeness, 1.0);
        let expected_v = 2.0 * expected_h / (expected_h + 1.0);
        assert!(approx_eq(score.v_measure, expected_v, 1e-12));
    }

    #[test]
    fn single_cluster_prediction_is_complete_but_not_homogeneous() {
        let truth = [0, 0, 1, 1];
        let pred = [5, 5, 5, 5];
        let score = homogeneity_completeness_v_measure(&truth, &pred).unwrap();
        assert_eq!(score.homogeneity, 0.0);
        assert_eq!(score.completeness, 1.0);
        assert_eq!(score.v_measure, 0.0);
    }

    #[test]
    fn empty_labelings_are_perfect() {
        let empty: [u8; 0] = [];
        let score = homogeneity_completeness_v_measure(&empty, &empty).unwrap();
        assert_eq!(
            score,
            ClusteringAgreement {
                homogeneity: 1.0,
                completeness: 1.0,
                v_measure: 1.0
            }
        );
    }

    #[test]
    fn beta_weights_completeness() {
        let truth = ["x", "y", "z"];
        let pred = ["p", "p", "q"];
        let plain = homogeneity_completeness_v_measure(&truth, &pred).unwrap();
        let heavy = homogeneity_completeness_v_measure_with_beta(&truth, &pred, 2.0).unwrap();
        // Completeness is 1.0 here, so weighting it more raises the V-measure.
        assert!(heavy.v_measure > plain.v_measure);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let err = homogeneity_completeness_v_measure(&[1, 2], &[1]).unwrap_err();
        assert_eq!(
            err,
            AgreementError::LengthMismatch {
                true_len: 2,
                pred_len: 1
            }
        );
    }
}
