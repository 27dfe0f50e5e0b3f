//! The three derivation stages.
//!
//! Each stage is a free function taking the previous stage's bundle by
//! reference and returning a new immutable bundle:
//!
//! 1. [`compute_scores`]: Features Recall, Predominance and F-Measure.
//! 2. [`compute_selection`]: F-Measure Overall Average and Features Selection.
//! 3. [`compute_contrast`]: F-Measure Marginal Averages, Features Contrast and
//!    Features Activation.
//!
//! Undefined ratios (zero denominators) resolve to `0.0`, so downstream strict
//! comparisons (`> overall_average`, `> 1.0`) treat them as uninformative.

use std::sync::Arc;

use crate::matrix::{nonzero_entries, DataVectors};
use crate::tables::{FeatureClassTable, FeatureTable, Vocabulary};

/// Stage 1 output.
#[derive(Debug, Clone)]
pub struct FeatureScores {
    /// Share of a feature's total weight falling inside a class.
    pub frecall: FeatureClassTable<f64>,
    /// Share of a class's total weight carried by a feature.
    pub fpredominance: FeatureClassTable<f64>,
    /// Harmonic mean of recall and predominance.
    pub fmeasure: FeatureClassTable<f64>,
}

/// Stage 2 output.
#[derive(Debug, Clone)]
pub struct FeatureSelection {
    pub overall_average: f64,
    pub selection: FeatureTable<bool>,
}

/// Stage 3 output.
#[derive(Debug, Clone)]
pub struct FeatureContrast {
    pub marginal_averages: FeatureTable<f64>,
    pub contrast: FeatureClassTable<f64>,
    pub activation: FeatureClassTable<bool>,
}

fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// One pass over non-zero entries, then one pass over feature × class pairs.
///
/// `class_of_row[d]` is the class position of data row `d`.
pub fn compute_scores(
    data_vectors: &DataVectors,
    class_of_row: &[usize],
    features: &Arc<Vocabulary>,
    classes: &Arc<Vocabulary>,
) -> FeatureScores {
    let n_classes = classes.len();
    let mut sum_by_feature_and_classe = vec![0.0_f64; features.len() * n_classes];
    let mut sum_by_feature = vec![0.0_f64; features.len()];
    let mut sum_by_classe = vec![0.0_f64; n_classes];

    for (row, feature, weight) in nonzero_entries(data_vectors) {
        let classe = class_of_row[row];
        sum_by_feature_and_classe[feature * n_classes + classe] += weight;
        sum_by_feature[feature] += weight;
        sum_by_classe[classe] += weight;
    }

    let frecall = FeatureClassTable::from_fn(features.clone(), classes.clone(), |f, c| {
        ratio_or_zero(sum_by_feature_and_classe[f * n_classes + c], sum_by_feature[f])
    });
    let fpredominance = FeatureClassTable::from_fn(features.clone(), classes.clone(), |f, c| {
        ratio_or_zero(sum_by_feature_and_classe[f * n_classes + c], sum_by_classe[c])
    });
    let fmeasure = FeatureClassTable::from_fn(features.clone(), classes.clone(), |f, c| {
        let recall = frecall.at(f, c);
        let predominance = fpredominance.at(f, c);
        ratio_or_zero(2.0 * (recall * predominance), recall + predominance)
    });

    FeatureScores {
        frecall,
        fpredominance,
        fmeasure,
    }
}

/// A feature is selected when it beats the overall average for at least one
/// class (strictly).
pub fn compute_selection(scores: &FeatureScores, features: &Arc<Vocabulary>) -> FeatureSelection {
    let fmeasure = &scores.fmeasure;

    let mut overall_sum = 0.0;
    let mut nb_overall = 0usize;
    for f in 0..features.len() {
        for value in fmeasure.row_at(f) {
            overall_sum += value;
            nb_overall += 1;
        }
    }
    let overall_average = ratio_or_zero(overall_sum, nb_overall as f64);

    let selected = (0..features.len())
        .map(|f| fmeasure.row_at(f).iter().any(|&value| value > overall_average))
        .collect();

    FeatureSelection {
        overall_average,
        selection: FeatureTable::new(features.clone(), selected),
    }
}

/// Contrast renormalizes a feature's F-Measure against its own mean over
/// classes, raised to `amplification_factor`. Only selected features get a
/// non-zero contrast, and only contrasts strictly above 1.0 activate.
pub fn compute_contrast(
    scores: &FeatureScores,
    selection: &FeatureSelection,
    features: &Arc<Vocabulary>,
    classes: &Arc<Vocabulary>,
    amplification_factor: u32,
) -> FeatureContrast {
    let fmeasure = &scores.fmeasure;

    let marginals: Vec<f64> = (0..features.len())
        .map(|f| {
            let mut sum_marginal = 0.0;
            let mut nb_marginal = 0usize;
            for value in fmeasure.row_at(f) {
                sum_marginal += value;
                nb_marginal += 1;
            }
            ratio_or_zero(sum_marginal, nb_marginal as f64)
        })
        .collect();

    let exponent = f64::from(amplification_factor);
    let contrast = FeatureClassTable::from_fn(features.clone(), classes.clone(), |f, c| {
        if !selection.selection.at(f) || marginals[f] == 0.0 {
            0.0
        } else {
            (fmeasure.at(f, c) / marginals[f]).powf(exponent)
        }
    });
    let activation = FeatureClassTable::from_fn(features.clone(), classes.clone(), |f, c| {
        selection.selection.at(f) && contrast.at(f, c) > 1.0
    });

    FeatureContrast {
        marginal_averages: FeatureTable::new(features.clone(), marginals),
        contrast,
        activation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::csr_from_rows;

    fn vocab(items: &[&str]) -> Arc<Vocabulary> {
        Arc::new(Vocabulary::new(items.iter().map(|s| s.to_string()).collect()))
    }

    #[test]
    fn all_zero_feature_column_falls_back_to_zero() {
        let m = csr_from_rows(&[vec![1.0, 0.0], vec![2.0, 0.0]]).unwrap();
        let features = vocab(&["used", "unused"]);
        let classes = vocab(&["A", "B"]);
        let scores = compute_scores(&m, &[0, 1], &features, &classes);

        for c in 0..2 {
            assert_eq!(scores.frecall.at(1, c), 0.0);
            assert_eq!(scores.fpredominance.at(1, c), 0.0);
            assert_eq!(scores.fmeasure.at(1, c), 0.0);
        }
        assert!((scores.frecall.at(0, 0) - 1.0 / 3.0).abs() < 1e-15);
        assert_eq!(scores.fpredominance.at(0, 0), 1.0);
    }

    #[test]
    fn class_without_weight_gets_zero_predominance() {
        let m = csr_from_rows(&[vec![1.0, 1.0], vec![0.0, 0.0]]).unwrap();
        let features = vocab(&["f1", "f2"]);
        let classes = vocab(&["A", "B"]);
        let scores = compute_scores(&m, &[0, 1], &features, &classes);
        assert_eq!(scores.fpredominance.at(0, 1), 0.0);
        assert_eq!(scores.fmeasure.at(1, 1), 0.0);
    }

    #[test]
    fn explicit_zeros_do_not_change_sums() {
        let dense = csr_from_rows(&[vec![3.0, 0.0], vec![0.0, 4.0]]).unwrap();
        // Fully stored CSR, zeros included.
        let with_zeros = DataVectors::new(
            (2, 2),
            vec![0, 2, 4],
            vec![0, 1, 0, 1],
            vec![3.0, 0.0, 0.0, 4.0],
        );
        assert_eq!(with_zeros.nnz(), 4);
        let features = vocab(&["f1", "f2"]);
        let classes = vocab(&["A", "B"]);
        let a = compute_scores(&dense, &[0, 1], &features, &classes);
        let b = compute_scores(&with_zeros, &[0, 1], &features, &classes);
        assert_eq!(
            a.fmeasure.iter().collect::<Vec<_>>(),
            b.fmeasure.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn uniform_feature_is_not_selected_and_has_no_contrast() {
        // Every feature is spread evenly: f-measure equals the overall average.
        let m = csr_from_rows(&[vec![1.0, 1.0], vec![1.0, 1.0]]).unwrap();
        let features = vocab(&["f1", "f2"]);
        let classes = vocab(&["A", "B"]);
        let scores = compute_scores(&m, &[0, 1], &features, &classes);
        let selection = compute_selection(&scores, &features);
        assert_eq!(selection.selection.values(), &[false, false]);

        let contrast = compute_contrast(&scores, &selection, &features, &classes, 1);
        assert!(contrast.contrast.iter().all(|(_, _, v)| v == 0.0));
        assert!(contrast.activation.iter().all(|(_, _, v)| !v));
    }

    #[test]
    fn empty_universe_averages_fall_back_to_zero() {
        let m = csr_from_rows::<Vec<f64>>(&[]).unwrap();
        let features = vocab(&[]);
        let classes = vocab(&[]);
        let scores = compute_scores(&m, &[], &features, &classes);
        let selection = compute_selection(&scores, &features);
        assert_eq!(selection.overall_average, 0.0);
    }

    #[test]
    fn amplification_sharpens_contrast() {
        let m = csr_from_rows(&[vec![9.0, 1.0], vec![1.0, 9.0], vec![5.0, 5.0]]).unwrap();
        let features = vocab(&["f1", "f2"]);
        let classes = vocab(&["A", "B", "C"]);
        let scores = compute_scores(&m, &[0, 1, 2], &features, &classes);
        let selection = compute_selection(&scores, &features);
        let plain = compute_contrast(&scores, &selection, &features, &classes, 1);
        let sharp = compute_contrast(&scores, &selection, &features, &classes, 3);

        for (f, c, value) in plain.contrast.iter() {
            let amplified = sharp.contrast.get(f, c).unwrap_or_default();
            assert!((amplified - value.powi(3)).abs() < 1e-12);
        }
        // Activation depends only on which side of 1.0 the contrast falls.
        assert_eq!(
            plain.activation.iter().collect::<Vec<_>>(),
            sharp.activation.iter().collect::<Vec<_>>()
        );
    }
}
