//! Agreement between two modelizations of the same feature space.
//!
//! Each modelization is reduced to one label per feature: the single class the
//! feature activates. The two label sequences are then scored with
//! homogeneity, completeness and V-measure.

use super::ranking::RankingOptions;
use super::FeaturesMaximizationMetric;
use crate::agreement::{homogeneity_completeness_v_measure, ClusteringAgreement};
use crate::error::FmcError;

/// Similarity of a modelization with a reference one.
pub type Similarity = ClusteringAgreement;

/// Per-feature label used for the comparison.
///
/// `NotActivated` stands for "no single activated class" and never equals a
/// real class, whatever the class names of either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ActivationLabel<'a> {
    Classe(&'a str),
    NotActivated,
}

impl<'a> ActivationLabel<'a> {
    fn from_ranking(ranking: &[&'a str]) -> Self {
        match ranking {
            [single] => ActivationLabel::Classe(*single),
            _ => ActivationLabel::NotActivated,
        }
    }
}

/// Decimal digits past which no finite `f64` changes when rounded.
const MAX_SIGNIFICANT_DECIMALS: u32 = 323;

/// Round to `digits` decimals, half to even on the exact binary value.
fn round_to(value: f64, digits: u32) -> f64 {
    if !value.is_finite() || digits > MAX_SIGNIFICANT_DECIMALS {
        return value;
    }
    let precision = digits as usize;
    format!("{value:.precision$}").parse().unwrap_or(value)
}

impl FeaturesMaximizationMetric {
    /// Score this modelization against `reference`.
    ///
    /// Features where neither side activates exactly one class are skipped.
    /// This modelization provides the predicted labels, `reference` the true
    /// ones. With `rounded`, each score is rounded to that many decimals.
    ///
    /// # Errors
    ///
    /// [`FmcError::FeaturesMismatch`] when the feature vocabularies differ.
    pub fn compare(
        &self,
        reference: &FeaturesMaximizationMetric,
        rounded: Option<u32>,
    ) -> Result<Similarity, FmcError> {
        if self.features() != reference.features() {
            let in_excess = self
                .features()
                .iter()
                .filter(|feature| !reference.features.contains(feature))
                .cloned()
                .collect();
            let missing = reference
                .features()
                .iter()
                .filter(|feature| !self.features.contains(feature))
                .cloned()
                .collect();
            return Err(FmcError::FeaturesMismatch { in_excess, missing });
        }

        let options = RankingOptions::default();
        let mut self_labels: Vec<ActivationLabel<'_>> = Vec::new();
        let mut reference_labels: Vec<ActivationLabel<'_>> = Vec::new();

        for feature in reference.features() {
            let in_self = self.get_most_activated_classes_by_feature(feature, &options)?;
            let in_reference = reference.get_most_activated_classes_by_feature(feature, &options)?;
            if in_self.len() != 1 && in_reference.len() != 1 {
                continue;
            }
            self_labels.push(ActivationLabel::from_ranking(&in_self));
            reference_labels.push(ActivationLabel::from_ranking(&in_reference));
        }

        tracing::debug!(
            compared_features = self_labels.len(),
            total_features = reference.features().len(),
            "Comparing FMC modelizations"
        );

        let mut similarity = homogeneity_completeness_v_measure(&reference_labels, &self_labels)?;
        if let Some(digits) = rounded {
            similarity.homogeneity = round_to(similarity.homogeneity, digits);
            similarity.completeness = round_to(similarity.completeness, digits);
            similarity.v_measure = round_to(similarity.v_measure, digits);
        }
        Ok(similarity)
    }
}
