//! Features Maximization Metric engine.
//!
//! A [`FeaturesMaximizationMetric`] is built once from a weighted data matrix,
//! one class label per data row and the feature vocabulary. Every derived table
//! is computed eagerly during construction and frozen afterwards:
//!
//! 1. Features F-Measure (from Features Recall and Features Predominance).
//! 2. Features Selection (against the F-Measure Overall Average).
//! 3. Features Contrast and Features Activation (against the F-Measure Marginal
//!    Averages).
//!
//! Queries ([`ranking`]) and comparisons ([`compare`]) are read-only.

pub mod compare;
pub mod progress;
pub mod ranking;
pub mod stages;

use std::sync::Arc;

use crate::config::FmcConfig;
use crate::error::FmcError;
use crate::matrix::{check_weights, DataVectors};
use crate::tables::{FeatureClassTable, FeatureTable, Vocabulary};

use progress::{Milestone, NoopProgress, ProgressSink, TracingProgress};
use stages::{FeatureContrast, FeatureScores, FeatureSelection};

/// A computed FMC modelization.
#[derive(Debug, Clone)]
pub struct FeaturesMaximizationMetric {
    data_vectors: DataVectors,
    data_classes: Vec<String>,
    features: Arc<Vocabulary>,
    classes: Arc<Vocabulary>,
    amplification_factor: u32,

    scores: FeatureScores,
    selection: FeatureSelection,
    contrast: FeatureContrast,
}

impl FeaturesMaximizationMetric {
    /// Build with the default configuration (amplification factor 1, quiet).
    pub fn new(
        data_vectors: DataVectors,
        data_classes: Vec<String>,
        features: Vec<String>,
    ) -> Result<Self, FmcError> {
        Self::with_config(data_vectors, data_classes, features, &FmcConfig::default())
    }

    /// Build with an explicit configuration. Milestones go to `tracing` when
    /// `config.verbose` is set.
    pub fn with_config(
        data_vectors: DataVectors,
        data_classes: Vec<String>,
        features: Vec<String>,
        config: &FmcConfig,
    ) -> Result<Self, FmcError> {
        if config.verbose {
            Self::with_progress(data_vectors, data_classes, features, config, &TracingProgress)
        } else {
            Self::with_progress(data_vectors, data_classes, features, config, &NoopProgress)
        }
    }

    /// Build and report every construction milestone to `progress`, whatever
    /// `config.verbose` says.
    ///
    /// # Errors
    ///
    /// Checked in this order, before any computation:
    /// - [`FmcError::ClassesShapeMismatch`] when matrix rows and `data_classes`
    ///   differ in length.
    /// - [`FmcError::FeaturesShapeMismatch`] when matrix columns and `features`
    ///   differ in length.
    /// - [`FmcError::DuplicateFeature`] when a feature name is repeated.
    /// - [`FmcError::InvalidAmplificationFactor`] when the factor is below 1.
    /// - [`FmcError::InvalidWeight`] on a negative or non-finite weight.
    pub fn with_progress(
        data_vectors: DataVectors,
        data_classes: Vec<String>,
        features: Vec<String>,
        config: &FmcConfig,
        progress: &dyn ProgressSink,
    ) -> Result<Self, FmcError> {
        progress.milestone(Milestone::CheckParameters);
        if data_vectors.rows() != data_classes.len() {
            return Err(FmcError::ClassesShapeMismatch {
                vectors: data_vectors.rows(),
                classes: data_classes.len(),
            });
        }
        if data_vectors.cols() != features.len() {
            return Err(FmcError::FeaturesShapeMismatch {
                vectors: data_vectors.cols(),
                features: features.len(),
            });
        }
        let features = Vocabulary::new(features);
        if let Some(repeated) = features.first_duplicate() {
            return Err(FmcError::DuplicateFeature(repeated.to_string()));
        }
        let amplification_factor = config.validated_amplification_factor()?;
        check_weights(&data_vectors)?;

        progress.milestone(Milestone::StoreParameters);
        let features = Arc::new(features);
        let classes = Arc::new(Vocabulary::sorted_distinct(&data_classes));
        let mut class_of_row = Vec::with_capacity(data_classes.len());
        for classe in &data_classes {
            // Every label is in the universe built from these same labels.
            let position = classes
                .position(classe)
                .ok_or_else(|| FmcError::UnknownClasse(classe.clone()))?;
            class_of_row.push(position);
        }

        progress.milestone(Milestone::StartComputations);

        progress.milestone(Milestone::ComputeFmeasure);
        let scores = stages::compute_scores(&data_vectors, &class_of_row, &features, &classes);

        progress.milestone(Milestone::ComputeSelection);
        let selection = stages::compute_selection(&scores, &features);

        progress.milestone(Milestone::ComputeContrast);
        let contrast = stages::compute_contrast(
            &scores,
            &selection,
            &features,
            &classes,
            amplification_factor,
        );

        progress.milestone(Milestone::ComputationsDone);
        tracing::debug!(
            features = features.len(),
            classes = classes.len(),
            nnz = data_vectors.nnz(),
            overall_average = selection.overall_average,
            selected = selection.selection.values().iter().filter(|s| **s).count(),
            "FMC modelization computed"
        );

        Ok(Self {
            data_vectors,
            data_classes,
            features,
            classes,
            amplification_factor,
            scores,
            selection,
            contrast,
        })
    }

    // -- Stored parameters ---------------------------------------------------

    pub fn data_vectors(&self) -> &DataVectors {
        &self.data_vectors
    }

    pub fn data_classes(&self) -> &[String] {
        &self.data_classes
    }

    /// Feature vocabulary, in the caller's order.
    pub fn features(&self) -> &[String] {
        self.features.names()
    }

    /// Class universe: distinct data classes, sorted ascending.
    pub fn classes(&self) -> &[String] {
        self.classes.names()
    }

    pub fn amplification_factor(&self) -> u32 {
        self.amplification_factor
    }

    // -- Derived tables ------------------------------------------------------

    pub fn frecall(&self) -> &FeatureClassTable<f64> {
        &self.scores.frecall
    }

    pub fn fpredominance(&self) -> &FeatureClassTable<f64> {
        &self.scores.fpredominance
    }

    pub fn fmeasure(&self) -> &FeatureClassTable<f64> {
        &self.scores.fmeasure
    }

    /// Mean F-Measure over every (feature, class) pair.
    pub fn overall_average(&self) -> f64 {
        self.selection.overall_average
    }

    pub fn selection(&self) -> &FeatureTable<bool> {
        &self.selection.selection
    }

    /// Per-feature mean F-Measure over classes.
    pub fn marginal_averages(&self) -> &FeatureTable<f64> {
        &self.contrast.marginal_averages
    }

    pub fn contrast(&self) -> &FeatureClassTable<f64> {
        &self.contrast.contrast
    }

    pub fn activation(&self) -> &FeatureClassTable<bool> {
        &self.contrast.activation
    }

    /// Names of the selected features, in vocabulary order.
    pub fn selected_features(&self) -> Vec<&str> {
        self.selection()
            .iter()
            .filter_map(|(feature, selected)| selected.then_some(feature))
            .collect()
    }
}
