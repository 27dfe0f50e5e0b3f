//! Error types for the metric engine, its queries and comparisons.

use thiserror::Error;

use crate::agreement::AgreementError;

/// Errors raised while building or querying a [`FeaturesMaximizationMetric`].
///
/// Construction errors are reported before any computation starts, so a failed
/// construction never yields a partially computed engine.
///
/// [`FeaturesMaximizationMetric`]: crate::fmc::FeaturesMaximizationMetric
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FmcError {
    /// Matrix row count differs from the number of data classes.
    #[error(
        "The vectors `data_vectors` and the list of classes `data_classes` have inconsistent shapes (currently: '{vectors}' vs '{classes}')."
    )]
    ClassesShapeMismatch { vectors: usize, classes: usize },

    /// Matrix column count differs from the number of features.
    #[error(
        "The vectors `data_vectors` and the list of features `features` have inconsistent shapes (currently: '{vectors}' vs '{features}')."
    )]
    FeaturesShapeMismatch { vectors: usize, features: usize },

    #[error(
        "The amplification factor `amplification_factor` has to be a positive integer (currently: '{0}')."
    )]
    InvalidAmplificationFactor(i64),

    /// A feature name appears more than once in `features`.
    #[error(
        "The list of features `features` must not contain duplicates (currently: '{0}' is repeated)."
    )]
    DuplicateFeature(String),

    /// A stored weight is negative, NaN or infinite.
    #[error(
        "The vectors `data_vectors` must only hold finite non-negative weights (currently: '{weight}' at data '{row}', feature '{column}')."
    )]
    InvalidWeight { row: usize, column: usize, weight: f64 },

    #[error("The requested feature `'{0}'` is unknown.")]
    UnknownFeature(String),

    #[error("The requested classe `'{0}'` is unknown.")]
    UnknownClasse(String),

    #[error(
        "The sort option factor `sort_by` has to be in the following values: `{{'contrast', 'fmeasure'}}` (currently: '{0}')."
    )]
    InvalidSortOption(String),

    /// Two modelizations do not share the same feature vocabulary.
    ///
    /// `in_excess` lists features only known by the compared engine, `missing`
    /// lists features only known by the reference.
    #[error(
        "The list of features `features` must be the same for both FMC modelization. +: {}, -: {}",
        quoted_list(.in_excess),
        quoted_list(.missing)
    )]
    FeaturesMismatch {
        in_excess: Vec<String>,
        missing: Vec<String>,
    },

    #[error(transparent)]
    Agreement(#[from] AgreementError),
}

/// Render `["a", "b"]` as `['a', 'b']`.
fn quoted_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("'{item}'")).collect();
    format!("[{}]", quoted.join(", "))
}
