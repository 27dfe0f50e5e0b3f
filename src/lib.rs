#![forbid(unsafe_code)]

//! # features-maximization-metric
//!
//! Features Maximization Metric (FMC) over labelled, weighted, sparse vectors.
//!
//! For every `(feature, class)` pair the engine measures how well the feature
//! *distinguishes* the class from the others (Features Recall) and how well it
//! *characterizes* the class compared with other features (Features
//! Predominance), then fuses both into an F-Measure. Features beating the
//! global average F-Measure for some class are selected; their contrast against
//! their own average decides which classes they activate.
//!
//! ```no_run
//! use features_maximization_metric::{csr_from_rows, FeaturesMaximizationMetric, RankingOptions};
//!
//! let vectors = csr_from_rows(&[vec![9.0, 5.0], vec![5.0, 25.0]]).unwrap();
//! let fmc = FeaturesMaximizationMetric::new(
//!     vectors,
//!     vec!["Man".into(), "Woman".into()],
//!     vec!["Shoes size".into(), "Hair size".into()],
//! )?;
//! let best = fmc.get_most_active_features_by_classe("Man", &RankingOptions::default())?;
//! # Ok::<(), features_maximization_metric::FmcError>(())
//! ```

pub mod agreement;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fmc;
pub mod matrix;
pub mod tables;

pub use agreement::{homogeneity_completeness_v_measure, AgreementError, ClusteringAgreement};
pub use config::FmcConfig;
pub use dataset::{Dataset, DatasetError};
pub use error::FmcError;
pub use fmc::compare::Similarity;
pub use fmc::progress::{Milestone, ProgressSink, RecordingProgress};
pub use fmc::ranking::{RankingOptions, SortBy};
pub use fmc::FeaturesMaximizationMetric;
pub use matrix::{csr_from_dense, csr_from_rows, csr_from_triplets, DataVectors};
pub use tables::{FeatureClassTable, FeatureTable, Vocabulary};
