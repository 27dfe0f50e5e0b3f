//! JSON dataset input.
//!
//! ```json
//! {
//!   "features": ["Shoes size", "Hair size", "Nose size"],
//!   "classes": ["Man", "Woman"],
//!   "vectors": [[9, 5, 5], [5, 25, 5]],
//!   "config": { "amplification_factor": 1 }
//! }
//! ```
//!
//! `vectors` is either dense rows or a sparse object
//! `{ "shape": [rows, cols], "entries": [[row, col, weight], ...] }`.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::config::FmcConfig;
use crate::error::FmcError;
use crate::fmc::FeaturesMaximizationMetric;
use crate::matrix::{csr_from_rows, csr_from_triplets, DataVectors};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dense vectors must all have the same length")]
    RaggedRows,

    #[error("sparse entry ({row}, {column}) is outside shape ({rows}, {columns})")]
    EntryOutOfBounds {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    #[error(transparent)]
    Fmc(#[from] FmcError),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VectorsSpec {
    Dense(Vec<Vec<f64>>),
    Sparse {
        shape: (usize, usize),
        entries: Vec<(usize, usize, f64)>,
    },
}

impl VectorsSpec {
    pub fn to_matrix(&self) -> Result<DataVectors, DatasetError> {
        match self {
            VectorsSpec::Dense(rows) => csr_from_rows(rows).ok_or(DatasetError::RaggedRows),
            VectorsSpec::Sparse { shape, entries } => {
                let (rows, columns) = *shape;
                if let Some(&(row, column, _)) = entries
                    .iter()
                    .find(|(row, column, _)| *row >= rows || *column >= columns)
                {
                    return Err(DatasetError::EntryOutOfBounds {
                        row,
                        column,
                        rows,
                        columns,
                    });
                }
                Ok(csr_from_triplets(*shape, entries.iter().copied()))
            }
        }
    }
}

/// A labelled dataset ready to be modelized.
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub features: Vec<String>,
    pub classes: Vec<String>,
    pub vectors: VectorsSpec,
    #[serde(default)]
    pub config: FmcConfig,
}

impl Dataset {
    pub fn from_json_str(raw: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Build the modelization with the dataset's own configuration.
    pub fn modelize(self) -> Result<FeaturesMaximizationMetric, DatasetError> {
        let config = self.config.clone();
        self.modelize_with(&config)
    }

    /// Build the modelization with an explicit configuration.
    pub fn modelize_with(
        self,
        config: &FmcConfig,
    ) -> Result<FeaturesMaximizationMetric, DatasetError> {
        let matrix = self.vectors.to_matrix()?;
        Ok(FeaturesMaximizationMetric::with_config(
            matrix,
            self.classes,
            self.features,
            config,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_dataset_modelizes() {
        let raw = r#"{
            "features": ["f1", "f2"],
            "classes": ["A", "B"],
            "vectors": [[3, 0], [0, 4]]
        }"#;
        let dataset = Dataset::from_json_str(raw).unwrap();
        assert_eq!(dataset.config, FmcConfig::default());
        let engine = dataset.modelize().unwrap();
        assert_eq!(engine.classes(), &["A".to_string(), "B".to_string()]);
        assert_eq!(engine.fmeasure().get("f1", "A"), Some(1.0));
    }

    #[test]
    fn sparse_dataset_matches_dense_one() {
        let sparse = r#"{
            "features": ["f1", "f2"],
            "classes": ["A", "B"],
            "vectors": {"shape": [2, 2], "entries": [[0, 0, 3.0], [1, 1, 4.0]]},
            "config": {"amplification_factor": 2}
        }"#;
        let dataset = Dataset::from_json_str(sparse).unwrap();
        assert_eq!(dataset.config.amplification_factor, 2);
        let engine = dataset.modelize().unwrap();
        assert_eq!(engine.amplification_factor(), 2);
        assert_eq!(engine.data_vectors().nnz(), 2);
    }

    #[test]
    fn out_of_bounds_entry_is_rejected() {
        let raw = r#"{
            "features": ["f1"],
            "classes": ["A"],
            "vectors": {"shape": [1, 1], "entries": [[0, 3, 1.0]]}
        }"#;
        let err = Dataset::from_json_str(raw).unwrap().modelize().unwrap_err();
        assert!(matches!(
            err,
            DatasetError::EntryOutOfBounds { row: 0, column: 3, .. }
        ));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let raw = r#"{"features": ["f1", "f2"], "classes": ["A", "B"], "vectors": [[1, 2], [3]]}"#;
        let err = Dataset::from_json_str(raw).unwrap().modelize().unwrap_err();
        assert!(matches!(err, DatasetError::RaggedRows));
    }

    #[test]
    fn engine_errors_surface_through_dataset() {
        let raw = r#"{"features": ["f1"], "classes": ["A", "B"], "vectors": [[1]]}"#;
        let err = Dataset::from_json_str(raw).unwrap().modelize().unwrap_err();
        assert!(matches!(
            err,
            DatasetError::Fmc(FmcError::ClassesShapeMismatch { vectors: 1, classes: 2 })
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Dataset::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
