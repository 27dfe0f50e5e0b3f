//! Sparse weighted data matrices.
//!
//! The engine works on `sprs::CsMat<f64>`: rows are data items, columns are
//! features. Only stored non-zero entries take part in the sums, so explicit
//! zeros and absent entries behave the same way.

use nalgebra::DMatrix;
use sprs::{CsMat, TriMat};

use crate::error::FmcError;

/// Sparse matrix of data weights (rows = data, columns = features).
pub type DataVectors = CsMat<f64>;

/// Iterate `(row, column, weight)` over stored entries, skipping explicit zeros.
pub fn nonzero_entries(matrix: &DataVectors) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
    matrix
        .iter()
        .filter(|(weight, _)| **weight != 0.0)
        .map(|(weight, (row, column))| (row, column, *weight))
}

/// First stored weight that is negative, NaN or infinite.
pub(crate) fn check_weights(matrix: &DataVectors) -> Result<(), FmcError> {
    for (weight, (row, column)) in matrix.iter() {
        if !weight.is_finite() || *weight < 0.0 {
            return Err(FmcError::InvalidWeight {
                row,
                column,
                weight: *weight,
            });
        }
    }
    Ok(())
}

/// Build a CSR matrix from `(row, column, weight)` triplets.
///
/// Duplicated coordinates are summed. Callers must keep coordinates inside
/// `shape`.
pub fn csr_from_triplets(
    shape: (usize, usize),
    triplets: impl IntoIterator<Item = (usize, usize, f64)>,
) -> DataVectors {
    let mut tri = TriMat::new(shape);
    for (row, column, weight) in triplets {
        if weight != 0.0 {
            tri.add_triplet(row, column, weight);
        }
    }
    tri.to_csr()
}

/// Build a CSR matrix from a dense `nalgebra` matrix, dropping zeros.
pub fn csr_from_dense(dense: &DMatrix<f64>) -> DataVectors {
    let (rows, columns) = dense.shape();
    let mut triplets = Vec::new();
    for row in 0..rows {
        for column in 0..columns {
            let weight = dense[(row, column)];
            if weight != 0.0 {
                triplets.push((row, column, weight));
            }
        }
    }
    csr_from_triplets((rows, columns), triplets)
}

/// Build a CSR matrix from dense rows of equal length.
///
/// Returns `None` when rows are ragged.
pub fn csr_from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Option<DataVectors> {
    let columns = rows.first().map(|row| row.as_ref().len()).unwrap_or(0);
    if rows.iter().any(|row| row.as_ref().len() != columns) {
        return None;
    }
    let flat: Vec<f64> = rows
        .iter()
        .flat_map(|row| row.as_ref().iter().copied())
        .collect();
    let dense = DMatrix::from_row_slice(rows.len(), columns, &flat);
    Some(csr_from_dense(&dense))
}
