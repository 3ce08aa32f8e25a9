//! Pearson correlation matrix over the numeric columns of a table

use anyhow::Result;
use faer::Mat;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use super::error::PipelineError;
use super::stats::pearson;

/// Represents a correlated pair of columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelatedPair {
    pub feature1: String,
    pub feature2: String,
    pub correlation: f64,
}

/// Square, symmetric correlation matrix with named rows/columns.
///
/// Entries involving a zero-variance (or all-null) column are `NaN`,
/// including that column's diagonal.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Mat<f64>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[(i, j)]
    }

    /// Look up a coefficient by column names
    pub fn by_name(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.get(i, j))
    }

    /// Strictly-lower-triangle entries (the ones a masked heatmap shows),
    /// sorted by absolute correlation descending. `NaN` entries are skipped.
    pub fn lower_pairs(&self) -> Vec<CorrelatedPair> {
        let n = self.len();
        let mut pairs: Vec<CorrelatedPair> = (0..n)
            .flat_map(|i| (0..i).map(move |j| (i, j)))
            .filter_map(|(i, j)| {
                let corr = self.get(i, j);
                (!corr.is_nan()).then(|| CorrelatedPair {
                    feature1: self.columns[i].clone(),
                    feature2: self.columns[j].clone(),
                    correlation: corr,
                })
            })
            .collect();

        pairs.sort_by(|a, b| {
            b.correlation
                .abs()
                .partial_cmp(&a.correlation.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        pairs
    }
}

/// Boolean mask of suppressed heatmap cells: `mask[i][j]` is true iff `j >= i`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriangleMask {
    size: usize,
}

impl TriangleMask {
    /// Upper triangle including the diagonal
    pub fn upper(size: usize) -> Self {
        Self { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_masked(&self, i: usize, j: usize) -> bool {
        j >= i
    }

    /// Dense row-major form
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        (0..self.size)
            .map(|i| (0..self.size).map(|j| self.is_masked(i, j)).collect())
            .collect()
    }
}

/// Primitive-numeric columns of the table, cast to Float64, in table order
fn numeric_columns(df: &DataFrame) -> Vec<(String, Column)> {
    df.get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric())
        .filter_map(|col| {
            col.cast(&DataType::Float64)
                .ok()
                .map(|float_col| (col.name().to_string(), float_col))
        })
        .collect()
}

/// Compute the full matrix pair by pair (lower overhead for few columns)
fn correlation_matrix_pairwise(float_columns: &[(String, Column)]) -> Result<Mat<f64>> {
    let n = float_columns.len();

    let values: Vec<Vec<Option<f64>>> = float_columns
        .iter()
        .map(|(_, col)| -> Result<Vec<Option<f64>>> { Ok(col.f64()?.into_iter().collect()) })
        .collect::<Result<_>>()?;

    // Upper triangle including the diagonal, mirrored afterwards
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (i..n).map(move |j| (i, j)))
        .collect();

    let coefficients: Vec<(usize, usize, f64)> = pairs
        .par_iter()
        .map(|&(i, j)| {
            let corr = pearson(values[i].iter().copied(), values[j].iter().copied());
            let corr = match corr {
                Some(_) if i == j => 1.0,
                Some(c) => c,
                None => f64::NAN,
            };
            (i, j, corr)
        })
        .collect();

    let mut matrix = Mat::<f64>::zeros(n, n);
    for (i, j, corr) in coefficients {
        matrix[(i, j)] = corr;
        matrix[(j, i)] = corr;
    }

    Ok(matrix)
}

/// Compute the matrix with one product `R = Z^T * Z` (faster for many columns).
///
/// Each column is standardized as `(x - mean) / (std * sqrt(n))` so the
/// product gives Pearson coefficients directly. Every column must be complete
/// (see [`is_complete`]); missing values would need per-pair row sets.
fn correlation_matrix_fast(float_columns: &[(String, Column)]) -> Result<Mat<f64>> {
    let n_cols = float_columns.len();
    let n_rows = float_columns.first().map(|(_, c)| c.len()).unwrap_or(0);

    let standardized: Vec<Option<Vec<f64>>> = float_columns
        .par_iter()
        .map(|(_, col)| {
            let ca = col.f64().ok()?;
            let valid: Vec<f64> = ca.into_iter().flatten().collect();
            if valid.is_empty() {
                return None;
            }

            let count = valid.len() as f64;
            let mean = valid.iter().sum::<f64>() / count;
            let var = valid.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / count;
            let std = var.sqrt();
            if std == 0.0 {
                return None; // Constant column
            }

            let scale = std * count.sqrt();
            Some(
                ca.into_iter()
                    .map(|v| v.map(|x| (x - mean) / scale).unwrap_or(0.0))
                    .collect(),
            )
        })
        .collect();

    let valid_idx: Vec<usize> = standardized
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.as_ref().map(|_| i))
        .collect();

    let mut z = Mat::<f64>::zeros(n_rows, valid_idx.len());
    for (col_idx, &src) in valid_idx.iter().enumerate() {
        if let Some(col_data) = &standardized[src] {
            for (row_idx, &val) in col_data.iter().enumerate() {
                z[(row_idx, col_idx)] = val;
            }
        }
    }

    let product = z.transpose() * &z;

    // Mirror one triangle so the result is exactly symmetric
    let mut matrix = Mat::<f64>::from_fn(n_cols, n_cols, |_, _| f64::NAN);
    for (a, &i) in valid_idx.iter().enumerate() {
        matrix[(i, i)] = 1.0;
        for (b, &j) in valid_idx.iter().enumerate().take(a) {
            let corr = product[(a, b)].clamp(-1.0, 1.0);
            matrix[(i, j)] = corr;
            matrix[(j, i)] = corr;
        }
    }

    Ok(matrix)
}

/// No nulls and no NaN values
fn is_complete(col: &Column) -> bool {
    col.null_count() == 0
        && col
            .f64()
            .map(|ca| ca.into_no_null_iter().all(|v| !v.is_nan()))
            .unwrap_or(false)
}

/// Threshold for auto-selecting matrix vs pairwise correlation computation.
/// Matrix multiplication is more efficient when there are many columns.
pub const MATRIX_METHOD_COLUMN_THRESHOLD: usize = 15;

/// Pearson correlation matrix over every primitive-numeric column.
///
/// Automatically chooses the most efficient method based on column count:
/// - Matrix method when columns >= 15
/// - Pairwise method otherwise
pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    let num_cols = df
        .get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric())
        .count();

    correlation_matrix_with(df, num_cols >= MATRIX_METHOD_COLUMN_THRESHOLD)
}

/// Pearson correlation matrix using an explicit method.
///
/// The matrix method is only taken when every numeric column is complete;
/// otherwise the pairwise method runs so each coefficient uses the rows where
/// both values are present.
pub fn correlation_matrix_with(df: &DataFrame, use_matrix: bool) -> Result<CorrelationMatrix> {
    let float_columns = numeric_columns(df);

    if float_columns.len() < 2 {
        return Err(PipelineError::InsufficientColumns {
            found: float_columns.len(),
        }
        .into());
    }

    let use_matrix = use_matrix && float_columns.iter().all(|(_, col)| is_complete(col));

    let values = if use_matrix {
        correlation_matrix_fast(&float_columns)?
    } else {
        correlation_matrix_pairwise(&float_columns)?
    };

    Ok(CorrelationMatrix {
        columns: float_columns.into_iter().map(|(name, _)| name).collect(),
        values,
    })
}
