//! Physiological plausibility and percentile outlier filter

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;

use super::error::PipelineError;
use super::loader::require_columns;
use super::stats::quantile_linear;

/// Columns whose tails are trimmed by the percentile filter
pub const TRIMMED_COLUMNS: [&str; 2] = ["height", "weight"];

/// Quantile range kept for each trimmed column (inclusive on both ends)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterBounds {
    pub lower_quantile: f64,
    pub upper_quantile: f64,
}

impl Default for FilterBounds {
    fn default() -> Self {
        Self {
            lower_quantile: 0.025,
            upper_quantile: 0.975,
        }
    }
}

impl FilterBounds {
    /// Create bounds, rejecting values outside [0, 1] or in the wrong order
    pub fn new(lower_quantile: f64, upper_quantile: f64) -> Result<Self> {
        let valid = (0.0..=1.0).contains(&lower_quantile)
            && (0.0..=1.0).contains(&upper_quantile)
            && lower_quantile <= upper_quantile;

        if !valid {
            return Err(PipelineError::InvalidQuantileBounds {
                lower: lower_quantile,
                upper: upper_quantile,
            }
            .into());
        }

        Ok(Self {
            lower_quantile,
            upper_quantile,
        })
    }
}

/// Concrete value range resolved for one trimmed column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnRange {
    pub column: String,
    pub min: f64,
    pub max: f64,
}

/// Result of the outlier filter
#[derive(Debug, Clone)]
pub struct FilteredTable {
    pub table: DataFrame,
    pub ranges: Vec<ColumnRange>,
    pub rows_before: usize,
}

impl FilteredTable {
    pub fn rows_kept(&self) -> usize {
        self.table.height()
    }
}

fn float_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .cast(&DataType::Float64)?;

    Ok(column.f64()?.into_iter().flatten().collect())
}

/// Resolve the quantile range of a column over the whole (unfiltered) table
pub fn column_range(df: &DataFrame, name: &str, bounds: &FilterBounds) -> Result<ColumnRange> {
    let values = float_values(df, name)?;
    let min = quantile_linear(&values, bounds.lower_quantile);
    let max = quantile_linear(&values, bounds.upper_quantile);

    match (min, max) {
        (Some(min), Some(max)) => Ok(ColumnRange {
            column: name.to_string(),
            min,
            max,
        }),
        _ => Err(PipelineError::EmptyFilteredTable.into()),
    }
}

/// Keep rows with `ap_lo <= ap_hi` whose height and weight lie inside their
/// quantile ranges.
///
/// Ranges are computed once on the input table and every condition is applied
/// in a single combined mask.
pub fn filter_plausible(df: &DataFrame, bounds: &FilterBounds) -> Result<FilteredTable> {
    require_columns(df, &["ap_lo", "ap_hi", "height", "weight"])?;

    let ranges = TRIMMED_COLUMNS
        .iter()
        .map(|name| column_range(df, name, bounds))
        .collect::<Result<Vec<_>>>()?;

    let mut mask = col("ap_lo").lt_eq(col("ap_hi"));
    for range in &ranges {
        let value = col(range.column.as_str()).cast(DataType::Float64);
        mask = mask
            .and(value.clone().gt_eq(lit(range.min)))
            .and(value.lt_eq(lit(range.max)));
    }

    let table = df
        .clone()
        .lazy()
        .filter(mask)
        .collect()
        .context("Failed to apply outlier filter")?;

    if table.height() == 0 {
        return Err(PipelineError::EmptyFilteredTable.into());
    }

    Ok(FilteredTable {
        table,
        ranges,
        rows_before: df.height(),
    })
}
