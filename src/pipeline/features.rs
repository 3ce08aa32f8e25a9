//! Derived and normalized examination features
//!
//! Adds the `overweight` indicator (BMI above 25) and collapses the three-level
//! `cholesterol` and `gluc` scales into 0 (normal) / 1 (above normal).

use anyhow::{Context, Result};
use polars::prelude::*;

use super::loader::require_columns;

/// BMI strictly above this value counts as overweight
pub const BMI_THRESHOLD: f64 = 25.0;

/// Ordinal values strictly above this are "above normal"
pub const ORDINAL_NORMAL: f64 = 1.0;

/// Name of the derived overweight column
pub const OVERWEIGHT: &str = "overweight";

/// Columns the deriver reads
pub const DERIVATION_INPUTS: [&str; 4] = ["height", "weight", "cholesterol", "gluc"];

/// Ordinal columns collapsed to binary form
pub const ORDINAL_COLUMNS: [&str; 2] = ["cholesterol", "gluc"];

/// Body-mass-index expression: weight(kg) / height(m)^2
pub fn bmi_expr() -> Expr {
    let height_m = col("height").cast(DataType::Float64) / lit(100.0);
    col("weight").cast(DataType::Float64) / (height_m.clone() * height_m)
}

/// Boolean condition as a 0/1 `Int32` column, null counted as 0
fn indicator(condition: Expr) -> Expr {
    condition.fill_null(lit(false)).cast(DataType::Int32)
}

/// Add `overweight` and normalize `cholesterol`/`gluc` to {0, 1}.
///
/// Existing columns keep their position; `overweight` is appended last.
/// A null input compares as false, so every derived value is 0 or 1.
pub fn derive_features(df: DataFrame) -> Result<DataFrame> {
    require_columns(&df, &DERIVATION_INPUTS)?;

    let mut exprs = vec![indicator(bmi_expr().gt(lit(BMI_THRESHOLD))).alias(OVERWEIGHT)];

    for name in ORDINAL_COLUMNS {
        let above = col(name).cast(DataType::Float64).gt(lit(ORDINAL_NORMAL));
        exprs.push(indicator(above).alias(name));
    }

    df.lazy()
        .with_columns(exprs)
        .collect()
        .context("Failed to derive overweight/normalized features")
}

/// Number of subjects flagged overweight in a derived table
pub fn count_overweight(df: &DataFrame) -> Result<usize> {
    let column = df
        .column(OVERWEIGHT)
        .context("Column 'overweight' not found; run derive_features first")?
        .cast(&DataType::Int32)?;

    Ok(column.i32()?.into_iter().flatten().filter(|&v| v == 1).count())
}
