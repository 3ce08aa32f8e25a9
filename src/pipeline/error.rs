//! Typed pipeline failures
//!
//! Library functions return `anyhow::Result`; the conditions below are raised
//! as `PipelineError` so callers can `downcast_ref` and react to them.

use thiserror::Error;

/// Data-shape and filtering failures raised by the pipeline stages
#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    /// One or more required columns are absent from the table
    #[error("Missing required column(s): {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// The plausibility/percentile filter removed every row
    #[error("No rows left after outlier filtering")]
    EmptyFilteredTable,

    /// Correlation needs at least two numeric columns
    #[error("Need at least 2 numeric columns for correlation, found {found}")]
    InsufficientColumns { found: usize },

    /// Quantile bounds outside [0, 1] or in the wrong order
    #[error("Invalid quantile bounds: lower={lower}, upper={upper} (expected 0 <= lower <= upper <= 1)")]
    InvalidQuantileBounds { lower: f64, upper: f64 },
}
