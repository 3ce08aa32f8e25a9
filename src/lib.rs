//! cardioviz: Medical Examination Visualization Library
//!
//! Loads a medical examination table, derives an overweight indicator,
//! normalizes cholesterol/glucose, and renders a categorical bar chart and a
//! correlation heatmap.

pub mod cli;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod utils;
