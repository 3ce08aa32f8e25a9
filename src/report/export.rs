//! JSON run report export

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{CategoryCount, ColumnRange, CorrelatedPair, FilterBounds};
use crate::render::{CatPlotFigure, HeatMapFigure};

/// Metadata about the run
#[derive(Serialize)]
pub struct ReportMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    /// cardioviz version
    pub cardioviz_version: String,
    /// Input file path
    pub input_file: String,
    /// Subjects in the input table
    pub subjects: usize,
}

/// Bar chart section
#[derive(Serialize)]
pub struct CatPlotSection {
    pub output_file: String,
    pub counts: Vec<CategoryCount>,
}

/// Heatmap section
#[derive(Serialize)]
pub struct HeatMapSection {
    pub output_file: String,
    pub bounds: FilterBounds,
    pub ranges: Vec<ColumnRange>,
    pub rows_before: usize,
    pub rows_kept: usize,
    pub columns: Vec<String>,
    /// Strictly-lower-triangle coefficients, strongest first
    pub correlations: Vec<CorrelatedPair>,
}

/// Complete run report
#[derive(Serialize)]
pub struct RunReport {
    pub metadata: ReportMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catplot: Option<CatPlotSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heatmap: Option<HeatMapSection>,
}

impl RunReport {
    pub fn new(input_file: &Path, subjects: usize) -> Self {
        Self {
            metadata: ReportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                cardioviz_version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: input_file.display().to_string(),
                subjects,
            },
            catplot: None,
            heatmap: None,
        }
    }

    pub fn with_catplot(mut self, figure: &CatPlotFigure) -> Self {
        self.catplot = Some(CatPlotSection {
            output_file: figure.path.display().to_string(),
            counts: figure.counts.clone(),
        });
        self
    }

    pub fn with_heatmap(mut self, figure: &HeatMapFigure, bounds: FilterBounds) -> Self {
        self.heatmap = Some(HeatMapSection {
            output_file: figure.path.display().to_string(),
            bounds,
            ranges: figure.ranges.clone(),
            rows_before: figure.rows_before,
            rows_kept: figure.rows_kept,
            columns: figure.matrix.columns.clone(),
            correlations: figure.matrix.lower_pairs(),
        });
        self
    }
}

/// Export the run report to a JSON file
pub fn export_run_report(report: &RunReport, output_path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(report).context("Failed to serialize run report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write run report to {}", output_path.display()))?;

    Ok(())
}
