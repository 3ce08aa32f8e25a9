//! Command-line argument definitions using clap

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::FilterBounds;
use crate::render::{CATPLOT_FILE, HEATMAP_FILE};

/// cardioviz - Chart cardiovascular risk indicators from medical examination data
#[derive(Parser, Debug)]
#[command(name = "cardioviz")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input file path (CSV or Parquet)
    #[arg(short, long, default_value = "medical_examination.csv")]
    pub input: PathBuf,

    /// Directory the images are written to. Created if missing.
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// File name of the categorical bar chart
    #[arg(long, default_value = CATPLOT_FILE)]
    pub catplot_name: String,

    /// File name of the correlation heatmap
    #[arg(long, default_value = HEATMAP_FILE)]
    pub heatmap_name: String,

    /// Lower quantile of height/weight kept by the heatmap outlier filter
    #[arg(long, default_value = "0.025", value_parser = validate_quantile)]
    pub lower_quantile: f64,

    /// Upper quantile of height/weight kept by the heatmap outlier filter
    #[arg(long, default_value = "0.975", value_parser = validate_quantile)]
    pub upper_quantile: f64,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Write a JSON report (category counts, filter ranges, correlations) to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Suppress banner, step and summary output
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Render only the categorical bar chart
    Catplot,

    /// Render only the correlation heatmap
    Heatmap,
}

impl Cli {
    /// Output path of the bar chart
    pub fn catplot_path(&self) -> PathBuf {
        self.output_dir.join(&self.catplot_name)
    }

    /// Output path of the heatmap
    pub fn heatmap_path(&self) -> PathBuf {
        self.output_dir.join(&self.heatmap_name)
    }

    /// Validated quantile bounds for the heatmap filter
    pub fn filter_bounds(&self) -> Result<FilterBounds> {
        FilterBounds::new(self.lower_quantile, self.upper_quantile)
    }

    pub fn renders_catplot(&self) -> bool {
        !matches!(self.command, Some(Commands::Heatmap))
    }

    pub fn renders_heatmap(&self) -> bool {
        !matches!(self.command, Some(Commands::Catplot))
    }
}

/// Validator for quantile parameters
fn validate_quantile(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=1.0).contains(&value) {
        Err(format!("quantile must be between 0.0 and 1.0, got {}", value))
    } else {
        Ok(value)
    }
}
