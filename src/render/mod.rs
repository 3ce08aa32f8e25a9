//! Render module - static PNG figures for the examination data

pub mod catplot;
pub mod heatmap;
pub mod palette;

pub use catplot::*;
pub use heatmap::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Font family used for every label
pub const FONT: &str = "sans-serif";

/// Default file name of the categorical bar chart
pub const CATPLOT_FILE: &str = "catplot.png";

/// Default file name of the correlation heatmap
pub const HEATMAP_FILE: &str = "heatmap.png";

/// Create the parent directory of an output file if needed
fn prepare_output(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display())),
        _ => Ok(()),
    }
}
