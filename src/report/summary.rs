//! Run summary table

use std::path::PathBuf;
use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::CorrelatedPair;

/// How many correlations the summary lists
const TOP_CORRELATIONS: usize = 5;

/// Summary of one visualization run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub rows_loaded: usize,
    pub columns_loaded: usize,
    pub overweight_subjects: usize,
    pub category_groups: Option<usize>,
    pub rows_after_filter: Option<usize>,
    pub strongest_correlations: Vec<CorrelatedPair>,
    pub outputs: Vec<PathBuf>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn new(rows_loaded: usize, columns_loaded: usize) -> Self {
        Self {
            rows_loaded,
            columns_loaded,
            ..Default::default()
        }
    }

    pub fn set_overweight(&mut self, count: usize) {
        self.overweight_subjects = count;
    }

    pub fn add_catplot(&mut self, groups: usize, path: PathBuf) {
        self.category_groups = Some(groups);
        self.outputs.push(path);
    }

    pub fn add_heatmap(&mut self, rows_kept: usize, pairs: &[CorrelatedPair], path: PathBuf) {
        self.rows_after_filter = Some(rows_kept);
        self.strongest_correlations = pairs.iter().take(TOP_CORRELATIONS).cloned().collect();
        self.outputs.push(path);
    }

    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    /// Share of loaded rows that survived the outlier filter, in percent
    pub fn retained_pct(&self) -> Option<f64> {
        let kept = self.rows_after_filter?;
        if self.rows_loaded == 0 {
            return None;
        }
        Some(kept as f64 / self.rows_loaded as f64 * 100.0)
    }

    /// Render the summary table as text
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Subjects"), Cell::new(self.rows_loaded)]);
        table.add_row(vec![Cell::new("🧾 Columns"), Cell::new(self.columns_loaded)]);
        table.add_row(vec![
            Cell::new("⚖️  Overweight"),
            Cell::new(self.overweight_subjects).fg(Color::Yellow),
        ]);

        if let Some(groups) = self.category_groups {
            table.add_row(vec![Cell::new("📊 Category groups"), Cell::new(groups)]);
        }

        if let (Some(kept), Some(pct)) = (self.rows_after_filter, self.retained_pct()) {
            let color = if pct >= 90.0 {
                Color::Green
            } else if pct >= 75.0 {
                Color::Yellow
            } else {
                Color::Red
            };
            table.add_row(vec![
                Cell::new("🧹 Rows after filter"),
                Cell::new(format!("{} ({:.1}%)", kept, pct))
                    .fg(color)
                    .add_attribute(Attribute::Bold),
            ]);
        }

        table.add_row(vec![
            Cell::new("⏱️  Elapsed"),
            Cell::new(format!("{:.2}s", self.elapsed.as_secs_f64())),
        ]);

        table
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RUN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        // Indent the table
        for line in self.to_table().to_string().lines() {
            println!("    {}", line);
        }

        if !self.strongest_correlations.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("🔗").cyan(),
                style("STRONGEST CORRELATIONS").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());
            for pair in &self.strongest_correlations {
                let value = format!("{:+.2}", pair.correlation);
                let value = if pair.correlation >= 0.0 {
                    style(value).red()
                } else {
                    style(value).blue()
                };
                println!(
                    "        {} {} ~ {}  {}",
                    style("•").dim(),
                    pair.feature1,
                    pair.feature2,
                    value
                );
            }
        }

        if !self.outputs.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("💾").cyan(),
                style("OUTPUT FILES").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());
            for path in &self.outputs {
                println!("        {} {}", style("•").dim(), path.display());
            }
        }
    }
}
