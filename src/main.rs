//! cardioviz: Medical Examination Visualization CLI
//!
//! Renders `catplot.png` and `heatmap.png` from a medical examination table.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use cardioviz::cli::Cli;
use cardioviz::pipeline::{count_overweight, dataset_stats, derive_features, load_dataset};
use cardioviz::render::{draw_cat_plot, draw_heat_map_with};
use cardioviz::report::{export_run_report, RunReport, RunSummary};
use cardioviz::utils::{
    create_spinner, finish_with_success, print_banner, print_completion, print_config,
    print_count, print_info, print_step_header, print_step_time, print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = !cli.quiet;
    let bounds = cli.filter_bounds()?;
    let run_start = Instant::now();

    if verbose {
        print_banner(env!("CARGO_PKG_VERSION"));
        print_config(
            &cli.input,
            &cli.output_dir,
            bounds.lower_quantile,
            bounds.upper_quantile,
        );
    }

    // Step 1: Load and derive features
    if verbose {
        print_step_header(1, "Load & Derive Features");
    }
    let step_start = Instant::now();
    let spinner = create_spinner("Loading examination table...", verbose);
    let raw = load_dataset(&cli.input, cli.infer_schema_length)?;
    let stats = dataset_stats(&raw);
    let table = derive_features(raw)?;
    let overweight = count_overweight(&table)?;
    finish_with_success(&spinner, "Examination table loaded");

    let mut summary = RunSummary::new(stats.rows, stats.columns);
    summary.set_overweight(overweight);
    let mut report = RunReport::new(&cli.input, stats.rows);

    if verbose {
        println!("      Rows: {}", stats.rows);
        println!("      Columns: {}", stats.columns);
        println!("      Estimated memory: {:.2} MB", stats.memory_mb);
        print_count("overweight subject(s)", overweight, Some("(BMI > 25)"));
        print_step_time(step_start.elapsed());
    }

    // Step 2: Categorical bar chart
    if cli.renders_catplot() {
        if verbose {
            print_step_header(2, "Categorical Bar Chart");
        }
        let step_start = Instant::now();
        let spinner = create_spinner("Counting categories and rendering...", verbose);
        let figure = draw_cat_plot(&table, &cli.catplot_path())?;
        finish_with_success(&spinner, "Bar chart rendered");

        if verbose {
            print_count("category group(s)", figure.counts.len(), None);
            print_success(&format!("Saved to {}", figure.path.display()));
            print_step_time(step_start.elapsed());
        }

        summary.add_catplot(figure.counts.len(), figure.path.clone());
        report = report.with_catplot(&figure);
    }

    // Step 3: Correlation heatmap
    if cli.renders_heatmap() {
        if verbose {
            print_step_header(3, "Correlation Heatmap");
        }
        let step_start = Instant::now();
        let spinner = create_spinner("Filtering outliers and correlating...", verbose);
        let figure = draw_heat_map_with(&table, &cli.heatmap_path(), &bounds)?;
        finish_with_success(&spinner, "Heatmap rendered");

        let pairs = figure.matrix.lower_pairs();
        if verbose {
            print_info(&format!(
                "Kept {} of {} rows after outlier filtering",
                figure.rows_kept, figure.rows_before
            ));
            print_count("numeric column(s)", figure.matrix.len(), None);
            print_success(&format!("Saved to {}", figure.path.display()));
            print_step_time(step_start.elapsed());
        }

        summary.add_heatmap(figure.rows_kept, &pairs, figure.path.clone());
        report = report.with_heatmap(&figure, bounds);
    }

    if let Some(report_path) = &cli.report {
        export_run_report(&report, report_path)?;
        if verbose {
            print_success(&format!("Report written to {}", report_path.display()));
        }
    }

    summary.set_elapsed(run_start.elapsed());
    if verbose {
        summary.display();
        print_completion();
    }

    Ok(())
}
