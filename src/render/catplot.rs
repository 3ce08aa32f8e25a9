//! Faceted bar chart of categorical indicators split by cardio status

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use polars::prelude::DataFrame;

use super::palette::category_color;
use super::{prepare_output, FONT};
use crate::pipeline::{category_counts, CategoryCount};

/// Canvas size: two 600x600 facets side by side
pub const CATPLOT_SIZE: (u32, u32) = (1200, 600);

/// Share of each x slot covered by the group of bars
const BAR_SPAN: f64 = 0.8;

/// Handle to a rendered bar chart
#[derive(Debug, Clone)]
pub struct CatPlotFigure {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub counts: Vec<CategoryCount>,
}

/// Count the categorical indicators and render them as a faceted bar chart.
///
/// One facet per `cardio` value, one x slot per variable, one bar per value.
/// The image at `output` is overwritten.
pub fn draw_cat_plot(table: &DataFrame, output: &Path) -> Result<CatPlotFigure> {
    let counts = category_counts(table)?;

    prepare_output(output)?;
    render_cat_plot(&counts, output)
        .with_context(|| format!("Failed to render bar chart: {}", output.display()))?;

    Ok(CatPlotFigure {
        path: output.to_path_buf(),
        width: CATPLOT_SIZE.0,
        height: CATPLOT_SIZE.1,
        counts,
    })
}

/// Distinct values in ascending order
fn distinct_sorted<T: Ord>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut values: Vec<T> = items.collect();
    values.sort_unstable();
    values.dedup();
    values
}

fn render_cat_plot(counts: &[CategoryCount], output: &Path) -> Result<()> {
    let root = BitMapBackend::new(output, CATPLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let variables = distinct_sorted(counts.iter().map(|c| c.variable.clone()));
    let facets = distinct_sorted(counts.iter().map(|c| c.cardio));
    let hues = distinct_sorted(counts.iter().map(|c| c.value));

    let y_max = counts.iter().map(|c| c.total).max().unwrap_or(0).max(1) as f64 * 1.05;
    let x_range = -0.5f64..(variables.len().max(1) as f64 - 0.5);
    let bar_width = BAR_SPAN / hues.len().max(1) as f64;

    let panels = root.split_evenly((1, facets.len().max(1)));
    let label_style = (FONT, 15)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));

    for (panel, &cardio) in panels.iter().zip(&facets) {
        let mut chart = ChartBuilder::on(panel)
            .caption(format!("cardio = {}", cardio), (FONT, 22))
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range.clone(), 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|_| String::new())
            .x_desc("variable")
            .y_desc("total")
            .draw()?;

        for (k, &value) in hues.iter().enumerate() {
            let color = category_color(value);
            let bars: Vec<Rectangle<(f64, f64)>> = variables
                .iter()
                .enumerate()
                .filter_map(|(i, name)| {
                    let total = counts
                        .iter()
                        .find(|c| c.cardio == cardio && c.value == value && &c.variable == name)?
                        .total;
                    let x0 = i as f64 - BAR_SPAN / 2.0 + k as f64 * bar_width;
                    Some(Rectangle::new(
                        [(x0, 0.0), (x0 + bar_width, total as f64)],
                        color.filled(),
                    ))
                })
                .collect();

            chart
                .draw_series(bars)?
                .label(value.to_string())
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((FONT, 14))
            .draw()?;

        // Variable names under each slot
        for (i, name) in variables.iter().enumerate() {
            let (px, py) = chart.backend_coord(&(i as f64, 0.0));
            root.draw(&Text::new(name.clone(), (px, py + 6), label_style.clone()))?;
        }
    }

    root.present()?;
    Ok(())
}
