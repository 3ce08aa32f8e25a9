//! Masked, annotated correlation heatmap

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use polars::prelude::DataFrame;

use super::palette::{diverging, text_color};
use super::{prepare_output, FONT};
use crate::pipeline::{
    correlation_matrix, filter_plausible, ColumnRange, CorrelationMatrix, FilterBounds,
    TriangleMask,
};

/// 12in x 12in at 100 dpi
pub const HEATMAP_SIZE: (u32, u32) = (1200, 1200);

const MARGIN_LEFT: i32 = 150;
const MARGIN_TOP: i32 = 40;
const MARGIN_RIGHT: i32 = 200;
const MARGIN_BOTTOM: i32 = 150;

/// Colour bar height relative to the matrix
const COLORBAR_SHRINK: f64 = 0.5;
const COLORBAR_WIDTH: i32 = 30;
const COLORBAR_GAP: i32 = 40;

/// Handle to a rendered heatmap
#[derive(Debug, Clone)]
pub struct HeatMapFigure {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub rows_before: usize,
    pub rows_kept: usize,
    pub ranges: Vec<ColumnRange>,
    pub matrix: CorrelationMatrix,
    pub mask: TriangleMask,
}

/// Filter outliers with the default bounds and render the correlation heatmap
pub fn draw_heat_map(table: &DataFrame, output: &Path) -> Result<HeatMapFigure> {
    draw_heat_map_with(table, output, &FilterBounds::default())
}

/// Filter outliers, correlate every numeric column and render the lower
/// triangle as an annotated heatmap. The image at `output` is overwritten.
pub fn draw_heat_map_with(
    table: &DataFrame,
    output: &Path,
    bounds: &FilterBounds,
) -> Result<HeatMapFigure> {
    let filtered = filter_plausible(table, bounds)?;
    let matrix = correlation_matrix(&filtered.table)?;
    let mask = TriangleMask::upper(matrix.len());

    prepare_output(output)?;
    render_heat_map(&matrix, &mask, output)
        .with_context(|| format!("Failed to render heatmap: {}", output.display()))?;

    Ok(HeatMapFigure {
        path: output.to_path_buf(),
        width: HEATMAP_SIZE.0,
        height: HEATMAP_SIZE.1,
        rows_before: filtered.rows_before,
        rows_kept: filtered.rows_kept(),
        ranges: filtered.ranges,
        matrix,
        mask,
    })
}

/// Largest absolute visible coefficient; the colour scale is symmetric about 0
fn color_limit(matrix: &CorrelationMatrix, mask: &TriangleMask) -> f64 {
    let n = matrix.len();
    let limit = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .filter(|&(i, j)| !mask.is_masked(i, j))
        .map(|(i, j)| matrix.get(i, j))
        .filter(|v| !v.is_nan())
        .fold(0.0f64, |acc, v| acc.max(v.abs()));

    if limit > 0.0 {
        limit
    } else {
        1.0
    }
}

fn render_heat_map(matrix: &CorrelationMatrix, mask: &TriangleMask, output: &Path) -> Result<()> {
    let root = BitMapBackend::new(output, HEATMAP_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = matrix.len().max(1) as i32;
    let (width, height) = (HEATMAP_SIZE.0 as i32, HEATMAP_SIZE.1 as i32);
    let side = (width - MARGIN_LEFT - MARGIN_RIGHT).min(height - MARGIN_TOP - MARGIN_BOTTOM);
    // Whole pixels per cell keeps the cells square
    let cell = side / n;
    let side = cell * n;
    let (left, top) = (MARGIN_LEFT, MARGIN_TOP);

    let limit = color_limit(matrix, mask);
    let annot_size = (cell / 3).clamp(8, 18);

    for i in 0..matrix.len() {
        for j in 0..matrix.len() {
            if mask.is_masked(i, j) {
                continue;
            }
            let value = matrix.get(i, j);
            if value.is_nan() {
                continue;
            }

            let x0 = left + j as i32 * cell;
            let y0 = top + i as i32 * cell;
            let fill = diverging(value / limit);

            root.draw(&Rectangle::new([(x0, y0), (x0 + cell, y0 + cell)], fill.filled()))?;
            root.draw(&Rectangle::new(
                [(x0, y0), (x0 + cell, y0 + cell)],
                WHITE.stroke_width(1),
            ))?;

            let annot_style = (FONT, annot_size)
                .into_font()
                .color(&text_color(fill))
                .pos(Pos::new(HPos::Center, VPos::Center));
            root.draw(&Text::new(
                format!("{:.1}", value),
                (x0 + cell / 2, y0 + cell / 2),
                annot_style,
            ))?;
        }
    }

    let label_size = (cell / 4).clamp(10, 16);
    let row_style = (FONT, label_size)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));
    let col_style = (FONT, label_size)
        .into_font()
        .transform(FontTransform::Rotate90)
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));

    for (k, name) in matrix.columns.iter().enumerate() {
        let centre = k as i32 * cell + cell / 2;
        root.draw(&Text::new(name.clone(), (left - 8, top + centre), row_style.clone()))?;
        root.draw(&Text::new(name.clone(), (left + centre, top + side + 8), col_style.clone()))?;
    }

    draw_colorbar(&root, left + side + COLORBAR_GAP, top, side, limit)?;

    root.present()?;
    Ok(())
}

/// Vertical colour bar, `COLORBAR_SHRINK` of the matrix height, centred on it
fn draw_colorbar(
    root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    x: i32,
    top: i32,
    side: i32,
    limit: f64,
) -> Result<()> {
    let bar_height = (side as f64 * COLORBAR_SHRINK).round() as i32;
    let y0 = top + (side - bar_height) / 2;

    for dy in 0..bar_height {
        let t = 1.0 - 2.0 * dy as f64 / (bar_height - 1).max(1) as f64;
        root.draw(&Rectangle::new(
            [(x, y0 + dy), (x + COLORBAR_WIDTH, y0 + dy + 1)],
            diverging(t).filled(),
        ))?;
    }
    root.draw(&Rectangle::new(
        [(x, y0), (x + COLORBAR_WIDTH, y0 + bar_height)],
        BLACK.stroke_width(1),
    ))?;

    let tick_style = (FONT, 14)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    for t in [1.0, 0.5, 0.0, -0.5, -1.0] {
        let ty = y0 + ((1.0 - t) / 2.0 * (bar_height - 1) as f64).round() as i32;
        root.draw(&PathElement::new(
            vec![(x + COLORBAR_WIDTH, ty), (x + COLORBAR_WIDTH + 5, ty)],
            BLACK,
        ))?;
        root.draw(&Text::new(
            format!("{:.1}", t * limit),
            (x + COLORBAR_WIDTH + 8, ty),
            tick_style.clone(),
        ))?;
    }

    Ok(())
}
