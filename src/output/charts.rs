// SVG bar charts of label frequencies.
//
// The category distribution is drawn with vertical bars, label distributions
// (subcategories, themes, datasets, regions) with horizontal bars so long
// keyword labels stay readable. SVG output needs no system fonts.

use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;

/// One bar: label and document count.
pub type Bar = (String, u32);

const CATEGORY_COLOR: RGBColor = RGBColor(135, 206, 235);
const LABEL_COLOR: RGBColor = RGBColor(144, 238, 144);

fn chart_error<E: std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow::anyhow!("Failed to draw chart: {e}")
}

fn prepare(path: &Path, bars: &[Bar]) -> Result<()> {
    if bars.is_empty() {
        anyhow::bail!("Nothing to chart for {}", path.display());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

fn axis_label(bars: &[Bar], value: &SegmentValue<u32>) -> String {
    match value {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => bars
            .get(*i as usize)
            .map(|(label, _)| label.clone())
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

fn value_range(bars: &[Bar]) -> u32 {
    bars.iter().map(|(_, count)| *count).max().unwrap_or(0) + 1
}

/// Vertical bar chart, one bar per category in the given order.
pub fn category_chart(path: &Path, title: &str, x_desc: &str, bars: &[Bar]) -> Result<()> {
    prepare(path, bars)?;
    let root = SVGBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..bars.len() as u32).into_segmented(), 0u32..value_range(bars))
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc("Number of Papers")
        .x_labels(bars.len())
        .x_label_formatter(&|v| axis_label(bars, v))
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(CATEGORY_COLOR.filled())
                .margin(10)
                .data(bars.iter().enumerate().map(|(i, (_, count))| (i as u32, *count))),
        )
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    Ok(())
}

/// Horizontal bar chart, first label at the top.
pub fn label_chart(path: &Path, title: &str, y_desc: &str, bars: &[Bar]) -> Result<()> {
    prepare(path, bars)?;
    let height = (120 + 28 * bars.len()).max(400) as u32;
    let root = SVGBackend::new(path, (1200, height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    // Segments count up from the bottom; reverse so list order reads top-down.
    let reversed: Vec<Bar> = bars.iter().rev().cloned().collect();

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(320)
        .build_cartesian_2d(0u32..value_range(bars), (0u32..bars.len() as u32).into_segmented())
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc("Frequency")
        .y_desc(y_desc)
        .y_labels(bars.len())
        .y_label_formatter(&|v| axis_label(&reversed, v))
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(
            Histogram::horizontal(&chart)
                .style(LABEL_COLOR.filled())
                .margin(4)
                .data(reversed.iter().enumerate().map(|(i, (_, count))| (i as u32, *count))),
        )
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    Ok(())
}
