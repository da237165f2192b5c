//! Histogram of amplitude dilution values, rendered with [`plotters`] to a PNG.

use crate::analysis::statistics::{histogram, Bin};
use crate::analysis::summary::DilutionSummary;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

const WIDTH: u32 = 1200;
const CHART_HEIGHT: u32 = 800;
const LINE_HEIGHT: i32 = 30;
const IDS_PER_LINE: usize = 8;

const BAR_FILL: RGBColor = RGBColor(0x7b, 0xcc, 0xc4);
const BAR_EDGE: RGBColor = RGBColor(0x43, 0xa2, 0xca);

/// Lower end of the count axis. Bars start here since a log axis has no zero.
const COUNT_FLOOR: f64 = 0.5;

/// Title text: the rounded median, then the identifiers at or above the
/// threshold, wrapped a few per line.
pub fn title_lines(summary: &DilutionSummary) -> Vec<String> {
    let median = match summary.median_percent {
        Some(m) => format!("{:.2}%", m),
        None => "n/a".to_string(),
    };

    let mut lines = vec![
        format!("Median Amplitude Dilution = {}.", median),
        format!(
            "The Following KIC IDs have Amplitude Dilution >= {}%:",
            summary.threshold_percent
        ),
    ];

    if summary.high_dilution_kics.is_empty() {
        lines.push("(none)".to_string());
    } else {
        lines.extend(
            summary
                .high_dilution_kics
                .chunks(IDS_PER_LINE)
                .map(|ids| ids.join(", ")),
        );
    }

    lines
}

/// Draw the dilution histogram: `n_bins` equal-width bins, logarithmic count
/// axis, median marked with a vertical line.
pub fn render_histogram(
    values: &[f64],
    summary: &DilutionSummary,
    n_bins: usize,
    output_path: &Path,
) -> Result<()> {
    let bins = histogram(values, n_bins);
    if bins.is_empty() {
        return Err(PlotError::InvalidData(
            "no dilution values to plot".to_string(),
        ));
    }

    let lines = title_lines(summary);
    let header_height = 20 + LINE_HEIGHT * lines.len() as i32;

    let root = BitMapBackend::new(output_path, (WIDTH, CHART_HEIGHT + header_height as u32))
        .into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let (header, body) = root.split_vertically(header_height);

    let font = ("sans-serif", 24).into_font();
    for (i, line) in lines.iter().enumerate() {
        header
            .draw(&Text::new(
                line.clone(),
                (20, 10 + LINE_HEIGHT * i as i32),
                font.clone(),
            ))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    draw_bins(&body, &bins, summary.median_percent)?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

fn draw_bins(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    bins: &[Bin],
    median: Option<f64>,
) -> Result<()> {
    let x_min = bins[0].lower;
    let x_max = bins[bins.len() - 1].upper;
    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(1) as f64;
    let y_max = (max_count * 2.0).max(2.0);

    let mut chart = ChartBuilder::on(area)
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(x_min..x_max, (COUNT_FLOOR..y_max).log_scale())
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("Amplitude Dilution [%]")
        .y_desc("N")
        .y_label_formatter(&|y| format!("{:.0}", y))
        .label_style(("sans-serif", 22))
        .axis_desc_style(("sans-serif", 26))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let filled = bins.iter().filter(|b| b.count > 0);

    chart
        .draw_series(filled.clone().map(|b| {
            Rectangle::new(
                [(b.lower, COUNT_FLOOR), (b.upper, b.count as f64)],
                BAR_FILL.filled(),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(filled.map(|b| {
            Rectangle::new(
                [(b.lower, COUNT_FLOOR), (b.upper, b.count as f64)],
                BAR_EDGE.stroke_width(1),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    if let Some(m) = median {
        chart
            .draw_series(LineSeries::new(
                vec![(m, COUNT_FLOOR), (m, y_max)],
                RED.stroke_width(2),
            ))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(kics: &[&str], median: Option<f64>) -> DilutionSummary {
        DilutionSummary {
            systems: kics.len(),
            missing_flux_kics: Vec::new(),
            degenerate: Vec::new(),
            median_percent: median,
            threshold_percent: 10.0,
            high_dilution_kics: kics.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn test_title_lines_rounds_median() {
        let lines = title_lines(&summary(&[], Some(33.33333)));
        assert_eq!(lines[0], "Median Amplitude Dilution = 33.33%.");
        assert_eq!(
            lines[1],
            "The Following KIC IDs have Amplitude Dilution >= 10%:"
        );
        assert_eq!(lines[2], "(none)");
    }

    #[test]
    fn test_title_lines_wraps_ids() {
        let kics: Vec<String> = (0..10).map(|i| format!("{}", 1000 + i)).collect();
        let refs: Vec<&str> = kics.iter().map(String::as_str).collect();
        let lines = title_lines(&summary(&refs, None));
        assert_eq!(lines[0], "Median Amplitude Dilution = n/a.");
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("1000, 1001"));
        assert_eq!(lines[3], "1008, 1009");
    }

    #[test]
    fn test_render_rejects_empty_values() {
        let path = std::env::temp_dir().join("amp_dil_never_written.png");
        let result = render_histogram(&[], &summary(&[], None), 30, &path);
        assert!(matches!(result, Err(PlotError::InvalidData(_))));
    }
}
