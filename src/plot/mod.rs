//! Figure rendering for analyzer results.
//!
//! Thin adapters from result structs to plotters charts. Rendering goes to
//! PNG files; failures surface as [`AnalyzerError::Plot`].

use crate::autocorrelation::AcfResult;
use crate::decompose::DecompositionResult;
use crate::error::{AnalyzerError, Result};
use crate::spectral::{PeriodogramResult, SpectrumResult};
use crate::wavelet::WaveletResult;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use std::path::Path;

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for AnalyzerError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        AnalyzerError::Plot(err.to_string())
    }
}

/// Value range with 5% padding; degenerate ranges are widened by one unit.
fn padded_range(values: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if max - min < 1e-12 {
        return (min - 1.0, max + 1.0);
    }
    let pad = 0.05 * (max - min);
    (min - pad, max + pad)
}

/// Line panel shared by the series and component charts.
fn line_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    title: &str,
    values: &[f64],
    color: &RGBColor,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (y_min, y_max) = padded_range(values);
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 18))
        .margin(5)
        .x_label_area_size(25)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..values.len() as f64, y_min..y_max)?;
    chart.configure_mesh().draw()?;
    chart.draw_series(LineSeries::new(
        values.iter().enumerate().map(|(i, &v)| (i as f64, v)),
        color,
    ))?;
    Ok(())
}

/// Raw series plus one-sided amplitude spectrum with the peak marked.
pub(crate) fn spectrum(path: &Path, samples: &[f64], result: &SpectrumResult) -> Result<()> {
    let root = BitMapBackend::new(path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 1));

    line_panel(&panels[0], "series", samples, &BLUE)?;

    let (y_min, y_max) = padded_range(&result.magnitudes);
    let x_max = *result.frequencies.last().unwrap_or(&1.0);
    let mut chart = ChartBuilder::on(&panels[1])
        .caption("amplitude spectrum", ("sans-serif", 18))
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..x_max, y_min.min(0.0)..y_max)?;
    chart
        .configure_mesh()
        .x_desc("frequency")
        .y_desc("magnitude")
        .draw()?;
    chart.draw_series(LineSeries::new(result.bins(), &BLUE))?;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(result.peak_frequency, y_min.min(0.0)), (result.peak_frequency, y_max)],
        RED.stroke_width(1),
    )))?;

    root.present()?;
    Ok(())
}

/// Four aligned panels: observed, trend, seasonal, residual.
pub(crate) fn decomposition(
    path: &Path,
    observed: &[f64],
    result: &DecompositionResult,
) -> Result<()> {
    let root = BitMapBackend::new(path, (900, 900)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((4, 1));

    line_panel(&panels[0], "observed", observed, &BLACK)?;
    line_panel(&panels[1], "trend", &result.trend, &BLUE)?;
    line_panel(&panels[2], "seasonal", &result.seasonal, &GREEN)?;
    line_panel(&panels[3], "residual", &result.residual, &RED)?;

    root.present()?;
    Ok(())
}

/// Stem plot of the ACF with significance bounds and the peak lag marked.
pub(crate) fn acf(path: &Path, result: &AcfResult) -> Result<()> {
    let root = BitMapBackend::new(path, (900, 450)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_lag = result.max_lag() as f64;
    let mut chart = ChartBuilder::on(&root)
        .caption("autocorrelation", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..max_lag + 0.5, -1.1f64..1.1f64)?;
    chart
        .configure_mesh()
        .x_desc("lag")
        .y_desc("correlation")
        .draw()?;

    // Stems with markers.
    chart.draw_series(
        result
            .values()
            .map(|(k, r)| PathElement::new(vec![(k as f64, 0.0), (k as f64, r)], BLUE.stroke_width(2))),
    )?;
    chart.draw_series(
        result
            .values()
            .map(|(k, r)| Circle::new((k as f64, r), 3, BLUE.filled())),
    )?;

    // White-noise significance bounds.
    for bound in [result.significance_bound, -result.significance_bound] {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(-0.5, bound), (max_lag + 0.5, bound)],
            BLACK.stroke_width(1),
        )))?;
    }

    // Peak lag marker.
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(result.peak_lag as f64, -1.1), (result.peak_lag as f64, 1.1)],
        RED.stroke_width(1),
    )))?;

    root.present()?;
    Ok(())
}

/// Lomb-Scargle power against frequency with the peak marked.
pub(crate) fn periodogram(path: &Path, result: &PeriodogramResult) -> Result<()> {
    let root = BitMapBackend::new(path, (900, 450)).into_drawing_area();
    root.fill(&WHITE)?;

    let (y_min, y_max) = padded_range(&result.power);
    let x_min = *result.frequencies.first().unwrap_or(&0.0);
    let x_max = *result.frequencies.last().unwrap_or(&1.0);
    let mut chart = ChartBuilder::on(&root)
        .caption("Lomb-Scargle periodogram", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min.min(0.0)..y_max)?;
    chart
        .configure_mesh()
        .x_desc("frequency")
        .y_desc("power")
        .draw()?;
    chart.draw_series(LineSeries::new(result.bins(), &BLUE))?;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(result.peak_frequency, y_min.min(0.0)), (result.peak_frequency, y_max)],
        RED.stroke_width(1),
    )))?;

    root.present()?;
    Ok(())
}

/// Bar chart of detail energy per level, dominant level highlighted.
pub(crate) fn wavelet_energy(path: &Path, result: &WaveletResult) -> Result<()> {
    let root = BitMapBackend::new(path, (900, 450)).into_drawing_area();
    root.fill(&WHITE)?;

    let levels = result.levels();
    let (_, y_max) = padded_range(&result.level_energy);
    let mut chart = ChartBuilder::on(&root)
        .caption("wavelet detail energy", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(0.5f64..levels as f64 + 0.5, 0f64..y_max)?;
    chart
        .configure_mesh()
        .x_desc("level")
        .y_desc("energy")
        .draw()?;

    chart.draw_series(result.level_energy.iter().enumerate().map(|(i, &e)| {
        let level = i + 1;
        let color = if level == result.dominant_level {
            RED.filled()
        } else {
            BLUE.filled()
        };
        Rectangle::new(
            [(level as f64 - 0.3, 0.0), (level as f64 + 0.3, e)],
            color,
        )
    }))?;

    root.present()?;
    Ok(())
}
