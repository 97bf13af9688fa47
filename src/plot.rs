//! PNG rendering of spectrograms and line charts.
//!
//! Callers hand an explicit [`Renderer`] to the code that produces images,
//! so nothing here keeps a "current figure" between calls. The default
//! [`PngRenderer`] draws with [`plotters`] into an in-memory RGB buffer and
//! encodes it with [`image`].

use std::ops::Range;
use std::path::{Path, PathBuf};

use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

use crate::color::ColorMap;
use crate::data::model::PowerMatrix;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Pixel buffer does not hold a {width}x{height} image")]
    Buffer { width: u32, height: u32 },

    #[error("Failed to save plot to {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

type Result<T> = core::result::Result<T, PlotError>;

// ---------------------------------------------------------------------------
// Plot descriptions
// ---------------------------------------------------------------------------

/// Everything needed to draw one spectrogram heatmap.
#[derive(Debug, Clone, Copy)]
pub struct SpectrogramPlot<'a> {
    /// Time-bin values (cell centres, or cell edges if one longer than the
    /// column count).
    pub bins: &'a [f64],
    pub frequencies: &'a [f64],
    pub power: &'a PowerMatrix,
    /// Upper frequency shown; the data maximum when `None`.
    pub ylim: Option<f64>,
    /// Power values mapped onto the low and high end of the colour map.
    pub color_range: (f64, f64),
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
}

/// A single labelled line series.
#[derive(Debug, Clone, Copy)]
pub struct LinePlot<'a> {
    pub points: &'a [(f64, f64)],
    pub label: &'a str,
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
}

/// Drawing context passed to the code that writes images.
pub trait Renderer {
    fn spectrogram(&mut self, plot: &SpectrogramPlot<'_>, output: &Path) -> Result<()>;
    fn line(&mut self, plot: &LinePlot<'_>, output: &Path) -> Result<()>;
}

// ---------------------------------------------------------------------------
// PNG renderer
// ---------------------------------------------------------------------------

/// Image size and colours used by [`PngRenderer`].
#[derive(Debug, Clone)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    /// Width reserved on the right of a spectrogram for its colour bar.
    pub colorbar_width: u32,
    pub colormap: ColorMap,
}

impl Default for PlotStyle {
    /// 7.5 x 5 inches at 100 dpi.
    fn default() -> Self {
        PlotStyle {
            width: 750,
            height: 500,
            colorbar_width: 100,
            colormap: ColorMap::viridis(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PngRenderer {
    style: PlotStyle,
}

impl PngRenderer {
    pub fn new(style: PlotStyle) -> Self {
        PngRenderer { style }
    }

    fn render_png<F>(&self, output: &Path, draw: F) -> Result<()>
    where
        F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()>,
    {
        let (width, height) = (self.style.width, self.style.height);
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE)
                .map_err(|e| PlotError::DrawingArea(e.to_string()))?;
            draw(&root)?;
            root.present()
                .map_err(|e| PlotError::Drawing(e.to_string()))?;
        }

        let image = image::RgbImage::from_raw(width, height, buffer)
            .ok_or(PlotError::Buffer { width, height })?;
        image
            .save_with_format(output, image::ImageFormat::Png)
            .map_err(|source| PlotError::Encode {
                path: output.to_path_buf(),
                source,
            })?;
        debug!("wrote {width}x{height} image to {}", output.display());
        Ok(())
    }
}

impl Renderer for PngRenderer {
    fn spectrogram(&mut self, plot: &SpectrogramPlot<'_>, output: &Path) -> Result<()> {
        let style = &self.style;
        self.render_png(output, |root| draw_spectrogram(root, plot, style))
    }

    fn line(&mut self, plot: &LinePlot<'_>, output: &Path) -> Result<()> {
        self.render_png(output, |root| draw_line(root, plot))
    }
}

// ---------------------------------------------------------------------------
// Spectrogram heatmap
// ---------------------------------------------------------------------------

fn draw_spectrogram(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    plot: &SpectrogramPlot<'_>,
    style: &PlotStyle,
) -> Result<()> {
    let (width, _) = root.dim_in_pixel();
    let (main, bar) = root.split_horizontally(width.saturating_sub(style.colorbar_width));

    let power = plot.power;
    let colormap = &style.colormap;
    let x_edges = cell_edges(plot.bins, power.cols());
    let y_edges = cell_edges(plot.frequencies, power.rows());

    let x_range = value_range(x_edges.iter().copied());
    let mut y_range = value_range(y_edges.iter().copied());
    if let Some(ylim) = plot.ylim.filter(|y| *y > y_range.start) {
        y_range.end = ylim;
    }

    let mut chart = ChartBuilder::on(&main)
        .caption(plot.title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(65)
        .build_cartesian_2d(x_range, y_range.clone())
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(plot.x_label)
        .y_desc(plot.y_label)
        .label_style(("sans-serif", 14))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    // Cells are clipped to the visible frequency band; NaN cells stay blank.
    let (lo, hi) = (y_range.start, y_range.end);
    let cells = (0..power.rows())
        .flat_map(|row| (0..power.cols()).map(move |col| (row, col)))
        .filter_map(|(row, col)| {
            let value = power.get(row, col);
            let y0 = y_edges[row].clamp(lo, hi);
            let y1 = y_edges[row + 1].clamp(lo, hi);
            if value.is_nan() || y0 == y1 {
                return None;
            }
            Some(Rectangle::new(
                [(x_edges[col], y0), (x_edges[col + 1], y1)],
                colormap.color_for(value, plot.color_range).filled(),
            ))
        });
    chart
        .draw_series(cells)
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    draw_colorbar(&bar, plot.color_range, colormap)
}

fn draw_colorbar(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    color_range: (f64, f64),
    colormap: &ColorMap,
) -> Result<()> {
    const STEPS: usize = 64;

    let (lo, mut hi) = color_range;
    if hi.is_nan() || hi <= lo {
        hi = lo + 1.0;
    }

    let mut chart = ChartBuilder::on(area)
        .margin_top(40)
        .margin_bottom(55)
        .margin_right(10)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..1f64, lo..hi)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(6)
        .label_style(("sans-serif", 12))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let step = (hi - lo) / STEPS as f64;
    chart
        .draw_series((0..STEPS).map(|i| {
            let v0 = lo + step * i as f64;
            Rectangle::new(
                [(0.0, v0), (1.0, v0 + step)],
                colormap.color_for(v0 + step / 2.0, (lo, hi)).filled(),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

/// Boundaries of `cells` consecutive cells.
///
/// `values` are taken as edges when there is one more of them than cells,
/// and as cell centres when the counts match. Anything else (or non-finite
/// values) falls back to unit cells `0..cells`.
fn cell_edges(values: &[f64], cells: usize) -> Vec<f64> {
    let by_index = || (0..=cells).map(|i| i as f64).collect::<Vec<_>>();
    if cells == 0 || !values.iter().all(|v| v.is_finite()) {
        return by_index();
    }
    if values.len() == cells + 1 {
        return values.to_vec();
    }
    if values.len() != cells {
        return by_index();
    }
    if cells == 1 {
        return vec![values[0] - 0.5, values[0] + 0.5];
    }

    let first = values[0] - (values[1] - values[0]) / 2.0;
    let last = values[cells - 1] + (values[cells - 1] - values[cells - 2]) / 2.0;
    let mut edges = Vec::with_capacity(cells + 1);
    edges.push(first);
    edges.extend(values.windows(2).map(|w| (w[0] + w[1]) / 2.0));
    edges.push(last);
    edges
}

/// Smallest range covering the finite `values`; never empty.
fn value_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        0.0..1.0
    } else if min == max {
        (min - 0.5)..(max + 0.5)
    } else {
        min..max
    }
}

// ---------------------------------------------------------------------------
// Line chart
// ---------------------------------------------------------------------------

fn draw_line(root: &DrawingArea<BitMapBackend<'_>, Shift>, plot: &LinePlot<'_>) -> Result<()> {
    let x_range = value_range(plot.points.iter().map(|p| p.0));
    let mut y_range = value_range(plot.points.iter().map(|p| p.1));
    y_range.start = y_range.start.min(0.0);

    let mut chart = ChartBuilder::on(root)
        .caption(plot.title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(plot.x_label)
        .y_desc(plot.y_label)
        .label_style(("sans-serif", 14))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(LineSeries::new(plot.points.iter().copied(), &BLUE))
        .map_err(|e| PlotError::Drawing(e.to_string()))?
        .label(plot.label)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Test double
// ---------------------------------------------------------------------------
