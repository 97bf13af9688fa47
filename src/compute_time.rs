//! Cumulative solver compute time against simulation time, read from the
//! log files of one case.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::data::logfile::{LogLineParser, StepTiming, LOG_FILE_MARKER};
use crate::plot::{LinePlot, Renderer};

/// Sub-folder of a case folder that receives the plot by default.
pub const IMAGE_DIR: &str = "Images";

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Timesteps ordered by simulation time with the running total of compute
/// time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputeTimeSeries {
    pub simulation_time: Vec<f64>,
    pub cumulative_seconds: Vec<f64>,
}

impl ComputeTimeSeries {
    /// Sort `steps` by simulation time (stable for equal times) and
    /// accumulate their compute time.
    pub fn from_steps(mut steps: Vec<StepTiming>) -> Self {
        steps.sort_by(|a, b| a.simulation_time.total_cmp(&b.simulation_time));

        let mut total = 0.0;
        let (simulation_time, cumulative_seconds): (Vec<f64>, Vec<f64>) = steps
            .iter()
            .map(|step| {
                total += step.compute_time;
                (step.simulation_time, total)
            })
            .unzip();
        ComputeTimeSeries {
            simulation_time,
            cumulative_seconds,
        }
    }

    pub fn cumulative_hours(&self) -> Vec<f64> {
        self.cumulative_seconds
            .iter()
            .map(|s| s / SECONDS_PER_HOUR)
            .collect()
    }

    pub fn total_hours(&self) -> f64 {
        self.cumulative_seconds.last().copied().unwrap_or(0.0) / SECONDS_PER_HOUR
    }

    pub fn is_empty(&self) -> bool {
        self.simulation_time.is_empty()
    }
}

/// Last component of the case path, `"case"` if it has none.
pub fn case_name(case: &Path) -> String {
    let lossy = |name: &std::ffi::OsStr| name.to_string_lossy().into_owned();
    case.file_name()
        .map(lossy)
        .or_else(|| case.canonicalize().ok()?.file_name().map(lossy))
        .unwrap_or_else(|| "case".to_string())
}

/// Regular files directly inside `case` whose name contains `logfile`,
/// sorted by name.
pub fn find_log_files(case: &Path) -> Result<Vec<PathBuf>> {
    let mut logs = Vec::new();
    for entry in fs::read_dir(case).with_context(|| format!("listing {}", case.display()))? {
        let entry = entry.with_context(|| format!("listing {}", case.display()))?;
        let path = entry.path();
        let is_log = entry.file_name().to_string_lossy().contains(LOG_FILE_MARKER);
        if is_log && path.is_file() {
            logs.push(path);
        }
    }
    logs.sort();
    Ok(logs)
}

/// Read every timestep from the log files of `case`.
pub fn collect_steps(logs: &[PathBuf]) -> Result<Vec<StepTiming>> {
    let parser = LogLineParser::new().context("building log line pattern")?;
    let mut steps = Vec::new();
    for log in logs {
        let bytes = fs::read(log).with_context(|| format!("reading {}", log.display()))?;
        let text = String::from_utf8_lossy(&bytes);
        steps.extend(parser.parse_log(&log.display().to_string(), &text));
    }
    Ok(steps)
}

/// Plot cumulative compute time for `case` and return the image path.
///
/// With no log files the plot is still written, just empty.
pub fn plot_compute_time(
    case: &Path,
    output_dir: Option<&Path>,
    renderer: &mut dyn Renderer,
) -> Result<PathBuf> {
    let name = case_name(case);
    let logs = find_log_files(case)?;
    info!("Found {} output log files", logs.len());
    if logs.is_empty() {
        warn!(
            "Found no output files - ensure the word '{LOG_FILE_MARKER}' is in the output \
             text file name"
        );
    }

    let series = ComputeTimeSeries::from_steps(collect_steps(&logs)?);
    if series.is_empty() {
        warn!("No timestep lines found; the plot will be empty");
    } else {
        info!(
            "{} timesteps, {:.3} hours of compute time in total",
            series.simulation_time.len(),
            series.total_hours()
        );
    }

    let image_dir = output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| case.join(IMAGE_DIR));
    fs::create_dir_all(&image_dir)
        .with_context(|| format!("creating {}", image_dir.display()))?;
    let output = image_dir.join(format!("compute_time_{name}.png"));

    let points: Vec<(f64, f64)> = series
        .simulation_time
        .iter()
        .copied()
        .zip(series.cumulative_hours())
        .collect();
    let title = format!("Compute Time - {name}");
    let plot = LinePlot {
        points: &points,
        label: &name,
        title: &title,
        x_label: "Simulation Time (s)",
        y_label: "Compute Time (Hrs)",
    };
    renderer.line(&plot, &output)?;

    info!("Compute time plot saved at: {}", output.display());
    Ok(output)
}
