//! Combine the x, y and z component spectrograms of one quantity into a
//! single averaged spectrogram.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{info, warn};

use crate::data::average::average_components;
use crate::data::loader::load_spectrogram;
use crate::data::model::{Axis, Components, Spectrogram};
use crate::data::resolver::resolve_components;
use crate::data::writer::write_spectrogram;
use crate::plot::{Renderer, SpectrogramPlot};

/// Sub-folder of a case folder that holds the component spectrograms.
pub const SPECTROGRAM_DIR: &str = "Spectrograms";

/// Tolerance when comparing the frequency columns of the components.
const FREQUENCY_TOLERANCE: f64 = 1e-9;

/// Parameters of one combine run.
#[derive(Debug, Clone, PartialEq)]
pub struct CombineOptions {
    pub quantity: String,
    /// Samples per window used when the component spectrograms were made.
    pub n_samples: usize,
    pub min_color: f64,
    pub max_color: f64,
    pub ylim: Option<f64>,
}

/// Files written by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedOutput {
    pub png: PathBuf,
    pub csv: PathBuf,
}

/// Folder searched for component files: `{folder}/Spectrograms` when it
/// exists, otherwise `folder` itself.
pub fn spectrogram_search_root(folder: &Path) -> PathBuf {
    let nested = folder.join(SPECTROGRAM_DIR);
    if nested.is_dir() {
        nested
    } else {
        folder.to_path_buf()
    }
}

/// Output paths next to the x-component file, with `_x_` replaced by
/// `_combined_` in its name.
pub fn combined_output_paths(x_file: &Path) -> CombinedOutput {
    let name = x_file
        .file_name()
        .map(|n| n.to_string_lossy().replace("_x_", "_combined_"))
        .unwrap_or_else(|| "combined_spectrogram.csv".to_string());
    let stem = x_file.with_file_name(name);
    CombinedOutput {
        png: stem.with_extension("png"),
        csv: stem.with_extension("csv"),
    }
}

/// Average already-loaded component spectrograms. The x component supplies
/// the bin header and frequency axis.
pub fn combine_components(components: Components<Spectrogram>) -> Result<Spectrogram> {
    let power = average_components(components.as_ref().map(|_, s| &s.power))?;

    for (axis, spectrogram) in components.iter().filter(|(axis, _)| *axis != Axis::X) {
        if !same_frequencies(&components.x.frequencies, &spectrogram.frequencies) {
            warn!("frequency column of the {axis} component differs from x; using x");
        }
        if spectrogram.bins_text != components.x.bins_text {
            warn!("bin header of the {axis} component differs from x; using x");
        }
    }

    let Components { x, .. } = components;
    Ok(Spectrogram {
        bins_text: x.bins_text,
        bins: x.bins,
        frequencies: x.frequencies,
        power,
    })
}

fn same_frequencies(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(p, q)| {
            (p - q).abs() <= FREQUENCY_TOLERANCE * p.abs().max(q.abs()).max(1.0)
                || (p.is_nan() && q.is_nan())
        })
}

/// Find, validate, average and write the combined spectrogram for
/// `options.quantity` below `folder`.
///
/// Every check (one file per component, well-formed files, equal shapes)
/// runs before anything is written, so a failed run leaves no output.
pub fn combine_spectrograms(
    folder: &Path,
    options: &CombineOptions,
    renderer: &mut dyn Renderer,
) -> Result<CombinedOutput> {
    let (min, max) = (options.min_color, options.max_color);
    if min.is_nan() || max.is_nan() || min >= max {
        bail!(
            "color range is empty: min {} must be below max {}",
            options.min_color,
            options.max_color
        );
    }

    let root = spectrogram_search_root(folder);
    info!(
        "--- Combining '{}' spectrograms in {} (n_samples = {})",
        options.quantity,
        root.display(),
        options.n_samples
    );

    let files = resolve_components(&root, &options.quantity)?;
    info!("--- Found CSV files for X, Y, and Z components.");

    let output = combined_output_paths(&files.x);

    info!("--- Loading CSV files...");
    let components = files.try_map(|axis, path| {
        load_spectrogram(&path).with_context(|| format!("loading {axis} component"))
    })?;

    info!("--- Averaging components...");
    let combined = combine_components(components)?;

    info!("--- Plotting and saving the spectrogram...");
    let title = format!("threshold Pxx = {}", options.min_color);
    let plot = SpectrogramPlot {
        bins: &combined.bins,
        frequencies: &combined.frequencies,
        power: &combined.power,
        ylim: options.ylim,
        color_range: (options.min_color, options.max_color),
        title: &title,
        x_label: "Time (s)",
        y_label: "Frequency (Hz)",
    };
    renderer.spectrogram(&plot, &output.png)?;
    write_spectrogram(&output.csv, &combined)?;

    info!("--- Spectrogram saved at: {}", output.png.display());
    info!("--- Data CSV saved at: {}", output.csv.display());
    Ok(output)
}
