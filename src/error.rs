use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::data::model::Axis;

/// Validation failures of the spectrogram combiner. Each one stops the run
/// before any output is written.
#[derive(Error, Debug)]
pub enum CombineError {
    #[error("quantity name must not be empty")]
    InvalidQuery,

    #[error("spectrogram folder {} does not exist or is not a directory", .0.display())]
    SearchRoot(PathBuf),

    #[error(
        "missing CSV files for component(s) {} in {}",
        join_axes(.axes),
        .dir.display()
    )]
    MissingComponents { axes: Vec<Axis>, dir: PathBuf },

    #[error(
        "multiple CSV files found for component(s) {}; ensure there is only one CSV file per component",
        describe_ambiguous(.matches)
    )]
    AmbiguousComponents { matches: Vec<(Axis, Vec<PathBuf>)> },

    #[error("{}: malformed bin header: {reason}", .path.display())]
    MalformedHeader { path: PathBuf, reason: String },

    #[error("{}: line {line}: expected {expected} columns, found {found}", .path.display())]
    MalformedRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{}: line {line}, column {column}: '{token}' is not a number", .path.display())]
    InvalidValue {
        path: PathBuf,
        line: u64,
        column: usize,
        token: String,
    },

    #[error("{}: no data rows after the bin header", .path.display())]
    EmptyData { path: PathBuf },

    #[error("{}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("component shapes differ: {}", describe_shapes(.shapes))]
    ShapeMismatch {
        shapes: Vec<(Axis, (usize, usize))>,
    },
}

fn join_axes(axes: &[Axis]) -> String {
    axes.iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_ambiguous(matches: &[(Axis, Vec<PathBuf>)]) -> String {
    matches
        .iter()
        .map(|(axis, paths)| format!("{axis} ({})", join_paths(paths)))
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_shapes(shapes: &[(Axis, (usize, usize))]) -> String {
    shapes
        .iter()
        .map(|(axis, (rows, cols))| format!("{axis} is {rows}x{cols}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl CombineError {
    pub(crate) fn header(path: &Path, reason: impl Into<String>) -> Self {
        CombineError::MalformedHeader {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
