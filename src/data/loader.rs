use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};

use super::model::{PowerMatrix, Spectrogram};
use crate::error::CombineError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load one component spectrogram CSV.
///
/// Layout:
///
/// ```text
/// # 0.05,0.15,0.25          <- bin header (comment line)
/// 0.0,-31.2,-30.8,-29.9     <- frequency, power per bin
/// 12.5,-28.4,-27.0,-26.1
/// ```
pub fn load_spectrogram(path: &Path) -> Result<Spectrogram> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading spectrogram {}", path.display()))?;
    let spectrogram = parse_spectrogram(path, &text)?;
    debug!(
        "{}: {} frequencies x {} bins",
        path.display(),
        spectrogram.power.rows(),
        spectrogram.power.cols()
    );
    Ok(spectrogram)
}

/// Parse the text of a spectrogram file. `path` is only used in errors.
pub fn parse_spectrogram(path: &Path, text: &str) -> Result<Spectrogram, CombineError> {
    let (header, body) = text.split_once('\n').unwrap_or((text, ""));
    let (bins_text, bins) = parse_bin_header(path, header)?;
    let (frequencies, power) = parse_matrix(path, body)?;

    if bins.len() != power.cols() {
        warn!(
            "{}: header has {} bin values but rows carry {} power columns",
            path.display(),
            bins.len(),
            power.cols()
        );
    }

    Ok(Spectrogram {
        bins_text,
        bins,
        frequencies,
        power,
    })
}

// ---------------------------------------------------------------------------
// Bin header
// ---------------------------------------------------------------------------

/// Strip the comment marker and all whitespace from the header line, then
/// parse it as comma-separated floats. Returns the stripped text alongside
/// the values so it can be written back unchanged.
pub fn parse_bin_header(path: &Path, line: &str) -> Result<(String, Vec<f64>), CombineError> {
    if !line.trim_start().starts_with('#') {
        return Err(CombineError::header(path, "first line is not a '#' comment"));
    }

    let bins_text: String = line
        .chars()
        .filter(|c| *c != '#' && !c.is_whitespace())
        .collect();
    if bins_text.is_empty() {
        return Err(CombineError::header(path, "no bin values"));
    }

    let bins = bins_text
        .split(',')
        .map(|tok| {
            tok.parse::<f64>()
                .map_err(|_| CombineError::header(path, format!("'{tok}' is not a number")))
        })
        .collect::<Result<Vec<f64>, _>>()?;

    Ok((bins_text, bins))
}

// ---------------------------------------------------------------------------
// Numeric body
// ---------------------------------------------------------------------------

fn parse_matrix(path: &Path, body: &str) -> Result<(Vec<f64>, PowerMatrix), CombineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut frequencies = Vec::new();
    let mut power: Option<PowerMatrix> = None;
    let mut row = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|source| CombineError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        // Whitespace-only lines come through as a single empty field.
        if record.len() == 1 && record.get(0).is_some_and(str::is_empty) {
            continue;
        }
        // +1 for the header line consumed before the reader.
        let line = record.position().map_or(0, |p| p.line()) + 1;

        let matrix =
            power.get_or_insert_with(|| PowerMatrix::zeros(0, record.len().saturating_sub(1)));
        let expected = matrix.cols() + 1;
        if record.len() != expected || expected < 2 {
            return Err(CombineError::MalformedRow {
                path: path.to_path_buf(),
                line,
                expected: expected.max(2),
                found: record.len(),
            });
        }

        row.clear();
        for (column, token) in record.iter().enumerate() {
            let value = token.parse::<f64>().map_err(|_| CombineError::InvalidValue {
                path: path.to_path_buf(),
                line,
                column,
                token: token.to_string(),
            })?;
            row.push(value);
        }
        frequencies.push(row[0]);
        matrix.push_row(&row[1..]);
    }

    match power {
        Some(power) => Ok((frequencies, power)),
        None => Err(CombineError::EmptyData {
            path: path.to_path_buf(),
        }),
    }
}
