use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::model::Spectrogram;

/// Write a spectrogram in the same layout [`super::loader::load_spectrogram`]
/// reads: a `# {bins_text}` comment line, then `frequency,p1,...,pN` rows.
///
/// Values use the shortest exponent notation that parses back to the same
/// `f64`. An existing file at `path` is overwritten.
pub fn write_spectrogram(path: &Path, spectrogram: &Spectrogram) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    writeln!(out, "# {}", spectrogram.bins_text)
        .with_context(|| format!("writing header to {}", path.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);

    let power = &spectrogram.power;
    let mut record = Vec::with_capacity(power.cols() + 1);
    for (row, frequency) in spectrogram.frequencies.iter().enumerate() {
        record.clear();
        record.push(format!("{frequency:e}"));
        record.extend(power.row(row).iter().map(|v| format!("{v:e}")));
        writer
            .write_record(&record)
            .with_context(|| format!("writing row {row} to {}", path.display()))?;
    }

    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}
