/// Data layer: spectrogram tables, component discovery, averaging and
/// solver log parsing.
///
/// Architecture:
/// ```text
///  {q}_x_*spectrogram.csv  {q}_y_…  {q}_z_…
///        │
///        ▼
///   ┌──────────┐
///   │ resolver │  exactly one file per axis → Components<PathBuf>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  bin header + frequency column + PowerMatrix
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ average  │  shape check → element-wise mean
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer  │  {q}_combined_*spectrogram.csv
///   └──────────┘
///
///  *logfile*  ──▶  logfile  ──▶  StepTiming samples
/// ```

pub mod average;
pub mod loader;
pub mod logfile;
pub mod model;
pub mod resolver;
pub mod writer;
