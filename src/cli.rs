//! Command line arguments for `cfd-postproc`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use crate::combine::CombineOptions;

/// Default log verbosity (`RUST_LOG` still overrides it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "cfd-postproc")]
#[command(version)]
#[command(about = "Post-processing for CFD output: combined spectrograms and compute-time plots", long_about = None)]
pub struct Cli {
    /// Log verbosity
    #[arg(long, value_enum, default_value = "info", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Average the x, y and z spectrograms of a quantity into one PNG and CSV
    CombineSpectrograms(CombineArgs),
    /// Plot cumulative solver compute time against simulation time
    ComputeTime(ComputeTimeArgs),
}

#[derive(Args, Debug)]
pub struct CombineArgs {
    /// Case folder; its `Spectrograms` sub-folder is searched when present
    #[arg(long, value_name = "DIR")]
    pub folder: PathBuf,

    /// Quantity prefix of the component files (e.g. `p` for `p_x_*spectrogram.csv`)
    #[arg(long, value_name = "NAME")]
    pub quantity: String,

    /// Samples per segment used when the spectrograms were generated
    #[arg(long, value_name = "N", default_value = "10000")]
    pub n_samples: usize,

    /// Lower end of the colour scale
    #[arg(long, value_name = "F", default_value = "-20", allow_negative_numbers = true)]
    pub min_color: f64,

    /// Upper end of the colour scale
    #[arg(long, value_name = "F", default_value = "-5", allow_negative_numbers = true)]
    pub max_color: f64,

    /// Upper frequency limit of the plot
    #[arg(long, value_name = "F")]
    pub ylim: Option<f64>,
}

impl From<CombineArgs> for CombineOptions {
    fn from(args: CombineArgs) -> Self {
        CombineOptions {
            quantity: args.quantity,
            n_samples: args.n_samples,
            min_color: args.min_color,
            max_color: args.max_color,
            ylim: args.ylim,
        }
    }
}

#[derive(Args, Debug)]
pub struct ComputeTimeArgs {
    /// Case folder holding the solver log files
    #[arg(long, value_name = "DIR")]
    pub case: PathBuf,

    /// Where to write the plot (defaults to `<case>/Images`)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_defaults() {
        let cli = Cli::try_parse_from([
            "cfd-postproc",
            "combine-spectrograms",
            "--folder",
            "case_1",
            "--quantity",
            "p",
        ])
        .unwrap();

        assert_eq!(cli.log_level, LogLevel::Info);
        let Command::CombineSpectrograms(args) = cli.command else {
            panic!("expected combine-spectrograms");
        };
        assert_eq!(args.folder, PathBuf::from("case_1"));
        let options = CombineOptions::from(args);
        assert_eq!(
            options,
            CombineOptions {
                quantity: "p".to_string(),
                n_samples: 10000,
                min_color: -20.0,
                max_color: -5.0,
                ylim: None,
            }
        );
    }

    #[test]
    fn negative_colour_limits_and_ylim() {
        let cli = Cli::try_parse_from([
            "cfd-postproc",
            "combine-spectrograms",
            "--folder",
            ".",
            "--quantity",
            "u",
            "--min-color",
            "-30.5",
            "--max-color",
            "-2",
            "--ylim",
            "250",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.log_level, LogLevel::Debug);
        let Command::CombineSpectrograms(args) = cli.command else {
            panic!("expected combine-spectrograms");
        };
        assert_eq!(args.min_color, -30.5);
        assert_eq!(args.max_color, -2.0);
        assert_eq!(args.ylim, Some(250.0));
    }

    #[test]
    fn compute_time_output_dir_is_optional() {
        let cli = Cli::try_parse_from(["cfd-postproc", "compute-time", "--case", "run"]).unwrap();
        let Command::ComputeTime(args) = cli.command else {
            panic!("expected compute-time");
        };
        assert_eq!(args.case, PathBuf::from("run"));
        assert_eq!(args.output_dir, None);
    }

    #[test]
    fn quantity_is_required() {
        let result = Cli::try_parse_from(["cfd-postproc", "combine-spectrograms", "--folder", "."]);
        assert!(result.is_err());
    }

    #[test]
    fn log_level_maps_to_filter() {
        assert_eq!(LevelFilter::from(LogLevel::Off), LevelFilter::Off);
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::Trace);
    }
}
