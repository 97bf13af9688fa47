use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use cfd_postproc::cli::{Cli, Command};
use cfd_postproc::combine::combine_spectrograms;
use cfd_postproc::compute_time::plot_compute_time;
use cfd_postproc::plot::PngRenderer;

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.into())
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    let mut renderer = PngRenderer::default();
    match command {
        Command::CombineSpectrograms(args) => {
            let folder = args.folder.clone();
            combine_spectrograms(&folder, &args.into(), &mut renderer)?;
        }
        Command::ComputeTime(args) => {
            plot_compute_time(&args.case, args.output_dir.as_deref(), &mut renderer)?;
        }
    }
    Ok(())
}
