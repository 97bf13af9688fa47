//! Write a synthetic case folder: three component spectrograms under
//! `Spectrograms/` and one solver log file.
//!
//! Usage: `generate_sample [DIR]` (defaults to `sample_case`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use cfd_postproc::combine::SPECTROGRAM_DIR;
use cfd_postproc::data::model::{Axis, PowerMatrix, Spectrogram};
use cfd_postproc::data::writer::write_spectrogram;

const QUANTITY: &str = "p";
const TIME_BINS: usize = 40;
const FREQUENCIES: usize = 120;
const TIMESTEPS: usize = 200;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Log power of one component: a shedding tone whose frequency drifts over
/// time plus its first harmonic, on a noisy floor. Each axis gets its own
/// tone strength.
fn component(axis: Axis, bins: &[f64], frequencies: &[f64], rng: &mut SimpleRng) -> PowerMatrix {
    let strength = match axis {
        Axis::X => 9.0,
        Axis::Y => 12.0,
        Axis::Z => 4.0,
    };
    let duration = bins.last().copied().unwrap_or(1.0);

    let mut power = PowerMatrix::zeros(0, bins.len());
    let mut row = Vec::with_capacity(bins.len());
    for &f in frequencies {
        row.clear();
        row.extend(bins.iter().map(|&t| {
            let tone = 40.0 + 10.0 * t / duration;
            -24.0
                + gaussian(f, tone, 3.0, strength)
                + gaussian(f, 2.0 * tone, 4.0, strength * 0.5)
                + rng.gauss(0.0, 0.8)
        }));
        power.push_row(&row);
    }
    power
}

fn write_spectrograms(dir: &Path, rng: &mut SimpleRng) -> Result<()> {
    let bins: Vec<f64> = (0..TIME_BINS).map(|i| 0.0125 + i as f64 * 0.025).collect();
    let frequencies: Vec<f64> = (0..FREQUENCIES).map(|i| i as f64).collect();
    let bins_text = bins
        .iter()
        .map(|b| format!("{b:e}"))
        .collect::<Vec<_>>()
        .join(",");

    let spectrogram_dir = dir.join(SPECTROGRAM_DIR);
    fs::create_dir_all(&spectrogram_dir)
        .with_context(|| format!("creating {}", spectrogram_dir.display()))?;

    for axis in Axis::ALL {
        let spectrogram = Spectrogram {
            bins_text: bins_text.clone(),
            bins: bins.clone(),
            frequencies: frequencies.clone(),
            power: component(axis, &bins, &frequencies, rng),
        };
        let path = spectrogram_dir.join(format!("{QUANTITY}_{axis}_1_spectrogram.csv"));
        write_spectrogram(&path, &spectrogram)?;
        info!("wrote {}", path.display());
    }
    Ok(())
}

fn write_log(dir: &Path, rng: &mut SimpleRng) -> Result<()> {
    let mut text = String::from("Starting solver\n");
    let mut time = 0.0;
    for step in 1..=TIMESTEPS {
        time += 5e-4;
        let iterations = 3 + (rng.next_u64() % 4);
        for i in 1..=iterations {
            let residual = rng.next_f64() * 1e-6;
            text.push_str(&format!("  Newton iteration {i}: r (abs) = {residual:e}\n"));
        }
        let compute = rng.gauss(30.0, 4.0).max(1.0);
        text.push_str(&format!(
            "Solved for timestep {step}, time {time:.4}, compute time {compute:.2}\n"
        ));
    }

    let path = dir.join("run_logfile.txt");
    fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_case"));

    let mut rng = SimpleRng::new(42);
    write_spectrograms(&dir, &mut rng)?;
    write_log(&dir, &mut rng)?;

    println!(
        "Sample case written to {}; try `cfd-postproc combine-spectrograms --folder {0} --quantity {QUANTITY}`",
        dir.display()
    );
    Ok(())
}
