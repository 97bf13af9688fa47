use log::warn;
use regex::Regex;

/// Substring identifying solver log files in a case folder.
pub const LOG_FILE_MARKER: &str = "logfile";

/// Phrase marking the per-timestep summary line in a solver log.
pub const SOLVED_MARKER: &str = "Solved for timestep";

/// Number as written by the solver, including exponent notation.
const NUMBER: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";

/// Any unsigned decimal token, for the positional fallback.
const BARE_NUMBER: &str = r"\d*\.?\d+";

// ---------------------------------------------------------------------------
// StepTiming – one parsed timestep line
// ---------------------------------------------------------------------------

/// Simulation time reached and wall-clock seconds spent on one timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepTiming {
    pub simulation_time: f64,
    pub compute_time: f64,
}

/// Result of looking at a single log line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineOutcome {
    /// Not a timestep summary line.
    Skip,
    Step(StepTiming),
    /// Carries the marker phrase but too few numbers to read.
    Unreadable,
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Extracts [`StepTiming`]s from solver log text.
///
/// Two line shapes are recognised by name:
///
/// ```text
/// Solved for timestep 3, time 0.02, compute time 1.5
/// Solved for timestep 3, t = 0.0200 in 1.5 s
/// ```
///
/// Anything else carrying the marker falls back to reading the second and
/// third numbers on the line as simulation time and compute time.
#[derive(Debug, Clone)]
pub struct LogLineParser {
    named: Regex,
    number: Regex,
}

impl LogLineParser {
    pub fn new() -> Result<Self, regex::Error> {
        let named = Regex::new(&format!(
            r"Solved for timestep\s+(?P<step>\d+)\s*,\s*(?:time|t\s*=)\s*(?P<time>{NUMBER})\s*,?\s*(?:compute time|in)\s+(?P<compute>{NUMBER})"
        ))?;
        let number = Regex::new(BARE_NUMBER)?;
        Ok(LogLineParser { named, number })
    }

    pub fn parse_line(&self, line: &str) -> LineOutcome {
        if !line.contains(SOLVED_MARKER) {
            return LineOutcome::Skip;
        }

        if let Some(caps) = self.named.captures(line) {
            let time = caps["time"].parse::<f64>();
            let compute = caps["compute"].parse::<f64>();
            if let (Ok(simulation_time), Ok(compute_time)) = (time, compute) {
                return LineOutcome::Step(StepTiming {
                    simulation_time,
                    compute_time,
                });
            }
        }

        let numbers: Vec<f64> = self
            .number
            .find_iter(line)
            .filter_map(|m| m.as_str().parse::<f64>().ok())
            .collect();
        match numbers.as_slice() {
            [_, simulation_time, compute_time, ..] => LineOutcome::Step(StepTiming {
                simulation_time: *simulation_time,
                compute_time: *compute_time,
            }),
            _ => LineOutcome::Unreadable,
        }
    }

    /// Collect every timestep in `text`, in file order. `source` names the
    /// file in warnings about unreadable lines.
    pub fn parse_log(&self, source: &str, text: &str) -> Vec<StepTiming> {
        let mut steps = Vec::new();
        for (index, line) in text.lines().enumerate() {
            match self.parse_line(line) {
                LineOutcome::Skip => {}
                LineOutcome::Step(step) => steps.push(step),
                LineOutcome::Unreadable => warn!(
                    "{source}:{}: skipping timestep line with fewer than three numbers: {}",
                    index + 1,
                    line.trim()
                ),
            }
        }
        steps
    }
}
