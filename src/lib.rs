//! Post-processing for CFD simulation output.
//!
//! Two independent jobs:
//!
//! - [`combine`]: average the x, y and z component spectrograms of one
//!   quantity and write the result as a PNG and a CSV.
//! - [`compute_time`]: plot cumulative solver compute time against
//!   simulation time from the log files of a case.

pub mod cli;
pub mod color;
pub mod combine;
pub mod compute_time;
pub mod data;
pub mod error;
pub mod plot;
