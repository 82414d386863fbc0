//! Argument parsing for running a comparison from the command line

use clap::Parser;
use nlc_core::config::{NlcConfig, PhaseErrorKind};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// YAML configuration file (default: NLC_CONFIG, ./nlc.yaml, user and system config)
    #[clap(short, long)]
    pub config: Option<PathBuf>,
    /// Phase error shape: zero, sinusoidal, cubic or quartic
    #[clap(short, long, value_parser = parse_kind)]
    pub kind: Option<PhaseErrorKind>,
    /// Ripple frequency as a fraction of sqrt(alpha)
    #[clap(short, long)]
    pub ripple_ratio: Option<f64>,
    /// Phase error amplitude in radians
    #[clap(short, long)]
    pub amplitude: Option<f64>,
    /// Write the four spectra (dB) around the beat frequency to this CSV file
    #[clap(long)]
    pub csv: Option<PathBuf>,
    /// Half width of the CSV frequency window (Hz)
    #[clap(long, default_value_t = 500.0e3)]
    pub csv_span: f64,
    /// Print the summary as YAML instead of a table
    #[clap(long)]
    pub yaml: bool,
    /// Print an example configuration and exit
    #[clap(long)]
    pub example_config: bool,
}

impl Args {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply(&self, config: &mut NlcConfig) {
        if let Some(kind) = self.kind {
            config.phase_error.kind = kind;
        }
        if let Some(ratio) = self.ripple_ratio {
            config.phase_error.ripple_ratio = ratio;
            config.phase_error.ripple_freq_hz = None;
        }
        if let Some(amplitude) = self.amplitude {
            config.phase_error.amplitude_rad = amplitude;
        }
    }
}

fn parse_kind(s: &str) -> Result<PhaseErrorKind, String> {
    match s.to_ascii_lowercase().as_str() {
        "zero" => Ok(PhaseErrorKind::Zero),
        "sinusoidal" | "sine" => Ok(PhaseErrorKind::Sinusoidal),
        "cubic" => Ok(PhaseErrorKind::Cubic),
        "quartic" => Ok(PhaseErrorKind::Quartic),
        other => Err(format!("unknown phase error kind '{}'", other)),
    }
}
