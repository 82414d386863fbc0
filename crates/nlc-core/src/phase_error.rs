//! Phase error functions
//!
//! Models the deviation of a real transmit sweep from an ideal linear chirp as
//! an additive phase term `e(t)` (radians). The transmit signal becomes
//! `s_tx(t) * exp(j e(t))`.
//!
//! Three shapes are supported, matching the usual test cases for sweep
//! linearisation:
//!
//! | Variant    | e(t)                   | max frequency error on (-T/2, T/2) |
//! |------------|------------------------|------------------------------------|
//! | Sinusoidal | A cos(2π fsl t)        | A fsl                              |
//! | Cubic      | k3/3 t³                | k3 (T/2)² / 2π                     |
//! | Quartic    | k4/4 t⁴                | k4 (T/2)³ / 2π                     |
//!
//! The [`PhaseError::cubic_matching`] and [`PhaseError::quartic_matching`]
//! constructors pick `k3` / `k4` so that a polynomial error has the same
//! maximum frequency error as a given sinusoid, which makes the three shapes
//! directly comparable.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::spectral::SampledSignal;
use crate::types::{complex_ops::cis, Complex};

/// Phase error `e(t)` of a transmit sweep, in radians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PhaseError {
    /// Perfectly linear sweep
    Zero,
    /// `amplitude_rad * cos(2π ripple_freq_hz t)`
    Sinusoidal { amplitude_rad: f64, ripple_freq_hz: f64 },
    /// `k3 / 3 * t³`
    Cubic { k3: f64 },
    /// `k4 / 4 * t⁴`
    Quartic { k4: f64 },
}

impl Default for PhaseError {
    fn default() -> Self {
        PhaseError::Zero
    }
}

impl PhaseError {
    /// Sinusoidal ripple with frequency expressed as a fraction of `sqrt(alpha)`.
    ///
    /// `sqrt(alpha)` is the ripple frequency at which the narrowband
    /// approximation breaks down.
    pub fn sinusoidal_relative(amplitude_rad: f64, ratio: f64, chirp_rate: f64) -> Self {
        PhaseError::Sinusoidal {
            amplitude_rad,
            ripple_freq_hz: ratio * chirp_rate.sqrt(),
        }
    }

    /// Cubic error whose maximum frequency error over one sweep of
    /// `sweep_time_s` equals `max_freq_error_hz`.
    pub fn cubic_matching(max_freq_error_hz: f64, sweep_time_s: f64) -> Self {
        let half = 0.5 * sweep_time_s;
        PhaseError::Cubic {
            k3: 2.0 * PI * max_freq_error_hz / (half * half),
        }
    }

    /// Quartic error whose maximum frequency error over one sweep of
    /// `sweep_time_s` equals `max_freq_error_hz`.
    pub fn quartic_matching(max_freq_error_hz: f64, sweep_time_s: f64) -> Self {
        let half = 0.5 * sweep_time_s;
        PhaseError::Quartic {
            k4: 2.0 * PI * max_freq_error_hz / (half * half * half),
        }
    }

    /// e(t) in radians
    pub fn phase(&self, t: f64) -> f64 {
        match *self {
            PhaseError::Zero => 0.0,
            PhaseError::Sinusoidal {
                amplitude_rad,
                ripple_freq_hz,
            } => amplitude_rad * (2.0 * PI * ripple_freq_hz * t).cos(),
            PhaseError::Cubic { k3 } => k3 / 3.0 * t * t * t,
            PhaseError::Quartic { k4 } => k4 / 4.0 * t * t * t * t,
        }
    }

    /// exp(j e(t))
    pub fn exponential(&self, t: f64) -> Complex {
        cis(self.phase(t))
    }

    /// Instantaneous frequency error `e'(t) / 2π` in Hz
    pub fn frequency_error(&self, t: f64) -> f64 {
        match *self {
            PhaseError::Zero => 0.0,
            PhaseError::Sinusoidal {
                amplitude_rad,
                ripple_freq_hz,
            } => -amplitude_rad * ripple_freq_hz * (2.0 * PI * ripple_freq_hz * t).sin(),
            PhaseError::Cubic { k3 } => k3 * t * t / (2.0 * PI),
            PhaseError::Quartic { k4 } => k4 * t * t * t / (2.0 * PI),
        }
    }

    /// Largest |frequency error| over a sweep `(-T/2, T/2)`
    ///
    /// For the sinusoid this is the ripple bound `A * fsl`, reached whenever
    /// the sweep spans at least a quarter ripple period.
    pub fn max_frequency_error_hz(&self, sweep_time_s: f64) -> f64 {
        let half = 0.5 * sweep_time_s;
        match *self {
            PhaseError::Zero => 0.0,
            PhaseError::Sinusoidal {
                amplitude_rad,
                ripple_freq_hz,
            } => (amplitude_rad * ripple_freq_hz).abs(),
            PhaseError::Cubic { k3 } => (k3 * half * half / (2.0 * PI)).abs(),
            PhaseError::Quartic { k4 } => (k4 * half * half * half / (2.0 * PI)).abs(),
        }
    }

    /// Highest frequency content of `exp(j e(t))` worth worrying about, in Hz.
    ///
    /// The narrowband correction is accurate while this stays well below
    /// `sqrt(alpha)`. Only defined for the sinusoid; the polynomial errors
    /// are dominated by their instantaneous frequency error instead.
    pub fn ripple_frequency_hz(&self) -> Option<f64> {
        match *self {
            PhaseError::Sinusoidal { ripple_freq_hz, .. } => Some(ripple_freq_hz.abs()),
            _ => None,
        }
    }

    /// `exp(j e(t))` sampled on the centered grid of `len` samples
    pub fn sample(&self, len: usize, sample_rate: f64) -> SampledSignal {
        SampledSignal::from_fn(len, sample_rate, |t| self.exponential(t))
    }

    pub fn is_zero(&self) -> bool {
        match *self {
            PhaseError::Zero => true,
            PhaseError::Sinusoidal { amplitude_rad, .. } => amplitude_rad == 0.0,
            PhaseError::Cubic { k3 } => k3 == 0.0,
            PhaseError::Quartic { k4 } => k4 == 0.0,
        }
    }
}
