//! Window Functions for Spectral Analysis
//!
//! Weighting windows applied to beat signals before the Fourier evaluation to
//! bound sidelobe leakage.
//!
//! | Window     | Main Lobe Width | Sidelobe Level |
//! |------------|-----------------|----------------|
//! | Rectangular| Narrowest       | -13 dB         |
//! | Hamming    | Medium          | -43 dB         |
//! | Hann       | Medium          | -32 dB         |
//! | Blackman   | Wide            | -58 dB         |
//!
//! ## Placement
//!
//! Only part of a sweep carries valid beat samples. Before correction the
//! first `taumax * fs` samples fall inside the guard interval, so the window
//! is placed at the end of the sweep ([`WindowAlignment::Trailing`]). After
//! deskewing, all ranges are aligned to the start of the sweep and the window
//! is placed at the beginning ([`WindowAlignment::Leading`]).
//!
//! ```text
//! Trailing:  000000000[~~~~~~~ window ~~~~~~~]
//! Leading:   [~~~~~~~ window ~~~~~~~]000000000
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Window function type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    /// Rectangular window (no windowing)
    Rectangular,
    /// Hamming window: 0.54 - 0.46*cos(2πn/(N-1))
    Hamming,
    /// Hann (Hanning) window: 0.5*(1 - cos(2πn/(N-1)))
    Hann,
    /// Blackman window: 0.42 - 0.5*cos(2πn/(N-1)) + 0.08*cos(4πn/(N-1))
    Blackman,
}

impl Default for Window {
    fn default() -> Self {
        Window::Hamming
    }
}

impl Window {
    /// Generate window coefficients for the given length.
    pub fn generate(&self, length: usize) -> Vec<f64> {
        match self {
            Window::Rectangular => rectangular_window(length),
            Window::Hamming => hamming_window(length),
            Window::Hann => hann_window(length),
            Window::Blackman => blackman_window(length),
        }
    }

    /// Coherent gain: sum of coefficients over length.
    pub fn coherent_gain(&self, length: usize) -> f64 {
        if length == 0 {
            return 0.0;
        }
        self.generate(length).iter().sum::<f64>() / length as f64
    }

    /// Main-lobe half width in bins of `1/T_window` (first null)
    pub fn main_lobe_half_width_bins(&self) -> f64 {
        match self {
            Window::Rectangular => 1.0,
            Window::Hamming | Window::Hann => 2.0,
            Window::Blackman => 3.0,
        }
    }
}

/// Where a window sits inside a longer, zero-padded sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowAlignment {
    /// Window first, zeros after
    Leading,
    /// Zeros first, window last
    Trailing,
}

/// Window of `active` samples placed inside `total` samples, zeros elsewhere.
///
/// `active` is clamped to `total`.
pub fn placed_window(window: Window, active: usize, total: usize, alignment: WindowAlignment) -> Vec<f64> {
    let active = active.min(total);
    let coefficients = window.generate(active);
    let padding = vec![0.0; total - active];
    match alignment {
        WindowAlignment::Leading => [coefficients, padding].concat(),
        WindowAlignment::Trailing => [padding, coefficients].concat(),
    }
}

/// Generate a rectangular (boxcar) window.
pub fn rectangular_window(length: usize) -> Vec<f64> {
    vec![1.0; length]
}

/// Generate a symmetric Hamming window.
///
/// w[n] = 0.54 - 0.46 * cos(2πn/(N-1))
pub fn hamming_window(length: usize) -> Vec<f64> {
    cosine_window(length, |x| 0.54 - 0.46 * x.cos())
}

/// Generate a symmetric Hann window.
pub fn hann_window(length: usize) -> Vec<f64> {
    cosine_window(length, |x| 0.5 * (1.0 - x.cos()))
}

/// Generate a symmetric Blackman window.
pub fn blackman_window(length: usize) -> Vec<f64> {
    cosine_window(length, |x| 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos())
}

fn cosine_window<F>(length: usize, shape: F) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    if length == 0 {
        return vec![];
    }
    if length == 1 {
        return vec![1.0];
    }

    let n_minus_1 = (length - 1) as f64;
    (0..length)
        .map(|n| shape(2.0 * PI * n as f64 / n_minus_1))
        .collect()
}
