//! Deskew filter
//!
//! Quadratic-phase spectral filter
//!
//! ```text
//! H(f) = exp(jπ f² / alpha)
//! ```
//!
//! with group delay `-f / alpha`. Applied to a dechirped FMCW beat signal, it
//! delays every beat frequency `fb = alpha * tau` by `-tau`, which aligns the
//! returns of all ranges in time and removes the residual video phase.
//!
//! ## FFT length
//!
//! The maximum group delay over `(-fs/2, fs/2)` is `fs / (2 alpha)` in either
//! direction, so the filtered signal occupies up to `N + fs²/alpha` samples.
//! The transform must be at least that long or the output wraps around
//! circularly; [`deskew_fft_len`] returns the next power of two above the
//! bound.

use std::f64::consts::PI;

use tracing::debug;

use crate::fft_utils::{next_pow2_at_least, FftProcessor};
use crate::spectral::{fourier_with, inverse_fourier_with, SampledSignal};
use crate::types::complex_ops::cis;

/// Minimum support, in samples, of a length-`len` signal after deskewing
pub fn deskew_support(len: usize, sample_rate: f64, chirp_rate: f64) -> f64 {
    len as f64 + sample_rate * sample_rate / chirp_rate
}

/// FFT length for deskewing `len` samples: next power of two `>= N + fs²/alpha`
pub fn deskew_fft_len(len: usize, sample_rate: f64, chirp_rate: f64) -> usize {
    next_pow2_at_least(deskew_support(len, sample_rate, chirp_rate))
}

/// Quadratic-phase filter matched to a chirp rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeskewFilter {
    chirp_rate: f64,
}

impl DeskewFilter {
    /// # Panics
    /// If `chirp_rate` is not positive; a zero or negative rate has no
    /// finite deskew filter.
    pub fn new(chirp_rate: f64) -> Self {
        assert!(chirp_rate > 0.0, "chirp rate must be positive, got {}", chirp_rate);
        Self { chirp_rate }
    }

    pub fn chirp_rate(&self) -> f64 {
        self.chirp_rate
    }

    /// FFT length this filter uses for a signal of `len` samples at `sample_rate`
    pub fn fft_len(&self, len: usize, sample_rate: f64) -> usize {
        deskew_fft_len(len, sample_rate, self.chirp_rate)
    }

    /// Filter `signal`, returning a signal of the same length and rate.
    pub fn apply(&self, signal: &SampledSignal) -> SampledSignal {
        let len = signal.len();
        let fs = signal.sample_rate();
        let nfft = self.fft_len(len, fs);
        assert!(
            nfft as f64 >= deskew_support(len, fs, self.chirp_rate),
            "deskew FFT length {} cannot hold {} samples at {} Hz",
            nfft,
            len,
            fs
        );
        debug!(len, nfft, chirp_rate = self.chirp_rate, "deskew filter");

        let alpha = self.chirp_rate;
        let mut fft = FftProcessor::new(nfft);
        let filtered = fourier_with(signal, &mut fft).apply_response(|f| cis(PI * f * f / alpha));
        inverse_fourier_with(&filtered, len, &mut fft)
    }
}

/// Deskew `signal` for chirp rate `chirp_rate`
pub fn deskew(signal: &SampledSignal, chirp_rate: f64) -> SampledSignal {
    DeskewFilter::new(chirp_rate).apply(signal)
}
