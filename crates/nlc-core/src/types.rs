//! Core types for nonlinearity-compensation signal processing
//!
//! Complex baseband samples are `Complex64` throughout. A beat signal is a
//! sequence of these samples on a time grid centered at zero, so a signal of
//! `N` samples at rate `fs` covers `(-T/2, T/2)` with `T = N / fs`.
//!
//! ```text
//!   n:    0        1        ...   N/2   ...   N-1
//!   t: -N/2/fs  (-N/2+1)/fs  ...    0    ...  (N/2-1)/fs
//! ```

use num_complex::Complex64;

/// Type alias for complex numbers using f64 precision
pub type Complex = Complex64;

/// A single I/Q sample point
pub type IQSample = Complex64;

/// Result type for DSP operations
pub type DspResult<T> = Result<T, DspError>;

/// Errors that can occur during DSP operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DspError {
    #[error("Invalid sample rate: {0} Hz. Must be positive and finite")]
    InvalidSampleRate(f64),

    #[error("Invalid chirp rate: {0} Hz/s. Must be positive")]
    InvalidChirpRate(f64),

    #[error("Signal length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Sample rate mismatch: {expected} Hz vs {actual} Hz")]
    SampleRateMismatch { expected: f64, actual: f64 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Helper functions for working with complex samples
pub mod complex_ops {
    use super::*;

    /// `e^(j*phase)`
    #[inline]
    pub fn cis(phase: f64) -> Complex {
        Complex::new(phase.cos(), phase.sin())
    }

    /// Largest element-wise distance between two equal-length buffers.
    ///
    /// Returns `f64::INFINITY` when the lengths differ.
    pub fn max_abs_diff(a: &[IQSample], b: &[IQSample]) -> f64 {
        if a.len() != b.len() {
            return f64::INFINITY;
        }
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y).norm())
            .fold(0.0_f64, f64::max)
    }

    /// Root-mean-square magnitude of a buffer
    pub fn rms(samples: &[IQSample]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        (samples.iter().map(|s| s.norm_sqr()).sum::<f64>() / samples.len() as f64).sqrt()
    }
}
