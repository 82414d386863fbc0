//! FFT utilities
//!
//! Thin wrapper around `rustfft` used by the spectral transform pair. The
//! discrete transform itself is treated as a black box; everything that turns
//! it into an approximation of the continuous Fourier transform lives in
//! [`crate::spectral`].

use rustfft::{num_complex::Complex64, Fft, FftPlanner};
use std::fmt;
use std::sync::Arc;

use crate::types::IQSample;

/// Planned forward/inverse FFT pair of a fixed size
pub struct FftProcessor {
    /// FFT size
    size: usize,
    /// Forward FFT instance
    fft_forward: Arc<dyn Fft<f64>>,
    /// Inverse FFT instance
    fft_inverse: Arc<dyn Fft<f64>>,
    /// Scratch buffer for FFT operations
    scratch: Vec<Complex64>,
}

impl fmt::Debug for FftProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FftProcessor")
            .field("size", &self.size)
            .finish()
    }
}

impl FftProcessor {
    /// Create a new FFT processor for the given size
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft_forward = planner.plan_fft_forward(size);
        let fft_inverse = planner.plan_fft_inverse(size);
        let scratch_len = fft_forward
            .get_inplace_scratch_len()
            .max(fft_inverse.get_inplace_scratch_len());
        let scratch = vec![Complex64::new(0.0, 0.0); scratch_len];

        Self {
            size,
            fft_forward,
            fft_inverse,
            scratch,
        }
    }

    /// Get the FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Compute the forward FFT in-place
    pub fn fft_inplace(&mut self, buffer: &mut [Complex64]) {
        assert_eq!(buffer.len(), self.size);
        self.fft_forward.process_with_scratch(buffer, &mut self.scratch);
    }

    /// Compute the forward FFT of `input` zero-padded to the FFT size
    pub fn fft(&mut self, input: &[IQSample]) -> Vec<Complex64> {
        assert!(
            input.len() <= self.size,
            "input of {} samples does not fit an FFT of size {}",
            input.len(),
            self.size
        );
        let mut buffer: Vec<Complex64> = input.to_vec();
        buffer.resize(self.size, Complex64::new(0.0, 0.0));
        self.fft_inplace(&mut buffer);
        buffer
    }

    /// Compute the inverse FFT in-place, normalised by `1/N`
    pub fn ifft_inplace(&mut self, buffer: &mut [Complex64]) {
        assert_eq!(buffer.len(), self.size);
        self.fft_inverse.process_with_scratch(buffer, &mut self.scratch);

        let scale = 1.0 / self.size as f64;
        for sample in buffer.iter_mut() {
            *sample *= scale;
        }
    }
}

/// Smallest power of two that is greater than or equal to `min_len`.
///
/// Takes a real-valued bound because FFT sizing margins such as
/// `N + fs²/alpha` are generally not integers.
pub fn next_pow2_at_least(min_len: f64) -> usize {
    let mut n = 1usize;
    while (n as f64) < min_len {
        n <<= 1;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_fft_single_tone() {
        let n = 128;
        let sample_rate = 128.0;
        let freq = 10.0;

        let signal: Vec<Complex64> = (0..n)
            .map(|i| {
                let t = i as f64 / sample_rate;
                let phase = 2.0 * PI * freq * t;
                Complex64::new(phase.cos(), phase.sin())
            })
            .collect();

        let mut processor = FftProcessor::new(n);
        let spectrum = processor.fft(&signal);

        let peak_bin = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.norm().total_cmp(&b.1.norm()))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak_bin, 10);
    }

    #[test]
    fn test_fft_inverse_identity() {
        let n = 64;
        let signal: Vec<Complex64> = (0..n)
            .map(|i| Complex64::new(i as f64, (i * 2) as f64))
            .collect();

        let mut processor = FftProcessor::new(n);

        let mut buffer = signal.clone();
        processor.fft_inplace(&mut buffer);
        processor.ifft_inplace(&mut buffer);

        for (orig, recovered) in signal.iter().zip(buffer.iter()) {
            assert!((orig - recovered).norm() < 1e-10);
        }
    }

    #[test]
    fn test_fft_zero_pads() {
        let mut processor = FftProcessor::new(16);
        let spectrum = processor.fft(&[Complex64::new(1.0, 0.0)]);
        assert_eq!(spectrum.len(), 16);
        // A unit impulse has a flat spectrum
        assert!(spectrum.iter().all(|c| (c - Complex64::new(1.0, 0.0)).norm() < 1e-12));
    }

    #[test]
    fn test_next_pow2_at_least() {
        assert_eq!(next_pow2_at_least(0.0), 1);
        assert_eq!(next_pow2_at_least(1.0), 1);
        assert_eq!(next_pow2_at_least(1.5), 2);
        assert_eq!(next_pow2_at_least(1024.0), 1024);
        assert_eq!(next_pow2_at_least(1024.001), 2048);
        assert_eq!(next_pow2_at_least(18_750.0), 32_768);
    }
}
