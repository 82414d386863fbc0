//! Finite-support Fourier transform pair
//!
//! Approximates the continuous-time Fourier transform of a band-limited,
//! time-limited signal from its uniform samples, and inverts it again.
//!
//! A [`SampledSignal`] holds `N` samples at rate `fs` on the centered grid
//! `t[n] = (-N/2 + n) / fs`. Its [`Spectrum`] holds `NFFT >= N` values on the
//! grid `f[k] = (-1/2 + k/NFFT) * fs`, i.e. `(-fs/2, fs/2)` with spacing
//! `fs / NFFT`.
//!
//! ## Forward transform
//!
//! ```text
//! X(f[k]) = (T/N) * exp(jπ f[k] T) * DFT_NFFT{ x[n] * (-1)^n }[k]
//! ```
//!
//! The `(-1)^n` modulation moves the DFT origin to `-fs/2` and the phase ramp
//! accounts for the grid starting at `-T/2` instead of 0, so that
//! `X(f) ≈ ∫ x(t) exp(-j2πft) dt`.
//!
//! ## Inverse transform
//!
//! ```text
//! x[m] = fs * exp(jπ(N/2 - m)) * IDFT_NFFT{ X[k] * exp(-jπ k N / NFFT) }[m],   m < N
//! ```
//!
//! The pair is an exact algebraic inverse for any `NFFT >= N`. Whether the
//! result is meaningful after spectral filtering depends on `NFFT` being long
//! enough to hold the filtered signal without circular wraparound; see
//! [`crate::deskew::deskew_fft_len`].

use std::f64::consts::PI;

use crate::fft_utils::FftProcessor;
use crate::types::{complex_ops::cis, Complex, DspError, DspResult, IQSample};

/// Complex samples on a uniform time grid centered at t = 0
#[derive(Debug, Clone, PartialEq)]
pub struct SampledSignal {
    samples: Vec<IQSample>,
    sample_rate: f64,
}

impl SampledSignal {
    /// Wrap samples taken at `sample_rate` Hz.
    ///
    /// # Panics
    /// If `sample_rate` is not positive and finite. Use [`Self::try_new`] for
    /// untrusted rates.
    pub fn new(samples: Vec<IQSample>, sample_rate: f64) -> Self {
        assert!(
            sample_rate.is_finite() && sample_rate > 0.0,
            "sample rate must be positive and finite, got {}",
            sample_rate
        );
        Self {
            samples,
            sample_rate,
        }
    }

    /// Fallible variant of [`Self::new`]
    pub fn try_new(samples: Vec<IQSample>, sample_rate: f64) -> DspResult<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(DspError::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// All-zero signal of `len` samples
    pub fn zeros(len: usize, sample_rate: f64) -> Self {
        Self::new(vec![Complex::new(0.0, 0.0); len], sample_rate)
    }

    /// Evaluate `f(t)` on the centered grid of `len` samples.
    pub fn from_fn<F>(len: usize, sample_rate: f64, mut f: F) -> Self
    where
        F: FnMut(f64) -> IQSample,
    {
        let samples = (0..len)
            .map(|n| f(grid_time(n, len, sample_rate)))
            .collect();
        Self::new(samples, sample_rate)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Signal duration `T = N / fs`
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }

    /// Time of sample `n` on the centered grid
    pub fn time_at(&self, n: usize) -> f64 {
        grid_time(n, self.samples.len(), self.sample_rate)
    }

    pub fn samples(&self) -> &[IQSample] {
        &self.samples
    }

    /// Complex conjugate of every sample
    pub fn conj(&self) -> Self {
        Self {
            samples: self.samples.iter().map(|s| s.conj()).collect(),
            sample_rate: self.sample_rate,
        }
    }

    /// Multiply every sample by a complex scalar
    pub fn scale(&self, factor: Complex) -> Self {
        Self {
            samples: self.samples.iter().map(|s| s * factor).collect(),
            sample_rate: self.sample_rate,
        }
    }

    /// Element-wise product with a signal on the same grid
    pub fn multiply(&self, other: &SampledSignal) -> DspResult<Self> {
        self.check_same_grid(other)?;
        Ok(Self {
            samples: self
                .samples
                .iter()
                .zip(&other.samples)
                .map(|(a, b)| a * b)
                .collect(),
            sample_rate: self.sample_rate,
        })
    }

    /// Element-wise sum with a signal on the same grid
    pub fn add(&self, other: &SampledSignal) -> DspResult<Self> {
        self.check_same_grid(other)?;
        Ok(Self {
            samples: self
                .samples
                .iter()
                .zip(&other.samples)
                .map(|(a, b)| a + b)
                .collect(),
            sample_rate: self.sample_rate,
        })
    }

    /// Multiply by a real weighting window of the same length
    pub fn windowed(&self, window: &[f64]) -> DspResult<Self> {
        if window.len() != self.samples.len() {
            return Err(DspError::LengthMismatch {
                expected: self.samples.len(),
                actual: window.len(),
            });
        }
        Ok(Self {
            samples: self
                .samples
                .iter()
                .zip(window)
                .map(|(s, &w)| s * w)
                .collect(),
            sample_rate: self.sample_rate,
        })
    }

    /// Forward transform, see [`fourier`]
    pub fn fourier(&self, nfft: usize) -> Spectrum {
        fourier(self, nfft)
    }

    fn check_same_grid(&self, other: &SampledSignal) -> DspResult<()> {
        if other.samples.len() != self.samples.len() {
            return Err(DspError::LengthMismatch {
                expected: self.samples.len(),
                actual: other.samples.len(),
            });
        }
        if other.sample_rate != self.sample_rate {
            return Err(DspError::SampleRateMismatch {
                expected: self.sample_rate,
                actual: other.sample_rate,
            });
        }
        Ok(())
    }
}

/// Complex spectrum on `NFFT` uniform points spanning `(-fs/2, fs/2)`
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    bins: Vec<Complex>,
    sample_rate: f64,
}

impl Spectrum {
    /// Number of frequency points (`NFFT`)
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Frequency spacing `fs / NFFT`
    pub fn bin_spacing(&self) -> f64 {
        self.sample_rate / self.bins.len() as f64
    }

    /// Frequency of bin `k`
    pub fn frequency(&self, k: usize) -> f64 {
        bin_frequency(k, self.bins.len(), self.sample_rate)
    }

    /// The full frequency grid
    pub fn frequencies(&self) -> Vec<f64> {
        (0..self.bins.len()).map(|k| self.frequency(k)).collect()
    }

    pub fn bins(&self) -> &[Complex] {
        &self.bins
    }

    /// Magnitude of every bin
    pub fn magnitudes(&self) -> Vec<f64> {
        self.bins.iter().map(|b| b.norm()).collect()
    }

    /// Multiply every bin by `h(f)`, a frequency response on the same grid.
    pub fn apply_response<H>(&self, mut h: H) -> Self
    where
        H: FnMut(f64) -> Complex,
    {
        let nfft = self.bins.len();
        Self {
            bins: self
                .bins
                .iter()
                .enumerate()
                .map(|(k, &x)| x * h(bin_frequency(k, nfft, self.sample_rate)))
                .collect(),
            sample_rate: self.sample_rate,
        }
    }

    /// Inverse transform to `len` samples, see [`inverse_fourier`]
    pub fn inverse(&self, len: usize) -> SampledSignal {
        inverse_fourier(self, len)
    }
}

/// Approximate continuous Fourier transform of `signal` on `nfft` points.
///
/// # Panics
/// If `nfft` is not a power of two or is shorter than the signal.
pub fn fourier(signal: &SampledSignal, nfft: usize) -> Spectrum {
    assert!(nfft.is_power_of_two(), "NFFT must be a power of two, got {}", nfft);
    fourier_with(signal, &mut FftProcessor::new(nfft))
}

/// [`fourier`] on a caller-held processor, whose size is the NFFT.
///
/// # Panics
/// If the processor size is not a power of two or is shorter than the signal.
pub fn fourier_with(signal: &SampledSignal, fft: &mut FftProcessor) -> Spectrum {
    let n = signal.len();
    let nfft = fft.size();
    assert!(nfft.is_power_of_two(), "NFFT must be a power of two, got {}", nfft);
    assert!(nfft >= n, "NFFT ({}) must not be shorter than the signal ({})", nfft, n);

    let fs = signal.sample_rate();
    let duration = signal.duration();

    let mut buffer: Vec<Complex> = signal
        .samples()
        .iter()
        .enumerate()
        .map(|(i, &x)| if i % 2 == 0 { x } else { -x })
        .collect();
    buffer.resize(nfft, Complex::new(0.0, 0.0));

    fft.fft_inplace(&mut buffer);

    // T/N == 1/fs
    let scale = 1.0 / fs;
    for (k, bin) in buffer.iter_mut().enumerate() {
        let f = bin_frequency(k, nfft, fs);
        *bin *= cis(PI * f * duration) * scale;
    }

    Spectrum {
        bins: buffer,
        sample_rate: fs,
    }
}

/// Approximate inverse Fourier transform of `spectrum` to `len` time samples.
///
/// # Panics
/// If `len` exceeds the spectrum length.
pub fn inverse_fourier(spectrum: &Spectrum, len: usize) -> SampledSignal {
    assert!(len <= spectrum.len(), "cannot recover {} samples from {} bins", len, spectrum.len());
    if spectrum.is_empty() {
        return SampledSignal::zeros(0, spectrum.sample_rate());
    }
    inverse_fourier_with(spectrum, len, &mut FftProcessor::new(spectrum.len()))
}

/// [`inverse_fourier`] on a caller-held processor of the spectrum's length.
pub fn inverse_fourier_with(spectrum: &Spectrum, len: usize, fft: &mut FftProcessor) -> SampledSignal {
    let nfft = spectrum.len();
    assert_eq!(fft.size(), nfft, "FFT size does not match the spectrum length");
    assert!(len <= nfft, "cannot recover {} samples from {} bins", len, nfft);

    let fs = spectrum.sample_rate();
    let ratio = len as f64 / nfft as f64;

    let mut buffer: Vec<Complex> = spectrum
        .bins()
        .iter()
        .enumerate()
        .map(|(k, &x)| x * cis(-PI * k as f64 * ratio))
        .collect();

    fft.ifft_inplace(&mut buffer);
    buffer.truncate(len);

    let half = len as f64 / 2.0;
    for (m, sample) in buffer.iter_mut().enumerate() {
        *sample *= cis(PI * (half - m as f64)) * fs;
    }

    SampledSignal {
        samples: buffer,
        sample_rate: fs,
    }
}

#[inline]
fn grid_time(n: usize, len: usize, sample_rate: f64) -> f64 {
    (n as f64 - len as f64 / 2.0) / sample_rate
}

#[inline]
fn bin_frequency(k: usize, nfft: usize, sample_rate: f64) -> f64 {
    (-0.5 + k as f64 / nfft as f64) * sample_rate
}
