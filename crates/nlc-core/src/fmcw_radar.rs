//! FMCW radar sweep parameters and beat-signal model
//!
//! Synthesises the noiseless ideal and phase-error-corrupted FMCW signals of
//! a single point target.
//!
//! ## FMCW Principle
//!
//! The radar transmits a linear chirp of bandwidth `B` over period `T`:
//!
//! ```text
//! s_tx(t) = rect(t/T) * exp(j2π (fc t + ½ alpha t²)),     alpha = B / T
//! ```
//!
//! The echo of a target at round-trip delay `tau` is mixed with the
//! transmitted signal, producing the beat (dechirped) signal
//!
//! ```text
//! s_b(t) = s_tx(t) * conj(s_tx(t - tau))
//! ```
//!
//! whose frequency `fb = alpha * tau` is proportional to range. A sweep
//! nonlinearity `e(t)` multiplies the transmit signal by `exp(j e(t))` and
//! enters the beat signal twice, once undelayed and once delayed by `tau`:
//!
//! ```text
//! s_b(t) = s_tx(t) exp(j e(t)) * conj(s_tx(t - tau) exp(j e(t - tau)))
//! ```
//!
//! ## Timing
//!
//! ```text
//!  -T/2                                        T/2
//!   |<- taumax ->|<--------- T - taumax --------->|
//!   |   guard    |   processed beat samples (Np)   |
//! ```
//!
//! Samples inside the guard interval `taumax` (the two-way delay of the
//! instrumented range) may contain returns from the previous sweep and are
//! excluded from the range spectrum.
//!
//! ## Example
//!
//! ```rust
//! use nlc_core::fmcw_radar::{ChirpParams, FmcwSignalModel};
//! use nlc_core::phase_error::PhaseError;
//!
//! let params = ChirpParams::x_band_12km();
//! let model = FmcwSignalModel::new(params, PhaseError::Zero);
//! let beat = model.ideal_beat_signal();
//! assert_eq!(beat.len(), params.num_samples());
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::deskew::deskew_fft_len;
use crate::phase_error::PhaseError;
use crate::spectral::SampledSignal;
use crate::types::{complex_ops::cis, Complex, DspError, DspResult};

/// Speed of light used by the reference scenario (m/s).
///
/// Rounded so that a 12 km target gives exactly 80 µs of delay.
pub const SPEED_OF_LIGHT: f64 = 3.0e8;

/// Immutable sweep and target configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChirpParams {
    /// Carrier / center frequency (Hz)
    pub center_freq_hz: f64,
    /// Sweep bandwidth (Hz)
    pub bandwidth_hz: f64,
    /// Duration of one sweep (s)
    pub sweep_time_s: f64,
    /// Beat-signal sample rate (Hz)
    pub sample_rate_hz: f64,
    /// Round-trip delay of the target (s)
    pub delay_s: f64,
    /// Guard interval at the start of the sweep (s)
    pub guard_interval_s: f64,
}

impl ChirpParams {
    pub fn builder() -> ChirpParamsBuilder {
        ChirpParamsBuilder::default()
    }

    /// X-band reference scenario.
    ///
    /// - 10 GHz carrier, 50 MHz sweep over 500 µs (alpha = 100 GHz/s)
    /// - target at 12 km (tau = 80 µs, fb = 8 MHz)
    /// - 25 MHz sampling
    /// - 15 km instrumented range (100 µs guard interval)
    pub fn x_band_12km() -> Self {
        Self {
            center_freq_hz: 10.0e9,
            bandwidth_hz: 50.0e6,
            sweep_time_s: 500.0e-6,
            sample_rate_hz: 25.0e6,
            delay_s: range_to_delay(12.0e3, SPEED_OF_LIGHT),
            guard_interval_s: range_to_delay(15.0e3, SPEED_OF_LIGHT),
        }
    }

    /// Chirp rate `alpha = B / T` (Hz/s)
    pub fn chirp_rate(&self) -> f64 {
        self.bandwidth_hz / self.sweep_time_s
    }

    /// Beat frequency of the target, `alpha * tau` (Hz)
    pub fn beat_freq_hz(&self) -> f64 {
        self.chirp_rate() * self.delay_s
    }

    /// Samples per sweep `N`
    pub fn num_samples(&self) -> usize {
        (self.sweep_time_s * self.sample_rate_hz).round() as usize
    }

    /// Samples outside the guard interval, `Np`
    pub fn processed_samples(&self) -> usize {
        let valid = (self.sweep_time_s - self.guard_interval_s).max(0.0);
        ((valid * self.sample_rate_hz).round() as usize).min(self.num_samples())
    }

    /// Coherent integration time `T - taumax` (s)
    pub fn coherent_time_s(&self) -> f64 {
        self.sweep_time_s - self.guard_interval_s
    }

    /// Transform length used for deskewing and for the comparison spectra
    pub fn fft_len(&self) -> usize {
        deskew_fft_len(self.num_samples(), self.sample_rate_hz, self.chirp_rate())
    }

    /// Range resolution `c / 2B` (m)
    pub fn range_resolution(&self, speed_of_light: f64) -> f64 {
        speed_of_light / (2.0 * self.bandwidth_hz)
    }

    /// Beat frequency to slant range (m)
    pub fn beat_freq_to_range(&self, beat_freq_hz: f64, speed_of_light: f64) -> f64 {
        speed_of_light * beat_freq_hz / (2.0 * self.chirp_rate())
    }

    /// Reject rates and durations that make the model meaningless.
    ///
    /// A delay at or beyond the sweep period is accepted: it yields an
    /// all-zero beat signal.
    pub fn validate(&self) -> DspResult<()> {
        if !(self.sample_rate_hz.is_finite() && self.sample_rate_hz > 0.0) {
            return Err(DspError::InvalidSampleRate(self.sample_rate_hz));
        }
        if !(self.sweep_time_s.is_finite() && self.sweep_time_s > 0.0) {
            return Err(DspError::InvalidParameter(format!(
                "sweep time must be positive, got {} s",
                self.sweep_time_s
            )));
        }
        let alpha = self.chirp_rate();
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(DspError::InvalidChirpRate(alpha));
        }
        if !self.center_freq_hz.is_finite() {
            return Err(DspError::InvalidParameter(format!(
                "center frequency must be finite, got {}",
                self.center_freq_hz
            )));
        }
        if !(self.delay_s.is_finite() && self.delay_s >= 0.0) {
            return Err(DspError::InvalidParameter(format!(
                "target delay must be non-negative, got {} s",
                self.delay_s
            )));
        }
        if !(self.guard_interval_s >= 0.0 && self.guard_interval_s < self.sweep_time_s) {
            return Err(DspError::InvalidParameter(format!(
                "guard interval must lie in [0, {}) s, got {} s",
                self.sweep_time_s, self.guard_interval_s
            )));
        }
        Ok(())
    }
}

impl Default for ChirpParams {
    fn default() -> Self {
        Self::x_band_12km()
    }
}

/// Two-way transit time for `range_m` (s)
pub fn range_to_delay(range_m: f64, speed_of_light: f64) -> f64 {
    2.0 * range_m / speed_of_light
}

/// Builder for [`ChirpParams`], starting from the X-band reference scenario
#[derive(Debug, Clone)]
pub struct ChirpParamsBuilder {
    params: ChirpParams,
    speed_of_light: f64,
}

impl Default for ChirpParamsBuilder {
    fn default() -> Self {
        Self {
            params: ChirpParams::x_band_12km(),
            speed_of_light: SPEED_OF_LIGHT,
        }
    }
}

impl ChirpParamsBuilder {
    pub fn center_freq(mut self, hz: f64) -> Self {
        self.params.center_freq_hz = hz;
        self
    }

    pub fn bandwidth(mut self, hz: f64) -> Self {
        self.params.bandwidth_hz = hz;
        self
    }

    pub fn sweep_time(mut self, seconds: f64) -> Self {
        self.params.sweep_time_s = seconds;
        self
    }

    pub fn sample_rate(mut self, hz: f64) -> Self {
        self.params.sample_rate_hz = hz;
        self
    }

    /// Propagation speed used by `target_range` and `instrumented_range`.
    /// Call it before them.
    pub fn speed_of_light(mut self, mps: f64) -> Self {
        self.speed_of_light = mps;
        self
    }

    pub fn delay(mut self, seconds: f64) -> Self {
        self.params.delay_s = seconds;
        self
    }

    pub fn target_range(mut self, meters: f64) -> Self {
        self.params.delay_s = range_to_delay(meters, self.speed_of_light);
        self
    }

    pub fn guard_interval(mut self, seconds: f64) -> Self {
        self.params.guard_interval_s = seconds;
        self
    }

    pub fn instrumented_range(mut self, meters: f64) -> Self {
        self.params.guard_interval_s = range_to_delay(meters, self.speed_of_light);
        self
    }

    /// Build without validation
    pub fn build(self) -> ChirpParams {
        self.params
    }

    pub fn try_build(self) -> DspResult<ChirpParams> {
        self.params.validate()?;
        Ok(self.params)
    }
}

/// Point-target FMCW signal generator with an injected sweep nonlinearity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FmcwSignalModel {
    params: ChirpParams,
    phase_error: PhaseError,
}

impl FmcwSignalModel {
    pub fn new(params: ChirpParams, phase_error: PhaseError) -> Self {
        Self {
            params,
            phase_error,
        }
    }

    pub fn params(&self) -> &ChirpParams {
        &self.params
    }

    pub fn phase_error(&self) -> &PhaseError {
        &self.phase_error
    }

    // ----------------------------------------------------------------
    // Continuous-time signals
    // ----------------------------------------------------------------

    /// Ideal transmit chirp, non-zero on `[-T/2, T/2)`
    pub fn transmit_ideal(&self, t: f64) -> Complex {
        let half = 0.5 * self.params.sweep_time_s;
        if t < -half || t >= half {
            return Complex::new(0.0, 0.0);
        }
        let phase = 2.0
            * PI
            * (self.params.center_freq_hz * t + 0.5 * self.params.chirp_rate() * t * t);
        cis(phase)
    }

    /// Transmit chirp including the phase error
    pub fn transmit(&self, t: f64) -> Complex {
        self.transmit_ideal(t) * self.phase_error.exponential(t)
    }

    /// Ideal beat signal `s_tx(t) conj(s_tx(t - tau))`
    pub fn beat_ideal(&self, t: f64) -> Complex {
        self.transmit_ideal(t) * self.transmit_ideal(t - self.params.delay_s).conj()
    }

    /// Beat signal with the phase error on both the transmitted and the
    /// delayed copy
    pub fn beat(&self, t: f64) -> Complex {
        self.transmit(t) * self.transmit(t - self.params.delay_s).conj()
    }

    // ----------------------------------------------------------------
    // Sampled signals (N samples on the centered grid)
    // ----------------------------------------------------------------

    fn sampled<F>(&self, f: F) -> SampledSignal
    where
        F: FnMut(f64) -> Complex,
    {
        SampledSignal::from_fn(self.params.num_samples(), self.params.sample_rate_hz, f)
    }

    pub fn transmit_signal(&self) -> SampledSignal {
        self.sampled(|t| self.transmit(t))
    }

    pub fn ideal_beat_signal(&self) -> SampledSignal {
        self.sampled(|t| self.beat_ideal(t))
    }

    pub fn beat_signal(&self) -> SampledSignal {
        self.sampled(|t| self.beat(t))
    }

    /// `exp(j e(t))` on the sweep grid
    pub fn phase_error_signal(&self) -> SampledSignal {
        self.phase_error
            .sample(self.params.num_samples(), self.params.sample_rate_hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn small_params() -> ChirpParams {
        ChirpParams::builder()
            .center_freq(1.0e9)
            .bandwidth(10.0e6)
            .sweep_time(100.0e-6)
            .sample_rate(5.0e6)
            .delay(20.0e-6)
            .guard_interval(25.0e-6)
            .build()
    }

    #[test]
    fn test_reference_scenario_derived_quantities() {
        let p = ChirpParams::x_band_12km();
        assert_relative_eq!(p.chirp_rate(), 1.0e11, max_relative = 1e-12);
        assert_relative_eq!(p.delay_s, 80.0e-6, max_relative = 1e-12);
        assert_relative_eq!(p.beat_freq_hz(), 8.0e6, max_relative = 1e-12);
        assert_relative_eq!(p.guard_interval_s, 100.0e-6, max_relative = 1e-12);
        assert_eq!(p.num_samples(), 12_500);
        assert_eq!(p.processed_samples(), 10_000);
        assert_relative_eq!(p.coherent_time_s(), 400.0e-6, max_relative = 1e-12);
        assert_eq!(p.fft_len(), 32_768);
        assert_relative_eq!(p.range_resolution(SPEED_OF_LIGHT), 3.0, max_relative = 1e-12);
        assert_relative_eq!(
            p.beat_freq_to_range(p.beat_freq_hz(), SPEED_OF_LIGHT),
            12.0e3,
            max_relative = 1e-12
        );
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_builder_ranges() {
        let p = ChirpParams::builder()
            .speed_of_light(1.5e8)
            .target_range(3.0e3)
            .instrumented_range(6.0e3)
            .build();
        assert_relative_eq!(p.delay_s, 40.0e-6, max_relative = 1e-12);
        assert_relative_eq!(p.guard_interval_s, 80.0e-6, max_relative = 1e-12);
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            ChirpParams::builder().sample_rate(0.0).try_build(),
            Err(DspError::InvalidSampleRate(0.0))
        );
        assert!(matches!(
            ChirpParams::builder().bandwidth(-1.0).try_build(),
            Err(DspError::InvalidChirpRate(_))
        ));
        assert!(ChirpParams::builder().guard_interval(1.0).try_build().is_err());
        assert!(ChirpParams::builder().delay(-1.0e-6).try_build().is_err());
        // Delay beyond the sweep period is a valid, degenerate configuration
        assert!(ChirpParams::builder().delay(1.0e-3).try_build().is_ok());
    }

    #[test]
    fn test_transmit_support() {
        let model = FmcwSignalModel::new(small_params(), PhaseError::Zero);
        assert_relative_eq!(model.transmit_ideal(0.0).norm(), 1.0);
        assert_relative_eq!(model.transmit_ideal(-50.0e-6).norm(), 1.0);
        assert_eq!(model.transmit_ideal(50.0e-6), Complex::new(0.0, 0.0));
        assert_eq!(model.transmit_ideal(-60.0e-6), Complex::new(0.0, 0.0));
    }

    #[test]
    fn test_beat_signal_frequency() {
        // Inside the overlap the ideal beat phase advances at fb
        let params = small_params();
        let model = FmcwSignalModel::new(params, PhaseError::Zero);
        let fb = params.beat_freq_hz();
        let dt = 1.0e-8;
        let t = 10.0e-6;
        let dphi = (model.beat_ideal(t + dt) * model.beat_ideal(t).conj()).arg();
        assert_relative_eq!(dphi / (2.0 * PI * dt), fb, max_relative = 1e-4);
    }

    #[test]
    fn test_beat_leading_zeros_cover_delay() {
        let params = small_params();
        let model = FmcwSignalModel::new(params, PhaseError::Zero);
        let beat = model.ideal_beat_signal();
        let delay_samples = (params.delay_s * params.sample_rate_hz).round() as usize;
        assert_eq!(beat.len(), params.num_samples());
        assert!(beat.samples()[..delay_samples].iter().all(|s| s.norm() == 0.0));
        // The sample at exactly t - tau = -T/2 sits on the window edge
        assert!(beat.samples()[delay_samples + 1..]
            .iter()
            .all(|s| (s.norm() - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_delay_beyond_period_gives_zero_beat() {
        let params = ChirpParams::builder().delay(600.0e-6).build();
        let model = FmcwSignalModel::new(
            params,
            PhaseError::sinusoidal_relative(0.5, 0.05, params.chirp_rate()),
        );
        let beat = model.beat_signal();
        assert_eq!(beat.len(), params.num_samples());
        assert!(beat.samples().iter().all(|s| *s == Complex::new(0.0, 0.0)));
    }

    #[test]
    fn test_delay_equal_to_sweep_gives_zero_beat() {
        // Half-open support: the echo starts exactly where the sweep ends
        let params = ChirpParams::builder().delay(500.0e-6).build();
        assert_eq!(params.delay_s, params.sweep_time_s);
        assert!(params.validate().is_ok());
        let model = FmcwSignalModel::new(params, PhaseError::Zero);
        for beat in [model.beat_signal(), model.ideal_beat_signal()] {
            assert_eq!(beat.len(), params.num_samples());
            assert!(beat.samples().iter().all(|s| *s == Complex::new(0.0, 0.0)));
        }
    }

    #[test]
    fn test_sampled_transmit_and_error() {
        let params = small_params();
        let error = PhaseError::sinusoidal_relative(0.5, 0.1, params.chirp_rate());
        let model = FmcwSignalModel::new(params, error);

        let tx = model.transmit_signal();
        let e = model.phase_error_signal();
        assert_eq!(tx.len(), params.num_samples());
        assert_eq!(e.len(), tx.len());
        // Every grid time lies inside [-T/2, T/2), so the chirp has unit modulus
        assert!(tx.samples().iter().all(|s| (s.norm() - 1.0).abs() < 1e-12));
        for n in [0, tx.len() / 3, tx.len() - 1] {
            let t = tx.time_at(n);
            assert!((tx.samples()[n] - model.transmit(t)).norm() < 1e-12);
            assert!((e.samples()[n] - error.exponential(t)).norm() < 1e-12);
        }
    }

    #[test]
    fn test_zero_error_beat_matches_ideal() {
        let model = FmcwSignalModel::new(small_params(), PhaseError::Zero);
        assert_eq!(model.beat_signal(), model.ideal_beat_signal());
    }

    #[test]
    fn test_corrupted_beat_carries_both_error_terms() {
        let params = small_params();
        let error = PhaseError::Cubic { k3: 1.0e12 };
        let model = FmcwSignalModel::new(params, error);
        let t = 30.0e-6;
        let expected = model.beat_ideal(t)
            * error.exponential(t)
            * error.exponential(t - params.delay_s).conj();
        assert_relative_eq!((model.beat(t) - expected).norm(), 0.0, epsilon = 1e-9);
    }
}
