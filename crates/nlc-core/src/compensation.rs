//! Sweep-nonlinearity compensation
//!
//! Removes the range-dependent smearing that a known phase error `e(t)`
//! causes in the beat spectrum. Both algorithms share the first two stages:
//!
//! ```text
//!            ┌──────────────┐   ┌────────┐   ┌──────────────────────────┐
//! s_b(t) ──▶ │ × exp(-j e)  │──▶│ deskew │──▶│ × exp(j e)        (NB)   │──▶ corrected
//!            └──────────────┘   └────────┘   │ × deskew(exp(j e)) (WB)  │
//!                                            └──────────────────────────┘
//! ```
//!
//! 1. Multiplying by `exp(-j e(t))` removes the error carried by the
//!    undelayed transmit copy.
//! 2. The deskew filter shifts each beat frequency `fb` by `-fb/alpha = -tau`,
//!    so the delayed error term `e(t - tau)` of every target is moved back to
//!    `e(t)`, independent of range.
//! 3. The remaining error is removed by one of:
//!    - **Narrowband** (Burgos-Garcia et al.): multiply by `exp(j e(t))`. This
//!      ignores the dispersion the deskew filter applies to the error term
//!      itself, valid while the error's spectral content stays well below
//!      `sqrt(alpha)`.
//!    - **Wideband** (Meta et al.): multiply by the deskewed error
//!      `deskew(exp(j e(t)))`, which undergoes the same dispersion.
//!
//! ## References
//!
//! - Burgos-Garcia et al., *Digital on-line compensation of errors induced by
//!   linear distortion in broadband FM radars*, Electron. Lett. 39(1), 2003
//! - Meta et al., *Range non-linearities correction in FMCW SAR*, IGARSS 2006

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::deskew::DeskewFilter;
use crate::phase_error::PhaseError;
use crate::spectral::SampledSignal;
use crate::types::DspResult;

/// Final-stage variant of the compensation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompensationMethod {
    /// Re-apply the raw error exponential
    Narrowband,
    /// Re-apply the deskew-filtered error exponential
    Wideband,
}

impl fmt::Display for CompensationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompensationMethod::Narrowband => write!(f, "narrowband"),
            CompensationMethod::Wideband => write!(f, "wideband"),
        }
    }
}

/// Output of [`PhaseErrorCompensator::compensate_both`]
#[derive(Debug, Clone, PartialEq)]
pub struct CompensatedPair {
    pub narrowband: SampledSignal,
    pub wideband: SampledSignal,
}

/// Compensator for a known phase error at a given chirp rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseErrorCompensator {
    phase_error: PhaseError,
    deskew: DeskewFilter,
}

impl PhaseErrorCompensator {
    /// # Panics
    /// If `chirp_rate` is not positive.
    pub fn new(phase_error: PhaseError, chirp_rate: f64) -> Self {
        Self {
            phase_error,
            deskew: DeskewFilter::new(chirp_rate),
        }
    }

    pub fn phase_error(&self) -> &PhaseError {
        &self.phase_error
    }

    pub fn chirp_rate(&self) -> f64 {
        self.deskew.chirp_rate()
    }

    /// `exp(j e(t))` on the grid of `beat`
    fn error_like(&self, beat: &SampledSignal) -> SampledSignal {
        self.phase_error.sample(beat.len(), beat.sample_rate())
    }

    /// Stage 1: remove the error of the undelayed transmit copy
    pub fn remove_transmit_error(&self, beat: &SampledSignal) -> DspResult<SampledSignal> {
        beat.multiply(&self.error_like(beat).conj())
    }

    /// Stages 1 and 2: error removal followed by deskewing
    pub fn deskewed(&self, beat: &SampledSignal) -> DspResult<SampledSignal> {
        let stripped = self.remove_transmit_error(beat)?;
        Ok(self.deskew.apply(&stripped))
    }

    /// Deskew-filtered error exponential used by the wideband correction
    pub fn deskewed_error(&self, len: usize, sample_rate: f64) -> SampledSignal {
        self.deskew.apply(&self.phase_error.sample(len, sample_rate))
    }

    /// Narrowband (Burgos-Garcia) correction
    pub fn narrowband(&self, beat: &SampledSignal) -> DspResult<SampledSignal> {
        debug!(len = beat.len(), "narrowband compensation");
        self.deskewed(beat)?.multiply(&self.error_like(beat))
    }

    /// Wideband (Meta) correction
    pub fn wideband(&self, beat: &SampledSignal) -> DspResult<SampledSignal> {
        debug!(len = beat.len(), "wideband compensation");
        let reference = self.deskewed_error(beat.len(), beat.sample_rate());
        self.deskewed(beat)?.multiply(&reference)
    }

    pub fn compensate(&self, beat: &SampledSignal, method: CompensationMethod) -> DspResult<SampledSignal> {
        match method {
            CompensationMethod::Narrowband => self.narrowband(beat),
            CompensationMethod::Wideband => self.wideband(beat),
        }
    }

    /// Both corrections, sharing the first two stages
    pub fn compensate_both(&self, beat: &SampledSignal) -> DspResult<CompensatedPair> {
        let deskewed = self.deskewed(beat)?;
        let reference = self.deskewed_error(beat.len(), beat.sample_rate());
        Ok(CompensatedPair {
            narrowband: deskewed.multiply(&self.error_like(beat))?,
            wideband: deskewed.multiply(&reference)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deskew::deskew;
    use crate::fmcw_radar::{ChirpParams, FmcwSignalModel};
    use crate::types::complex_ops::max_abs_diff;

    /// Scaled-down sweep so the tests stay fast in debug builds
    fn small_params() -> ChirpParams {
        ChirpParams::builder()
            .center_freq(1.0e9)
            .bandwidth(10.0e6)
            .sweep_time(200.0e-6)
            .sample_rate(5.0e6)
            .delay(30.0e-6)
            .guard_interval(40.0e-6)
            .build()
    }

    #[test]
    fn test_stage_one_removes_transmit_error_only() {
        let params = small_params();
        let error = PhaseError::sinusoidal_relative(0.4, 0.1, params.chirp_rate());
        let model = FmcwSignalModel::new(params, error);
        let comp = PhaseErrorCompensator::new(error, params.chirp_rate());

        let beat = model.beat_signal();
        let stripped = comp.remove_transmit_error(&beat).unwrap();
        let by_hand = beat.multiply(&model.phase_error_signal().conj()).unwrap();
        assert_eq!(stripped, by_hand);
        let expected = SampledSignal::from_fn(params.num_samples(), params.sample_rate_hz, |t| {
            model.beat_ideal(t) * error.exponential(t - params.delay_s).conj()
        });
        let err = max_abs_diff(stripped.samples(), expected.samples());
        assert!(err < 1e-9, "stage 1 error {:.3e}", err);
    }

    #[test]
    fn test_zero_error_narrowband_is_plain_deskew() {
        let params = small_params();
        let model = FmcwSignalModel::new(params, PhaseError::Zero);
        let beat = model.beat_signal();
        let comp = PhaseErrorCompensator::new(PhaseError::Zero, params.chirp_rate());

        let corrected = comp.narrowband(&beat).unwrap();
        let reference = deskew(&beat, params.chirp_rate());
        let err = max_abs_diff(corrected.samples(), reference.samples());
        assert!(err < 1e-12, "zero-error narrowband deviates by {:.3e}", err);
    }

    #[test]
    fn test_zero_error_wideband_reference_is_near_unity_inside_sweep() {
        // deskew(1) only departs from 1 in Fresnel ripples at the sweep edges
        let params = ChirpParams::x_band_12km();
        let comp = PhaseErrorCompensator::new(PhaseError::Zero, params.chirp_rate());
        let n = params.num_samples();
        let reference = comp.deskewed_error(n, params.sample_rate_hz);
        let worst = reference.samples()[500..n - 500]
            .iter()
            .map(|s| (*s - 1.0).norm())
            .fold(0.0_f64, f64::max);
        assert!(worst < 0.05, "deskewed unit error deviates by {:.3}", worst);
    }

    #[test]
    fn test_compensate_dispatch_and_shared_stages() {
        let params = small_params();
        let error = PhaseError::cubic_matching(5.0e3, params.sweep_time_s);
        let beat = FmcwSignalModel::new(params, error).beat_signal();
        let comp = PhaseErrorCompensator::new(error, params.chirp_rate());

        let nb = comp.compensate(&beat, CompensationMethod::Narrowband).unwrap();
        let wb = comp.compensate(&beat, CompensationMethod::Wideband).unwrap();
        let both = comp.compensate_both(&beat).unwrap();

        assert_eq!(nb.len(), beat.len());
        assert_eq!(wb.len(), beat.len());
        assert!(max_abs_diff(nb.samples(), both.narrowband.samples()) < 1e-12);
        assert!(max_abs_diff(wb.samples(), both.wideband.samples()) < 1e-12);
    }

    #[test]
    fn test_compensation_is_deterministic() {
        let params = small_params();
        let error = PhaseError::sinusoidal_relative(0.5, 0.3, params.chirp_rate());
        let beat = FmcwSignalModel::new(params, error).beat_signal();
        let comp = PhaseErrorCompensator::new(error, params.chirp_rate());
        assert_eq!(comp.wideband(&beat).unwrap(), comp.wideband(&beat).unwrap());
        assert_eq!(comp.narrowband(&beat).unwrap(), comp.narrowband(&beat).unwrap());
    }

    #[test]
    fn test_input_is_not_modified() {
        let params = small_params();
        let error = PhaseError::Quartic { k4: 1.0e16 };
        let beat = FmcwSignalModel::new(params, error).beat_signal();
        let copy = beat.clone();
        let comp = PhaseErrorCompensator::new(error, params.chirp_rate());
        let _ = comp.compensate_both(&beat).unwrap();
        assert_eq!(beat, copy);
    }

    #[test]
    fn test_method_display_and_serde() {
        assert_eq!(CompensationMethod::Narrowband.to_string(), "narrowband");
        let m: CompensationMethod = serde_yaml::from_str("wideband").unwrap();
        assert_eq!(m, CompensationMethod::Wideband);
    }
}
