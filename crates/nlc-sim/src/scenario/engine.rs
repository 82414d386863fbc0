//! Comparison engine: ideal vs uncorrected vs narrowband vs wideband
//!
//! Generates the ideal and corrupted beat signals of one sweep, runs both
//! compensations and evaluates all four range spectra on the deskew grid.
//!
//! ```text
//!  ideal beat ─────────────────────────── trailing window ─▶ F ─▶ ideal
//!  corrupted beat ─┬───────────────────── trailing window ─▶ F ─▶ uncorrected
//!                  └─▶ compensate_both ─┬ leading window ──▶ F ─▶ narrowband
//!                                       └ leading window ──▶ F ─▶ wideband
//! ```
//!
//! With the `parallel` feature the reference and corrected branches run on
//! the rayon pool. Each branch is a pure function of the configuration, so
//! the output is identical either way.

use super::config::ScenarioConfig;
use super::result::ComparisonResult;
use nlc_core::compensation::PhaseErrorCompensator;
use nlc_core::fft_utils::FftProcessor;
use nlc_core::filters::{placed_window, WindowAlignment};
use nlc_core::fmcw_radar::FmcwSignalModel;
use nlc_core::spectral::{fourier_with, SampledSignal, Spectrum};
use nlc_core::types::DspResult;
use tracing::{debug, info, info_span};

/// Runs one comparison for a fixed scenario
#[derive(Debug, Clone)]
pub struct ComparisonEngine {
    config: ScenarioConfig,
    model: FmcwSignalModel,
    compensator: PhaseErrorCompensator,
}

impl ComparisonEngine {
    /// Fails if the sweep parameters are invalid
    pub fn new(config: ScenarioConfig) -> DspResult<Self> {
        config.params.validate()?;
        let model = FmcwSignalModel::new(config.params, config.phase_error);
        let compensator = PhaseErrorCompensator::new(config.phase_error, config.params.chirp_rate());
        Ok(Self {
            config,
            model,
            compensator,
        })
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn model(&self) -> &FmcwSignalModel {
        &self.model
    }

    pub fn compensator(&self) -> &PhaseErrorCompensator {
        &self.compensator
    }

    fn window(&self, alignment: WindowAlignment) -> Vec<f64> {
        let p = &self.config.params;
        placed_window(
            self.config.analysis.window,
            p.processed_samples(),
            p.num_samples(),
            alignment,
        )
    }

    fn spectrum(&self, signal: &SampledSignal, window: &[f64], fft: &mut FftProcessor) -> DspResult<Spectrum> {
        Ok(fourier_with(&signal.windowed(window)?, fft))
    }

    /// Ideal and uncorrected spectra, guard interval at the start
    fn reference_spectra(&self) -> DspResult<(Spectrum, Spectrum)> {
        let window = self.window(WindowAlignment::Trailing);
        let mut fft = FftProcessor::new(self.config.params.fft_len());
        let ideal = self.spectrum(&self.model.ideal_beat_signal(), &window, &mut fft)?;
        let uncorrected = self.spectrum(&self.model.beat_signal(), &window, &mut fft)?;
        debug!("reference spectra done");
        Ok((ideal, uncorrected))
    }

    /// Narrowband and wideband spectra, deskewed data at the start
    fn corrected_spectra(&self) -> DspResult<(Spectrum, Spectrum)> {
        let corrected = self.compensator.compensate_both(&self.model.beat_signal())?;
        let window = self.window(WindowAlignment::Leading);
        let mut fft = FftProcessor::new(self.config.params.fft_len());
        let narrowband = self.spectrum(&corrected.narrowband, &window, &mut fft)?;
        let wideband = self.spectrum(&corrected.wideband, &window, &mut fft)?;
        debug!("corrected spectra done");
        Ok((narrowband, wideband))
    }

    pub fn run(&self) -> DspResult<ComparisonResult> {
        let p = &self.config.params;
        let _span = info_span!(
            "comparison",
            n = p.num_samples(),
            nfft = p.fft_len(),
            beat_freq_hz = p.beat_freq_hz()
        )
        .entered();
        info!(phase_error = ?self.config.phase_error, "starting comparison");

        #[cfg(feature = "parallel")]
        let (reference, corrected) = rayon::join(|| self.reference_spectra(), || self.corrected_spectra());
        #[cfg(not(feature = "parallel"))]
        let (reference, corrected) = (self.reference_spectra(), self.corrected_spectra());

        let (ideal, uncorrected) = reference?;
        let (narrowband, wideband) = corrected?;

        let result = ComparisonResult {
            ideal,
            uncorrected,
            narrowband,
            wideband,
            coherent_time_s: p.coherent_time_s(),
            exclusion_hz: self.config.exclusion_span_hz(),
            search_hz: self.config.search_span_hz(),
        };
        debug!(
            exclusion_hz = result.exclusion_hz,
            search_hz = result.search_hz,
            "comparison finished"
        );
        Ok(result)
    }
}

/// Build and run an engine in one call
pub fn run_comparison(config: ScenarioConfig) -> DspResult<ComparisonResult> {
    ComparisonEngine::new(config)?.run()
}
