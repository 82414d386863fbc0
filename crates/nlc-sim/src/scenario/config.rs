//! Comparison scenario configuration
//!
//! Resolved form of [`NlcConfig`]: concrete sweep parameters and a concrete
//! phase error instead of the user-facing ranges and ratios.

use nlc_core::config::{AnalysisConfig, ConfigError, NlcConfig};
use nlc_core::fmcw_radar::ChirpParams;
use nlc_core::phase_error::PhaseError;
use serde::{Deserialize, Serialize};

/// Configuration for the comparison engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub params: ChirpParams,
    pub phase_error: PhaseError,
    pub analysis: AnalysisConfig,
}

impl Default for ScenarioConfig {
    /// X-band reference scenario with a 0.5 rad ripple at `0.05 sqrt(alpha)`
    fn default() -> Self {
        Self::reference(0.05)
    }
}

impl ScenarioConfig {
    /// Reference scenario with a 0.5 rad sinusoidal error at
    /// `ratio * sqrt(alpha)`
    pub fn reference(ratio: f64) -> Self {
        let params = ChirpParams::x_band_12km();
        Self {
            params,
            phase_error: PhaseError::sinusoidal_relative(0.5, ratio, params.chirp_rate()),
            analysis: AnalysisConfig::default(),
        }
    }

    /// Validate and resolve a loaded configuration
    pub fn from_config(config: &NlcConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            params: config.chirp_params(),
            phase_error: config.phase_error(),
            analysis: config.analysis.clone(),
        })
    }

    pub fn with_phase_error(mut self, phase_error: PhaseError) -> Self {
        self.phase_error = phase_error;
        self
    }

    pub fn with_params(mut self, params: ChirpParams) -> Self {
        self.params = params;
        self
    }

    /// Sidelobe search half width for this scenario's error
    pub fn search_span_hz(&self) -> f64 {
        self.analysis.search_span_hz(&self.phase_error)
    }

    /// Main-lobe exclusion for this scenario's window and sweep
    pub fn exclusion_span_hz(&self) -> f64 {
        self.analysis.exclusion_span_hz(&self.params)
    }
}
