//! # Configuration
//!
//! YAML configuration for compensation runs: radar geometry, the injected
//! phase error, spectrum analysis settings and logging.
//!
//! ## Search path
//!
//! The first file found wins:
//! 1. Path in the `NLC_CONFIG` environment variable
//! 2. `./nlc.yaml`
//! 3. `config.yaml` in the user config directory (`~/.config/nlc/` on Linux)
//! 4. `/etc/nlc/config.yaml`
//!
//! Missing files are not an error; the X-band reference scenario is used.
//!
//! ## Example
//!
//! ```yaml
//! radar:
//!   center_freq_hz: 10.0e9
//!   bandwidth_hz: 50.0e6
//!   sweep_time_s: 500.0e-6
//!   sample_rate_hz: 25.0e6
//!   target_range_m: 12000.0
//!   instrumented_range_m: 15000.0
//!
//! phase_error:
//!   kind: sinusoidal
//!   amplitude_rad: 0.5
//!   ripple_ratio: 0.4
//!
//! analysis:
//!   window: rectangular
//!   search_margin_hz: 20000.0
//!
//! logging:
//!   level: debug
//!   format: compact
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::filters::Window;
use crate::fmcw_radar::{ChirpParams, SPEED_OF_LIGHT};
use crate::observe::LogConfig;
use crate::phase_error::PhaseError;
use crate::types::DspError;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "NLC_CONFIG";

/// Error type for configuration operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NotFound(String),
    ReadError(String),
    ParseError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(msg) => write!(f, "config not found: {}", msg),
            ConfigError::ReadError(msg) => write!(f, "failed to read config: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "failed to parse config: {}", msg),
            ConfigError::ValidationError(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<DspError> for ConfigError {
    fn from(e: DspError) -> Self {
        ConfigError::ValidationError(e.to_string())
    }
}

/// Sweep and target geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub center_freq_hz: f64,
    pub bandwidth_hz: f64,
    pub sweep_time_s: f64,
    pub sample_rate_hz: f64,
    pub target_range_m: f64,
    /// Maximum range of interest; sets the guard interval `taumax`
    pub instrumented_range_m: f64,
    pub speed_of_light_mps: f64,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            center_freq_hz: 10.0e9,
            bandwidth_hz: 50.0e6,
            sweep_time_s: 500.0e-6,
            sample_rate_hz: 25.0e6,
            target_range_m: 12.0e3,
            instrumented_range_m: 15.0e3,
            speed_of_light_mps: SPEED_OF_LIGHT,
        }
    }
}

/// Shape of the injected phase error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseErrorKind {
    Zero,
    #[default]
    Sinusoidal,
    Cubic,
    Quartic,
}

/// Phase error section.
///
/// The sinusoid is always resolved first: `ripple_freq_hz` if set, else
/// `ripple_ratio * sqrt(alpha)`. Cubic and quartic errors without an explicit
/// coefficient get the same maximum frequency error as that sinusoid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseErrorConfig {
    pub kind: PhaseErrorKind,
    pub amplitude_rad: f64,
    /// Ripple frequency as a fraction of `sqrt(alpha)`
    pub ripple_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ripple_freq_hz: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k3: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k4: Option<f64>,
}

impl Default for PhaseErrorConfig {
    fn default() -> Self {
        Self {
            kind: PhaseErrorKind::Sinusoidal,
            amplitude_rad: 0.5,
            ripple_ratio: 0.05,
            ripple_freq_hz: None,
            k3: None,
            k4: None,
        }
    }
}

impl PhaseErrorConfig {
    fn sinusoid(&self, chirp_rate: f64) -> PhaseError {
        match self.ripple_freq_hz {
            Some(ripple_freq_hz) => PhaseError::Sinusoidal {
                amplitude_rad: self.amplitude_rad,
                ripple_freq_hz,
            },
            None => PhaseError::sinusoidal_relative(self.amplitude_rad, self.ripple_ratio, chirp_rate),
        }
    }

    /// Resolve into a [`PhaseError`] for the given sweep
    pub fn resolve(&self, chirp_rate: f64, sweep_time_s: f64) -> PhaseError {
        let sine = self.sinusoid(chirp_rate);
        let df_max = sine.max_frequency_error_hz(sweep_time_s);
        match self.kind {
            PhaseErrorKind::Zero => PhaseError::Zero,
            PhaseErrorKind::Sinusoidal => sine,
            PhaseErrorKind::Cubic => match self.k3 {
                Some(k3) => PhaseError::Cubic { k3 },
                None => PhaseError::cubic_matching(df_max, sweep_time_s),
            },
            PhaseErrorKind::Quartic => match self.k4 {
                Some(k4) => PhaseError::Quartic { k4 },
                None => PhaseError::quartic_matching(df_max, sweep_time_s),
            },
        }
    }
}

/// Spectrum analysis section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub window: Window,
    /// Half width around the peak treated as main lobe (Hz). Derived from
    /// the window when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusion_hz: Option<f64>,
    /// Sidelobe search half width (Hz). Derived from the ripple when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_hz: Option<f64>,
    /// Added to three ripple frequencies when deriving the search span (Hz)
    pub search_margin_hz: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window: Window::Hamming,
            exclusion_hz: None,
            search_hz: None,
            search_margin_hz: 20.0e3,
        }
    }
}

impl AnalysisConfig {
    /// Main-lobe half width excluded from the sidelobe search.
    ///
    /// Without an explicit value this is the window's first null over the
    /// coherent time plus one FFT bin, since the peak bin may sit up to half
    /// a bin away from the true tone.
    pub fn exclusion_span_hz(&self, params: &ChirpParams) -> f64 {
        if let Some(span) = self.exclusion_hz {
            return span;
        }
        let bin_hz = params.sample_rate_hz / params.fft_len() as f64;
        self.window.main_lobe_half_width_bins() / params.coherent_time_s() + bin_hz
    }

    /// Sidelobe search half width for a given phase error.
    ///
    /// Paired echoes of a sinusoidal ripple sit at multiples of its frequency;
    /// the first three are covered. Other errors use ten times the margin.
    pub fn search_span_hz(&self, phase_error: &PhaseError) -> f64 {
        if let Some(span) = self.search_hz {
            return span;
        }
        match phase_error.ripple_frequency_hz() {
            Some(fsl) => 3.0 * fsl + self.search_margin_hz,
            None => 10.0 * self.search_margin_hz,
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NlcConfig {
    pub version: String,
    pub radar: RadarConfig,
    pub phase_error: PhaseErrorConfig,
    pub analysis: AnalysisConfig,
    pub logging: LogConfig,
}

impl Default for NlcConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            radar: RadarConfig::default(),
            phase_error: PhaseErrorConfig::default(),
            analysis: AnalysisConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl NlcConfig {
    /// Load configuration from the default search path.
    ///
    /// Returns the default config if no file is found. A path named by
    /// `NLC_CONFIG` that does not exist is an error.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(ConfigError::NotFound(format!(
                    "{} points to {}",
                    CONFIG_ENV_VAR,
                    path.display()
                )));
            }
            return Self::load_from(&path);
        }

        match Self::config_search_paths().into_iter().find(|p| p.exists()) {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_yaml()?;
        std::fs::write(path, content)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))
    }

    /// Files probed by [`NlcConfig::load`] after the environment variable
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./nlc.yaml")];
        if let Some(dirs) = directories::ProjectDirs::from("", "", "nlc") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }
        paths.push(PathBuf::from("/etc/nlc/config.yaml"));
        paths
    }

    /// Sweep parameters, without validation
    pub fn chirp_params(&self) -> ChirpParams {
        let r = &self.radar;
        ChirpParams::builder()
            .center_freq(r.center_freq_hz)
            .bandwidth(r.bandwidth_hz)
            .sweep_time(r.sweep_time_s)
            .sample_rate(r.sample_rate_hz)
            .speed_of_light(r.speed_of_light_mps)
            .target_range(r.target_range_m)
            .instrumented_range(r.instrumented_range_m)
            .build()
    }

    pub fn phase_error(&self) -> PhaseError {
        self.phase_error
            .resolve(self.chirp_params().chirp_rate(), self.radar.sweep_time_s)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radar.speed_of_light_mps.is_finite() && self.radar.speed_of_light_mps > 0.0) {
            return Err(ConfigError::ValidationError(
                "speed_of_light_mps must be positive".to_string(),
            ));
        }
        self.chirp_params().validate()?;

        let pe = &self.phase_error;
        if !pe.amplitude_rad.is_finite() {
            return Err(ConfigError::ValidationError(
                "phase_error.amplitude_rad must be finite".to_string(),
            ));
        }
        let ripple_ok = match pe.ripple_freq_hz {
            Some(f) => f.is_finite() && f >= 0.0,
            None => pe.ripple_ratio.is_finite() && pe.ripple_ratio >= 0.0,
        };
        if !ripple_ok {
            return Err(ConfigError::ValidationError(
                "phase_error ripple frequency must be non-negative".to_string(),
            ));
        }
        if pe.k3.map_or(false, |k| !k.is_finite()) || pe.k4.map_or(false, |k| !k.is_finite()) {
            return Err(ConfigError::ValidationError(
                "phase_error.k3/k4 must be finite".to_string(),
            ));
        }

        let an = &self.analysis;
        if an.exclusion_hz.map_or(false, |e| !(e > 0.0)) {
            return Err(ConfigError::ValidationError(
                "analysis.exclusion_hz must be positive".to_string(),
            ));
        }
        if an.search_span_hz(&self.phase_error()) <= an.exclusion_span_hz(&self.chirp_params()) {
            return Err(ConfigError::ValidationError(
                "analysis search span must exceed exclusion_hz".to_string(),
            ));
        }
        Ok(())
    }

    /// Example file with every section filled in
    pub fn example_yaml() -> String {
        let config = Self {
            phase_error: PhaseErrorConfig {
                ripple_ratio: 0.4,
                ..Default::default()
            },
            ..Default::default()
        };
        config.to_yaml().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::{LogFormat, LogLevel};
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config_is_reference_scenario() {
        let config = NlcConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chirp_params(), ChirpParams::x_band_12km());
        assert_eq!(
            config.phase_error(),
            PhaseError::sinusoidal_relative(0.5, 0.05, config.chirp_params().chirp_rate())
        );
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
radar:
  sample_rate_hz: 50.0e6
  target_range_m: 6000.0
phase_error:
  kind: quartic
  amplitude_rad: 0.25
  ripple_ratio: 0.2
analysis:
  window: blackman
  search_hz: 150000.0
logging:
  level: debug
  format: compact
"#;
        let config = NlcConfig::parse(yaml).unwrap();
        let params = config.chirp_params();
        assert_eq!(params.sample_rate_hz, 50.0e6);
        assert_relative_eq!(params.delay_s, 40.0e-6, max_relative = 1e-12);
        assert_eq!(params.bandwidth_hz, 50.0e6);
        assert_eq!(config.analysis.window, Window::Blackman);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.validate().is_ok());

        // Quartic matched to A * fsl of the configured sinusoid
        let df_max = 0.25 * 0.2 * 1.0e11_f64.sqrt();
        let pe = config.phase_error();
        assert!(matches!(pe, PhaseError::Quartic { .. }));
        assert_relative_eq!(pe.max_frequency_error_hz(500.0e-6), df_max, max_relative = 1e-12);
    }

    #[test]
    fn test_explicit_coefficients_and_ripple_frequency() {
        let config = NlcConfig::parse("phase_error:\n  kind: cubic\n  k3: 1.0e12\n").unwrap();
        assert_eq!(config.phase_error(), PhaseError::Cubic { k3: 1.0e12 });

        let config =
            NlcConfig::parse("phase_error:\n  ripple_freq_hz: 30000.0\n  ripple_ratio: 0.9\n").unwrap();
        assert_eq!(config.phase_error().ripple_frequency_hz(), Some(30000.0));

        let config = NlcConfig::parse("phase_error:\n  kind: zero\n").unwrap();
        assert!(config.phase_error().is_zero());
    }

    #[test]
    fn test_search_span() {
        let analysis = AnalysisConfig::default();
        let sine = PhaseError::Sinusoidal {
            amplitude_rad: 0.5,
            ripple_freq_hz: 10.0e3,
        };
        assert_relative_eq!(analysis.search_span_hz(&sine), 50.0e3);
        assert_relative_eq!(analysis.search_span_hz(&PhaseError::Zero), 200.0e3);
        let fixed = AnalysisConfig {
            search_hz: Some(1.0e3),
            ..Default::default()
        };
        assert_eq!(fixed.search_span_hz(&sine), 1.0e3);
    }

    #[test]
    fn test_exclusion_follows_window() {
        let params = ChirpParams::x_band_12km();
        let bin_hz = 25.0e6 / 32768.0;
        let span = |window| {
            AnalysisConfig {
                window,
                ..Default::default()
            }
            .exclusion_span_hz(&params)
        };
        // First nulls at 1/T and 2/T over the 400 us coherent time
        assert_relative_eq!(span(Window::Rectangular), 2.5e3 + bin_hz, max_relative = 1e-9);
        assert_relative_eq!(span(Window::Hamming), 5.0e3 + bin_hz, max_relative = 1e-9);
        assert_relative_eq!(span(Window::Blackman), 7.5e3 + bin_hz, max_relative = 1e-9);

        let fixed = AnalysisConfig {
            exclusion_hz: Some(8.0e3),
            window: Window::Rectangular,
            ..Default::default()
        };
        assert_eq!(fixed.exclusion_span_hz(&params), 8.0e3);
    }

    #[test]
    fn test_validation() {
        let mut config = NlcConfig::default();
        config.radar.sample_rate_hz = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

        let mut config = NlcConfig::default();
        config.radar.instrumented_range_m = 100.0e3;
        assert!(config.validate().is_err());

        let mut config = NlcConfig::default();
        config.analysis.search_hz = Some(1.0e3);
        assert!(config.validate().is_err());

        let mut config = NlcConfig::default();
        config.phase_error.ripple_ratio = -0.1;
        assert!(config.validate().is_err());

        let mut config = NlcConfig::default();
        config.analysis.exclusion_hz = Some(0.0);
        assert!(config.validate().is_err());

        // Target beyond the sweep is still a valid configuration
        let mut config = NlcConfig::default();
        config.radar.target_range_m = 90.0e3;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_error() {
        let err = NlcConfig::parse("radar: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        assert!(err.to_string().starts_with("failed to parse config"));
    }

    #[test]
    fn test_example_yaml_round_trip() {
        let yaml = NlcConfig::example_yaml();
        assert!(yaml.contains("ripple_ratio: 0.4"));
        let parsed = NlcConfig::parse(&yaml).unwrap();
        assert_eq!(parsed.phase_error.ripple_ratio, 0.4);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_from() {
        let path = std::env::temp_dir().join(format!("nlc-config-test-{}.yaml", std::process::id()));
        let mut config = NlcConfig::default();
        config.radar.target_range_m = 9.0e3;
        config.save(&path).unwrap();
        let loaded = NlcConfig::load_from(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);

        let missing = NlcConfig::load_from(&path).unwrap_err();
        assert!(matches!(missing, ConfigError::ReadError(_)));
    }

    #[test]
    fn test_config_search_paths() {
        let paths = NlcConfig::config_search_paths();
        assert_eq!(paths.first(), Some(&PathBuf::from("./nlc.yaml")));
        assert_eq!(paths.last(), Some(&PathBuf::from("/etc/nlc/config.yaml")));
    }
}
