//! # FMCW Sweep-Nonlinearity Compensation
//!
//! DSP building blocks for removing the range-dependent smearing that a
//! nonlinear frequency sweep causes in the beat spectrum of an FMCW radar.
//!
//! ## Overview
//!
//! - **Spectral transform pair**: Fourier transform of a finite-support
//!   signal sampled on a centered grid, with amplitude in units of time
//! - **Deskew filter**: frequency-dependent delay `-f/alpha` that aligns the
//!   delayed error terms of all ranges
//! - **Signal model**: ideal and phase-error-corrupted transmit and beat
//!   signals of a point target
//! - **Compensation**: narrowband (Burgos-Garcia) and wideband (Meta)
//!   corrections
//! - **Windowing and analysis**: placed Hamming windows, peak and sidelobe
//!   measurements
//!
//! ## Signal Flow
//!
//! ```text
//! s_b(t) → × exp(-j e) → deskew → × exp(j e) | × deskew(exp(j e)) → window → F → S(f)
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use nlc_core::prelude::*;
//!
//! let params = ChirpParams::x_band_12km();
//! let error = PhaseError::sinusoidal_relative(0.5, 0.4, params.chirp_rate());
//! let beat = FmcwSignalModel::new(params, error).beat_signal();
//!
//! let compensator = PhaseErrorCompensator::new(error, params.chirp_rate());
//! let corrected = compensator.wideband(&beat).unwrap();
//!
//! let window = placed_window(
//!     Window::Hamming,
//!     params.processed_samples(),
//!     params.num_samples(),
//!     WindowAlignment::Leading,
//! );
//! let spectrum = corrected.windowed(&window).unwrap().fourier(params.fft_len());
//! let peak = find_peak(&spectrum).unwrap();
//! println!("target at {:.1} kHz", peak.frequency_hz / 1e3);
//! ```

pub mod analysis;
pub mod compensation;
pub mod config;
pub mod deskew;
pub mod fft_utils;
pub mod filters;
pub mod fmcw_radar;
pub mod observe;
pub mod phase_error;
pub mod spectral;
pub mod types;

pub use compensation::{CompensatedPair, CompensationMethod, PhaseErrorCompensator};
pub use config::{ConfigError, NlcConfig};
pub use deskew::{deskew, DeskewFilter};
pub use fmcw_radar::{ChirpParams, FmcwSignalModel};
pub use phase_error::PhaseError;
pub use spectral::{fourier, inverse_fourier, SampledSignal, Spectrum};
pub use types::{Complex, DspError, DspResult, IQSample};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::analysis::{amplitude_db, find_peak, peak_sidelobe_db, SpectralPeak};
    pub use crate::compensation::{CompensationMethod, PhaseErrorCompensator};
    pub use crate::deskew::{deskew, DeskewFilter};
    pub use crate::filters::{placed_window, Window, WindowAlignment};
    pub use crate::fmcw_radar::{ChirpParams, FmcwSignalModel};
    pub use crate::phase_error::PhaseError;
    pub use crate::spectral::{fourier, inverse_fourier, SampledSignal, Spectrum};
    pub use crate::types::{Complex, DspError, DspResult, IQSample};
}
