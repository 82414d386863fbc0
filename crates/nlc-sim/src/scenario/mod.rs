//! Comparison scenario for sweep-nonlinearity compensation
//!
//! Runs the signal model through both compensation algorithms and the
//! spectral transform, producing the ideal, uncorrected, narrowband and
//! wideband range spectra of a single point target.

pub mod config;
pub mod engine;
pub mod result;

pub use config::ScenarioConfig;
pub use engine::{run_comparison, ComparisonEngine};
pub use result::{ComparisonResult, ComparisonSummary, SpectrumKind, SpectrumSummary};
