//! # Compensation Comparison Simulator
//!
//! Batch comparison of the narrowband and wideband sweep-nonlinearity
//! corrections against the ideal and uncorrected beat spectra.
//!
//! ## Example
//!
//! ```rust,no_run
//! use nlc_core::config::NlcConfig;
//! use nlc_core::observe::init_logging;
//! use nlc_sim::scenario::{run_comparison, ScenarioConfig};
//!
//! let config = NlcConfig::load().unwrap_or_default();
//! init_logging(&config.logging);
//!
//! let scenario = ScenarioConfig::from_config(&config).unwrap();
//! let result = run_comparison(scenario).unwrap();
//! println!("{}", result.summary());
//! ```
//!
//! ## Features
//!
//! - `parallel`: run the reference and corrected branches on the rayon pool

pub mod scenario;

pub use scenario::{run_comparison, ComparisonEngine, ComparisonResult, ComparisonSummary, ScenarioConfig, SpectrumKind};
