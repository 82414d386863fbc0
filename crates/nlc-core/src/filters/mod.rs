//! Filters and weighting windows
//!
//! The deskew filter itself lives in [`crate::deskew`]; this module holds the
//! window functions used ahead of spectral evaluation.

pub mod windows;

pub use windows::{placed_window, Window, WindowAlignment};
