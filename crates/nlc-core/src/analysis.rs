//! Spectrum analysis helpers
//!
//! Peak search and sidelobe measurement on [`Spectrum`] values, used to
//! compare the ideal, uncorrected and corrected beat spectra.
//!
//! Amplitudes are reported in dB relative to a reference, normally the
//! coherent integration time `T - taumax`: a unit-amplitude tone integrated
//! over that time with a rectangular window peaks at 0 dB.

use serde::{Deserialize, Serialize};

use crate::spectral::Spectrum;

/// Floor applied to amplitudes that would otherwise be -inf dB
pub const DB_FLOOR: f64 = -200.0;

/// Location and height of a spectral maximum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralPeak {
    pub bin: usize,
    pub frequency_hz: f64,
    pub magnitude: f64,
}

/// `20 log10(magnitude / reference)` with a floor of [`DB_FLOOR`]
pub fn amplitude_db(magnitude: f64, reference: f64) -> f64 {
    let ratio = magnitude / reference;
    if ratio > 1e-10 {
        20.0 * ratio.log10()
    } else {
        DB_FLOOR
    }
}

/// Amplitude spectrum in dB relative to `reference`
pub fn amplitude_spectrum_db(spectrum: &Spectrum, reference: f64) -> Vec<f64> {
    spectrum
        .bins()
        .iter()
        .map(|b| amplitude_db(b.norm(), reference))
        .collect()
}

/// Global maximum of the magnitude spectrum. `None` for an empty spectrum.
pub fn find_peak(spectrum: &Spectrum) -> Option<SpectralPeak> {
    find_peak_in(spectrum, f64::NEG_INFINITY, f64::INFINITY)
}

/// Maximum inside `[low_hz, high_hz]`
pub fn find_peak_in(spectrum: &Spectrum, low_hz: f64, high_hz: f64) -> Option<SpectralPeak> {
    let mut best: Option<SpectralPeak> = None;
    for (k, bin) in spectrum.bins().iter().enumerate() {
        let f = spectrum.frequency(k);
        if f < low_hz || f > high_hz {
            continue;
        }
        let magnitude = bin.norm();
        if best.map_or(true, |b| magnitude > b.magnitude) {
            best = Some(SpectralPeak {
                bin: k,
                frequency_hz: f,
                magnitude,
            });
        }
    }
    best
}

/// Highest sidelobe relative to the main peak, in dB (negative when the peak
/// dominates).
///
/// Bins closer than `exclusion_hz` to the peak belong to the main lobe and
/// are skipped; bins further than `search_hz` are ignored. Returns `None` if
/// the spectrum is empty, the peak is zero, or no bin falls in the search
/// band.
pub fn peak_sidelobe_db(spectrum: &Spectrum, exclusion_hz: f64, search_hz: f64) -> Option<f64> {
    let peak = find_peak(spectrum)?;
    if peak.magnitude == 0.0 {
        return None;
    }
    let sidelobe = spectrum
        .bins()
        .iter()
        .enumerate()
        .filter(|(k, _)| {
            let offset = (spectrum.frequency(*k) - peak.frequency_hz).abs();
            offset > exclusion_hz && offset <= search_hz
        })
        .map(|(_, b)| b.norm())
        .fold(None, |acc: Option<f64>, m| Some(acc.map_or(m, |a| a.max(m))))?;
    Some(amplitude_db(sidelobe, peak.magnitude))
}
