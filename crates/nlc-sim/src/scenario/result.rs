//! Comparison output: the four range spectra and their figures of merit

use nlc_core::analysis::{amplitude_db, amplitude_spectrum_db, find_peak, peak_sidelobe_db, DB_FLOOR};
use nlc_core::spectral::Spectrum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};

/// Which of the compared beat signals a spectrum belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpectrumKind {
    /// Linear sweep, no error
    Ideal,
    /// Corrupted, no correction
    Uncorrected,
    Narrowband,
    Wideband,
}

impl SpectrumKind {
    pub const ALL: [SpectrumKind; 4] = [
        SpectrumKind::Ideal,
        SpectrumKind::Uncorrected,
        SpectrumKind::Narrowband,
        SpectrumKind::Wideband,
    ];
}

impl fmt::Display for SpectrumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SpectrumKind::Ideal => "ideal",
            SpectrumKind::Uncorrected => "uncorrected",
            SpectrumKind::Narrowband => "narrowband",
            SpectrumKind::Wideband => "wideband",
        };
        f.write_str(s)
    }
}

/// Peak and sidelobe figures for one spectrum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumSummary {
    pub kind: SpectrumKind,
    pub peak_frequency_hz: f64,
    /// Peak amplitude in dB relative to the coherent time `T - taumax`
    pub peak_db: f64,
    /// Highest sidelobe in dB relative to the peak; `None` for a null spectrum
    pub psl_db: Option<f64>,
}

/// Summaries of all four spectra, in [`SpectrumKind::ALL`] order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub spectra: Vec<SpectrumSummary>,
}

impl ComparisonSummary {
    pub fn get(&self, kind: SpectrumKind) -> Option<&SpectrumSummary> {
        self.spectra.iter().find(|s| s.kind == kind)
    }

    /// Narrowband minus wideband PSL; positive when the wideband correction
    /// suppresses the paired echoes better.
    pub fn psl_advantage_db(&self) -> Option<f64> {
        let nb = self.get(SpectrumKind::Narrowband)?.psl_db?;
        let wb = self.get(SpectrumKind::Wideband)?.psl_db?;
        Some(nb - wb)
    }
}

impl fmt::Display for ComparisonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<12} {:>14} {:>10} {:>10}", "spectrum", "peak (Hz)", "peak (dB)", "PSL (dB)")?;
        for s in &self.spectra {
            let psl = s.psl_db.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v));
            writeln!(
                f,
                "{:<12} {:>14.1} {:>10.2} {:>10}",
                s.kind.to_string(),
                s.peak_frequency_hz,
                s.peak_db,
                psl
            )?;
        }
        Ok(())
    }
}

/// The four range spectra of one comparison run, on a shared frequency grid
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub ideal: Spectrum,
    pub uncorrected: Spectrum,
    pub narrowband: Spectrum,
    pub wideband: Spectrum,
    /// Amplitude reference `T - taumax` (s)
    pub coherent_time_s: f64,
    pub exclusion_hz: f64,
    pub search_hz: f64,
}

impl ComparisonResult {
    pub fn spectrum(&self, kind: SpectrumKind) -> &Spectrum {
        match kind {
            SpectrumKind::Ideal => &self.ideal,
            SpectrumKind::Uncorrected => &self.uncorrected,
            SpectrumKind::Narrowband => &self.narrowband,
            SpectrumKind::Wideband => &self.wideband,
        }
    }

    /// Shared frequency grid (Hz)
    pub fn frequencies(&self) -> Vec<f64> {
        self.ideal.frequencies()
    }

    /// `20 log10(|S(f)| / (T - taumax))`
    pub fn amplitude_db(&self, kind: SpectrumKind) -> Vec<f64> {
        amplitude_spectrum_db(self.spectrum(kind), self.coherent_time_s)
    }

    pub fn summarize(&self, kind: SpectrumKind) -> SpectrumSummary {
        let spectrum = self.spectrum(kind);
        let (peak_frequency_hz, peak_db) = match find_peak(spectrum) {
            Some(peak) => (peak.frequency_hz, amplitude_db(peak.magnitude, self.coherent_time_s)),
            None => (0.0, DB_FLOOR),
        };
        SpectrumSummary {
            kind,
            peak_frequency_hz,
            peak_db,
            psl_db: peak_sidelobe_db(spectrum, self.exclusion_hz, self.search_hz),
        }
    }

    pub fn summary(&self) -> ComparisonSummary {
        ComparisonSummary {
            spectra: SpectrumKind::ALL.iter().map(|&k| self.summarize(k)).collect(),
        }
    }

    /// Write `frequency_hz,ideal_db,uncorrected_db,narrowband_db,wideband_db`
    /// rows for bins within `span_hz` of `center_hz`.
    pub fn write_csv<W: Write>(&self, mut out: W, center_hz: f64, span_hz: f64) -> io::Result<()> {
        write!(out, "frequency_hz")?;
        for kind in SpectrumKind::ALL {
            write!(out, ",{}_db", kind)?;
        }
        writeln!(out)?;

        let columns: Vec<Vec<f64>> = SpectrumKind::ALL.iter().map(|&k| self.amplitude_db(k)).collect();
        for (k, f) in self.frequencies().into_iter().enumerate() {
            if (f - center_hz).abs() > span_hz {
                continue;
            }
            write!(out, "{:.3}", f)?;
            for column in &columns {
                write!(out, ",{:.4}", column[k])?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
