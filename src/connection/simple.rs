use std::cmp::Ordering;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::model::{ChromatographicPeak, MassPeak, Scan};
use crate::strategy::{parse_parameters, ParameterError};
use crate::tolerance::MzTolerance;

use super::{CandidatePeak, PeakBuilder};

/// How unmatched scans accumulate against the gap tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapCounting {
    /// Only the current run of unmatched scans counts; a match resets it.
    #[default]
    Consecutive,
    /// Every unmatched scan since the candidate was created counts.
    Cumulative,
}

/// Parameters of [`SimpleConnector`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectorParameters {
    /// Matching window around a candidate's representative m/z
    pub mz_tolerance: MzTolerance,
    /// Unmatched scans a candidate survives; one more closes it
    pub gap_tolerance: u32,
    /// Matched scans required for a closed candidate to be kept
    pub min_matched_scans: usize,
    /// Miss counting policy
    pub gap_counting: GapCounting,
    /// Minimum apex intensity of a kept peak
    pub min_height: f32,
    /// Minimum retention time span (seconds) of a kept peak
    pub min_duration: f32,
    /// Optional shape check, as a fraction of the last intensity
    pub intensity_tolerance: Option<f32>,
}

impl Default for ConnectorParameters {
    fn default() -> Self {
        Self {
            mz_tolerance: MzTolerance::default(),
            gap_tolerance: 1,
            min_matched_scans: 3,
            gap_counting: GapCounting::default(),
            min_height: 0.0,
            min_duration: 0.0,
            intensity_tolerance: None,
        }
    }
}

impl ConnectorParameters {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), ParameterError> {
        self.mz_tolerance.validate().map_err(ParameterError::new)?;
        if self.min_matched_scans == 0 {
            return Err(ParameterError::new("min_matched_scans must be at least 1"));
        }
        if !self.min_height.is_finite() || self.min_height < 0.0 {
            return Err(ParameterError::new(format!(
                "min_height must be a finite non-negative number, got {}",
                self.min_height
            )));
        }
        if !self.min_duration.is_finite() || self.min_duration < 0.0 {
            return Err(ParameterError::new(format!(
                "min_duration must be a finite non-negative number, got {}",
                self.min_duration
            )));
        }
        if let Some(tol) = self.intensity_tolerance {
            if !tol.is_finite() || tol < 0.0 {
                return Err(ParameterError::new(format!(
                    "intensity_tolerance must be a finite non-negative fraction, got {}",
                    tol
                )));
            }
        }
        Ok(())
    }
}

/// One admissible (candidate, mass peak) pairing in the current scan.
#[derive(Debug, Clone, Copy)]
struct Pairing {
    distance: f64,
    intensity: f32,
    candidate: usize,
    peak: usize,
}

impl Pairing {
    /// Closest m/z, then highest intensity, then candidate creation order,
    /// then mass peak order.
    fn priority(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| other.intensity.total_cmp(&self.intensity))
            .then_with(|| self.candidate.cmp(&other.candidate))
            .then_with(|| self.peak.cmp(&other.peak))
    }
}

/// Greedy scan-by-scan connector.
///
/// Candidates are kept in creation order, so closure order is creation order.
#[derive(Debug, Clone)]
pub struct SimpleConnector {
    parameters: ConnectorParameters,
    candidates: Vec<CandidatePeak>,
    scans_seen: usize,
}

impl SimpleConnector {
    /// Registry name.
    pub const NAME: &'static str = "simple";

    /// Create a connector, validating the parameters.
    pub fn new(parameters: ConnectorParameters) -> Result<Self, ParameterError> {
        parameters.validate()?;
        Ok(Self {
            parameters,
            candidates: Vec::new(),
            scans_seen: 0,
        })
    }

    /// Registry factory.
    pub fn factory(parameters: &toml::Table) -> Result<Box<dyn PeakBuilder>, ParameterError> {
        let parameters: ConnectorParameters = parse_parameters(parameters)?;
        Ok(Box::new(Self::new(parameters)?))
    }

    /// Active parameters.
    pub fn parameters(&self) -> &ConnectorParameters {
        &self.parameters
    }

    /// Candidates currently open, in creation order.
    pub fn candidates(&self) -> &[CandidatePeak] {
        &self.candidates
    }

    fn pairings(&self, mass_peaks: &[MassPeak], by_mz: &[usize]) -> Vec<Pairing> {
        let tolerance = self.parameters.mz_tolerance;
        let mut pairings = Vec::new();
        for (candidate_index, candidate) in self.candidates.iter().enumerate() {
            let reference = candidate.mz();
            let (low, high) = tolerance.window(reference);
            let start = by_mz.partition_point(|&i| mass_peaks[i].mz < low);
            for &peak_index in &by_mz[start..] {
                let peak = mass_peaks[peak_index];
                if peak.mz > high {
                    break;
                }
                if !tolerance.contains(reference, peak.mz)
                    || !candidate.accepts_intensity(peak.intensity, self.parameters.intensity_tolerance)
                {
                    continue;
                }
                pairings.push(Pairing {
                    distance: (peak.mz - reference).abs(),
                    intensity: peak.intensity,
                    candidate: candidate_index,
                    peak: peak_index,
                });
            }
        }
        pairings.sort_by(Pairing::priority);
        pairings
    }

    fn keeps(&self, candidate: &CandidatePeak) -> bool {
        candidate.matched_scans() >= self.parameters.min_matched_scans
    }

    /// Finalize `closed` candidates, keeping those that meet every threshold.
    fn finalize_all(&self, closed: Vec<CandidatePeak>) -> Vec<ChromatographicPeak> {
        let total = closed.len();
        let peaks: Vec<ChromatographicPeak> = closed
            .into_iter()
            .filter(|c| self.keeps(c))
            .filter_map(CandidatePeak::finalize)
            .filter(|p| p.height() >= self.parameters.min_height)
            .filter(|p| p.duration() >= self.parameters.min_duration)
            .collect();
        if total > 0 {
            debug!(
                "Closed {} candidates: {} finalized, {} discarded",
                total,
                peaks.len(),
                total - peaks.len()
            );
        }
        peaks
    }
}

impl PeakBuilder for SimpleConnector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn add_scan(&mut self, scan: &Scan, mass_peaks: &[MassPeak]) -> Vec<ChromatographicPeak> {
        let scan_index = self.scans_seen;
        self.scans_seen += 1;

        let mut by_mz: Vec<usize> = (0..mass_peaks.len()).collect();
        by_mz.sort_by(|&a, &b| mass_peaks[a].mz.total_cmp(&mass_peaks[b].mz));

        let mut candidate_matched = vec![false; self.candidates.len()];
        let mut peak_used = vec![false; mass_peaks.len()];
        for pairing in self.pairings(mass_peaks, &by_mz) {
            if candidate_matched[pairing.candidate] || peak_used[pairing.peak] {
                continue;
            }
            candidate_matched[pairing.candidate] = true;
            peak_used[pairing.peak] = true;

            let candidate = &mut self.candidates[pairing.candidate];
            candidate.extend(scan_index, scan, mass_peaks[pairing.peak]);
            if self.parameters.gap_counting == GapCounting::Consecutive {
                candidate.reset_misses();
            }
        }

        let gap_tolerance = self.parameters.gap_tolerance;
        let mut closed = Vec::new();
        let mut open = Vec::with_capacity(self.candidates.len());
        for (mut candidate, matched) in self.candidates.drain(..).zip(candidate_matched) {
            if !matched {
                candidate.miss();
            }
            if candidate.missed_scans() > gap_tolerance {
                closed.push(candidate);
            } else {
                open.push(candidate);
            }
        }
        self.candidates = open;

        for (peak_index, peak) in mass_peaks.iter().enumerate() {
            if peak_used[peak_index] {
                continue;
            }
            self.candidates
                .push(CandidatePeak::new(scan_index, scan, *peak));
        }

        self.finalize_all(closed)
    }

    fn finish_peaks(&mut self) -> Vec<ChromatographicPeak> {
        let remaining = std::mem::take(&mut self.candidates);
        self.finalize_all(remaining)
    }

    fn open_candidates(&self) -> usize {
        self.candidates.len()
    }
}
