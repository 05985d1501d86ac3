use crate::model::{ChromatographicPeak, MassPeak, PeakSample, Scan};

/// A chromatographic peak under construction.
///
/// Owns its samples in acquisition order together with the running sums
/// needed for the representative m/z, and the scan bookkeeping used to decide
/// when the candidate closes.
#[derive(Debug, Clone)]
pub struct CandidatePeak {
    samples: Vec<PeakSample>,
    weighted_mz_sum: f64,
    mz_sum: f64,
    intensity_sum: f64,
    max_intensity: f32,
    start_scan_index: usize,
    last_matched_index: usize,
    missed_scans: u32,
}

impl CandidatePeak {
    /// Start a candidate from the mass peak that matched nothing.
    ///
    /// `scan_index` is the position of `scan` in the stream seen by the
    /// connector.
    pub fn new(scan_index: usize, scan: &Scan, peak: MassPeak) -> Self {
        let mut candidate = Self {
            samples: Vec::new(),
            weighted_mz_sum: 0.0,
            mz_sum: 0.0,
            intensity_sum: 0.0,
            max_intensity: 0.0,
            start_scan_index: scan_index,
            last_matched_index: scan_index,
            missed_scans: 0,
        };
        candidate.push(scan, peak);
        candidate
    }

    fn push(&mut self, scan: &Scan, peak: MassPeak) {
        self.samples.push(PeakSample::new(
            scan.scan_number,
            scan.retention_time,
            peak.mz,
            peak.intensity,
        ));
        self.weighted_mz_sum += peak.mz * peak.intensity as f64;
        self.mz_sum += peak.mz;
        self.intensity_sum += peak.intensity as f64;
        if peak.intensity > self.max_intensity {
            self.max_intensity = peak.intensity;
        }
    }

    /// Extend the candidate with the mass peak matched in `scan`.
    pub fn extend(&mut self, scan_index: usize, scan: &Scan, peak: MassPeak) {
        self.push(scan, peak);
        self.last_matched_index = scan_index;
    }

    /// Record a scan in which the candidate found no match.
    pub fn miss(&mut self) {
        self.missed_scans += 1;
    }

    /// Forget misses accumulated so far.
    pub fn reset_misses(&mut self) {
        self.missed_scans = 0;
    }

    /// Representative m/z: intensity-weighted mean of the matched m/z values.
    pub fn mz(&self) -> f64 {
        if self.intensity_sum > 0.0 {
            self.weighted_mz_sum / self.intensity_sum
        } else {
            self.mz_sum / self.samples.len() as f64
        }
    }

    /// Number of scans that contributed a sample.
    pub fn matched_scans(&self) -> usize {
        self.samples.len()
    }

    /// Scans without a match counted so far.
    pub fn missed_scans(&self) -> u32 {
        self.missed_scans
    }

    /// Stream position of the first matched scan.
    pub fn start_scan_index(&self) -> usize {
        self.start_scan_index
    }

    /// Stream position of the most recent matched scan.
    pub fn last_matched_index(&self) -> usize {
        self.last_matched_index
    }

    /// Intensity of the most recent sample.
    pub fn last_intensity(&self) -> f32 {
        self.samples.last().map_or(0.0, |s| s.intensity)
    }

    /// Highest intensity seen so far.
    pub fn max_intensity(&self) -> f32 {
        self.max_intensity
    }

    /// True once the intensity trace has started to fall from its maximum.
    pub fn past_apex(&self) -> bool {
        self.last_intensity() < self.max_intensity
    }

    /// Shape check for a prospective extension.
    ///
    /// After the apex, an intensity rising more than `tolerance` (a fraction)
    /// above the last sample belongs to a new elution and is refused.
    pub fn accepts_intensity(&self, intensity: f32, tolerance: Option<f32>) -> bool {
        match tolerance {
            Some(tolerance) if self.past_apex() => {
                intensity <= self.last_intensity() * (1.0 + tolerance)
            }
            _ => true,
        }
    }

    /// Samples collected so far.
    pub fn samples(&self) -> &[PeakSample] {
        &self.samples
    }

    /// Turn the candidate into an immutable peak.
    pub fn finalize(self) -> Option<ChromatographicPeak> {
        ChromatographicPeak::from_samples(self.samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(n: i64) -> Scan {
        Scan::empty(n, 1, n as f32)
    }

    #[test]
    fn test_running_mz() {
        let mut c = CandidatePeak::new(0, &scan(1), MassPeak::new(100.0, 100.0));
        c.extend(1, &scan(2), MassPeak::new(100.02, 300.0));
        assert!((c.mz() - 100.015).abs() < 1e-9);
        assert_eq!(c.matched_scans(), 2);
        assert_eq!(c.last_matched_index(), 1);
        assert_eq!(c.start_scan_index(), 0);
    }

    #[test]
    fn test_shape_check_only_after_apex() {
        let mut c = CandidatePeak::new(0, &scan(1), MassPeak::new(100.0, 100.0));
        assert!(c.accepts_intensity(1000.0, Some(0.5)));

        c.extend(1, &scan(2), MassPeak::new(100.0, 50.0));
        assert!(c.past_apex());
        assert!(c.accepts_intensity(70.0, Some(0.5)));
        assert!(!c.accepts_intensity(80.0, Some(0.5)));
        assert!(c.accepts_intensity(80.0, None));
    }

    #[test]
    fn test_finalize_keeps_samples() {
        let mut c = CandidatePeak::new(0, &scan(1), MassPeak::new(100.0, 10.0));
        c.miss();
        assert_eq!(c.missed_scans(), 1);
        c.extend(2, &scan(3), MassPeak::new(100.0, 20.0));
        c.reset_misses();
        assert_eq!(c.missed_scans(), 0);

        let peak = c.finalize().unwrap();
        assert_eq!(peak.scan_numbers().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(peak.height(), 20.0);
    }
}
