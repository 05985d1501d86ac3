/// One contributing observation of a chromatographic peak.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakSample {
    /// Scan the observation was detected in
    pub scan_number: i64,
    /// Retention time of that scan in seconds
    pub retention_time: f32,
    /// Observed m/z
    pub mz: f64,
    /// Observed intensity
    pub intensity: f32,
}

impl PeakSample {
    /// Create a new sample.
    pub fn new(scan_number: i64, retention_time: f32, mz: f64, intensity: f32) -> Self {
        Self {
            scan_number,
            retention_time,
            mz,
            intensity,
        }
    }
}

/// A closed chromatographic peak.
///
/// Summary values are computed once from the samples when the peak is built
/// and the peak cannot be modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromatographicPeak {
    mz: f64,
    rt_start: f32,
    rt_end: f32,
    apex_index: usize,
    area: f64,
    samples: Vec<PeakSample>,
}

impl ChromatographicPeak {
    /// Build a peak from its samples, ordered by acquisition.
    ///
    /// Returns `None` when `samples` is empty.
    pub fn from_samples(samples: Vec<PeakSample>) -> Option<Self> {
        let first = samples.first()?;
        let last = samples.last()?;
        let rt_start = first.retention_time;
        let rt_end = last.retention_time;

        let mut apex_index = 0;
        let mut weighted_mz = 0.0;
        let mut total_intensity = 0.0;
        for (i, sample) in samples.iter().enumerate() {
            if sample.intensity > samples[apex_index].intensity {
                apex_index = i;
            }
            weighted_mz += sample.mz * sample.intensity as f64;
            total_intensity += sample.intensity as f64;
        }

        // All-zero intensities fall back to the arithmetic mean.
        let mz = if total_intensity > 0.0 {
            weighted_mz / total_intensity
        } else {
            samples.iter().map(|s| s.mz).sum::<f64>() / samples.len() as f64
        };

        let area = samples
            .windows(2)
            .map(|pair| {
                let dt = (pair[1].retention_time - pair[0].retention_time) as f64;
                dt * (pair[0].intensity as f64 + pair[1].intensity as f64) / 2.0
            })
            .sum();

        Some(Self {
            mz,
            rt_start,
            rt_end,
            apex_index,
            area,
            samples,
        })
    }

    /// Intensity-weighted mean m/z of the samples.
    pub fn mz(&self) -> f64 {
        self.mz
    }

    /// Retention time of the first sample.
    pub fn rt_start(&self) -> f32 {
        self.rt_start
    }

    /// Retention time of the last sample.
    pub fn rt_end(&self) -> f32 {
        self.rt_end
    }

    /// Retention time span in seconds.
    pub fn duration(&self) -> f32 {
        self.rt_end - self.rt_start
    }

    /// The most intense sample (first one on ties).
    pub fn apex(&self) -> &PeakSample {
        &self.samples[self.apex_index]
    }

    /// Retention time of the apex.
    pub fn rt_apex(&self) -> f32 {
        self.apex().retention_time
    }

    /// Maximum sample intensity.
    pub fn height(&self) -> f32 {
        self.apex().intensity
    }

    /// Trapezoidal area over retention time.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Number of scans that contributed a sample.
    pub fn scan_count(&self) -> usize {
        self.samples.len()
    }

    /// All contributing samples in acquisition order.
    pub fn samples(&self) -> &[PeakSample] {
        &self.samples
    }

    /// Scan numbers of the contributing samples.
    pub fn scan_numbers(&self) -> impl Iterator<Item = i64> + '_ {
        self.samples.iter().map(|s| s.scan_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<PeakSample> {
        vec![
            PeakSample::new(1, 1.0, 200.00, 100.0),
            PeakSample::new(2, 2.0, 200.01, 300.0),
            PeakSample::new(3, 3.0, 200.02, 100.0),
        ]
    }

    #[test]
    fn test_summary_values() {
        let peak = ChromatographicPeak::from_samples(triangle()).unwrap();

        assert_eq!(peak.scan_count(), 3);
        assert_eq!(peak.rt_start(), 1.0);
        assert_eq!(peak.rt_end(), 3.0);
        assert_eq!(peak.rt_apex(), 2.0);
        assert_eq!(peak.height(), 300.0);
        assert!((peak.area() - 400.0).abs() < 1e-9);
        assert!((peak.mz() - 200.01).abs() < 1e-9);
        assert_eq!(peak.scan_numbers().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_single_sample_has_zero_area() {
        let peak =
            ChromatographicPeak::from_samples(vec![PeakSample::new(5, 10.0, 150.0, 42.0)]).unwrap();
        assert_eq!(peak.area(), 0.0);
        assert_eq!(peak.duration(), 0.0);
        assert_eq!(peak.mz(), 150.0);
    }

    #[test]
    fn test_empty_samples() {
        assert!(ChromatographicPeak::from_samples(Vec::new()).is_none());
    }

    #[test]
    fn test_apex_tie_keeps_first() {
        let peak = ChromatographicPeak::from_samples(vec![
            PeakSample::new(1, 1.0, 100.0, 50.0),
            PeakSample::new(2, 2.0, 100.0, 50.0),
        ])
        .unwrap();
        assert_eq!(peak.apex().scan_number, 1);
    }
}
