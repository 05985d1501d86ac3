/// A single acquisition event with SoA data point storage.
///
/// Observations are stored as parallel `mz`/`intensity` arrays in the order the
/// instrument reported them. A scan with no observations is valid input.
#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    /// Native scan number (unique and increasing within one raw data file)
    pub scan_number: i64,
    /// MS level (1, 2, 3, ...)
    pub ms_level: i16,
    /// Retention time in seconds
    pub retention_time: f32,
    /// Mass-to-charge ratios (Float64)
    pub mz: Vec<f64>,
    /// Intensities (Float32)
    pub intensity: Vec<f32>,
}

impl Scan {
    /// Create a new scan from parallel arrays.
    pub fn new(
        scan_number: i64,
        ms_level: i16,
        retention_time: f32,
        mz: Vec<f64>,
        intensity: Vec<f32>,
    ) -> Self {
        Self {
            scan_number,
            ms_level,
            retention_time,
            mz,
            intensity,
        }
    }

    /// Create a new MS1 scan.
    pub fn new_ms1(scan_number: i64, retention_time: f32, mz: Vec<f64>, intensity: Vec<f32>) -> Self {
        Self::new(scan_number, 1, retention_time, mz, intensity)
    }

    /// Create a scan without observations.
    pub fn empty(scan_number: i64, ms_level: i16, retention_time: f32) -> Self {
        Self::new(scan_number, ms_level, retention_time, Vec::new(), Vec::new())
    }

    /// Number of (m/z, intensity) observations.
    pub fn data_point_count(&self) -> usize {
        self.mz.len()
    }

    /// Returns true if the scan has no observations.
    pub fn is_empty(&self) -> bool {
        self.mz.is_empty()
    }

    /// Iterate over `(mz, intensity)` pairs.
    pub fn data_points(&self) -> impl Iterator<Item = (f64, f32)> + '_ {
        self.mz.iter().copied().zip(self.intensity.iter().copied())
    }

    /// Validate that the arrays have matching lengths and finite values.
    pub fn validate(&self) -> Result<(), String> {
        if self.intensity.len() != self.mz.len() {
            return Err(format!(
                "scan {}: intensity length {} does not match mz length {}",
                self.scan_number,
                self.intensity.len(),
                self.mz.len()
            ));
        }
        if !self.retention_time.is_finite() {
            return Err(format!(
                "scan {}: retention_time must be finite, got {}",
                self.scan_number, self.retention_time
            ));
        }
        Ok(())
    }

    /// Sum of all intensities.
    pub fn total_ion_current(&self) -> f64 {
        self.intensity.iter().map(|i| *i as f64).sum()
    }

    /// The most intense observation, if any.
    pub fn base_peak(&self) -> Option<MassPeak> {
        self.data_points()
            .fold(None, |best: Option<MassPeak>, (mz, intensity)| match best {
                Some(b) if b.intensity >= intensity => Some(b),
                _ => Some(MassPeak::new(mz, intensity)),
            })
    }
}

/// Fluent builder for [`Scan`], mostly useful in tests and demo data.
#[derive(Debug, Clone)]
pub struct ScanBuilder {
    scan: Scan,
}

impl ScanBuilder {
    /// Start a new MS1 scan at retention time 0.
    pub fn new(scan_number: i64) -> Self {
        Self {
            scan: Scan::empty(scan_number, 1, 0.0),
        }
    }

    /// Set the MS level.
    pub fn ms_level(mut self, level: i16) -> Self {
        self.scan.ms_level = level;
        self
    }

    /// Set the retention time in seconds.
    pub fn retention_time(mut self, rt: f32) -> Self {
        self.scan.retention_time = rt;
        self
    }

    /// Append one observation.
    pub fn add_data_point(mut self, mz: f64, intensity: f32) -> Self {
        self.scan.mz.push(mz);
        self.scan.intensity.push(intensity);
        self
    }

    /// Finish building.
    pub fn build(self) -> Scan {
        self.scan
    }
}

/// One detected (m/z, intensity) observation within a single scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassPeak {
    /// Mass-to-charge ratio
    pub mz: f64,
    /// Detected intensity
    pub intensity: f32,
}

impl MassPeak {
    /// Create a new mass peak.
    pub fn new(mz: f64, intensity: f32) -> Self {
        Self { mz, intensity }
    }
}
