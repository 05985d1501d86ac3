use std::fmt;

/// Statistics from a completed scan file write
#[derive(Debug, Clone, Default)]
pub struct ScanWriterStats {
    /// Number of scans written to the file
    pub scans_written: usize,
    /// Total number of observations written
    pub observations_written: usize,
    /// Number of Parquet row groups written
    pub row_groups_written: usize,
    /// Total uncompressed row group size in bytes
    pub file_size_bytes: u64,
}

impl fmt::Display for ScanWriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} scans ({} observations) in {} row groups",
            self.scans_written, self.observations_written, self.row_groups_written
        )
    }
}

/// Statistics from a completed peak list write
#[derive(Debug, Clone, Default)]
pub struct PeakListWriterStats {
    /// Number of peak list rows written
    pub rows_written: usize,
    /// Number of peaks written (one table row each)
    pub peaks_written: usize,
    /// Number of samples stored across all peaks
    pub samples_written: usize,
    /// Number of Parquet row groups written
    pub row_groups_written: usize,
    /// Total uncompressed row group size in bytes
    pub file_size_bytes: u64,
}

impl fmt::Display for PeakListWriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} rows ({} peaks, {} samples) in {} row groups",
            self.rows_written, self.peaks_written, self.samples_written, self.row_groups_written
        )
    }
}
