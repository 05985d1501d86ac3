//! Column names of the peak list table.
//!
//! One row per (peak list row, raw data file) peak. A peak list row with
//! peaks in three raw data files occupies three table rows sharing a
//! `row_id`. Rows without any peak are stored as a single table row with a
//! null `raw_file`.

/// Peak list row identifier
pub const ROW_ID: &str = "row_id";

/// Raw data file the peak was detected in (null for an empty row)
pub const RAW_FILE: &str = "raw_file";

/// Intensity-weighted peak m/z
pub const MZ: &str = "mz";

/// Retention time of the apex sample
pub const RT_APEX: &str = "rt_apex";

/// Retention time of the first sample
pub const RT_START: &str = "rt_start";

/// Retention time of the last sample
pub const RT_END: &str = "rt_end";

/// Apex intensity
pub const HEIGHT: &str = "height";

/// Trapezoidal area
pub const AREA: &str = "area";

/// Number of contributing scans
pub const SCAN_COUNT: &str = "scan_count";

/// Scan numbers of the samples (List<Int64>)
pub const SAMPLE_SCAN_NUMBERS: &str = "sample_scan_numbers";

/// Retention times of the samples (List<Float32>)
pub const SAMPLE_RETENTION_TIMES: &str = "sample_retention_times";

/// m/z values of the samples (List<Float64>)
pub const SAMPLE_MZ: &str = "sample_mz";

/// Intensities of the samples (List<Float32>)
pub const SAMPLE_INTENSITIES: &str = "sample_intensities";
