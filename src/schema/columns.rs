//! Column names of the scan table.

/// Native scan number, repeated on every observation of the scan
pub const SCAN_NUMBER: &str = "scan_number";

/// MS level of the scan
pub const MS_LEVEL: &str = "ms_level";

/// Retention time of the scan in seconds
pub const RETENTION_TIME: &str = "retention_time";

/// Observation m/z
pub const MZ: &str = "mz";

/// Observation intensity
pub const INTENSITY: &str = "intensity";
