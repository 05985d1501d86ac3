//! # Scan Sources
//!
//! Read-only access to the scans of one raw data file. Sources can be shared
//! between threads; picker runs only ever read from them.

mod memory;

pub use memory::InMemoryScanSource;

use crate::model::{RawDataFileId, Scan};

/// Errors raised while assembling a scan source
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    /// Two scans share a scan number
    #[error("Duplicate scan number {scan_number} in {raw_file}")]
    DuplicateScanNumber {
        /// Raw data file being assembled
        raw_file: RawDataFileId,
        /// Repeated scan number
        scan_number: i64,
    },

    /// A scan failed validation
    #[error("Invalid scan in {raw_file}: {reason}")]
    InvalidScan {
        /// Raw data file being assembled
        raw_file: RawDataFileId,
        /// Validation message
        reason: String,
    },
}

/// Read-only access to the scans of one raw data file.
pub trait ScanSource: Send + Sync {
    /// Identity of the raw data file.
    fn raw_data_file(&self) -> &RawDataFileId;

    /// Scan numbers at `ms_level`, in ascending order.
    fn scan_numbers(&self, ms_level: i16) -> Vec<i64>;

    /// Look up one scan.
    fn scan(&self, scan_number: i64) -> Option<&Scan>;
}
