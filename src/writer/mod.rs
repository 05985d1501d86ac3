//! # Parquet Writers
//!
//! Streaming writers for the two tables described in [`crate::schema`]:
//!
//! - [`ScanWriter`]: scans in acquisition order, one row per observation.
//!   Scan-level columns repeat within a scan and compress through RLE and
//!   dictionary encoding.
//! - [`PeakListWriter`]: one row per (peak list row, raw data file) peak with
//!   the contributing samples as list columns.
//!
//! List- and file-level state goes into the Parquet footer (see
//! [`crate::metadata`]). Compression and row group sizing are controlled by
//! [`WriterConfig`], ZSTD by default.

mod config;
mod error;
mod peak_list_writer;
mod scan_writer;
mod stats;

#[cfg(test)]
mod tests;

pub use config::{CompressionType, WriterConfig};
pub use error::WriterError;
pub use peak_list_writer::{write_peak_list_file, PeakListWriter};
pub use scan_writer::ScanWriter;
pub use stats::{PeakListWriterStats, ScanWriterStats};
