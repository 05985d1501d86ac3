//! # Footer Metadata
//!
//! List- and file-level information stored in the Parquet footer as
//! key-value metadata, next to the row tables described in
//! [`crate::schema`].
//!
//! - Scan files record the raw data file they hold.
//! - Peak list files record the list name, every registered raw data file
//!   (JSON array) and the processing history (JSON).
//!
//! Both kinds also carry the format version, table kind, creation timestamp
//! and creator string.

mod error;
mod footer;
mod processing;

#[cfg(test)]
mod tests;

pub use error::MetadataError;
pub use footer::{PeakListMetadata, ScanFileMetadata};
pub use processing::{ProcessingHistory, ProcessingStep};
