//! # Parquet Readers
//!
//! Readers for the two tables written by [`crate::writer`]:
//!
//! - [`ScanFileReader`] regroups the long scan table into [`Scan`]s and loads
//!   them into an [`InMemoryScanSource`](crate::source::InMemoryScanSource)
//!   for peak picking.
//! - [`PeakListReader`] rebuilds a [`PeakList`](crate::model::PeakList),
//!   including raw data files that no row refers to.
//!
//! Both read from a path or from bytes already in memory, and validate the
//! table schema and footer before any rows are read.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mzpick::reader::ScanFileReader;
//!
//! let reader = ScanFileReader::open("run1.scans.parquet")?;
//! println!("Format version: {}", reader.metadata().format_version);
//!
//! for scan in reader.read_scans()? {
//!     println!("Scan {}: {} points", scan.scan_number, scan.data_point_count());
//! }
//! # Ok::<(), mzpick::reader::ReaderError>(())
//! ```
//!
//! [`Scan`]: crate::model::Scan

mod batches;
mod config;
mod error;
mod metadata;
mod open;
mod peak_lists;
mod scans;
mod utils;


pub use batches::RecordBatchIterator;
pub use config::ReaderConfig;
pub use error::ReaderError;
pub use metadata::FileMetadata;
pub use open::inspect;
pub use peak_lists::PeakListReader;
pub use scans::ScanFileReader;
