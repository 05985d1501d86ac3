//! # Storage Schemas
//!
//! Apache Arrow schemas of the two Parquet tables this crate reads and writes.
//!
//! ## Scan table ("long" layout)
//!
//! One row per observation. Scan-level columns repeat on every observation of
//! the scan, which Parquet's run-length encoding stores almost for free.
//!
//! | Column | Type | Description | CV Term |
//! |--------|------|-------------|---------|
//! | scan_number | Int64 | Native scan number | MS:1000797 |
//! | ms_level | Int16 | MS level | MS:1000511 |
//! | retention_time | Float32 | RT in seconds | MS:1000016 |
//! | mz | Float64 (nullable) | Mass-to-charge ratio | MS:1000040 |
//! | intensity | Float32 (nullable) | Signal intensity | MS:1000042 |
//!
//! Scans without observations are stored as a single row with null `mz` and
//! `intensity` so that they survive a round trip.
//!
//! ## Peak list table ("wide" layout)
//!
//! One row per (peak list row, raw data file) peak, with the contributing
//! samples stored as list columns:
//!
//! | Column | Type |
//! |--------|------|
//! | row_id | Int64 |
//! | raw_file | Utf8 (nullable) |
//! | mz | Float64 |
//! | rt_apex, rt_start, rt_end | Float32 |
//! | height | Float32 |
//! | area | Float64 |
//! | scan_count | Int32 |
//! | sample_scan_numbers | List<Int64> |
//! | sample_retention_times | List<Float32> |
//! | sample_mz | List<Float64> |
//! | sample_intensities | List<Float32> |
//!
//! List-level information (name, registered raw data files, processing
//! history) lives in the Parquet footer under the `KEY_*` keys.

mod builders;
/// Scan table column name constants.
pub mod columns;
mod constants;
/// Peak list table column name constants.
pub mod peak_list_columns;
mod validation;


pub(crate) use builders::list_item;
pub use builders::{
    create_peak_list_schema, create_peak_list_schema_arc, create_scan_schema,
    create_scan_schema_arc,
};
pub use constants::*;
pub use validation::{validate_peak_list_schema, validate_scan_schema, SchemaValidationError};
