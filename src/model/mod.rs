//! # Data Model
//!
//! Scans flow into the mass detector, mass peaks flow into the peak builder,
//! and closed [`ChromatographicPeak`]s are collected into [`PeakList`] rows.
//!
//! - [`Scan`]: one acquisition event (SoA m/z and intensity arrays)
//! - [`MassPeak`]: one detected observation within a scan
//! - [`ChromatographicPeak`]: an immutable peak spanning one or more scans
//! - [`PeakListRow`] / [`PeakList`]: analyte positions across raw data files

mod peak;
mod peak_list;
mod scan;

pub use peak::{ChromatographicPeak, PeakSample};
pub use peak_list::{PeakList, PeakListError, PeakListRow, RawDataFileId};
pub use scan::{MassPeak, Scan, ScanBuilder};
