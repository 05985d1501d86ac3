use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::peak::ChromatographicPeak;

/// Identity of one raw data stream (one acquisition run).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawDataFileId(String);

impl RawDataFileId {
    /// Create a new identity from a file or run name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The underlying name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawDataFileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RawDataFileId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for RawDataFileId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Errors raised when a peak list invariant would be broken
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PeakListError {
    /// A row references a raw data file that was never registered on the list
    #[error("row {row_id} references raw data file '{raw_file}' which is not registered on peak list '{list}'")]
    UnregisteredRawDataFile {
        /// Offending row
        row_id: u32,
        /// Unknown raw data file
        raw_file: RawDataFileId,
        /// Peak list name
        list: String,
    },

    /// A row id was used twice within one list
    #[error("duplicate row id {0}")]
    DuplicateRowId(u32),
}

/// One analyte position, holding at most one peak per raw data file.
///
/// Peaks are shared through [`Arc`] so that filtered copies of a list do not
/// duplicate sample data.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakListRow {
    id: u32,
    peaks: BTreeMap<RawDataFileId, Arc<ChromatographicPeak>>,
}

impl PeakListRow {
    /// Create an empty row.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            peaks: BTreeMap::new(),
        }
    }

    /// Create a row holding a single peak.
    pub fn with_peak(id: u32, raw_file: RawDataFileId, peak: ChromatographicPeak) -> Self {
        let mut row = Self::new(id);
        row.add_peak(raw_file, Arc::new(peak));
        row
    }

    /// Row identifier.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Set the peak observed in `raw_file`, returning the peak it replaced.
    pub fn add_peak(
        &mut self,
        raw_file: RawDataFileId,
        peak: Arc<ChromatographicPeak>,
    ) -> Option<Arc<ChromatographicPeak>> {
        self.peaks.insert(raw_file, peak)
    }

    /// Peak observed in `raw_file`, if any.
    pub fn peak(&self, raw_file: &RawDataFileId) -> Option<&Arc<ChromatographicPeak>> {
        self.peaks.get(raw_file)
    }

    /// Iterate over `(raw file, peak)` pairs ordered by raw file name.
    pub fn peaks(&self) -> impl Iterator<Item = (&RawDataFileId, &Arc<ChromatographicPeak>)> {
        self.peaks.iter()
    }

    /// Raw data files this row has a peak in.
    pub fn raw_data_files(&self) -> impl Iterator<Item = &RawDataFileId> {
        self.peaks.keys()
    }

    /// Number of raw data files in which this row has a peak.
    pub fn number_of_peaks(&self) -> usize {
        self.peaks.len()
    }

    /// Mean m/z over the row's peaks, `None` for an empty row.
    pub fn average_mz(&self) -> Option<f64> {
        if self.peaks.is_empty() {
            return None;
        }
        Some(self.peaks.values().map(|p| p.mz()).sum::<f64>() / self.peaks.len() as f64)
    }

    /// Mean apex retention time over the row's peaks, `None` for an empty row.
    pub fn average_rt(&self) -> Option<f32> {
        if self.peaks.is_empty() {
            return None;
        }
        Some(self.peaks.values().map(|p| p.rt_apex()).sum::<f32>() / self.peaks.len() as f32)
    }
}

/// Ordered rows plus the raw data files they span.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakList {
    name: String,
    raw_data_files: Vec<RawDataFileId>,
    rows: Vec<PeakListRow>,
    row_ids: HashSet<u32>,
}

impl PeakList {
    /// Create an empty list with no registered raw data files.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_data_files: Vec::new(),
            rows: Vec::new(),
            row_ids: HashSet::new(),
        }
    }

    /// Create an empty list spanning a single raw data file.
    pub fn for_raw_data_file(name: impl Into<String>, raw_file: RawDataFileId) -> Self {
        let mut list = Self::new(name);
        list.add_raw_data_file(raw_file);
        list
    }

    /// Name of the list.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a raw data file. Registering the same file twice is a no-op.
    pub fn add_raw_data_file(&mut self, raw_file: RawDataFileId) {
        if !self.raw_data_files.contains(&raw_file) {
            self.raw_data_files.push(raw_file);
        }
    }

    /// Registered raw data files in registration order.
    pub fn raw_data_files(&self) -> &[RawDataFileId] {
        &self.raw_data_files
    }

    /// Append a row, checking that it only references registered raw data files
    /// and that its id is not taken.
    pub fn add_row(&mut self, row: PeakListRow) -> Result<(), PeakListError> {
        if let Some(raw_file) = row
            .raw_data_files()
            .find(|f| !self.raw_data_files.contains(f))
        {
            return Err(PeakListError::UnregisteredRawDataFile {
                row_id: row.id(),
                raw_file: raw_file.clone(),
                list: self.name.clone(),
            });
        }
        if !self.row_ids.insert(row.id()) {
            return Err(PeakListError::DuplicateRowId(row.id()));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> &[PeakListRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn number_of_rows(&self) -> usize {
        self.rows.len()
    }

    /// Row with the given id.
    pub fn row(&self, id: u32) -> Option<&PeakListRow> {
        self.rows.iter().find(|r| r.id() == id)
    }

    /// Total number of peaks over all rows.
    pub fn number_of_peaks(&self) -> usize {
        self.rows.iter().map(|r| r.number_of_peaks()).sum()
    }
}
