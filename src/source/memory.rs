use std::collections::BTreeMap;

use crate::model::{RawDataFileId, Scan};

use super::{ScanSource, SourceError};

/// Scan source holding every scan of one raw data file in memory.
#[derive(Debug, Clone)]
pub struct InMemoryScanSource {
    raw_data_file: RawDataFileId,
    scans: BTreeMap<i64, Scan>,
}

impl InMemoryScanSource {
    /// Create an empty source.
    pub fn new(raw_data_file: impl Into<RawDataFileId>) -> Self {
        Self {
            raw_data_file: raw_data_file.into(),
            scans: BTreeMap::new(),
        }
    }

    /// Build a source from a list of scans.
    pub fn from_scans(
        raw_data_file: impl Into<RawDataFileId>,
        scans: impl IntoIterator<Item = Scan>,
    ) -> Result<Self, SourceError> {
        let mut source = Self::new(raw_data_file);
        for scan in scans {
            source.add_scan(scan)?;
        }
        Ok(source)
    }

    /// Add one scan. Scan numbers must be unique.
    pub fn add_scan(&mut self, scan: Scan) -> Result<(), SourceError> {
        scan.validate().map_err(|reason| SourceError::InvalidScan {
            raw_file: self.raw_data_file.clone(),
            reason,
        })?;
        if self.scans.contains_key(&scan.scan_number) {
            return Err(SourceError::DuplicateScanNumber {
                raw_file: self.raw_data_file.clone(),
                scan_number: scan.scan_number,
            });
        }
        self.scans.insert(scan.scan_number, scan);
        Ok(())
    }

    /// Total number of scans at any MS level.
    pub fn len(&self) -> usize {
        self.scans.len()
    }

    /// Returns true if the source holds no scans.
    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }

    /// All scans in scan-number order.
    pub fn scans(&self) -> impl Iterator<Item = &Scan> {
        self.scans.values()
    }
}

impl ScanSource for InMemoryScanSource {
    fn raw_data_file(&self) -> &RawDataFileId {
        &self.raw_data_file
    }

    fn scan_numbers(&self, ms_level: i16) -> Vec<i64> {
        self.scans
            .values()
            .filter(|s| s.ms_level == ms_level)
            .map(|s| s.scan_number)
            .collect()
    }

    fn scan(&self, scan_number: i64) -> Option<&Scan> {
        self.scans.get(&scan_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_numbers_sorted_and_filtered() {
        let source = InMemoryScanSource::from_scans(
            "run1",
            vec![
                Scan::empty(3, 1, 3.0),
                Scan::empty(1, 1, 1.0),
                Scan::empty(2, 2, 1.5),
            ],
        )
        .unwrap();

        assert_eq!(source.len(), 3);
        assert_eq!(source.scan_numbers(1), vec![1, 3]);
        assert_eq!(source.scan_numbers(2), vec![2]);
        assert!(source.scan_numbers(3).is_empty());
        assert_eq!(source.scan(2).map(|s| s.ms_level), Some(2));
        assert!(source.scan(4).is_none());
        assert_eq!(source.raw_data_file().as_str(), "run1");
    }

    #[test]
    fn test_duplicate_scan_number_rejected() {
        let err = InMemoryScanSource::from_scans(
            "run1",
            vec![Scan::empty(1, 1, 1.0), Scan::empty(1, 1, 2.0)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            SourceError::DuplicateScanNumber {
                raw_file: RawDataFileId::from("run1"),
                scan_number: 1
            }
        );
    }

    #[test]
    fn test_mismatched_arrays_rejected() {
        let err = InMemoryScanSource::from_scans(
            "run1",
            vec![Scan::new_ms1(1, 1.0, vec![100.0], vec![])],
        )
        .unwrap_err();
        assert!(matches!(err, SourceError::InvalidScan { .. }));
    }
}
