use std::path::Path;

use arrow::array::Array;
use bytes::Bytes;

use crate::metadata::ScanFileMetadata;
use crate::model::{RawDataFileId, Scan};
use crate::schema::{columns, validate_scan_schema};
use crate::source::InMemoryScanSource;

use super::open::ParquetTable;
use super::utils::*;
use super::{FileMetadata, ReaderConfig, ReaderError, RecordBatchIterator};

/// Reader for scan files
///
/// Rows of one scan are contiguous on disk; they are regrouped into [`Scan`]s
/// in file order. A row with a null `mz` marks a scan without observations.
pub struct ScanFileReader {
    table: ParquetTable,
    scan_metadata: ScanFileMetadata,
}

impl ScanFileReader {
    /// Open a scan file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReaderError> {
        Self::open_with_config(path, ReaderConfig::default())
    }

    /// Open a scan file with custom configuration
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: ReaderConfig,
    ) -> Result<Self, ReaderError> {
        Self::with_table(ParquetTable::open(path.as_ref(), config)?)
    }

    /// Read a scan file held in memory
    pub fn from_bytes(bytes: Bytes) -> Result<Self, ReaderError> {
        Self::with_table(ParquetTable::from_bytes(bytes, ReaderConfig::default())?)
    }

    fn with_table(table: ParquetTable) -> Result<Self, ReaderError> {
        validate_scan_schema(&table.metadata().schema)?;
        let scan_metadata =
            ScanFileMetadata::from_parquet_metadata(&table.metadata().key_value_metadata)?;
        Ok(Self {
            table,
            scan_metadata,
        })
    }

    /// Get file metadata
    pub fn metadata(&self) -> &FileMetadata {
        self.table.metadata()
    }

    /// Footer metadata specific to scan files
    pub fn scan_metadata(&self) -> &ScanFileMetadata {
        &self.scan_metadata
    }

    /// Raw data file the scans belong to
    pub fn raw_data_file(&self) -> &RawDataFileId {
        &self.scan_metadata.raw_data_file
    }

    /// Streaming iterator over the raw record batches
    pub fn iter_batches(&self) -> Result<RecordBatchIterator, ReaderError> {
        self.table.iter_batches()
    }

    /// Read every scan in file order
    pub fn read_scans(&self) -> Result<Vec<Scan>, ReaderError> {
        let mut scans: Vec<Scan> = Vec::new();
        let mut current: Option<Scan> = None;

        for batch in self.iter_batches()? {
            let batch = batch?;
            let scan_numbers = get_int64_column(&batch, columns::SCAN_NUMBER)?;
            let ms_levels = get_int16_column(&batch, columns::MS_LEVEL)?;
            let retention_times = get_float32_column(&batch, columns::RETENTION_TIME)?;
            let mz = get_float64_column(&batch, columns::MZ)?;
            let intensity = get_float32_column(&batch, columns::INTENSITY)?;

            for i in 0..batch.num_rows() {
                let scan_number = scan_numbers.value(i);
                let starts_new_scan = current
                    .as_ref()
                    .map_or(true, |scan| scan.scan_number != scan_number);
                if starts_new_scan {
                    scans.extend(current.take());
                    current = Some(Scan::empty(
                        scan_number,
                        ms_levels.value(i),
                        retention_times.value(i),
                    ));
                }

                if mz.is_null(i) {
                    continue;
                }
                if intensity.is_null(i) {
                    return Err(ReaderError::InvalidFormat(format!(
                        "scan {} has an m/z value without intensity",
                        scan_number
                    )));
                }
                if let Some(scan) = current.as_mut() {
                    scan.mz.push(mz.value(i));
                    scan.intensity.push(intensity.value(i));
                }
            }
        }
        scans.extend(current);

        Ok(scans)
    }

    /// Read every scan into an in-memory scan source
    ///
    /// Fails when a scan number occurs more than once.
    pub fn read_source(&self) -> Result<InMemoryScanSource, ReaderError> {
        let scans = self.read_scans()?;
        Ok(InMemoryScanSource::from_scans(
            self.raw_data_file().clone(),
            scans,
        )?)
    }
}
