use std::collections::HashMap;
use std::path::Path;

use arrow::array::Array;
use arrow::datatypes::{Float32Type, Float64Type, Int64Type};
use bytes::Bytes;

use crate::metadata::PeakListMetadata;
use crate::model::{ChromatographicPeak, PeakList, PeakListRow, PeakSample, RawDataFileId};
use crate::schema::{peak_list_columns as cols, validate_peak_list_schema};

use super::open::ParquetTable;
use super::utils::*;
use super::{FileMetadata, ReaderConfig, ReaderError, RecordBatchIterator};

/// Reader for peak list files
pub struct PeakListReader {
    table: ParquetTable,
    list_metadata: PeakListMetadata,
}

impl PeakListReader {
    /// Open a peak list file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReaderError> {
        Self::open_with_config(path, ReaderConfig::default())
    }

    /// Open a peak list file with custom configuration
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: ReaderConfig,
    ) -> Result<Self, ReaderError> {
        Self::with_table(ParquetTable::open(path.as_ref(), config)?)
    }

    /// Read a peak list file held in memory
    pub fn from_bytes(bytes: Bytes) -> Result<Self, ReaderError> {
        Self::with_table(ParquetTable::from_bytes(bytes, ReaderConfig::default())?)
    }

    fn with_table(table: ParquetTable) -> Result<Self, ReaderError> {
        validate_peak_list_schema(&table.metadata().schema)?;
        let list_metadata =
            PeakListMetadata::from_parquet_metadata(&table.metadata().key_value_metadata)?;
        Ok(Self {
            table,
            list_metadata,
        })
    }

    /// Get file metadata
    pub fn metadata(&self) -> &FileMetadata {
        self.table.metadata()
    }

    /// Footer metadata specific to peak list files
    pub fn list_metadata(&self) -> &PeakListMetadata {
        &self.list_metadata
    }

    /// Streaming iterator over the raw record batches
    pub fn iter_batches(&self) -> Result<RecordBatchIterator, ReaderError> {
        self.table.iter_batches()
    }

    /// Rebuild the peak list
    ///
    /// Rows keep the order in which their ids first appear in the file. Every
    /// raw data file registered in the footer is registered on the list, in
    /// footer order, including files no row refers to.
    pub fn read_peak_list(&self) -> Result<PeakList, ReaderError> {
        let mut rows: Vec<PeakListRow> = Vec::new();
        let mut positions: HashMap<u32, usize> = HashMap::new();

        for batch in self.iter_batches()? {
            let batch = batch?;
            let row_ids = get_int64_column(&batch, cols::ROW_ID)?;
            let raw_files = get_string_column(&batch, cols::RAW_FILE)?;
            let scan_numbers = get_list_column(&batch, cols::SAMPLE_SCAN_NUMBERS)?;
            let retention_times = get_list_column(&batch, cols::SAMPLE_RETENTION_TIMES)?;
            let sample_mz = get_list_column(&batch, cols::SAMPLE_MZ)?;
            let intensities = get_list_column(&batch, cols::SAMPLE_INTENSITIES)?;

            for i in 0..batch.num_rows() {
                let row_id = u32::try_from(row_ids.value(i)).map_err(|_| {
                    ReaderError::InvalidFormat(format!("row id {} out of range", row_ids.value(i)))
                })?;
                let position = *positions.entry(row_id).or_insert_with(|| {
                    rows.push(PeakListRow::new(row_id));
                    rows.len() - 1
                });

                // Placeholder for a row without peaks.
                if raw_files.is_null(i) {
                    continue;
                }

                let samples = zip_samples(
                    row_id,
                    extract_list::<Int64Type>(scan_numbers, i)?,
                    extract_list::<Float32Type>(retention_times, i)?,
                    extract_list::<Float64Type>(sample_mz, i)?,
                    extract_list::<Float32Type>(intensities, i)?,
                )?;
                let peak = ChromatographicPeak::from_samples(samples).ok_or_else(|| {
                    ReaderError::InvalidFormat(format!("row {} has a peak without samples", row_id))
                })?;
                let raw_file = RawDataFileId::new(raw_files.value(i));
                if rows[position].add_peak(raw_file.clone(), peak.into()).is_some() {
                    return Err(ReaderError::InvalidFormat(format!(
                        "row {} has more than one peak for '{}'",
                        row_id, raw_file
                    )));
                }
            }
        }

        let mut list = PeakList::new(self.list_metadata.name.clone());
        for raw_file in &self.list_metadata.raw_data_files {
            list.add_raw_data_file(raw_file.clone());
        }
        for row in rows {
            list.add_row(row)?;
        }
        Ok(list)
    }
}

fn zip_samples(
    row_id: u32,
    scan_numbers: Vec<i64>,
    retention_times: Vec<f32>,
    mz: Vec<f64>,
    intensities: Vec<f32>,
) -> Result<Vec<PeakSample>, ReaderError> {
    let n = scan_numbers.len();
    if retention_times.len() != n || mz.len() != n || intensities.len() != n {
        return Err(ReaderError::InvalidFormat(format!(
            "row {} has sample lists of different lengths",
            row_id
        )));
    }
    Ok((0..n)
        .map(|k| PeakSample::new(scan_numbers[k], retention_times[k], mz[k], intensities[k]))
        .collect())
}
