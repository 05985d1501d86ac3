use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float32Builder, Float64Builder, Int16Builder, Int64Builder};
use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use crate::metadata::ScanFileMetadata;
use crate::model::Scan;
use crate::schema::create_scan_schema_arc;

use super::config::WriterConfig;
use super::error::WriterError;
use super::stats::ScanWriterStats;

/// Streaming writer for scan files ("long" layout)
pub struct ScanWriter<W: Write + Send> {
    writer: ArrowWriter<W>,
    schema: Arc<Schema>,
    scans_written: usize,
    observations_written: usize,
}

impl ScanWriter<File> {
    /// Create a new writer to a file path
    pub fn new_file<P: AsRef<Path>>(
        path: P,
        metadata: &ScanFileMetadata,
        config: WriterConfig,
    ) -> Result<Self, WriterError> {
        let file = File::create(path)?;
        Self::new(file, metadata, config)
    }
}

impl<W: Write + Send> ScanWriter<W> {
    /// Create a new writer to any Write implementation
    pub fn new(
        writer: W,
        metadata: &ScanFileMetadata,
        config: WriterConfig,
    ) -> Result<Self, WriterError> {
        let schema = create_scan_schema_arc();
        let props = config.scan_properties(&metadata.to_parquet_metadata());
        let arrow_writer = ArrowWriter::try_new(writer, schema.clone(), Some(props))?;

        Ok(Self {
            writer: arrow_writer,
            schema,
            scans_written: 0,
            observations_written: 0,
        })
    }

    /// Write a batch of scans as one record batch
    pub fn write_scans(&mut self, scans: &[Scan]) -> Result<(), WriterError> {
        if scans.is_empty() {
            return Ok(());
        }
        for scan in scans {
            scan.validate().map_err(WriterError::InvalidData)?;
        }

        let rows: usize = scans.iter().map(|s| s.data_point_count().max(1)).sum();
        let mut scan_number = Int64Builder::with_capacity(rows);
        let mut ms_level = Int16Builder::with_capacity(rows);
        let mut retention_time = Float32Builder::with_capacity(rows);
        let mut mz = Float64Builder::with_capacity(rows);
        let mut intensity = Float32Builder::with_capacity(rows);

        for scan in scans {
            let n = scan.data_point_count().max(1);
            scan_number.append_value_n(scan.scan_number, n);
            ms_level.append_value_n(scan.ms_level, n);
            retention_time.append_value_n(scan.retention_time, n);

            if scan.is_empty() {
                mz.append_null();
                intensity.append_null();
            } else {
                mz.append_slice(&scan.mz);
                intensity.append_slice(&scan.intensity);
            }
            self.observations_written += scan.data_point_count();
        }

        let arrays: Vec<ArrayRef> = vec![
            Arc::new(scan_number.finish()),
            Arc::new(ms_level.finish()),
            Arc::new(retention_time.finish()),
            Arc::new(mz.finish()),
            Arc::new(intensity.finish()),
        ];
        let batch = RecordBatch::try_new(self.schema.clone(), arrays)?;
        self.writer.write(&batch)?;

        self.scans_written += scans.len();
        Ok(())
    }

    /// Write a single scan
    pub fn write_scan(&mut self, scan: &Scan) -> Result<(), WriterError> {
        self.write_scans(std::slice::from_ref(scan))
    }

    /// Flush any buffered data and finalize the file
    pub fn finish(self) -> Result<ScanWriterStats, WriterError> {
        let file_metadata = self.writer.close()?;

        Ok(ScanWriterStats {
            scans_written: self.scans_written,
            observations_written: self.observations_written,
            row_groups_written: file_metadata.row_groups.len(),
            file_size_bytes: file_metadata
                .row_groups
                .iter()
                .map(|rg| rg.total_byte_size as u64)
                .sum(),
        })
    }

    /// Finalize and return the inner writer (for buffer extraction)
    pub fn finish_into_inner(self) -> Result<W, WriterError> {
        Ok(self.writer.into_inner()?)
    }

    /// Get current statistics
    pub fn stats(&self) -> ScanWriterStats {
        ScanWriterStats {
            scans_written: self.scans_written,
            observations_written: self.observations_written,
            ..Default::default()
        }
    }
}
