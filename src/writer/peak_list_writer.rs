use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, Float32Builder, Float64Builder, Int32Builder, Int64Builder, ListBuilder,
    StringBuilder,
};
use arrow::datatypes::{DataType, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use crate::metadata::PeakListMetadata;
use crate::model::{ChromatographicPeak, PeakList, PeakListRow, RawDataFileId};
use crate::schema::{create_peak_list_schema_arc, list_item as item};

use super::config::WriterConfig;
use super::error::WriterError;
use super::stats::PeakListWriterStats;

/// Peak list rows per record batch.
const ROWS_PER_BATCH: usize = 4096;

/// Column builders for one record batch of the peak list table.
struct PeakListBatchBuilder {
    row_id: Int64Builder,
    raw_file: StringBuilder,
    mz: Float64Builder,
    rt_apex: Float32Builder,
    rt_start: Float32Builder,
    rt_end: Float32Builder,
    height: Float32Builder,
    area: Float64Builder,
    scan_count: Int32Builder,
    sample_scan_numbers: ListBuilder<Int64Builder>,
    sample_retention_times: ListBuilder<Float32Builder>,
    sample_mz: ListBuilder<Float64Builder>,
    sample_intensities: ListBuilder<Float32Builder>,
}

impl PeakListBatchBuilder {
    fn new() -> Self {
        Self {
            row_id: Int64Builder::new(),
            raw_file: StringBuilder::new(),
            mz: Float64Builder::new(),
            rt_apex: Float32Builder::new(),
            rt_start: Float32Builder::new(),
            rt_end: Float32Builder::new(),
            height: Float32Builder::new(),
            area: Float64Builder::new(),
            scan_count: Int32Builder::new(),
            sample_scan_numbers: ListBuilder::new(Int64Builder::new())
                .with_field(item(DataType::Int64)),
            sample_retention_times: ListBuilder::new(Float32Builder::new())
                .with_field(item(DataType::Float32)),
            sample_mz: ListBuilder::new(Float64Builder::new()).with_field(item(DataType::Float64)),
            sample_intensities: ListBuilder::new(Float32Builder::new())
                .with_field(item(DataType::Float32)),
        }
    }

    fn append_peak(&mut self, row_id: u32, raw_file: &RawDataFileId, peak: &ChromatographicPeak) {
        self.row_id.append_value(row_id as i64);
        self.raw_file.append_value(raw_file.as_str());
        self.mz.append_value(peak.mz());
        self.rt_apex.append_value(peak.rt_apex());
        self.rt_start.append_value(peak.rt_start());
        self.rt_end.append_value(peak.rt_end());
        self.height.append_value(peak.height());
        self.area.append_value(peak.area());
        self.scan_count.append_value(peak.scan_count() as i32);

        for sample in peak.samples() {
            self.sample_scan_numbers.values().append_value(sample.scan_number);
            self.sample_retention_times
                .values()
                .append_value(sample.retention_time);
            self.sample_mz.values().append_value(sample.mz);
            self.sample_intensities.values().append_value(sample.intensity);
        }
        self.sample_scan_numbers.append(true);
        self.sample_retention_times.append(true);
        self.sample_mz.append(true);
        self.sample_intensities.append(true);
    }

    /// Placeholder for a row without peaks: everything but the id is null.
    fn append_empty_row(&mut self, row_id: u32) {
        self.row_id.append_value(row_id as i64);
        self.raw_file.append_null();
        self.mz.append_null();
        self.rt_apex.append_null();
        self.rt_start.append_null();
        self.rt_end.append_null();
        self.height.append_null();
        self.area.append_null();
        self.scan_count.append_null();
        self.sample_scan_numbers.append_null();
        self.sample_retention_times.append_null();
        self.sample_mz.append_null();
        self.sample_intensities.append_null();
    }

    fn finish(mut self, schema: Arc<Schema>) -> Result<RecordBatch, WriterError> {
        let arrays: Vec<ArrayRef> = vec![
            Arc::new(self.row_id.finish()),
            Arc::new(self.raw_file.finish()),
            Arc::new(self.mz.finish()),
            Arc::new(self.rt_apex.finish()),
            Arc::new(self.rt_start.finish()),
            Arc::new(self.rt_end.finish()),
            Arc::new(self.height.finish()),
            Arc::new(self.area.finish()),
            Arc::new(self.scan_count.finish()),
            Arc::new(self.sample_scan_numbers.finish()),
            Arc::new(self.sample_retention_times.finish()),
            Arc::new(self.sample_mz.finish()),
            Arc::new(self.sample_intensities.finish()),
        ];
        Ok(RecordBatch::try_new(schema, arrays)?)
    }
}

/// Streaming writer for peak list files ("wide" layout)
///
/// List-level state (name, registered raw data files, processing history) is
/// taken from the [`PeakListMetadata`] given at construction and stored in the
/// footer.
pub struct PeakListWriter<W: Write + Send> {
    writer: ArrowWriter<W>,
    schema: Arc<Schema>,
    rows_written: usize,
    peaks_written: usize,
    samples_written: usize,
}

impl PeakListWriter<File> {
    /// Create a new writer to a file path
    pub fn new_file<P: AsRef<Path>>(
        path: P,
        metadata: &PeakListMetadata,
        config: WriterConfig,
    ) -> Result<Self, WriterError> {
        let file = File::create(path)?;
        Self::new(file, metadata, config)
    }
}

impl<W: Write + Send> PeakListWriter<W> {
    /// Create a new writer to any Write implementation
    pub fn new(
        writer: W,
        metadata: &PeakListMetadata,
        config: WriterConfig,
    ) -> Result<Self, WriterError> {
        let schema = create_peak_list_schema_arc();
        let parquet_metadata = metadata.to_parquet_metadata()?;
        let props = config.peak_list_properties(&parquet_metadata);
        let arrow_writer = ArrowWriter::try_new(writer, schema.clone(), Some(props))?;

        Ok(Self {
            writer: arrow_writer,
            schema,
            rows_written: 0,
            peaks_written: 0,
            samples_written: 0,
        })
    }

    /// Write a batch of rows
    pub fn write_rows(&mut self, rows: &[PeakListRow]) -> Result<(), WriterError> {
        for chunk in rows.chunks(ROWS_PER_BATCH) {
            let mut builder = PeakListBatchBuilder::new();
            for row in chunk {
                if row.number_of_peaks() == 0 {
                    builder.append_empty_row(row.id());
                }
                for (raw_file, peak) in row.peaks() {
                    builder.append_peak(row.id(), raw_file, peak);
                    self.peaks_written += 1;
                    self.samples_written += peak.scan_count();
                }
            }
            let batch = builder.finish(self.schema.clone())?;
            self.writer.write(&batch)?;
            self.rows_written += chunk.len();
        }
        Ok(())
    }

    /// Write every row of `list`
    pub fn write_peak_list(&mut self, list: &PeakList) -> Result<(), WriterError> {
        self.write_rows(list.rows())
    }

    /// Flush any buffered data and finalize the file
    pub fn finish(self) -> Result<PeakListWriterStats, WriterError> {
        let file_metadata = self.writer.close()?;

        Ok(PeakListWriterStats {
            rows_written: self.rows_written,
            peaks_written: self.peaks_written,
            samples_written: self.samples_written,
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
    pub fn stats(&self) -> PeakListWriterStats {
        PeakListWriterStats {
            rows_written: self.rows_written,
            peaks_written: self.peaks_written,
            samples_written: self.samples_written,
            ..Default::default()
        }
    }
}

/// Write `list` with its processing history to `path` in one go.
pub fn write_peak_list_file<P: AsRef<Path>>(
    path: P,
    list: &PeakList,
    history: crate::metadata::ProcessingHistory,
    config: WriterConfig,
) -> Result<PeakListWriterStats, WriterError> {
    let metadata = PeakListMetadata::for_list(list).with_history(history);
    let mut writer = PeakListWriter::new_file(path, &metadata, config)?;
    writer.write_peak_list(list)?;
    writer.finish()
}
