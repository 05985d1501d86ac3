use std::fs::File;
use std::path::Path;

use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::SerializedFileReader;

use super::config::ReaderSource;
use super::{FileMetadata, ReaderConfig, ReaderError, RecordBatchIterator};

/// One opened Parquet table: where it lives plus its footer.
pub(super) struct ParquetTable {
    source: ReaderSource,
    config: ReaderConfig,
    file_metadata: FileMetadata,
}

impl ParquetTable {
    pub(super) fn open(path: &Path, config: ReaderConfig) -> Result<Self, ReaderError> {
        let file = File::open(path)?;
        let parquet_reader = SerializedFileReader::new(file)?;
        let file_metadata = FileMetadata::extract(&parquet_reader)?;

        Ok(Self {
            source: ReaderSource::FilePath(path.to_path_buf()),
            config,
            file_metadata,
        })
    }

    pub(super) fn from_bytes(bytes: Bytes, config: ReaderConfig) -> Result<Self, ReaderError> {
        let parquet_reader = SerializedFileReader::new(bytes.clone())?;
        let file_metadata = FileMetadata::extract(&parquet_reader)?;

        Ok(Self {
            source: ReaderSource::Bytes(bytes),
            config,
            file_metadata,
        })
    }

    pub(super) fn metadata(&self) -> &FileMetadata {
        &self.file_metadata
    }

    pub(super) fn iter_batches(&self) -> Result<RecordBatchIterator, ReaderError> {
        match &self.source {
            ReaderSource::FilePath(path) => {
                let file = File::open(path)?;
                let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
                    .with_batch_size(self.config.batch_size)
                    .build()?;
                Ok(RecordBatchIterator::new(reader))
            }
            ReaderSource::Bytes(bytes) => {
                let reader = ParquetRecordBatchReaderBuilder::try_new(bytes.clone())?
                    .with_batch_size(self.config.batch_size)
                    .build()?;
                Ok(RecordBatchIterator::new(reader))
            }
        }
    }
}

/// Read only the footer of a Parquet file.
///
/// Works for both table kinds; use [`FileMetadata::table_kind`] to decide
/// which reader to open.
pub fn inspect<P: AsRef<Path>>(path: P) -> Result<FileMetadata, ReaderError> {
    let file = File::open(path.as_ref())?;
    let parquet_reader = SerializedFileReader::new(file)?;
    FileMetadata::extract(&parquet_reader)
}
