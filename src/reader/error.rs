use crate::metadata::MetadataError;
use crate::model::PeakListError;
use crate::schema::SchemaValidationError;
use crate::source::SourceError;

/// Errors that can occur during reading
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Column not found
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Footer metadata missing or malformed
    #[error("Metadata error: {0}")]
    MetadataError(#[from] MetadataError),

    /// Table schema does not match the expected layout
    #[error("Schema error: {0}")]
    SchemaError(#[from] SchemaValidationError),

    /// Scans could not be assembled into a scan source
    #[error("Scan source error: {0}")]
    SourceError(#[from] SourceError),

    /// Rows could not be assembled into a peak list
    #[error("Peak list error: {0}")]
    PeakListError(#[from] PeakListError),
}
