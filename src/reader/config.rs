use bytes::Bytes;

/// Configuration for reading scan and peak list files
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Batch size for reading records
    pub batch_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self { batch_size: 65536 }
    }
}

/// Where the Parquet bytes come from (kept for re-reading)
#[derive(Debug, Clone)]
pub(super) enum ReaderSource {
    /// File on disk, reopened for each pass
    FilePath(std::path::PathBuf),
    /// Whole file held in memory
    Bytes(Bytes),
}
