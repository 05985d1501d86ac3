/// Storage format version - follows semantic versioning
pub const FORMAT_VERSION: &str = "1.0.0";

/// File extension of scan files
pub const SCAN_FILE_EXTENSION: &str = ".scans.parquet";

/// File extension of peak list files
pub const PEAK_LIST_EXTENSION: &str = ".peaks.parquet";

/// Metadata key for format version in Parquet footer
pub const KEY_FORMAT_VERSION: &str = "mzpick:format_version";

/// Metadata key for the kind of table stored in the file
pub const KEY_TABLE_KIND: &str = "mzpick:table_kind";

/// Table kind value of scan files
pub const TABLE_KIND_SCANS: &str = "scans";

/// Table kind value of peak list files
pub const TABLE_KIND_PEAK_LIST: &str = "peak_list";

/// Metadata key for the raw data file a scan file holds
pub const KEY_RAW_DATA_FILE: &str = "mzpick:raw_data_file";

/// Metadata key for the peak list name
pub const KEY_PEAK_LIST_NAME: &str = "mzpick:peak_list_name";

/// Metadata key for the registered raw data files (JSON array)
pub const KEY_RAW_DATA_FILES: &str = "mzpick:raw_data_files";

/// Metadata key for data processing history
pub const KEY_PROCESSING_HISTORY: &str = "mzpick:processing_history";

/// Metadata key for creation timestamp
pub const KEY_CREATION_TIMESTAMP: &str = "mzpick:creation_timestamp";

/// Metadata key for creator software info
pub const KEY_CREATOR: &str = "mzpick:creator";
