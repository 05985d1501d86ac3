use std::collections::HashMap;

use crate::model::{PeakList, RawDataFileId};
use crate::schema::*;

use super::processing::ProcessingHistory;
use super::MetadataError;

fn creator() -> String {
    format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Keys written to every file regardless of its table kind.
fn common_metadata(table_kind: &str) -> HashMap<String, String> {
    let mut metadata = HashMap::new();
    metadata.insert(KEY_FORMAT_VERSION.to_string(), FORMAT_VERSION.to_string());
    metadata.insert(KEY_TABLE_KIND.to_string(), table_kind.to_string());
    metadata.insert(
        KEY_CREATION_TIMESTAMP.to_string(),
        chrono::Utc::now().to_rfc3339(),
    );
    metadata.insert(KEY_CREATOR.to_string(), creator());
    metadata
}

fn check_table_kind(
    metadata: &HashMap<String, String>,
    expected: &str,
) -> Result<(), MetadataError> {
    match metadata.get(KEY_TABLE_KIND) {
        Some(kind) if kind == expected => Ok(()),
        Some(kind) => Err(MetadataError::UnexpectedValue {
            key: KEY_TABLE_KIND.to_string(),
            expected: expected.to_string(),
            found: kind.clone(),
        }),
        None => Err(MetadataError::MissingKey(KEY_TABLE_KIND.to_string())),
    }
}

/// Footer metadata of a scan file.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanFileMetadata {
    /// Raw data file the scans belong to
    pub raw_data_file: RawDataFileId,

    /// When the file was written (RFC 3339), filled in on read
    pub created: Option<String>,

    /// Software that wrote the file, filled in on read
    pub creator: Option<String>,
}

impl ScanFileMetadata {
    /// Metadata for a scan file of `raw_data_file`.
    pub fn new(raw_data_file: impl Into<RawDataFileId>) -> Self {
        Self {
            raw_data_file: raw_data_file.into(),
            created: None,
            creator: None,
        }
    }

    /// Convert to a HashMap suitable for Parquet key_value_metadata
    pub fn to_parquet_metadata(&self) -> HashMap<String, String> {
        let mut metadata = common_metadata(TABLE_KIND_SCANS);
        metadata.insert(
            KEY_RAW_DATA_FILE.to_string(),
            self.raw_data_file.as_str().to_string(),
        );
        metadata
    }

    /// Reconstruct metadata from Parquet key_value_metadata
    pub fn from_parquet_metadata(
        metadata: &HashMap<String, String>,
    ) -> Result<Self, MetadataError> {
        check_table_kind(metadata, TABLE_KIND_SCANS)?;
        let raw_data_file = metadata
            .get(KEY_RAW_DATA_FILE)
            .ok_or_else(|| MetadataError::MissingKey(KEY_RAW_DATA_FILE.to_string()))?;
        Ok(Self {
            raw_data_file: RawDataFileId::new(raw_data_file.clone()),
            created: metadata.get(KEY_CREATION_TIMESTAMP).cloned(),
            creator: metadata.get(KEY_CREATOR).cloned(),
        })
    }
}

/// Footer metadata of a peak list file.
///
/// Carries the list-level state that has no place in the row table: the list
/// name and every registered raw data file, including files no row refers to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeakListMetadata {
    /// Peak list name
    pub name: String,

    /// Registered raw data files in registration order
    pub raw_data_files: Vec<RawDataFileId>,

    /// Processing steps that produced the list
    pub processing_history: ProcessingHistory,

    /// When the file was written (RFC 3339), filled in on read
    pub created: Option<String>,

    /// Software that wrote the file, filled in on read
    pub creator: Option<String>,
}

impl PeakListMetadata {
    /// Metadata describing `list`, with an empty processing history.
    pub fn for_list(list: &PeakList) -> Self {
        Self {
            name: list.name().to_string(),
            raw_data_files: list.raw_data_files().to_vec(),
            ..Default::default()
        }
    }

    /// Replace the processing history.
    pub fn with_history(mut self, history: ProcessingHistory) -> Self {
        self.processing_history = history;
        self
    }

    /// Convert to a HashMap suitable for Parquet key_value_metadata
    pub fn to_parquet_metadata(&self) -> Result<HashMap<String, String>, MetadataError> {
        let mut metadata = common_metadata(TABLE_KIND_PEAK_LIST);
        metadata.insert(KEY_PEAK_LIST_NAME.to_string(), self.name.clone());
        metadata.insert(
            KEY_RAW_DATA_FILES.to_string(),
            serde_json::to_string(&self.raw_data_files)?,
        );
        if !self.processing_history.is_empty() {
            metadata.insert(
                KEY_PROCESSING_HISTORY.to_string(),
                self.processing_history.to_json()?,
            );
        }
        Ok(metadata)
    }

    /// Reconstruct metadata from Parquet key_value_metadata
    pub fn from_parquet_metadata(
        metadata: &HashMap<String, String>,
    ) -> Result<Self, MetadataError> {
        check_table_kind(metadata, TABLE_KIND_PEAK_LIST)?;

        let name = metadata
            .get(KEY_PEAK_LIST_NAME)
            .ok_or_else(|| MetadataError::MissingKey(KEY_PEAK_LIST_NAME.to_string()))?
            .clone();
        let raw_data_files = match metadata.get(KEY_RAW_DATA_FILES) {
            Some(json) => serde_json::from_str(json)?,
            None => return Err(MetadataError::MissingKey(KEY_RAW_DATA_FILES.to_string())),
        };
        let processing_history = match metadata.get(KEY_PROCESSING_HISTORY) {
            Some(json) => ProcessingHistory::from_json(json)?,
            None => ProcessingHistory::new(),
        };

        Ok(Self {
            name,
            raw_data_files,
            processing_history,
            created: metadata.get(KEY_CREATION_TIMESTAMP).cloned(),
            creator: metadata.get(KEY_CREATOR).cloned(),
        })
    }
}
