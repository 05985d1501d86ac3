use super::*;
use crate::model::{PeakList, RawDataFileId};
use crate::schema::*;

#[test]
fn test_processing_history_numbering() {
    let mut history = ProcessingHistory::new();
    assert!(history.is_empty());
    history.add_step(ProcessingStep::new("peak picking"));
    history.add_step(ProcessingStep::new("gap filter"));

    assert_eq!(history.steps[0].order, 1);
    assert_eq!(history.steps[1].order, 2);
    assert_eq!(history.steps[1].software, "mzpick");
    assert!(history.steps[0].timestamp.is_some());
}

#[test]
fn test_processing_history_json_roundtrip() {
    #[derive(serde::Serialize)]
    struct Params {
        min_present: usize,
    }

    let mut history = ProcessingHistory::new();
    history.add_step(
        ProcessingStep::new("gap filter")
            .with_parameters(&Params { min_present: 2 })
            .unwrap(),
    );

    let json = history.to_json().unwrap();
    let restored = ProcessingHistory::from_json(&json).unwrap();
    assert_eq!(restored, history);
    assert_eq!(restored.steps[0].parameters["min_present"], 2);
}

#[test]
fn test_peak_list_metadata_keeps_unreferenced_files() {
    let mut list = PeakList::new("aligned");
    list.add_raw_data_file("a".into());
    list.add_raw_data_file("b".into());

    let metadata = PeakListMetadata::for_list(&list);
    let kv = metadata.to_parquet_metadata().unwrap();
    assert_eq!(kv.get(KEY_TABLE_KIND).map(String::as_str), Some(TABLE_KIND_PEAK_LIST));
    assert_eq!(kv.get(KEY_RAW_DATA_FILES).map(String::as_str), Some(r#"["a","b"]"#));
    assert!(!kv.contains_key(KEY_PROCESSING_HISTORY));

    let restored = PeakListMetadata::from_parquet_metadata(&kv).unwrap();
    assert_eq!(restored.name, "aligned");
    assert_eq!(
        restored.raw_data_files,
        vec![RawDataFileId::from("a"), RawDataFileId::from("b")]
    );
    assert!(restored.created.is_some());
    assert!(restored.creator.unwrap().starts_with("mzpick v"));
}

#[test]
fn test_table_kind_checked() {
    let kv = ScanFileMetadata::new("run1").to_parquet_metadata();
    let err = PeakListMetadata::from_parquet_metadata(&kv).unwrap_err();
    assert!(matches!(err, MetadataError::UnexpectedValue { .. }));

    let restored = ScanFileMetadata::from_parquet_metadata(&kv).unwrap();
    assert_eq!(restored.raw_data_file.as_str(), "run1");
}

#[test]
fn test_missing_keys() {
    let kv = std::collections::HashMap::new();
    let err = ScanFileMetadata::from_parquet_metadata(&kv).unwrap_err();
    assert!(matches!(err, MetadataError::MissingKey(ref k) if k == KEY_TABLE_KIND));
}
