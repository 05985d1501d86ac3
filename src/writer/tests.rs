use super::*;
use crate::metadata::{PeakListMetadata, ScanFileMetadata};
use crate::model::{ChromatographicPeak, PeakList, PeakListRow, PeakSample, RawDataFileId, Scan};
use crate::schema::*;
use bytes::Bytes;
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::io::Cursor;
use std::sync::Arc;

fn footer_value(bytes: &Bytes, key: &str) -> Option<String> {
    let reader = SerializedFileReader::new(bytes.clone()).ok()?;
    reader
        .metadata()
        .file_metadata()
        .key_value_metadata()?
        .iter()
        .find(|kv| kv.key == key)
        .and_then(|kv| kv.value.clone())
}

fn row_count(bytes: &Bytes) -> i64 {
    SerializedFileReader::new(bytes.clone())
        .map(|r| r.metadata().file_metadata().num_rows())
        .unwrap_or(-1)
}

fn peak(scans: &[(i64, f32, f32)], mz: f64) -> ChromatographicPeak {
    let samples = scans
        .iter()
        .map(|&(n, rt, intensity)| PeakSample::new(n, rt, mz, intensity))
        .collect();
    ChromatographicPeak::from_samples(samples).unwrap()
}

#[test]
fn test_write_scans() -> Result<(), WriterError> {
    let metadata = ScanFileMetadata::new("run1");
    let mut writer = ScanWriter::new(Cursor::new(Vec::new()), &metadata, WriterConfig::default())?;

    writer.write_scans(&[
        Scan::new_ms1(1, 0.5, vec![100.0, 200.0], vec![10.0, 20.0]),
        Scan::new_ms1(2, 1.0, vec![100.0], vec![15.0]),
    ])?;
    writer.write_scan(&Scan::new_ms1(3, 1.5, vec![150.0, 250.0, 350.0], vec![1.0, 2.0, 3.0]))?;

    let stats = writer.stats();
    assert_eq!(stats.scans_written, 3);
    assert_eq!(stats.observations_written, 6);

    let bytes = Bytes::from(writer.finish_into_inner()?.into_inner());
    assert_eq!(row_count(&bytes), 6);
    assert_eq!(footer_value(&bytes, KEY_RAW_DATA_FILE).as_deref(), Some("run1"));
    assert_eq!(
        footer_value(&bytes, KEY_TABLE_KIND).as_deref(),
        Some(TABLE_KIND_SCANS)
    );
    assert_eq!(
        footer_value(&bytes, KEY_FORMAT_VERSION).as_deref(),
        Some(FORMAT_VERSION)
    );
    Ok(())
}

#[test]
fn test_empty_scan_gets_placeholder_row() -> Result<(), WriterError> {
    let metadata = ScanFileMetadata::new("run1");
    let mut writer = ScanWriter::new(Cursor::new(Vec::new()), &metadata, WriterConfig::default())?;

    writer.write_scans(&[
        Scan::new_ms1(1, 0.5, vec![100.0], vec![10.0]),
        Scan::empty(2, 1, 1.0),
    ])?;
    assert_eq!(writer.stats().scans_written, 2);
    assert_eq!(writer.stats().observations_written, 1);

    let bytes = Bytes::from(writer.finish_into_inner()?.into_inner());
    assert_eq!(row_count(&bytes), 2);
    Ok(())
}

#[test]
fn test_invalid_scan_is_rejected_before_writing() -> Result<(), WriterError> {
    let metadata = ScanFileMetadata::new("run1");
    let mut writer = ScanWriter::new(Cursor::new(Vec::new()), &metadata, WriterConfig::default())?;

    let result = writer.write_scans(&[
        Scan::new_ms1(1, 0.5, vec![100.0], vec![10.0]),
        Scan::new_ms1(2, 1.0, vec![100.0, 200.0], vec![10.0]),
    ]);
    assert!(matches!(result, Err(WriterError::InvalidData(_))));
    assert_eq!(writer.stats().scans_written, 0);
    assert_eq!(writer.stats().observations_written, 0);
    Ok(())
}

#[test]
fn test_finish_reports_row_groups() -> Result<(), WriterError> {
    let metadata = ScanFileMetadata::new("run1");
    let config = WriterConfig {
        row_group_size: 2,
        ..WriterConfig::fast_write()
    };
    let mut writer = ScanWriter::new(Cursor::new(Vec::new()), &metadata, config)?;
    writer.write_scan(&Scan::new_ms1(1, 0.5, vec![1.0, 2.0, 3.0, 4.0], vec![1.0; 4]))?;

    let stats = writer.finish()?;
    assert_eq!(stats.scans_written, 1);
    assert_eq!(stats.row_groups_written, 2);
    assert!(stats.to_string().starts_with("Wrote 1 scans (4 observations)"));
    Ok(())
}

#[test]
fn test_write_peak_list() -> Result<(), WriterError> {
    let a = RawDataFileId::new("a");
    let b = RawDataFileId::new("b");
    let unused = RawDataFileId::new("unused");

    let mut list = PeakList::new("aligned");
    list.add_raw_data_file(a.clone());
    list.add_raw_data_file(b.clone());
    list.add_raw_data_file(unused);

    let mut row = PeakListRow::with_peak(1, a.clone(), peak(&[(1, 1.0, 10.0), (2, 2.0, 30.0)], 200.0));
    row.add_peak(
        b.clone(),
        Arc::new(peak(&[(5, 1.1, 12.0), (6, 2.1, 25.0), (7, 3.1, 5.0)], 200.001)),
    );
    list.add_row(row).unwrap();
    list.add_row(PeakListRow::new(2)).unwrap();

    let metadata = PeakListMetadata::for_list(&list);
    let mut writer =
        PeakListWriter::new(Cursor::new(Vec::new()), &metadata, WriterConfig::default())?;
    writer.write_peak_list(&list)?;

    let stats = writer.stats();
    assert_eq!(stats.rows_written, 2);
    assert_eq!(stats.peaks_written, 2);
    assert_eq!(stats.samples_written, 5);

    let bytes = Bytes::from(writer.finish_into_inner()?.into_inner());
    // Two peaks for row 1 plus the placeholder for the empty row 2.
    assert_eq!(row_count(&bytes), 3);
    assert_eq!(
        footer_value(&bytes, KEY_PEAK_LIST_NAME).as_deref(),
        Some("aligned")
    );
    assert_eq!(
        footer_value(&bytes, KEY_RAW_DATA_FILES).as_deref(),
        Some(r#"["a","b","unused"]"#)
    );
    assert_eq!(footer_value(&bytes, KEY_PROCESSING_HISTORY), None);
    Ok(())
}

#[test]
fn test_write_peak_list_file() -> Result<(), Box<dyn std::error::Error>> {
    use crate::metadata::{ProcessingHistory, ProcessingStep};

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("run1 peaks.peaks.parquet");

    let raw = RawDataFileId::new("run1");
    let mut list = PeakList::for_raw_data_file("run1 peaks", raw.clone());
    list.add_row(PeakListRow::with_peak(1, raw, peak(&[(1, 1.0, 10.0)], 300.0)))?;

    let mut history = ProcessingHistory::new();
    history.add_step(ProcessingStep::new("peak picking"));

    let stats = write_peak_list_file(&path, &list, history, WriterConfig::default())?;
    assert_eq!(stats.rows_written, 1);
    assert_eq!(stats.peaks_written, 1);
    assert_eq!(stats.samples_written, 1);
    assert!(std::fs::metadata(&path)?.len() > 0);

    let bytes = Bytes::from(std::fs::read(&path)?);
    let history_json = footer_value(&bytes, KEY_PROCESSING_HISTORY).unwrap_or_default();
    assert!(history_json.contains("peak picking"));
    Ok(())
}

#[test]
fn test_compression_presets() {
    assert_eq!(CompressionType::default(), CompressionType::Zstd(3));
    assert_eq!(CompressionType::fast(), CompressionType::Snappy);
    assert_eq!(WriterConfig::max_compression().compression, CompressionType::Zstd(22));
    assert_eq!(WriterConfig::balanced().row_group_size, 100_000);
}
