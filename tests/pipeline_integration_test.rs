//! Integration tests for mzpick
//!
//! These tests run the file-to-file pipeline: scan files are written, picked
//! into peak list files, aligned and gap filtered.

use mzpick::connection::ConnectorParameters;
use mzpick::metadata::{ProcessingHistory, ProcessingStep, ScanFileMetadata};
use mzpick::model::{PeakList, PeakListRow, RawDataFileId, Scan};
use mzpick::reader::{PeakListReader, ScanFileReader};
use mzpick::sink::{ParquetDirectorySink, PeakListRegistry, PeakListSink};
use mzpick::strategy::StrategyConfig;
use mzpick::task::{GapFilterTask, PeakPickerParameters, PeakPickerTask, Task, TaskStatus};
use mzpick::tolerance::MzTolerance;
use mzpick::writer::{write_peak_list_file, ScanWriter, WriterConfig};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

fn write_scan_file(path: &Path, raw_file: &str, scans: &[Scan]) {
    let metadata = ScanFileMetadata::new(raw_file);
    let mut writer = ScanWriter::new_file(path, &metadata, WriterConfig::default()).unwrap();
    writer.write_scans(scans).unwrap();
    writer.finish().unwrap();
}

fn picker_parameters(gap_tolerance: u32, min_matched_scans: usize) -> PeakPickerParameters {
    let builder = ConnectorParameters {
        mz_tolerance: MzTolerance::Absolute(0.01),
        gap_tolerance,
        min_matched_scans,
        ..Default::default()
    };
    PeakPickerParameters {
        peak_builder: StrategyConfig::from_parameters("simple", &builder).unwrap(),
        ..Default::default()
    }
}

/// Three analytes at fixed m/z, each eluting over a different scan range.
fn sample_scans(present: &[bool; 3]) -> Vec<Scan> {
    let analytes = [(150.0, 5.0f32), (250.0, 10.0), (350.0, 15.0)];
    (1..=20)
        .map(|n| {
            let rt = n as f32;
            let mut mz = Vec::new();
            let mut intensity = Vec::new();
            for (&(analyte_mz, apex), &is_present) in analytes.iter().zip(present) {
                let distance = (rt - apex).abs();
                if is_present && distance <= 3.0 {
                    mz.push(analyte_mz);
                    intensity.push(1000.0 * (4.0 - distance));
                }
            }
            Scan::new_ms1(n, rt, mz, intensity)
        })
        .collect()
}

/// The acceptance scenario, through files on disk
#[test]
fn test_pick_scan_file_to_peak_list_file() {
    let dir = tempdir().unwrap();
    let scan_path = dir.path().join("run1.scans.parquet");
    write_scan_file(
        &scan_path,
        "run1",
        &[
            Scan::new_ms1(1, 1.0, vec![200.0], vec![100.0]),
            Scan::new_ms1(2, 2.0, vec![200.0], vec![150.0]),
            Scan::empty(3, 1, 3.0),
        ],
    );

    let source = ScanFileReader::open(&scan_path)
        .unwrap()
        .read_source()
        .unwrap();

    let mut history = ProcessingHistory::new();
    history.add_step(ProcessingStep::new("peak picking"));
    let out_dir = dir.path().join("peaks");
    let sink = Arc::new(ParquetDirectorySink::new(&out_dir, WriterConfig::default()).with_history(history));

    let task = PeakPickerTask::new(Arc::new(source), picker_parameters(1, 2)).with_sink(sink.clone());
    task.run();
    assert_eq!(task.status(), TaskStatus::Finished);
    assert_eq!(task.finished_fraction(), 1.0);

    let written = sink.written_files();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0], sink.path_for("run1 peaks"));

    let reader = PeakListReader::open(&written[0]).unwrap();
    assert_eq!(reader.list_metadata().processing_history.steps.len(), 1);
    let list = reader.read_peak_list().unwrap();
    assert_eq!(list.name(), "run1 peaks");
    assert_eq!(list.raw_data_files(), &[RawDataFileId::new("run1")]);
    assert_eq!(list.number_of_rows(), 1);

    let row = &list.rows()[0];
    assert_eq!(row.id(), 1);
    let peak = row.peak(&RawDataFileId::new("run1")).unwrap();
    assert_eq!(peak.scan_count(), 2);
    assert_eq!(peak.scan_numbers().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(peak.height(), 150.0);
    assert_eq!(peak.rt_apex(), 2.0);
    assert!((peak.area() - 125.0).abs() < 1e-9);
}

/// Several samples picked concurrently, aligned by m/z, then gap filtered
#[test]
fn test_pick_align_and_filter() {
    let dir = tempdir().unwrap();
    let presence = [[true, true, true], [true, false, true], [true, false, false]];

    let mut sources = Vec::new();
    for (i, present) in presence.iter().enumerate() {
        let name = format!("s{}", i + 1);
        let path = dir.path().join(format!("{}.scans.parquet", name));
        write_scan_file(&path, &name, &sample_scans(present));
        sources.push(ScanFileReader::open(&path).unwrap().read_source().unwrap());
    }

    let registry = Arc::new(PeakListRegistry::new());
    let workers: Vec<_> = sources
        .into_iter()
        .map(|source| {
            let sink: Arc<dyn PeakListSink> = registry.clone();
            let task = PeakPickerTask::new(Arc::new(source), picker_parameters(1, 3)).with_sink(sink);
            thread::spawn(move || {
                task.run();
                task.status()
            })
        })
        .collect();
    for worker in workers {
        assert_eq!(worker.join().unwrap(), TaskStatus::Finished);
    }
    assert_eq!(registry.len(), 3);

    // Align by nominal m/z: one row per analyte.
    let mut aligned = PeakList::new("aligned");
    let mut rows: Vec<PeakListRow> = (1..=3).map(PeakListRow::new).collect();
    for i in 1..=3 {
        let raw = RawDataFileId::new(format!("s{}", i));
        aligned.add_raw_data_file(raw.clone());
        let list = registry.get(&format!("s{} peaks", i)).unwrap();
        for row in list.rows() {
            let (_, peak) = row.peaks().next().unwrap();
            let slot = ((peak.mz() - 150.0) / 100.0).round() as usize;
            rows[slot].add_peak(raw.clone(), peak.clone());
        }
    }
    for row in rows {
        aligned.add_row(row).unwrap();
    }
    let counts: Vec<usize> = aligned.rows().iter().map(|r| r.number_of_peaks()).collect();
    assert_eq!(counts, vec![3, 1, 2]);

    let aligned_path = dir.path().join("aligned.peaks.parquet");
    write_peak_list_file(&aligned_path, &aligned, ProcessingHistory::new(), WriterConfig::default())
        .unwrap();

    let read_back = PeakListReader::open(&aligned_path)
        .unwrap()
        .read_peak_list()
        .unwrap();
    assert_eq!(read_back, aligned);

    let task = GapFilterTask::new(Arc::new(read_back), 2);
    task.run();
    assert_eq!(task.status(), TaskStatus::Finished);
    let filtered = task.result().unwrap();
    assert_eq!(filtered.name(), "aligned filtered");
    assert_eq!(filtered.raw_data_files().len(), 3);
    let kept: Vec<(u32, usize)> = filtered
        .rows()
        .iter()
        .map(|r| (r.id(), r.number_of_peaks()))
        .collect();
    assert_eq!(kept, vec![(1, 3), (3, 2)]);
}

/// A canceled run publishes nothing
#[test]
fn test_canceled_run_is_not_published() {
    let source = mzpick::source::InMemoryScanSource::from_scans("run1", sample_scans(&[true; 3])).unwrap();
    let registry = Arc::new(PeakListRegistry::new());
    let task = PeakPickerTask::new(Arc::new(source), picker_parameters(1, 3)).with_sink(registry.clone());

    let handle = task.handle();
    thread::spawn(move || handle.cancel()).join().unwrap();

    task.run();
    assert_eq!(task.status(), TaskStatus::Canceled);
    assert_eq!(task.finished_fraction(), 0.0);
    assert!(task.result().is_none());
    assert!(registry.is_empty());
}

/// Strategy errors surface as an ERROR run naming the strategy
#[test]
fn test_unknown_detector_fails_the_run() {
    let source = mzpick::source::InMemoryScanSource::from_scans("run1", sample_scans(&[true; 3])).unwrap();
    let parameters = PeakPickerParameters {
        mass_detector: StrategyConfig::new("wavelet"),
        ..Default::default()
    };
    let task = PeakPickerTask::new(Arc::new(source), parameters);
    task.run();

    assert_eq!(task.status(), TaskStatus::Error);
    let message = task.error_message().unwrap();
    assert!(message.contains("mass detector 'wavelet'"), "{}", message);
    assert!(task.result().is_none());
}
