use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mzpick::connection::{ConnectorParameters, PeakBuilder, SimpleConnector};
use mzpick::detection::{CentroidDetector, CentroidParameters, MassDetector};
use mzpick::model::{PeakList, PeakListRow, RawDataFileId, Scan};
use mzpick::source::InMemoryScanSource;
use mzpick::task::{GapFilterTask, PeakPickerParameters, PeakPickerTask, Task};
use std::sync::Arc;

/// Scans with `traces` Gaussian elution profiles spread over the run
fn create_scans(num_scans: usize, traces: usize) -> Vec<Scan> {
    (0..num_scans)
        .map(|n| {
            let rt = n as f32;
            let mut mz = Vec::with_capacity(traces);
            let mut intensity = Vec::with_capacity(traces);
            for t in 0..traces {
                let apex = (t * 37 % num_scans) as f32;
                let z = (rt - apex) / 5.0;
                let value = 1e5 * (-0.5 * z * z).exp();
                if value > 10.0 {
                    mz.push(100.0 + t as f64 * 0.5 + (n as f64 * 0.37).sin() * 1e-3);
                    intensity.push(value);
                }
            }
            Scan::new_ms1(n as i64 + 1, rt, mz, intensity)
        })
        .collect()
}

/// Benchmark the peak builder alone on pre-detected mass peaks
fn bench_connector(c: &mut Criterion) {
    let mut group = c.benchmark_group("connector");
    let detector = CentroidDetector::new(CentroidParameters::default()).unwrap();

    for traces in [100, 1000, 5000] {
        let scans = create_scans(600, traces);
        let detected: Vec<_> = scans.iter().map(|s| detector.detect(s)).collect();
        let total: usize = detected.iter().map(|d| d.len()).sum();
        group.throughput(Throughput::Elements(total as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}traces", traces)),
            &traces,
            |b, _| {
                b.iter(|| {
                    let mut connector =
                        SimpleConnector::new(ConnectorParameters::default()).unwrap();
                    let mut peaks = 0;
                    for (scan, mass_peaks) in scans.iter().zip(&detected) {
                        peaks += connector.add_scan(scan, mass_peaks).len();
                    }
                    peaks += connector.finish_peaks().len();
                    black_box(peaks)
                })
            },
        );
    }

    group.finish();
}

/// Benchmark a full picker run over an in-memory source
fn bench_picker_task(c: &mut Criterion) {
    let mut group = c.benchmark_group("picker_task");
    group.sample_size(20);

    for num_scans in [300, 1200] {
        let source = Arc::new(
            InMemoryScanSource::from_scans("bench", create_scans(num_scans, 500)).unwrap(),
        );
        group.throughput(Throughput::Elements(num_scans as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}scans", num_scans)),
            &num_scans,
            |b, _| {
                b.iter(|| {
                    let task =
                        PeakPickerTask::new(source.clone(), PeakPickerParameters::default());
                    task.run();
                    black_box(task.result().map(|l| l.number_of_rows()))
                })
            },
        );
    }

    group.finish();
}

/// Benchmark the gap filter on a wide aligned list
fn bench_gap_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("gap_filter");

    let scans = create_scans(60, 1);
    let mut connector = SimpleConnector::new(ConnectorParameters::default()).unwrap();
    let detector = CentroidDetector::new(CentroidParameters::default()).unwrap();
    let mut peaks = Vec::new();
    for scan in &scans {
        peaks.extend(connector.add_scan(scan, &detector.detect(scan)));
    }
    peaks.extend(connector.finish_peaks());
    let peak = Arc::new(peaks.remove(0));

    let files: Vec<RawDataFileId> = (0..10).map(|i| RawDataFileId::new(format!("s{}", i))).collect();
    let mut list = PeakList::new("aligned");
    for file in &files {
        list.add_raw_data_file(file.clone());
    }
    for id in 0..50_000u32 {
        let mut row = PeakListRow::new(id + 1);
        for file in files.iter().take((id as usize * 7) % files.len() + 1) {
            row.add_peak(file.clone(), peak.clone());
        }
        list.add_row(row).unwrap();
    }
    let list = Arc::new(list);
    group.throughput(Throughput::Elements(list.number_of_rows() as u64));

    for min_present in [1, 5, 10] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("min{}", min_present)),
            &min_present,
            |b, &min_present| {
                b.iter(|| {
                    let task = GapFilterTask::new(list.clone(), min_present);
                    task.run();
                    black_box(task.result().map(|l| l.number_of_rows()))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_connector, bench_picker_task, bench_gap_filter);
criterion_main!(benches);
