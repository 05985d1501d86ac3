//! Property-based tests for the peak connector, the picker and the gap filter
//!
//! Uses proptest to generate random scan series and aligned peak lists and
//! checks the structural guarantees of every run.

use mzpick::connection::{ConnectorParameters, GapCounting, PeakBuilder, SimpleConnector};
use mzpick::model::{ChromatographicPeak, MassPeak, PeakList, PeakListRow, PeakSample, RawDataFileId, Scan};
use mzpick::source::InMemoryScanSource;
use mzpick::strategy::StrategyConfig;
use mzpick::task::{GapFilterTask, PeakPickerParameters, PeakPickerTask, Task, TaskStatus};
use mzpick::tolerance::MzTolerance;
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

/// m/z values close enough to each other that candidates compete for them.
const MZ_GRID: [f64; 6] = [200.0, 200.004, 200.012, 350.0, 350.008, 500.0];

fn arb_scan(scan_number: i64) -> impl Strategy<Value = Scan> {
    proptest::collection::vec((0..MZ_GRID.len(), 1.0f32..1e6), 0..8).prop_map(move |points| {
        let mut points: Vec<(f64, f32)> = points
            .into_iter()
            .map(|(slot, intensity)| (MZ_GRID[slot], intensity))
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        points.dedup_by(|a, b| a.0 == b.0);
        let (mz, intensity) = points.into_iter().unzip();
        Scan::new_ms1(scan_number, scan_number as f32 * 0.5, mz, intensity)
    })
}

fn arb_scans() -> impl Strategy<Value = Vec<Scan>> {
    (1usize..30).prop_flat_map(|count| {
        (1..=count as i64)
            .map(arb_scan)
            .collect::<Vec<_>>()
    })
}

fn arb_connector_parameters() -> impl Strategy<Value = ConnectorParameters> {
    (0u32..3, 1usize..4, prop::bool::ANY).prop_map(|(gap_tolerance, min_matched_scans, cumulative)| {
        ConnectorParameters {
            mz_tolerance: MzTolerance::Absolute(0.01),
            gap_tolerance,
            min_matched_scans,
            gap_counting: if cumulative {
                GapCounting::Cumulative
            } else {
                GapCounting::Consecutive
            },
            ..Default::default()
        }
    })
}

fn mass_peaks(scan: &Scan) -> Vec<MassPeak> {
    scan.data_points()
        .map(|(mz, intensity)| MassPeak::new(mz, intensity))
        .collect()
}

fn connect(scans: &[Scan], parameters: ConnectorParameters) -> Vec<ChromatographicPeak> {
    let mut connector = SimpleConnector::new(parameters).unwrap();
    let mut peaks = Vec::new();
    for scan in scans {
        peaks.extend(connector.add_scan(scan, &mass_peaks(scan)));
    }
    peaks.extend(connector.finish_peaks());
    peaks
}

proptest! {
    #[test]
    fn prop_peak_scans_strictly_increase(
        scans in arb_scans(),
        parameters in arb_connector_parameters(),
    ) {
        for peak in connect(&scans, parameters) {
            let numbers: Vec<i64> = peak.scan_numbers().collect();
            prop_assert!(numbers.windows(2).all(|w| w[0] < w[1]), "{:?}", numbers);
            prop_assert!(peak.scan_count() >= parameters.min_matched_scans);
        }
    }

    #[test]
    fn prop_mass_peaks_are_used_at_most_once(
        scans in arb_scans(),
        parameters in arb_connector_parameters(),
    ) {
        let mut used: HashMap<i64, usize> = HashMap::new();
        for peak in connect(&scans, parameters) {
            for sample in peak.samples() {
                *used.entry(sample.scan_number).or_default() += 1;
            }
        }
        for scan in &scans {
            let count = used.get(&scan.scan_number).copied().unwrap_or(0);
            prop_assert!(count <= scan.data_point_count());
        }
    }

    #[test]
    fn prop_finish_twice_yields_nothing(
        scans in arb_scans(),
        parameters in arb_connector_parameters(),
    ) {
        let mut connector = SimpleConnector::new(parameters).unwrap();
        for scan in &scans {
            connector.add_scan(scan, &mass_peaks(scan));
        }
        connector.finish_peaks();
        prop_assert_eq!(connector.open_candidates(), 0);
        prop_assert!(connector.finish_peaks().is_empty());
    }

    #[test]
    fn prop_picker_emits_one_row_per_peak(
        scans in arb_scans(),
        parameters in arb_connector_parameters(),
    ) {
        let expected = connect(&scans, parameters).len();

        let source = InMemoryScanSource::from_scans("run1", scans).unwrap();
        let task = PeakPickerTask::new(
            Arc::new(source),
            PeakPickerParameters {
                peak_builder: StrategyConfig::from_parameters("simple", &parameters).unwrap(),
                ..Default::default()
            },
        );
        task.run();
        prop_assert_eq!(task.status(), TaskStatus::Finished);

        let list = task.result().unwrap();
        prop_assert_eq!(list.number_of_rows(), expected);
        let ids: Vec<u32> = list.rows().iter().map(|r| r.id()).collect();
        let expected_ids: Vec<u32> = (1..=expected as u32).collect();
        prop_assert_eq!(ids, expected_ids);
        prop_assert!(list.rows().iter().all(|r| r.number_of_peaks() == 1));
    }

    #[test]
    fn prop_gap_filter_keeps_exactly_the_present_rows(
        presence in proptest::collection::vec(proptest::collection::vec(prop::bool::ANY, 4), 0..40),
        min_present in 0usize..6,
    ) {
        let raw_files: Vec<RawDataFileId> =
            (1..=4).map(|i| RawDataFileId::new(format!("s{}", i))).collect();
        let peak = Arc::new(
            ChromatographicPeak::from_samples(vec![PeakSample::new(1, 1.0, 300.0, 10.0)]).unwrap(),
        );

        let mut list = PeakList::new("aligned");
        for raw in &raw_files {
            list.add_raw_data_file(raw.clone());
        }
        for (i, present) in presence.iter().enumerate() {
            let mut row = PeakListRow::new(i as u32 + 1);
            for (raw, &is_present) in raw_files.iter().zip(present) {
                if is_present {
                    row.add_peak(raw.clone(), Arc::clone(&peak));
                }
            }
            list.add_row(row).unwrap();
        }

        let task = GapFilterTask::new(Arc::new(list.clone()), min_present);
        task.run();
        prop_assert_eq!(task.status(), TaskStatus::Finished);
        let filtered = task.result().unwrap();

        let expected: Vec<&PeakListRow> = list
            .rows()
            .iter()
            .filter(|r| r.number_of_peaks() >= min_present)
            .collect();
        let kept: Vec<&PeakListRow> = filtered.rows().iter().collect();
        prop_assert_eq!(kept, expected);
        prop_assert_eq!(filtered.raw_data_files(), list.raw_data_files());
    }
}
