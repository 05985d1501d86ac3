use std::sync::Arc;

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::connection::{self, PeakBuilderRegistry};
use crate::detection::{self, MassDetectorRegistry};
use crate::model::{ChromatographicPeak, PeakList, PeakListError, PeakListRow, RawDataFileId};
use crate::sink::PeakListSink;
use crate::source::ScanSource;
use crate::strategy::StrategyConfig;

use super::{ResultSlot, Task, TaskState};

/// Configuration of a peak picking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakPickerParameters {
    /// MS level of the scans to pick
    pub ms_level: i16,
    /// Appended to the raw data file name to name the output list
    pub suffix: String,
    /// Mass detection strategy
    pub mass_detector: StrategyConfig,
    /// Peak building strategy
    pub peak_builder: StrategyConfig,
}

impl Default for PeakPickerParameters {
    fn default() -> Self {
        Self {
            ms_level: 1,
            suffix: "peaks".to_string(),
            mass_detector: StrategyConfig::new(detection::CentroidDetector::NAME),
            peak_builder: StrategyConfig::new(connection::SimpleConnector::NAME),
        }
    }
}

/// Two-step peak picking over the scans of one raw data file.
///
/// Each scan at the configured MS level goes through the mass detector and
/// then the peak builder; every finalized peak becomes its own row, with row
/// ids counting up from 1.
pub struct PeakPickerTask {
    source: Arc<dyn ScanSource>,
    parameters: PeakPickerParameters,
    mass_detectors: MassDetectorRegistry,
    peak_builders: PeakBuilderRegistry,
    sink: Option<Arc<dyn PeakListSink>>,
    scan_numbers: Vec<i64>,
    state: Arc<TaskState>,
    result: ResultSlot,
}

impl PeakPickerTask {
    /// Create a task using the built-in strategies.
    pub fn new(source: Arc<dyn ScanSource>, parameters: PeakPickerParameters) -> Self {
        let scan_numbers = source.scan_numbers(parameters.ms_level);
        let state = Arc::new(TaskState::new());
        state.set_total(scan_numbers.len());
        Self {
            source,
            parameters,
            mass_detectors: detection::default_registry(),
            peak_builders: connection::default_registry(),
            sink: None,
            scan_numbers,
            state,
            result: ResultSlot::default(),
        }
    }

    /// Publish the finished list to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn PeakListSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Resolve strategies through custom registries.
    pub fn with_registries(
        mut self,
        mass_detectors: MassDetectorRegistry,
        peak_builders: PeakBuilderRegistry,
    ) -> Self {
        self.mass_detectors = mass_detectors;
        self.peak_builders = peak_builders;
        self
    }

    /// Run parameters.
    pub fn parameters(&self) -> &PeakPickerParameters {
        &self.parameters
    }

    /// Name the output list will carry.
    pub fn output_name(&self) -> String {
        format!("{} {}", self.source.raw_data_file(), self.parameters.suffix)
    }

    /// Returns `None` when the run was canceled.
    fn pick(&self) -> Result<Option<PeakList>, String> {
        let detector = self
            .mass_detectors
            .create(&self.parameters.mass_detector)
            .map_err(|e| e.to_string())?;
        let mut builder = self
            .peak_builders
            .create(&self.parameters.peak_builder)
            .map_err(|e| e.to_string())?;

        let raw_file = self.source.raw_data_file().clone();
        let mut output = RowAppender::new(PeakList::for_raw_data_file(
            self.output_name(),
            raw_file.clone(),
        ));

        for &scan_number in &self.scan_numbers {
            if self.state.is_canceled() {
                return Ok(None);
            }
            match self.source.scan(scan_number) {
                Some(scan) => {
                    let mass_peaks = detector.detect(scan);
                    let closed = builder.add_scan(scan, &mass_peaks);
                    output.append(&raw_file, closed).map_err(|e| e.to_string())?;
                }
                None => warn!(
                    "Scan {} of {} disappeared from the source, skipping",
                    scan_number, raw_file
                ),
            }
            self.state.increment_processed();
        }

        let remaining = builder.finish_peaks();
        debug!("Flushed {} open peaks of {}", remaining.len(), raw_file);
        output.append(&raw_file, remaining).map_err(|e| e.to_string())?;
        Ok(Some(output.list))
    }
}

/// Wraps finalized peaks into rows with increasing ids.
struct RowAppender {
    list: PeakList,
    next_row_id: u32,
}

impl RowAppender {
    fn new(list: PeakList) -> Self {
        Self {
            list,
            next_row_id: 1,
        }
    }

    fn append(
        &mut self,
        raw_file: &RawDataFileId,
        peaks: Vec<ChromatographicPeak>,
    ) -> Result<(), PeakListError> {
        for peak in peaks {
            let row = PeakListRow::with_peak(self.next_row_id, raw_file.clone(), peak);
            self.list.add_row(row)?;
            self.next_row_id += 1;
        }
        Ok(())
    }
}

impl Task for PeakPickerTask {
    fn description(&self) -> String {
        format!("Peak picking on {}", self.source.raw_data_file())
    }

    fn run(&self) {
        if !self.state.start() {
            return;
        }
        info!(
            "Started peak picking on {} ({} scans at MS level {})",
            self.source.raw_data_file(),
            self.scan_numbers.len(),
            self.parameters.ms_level
        );

        let list = match self.pick() {
            Ok(Some(list)) => list,
            Ok(None) => {
                info!("Peak picking on {} canceled", self.source.raw_data_file());
                return;
            }
            Err(message) => {
                error!("Error while picking peaks on {}: {}", self.source.raw_data_file(), message);
                self.state.fail(message);
                return;
            }
        };

        let rows = list.number_of_rows();
        self.result.store(list.clone());
        let finished = self.state.finish_with(|| match &self.sink {
            Some(sink) => sink.publish(list.clone()),
            None => Ok(()),
        });
        match finished {
            Ok(false) => info!("Peak picking on {} canceled", self.source.raw_data_file()),
            Err(e) => {
                error!("Could not publish {}: {}", list.name(), e);
                self.state.fail(e.to_string());
            }
            Ok(true) => info!(
                "Finished peak picking on {}, {} peaks found",
                self.source.raw_data_file(),
                rows
            ),
        }
    }

    fn state(&self) -> &Arc<TaskState> {
        &self.state
    }

    fn result(&self) -> Option<PeakList> {
        self.result.get(&self.state)
    }
}
