use std::sync::Arc;

use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::model::{PeakList, PeakListRow};
use crate::sink::PeakListSink;

use super::{ResultSlot, Task, TaskState};

/// Configuration of a gap filtering run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GapFilterParameters {
    /// Minimum number of raw data files a row must have a peak in
    pub min_present: usize,
}

/// Keeps the rows of an aligned peak list that were detected in at least
/// `min_present` raw data files.
pub struct GapFilterTask {
    source: Arc<PeakList>,
    parameters: GapFilterParameters,
    sink: Option<Arc<dyn PeakListSink>>,
    state: Arc<TaskState>,
    result: ResultSlot,
}

impl GapFilterTask {
    /// Create a task filtering `source` with threshold `min_present`.
    pub fn new(source: Arc<PeakList>, min_present: usize) -> Self {
        Self::with_parameters(source, GapFilterParameters { min_present })
    }

    /// Create a task from a parameter set.
    pub fn with_parameters(source: Arc<PeakList>, parameters: GapFilterParameters) -> Self {
        let state = Arc::new(TaskState::new());
        state.set_total(source.number_of_rows());
        Self {
            source,
            parameters,
            sink: None,
            state,
            result: ResultSlot::default(),
        }
    }

    /// Publish the filtered list to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn PeakListSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Name the output list will carry.
    pub fn output_name(&self) -> String {
        format!("{} filtered", self.source.name())
    }

    /// Returns `Ok(None)` when the run was canceled.
    fn filter<'a>(
        &self,
        rows: impl IntoIterator<Item = &'a PeakListRow>,
    ) -> Result<Option<PeakList>, String> {
        let mut filtered = PeakList::new(self.output_name());
        for raw_file in self.source.raw_data_files() {
            filtered.add_raw_data_file(raw_file.clone());
        }

        for row in rows {
            if self.state.is_canceled() {
                return Ok(None);
            }
            if row.number_of_peaks() >= self.parameters.min_present {
                filtered.add_row(row.clone()).map_err(|e| e.to_string())?;
            }
            self.state.increment_processed();
        }
        Ok(Some(filtered))
    }

    fn run_over<'a>(&self, rows: impl IntoIterator<Item = &'a PeakListRow>) {
        if !self.state.start() {
            return;
        }
        info!(
            "Started gap filter on {} (minimum presence {})",
            self.source.name(),
            self.parameters.min_present
        );

        let filtered = match self.filter(rows) {
            Ok(Some(list)) => list,
            Ok(None) => {
                info!("Gap filter on {} canceled", self.source.name());
                return;
            }
            Err(message) => {
                error!("Error while filtering {}: {}", self.source.name(), message);
                self.state.fail(message);
                return;
            }
        };

        let kept = filtered.number_of_rows();
        self.result.store(filtered.clone());
        let finished = self.state.finish_with(|| match &self.sink {
            Some(sink) => sink.publish(filtered.clone()),
            None => Ok(()),
        });
        match finished {
            Ok(false) => info!("Gap filter on {} canceled", self.source.name()),
            Err(e) => {
                error!("Could not publish {}: {}", filtered.name(), e);
                self.state.fail(e.to_string());
            }
            Ok(true) => info!(
                "Finished gap filter on {}, kept {} of {} rows",
                self.source.name(),
                kept,
                self.source.number_of_rows()
            ),
        }
    }
}

impl Task for GapFilterTask {
    fn description(&self) -> String {
        format!("Filtering gaps in {}", self.source.name())
    }

    fn run(&self) {
        self.run_over(self.source.rows());
    }

    fn state(&self) -> &Arc<TaskState> {
        &self.state
    }

    fn result(&self) -> Option<PeakList> {
        self.result.get(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChromatographicPeak, PeakSample, RawDataFileId};
    use crate::sink::PeakListRegistry;
    use crate::task::TaskStatus;

    fn peak(mz: f64) -> Arc<ChromatographicPeak> {
        Arc::new(ChromatographicPeak::from_samples(vec![PeakSample::new(1, 1.0, mz, 10.0)]).unwrap())
    }

    /// Rows with the given peak counts over streams s0..s{streams}.
    fn aligned(counts: &[usize], streams: usize) -> PeakList {
        let mut list = PeakList::new("aligned");
        for s in 0..streams {
            list.add_raw_data_file(RawDataFileId::new(format!("s{}", s)));
        }
        for (i, &count) in counts.iter().enumerate() {
            let mut row = PeakListRow::new(i as u32 + 1);
            for s in 0..count {
                row.add_peak(RawDataFileId::new(format!("s{}", s)), peak(100.0 + i as f64));
            }
            list.add_row(row).unwrap();
        }
        list
    }

    fn counts(list: &PeakList) -> Vec<usize> {
        list.rows().iter().map(|r| r.number_of_peaks()).collect()
    }

    #[test]
    fn test_keeps_rows_meeting_threshold_in_order() {
        let task = GapFilterTask::new(Arc::new(aligned(&[3, 1, 2], 3)), 2);
        task.run();

        assert_eq!(task.status(), TaskStatus::Finished);
        let filtered = task.result().unwrap();
        assert_eq!(filtered.name(), "aligned filtered");
        assert_eq!(counts(&filtered), vec![3, 2]);
        assert_eq!(filtered.rows()[1].id(), 3);
        assert_eq!(filtered.raw_data_files().len(), 3);
        assert_eq!(task.finished_fraction(), 1.0);
    }

    #[test]
    fn test_zero_threshold_keeps_everything() {
        let source = aligned(&[0, 1, 2], 4);
        let task = GapFilterTask::new(Arc::new(source.clone()), 0);
        task.run();
        let filtered = task.result().unwrap();
        assert_eq!(filtered.rows(), source.rows());
        assert_eq!(filtered.raw_data_files(), source.raw_data_files());
    }

    #[test]
    fn test_threshold_above_stream_count_yields_empty_list() {
        let task = GapFilterTask::new(Arc::new(aligned(&[3, 3], 3)), 4);
        task.run();
        assert_eq!(task.status(), TaskStatus::Finished);
        let filtered = task.result().unwrap();
        assert_eq!(filtered.number_of_rows(), 0);
        assert_eq!(filtered.raw_data_files().len(), 3);
    }

    #[test]
    fn test_unreferenced_streams_are_kept() {
        let task = GapFilterTask::new(Arc::new(aligned(&[1], 5)), 1);
        task.run();
        assert_eq!(task.result().unwrap().raw_data_files().len(), 5);
    }

    #[test]
    fn test_cancel_before_run() {
        let task = GapFilterTask::new(Arc::new(aligned(&[1, 2], 2)), 1);
        let handle = task.handle();
        handle.cancel();
        task.run();
        assert_eq!(task.status(), TaskStatus::Canceled);
        assert_eq!(task.finished_fraction(), 0.0);
        assert!(task.result().is_none());
    }

    #[test]
    fn test_cancel_between_rows_publishes_nothing() {
        let source = Arc::new(aligned(&[3, 1, 2, 3], 3));
        let registry = Arc::new(PeakListRegistry::new());
        let task = GapFilterTask::new(Arc::clone(&source), 1).with_sink(registry.clone());
        let handle = task.handle();

        // Cancel while the second row is handed out.
        task.run_over(source.rows().iter().enumerate().map(|(i, row)| {
            if i == 1 {
                handle.cancel();
            }
            row
        }));

        assert_eq!(task.status(), TaskStatus::Canceled);
        assert_eq!(task.state().processed(), 1);
        assert!(task.result().is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_publishes_to_sink() {
        let registry = Arc::new(PeakListRegistry::new());
        let task = GapFilterTask::new(Arc::new(aligned(&[3, 1], 3)), 2).with_sink(registry.clone());
        task.run();
        assert_eq!(task.status(), TaskStatus::Finished);
        assert_eq!(registry.names(), vec!["aligned filtered"]);
        assert_eq!(registry.get("aligned filtered").unwrap().number_of_rows(), 1);
    }

    #[test]
    fn test_parameters_from_toml() {
        let p: GapFilterParameters = toml::from_str("min_present = 3").unwrap();
        assert_eq!(p.min_present, 3);
    }
}
