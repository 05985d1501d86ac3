//! # Runs
//!
//! A task is one sequential unit of work (peak picking on one raw data file,
//! or gap filtering of one peak list) with an observable lifecycle.
//!
//! `run()` executes synchronously on the calling thread and never panics or
//! returns an error: failures are captured in the task status. Other threads
//! observe and cancel the run through a [`TaskHandle`].
//!
//! ```rust
//! use std::sync::Arc;
//! use mzpick::model::PeakList;
//! use mzpick::task::{GapFilterTask, Task, TaskStatus};
//!
//! let task = GapFilterTask::new(Arc::new(PeakList::new("aligned")), 2);
//! task.run();
//! assert_eq!(task.status(), TaskStatus::Finished);
//! assert_eq!(task.result().map(|l| l.name().to_string()).as_deref(), Some("aligned filtered"));
//! ```

mod gap_filter;
mod picker;
mod status;

pub use gap_filter::{GapFilterParameters, GapFilterTask};
pub use picker::{PeakPickerParameters, PeakPickerTask};
pub use status::{TaskHandle, TaskSnapshot, TaskState, TaskStatus};

use std::sync::{Arc, Mutex};

use crate::model::PeakList;

/// Observable, cancelable unit of work producing a [`PeakList`].
pub trait Task: Send + Sync {
    /// Human-readable description.
    fn description(&self) -> String;

    /// Execute to a terminal state.
    fn run(&self);

    /// Shared status of this run.
    fn state(&self) -> &Arc<TaskState>;

    /// The output list, available once the run is `Finished`.
    fn result(&self) -> Option<PeakList>;

    /// Request cancellation. Idempotent.
    fn cancel(&self) {
        self.state().cancel();
    }

    /// Current status.
    fn status(&self) -> TaskStatus {
        self.state().status()
    }

    /// Progress in `[0, 1]`.
    fn finished_fraction(&self) -> f64 {
        self.state().finished_fraction()
    }

    /// Failure message of an `Error` run.
    fn error_message(&self) -> Option<String> {
        self.state().error_message()
    }

    /// Cloneable controller handle.
    fn handle(&self) -> TaskHandle {
        TaskHandle::new(Arc::clone(self.state()))
    }
}

/// Result slot shared by the task implementations.
#[derive(Debug, Default)]
struct ResultSlot(Mutex<Option<PeakList>>);

impl ResultSlot {
    fn store(&self, list: PeakList) {
        *self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(list);
    }

    /// Clone of the stored list, only when `state` is `Finished`.
    fn get(&self, state: &TaskState) -> Option<PeakList> {
        if state.status() != TaskStatus::Finished {
            return None;
        }
        self.0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
