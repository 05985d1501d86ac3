use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Lifecycle of a run.
///
/// `Waiting -> Processing -> {Finished | Canceled | Error}`. A run can also be
/// canceled while still waiting. Terminal states are never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TaskStatus {
    /// Created, not started
    Waiting = 0,
    /// Running
    Processing = 1,
    /// Completed; a result is available
    Finished = 2,
    /// Stopped on request; partial output is invalid
    Canceled = 3,
    /// Stopped by a failure; see the error message
    Error = 4,
}

impl TaskStatus {
    /// True for `Finished`, `Canceled` and `Error`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Canceled | Self::Error)
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Waiting,
            1 => Self::Processing,
            2 => Self::Finished,
            3 => Self::Canceled,
            _ => Self::Error,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Waiting => "WAITING",
            Self::Processing => "PROCESSING",
            Self::Finished => "FINISHED",
            Self::Canceled => "CANCELED",
            Self::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Shared, lock-free run status.
///
/// The owning task drives transitions; any thread may read progress or
/// request cancellation.
#[derive(Debug, Default)]
pub struct TaskState {
    status: AtomicU8,
    cancel_requested: AtomicBool,
    processed: AtomicUsize,
    total: AtomicUsize,
    error_message: Mutex<Option<String>>,
    commit: Mutex<()>,
}

impl TaskState {
    /// New state in `Waiting`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status.
    pub fn status(&self) -> TaskStatus {
        TaskStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    fn transition(&self, from: TaskStatus, to: TaskStatus) -> bool {
        self.status
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Move from `Waiting` to `Processing`. Returns false if the run was
    /// canceled (or already started) and must not proceed.
    pub fn start(&self) -> bool {
        self.transition(TaskStatus::Waiting, TaskStatus::Processing)
    }

    /// Move from `Processing` to `Finished`.
    pub fn finish(&self) -> bool {
        self.transition(TaskStatus::Processing, TaskStatus::Finished)
    }

    /// Record `message` and move a non-terminal run to `Error`.
    pub fn fail(&self, message: impl Into<String>) -> bool {
        let mut slot = self
            .error_message
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let failed = self.transition(TaskStatus::Processing, TaskStatus::Error)
            || self.transition(TaskStatus::Waiting, TaskStatus::Error);
        if failed {
            *slot = Some(message.into());
        }
        failed
    }

    /// Request cancellation. Idempotent; a non-terminal run moves to
    /// `Canceled` immediately and the worker stops at its next check.
    pub fn cancel(&self) {
        self.cancel_requested.store(true, Ordering::Release);
        let _commit = self.lock_commit();
        let _ = self.transition(TaskStatus::Waiting, TaskStatus::Canceled)
            || self.transition(TaskStatus::Processing, TaskStatus::Canceled);
    }

    /// Run `publish`, then move from `Processing` to `Finished`, with no
    /// [`cancel`](Self::cancel) in between.
    ///
    /// Returns `Ok(false)` without calling `publish` once cancellation was
    /// requested. A concurrent `cancel` waits until this returns.
    pub fn finish_with<E>(&self, publish: impl FnOnce() -> Result<(), E>) -> Result<bool, E> {
        let _commit = self.lock_commit();
        if self.is_canceled() || self.status() != TaskStatus::Processing {
            return Ok(false);
        }
        publish()?;
        Ok(self.finish())
    }

    fn lock_commit(&self) -> std::sync::MutexGuard<'_, ()> {
        self.commit
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Whether cancellation was requested.
    pub fn is_canceled(&self) -> bool {
        self.cancel_requested.load(Ordering::Acquire)
    }

    /// Set the number of work units.
    pub fn set_total(&self, total: usize) {
        self.total.store(total, Ordering::Release);
    }

    /// Count one processed work unit.
    pub fn increment_processed(&self) {
        self.processed.fetch_add(1, Ordering::AcqRel);
    }

    /// Processed work units.
    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::Acquire)
    }

    /// Total work units.
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Acquire)
    }

    /// Progress in `[0, 1]`; 0 when there is no work.
    pub fn finished_fraction(&self) -> f64 {
        fraction(self.processed(), self.total())
    }

    /// Message recorded by [`fail`](Self::fail).
    pub fn error_message(&self) -> Option<String> {
        self.error_message
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Consistent-enough copy of the state for reporting.
    pub fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            status: self.status(),
            processed: self.processed(),
            total: self.total(),
            error_message: self.error_message(),
        }
    }
}

fn fraction(processed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (processed as f64 / total as f64).min(1.0)
    }
}

/// Point-in-time view of a run, suitable for sending between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSnapshot {
    /// Status at the time of the snapshot
    pub status: TaskStatus,
    /// Processed work units
    pub processed: usize,
    /// Total work units
    pub total: usize,
    /// Failure message, if any
    pub error_message: Option<String>,
}

impl TaskSnapshot {
    /// Progress in `[0, 1]`.
    pub fn finished_fraction(&self) -> f64 {
        fraction(self.processed, self.total)
    }
}

impl fmt::Display for TaskSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{} ({:.1}%)",
            self.status,
            self.processed,
            self.total,
            self.finished_fraction() * 100.0
        )?;
        if let Some(message) = &self.error_message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

/// Cloneable controller-side view of a run.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    state: Arc<TaskState>,
}

impl TaskHandle {
    /// Wrap shared state.
    pub fn new(state: Arc<TaskState>) -> Self {
        Self { state }
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.state.cancel();
    }

    /// Current status.
    pub fn status(&self) -> TaskStatus {
        self.state.status()
    }

    /// Progress in `[0, 1]`.
    pub fn finished_fraction(&self) -> f64 {
        self.state.finished_fraction()
    }

    /// Whether the run reached a terminal state.
    pub fn is_done(&self) -> bool {
        self.state.status().is_terminal()
    }

    /// Point-in-time copy of the state.
    pub fn snapshot(&self) -> TaskSnapshot {
        self.state.snapshot()
    }
}
