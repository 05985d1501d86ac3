//! Destinations for finished peak lists.
//!
//! A task publishes its result to the sink it was given instead of a process
//! wide project. Two sinks are provided: [`PeakListRegistry`] collects lists
//! in memory, [`ParquetDirectorySink`] writes each list to a Parquet file.

use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::info;

use crate::metadata::{PeakListMetadata, ProcessingHistory};
use crate::model::PeakList;
use crate::schema::PEAK_LIST_EXTENSION;
use crate::writer::{PeakListWriter, WriterConfig, WriterError};

/// Errors raised by a sink
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// A list with this name (or file name) was already published
    #[error("Peak list '{0}' already exists")]
    DuplicateName(String),

    /// I/O error preparing the destination
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error writing the list
    #[error("Writer error: {0}")]
    WriterError(#[from] WriterError),
}

/// Receives finished peak lists.
pub trait PeakListSink: Send + Sync {
    /// Take ownership of a finished list.
    fn publish(&self, list: PeakList) -> Result<(), SinkError>;
}

/// Thread-safe in-memory collection of published lists.
#[derive(Debug, Default)]
pub struct PeakListRegistry {
    lists: Mutex<Vec<PeakList>>,
}

impl PeakListRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of published lists.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing was published.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Names of the published lists in publication order.
    pub fn names(&self) -> Vec<String> {
        self.lock().iter().map(|l| l.name().to_string()).collect()
    }

    /// Clone of the list named `name`.
    pub fn get(&self, name: &str) -> Option<PeakList> {
        self.lock().iter().find(|l| l.name() == name).cloned()
    }

    /// Take every published list, leaving the registry empty.
    pub fn take_all(&self) -> Vec<PeakList> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<PeakList>> {
        self.lists
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PeakListSink for PeakListRegistry {
    fn publish(&self, list: PeakList) -> Result<(), SinkError> {
        let mut lists = self.lock();
        if lists.iter().any(|l| l.name() == list.name()) {
            return Err(SinkError::DuplicateName(list.name().to_string()));
        }
        lists.push(list);
        Ok(())
    }
}

/// Writes every published list to `<dir>/<sanitized name>.peaks.parquet`.
#[derive(Debug)]
pub struct ParquetDirectorySink {
    directory: PathBuf,
    config: WriterConfig,
    history: ProcessingHistory,
    claimed: Mutex<HashSet<PathBuf>>,
    written: Mutex<Vec<PathBuf>>,
}

impl ParquetDirectorySink {
    /// Sink writing into `directory`, created on first publish.
    pub fn new(directory: impl Into<PathBuf>, config: WriterConfig) -> Self {
        Self {
            directory: directory.into(),
            config,
            history: ProcessingHistory::new(),
            claimed: Mutex::new(HashSet::new()),
            written: Mutex::new(Vec::new()),
        }
    }

    /// Processing history recorded in every written file.
    pub fn with_history(mut self, history: ProcessingHistory) -> Self {
        self.history = history;
        self
    }

    /// Output path for a list name.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.directory
            .join(format!("{}{}", sanitize_file_name(name), PEAK_LIST_EXTENSION))
    }

    /// Files written so far.
    pub fn written_files(&self) -> Vec<PathBuf> {
        self.written
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn claimed(&self) -> std::sync::MutexGuard<'_, HashSet<PathBuf>> {
        self.claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self, list: &PeakList, path: &Path) -> Result<(), SinkError> {
        fs::create_dir_all(&self.directory)?;
        let metadata = PeakListMetadata::for_list(list).with_history(self.history.clone());
        let file = File::create(path)?;
        let mut writer = PeakListWriter::new(file, &metadata, self.config.clone())?;
        writer.write_peak_list(list)?;
        let stats = writer.finish()?;
        info!("Wrote {} to {}: {}", list.name(), path.display(), stats);
        Ok(())
    }
}

impl PeakListSink for ParquetDirectorySink {
    /// Two lists whose names sanitize to the same file name collide; the
    /// second one is rejected.
    fn publish(&self, list: PeakList) -> Result<(), SinkError> {
        let path = self.path_for(list.name());
        if !self.claimed().insert(path.clone()) {
            return Err(SinkError::DuplicateName(list.name().to_string()));
        }

        if let Err(e) = self.write(&list, &path) {
            self.claimed().remove(&path);
            return Err(e);
        }

        self.written
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(path);
        Ok(())
    }
}

/// Replace characters that are unsafe in file names.
pub fn sanitize_file_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect();
    if sanitized.is_empty() {
        "unnamed".to_string()
    } else {
        sanitized
    }
}
