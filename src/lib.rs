//! # mzpick - Two-Step LC-MS Peak Picking
//!
//! `mzpick` turns a stream of LC-MS scans into chromatographic peaks and
//! filters aligned peak lists by cross-sample presence.
//!
//! ## Key Features
//!
//! - **Two-step picking**: a [`MassDetector`](detection::MassDetector) turns
//!   each scan into mass peaks, a [`PeakBuilder`](connection::PeakBuilder)
//!   connects them across scans into chromatographic peaks.
//!
//! - **Pluggable strategies**: detectors and builders are selected by name from
//!   a [`StrategyRegistry`](strategy::StrategyRegistry) with a TOML parameter
//!   table, once per run.
//!
//! - **Observable runs**: [`PeakPickerTask`](task::PeakPickerTask) and
//!   [`GapFilterTask`](task::GapFilterTask) report progress, can be canceled
//!   from another thread and end in exactly one terminal state.
//!
//! - **Parquet storage**: scans and peak lists are stored as Apache Parquet
//!   tables with ZSTD compression, list-level metadata lives in the footer.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use mzpick::model::Scan;
//! use mzpick::source::InMemoryScanSource;
//! use mzpick::strategy::StrategyConfig;
//! use mzpick::task::{PeakPickerParameters, PeakPickerTask, Task, TaskStatus};
//!
//! let scans = (1..=5).map(|n| Scan::new_ms1(n, n as f32, vec![200.0], vec![1000.0 * n as f32]));
//! let source = InMemoryScanSource::from_scans("run1", scans)?;
//!
//! let parameters = PeakPickerParameters {
//!     peak_builder: StrategyConfig::new("simple").with_parameter("min_matched_scans", 2),
//!     ..Default::default()
//! };
//! let task = PeakPickerTask::new(Arc::new(source), parameters);
//! task.run();
//!
//! assert_eq!(task.status(), TaskStatus::Finished);
//! let peaks = task.result().unwrap();
//! assert_eq!(peaks.name(), "run1 peaks");
//! assert_eq!(peaks.number_of_rows(), 1);
//! # Ok::<(), mzpick::source::SourceError>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`model`]: scans, mass peaks, chromatographic peaks and peak lists
//! - [`tolerance`]: m/z tolerance windows (Da or ppm)
//! - [`strategy`]: name-to-factory registries for configurable strategies
//! - [`detection`]: mass detectors (step one)
//! - [`connection`]: peak builders (step two)
//! - [`source`]: read-only scan sources
//! - [`task`]: peak picking and gap filtering runs
//! - [`sink`]: destinations for finished peak lists
//! - [`schema`]: Arrow schemas of the Parquet tables
//! - [`metadata`]: Parquet footer metadata and processing history
//! - [`reader`] / [`writer`]: Parquet readers and streaming writers
//!
//! ## Reading Output Files
//!
//! Peak list files are standard Parquet files:
//!
//! ```sql
//! -- DuckDB
//! SELECT row_id, raw_file, mz, rt_apex, height
//! FROM read_parquet('run1 peaks.peaks.parquet')
//! WHERE height > 1e5;
//! ```

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod connection;
pub mod detection;
pub mod metadata;
pub mod model;
pub mod reader;
pub mod schema;
pub mod sink;
pub mod source;
pub mod strategy;
pub mod task;
pub mod tolerance;
pub mod writer;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::connection::{ConnectorParameters, GapCounting, PeakBuilder, SimpleConnector};
    pub use crate::detection::{CentroidDetector, LocalMaximaDetector, MassDetector};
    pub use crate::metadata::{PeakListMetadata, ProcessingHistory, ProcessingStep};
    pub use crate::model::{
        ChromatographicPeak, MassPeak, PeakList, PeakListRow, PeakSample, RawDataFileId, Scan,
    };
    pub use crate::reader::{PeakListReader, ReaderError, ScanFileReader};
    pub use crate::sink::{ParquetDirectorySink, PeakListRegistry, PeakListSink};
    pub use crate::source::{InMemoryScanSource, ScanSource};
    pub use crate::strategy::{StrategyConfig, StrategyError, StrategyRegistry};
    pub use crate::task::{
        GapFilterTask, PeakPickerParameters, PeakPickerTask, Task, TaskHandle, TaskStatus,
    };
    pub use crate::tolerance::MzTolerance;
    pub use crate::writer::{CompressionType, PeakListWriter, ScanWriter, WriterConfig};
}
