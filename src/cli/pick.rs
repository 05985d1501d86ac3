use anyhow::{Context, Result};
use clap::Args;
use crossbeam_channel::{unbounded, RecvTimeoutError};
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use mzpick::connection;
use mzpick::detection;
use mzpick::metadata::{ProcessingHistory, ProcessingStep};
use mzpick::reader::ScanFileReader;
use mzpick::sink::{ParquetDirectorySink, PeakListSink};
use mzpick::source::ScanSource;
use mzpick::task::{PeakPickerParameters, PeakPickerTask, Task, TaskSnapshot, TaskStatus};
use mzpick::tolerance::MzTolerance;

use super::config::Config;

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Command-line overrides of the `[picking]` config section.
#[derive(Args, Debug, Default)]
pub struct PickOverrides {
    /// Absolute m/z tolerance in Da
    #[arg(long, value_name = "DA", conflicts_with = "ppm")]
    mz_tolerance: Option<f64>,

    /// Relative m/z tolerance in ppm
    #[arg(long, value_name = "PPM")]
    ppm: Option<f64>,

    /// Number of missed scans tolerated before a peak is closed
    #[arg(long, value_name = "N")]
    gap_tolerance: Option<u32>,

    /// Minimum number of matched scans of a finalized peak
    #[arg(long, value_name = "N")]
    min_scans: Option<u32>,

    /// Noise level of the mass detector
    #[arg(long, value_name = "X")]
    noise_level: Option<f32>,

    /// Mass detector strategy (centroid, local_maxima)
    #[arg(long, value_name = "NAME")]
    detector: Option<String>,
}

impl PickOverrides {
    fn apply(&self, parameters: &mut PeakPickerParameters) -> Result<()> {
        if let Some(name) = &self.detector {
            parameters.mass_detector.name = name.clone();
        }
        if let Some(noise) = self.noise_level {
            parameters
                .mass_detector
                .parameters
                .insert("noise_level".to_string(), f64::from(noise).into());
        }

        let tolerance = match (self.mz_tolerance, self.ppm) {
            (Some(da), _) => Some(MzTolerance::Absolute(da)),
            (None, Some(ppm)) => Some(MzTolerance::Ppm(ppm)),
            (None, None) => None,
        };
        let builder = &mut parameters.peak_builder.parameters;
        if let Some(tolerance) = tolerance {
            let value = toml::Value::try_from(tolerance)
                .context("Failed to encode m/z tolerance")?;
            builder.insert("mz_tolerance".to_string(), value);
        }
        if let Some(gap) = self.gap_tolerance {
            builder.insert("gap_tolerance".to_string(), i64::from(gap).into());
        }
        if let Some(min_scans) = self.min_scans {
            builder.insert("min_matched_scans".to_string(), i64::from(min_scans).into());
        }
        Ok(())
    }
}

/// Pick peaks in every input concurrently, one thread per input
pub fn run(
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
    config_path: Option<PathBuf>,
    overrides: PickOverrides,
) -> Result<()> {
    let config = Config::load(config_path.as_deref())?;
    let mut parameters = config.picking;
    overrides.apply(&mut parameters)?;

    // Fail before loading any data when a strategy cannot be built.
    detection::default_registry()
        .create(&parameters.mass_detector)
        .context("Invalid mass detector configuration")?;
    connection::default_registry()
        .create(&parameters.peak_builder)
        .context("Invalid peak builder configuration")?;

    let mut history = ProcessingHistory::new();
    history.add_step(
        ProcessingStep::new("peak picking")
            .with_parameters(&parameters)
            .context("Failed to record processing parameters")?,
    );
    let sink = Arc::new(
        ParquetDirectorySink::new(&output_dir, config.output.writer_config()).with_history(history),
    );

    let mut tasks = Vec::with_capacity(inputs.len());
    for input in &inputs {
        let source = ScanFileReader::open(input)
            .and_then(|reader| reader.read_source())
            .with_context(|| format!("Failed to read scan file: {}", input.display()))?;
        info!(
            "Loaded {} scans of {} from {}",
            source.len(),
            source.raw_data_file(),
            input.display()
        );
        let sink: Arc<dyn PeakListSink> = sink.clone();
        let task = PeakPickerTask::new(Arc::new(source), parameters.clone()).with_sink(sink);
        tasks.push(Arc::new(task));
    }

    let (sender, receiver) = unbounded::<(usize, TaskSnapshot)>();
    let mut workers = Vec::with_capacity(tasks.len());
    for (index, task) in tasks.iter().enumerate() {
        let task = Arc::clone(task);
        let sender = sender.clone();
        let worker = thread::Builder::new()
            .name(format!("mzpick-picker-{}", index))
            .spawn(move || {
                task.run();
                // The receiver outlives every worker.
                let _ = sender.send((index, task.state().snapshot()));
            })
            .context("Failed to spawn picker thread")?;
        workers.push(worker);
    }
    drop(sender);

    let mut outcomes: Vec<Option<TaskSnapshot>> = vec![None; tasks.len()];
    let mut remaining = tasks.len();
    while remaining > 0 {
        match receiver.recv_timeout(PROGRESS_INTERVAL) {
            Ok((index, snapshot)) => {
                info!("{}: {}", tasks[index].description(), snapshot);
                outcomes[index] = Some(snapshot);
                remaining -= 1;
            }
            Err(RecvTimeoutError::Timeout) => {
                for (task, outcome) in tasks.iter().zip(&outcomes) {
                    if outcome.is_none() {
                        info!("{}: {}", task.description(), task.handle().snapshot());
                    }
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    for worker in workers {
        if worker.join().is_err() {
            anyhow::bail!("A picker thread panicked");
        }
    }

    let mut failures = 0;
    for (task, outcome) in tasks.iter().zip(&outcomes) {
        match outcome {
            Some(snapshot) if snapshot.status == TaskStatus::Finished => {
                let path = sink.path_for(&task.output_name());
                println!("{} -> {}", task.description(), path.display());
            }
            Some(snapshot) => {
                failures += 1;
                error!(
                    "{} ended {}: {}",
                    task.description(),
                    snapshot.status,
                    snapshot.error_message.as_deref().unwrap_or("no message")
                );
            }
            None => {
                failures += 1;
                error!("{} did not report completion", task.description());
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} picker runs failed", failures, tasks.len());
    }
    info!("Wrote {} peak list files to {}", tasks.len(), output_dir.display());
    Ok(())
}
