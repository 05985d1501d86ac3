use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use mzpick::metadata::ProcessingStep;
use mzpick::reader::PeakListReader;
use mzpick::task::{GapFilterParameters, GapFilterTask, Task, TaskStatus};
use mzpick::writer::write_peak_list_file;

use super::config::Config;

/// Run the gap filter on a peak list file
pub fn run(
    input: PathBuf,
    output: PathBuf,
    min_present: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load(config_path.as_deref())?;
    let min_present = min_present.or(config.filter.min_present).context(
        "No minimum presence given: pass --min-present or set [filter] min_present",
    )?;

    let reader = PeakListReader::open(&input)
        .with_context(|| format!("Failed to open peak list file: {}", input.display()))?;
    let list = reader
        .read_peak_list()
        .with_context(|| format!("Failed to read peak list: {}", input.display()))?;
    let mut history = reader.list_metadata().processing_history.clone();
    info!(
        "Loaded '{}': {} rows over {} raw data files",
        list.name(),
        list.number_of_rows(),
        list.raw_data_files().len()
    );

    let input_rows = list.number_of_rows();
    let parameters = GapFilterParameters { min_present };
    let task = GapFilterTask::with_parameters(Arc::new(list), parameters);
    task.run();
    if task.status() != TaskStatus::Finished {
        anyhow::bail!(
            "{} ended {}: {}",
            task.description(),
            task.status(),
            task.error_message().as_deref().unwrap_or("no message")
        );
    }
    let filtered = task
        .result()
        .context("Gap filter finished without a result")?;

    history.add_step(
        ProcessingStep::new("gap filtering")
            .with_parameters(&parameters)
            .context("Failed to record processing parameters")?,
    );
    let stats = write_peak_list_file(&output, &filtered, history, config.output.writer_config())
        .with_context(|| format!("Failed to write peak list file: {}", output.display()))?;

    info!("{}", stats);
    println!(
        "Kept {} of {} rows (min present: {}) -> {}",
        filtered.number_of_rows(),
        input_rows,
        min_present,
        output.display()
    );
    Ok(())
}
