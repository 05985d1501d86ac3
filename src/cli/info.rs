use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

use mzpick::model::PeakList;
use mzpick::reader::{inspect, FileMetadata, PeakListReader, ScanFileReader};
use mzpick::schema::{TABLE_KIND_PEAK_LIST, TABLE_KIND_SCANS};

/// Section heading, bold cyan when colors are enabled
fn heading(text: &str) -> String {
    #[cfg(feature = "colorized_output")]
    {
        console::style(text).bold().cyan().to_string()
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        text.to_string()
    }
}

/// Value highlight, green when colors are enabled
fn highlight<T: std::fmt::Display>(value: T) -> String {
    #[cfg(feature = "colorized_output")]
    {
        console::style(value).green().to_string()
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        value.to_string()
    }
}

/// Display information about a scan file or peak list file
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let metadata = inspect(&file).context("Failed to read Parquet file")?;

    println!("{}", heading("mzpick File Information"));
    println!("{}", heading("======================="));
    println!("File: {}", file.display());
    println!();

    print_file_statistics(&metadata);
    print_footer(&metadata);

    match metadata.table_kind.as_deref() {
        Some(TABLE_KIND_SCANS) => {
            let reader = ScanFileReader::open(&file).context("Failed to open scan file")?;
            print_scan_summary(&reader)?;
        }
        Some(TABLE_KIND_PEAK_LIST) => {
            let list = PeakListReader::open(&file)
                .and_then(|reader| reader.read_peak_list())
                .context("Failed to read peak list")?;
            print_peak_list_summary(&list);
        }
        _ => println!("Not an mzpick file: no table kind recorded in the footer"),
    }

    Ok(())
}

fn print_file_statistics(metadata: &FileMetadata) {
    println!("{}", heading("File Statistics:"));
    println!("  Format version: {}", metadata.format_version);
    println!("  Row groups: {}", highlight(metadata.num_row_groups));
    println!("  Total rows: {}", highlight(metadata.total_rows));
    println!("  Schema columns: {}", metadata.schema.fields().len());
    println!();
}

fn print_footer(metadata: &FileMetadata) {
    println!("{}", heading("Metadata Keys:"));
    let sorted: BTreeMap<_, _> = metadata.key_value_metadata.iter().collect();
    for (key, value) in sorted {
        // ARROW:schema is a base64 blob.
        let preview = if value.len() > 100 {
            let cut = (0..=100).rev().find(|&i| value.is_char_boundary(i)).unwrap_or(0);
            format!("{}... ({} bytes)", &value[..cut], value.len())
        } else {
            value.clone()
        };
        println!("  {}: {}", key, preview);
    }
    println!();
}

fn print_scan_summary(reader: &ScanFileReader) -> Result<()> {
    let scans = reader.read_scans().context("Failed to read scans")?;

    let mut per_level: BTreeMap<i16, usize> = BTreeMap::new();
    for scan in &scans {
        *per_level.entry(scan.ms_level).or_default() += 1;
    }
    let observations: usize = scans.iter().map(|s| s.data_point_count()).sum();
    let empty = scans.iter().filter(|s| s.is_empty()).count();

    println!("{}", heading("Scans:"));
    println!("  Raw data file: {}", highlight(reader.raw_data_file()));
    println!("  Scans: {} ({} without observations)", highlight(scans.len()), empty);
    for (level, count) in per_level {
        println!("    MS{}: {}", level, count);
    }
    println!("  Observations: {}", highlight(observations));
    if let (Some(first), Some(last)) = (scans.first(), scans.last()) {
        println!(
            "  Retention time: {:.2} - {:.2} s",
            first.retention_time, last.retention_time
        );
    }
    Ok(())
}

fn print_peak_list_summary(list: &PeakList) {
    println!("{}", heading("Peak List:"));
    println!("  Name: {}", highlight(list.name()));
    println!("  Rows: {}", highlight(list.number_of_rows()));
    println!("  Peaks: {}", highlight(list.number_of_peaks()));

    println!("  Raw data files:");
    for raw_file in list.raw_data_files() {
        let peaks = list
            .rows()
            .iter()
            .filter(|row| row.peak(raw_file).is_some())
            .count();
        println!("    {}: {} peaks", raw_file, peaks);
    }

    let mut presence: BTreeMap<usize, usize> = BTreeMap::new();
    for row in list.rows() {
        *presence.entry(row.number_of_peaks()).or_default() += 1;
    }
    println!("  Rows by number of peaks:");
    for (peaks, rows) in presence {
        println!("    {}: {} rows", peaks, rows);
    }
}
