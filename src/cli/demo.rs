use anyhow::{Context, Result};
use log::info;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

use mzpick::metadata::ScanFileMetadata;
use mzpick::model::Scan;
use mzpick::schema::SCAN_FILE_EXTENSION;
use mzpick::writer::{CompressionType, ScanWriter, WriterConfig};

/// Length of the simulated gradient in seconds
const RUN_DURATION: f32 = 600.0;
/// Time between two MS1 scans in seconds
const CYCLE_TIME: f32 = 1.0;
/// Number of simulated analytes
const ANALYTES: usize = 40;
/// Intensity below which an elution profile is not recorded
const DETECTION_LIMIT: f32 = 50.0;
/// Random background points per scan
const NOISE_POINTS: usize = 15;

/// One compound eluting with a Gaussian profile.
#[derive(Debug, Clone, PartialEq)]
struct Analyte {
    mz: f64,
    apex_rt: f32,
    width: f32,
    height: f32,
}

/// Scans of one sample plus the analytes that were spiked into it.
struct Sample {
    name: String,
    present: Vec<Analyte>,
    scans: Vec<Scan>,
}

/// Write synthetic LC-MS scan files
pub fn run(output_dir: PathBuf, samples: usize, seed: u64, compression_level: i32) -> Result<()> {
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let config = WriterConfig {
        compression: CompressionType::Zstd(compression_level),
        ..Default::default()
    };

    let analytes = generate_analytes(seed);
    for index in 0..samples {
        let sample = generate_sample(index, &analytes, seed);
        let path = output_dir.join(format!("{}{}", sample.name, SCAN_FILE_EXTENSION));

        let metadata = ScanFileMetadata::new(sample.name.as_str());
        let mut writer = ScanWriter::new_file(&path, &metadata, config.clone())
            .with_context(|| format!("Failed to create {}", path.display()))?;
        for chunk in sample.scans.chunks(100) {
            writer
                .write_scans(chunk)
                .context("Failed to write scan batch")?;
        }
        let stats = writer.finish().context("Failed to finalize scan file")?;

        info!("{}: {}", sample.name, stats);
        println!(
            "{} -> {} ({} of {} analytes)",
            sample.name,
            path.display(),
            sample.present.len(),
            analytes.len()
        );
    }

    Ok(())
}

fn generate_analytes(seed: u64) -> Vec<Analyte> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..ANALYTES)
        .map(|k| Analyte {
            mz: 150.0 + k as f64 * 23.7 + rng.gen_range(0.0..1.0),
            apex_rt: rng.gen_range(30.0..RUN_DURATION - 30.0),
            width: rng.gen_range(3.0..8.0),
            height: 10f32.powf(rng.gen_range(4.0..6.0)),
        })
        .collect()
}

fn generate_sample(index: usize, analytes: &[Analyte], seed: u64) -> Sample {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(index as u64 + 1));

    // Each sample misses some analytes and shifts the rest slightly.
    let mut present = Vec::with_capacity(analytes.len());
    for analyte in analytes {
        if rng.gen_bool(0.8) {
            present.push(Analyte {
                apex_rt: analyte.apex_rt + rng.gen_range(-2.0..2.0),
                height: analyte.height * rng.gen_range(0.7..1.3),
                ..analyte.clone()
            });
        }
    }

    let jitter = Uniform::new(-0.002, 0.002);
    let noise_mz = Uniform::new(100.0, 1200.0);
    let noise_intensity = Uniform::new(10.0f32, 200.0);

    let scan_count = (RUN_DURATION / CYCLE_TIME) as i64;
    let scans = (0..scan_count)
        .map(|n| {
            let rt = n as f32 * CYCLE_TIME;
            let mut points: Vec<(f64, f32)> = Vec::new();
            for analyte in &present {
                let z = (rt - analyte.apex_rt) / analyte.width;
                let intensity = analyte.height * (-0.5 * z * z).exp();
                if intensity >= DETECTION_LIMIT {
                    points.push((analyte.mz + jitter.sample(&mut rng), intensity));
                }
            }
            for _ in 0..NOISE_POINTS {
                points.push((noise_mz.sample(&mut rng), noise_intensity.sample(&mut rng)));
            }
            points.sort_by(|a, b| a.0.total_cmp(&b.0));

            let (mz, intensity) = points.into_iter().unzip();
            Scan::new_ms1(n + 1, rt, mz, intensity)
        })
        .collect();

    Sample {
        name: format!("sample_{}", index + 1),
        present,
        scans,
    }
}
