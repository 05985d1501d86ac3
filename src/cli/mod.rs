use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod demo;
mod filter;
mod info;
mod pick;

use pick::PickOverrides;

/// mzpick - two-step LC-MS peak picking and gap filtering
#[derive(Parser)]
#[command(name = "mzpick")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write synthetic LC-MS scan files for testing
    Demo {
        /// Directory receiving one scan file per sample
        #[arg(value_name = "OUTPUT_DIR")]
        output_dir: PathBuf,

        /// Number of samples (raw data files) to generate
        #[arg(short = 'n', long, default_value_t = 3)]
        samples: usize,

        /// Seed of the noise generator
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Compression level for ZSTD (1-22, default: 3)
        #[arg(short = 'c', long, default_value = "3")]
        compression_level: i32,
    },

    /// Pick chromatographic peaks in one or more scan files
    Pick {
        /// Input scan files
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Directory receiving one peak list file per input
        #[arg(short = 'o', long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        #[command(flatten)]
        overrides: PickOverrides,
    },

    /// Keep only rows detected in at least N raw data files
    FilterGaps {
        /// Input peak list file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output peak list file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Minimum number of raw data files with a peak
        #[arg(short = 'm', long)]
        min_present: Option<usize>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Display information about a scan file or peak list file
    Info {
        /// Input Parquet file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Demo {
            output_dir,
            samples,
            seed,
            compression_level,
        } => demo::run(output_dir, samples, seed, compression_level),
        Commands::Pick {
            inputs,
            output,
            config,
            overrides,
        } => pick::run(inputs, output, config, overrides),
        Commands::FilterGaps {
            input,
            output,
            min_present,
            config,
        } => filter::run(input, output, min_present, config),
        Commands::Info { file } => info::run(file),
    }
}
