//! # mzpick
//!
//! Command-line front end for two-step LC-MS peak picking.
//!
//! ## Usage
//!
//! ```bash
//! # Generate three synthetic samples
//! mzpick demo demo_data/
//!
//! # Pick peaks in every sample, one peak list file per input
//! mzpick pick demo_data/*.scans.parquet -o peaks/
//!
//! # Keep rows present in at least two samples
//! mzpick filter-gaps aligned.peaks.parquet filtered.peaks.parquet --min-present 2
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
