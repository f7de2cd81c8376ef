//! # salescope
//!
//! A command-line tool for segmenting customers by lifetime spend and
//! summarizing smartphone sales transactions.
//!
//! ## Usage
//!
//! ```bash
//! # Dashboard metrics for Jakarta in 2023
//! salescope summary --year 2023 --city Jakarta
//!
//! # Tier thresholds and customer counts from a local copy
//! salescope segments --source data_final.csv
//!
//! # Export the high-value customers' transactions
//! salescope export high_value.csv --segment high
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
