//! # Data Loader
//!
//! Retrieves the transaction table, validates it and turns it into
//! [`TransactionRecord`]s:
//!
//! 1. Fetch the raw CSV from a [`DataSource`] (remote URL or local file)
//! 2. Resolve the required columns, failing with [`DataFormatError`] if any is absent
//! 3. Parse dates and numbers; a malformed value fails the whole load
//! 4. Drop every row with a missing field
//! 5. Derive the discount-usage label of every kept row
//!
//! ```rust,no_run
//! use salescope::loader::{DataLoader, DataSource};
//!
//! let loader = DataLoader::new(DataSource::parse("data/data_final.csv"));
//! let records = loader.load()?;
//! println!("{} transactions", records.len());
//! # Ok::<(), salescope::loader::LoaderError>(())
//! ```

mod error;
mod parse;
mod source;


pub use error::{DataFormatError, FetchError, LoaderError};
pub use parse::{parse_date, parse_records, LoadStats};
pub use source::{DataSource, FetchOptions};

use log::{info, warn};
use std::io::Cursor;

use crate::record::TransactionRecord;

/// Loads the transaction table from a fixed source
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    source: DataSource,
    options: FetchOptions,
}

impl DataLoader {
    /// Create a loader for the given source with default fetch options
    pub fn new(source: DataSource) -> Self {
        Self {
            source,
            options: FetchOptions::default(),
        }
    }

    /// Replace the fetch options
    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    /// The source this loader reads
    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Fetch options in use
    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Fetch and parse the table
    pub fn load(&self) -> Result<Vec<TransactionRecord>, LoaderError> {
        self.load_with_stats().map(|(records, _)| records)
    }

    /// Fetch and parse the table, also returning row counts
    pub fn load_with_stats(&self) -> Result<(Vec<TransactionRecord>, LoadStats), LoaderError> {
        let bytes = self.source.fetch(&self.options)?;
        let (records, stats) = parse_records(Cursor::new(bytes))?;

        info!("Loaded {}: {}", self.source, stats);
        if records.is_empty() {
            warn!("No complete rows in {}", self.source);
        }

        Ok((records, stats))
    }
}
