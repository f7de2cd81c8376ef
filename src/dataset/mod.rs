//! # Segmented Dataset
//!
//! A [`Dataset`] is the loaded transaction table joined with customer value
//! tiers. It is built once and never modified: filters produce borrowed
//! [`FilteredView`]s, and a refresh builds a new dataset and swaps it into the
//! process-wide cache atomically.
//!
//! ```rust,no_run
//! use salescope::dataset::Dataset;
//! use salescope::filter::Filter;
//! use salescope::loader::DataLoader;
//!
//! let dataset = Dataset::cached(&DataLoader::default())?;
//! let view = dataset.filter(&Filter::new().year(2024).city("Jakarta"));
//! println!("{} matching rows", view.len());
//! # Ok::<(), salescope::loader::LoaderError>(())
//! ```

mod cache;

#[cfg(test)]
mod tests;

pub use cache::{evict, lookup, reset_cache};

use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crate::filter::{Filter, FilteredView};
use crate::loader::{DataLoader, LoadStats, LoaderError};
use crate::record::{AnnotatedRecord, CustomerSegment, TransactionRecord};
use crate::segmentation::{annotate, segment, SegmentThresholds, Segmentation};

/// The annotated, immutable transaction table
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<AnnotatedRecord>,
    segmentation: Segmentation,
    stats: LoadStats,
}

impl Dataset {
    /// Segment `records` and join the tiers onto them
    pub fn from_records(records: Vec<TransactionRecord>) -> Self {
        let stats = LoadStats {
            rows_read: records.len(),
            rows_dropped: 0,
        };
        Self::build(records, stats)
    }

    fn build(records: Vec<TransactionRecord>, stats: LoadStats) -> Self {
        let segmentation = segment(&records);
        let records = annotate(records, &segmentation);
        Self {
            records,
            segmentation,
            stats,
        }
    }

    /// Load and segment, bypassing the cache
    pub fn load(loader: &DataLoader) -> Result<Self, LoaderError> {
        let (records, stats) = loader.load_with_stats()?;
        Ok(Self::build(records, stats))
    }

    /// The cached dataset of the loader's source, loading it on first access
    pub fn cached(loader: &DataLoader) -> Result<Arc<Self>, LoaderError> {
        cache::get_or_load(&loader.source().id(), || Self::load(loader))
    }

    /// Reload the loader's source and replace the cached dataset.
    ///
    /// On failure the previously cached dataset stays in place.
    pub fn refresh(loader: &DataLoader) -> Result<Arc<Self>, LoaderError> {
        let dataset = Self::load(loader)?;
        Ok(cache::replace(&loader.source().id(), dataset))
    }

    /// All annotated rows in source order
    pub fn records(&self) -> &[AnnotatedRecord] {
        &self.records
    }

    /// Customer tiers computed over the full table
    pub fn segmentation(&self) -> &Segmentation {
        &self.segmentation
    }

    /// Tier cutoffs computed over the full table
    pub fn thresholds(&self) -> Option<SegmentThresholds> {
        self.segmentation.thresholds()
    }

    /// Row counts of the load that produced this dataset
    pub fn load_stats(&self) -> LoadStats {
        self.stats
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every row, unfiltered
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView::all(&self.records)
    }

    /// Rows matching `filter`; tiers keep their full-table meaning
    pub fn filter(&self, filter: &Filter) -> FilteredView<'_> {
        filter.apply(&self.records)
    }

    /// Latest transaction date
    pub fn last_transaction_date(&self) -> Option<NaiveDate> {
        self.records.iter().map(|r| r.transaction_date).max()
    }

    /// Distinct years, ascending
    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self
            .records
            .iter()
            .map(|r| r.transaction_date.year())
            .collect();
        years.into_iter().collect()
    }

    /// Distinct cities in order of first appearance
    pub fn cities(&self) -> Vec<&str> {
        self.distinct(|r| r.city.as_str())
    }

    /// Distinct products in order of first appearance
    pub fn products(&self) -> Vec<&str> {
        self.distinct(|r| r.product_name.as_str())
    }

    /// Distinct storage options in order of first appearance
    pub fn storages(&self) -> Vec<&str> {
        self.distinct(|r| r.storage.as_str())
    }

    /// Distinct age groups in order of first appearance
    pub fn age_groups(&self) -> Vec<&str> {
        self.distinct(|r| r.age_group.as_str())
    }

    /// Tiers present in the table, in order of first appearance
    pub fn segments(&self) -> Vec<CustomerSegment> {
        self.distinct(|r| r.customer_segment)
    }

    fn distinct<'a, T, F>(&'a self, key: F) -> Vec<T>
    where
        T: Eq + std::hash::Hash + Copy,
        F: Fn(&'a AnnotatedRecord) -> T,
    {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(key)
            .filter(|value| seen.insert(*value))
            .collect()
    }
}
