//! Non-destructive row selection over an annotated table.

use chrono::Datelike;
use std::collections::BTreeSet;
use std::io::Write;

use crate::record::{AnnotatedRecord, CustomerSegment};
use crate::schema::columns::RAW_VIEW_COLUMNS;

/// Row predicate built from per-column allow lists.
///
/// An empty list places no constraint on its column; a row matches when it
/// satisfies every non-empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Allowed transaction years
    pub years: BTreeSet<i32>,
    /// Allowed cities
    pub cities: BTreeSet<String>,
    /// Allowed products
    pub products: BTreeSet<String>,
    /// Allowed customer tiers
    pub segments: BTreeSet<CustomerSegment>,
    /// Allowed storage options
    pub storages: BTreeSet<String>,
    /// Allowed age groups
    pub age_groups: BTreeSet<String>,
}

impl Filter {
    /// A filter that matches every row
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow a year
    pub fn year(mut self, year: i32) -> Self {
        self.years.insert(year);
        self
    }

    /// Allow a city
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.cities.insert(city.into());
        self
    }

    /// Allow a product
    pub fn product(mut self, product: impl Into<String>) -> Self {
        self.products.insert(product.into());
        self
    }

    /// Allow a customer tier
    pub fn segment(mut self, segment: CustomerSegment) -> Self {
        self.segments.insert(segment);
        self
    }

    /// Allow a storage option
    pub fn storage(mut self, storage: impl Into<String>) -> Self {
        self.storages.insert(storage.into());
        self
    }

    /// Allow an age group
    pub fn age_group(mut self, age_group: impl Into<String>) -> Self {
        self.age_groups.insert(age_group.into());
        self
    }

    /// True when no column is constrained
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
            && self.cities.is_empty()
            && self.products.is_empty()
            && self.segments.is_empty()
            && self.storages.is_empty()
            && self.age_groups.is_empty()
    }

    /// Whether a row passes every constraint
    pub fn matches(&self, record: &AnnotatedRecord) -> bool {
        allows(&self.years, &record.transaction_date.year())
            && allows(&self.cities, &record.city)
            && allows(&self.products, &record.product_name)
            && allows(&self.segments, &record.customer_segment)
            && allows(&self.storages, &record.storage)
            && allows(&self.age_groups, &record.age_group)
    }

    /// Borrow the matching rows, preserving their order
    pub fn apply<'a>(&self, records: &'a [AnnotatedRecord]) -> FilteredView<'a> {
        if self.is_empty() {
            return FilteredView::all(records);
        }
        FilteredView {
            rows: records.iter().filter(|r| self.matches(r)).collect(),
        }
    }
}

fn allows<T: Ord>(allowed: &BTreeSet<T>, value: &T) -> bool {
    allowed.is_empty() || allowed.contains(value)
}

/// Rows selected from a table; the table itself is only borrowed
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    rows: Vec<&'a AnnotatedRecord>,
}

impl<'a> FilteredView<'a> {
    /// View over every row
    pub fn all(records: &'a [AnnotatedRecord]) -> Self {
        Self {
            rows: records.iter().collect(),
        }
    }

    /// Selected rows
    pub fn rows(&self) -> &[&'a AnnotatedRecord] {
        &self.rows
    }

    /// Iterate over the selected rows
    pub fn iter(&self) -> impl Iterator<Item = &'a AnnotatedRecord> + '_ {
        self.rows.iter().copied()
    }

    /// Number of selected rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when nothing matched
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(rows, columns)` of the raw table view
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows.len(), RAW_VIEW_COLUMNS.len())
    }

    /// Write the selected rows, derived columns included, as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        // Header is written explicitly so an empty view still gets one
        csv_writer.write_record(RAW_VIEW_COLUMNS)?;
        for row in &self.rows {
            csv_writer.serialize(row.raw_row())?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
