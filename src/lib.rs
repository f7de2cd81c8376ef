//! # salescope - Customer Value Segmentation for Sales Data
//!
//! `salescope` loads a smartphone sales transaction table (CSV, from a URL or a
//! local file), labels every row with whether a discount coupon was used, and
//! classifies every customer into a value tier by their lifetime spend.
//!
//! ## Key Features
//!
//! - **Tolerant Loading**: Rows with missing values are dropped, while a
//!   missing column or an unparseable date fails the load with a typed error.
//!
//! - **Quantile Segmentation**: Customers are split at the 33rd and 66th
//!   percentiles of their total spend (linear interpolation) into
//!   `Low Value`, `Medium Value` and `High Value` tiers.
//!
//! - **Stable Tiers**: Tiers are computed once over the full table. Filtering
//!   narrows the rows but never recomputes thresholds.
//!
//! - **Shared Cache**: One immutable [`Dataset`](dataset::Dataset) per source,
//!   shared behind an `Arc` and replaced atomically on refresh.
//!
//! - **Dashboard Summaries**: KPIs, monthly trend, top cities and products,
//!   discount and age distributions for any filtered view.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use salescope::prelude::*;
//!
//! let loader = DataLoader::new(DataSource::parse("data_final.csv"));
//! let dataset = Dataset::cached(&loader)?;
//!
//! let view = dataset.filter(&Filter::new().year(2023).segment(CustomerSegment::High));
//! let summary = DashboardSummary::of(&dataset, &view, SummaryOptions::default());
//!
//! println!("{}", summary);
//! # Ok::<(), LoaderError>(())
//! ```
//!
//! ## Labeling Without a Dataset
//!
//! ```rust
//! use salescope::record::{discount_usage, DiscountUsage};
//! use salescope::segmentation::SegmentThresholds;
//! use salescope::record::CustomerSegment;
//!
//! assert_eq!(discount_usage("NONKUPON"), DiscountUsage::NoDiscount);
//! assert_eq!(discount_usage("SAVE10"), DiscountUsage::UsedDiscount);
//!
//! let totals: Vec<f64> = (1..=10).map(|i| i as f64 * 10.0).collect();
//! let thresholds = SegmentThresholds::from_totals(&totals).unwrap();
//! assert_eq!(thresholds.classify(71.0), CustomerSegment::High);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod dataset;
pub mod filter;
pub mod loader;
pub mod record;
pub mod schema;
pub mod segmentation;
pub mod summary;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::dataset::{reset_cache, Dataset};
    pub use crate::filter::{Filter, FilteredView};
    pub use crate::loader::{
        DataFormatError, DataLoader, DataSource, FetchError, FetchOptions, LoadStats, LoaderError,
    };
    pub use crate::record::{
        discount_usage, AnnotatedRecord, CustomerSegment, DiscountUsage, TransactionBuilder,
        TransactionRecord,
    };
    pub use crate::segmentation::{annotate, segment, SegmentThresholds, Segmentation};
    pub use crate::summary::{DashboardSummary, Kpis, SummaryOptions};
}
