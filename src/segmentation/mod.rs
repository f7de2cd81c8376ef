//! # Customer Segmentation
//!
//! Customers are ranked by lifetime spend and split into three ordinal tiers:
//!
//! 1. Sum `total` per customer id
//! 2. Take the 0.33 and 0.66 quantiles of those sums (linear interpolation)
//! 3. `total <= low` is Low Value, `total <= high` is Medium Value, the rest High Value
//! 4. Broadcast each customer's tier onto their transactions
//!
//! Thresholds must come from the full, unfiltered record set; views built later
//! reuse them rather than segmenting again.

mod engine;
mod quantile;

#[cfg(test)]
mod tests;

pub use engine::{
    annotate, customer_totals, segment, CustomerProfile, CustomerTotal, Segmentation,
    SegmentThresholds, TierSummary,
};
pub use quantile::{quantile, quantile_sorted};
