use log::{debug, info};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::quantile::quantile_sorted;
use crate::record::{AnnotatedRecord, CustomerSegment, TransactionRecord};
use crate::schema::{HIGH_TIER_QUANTILE, LOW_TIER_QUANTILE};

/// Spend cutoffs between the value tiers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentThresholds {
    /// Upper bound (inclusive) of Low Value
    pub low: f64,
    /// Upper bound (inclusive) of Medium Value
    pub high: f64,
}

impl SegmentThresholds {
    /// Thresholds at the tier quantiles of per-customer totals.
    ///
    /// Returns `None` when there are no customers.
    pub fn from_totals(totals: &[f64]) -> Option<Self> {
        let mut sorted = totals.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            low: quantile_sorted(&sorted, LOW_TIER_QUANTILE)?,
            high: quantile_sorted(&sorted, HIGH_TIER_QUANTILE)?,
        })
    }

    /// Tier of a customer total; a total equal to a threshold takes the lower tier.
    pub fn classify(&self, total: f64) -> CustomerSegment {
        if total <= self.low {
            CustomerSegment::Low
        } else if total <= self.high {
            CustomerSegment::Medium
        } else {
            CustomerSegment::High
        }
    }

    /// Whether both cutoffs coincide, leaving Medium Value empty
    pub fn is_degenerate(&self) -> bool {
        self.low == self.high
    }
}

impl fmt::Display for SegmentThresholds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "low <= {:.2} < medium <= {:.2} < high", self.low, self.high)
    }
}

/// Aggregated spend of one customer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CustomerTotal {
    /// Sum of `total` over the customer's rows
    pub total: f64,
    /// Number of rows
    pub transactions: usize,
}

/// A customer's aggregate and tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CustomerProfile {
    /// Sum of `total` over the customer's rows
    pub total: f64,
    /// Number of rows
    pub transactions: usize,
    /// Assigned tier
    pub segment: CustomerSegment,
}

/// Customer count and spend of one tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierSummary {
    /// The tier
    pub segment: CustomerSegment,
    /// Customers in the tier
    pub customers: usize,
    /// Combined spend of those customers
    pub total_spend: f64,
}

/// Result of segmenting a record set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Segmentation {
    thresholds: Option<SegmentThresholds>,
    customers: BTreeMap<String, CustomerProfile>,
}

impl Segmentation {
    /// Cutoffs used, `None` for an empty record set
    pub fn thresholds(&self) -> Option<SegmentThresholds> {
        self.thresholds
    }

    /// Tier of a customer, `None` if the customer has no rows
    pub fn segment_of(&self, customer_id: &str) -> Option<CustomerSegment> {
        self.customers.get(customer_id).map(|p| p.segment)
    }

    /// Aggregate and tier of a customer
    pub fn profile(&self, customer_id: &str) -> Option<&CustomerProfile> {
        self.customers.get(customer_id)
    }

    /// All customers in id order
    pub fn customers(&self) -> impl Iterator<Item = (&str, &CustomerProfile)> {
        self.customers.iter().map(|(id, p)| (id.as_str(), p))
    }

    /// Customer id to tier mapping
    pub fn segments(&self) -> BTreeMap<String, CustomerSegment> {
        self.customers
            .iter()
            .map(|(id, p)| (id.clone(), p.segment))
            .collect()
    }

    /// Number of segmented customers
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    /// True when there are no customers
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Counts and spend for every tier, lowest first; empty tiers are included
    pub fn tier_summaries(&self) -> Vec<TierSummary> {
        CustomerSegment::ALL
            .iter()
            .map(|&segment| {
                let members = self.customers.values().filter(|p| p.segment == segment);
                let (customers, total_spend) =
                    members.fold((0, 0.0), |(n, spend), p| (n + 1, spend + p.total));
                TierSummary {
                    segment,
                    customers,
                    total_spend,
                }
            })
            .collect()
    }
}

/// Sums `total` per customer.
///
/// Each customer's amounts are added in ascending order so the result does not
/// depend on row order.
pub fn customer_totals(records: &[TransactionRecord]) -> BTreeMap<String, CustomerTotal> {
    let mut amounts: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for record in records {
        amounts
            .entry(record.customer_id.as_str())
            .or_default()
            .push(record.total);
    }

    amounts
        .into_iter()
        .map(|(id, mut values)| {
            values.sort_by(f64::total_cmp);
            // Clamped so thresholds stay finite
            let sum: f64 = values.iter().sum();
            let total = CustomerTotal {
                total: sum.min(f64::MAX),
                transactions: values.len(),
            };
            (id.to_string(), total)
        })
        .collect()
}

/// Assigns every customer in `records` to a value tier.
pub fn segment(records: &[TransactionRecord]) -> Segmentation {
    let totals = customer_totals(records);
    let values: Vec<f64> = totals.values().map(|t| t.total).collect();

    let Some(thresholds) = SegmentThresholds::from_totals(&values) else {
        debug!("No customers to segment");
        return Segmentation::default();
    };

    let distinct: BTreeSet<u64> = values.iter().map(|v| v.to_bits()).collect();
    if distinct.len() < 3 {
        debug!(
            "Only {} distinct customer totals, some tiers will be empty",
            distinct.len()
        );
    }
    info!("Segmented {} customers: {}", totals.len(), thresholds);

    let customers = totals
        .into_iter()
        .map(|(id, t)| {
            let profile = CustomerProfile {
                total: t.total,
                transactions: t.transactions,
                segment: thresholds.classify(t.total),
            };
            (id, profile)
        })
        .collect();

    Segmentation {
        thresholds: Some(thresholds),
        customers,
    }
}

/// Joins each record with its customer's tier.
///
/// Records whose customer is not part of `segmentation` are left out.
pub fn annotate(records: Vec<TransactionRecord>, segmentation: &Segmentation) -> Vec<AnnotatedRecord> {
    records
        .into_iter()
        .filter_map(|record| {
            let customer_segment = segmentation.segment_of(&record.customer_id)?;
            Some(AnnotatedRecord {
                record,
                customer_segment,
            })
        })
        .collect()
}
