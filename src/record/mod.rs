//! Row types of the transaction table and their derived labels.

mod builder;


pub use builder::TransactionBuilder;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use crate::schema::NO_COUPON_SENTINEL;

/// One sale, fully populated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Opaque transaction identifier
    pub transaction_id: String,
    /// Opaque customer identifier
    pub customer_id: String,
    /// Calendar date of the sale
    pub transaction_date: NaiveDate,
    /// City of the sale
    pub city: String,
    /// Product sold
    pub product_name: String,
    /// Storage option of the product
    pub storage: String,
    /// Coupon code, [`NO_COUPON_SENTINEL`] when none was applied
    pub coupon_code: String,
    /// Units sold
    pub quantity: u64,
    /// Sale amount
    pub total: f64,
    /// Customer age group (`usia_group` in the source)
    pub age_group: String,
    /// Derived from `coupon_code` when the record is built
    pub use_discount: DiscountUsage,
}

/// Whether a coupon was applied to a sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiscountUsage {
    /// A coupon other than the sentinel was applied
    #[serde(rename = "Used Discount")]
    UsedDiscount,
    /// The coupon code is the sentinel
    #[serde(rename = "No Discount")]
    NoDiscount,
}

impl DiscountUsage {
    /// Both labels, in display order
    pub const ALL: [DiscountUsage; 2] = [DiscountUsage::UsedDiscount, DiscountUsage::NoDiscount];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            DiscountUsage::UsedDiscount => "Used Discount",
            DiscountUsage::NoDiscount => "No Discount",
        }
    }
}

impl fmt::Display for DiscountUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Labels a coupon code: anything but the sentinel counts as a used discount.
pub fn discount_usage(coupon_code: &str) -> DiscountUsage {
    if coupon_code != NO_COUPON_SENTINEL {
        DiscountUsage::UsedDiscount
    } else {
        DiscountUsage::NoDiscount
    }
}

/// Ordinal customer value tier, ordered `Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CustomerSegment {
    /// Spend at or below the low threshold
    #[serde(rename = "Low Value")]
    Low,
    /// Spend above the low threshold, at or below the high threshold
    #[serde(rename = "Medium Value")]
    Medium,
    /// Spend above the high threshold
    #[serde(rename = "High Value")]
    High,
}

impl CustomerSegment {
    /// Every tier, lowest first
    pub const ALL: [CustomerSegment; 3] = [
        CustomerSegment::Low,
        CustomerSegment::Medium,
        CustomerSegment::High,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            CustomerSegment::Low => "Low Value",
            CustomerSegment::Medium => "Medium Value",
            CustomerSegment::High => "High Value",
        }
    }
}

impl fmt::Display for CustomerSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a segment name cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown customer segment: {0} (expected low, medium or high)")]
pub struct ParseSegmentError(pub String);

impl FromStr for CustomerSegment {
    type Err = ParseSegmentError;

    /// Accepts the labels (`High Value`) as well as short forms (`high`,
    /// `high-value`, `high_value`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        let word = normalized.strip_suffix(" value").unwrap_or(&normalized);
        match word.trim() {
            "low" => Ok(CustomerSegment::Low),
            "medium" => Ok(CustomerSegment::Medium),
            "high" => Ok(CustomerSegment::High),
            _ => Err(ParseSegmentError(s.to_string())),
        }
    }
}

/// A transaction joined with its customer's value tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRecord {
    /// The source row
    pub record: TransactionRecord,
    /// Tier of `record.customer_id`
    pub customer_segment: CustomerSegment,
}

impl Deref for AnnotatedRecord {
    type Target = TransactionRecord;

    fn deref(&self) -> &Self::Target {
        &self.record
    }
}

impl AnnotatedRecord {
    /// Flat row in [`RAW_VIEW_COLUMNS`](crate::schema::columns::RAW_VIEW_COLUMNS) order
    pub fn raw_row(&self) -> RawRow<'_> {
        let r = &self.record;
        RawRow {
            transaction_id: &r.transaction_id,
            customer_id: &r.customer_id,
            transaction_date: r.transaction_date.format("%Y-%m-%d").to_string(),
            city: &r.city,
            product_name: &r.product_name,
            storage: &r.storage,
            coupon_code: &r.coupon_code,
            quantity: r.quantity,
            total: r.total,
            usia_group: &r.age_group,
            use_discount: r.use_discount.label(),
            customer_segment: self.customer_segment.label(),
        }
    }
}

/// Flat, serializable row of the annotated raw table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct RawRow<'a> {
    pub transaction_id: &'a str,
    pub customer_id: &'a str,
    pub transaction_date: String,
    pub city: &'a str,
    pub product_name: &'a str,
    pub storage: &'a str,
    pub coupon_code: &'a str,
    pub quantity: u64,
    pub total: f64,
    pub usia_group: &'a str,
    pub use_discount: &'static str,
    pub customer_segment: &'static str,
}
