use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::filter::FilteredView;
use crate::record::{AnnotatedRecord, DiscountUsage};
use crate::schema::MONTH_KEY_FORMAT;

/// Sales of one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySales {
    /// `YYYY-MM`
    pub month: String,
    /// Sum of `total`
    pub total: f64,
}

/// A label with a summed amount
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSum {
    /// Group label
    pub label: String,
    /// Sum of `total` in the group
    pub total: f64,
}

/// A label with a row count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    /// Group label
    pub label: String,
    /// Rows in the group
    pub count: usize,
}

/// Sales per month, oldest first
pub fn monthly_sales(view: &FilteredView<'_>) -> Vec<MonthlySales> {
    let mut months: BTreeMap<String, f64> = BTreeMap::new();
    for record in view.iter() {
        let key = record.transaction_date.format(MONTH_KEY_FORMAT).to_string();
        *months.entry(key).or_insert(0.0) += record.total;
    }

    months
        .into_iter()
        .map(|(month, total)| MonthlySales { month, total })
        .collect()
}

/// Percent change of the last month against the one before it.
///
/// Absent with fewer than two months or when the earlier month sold nothing.
pub fn month_over_month_growth(trend: &[MonthlySales]) -> Option<f64> {
    match trend {
        [.., previous, last] if previous.total != 0.0 => {
            Some((last.total - previous.total) / previous.total * 100.0)
        }
        _ => None,
    }
}

/// Sums `total` by `key`, largest first (ties by label), keeping at most `limit`
pub fn ranked_sums<F>(view: &FilteredView<'_>, key: F, limit: Option<usize>) -> Vec<RankedSum>
where
    F: Fn(&AnnotatedRecord) -> &str,
{
    let mut sums: HashMap<&str, f64> = HashMap::new();
    for record in view.iter() {
        *sums.entry(key(record)).or_insert(0.0) += record.total;
    }

    let mut ranked: Vec<RankedSum> = sums
        .into_iter()
        .map(|(label, total)| RankedSum {
            label: label.to_string(),
            total,
        })
        .collect();
    ranked.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.label.cmp(&b.label)));
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}

/// Counts rows by `key`, most frequent first (ties by label)
pub fn value_counts<F>(view: &FilteredView<'_>, key: F) -> Vec<ValueCount>
where
    F: Fn(&AnnotatedRecord) -> &str,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in view.iter() {
        *counts.entry(key(record)).or_insert(0) += 1;
    }

    let mut counted: Vec<ValueCount> = counts
        .into_iter()
        .map(|(label, count)| ValueCount {
            label: label.to_string(),
            count,
        })
        .collect();
    counted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    counted
}

/// Percent of counted rows labelled as having used a discount
pub fn used_discount_share(counts: &[ValueCount]) -> Option<f64> {
    let total: usize = counts.iter().map(|c| c.count).sum();
    if total == 0 {
        return None;
    }
    let used: usize = counts
        .iter()
        .filter(|c| c.label == DiscountUsage::UsedDiscount.label())
        .map(|c| c.count)
        .sum();
    Some(used as f64 / total as f64 * 100.0)
}

/// Whether `date` falls before the last day of its month
pub fn is_partial_month(date: NaiveDate) -> bool {
    date.succ_opt()
        .map(|next| next.month() == date.month())
        .unwrap_or(false)
}
