//! # Dashboard Summary
//!
//! Everything a dashboard renders for one filtered view: headline metrics, the
//! monthly trend, ranked breakdowns and categorical distributions. Every
//! aggregate is defined for an empty view (zeros, empty series, absent ratios).

mod format;
mod kpi;
mod series;


pub use format::format_amount;
pub use kpi::Kpis;
pub use series::{
    is_partial_month, month_over_month_growth, monthly_sales, ranked_sums, used_discount_share,
    value_counts, MonthlySales, RankedSum, ValueCount,
};

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::Dataset;
use crate::filter::FilteredView;
use crate::schema::{DEFAULT_TOP_N, MONTH_KEY_FORMAT};

/// Options controlling summary size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Entries kept in the city and product rankings
    pub top_n: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Metrics and chart series of one view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Headline metrics
    pub kpis: Kpis,
    /// Sales per month, oldest first
    pub monthly_sales: Vec<MonthlySales>,
    /// Last month against the previous one, in percent
    pub sales_growth_pct: Option<f64>,
    /// Best-selling cities
    pub top_cities: Vec<RankedSum>,
    /// Best-selling products
    pub top_products: Vec<RankedSum>,
    /// Sales per storage option
    pub storage_sales: Vec<RankedSum>,
    /// Rows per discount-usage label
    pub discount_usage: Vec<ValueCount>,
    /// Percent of rows that used a discount
    pub used_discount_pct: Option<f64>,
    /// Rows per age group
    pub age_groups: Vec<ValueCount>,
    /// Latest transaction date of the whole dataset
    pub last_transaction_date: Option<NaiveDate>,
    /// The final trend month is cut short by the end of the dataset
    pub partial_last_month: bool,
    /// Rows in the view
    pub rows: usize,
    /// Columns of the raw table
    pub columns: usize,
}

impl DashboardSummary {
    /// Summarize a view of `dataset`
    pub fn of(dataset: &Dataset, view: &FilteredView<'_>, options: SummaryOptions) -> Self {
        Self::compute(view, dataset.last_transaction_date(), options)
    }

    /// Summarize a view, given the last date of the dataset it came from
    pub fn compute(
        view: &FilteredView<'_>,
        last_transaction_date: Option<NaiveDate>,
        options: SummaryOptions,
    ) -> Self {
        let monthly = monthly_sales(view);
        let discount_usage = value_counts(view, |r| r.use_discount.label());

        let partial_last_month = match (last_transaction_date, monthly.last()) {
            (Some(date), Some(last)) => {
                last.month == date.format(MONTH_KEY_FORMAT).to_string() && is_partial_month(date)
            }
            _ => false,
        };
        let (rows, columns) = view.dimensions();

        Self {
            kpis: Kpis::compute(view),
            sales_growth_pct: month_over_month_growth(&monthly),
            monthly_sales: monthly,
            top_cities: ranked_sums(view, |r| r.city.as_str(), Some(options.top_n)),
            top_products: ranked_sums(view, |r| r.product_name.as_str(), Some(options.top_n)),
            storage_sales: ranked_sums(view, |r| r.storage.as_str(), None),
            used_discount_pct: used_discount_share(&discount_usage),
            discount_usage,
            age_groups: value_counts(view, |r| r.age_group.as_str()),
            last_transaction_date,
            partial_last_month,
            rows,
            columns,
        }
    }
}
