use serde::Serialize;
use std::collections::HashSet;

use crate::filter::FilteredView;

/// Headline metrics of a view
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Kpis {
    /// Sum of `total`
    pub total_sales: f64,
    /// Sum of `quantity`, saturating at `u64::MAX`
    pub quantity_sold: u64,
    /// Distinct transaction ids
    pub total_orders: usize,
    /// Mean `total` per row, absent for an empty view
    pub average_sale: Option<f64>,
    /// Distinct product names
    pub unique_products: usize,
}

impl Kpis {
    /// Compute the metrics; an empty view yields zeros
    pub fn compute(view: &FilteredView<'_>) -> Self {
        let total_sales: f64 = view.iter().map(|r| r.total).sum();
        let quantity_sold = view
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.quantity));
        let total_orders = view
            .iter()
            .map(|r| r.transaction_id.as_str())
            .collect::<HashSet<_>>()
            .len();
        let unique_products = view
            .iter()
            .map(|r| r.product_name.as_str())
            .collect::<HashSet<_>>()
            .len();
        let average_sale = (!view.is_empty()).then(|| total_sales / view.len() as f64);

        Self {
            total_sales,
            quantity_sold,
            total_orders,
            average_sale,
            unique_products,
        }
    }
}
