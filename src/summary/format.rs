use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

use super::{DashboardSummary, RankedSum, ValueCount};

const SCALES: [(f64, &str); 3] = [(1e12, "Trillion"), (1e9, "Billion"), (1e6, "Million")];

/// Formats an amount with a word scale above one million, otherwise with
/// thousands separators: `2.35 Trillion`, `15.00 Million`, `12,500`.
pub fn format_amount(value: f64) -> String {
    for (scale, word) in SCALES {
        if value.abs() >= scale {
            return format!("{:.2} {}", value / scale, word);
        }
    }
    let grouped = group_thousands(value.abs().round() as u64);
    if value < 0.0 && grouped != "0" {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

fn heading(text: &str) -> String {
    #[cfg(feature = "colorized_output")]
    {
        style(text).bold().cyan().to_string()
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        text.to_string()
    }
}

fn write_ranked(f: &mut fmt::Formatter<'_>, title: &str, entries: &[RankedSum]) -> fmt::Result {
    writeln!(f, "{}", heading(title))?;
    if entries.is_empty() {
        return writeln!(f, "  (no data)");
    }
    for (i, entry) in entries.iter().enumerate() {
        writeln!(f, "  {:2}. {:<24} {}", i + 1, entry.label, format_amount(entry.total))?;
    }
    Ok(())
}

fn write_counts(f: &mut fmt::Formatter<'_>, title: &str, entries: &[ValueCount]) -> fmt::Result {
    writeln!(f, "{}", heading(title))?;
    if entries.is_empty() {
        return writeln!(f, "  (no data)");
    }
    for entry in entries {
        writeln!(f, "  {:<24} {}", entry.label, group_thousands(entry.count as u64))?;
    }
    Ok(())
}

impl fmt::Display for DashboardSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kpis = &self.kpis;

        writeln!(f, "{}", heading("Key Metrics"))?;
        writeln!(f, "  Total sales:          {}", format_amount(kpis.total_sales))?;
        writeln!(f, "  Quantity sold:        {}", group_thousands(kpis.quantity_sold))?;
        writeln!(f, "  Total orders:         {}", group_thousands(kpis.total_orders as u64))?;
        match kpis.average_sale {
            Some(avg) => writeln!(f, "  Avg. sales per order: {}", format_amount(avg))?,
            None => writeln!(f, "  Avg. sales per order: -")?,
        }
        writeln!(f, "  Unique products:      {}", kpis.unique_products)?;
        writeln!(f)?;

        writeln!(f, "{}", heading("Monthly Sales"))?;
        if self.monthly_sales.is_empty() {
            writeln!(f, "  (no data)")?;
        }
        for month in &self.monthly_sales {
            writeln!(f, "  {}  {}", month.month, format_amount(month.total))?;
        }
        if let Some(growth) = self.sales_growth_pct {
            writeln!(f, "  Last month vs previous: {:+.1}%", growth)?;
        }
        if self.partial_last_month {
            if let Some(date) = self.last_transaction_date {
                writeln!(
                    f,
                    "  Final month is partial: data ends on {}",
                    date.format("%d %B %Y")
                )?;
            }
        }
        writeln!(f)?;

        write_ranked(f, "Top Cities", &self.top_cities)?;
        writeln!(f)?;
        write_ranked(f, "Top Products", &self.top_products)?;
        writeln!(f)?;
        write_ranked(f, "Sales by Storage", &self.storage_sales)?;
        writeln!(f)?;

        write_counts(f, "Discount Usage", &self.discount_usage)?;
        if let Some(pct) = self.used_discount_pct {
            writeln!(f, "  {:.1}% of transactions used a discount", pct)?;
        }
        writeln!(f)?;
        write_counts(f, "Age Groups", &self.age_groups)?;
        writeln!(f)?;

        write!(f, "Data dimensions: {} rows x {} columns", self.rows, self.columns)
    }
}
