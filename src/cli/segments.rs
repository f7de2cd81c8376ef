use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "colorized_output")]
use console::style;

use salescope::filter::FilteredView;
use salescope::record::CustomerSegment;
use salescope::segmentation::{SegmentThresholds, TierSummary};
use salescope::summary::format_amount;

use super::Session;

#[derive(Serialize)]
struct SegmentReport {
    thresholds: Option<SegmentThresholds>,
    tiers: Vec<TierSummary>,
    /// Distinct customers per tier among the filtered rows
    customers_in_view: BTreeMap<CustomerSegment, usize>,
}

fn customers_in_view(view: &FilteredView<'_>) -> BTreeMap<CustomerSegment, usize> {
    let mut seen: BTreeMap<CustomerSegment, BTreeSet<&str>> = CustomerSegment::ALL
        .iter()
        .map(|&segment| (segment, BTreeSet::new()))
        .collect();
    for row in view.iter() {
        seen.entry(row.customer_segment)
            .or_default()
            .insert(row.customer_id.as_str());
    }
    seen.into_iter().map(|(segment, ids)| (segment, ids.len())).collect()
}

/// Print tier thresholds and per-tier customer counts
pub fn run(session: &Session, json: bool) -> Result<()> {
    let dataset = session.dataset()?;
    let view = dataset.filter(&session.filter);

    let report = SegmentReport {
        thresholds: dataset.thresholds(),
        tiers: dataset.segmentation().tier_summaries(),
        customers_in_view: customers_in_view(&view),
    };

    if json {
        let text = serde_json::to_string_pretty(&report)
            .context("Failed to serialize segment report")?;
        println!("{}", text);
        return Ok(());
    }

    let title = "Customer Segments";
    #[cfg(feature = "colorized_output")]
    println!("{}", style(title).bold().cyan());
    #[cfg(not(feature = "colorized_output"))]
    println!("{}", title);

    match report.thresholds {
        Some(thresholds) => println!("  Thresholds: {}", thresholds),
        None => println!("  No customers loaded"),
    }
    println!();
    println!(
        "  {:<14} {:>10} {:>18} {:>10}",
        "Tier", "Customers", "Total spend", "In view"
    );
    for tier in &report.tiers {
        println!(
            "  {:<14} {:>10} {:>18} {:>10}",
            tier.segment.label(),
            tier.customers,
            format_amount(tier.total_spend),
            report.customers_in_view.get(&tier.segment).copied().unwrap_or(0)
        );
    }

    Ok(())
}
