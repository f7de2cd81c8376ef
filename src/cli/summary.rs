use anyhow::{Context, Result};
use log::{info, warn};

use salescope::summary::{DashboardSummary, SummaryOptions};

use super::Session;

/// Print the dashboard summary of the filtered rows
pub fn run(session: &Session, json: bool) -> Result<()> {
    let dataset = session.dataset()?;
    let view = dataset.filter(&session.filter);

    info!("{} of {} rows match the filter", view.len(), dataset.len());
    if view.is_empty() {
        warn!("No rows match the selected filters");
    }

    let options = SummaryOptions {
        top_n: session.top_n,
    };
    let summary = DashboardSummary::of(&dataset, &view, options);

    if json {
        let text =
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{}", text);
    } else {
        println!("{}", summary);
    }

    Ok(())
}
