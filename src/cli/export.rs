use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use super::Session;

/// Write the filtered raw table as CSV
pub fn run(session: &Session, output: PathBuf) -> Result<()> {
    let dataset = session.dataset()?;
    let view = dataset.filter(&session.filter);

    if output.as_os_str() == "-" {
        view.write_csv(io::stdout().lock())
            .context("Failed to write CSV to stdout")?;
        return Ok(());
    }

    let file = File::create(&output)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;
    view.write_csv(BufWriter::new(file))
        .with_context(|| format!("Failed to write CSV: {}", output.display()))?;

    let (rows, columns) = view.dimensions();
    info!(
        "Exported {} rows x {} columns to {}",
        rows,
        columns,
        output.display()
    );

    Ok(())
}
