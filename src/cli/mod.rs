use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use salescope::dataset::Dataset;
use salescope::filter::Filter;
use salescope::loader::{DataLoader, DataSource};
use salescope::record::CustomerSegment;
use salescope::schema::DEFAULT_TOP_N;

mod config;
mod export;
mod segments;
mod summary;

use config::Config;

/// salescope - Customer value segmentation and sales summaries
#[derive(Parser)]
#[command(name = "salescope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    filters: FilterArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Where to load the transaction table from.
#[derive(Args, Debug, Default)]
struct SourceArgs {
    /// CSV location, a URL or a local path (defaults to the published dataset)
    #[arg(short, long, global = true, value_name = "URL|PATH")]
    source: Option<String>,

    /// Load settings from a TOML config file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Extra attempts after a transient network failure
    #[arg(long, global = true)]
    retries: Option<u32>,
}

/// Row filters; a repeated flag allows several values, and flags replace the
/// config file's list for the same column.
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Keep transactions from this year
    #[arg(long = "year", global = true, value_name = "YEAR")]
    years: Vec<i32>,

    /// Keep transactions in this city
    #[arg(long = "city", global = true, value_name = "CITY")]
    cities: Vec<String>,

    /// Keep transactions of this product
    #[arg(long = "product", global = true, value_name = "PRODUCT")]
    products: Vec<String>,

    /// Keep customers of this tier (low, medium, high)
    #[arg(long = "segment", global = true, value_name = "TIER")]
    segments: Vec<CustomerSegment>,

    /// Keep transactions with this storage option
    #[arg(long = "storage", global = true, value_name = "STORAGE")]
    storages: Vec<String>,

    /// Keep transactions of this age group
    #[arg(long = "age-group", global = true, value_name = "GROUP")]
    age_groups: Vec<String>,
}

impl FilterArgs {
    fn apply_to(&self, filter: &mut Filter) {
        if !self.years.is_empty() {
            filter.years = self.years.iter().copied().collect();
        }
        if !self.cities.is_empty() {
            filter.cities = self.cities.iter().cloned().collect();
        }
        if !self.products.is_empty() {
            filter.products = self.products.iter().cloned().collect();
        }
        if !self.segments.is_empty() {
            filter.segments = self.segments.iter().copied().collect();
        }
        if !self.storages.is_empty() {
            filter.storages = self.storages.iter().cloned().collect();
        }
        if !self.age_groups.is_empty() {
            filter.age_groups = self.age_groups.iter().cloned().collect();
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print headline metrics and chart series of the filtered rows
    Summary {
        /// Entries in the city and product rankings
        #[arg(long, value_name = "N")]
        top: Option<usize>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print tier thresholds and per-tier customer counts
    Segments {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write the filtered raw table, derived columns included, as CSV
    Export {
        /// Output CSV path, or `-` for stdout
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
}

/// Source, filter and report settings after merging config file and flags.
pub struct Session {
    pub loader: DataLoader,
    pub filter: Filter,
    pub top_n: usize,
}

impl Session {
    fn resolve(source: &SourceArgs, filters: &FilterArgs) -> Result<Self> {
        let config = match &source.config {
            Some(path) => {
                info!("Using config file: {}", path.display());
                Config::from_file(path)?
            }
            None => Config::default(),
        };

        let location = source
            .source
            .clone()
            .or_else(|| config.source.location.clone());
        let data_source = location
            .as_deref()
            .map(DataSource::parse)
            .unwrap_or_default();

        let mut options = config.fetch_options();
        if let Some(secs) = source.timeout {
            options.timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = source.retries {
            options.retries = retries;
        }

        let mut filter = config.filters.to_filter()?;
        filters.apply_to(&mut filter);
        debug!("Active filter: {:?}", filter);

        Ok(Self {
            loader: DataLoader::new(data_source).with_options(options),
            filter,
            top_n: config.report.top_n.unwrap_or(DEFAULT_TOP_N),
        })
    }

    /// Load the segmented dataset of the configured source
    pub fn dataset(&self) -> Result<Arc<Dataset>> {
        info!("Loading {}", self.loader.source());
        Dataset::cached(&self.loader)
            .with_context(|| format!("Failed to load data from {}", self.loader.source()))
    }
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let mut session = Session::resolve(&cli.source, &cli.filters)?;

    match cli.command {
        Commands::Summary { top, json } => {
            if let Some(top) = top {
                session.top_n = top;
            }
            summary::run(&session, json)
        }
        Commands::Segments { json } => segments::run(&session, json),
        Commands::Export { output } => export::run(&session, output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "salescope",
            "summary",
            "--json",
            "--source",
            "data.csv",
            "--year",
            "2023",
            "--year",
            "2024",
            "--segment",
            "high",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbosity(), 2);
        assert_eq!(cli.source.source.as_deref(), Some("data.csv"));
        assert_eq!(cli.filters.years, vec![2023, 2024]);
        assert_eq!(cli.filters.segments, vec![CustomerSegment::High]);
        assert!(matches!(cli.command, Commands::Summary { json: true, top: None }));
    }

    #[test]
    fn test_invalid_segment_flag() {
        let result = Cli::try_parse_from(["salescope", "segments", "--segment", "gold"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults_without_config() {
        let session = Session::resolve(&SourceArgs::default(), &FilterArgs::default()).unwrap();
        assert_eq!(session.loader.source(), &DataSource::default());
        assert!(session.filter.is_empty());
        assert_eq!(session.top_n, DEFAULT_TOP_N);
    }

    #[test]
    fn test_flags_override_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[source]\nlocation = \"from_config.csv\"\nretries = 2\n\n\
             [filters]\ncities = [\"Jakarta\"]\nyears = [2022]\n\n\
             [report]\ntop_n = 3"
        )
        .unwrap();

        let source = SourceArgs {
            source: Some("from_flag.csv".to_string()),
            config: Some(file.path().to_path_buf()),
            timeout: None,
            retries: Some(5),
        };
        let filters = FilterArgs {
            cities: vec!["Medan".to_string()],
            ..Default::default()
        };

        let session = Session::resolve(&source, &filters).unwrap();
        assert_eq!(
            session.loader.source(),
            &DataSource::Path(PathBuf::from("from_flag.csv"))
        );
        assert_eq!(session.loader.options().retries, 5);
        assert!(session.filter.cities.contains("Medan"));
        assert!(!session.filter.cities.contains("Jakarta"));
        // Columns without flags keep the config values
        assert!(session.filter.years.contains(&2022));
        assert_eq!(session.top_n, 3);
    }

    #[test]
    fn test_missing_config_file() {
        let source = SourceArgs {
            config: Some(PathBuf::from("/nonexistent/salescope.toml")),
            ..Default::default()
        };
        assert!(Session::resolve(&source, &FilterArgs::default()).is_err());
    }
}
