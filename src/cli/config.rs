//! TOML configuration file support.
//!
//! Instead of repeating source and filter flags, users can keep them in a file:
//!
//! ```toml
//! # salescope.toml
//! [source]
//! location = "data/data_final.csv"
//! timeout_secs = 30
//! retries = 2
//! backoff_ms = 500
//!
//! [filters]
//! years = [2023]
//! cities = ["Jakarta"]
//! segments = ["High Value"]
//!
//! [report]
//! top_n = 5
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use salescope::filter::Filter;
use salescope::loader::FetchOptions;
use salescope::record::CustomerSegment;

/// Root configuration structure for salescope.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Where and how to fetch the transaction table.
    #[serde(default)]
    pub source: SourceConfig,

    /// Filters applied before reporting.
    #[serde(default)]
    pub filters: FilterConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Configuration of the data source.
#[derive(Debug, Default, Deserialize)]
pub struct SourceConfig {
    /// URL or local path of the CSV.
    pub location: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// Extra attempts after a transient network failure.
    pub retries: Option<u32>,

    /// Base delay between attempts in milliseconds.
    pub backoff_ms: Option<u64>,
}

/// Configured filter values; an empty list leaves the column unconstrained.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub years: Vec<i32>,
    pub cities: Vec<String>,
    pub products: Vec<String>,
    /// Tier labels such as `High Value` or `high`.
    pub segments: Vec<String>,
    pub storages: Vec<String>,
    pub age_groups: Vec<String>,
}

/// Configuration of the rendered report.
#[derive(Debug, Default, Deserialize)]
pub struct ReportConfig {
    /// Entries kept in the city and product rankings.
    pub top_n: Option<usize>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Fetch options with unset keys taken from the defaults.
    pub fn fetch_options(&self) -> FetchOptions {
        let defaults = FetchOptions::default();
        FetchOptions {
            timeout: self
                .source
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            retries: self.source.retries.unwrap_or(defaults.retries),
            backoff: self
                .source
                .backoff_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.backoff),
        }
    }
}

impl FilterConfig {
    /// Build the row filter, rejecting unknown tier labels.
    pub fn to_filter(&self) -> Result<Filter> {
        let mut filter = Filter::new();
        filter.years.extend(self.years.iter().copied());
        filter.cities.extend(self.cities.iter().cloned());
        filter.products.extend(self.products.iter().cloned());
        filter.storages.extend(self.storages.iter().cloned());
        filter.age_groups.extend(self.age_groups.iter().cloned());
        for label in &self.segments {
            let segment: CustomerSegment = label
                .parse()
                .with_context(|| format!("Invalid segment in config: {}", label))?;
            filter.segments.insert(segment);
        }
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [source]
            location = "https://example.com/data.csv"
            timeout_secs = 10
            retries = 3
            backoff_ms = 250

            [filters]
            years = [2023, 2024]
            cities = ["Jakarta"]
            segments = ["High Value", "low"]

            [report]
            top_n = 3
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(
            config.source.location.as_deref(),
            Some("https://example.com/data.csv")
        );
        assert_eq!(config.report.top_n, Some(3));

        let options = config.fetch_options();
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.retries, 3);
        assert_eq!(options.backoff, Duration::from_millis(250));

        let filter = config.filters.to_filter().unwrap();
        assert_eq!(filter.years.len(), 2);
        assert!(filter.cities.contains("Jakarta"));
        assert!(filter.segments.contains(&CustomerSegment::High));
        assert!(filter.segments.contains(&CustomerSegment::Low));
        assert!(filter.products.is_empty());
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [source]
            retries = 1
        "#;

        let config = Config::from_str(toml).unwrap();
        let options = config.fetch_options();
        assert_eq!(options.retries, 1);
        assert_eq!(options.timeout, FetchOptions::default().timeout);
        assert_eq!(config.source.location, None);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.fetch_options(), FetchOptions::default());
        assert!(config.filters.to_filter().unwrap().is_empty());
        assert_eq!(config.report.top_n, None);
    }

    #[test]
    fn test_unknown_segment_is_rejected() {
        let config = Config::from_str("[filters]\nsegments = [\"Platinum\"]\n").unwrap();
        assert!(config.filters.to_filter().is_err());
    }

    #[test]
    fn test_malformed_config() {
        assert!(Config::from_str("[source\nlocation = 1").is_err());
    }
}
