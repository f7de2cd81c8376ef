use log::{debug, warn};
use std::fmt;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use super::FetchError;
use crate::schema::DEFAULT_SOURCE_URL;

/// Where the transaction table lives
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataSource {
    /// Remote CSV fetched over HTTP(S)
    Url(String),
    /// Local CSV file
    Path(PathBuf),
}

impl DataSource {
    /// Interprets a location string: `http://` and `https://` prefixes denote a
    /// URL, anything else a file path.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::Path(PathBuf::from(location))
        }
    }

    /// Stable identifier used as the cache key
    pub fn id(&self) -> String {
        match self {
            DataSource::Url(url) => url.clone(),
            DataSource::Path(path) => format!("file://{}", path.display()),
        }
    }

    /// Retrieve the raw bytes of the table
    pub fn fetch(&self, options: &FetchOptions) -> Result<Vec<u8>, FetchError> {
        match self {
            DataSource::Url(url) => fetch_url(url, options),
            DataSource::Path(path) => std::fs::read(path).map_err(|source| FetchError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Url(DEFAULT_SOURCE_URL.to_string())
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{}", url),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Network settings for remote sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Timeout of a single request
    pub timeout: Duration,
    /// Extra attempts after a transient failure
    pub retries: u32,
    /// Delay before the first retry; attempt `n` waits `n * backoff`
    pub backoff: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retries: 0,
            backoff: Duration::from_millis(500),
        }
    }
}

fn fetch_url(url: &str, options: &FetchOptions) -> Result<Vec<u8>, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(options.timeout)
        .build()
        .map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

    let mut attempt = 0;
    loop {
        match fetch_once(&client, url) {
            Ok(bytes) => {
                debug!("Fetched {} bytes from {}", bytes.len(), url);
                return Ok(bytes);
            }
            Err(err) if attempt < options.retries && err.is_transient() => {
                attempt += 1;
                let delay = options.backoff * attempt;
                warn!(
                    "Fetch attempt {} of {} failed ({}), retrying in {:?}",
                    attempt,
                    options.retries + 1,
                    err,
                    delay
                );
                thread::sleep(delay);
            }
            Err(err) => return Err(err),
        }
    }
}

fn fetch_once(client: &reqwest::blocking::Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let http_error = |source| FetchError::Http {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().map_err(http_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().map_err(http_error)?;
    Ok(bytes.to_vec())
}
