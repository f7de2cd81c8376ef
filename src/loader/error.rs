/// Errors raised while retrieving the raw dataset
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP request could not be completed
    #[error("Request to {url} failed: {source}")]
    Http {
        /// Requested URL
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("Request to {url} returned HTTP {status}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// A local dataset file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path of the dataset file
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Whether repeating the request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Http { source, .. } => {
                source.is_timeout() || source.is_connect() || source.is_request()
            }
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::Io { .. } => false,
        }
    }
}

/// Errors raised while interpreting the raw dataset
#[derive(Debug, thiserror::Error)]
pub enum DataFormatError {
    /// A required column is absent from the header
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A transaction date is present but cannot be parsed
    #[error("Unparseable transaction_date '{value}' on line {line}")]
    InvalidDate {
        /// 1-based line in the source
        line: u64,
        /// Raw cell content
        value: String,
    },

    /// A numeric cell is present but not a valid non-negative number
    #[error("Invalid {column} value '{value}' on line {line}")]
    InvalidNumber {
        /// 1-based line in the source
        line: u64,
        /// Column name
        column: &'static str,
        /// Raw cell content
        value: String,
    },

    /// The summed `total` column exceeds the floating-point range
    #[error("Sum of total exceeds the representable range")]
    TotalOverflow,

    /// The CSV itself is malformed
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors that abort a dataset load
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// The source could not be retrieved
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The source was retrieved but is not a valid transaction table
    #[error("Data format error: {0}")]
    DataFormat(#[from] DataFormatError),
}
