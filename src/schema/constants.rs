//! Dataset location, labeling sentinel and tiering constants.

/// Location of the published sales dataset
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/Roysihombing/Building-Portfolio-with-Streamlit/main/data/data_final.csv";

/// Coupon code meaning "no coupon was applied"
pub const NO_COUPON_SENTINEL: &str = "NONKUPON";

/// Quantile separating Low Value from Medium Value customers
pub const LOW_TIER_QUANTILE: f64 = 0.33;

/// Quantile separating Medium Value from High Value customers
pub const HIGH_TIER_QUANTILE: f64 = 0.66;

/// Cell contents treated as a missing value
pub const NA_MARKERS: [&str; 13] = [
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "<NA>", "#N/A",
    "#NA",
];

/// Number of entries kept in the city and product rankings
pub const DEFAULT_TOP_N: usize = 5;

/// Format of the month keys in the sales trend
pub const MONTH_KEY_FORMAT: &str = "%Y-%m";
