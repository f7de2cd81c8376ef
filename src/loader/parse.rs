use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::fmt;
use std::io::Read;

use super::DataFormatError;
use crate::record::{discount_usage, TransactionRecord};
use crate::schema::{columns, is_missing, resolve_columns, ColumnIndex};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Row counts of a completed load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Data rows read from the source (header excluded)
    pub rows_read: usize,
    /// Rows dropped because a field was missing
    pub rows_dropped: usize,
}

impl LoadStats {
    /// Rows that made it into the dataset
    pub fn rows_kept(&self) -> usize {
        self.rows_read - self.rows_dropped
    }
}

impl fmt::Display for LoadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows read, {} kept, {} dropped as incomplete",
            self.rows_read,
            self.rows_kept(),
            self.rows_dropped
        )
    }
}

/// Parses a CSV transaction table.
///
/// Dates and numbers are validated on every row, including rows that are later
/// dropped for a missing field: a malformed value anywhere fails the whole load.
pub fn parse_records<R: Read>(
    reader: R,
) -> Result<(Vec<TransactionRecord>, LoadStats), DataFormatError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let index = resolve_columns(csv_reader.headers()?)?;

    let mut records = Vec::new();
    let mut stats = LoadStats::default();

    for row in csv_reader.records() {
        let row = row?;
        stats.rows_read += 1;
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        match parse_row(&row, &index, line)? {
            Some(record) => records.push(record),
            None => stats.rows_dropped += 1,
        }
    }

    // Totals are non-negative, so a finite grand total bounds every customer sum
    let grand_total: f64 = records.iter().map(|r| r.total).sum();
    if !grand_total.is_finite() {
        return Err(DataFormatError::TotalOverflow);
    }

    Ok((records, stats))
}

fn parse_row(
    row: &StringRecord,
    index: &ColumnIndex,
    line: u64,
) -> Result<Option<TransactionRecord>, DataFormatError> {
    let cell = |i: usize| row.get(i).map(str::trim).filter(|c| !is_missing(c));
    // Labeling compares the coupon code exactly, surrounding spaces included
    let coupon_cell = row
        .get(index.coupon_code)
        .filter(|c| !is_missing(c.trim()));

    let transaction_date = cell(index.transaction_date)
        .map(|value| {
            parse_date(value).ok_or_else(|| DataFormatError::InvalidDate {
                line,
                value: value.to_string(),
            })
        })
        .transpose()?;
    let quantity = cell(index.quantity)
        .map(|value| parse_quantity(value, line))
        .transpose()?;
    let total = cell(index.total)
        .map(|value| parse_total(value, line))
        .transpose()?;

    let (
        Some(transaction_id),
        Some(customer_id),
        Some(transaction_date),
        Some(city),
        Some(product_name),
        Some(storage),
        Some(coupon_code),
        Some(quantity),
        Some(total),
        Some(age_group),
    ) = (
        cell(index.transaction_id),
        cell(index.customer_id),
        transaction_date,
        cell(index.city),
        cell(index.product_name),
        cell(index.storage),
        coupon_cell,
        quantity,
        total,
        cell(index.age_group),
    )
    else {
        return Ok(None);
    };

    Ok(Some(TransactionRecord {
        transaction_id: transaction_id.to_string(),
        customer_id: customer_id.to_string(),
        transaction_date,
        city: city.to_string(),
        product_name: product_name.to_string(),
        storage: storage.to_string(),
        coupon_code: coupon_code.to_string(),
        quantity,
        total,
        age_group: age_group.to_string(),
        use_discount: discount_usage(coupon_code),
    }))
}

/// Parses a transaction date, keeping only the calendar day of timestamps.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn parse_quantity(value: &str, line: u64) -> Result<u64, DataFormatError> {
    if let Ok(quantity) = value.parse::<u64>() {
        return Ok(quantity);
    }

    // Integral floats such as "2.0" appear when the column was exported with nulls
    match value.parse::<f64>() {
        Ok(q) if q.is_finite() && q >= 0.0 && q.fract() == 0.0 && q <= u64::MAX as f64 => {
            Ok(q as u64)
        }
        _ => Err(DataFormatError::InvalidNumber {
            line,
            column: columns::QUANTITY,
            value: value.to_string(),
        }),
    }
}

fn parse_total(value: &str, line: u64) -> Result<f64, DataFormatError> {
    match value.parse::<f64>() {
        Ok(total) if total.is_finite() && total >= 0.0 => Ok(total),
        _ => Err(DataFormatError::InvalidNumber {
            line,
            column: columns::TOTAL,
            value: value.to_string(),
        }),
    }
}
