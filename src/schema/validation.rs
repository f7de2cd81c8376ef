use csv::StringRecord;

use super::columns::{self, ColumnIndex};
use super::constants::NA_MARKERS;
use crate::loader::DataFormatError;

/// Resolves the position of every required column in a CSV header.
///
/// Header names are matched after trimming surrounding whitespace. Extra columns
/// are allowed; the first missing required column is reported.
pub fn resolve_columns(headers: &StringRecord) -> Result<ColumnIndex, DataFormatError> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| DataFormatError::MissingColumn(name.to_string()))
    };

    Ok(ColumnIndex {
        transaction_id: find(columns::TRANSACTION_ID)?,
        customer_id: find(columns::CUSTOMER_ID)?,
        transaction_date: find(columns::TRANSACTION_DATE)?,
        city: find(columns::CITY)?,
        product_name: find(columns::PRODUCT_NAME)?,
        storage: find(columns::STORAGE)?,
        coupon_code: find(columns::COUPON_CODE)?,
        quantity: find(columns::QUANTITY)?,
        total: find(columns::TOTAL)?,
        age_group: find(columns::AGE_GROUP)?,
    })
}

/// Returns true when a raw cell holds no value.
pub fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || NA_MARKERS.contains(&cell)
}
