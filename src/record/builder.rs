use chrono::NaiveDate;

use super::{discount_usage, TransactionRecord};
use crate::schema::NO_COUPON_SENTINEL;

/// Builder for [`TransactionRecord`]
///
/// The discount-usage label is derived from the coupon code in [`build`](Self::build),
/// so a record built here always carries a consistent label.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    record: TransactionRecord,
}

impl TransactionBuilder {
    /// Create a new builder with the identifying fields
    pub fn new(
        transaction_id: impl Into<String>,
        customer_id: impl Into<String>,
        transaction_date: NaiveDate,
    ) -> Self {
        Self {
            record: TransactionRecord {
                transaction_id: transaction_id.into(),
                customer_id: customer_id.into(),
                transaction_date,
                city: String::new(),
                product_name: String::new(),
                storage: String::new(),
                coupon_code: NO_COUPON_SENTINEL.to_string(),
                quantity: 1,
                total: 0.0,
                age_group: String::new(),
                use_discount: discount_usage(NO_COUPON_SENTINEL),
            },
        }
    }

    /// Set the city
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.record.city = city.into();
        self
    }

    /// Set the product name
    pub fn product(mut self, product_name: impl Into<String>) -> Self {
        self.record.product_name = product_name.into();
        self
    }

    /// Set the storage option
    pub fn storage(mut self, storage: impl Into<String>) -> Self {
        self.record.storage = storage.into();
        self
    }

    /// Set the coupon code
    pub fn coupon(mut self, coupon_code: impl Into<String>) -> Self {
        self.record.coupon_code = coupon_code.into();
        self
    }

    /// Set the quantity
    pub fn quantity(mut self, quantity: u64) -> Self {
        self.record.quantity = quantity;
        self
    }

    /// Set the sale amount
    pub fn total(mut self, total: f64) -> Self {
        self.record.total = total;
        self
    }

    /// Set the age group
    pub fn age_group(mut self, age_group: impl Into<String>) -> Self {
        self.record.age_group = age_group.into();
        self
    }

    /// Build the record
    pub fn build(mut self) -> TransactionRecord {
        self.record.use_discount = discount_usage(&self.record.coupon_code);
        self.record
    }
}
