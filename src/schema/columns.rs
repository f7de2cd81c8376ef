//! Column names of the transaction table.

/// Opaque transaction identifier
pub const TRANSACTION_ID: &str = "transaction_id";

/// Opaque customer identifier
pub const CUSTOMER_ID: &str = "customer_id";

/// Calendar date of the sale
pub const TRANSACTION_DATE: &str = "transaction_date";

/// City of the sale
pub const CITY: &str = "city";

/// Product sold
pub const PRODUCT_NAME: &str = "product_name";

/// Storage option of the product
pub const STORAGE: &str = "storage";

/// Coupon code, see [`NO_COUPON_SENTINEL`](super::NO_COUPON_SENTINEL)
pub const COUPON_CODE: &str = "coupon_code";

/// Units sold
pub const QUANTITY: &str = "quantity";

/// Sale amount
pub const TOTAL: &str = "total";

/// Customer age group
pub const AGE_GROUP: &str = "usia_group";

/// Derived discount-usage label
pub const USE_DISCOUNT: &str = "use_discount";

/// Derived customer value tier
pub const CUSTOMER_SEGMENT: &str = "customer_segment";

/// Columns every source table must provide, in canonical order
pub const REQUIRED_COLUMNS: [&str; 10] = [
    TRANSACTION_ID,
    CUSTOMER_ID,
    TRANSACTION_DATE,
    CITY,
    PRODUCT_NAME,
    STORAGE,
    COUPON_CODE,
    QUANTITY,
    TOTAL,
    AGE_GROUP,
];

/// Columns of the annotated raw table: source columns followed by derived ones
pub const RAW_VIEW_COLUMNS: [&str; 12] = [
    TRANSACTION_ID,
    CUSTOMER_ID,
    TRANSACTION_DATE,
    CITY,
    PRODUCT_NAME,
    STORAGE,
    COUPON_CODE,
    QUANTITY,
    TOTAL,
    AGE_GROUP,
    USE_DISCOUNT,
    CUSTOMER_SEGMENT,
];

/// Header positions of the required columns within a source table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    /// Position of `transaction_id`
    pub transaction_id: usize,
    /// Position of `customer_id`
    pub customer_id: usize,
    /// Position of `transaction_date`
    pub transaction_date: usize,
    /// Position of `city`
    pub city: usize,
    /// Position of `product_name`
    pub product_name: usize,
    /// Position of `storage`
    pub storage: usize,
    /// Position of `coupon_code`
    pub coupon_code: usize,
    /// Position of `quantity`
    pub quantity: usize,
    /// Position of `total`
    pub total: usize,
    /// Position of `usia_group`
    pub age_group: usize,
}

impl ColumnIndex {
    /// Positions in [`REQUIRED_COLUMNS`] order
    pub fn positions(&self) -> [usize; 10] {
        [
            self.transaction_id,
            self.customer_id,
            self.transaction_date,
            self.city,
            self.product_name,
            self.storage,
            self.coupon_code,
            self.quantity,
            self.total,
            self.age_group,
        ]
    }
}
