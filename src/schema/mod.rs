//! # Transaction Table Schema
//!
//! This module defines the column layout of the sales transaction table and the
//! constants shared by the loader and the segmentation engine.
//!
//! ## Source Columns
//!
//! | Column | Type | Description |
//! |--------|------|-------------|
//! | transaction_id | String | Opaque transaction identifier |
//! | customer_id | String | Opaque customer identifier |
//! | transaction_date | Date | Calendar date of the sale |
//! | city | String | City where the sale happened |
//! | product_name | String | Product sold |
//! | storage | String | Storage option of the product |
//! | coupon_code | String | Coupon applied, `NONKUPON` when none |
//! | quantity | u64 | Units sold |
//! | total | f64 | Sale amount |
//! | usia_group | String | Customer age group |
//!
//! ## Derived Columns
//!
//! | Column | Values |
//! |--------|--------|
//! | use_discount | `Used Discount`, `No Discount` |
//! | customer_segment | `Low Value`, `Medium Value`, `High Value` |

pub mod columns;
pub mod constants;
mod validation;


pub use columns::ColumnIndex;
pub use constants::*;
pub use validation::{is_missing, resolve_columns};
