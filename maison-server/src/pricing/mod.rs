//! Pricing Module
//!
//! Side-effect free computation of order totals. All arithmetic is done
//! with `Decimal` internally and converted to `f64` at the storage
//! boundary, rounded to 2 decimal places.

pub mod calculator;

pub use calculator::{
    ItemRequest, PricedOrder, PricingCalculator, PricingConfig, ShippingMethod, to_decimal,
    to_f64,
};
