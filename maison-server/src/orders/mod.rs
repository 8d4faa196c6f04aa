//! Orders Module
//!
//! The order ledger: creation, status transitions, cancellation, refunds
//! and payment reconciliation, plus the pure helpers they rest on
//! (address normalization, the transition table).

pub mod address;
pub mod ledger;
pub mod transitions;

pub use address::AddressInput;
pub use ledger::{
    CreateOrderRequest, OrderLedger, RefundRequest, UpdateStatusRequest,
};
