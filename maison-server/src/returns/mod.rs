//! Returns Module
//!
//! Post-purchase return/refund claims: RMA code generation, creation
//! against an owned order, admin status patching, and the refunded →
//! parent-order side effect.

pub mod ledger;
pub mod rma;

pub use ledger::{
    CreateReturnRequest, ReturnItemRequest, ReturnLedger, UpdateReturnRequest,
};
pub use rma::generate_rma;
