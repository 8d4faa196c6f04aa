//! Payments Module
//!
//! Gateway adapters behind one provider seam. Adapters pre-commit a
//! pending order keyed by the provider reference, then hand confirmation
//! to the idempotent ledger reconciliation — via webhook (Stripe) or an
//! explicit capture call (PayPal).

pub mod paypal;
pub mod stripe;

use async_trait::async_trait;
use serde::Serialize;

pub use paypal::{PayPalConfig, PayPalGateway};
pub use stripe::{StripeConfig, StripeGateway};

use crate::auth::CurrentUser;
use crate::orders::CreateOrderRequest;
use crate::utils::AppResult;

/// Terminal result of a payment attempt as reported by a provider.
/// A failed payment is state, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Succeeded,
    Failed,
}

/// What a client needs to finish paying: the provider reference, the
/// pre-committed internal order, and the provider-specific continuation
/// (Stripe client secret or PayPal approval link).
#[derive(Debug, Clone, Serialize)]
pub struct PaymentHandle {
    pub payment_id: String,
    pub order_id: String,
    pub order_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_url: Option<String>,
}

/// Provider seam. Missing credentials surface as `ServiceUnavailable`
/// from every method, never as a crash.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a provider-side payment for the draft and pre-commit the
    /// matching pending order.
    async fn create_payment(
        &self,
        user: &CurrentUser,
        draft: CreateOrderRequest,
    ) -> AppResult<PaymentHandle>;

    /// Confirm a previously created payment and reconcile the outcome.
    /// Ownership of the underlying order is enforced.
    async fn confirm(&self, user: &CurrentUser, payment_id: &str) -> AppResult<PaymentOutcome>;
}
