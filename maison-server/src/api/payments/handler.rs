//! Payment API Handlers
//!
//! The webhook route takes the raw body: signature verification runs over
//! the exact bytes the provider signed, before any JSON parsing.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::orders::CreateOrderRequest;
use crate::payments::{PaymentHandle, PaymentOutcome, PaymentProvider};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// Create a Stripe payment intent and pre-commit the pending order
pub async fn create_payment_intent(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<AppResponse<PaymentHandle>>> {
    let handle = state.stripe.create_payment(&user, payload).await?;
    Ok(ok_with_message(handle, "Payment intent created"))
}

/// Stripe webhook endpoint. Responds 400 on any signature failure so the
/// provider retries; reconciliation errors are acknowledged.
pub async fn stripe_webhook(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<AppResponse<()>>> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::validation("Missing Stripe-Signature header"))?;
    state.stripe.handle_webhook(&body, signature).await?;
    Ok(ok(()))
}

/// Create a PayPal checkout order and pre-commit the pending order
pub async fn paypal_create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<AppResponse<PaymentHandle>>> {
    let handle = state.paypal.create_payment(&user, payload).await?;
    Ok(ok_with_message(handle, "PayPal order created"))
}

#[derive(Debug, Deserialize)]
pub struct CaptureRequest {
    #[serde(alias = "paypal_order_id")]
    pub payment_id: String,
}

#[derive(Debug, Serialize)]
pub struct CaptureResponse {
    pub payment_id: String,
    pub outcome: &'static str,
}

/// Capture an approved PayPal order and reconcile the result
pub async fn paypal_capture(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CaptureRequest>,
) -> AppResult<Json<AppResponse<CaptureResponse>>> {
    let outcome = state.paypal.confirm(&user, &payload.payment_id).await?;
    let response = CaptureResponse {
        payment_id: payload.payment_id,
        outcome: match outcome {
            PaymentOutcome::Succeeded => "succeeded",
            PaymentOutcome::Failed => "failed",
        },
    };
    Ok(ok(response))
}
