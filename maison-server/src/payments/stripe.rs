//! Stripe Adapter
//!
//! Payment intents are created for the priced total in minor currency
//! units; a pending order is persisted with the intent id before the
//! client ever confirms (an order row exists even if payment never
//! completes). Webhooks are verified fails-closed against the endpoint
//! secret, then dispatched into ledger reconciliation, which makes
//! at-least-once redelivery safe without any dedup here.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use ring::hmac;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::db::repository::SettingsRepository;
use crate::orders::{CreateOrderRequest, OrderLedger};
use crate::payments::{PaymentHandle, PaymentOutcome, PaymentProvider};
use crate::pricing::to_decimal;
use crate::utils::{AppError, AppResult};

const API_BASE: &str = "https://api.stripe.com/v1";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Default webhook timestamp tolerance, matching Stripe's own SDKs
const DEFAULT_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Clone, Default)]
pub struct StripeConfig {
    pub secret_key: Option<String>,
    pub webhook_secret: Option<String>,
    pub currency: String,
}

#[derive(Debug, Deserialize)]
struct IntentResponse {
    id: String,
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct WebhookEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: WebhookData,
}

#[derive(Debug, Deserialize)]
struct WebhookData {
    object: WebhookObject,
}

#[derive(Debug, Deserialize)]
struct WebhookObject {
    id: String,
}

pub struct StripeGateway {
    http: reqwest::Client,
    config: StripeConfig,
    ledger: Arc<OrderLedger>,
    settings: SettingsRepository,
}

impl StripeGateway {
    pub fn new(config: StripeConfig, ledger: Arc<OrderLedger>, settings: SettingsRepository) -> Self {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            config,
            ledger,
            settings,
        }
    }

    fn secret_key(&self) -> AppResult<&str> {
        self.config
            .secret_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::service_unavailable("Stripe is not configured"))
    }

    fn currency(&self) -> &str {
        if self.config.currency.is_empty() {
            "usd"
        } else {
            &self.config.currency
        }
    }

    /// Handle a raw webhook delivery. Signature failures fail the request;
    /// per-event reconciliation errors are logged and acknowledged so the
    /// provider stops redelivering.
    pub async fn handle_webhook(&self, payload: &[u8], signature_header: &str) -> AppResult<()> {
        let secret = self
            .config
            .webhook_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::service_unavailable("Stripe webhooks are not configured"))?;

        verify_signature(
            payload,
            signature_header,
            secret,
            Utc::now().timestamp(),
            DEFAULT_TOLERANCE_SECS,
        )?;

        let event: WebhookEvent = serde_json::from_slice(payload)
            .map_err(|e| AppError::validation(format!("Malformed webhook payload: {e}")))?;

        let outcome = match event.event_type.as_str() {
            "payment_intent.succeeded" => PaymentOutcome::Succeeded,
            "payment_intent.payment_failed" => PaymentOutcome::Failed,
            other => {
                tracing::debug!("Ignoring stripe event {}", other);
                return Ok(());
            }
        };

        if let Err(e) = self
            .ledger
            .reconcile_payment(&event.data.object.id, outcome)
            .await
        {
            tracing::warn!(
                "Reconciliation for intent {} failed: {}",
                event.data.object.id,
                e
            );
        }
        Ok(())
    }

    async fn fetch_intent_status(&self, intent_id: &str) -> AppResult<String> {
        let key = self.secret_key()?;
        let response = self
            .http
            .get(format!("{API_BASE}/payment_intents/{intent_id}"))
            .basic_auth(key, None::<&str>)
            .send()
            .await
            .map_err(|e| AppError::service_unavailable(format!("Stripe unreachable: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::bad_gateway(format!(
                "Stripe intent lookup failed ({status}): {body}"
            )));
        }

        #[derive(Deserialize)]
        struct Intent {
            status: String,
        }
        let intent: Intent = response
            .json()
            .await
            .map_err(|e| AppError::bad_gateway(format!("Malformed stripe response: {e}")))?;
        Ok(intent.status)
    }
}

#[async_trait]
impl PaymentProvider for StripeGateway {
    async fn create_payment(
        &self,
        user: &CurrentUser,
        draft: CreateOrderRequest,
    ) -> AppResult<PaymentHandle> {
        let settings = self.settings.get().await.map_err(AppError::from)?;
        if !settings.stripe_enabled {
            return Err(AppError::service_unavailable(
                "Stripe payments are currently disabled",
            ));
        }
        let key = self.secret_key()?.to_string();

        let priced = self
            .ledger
            .price(&draft.items, draft.shipping_method)
            .await?;
        let amount = minor_units(priced.total)?;

        let response = self
            .http
            .post(format!("{API_BASE}/payment_intents"))
            .basic_auth(&key, None::<&str>)
            .form(&[
                ("amount", amount.to_string()),
                ("currency", self.currency().to_string()),
                ("automatic_payment_methods[enabled]", "true".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::service_unavailable(format!("Stripe unreachable: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::bad_gateway(format!(
                "Stripe intent creation failed ({status}): {body}"
            )));
        }
        let intent: IntentResponse = response
            .json()
            .await
            .map_err(|e| AppError::bad_gateway(format!("Malformed stripe response: {e}")))?;

        let order = self
            .ledger
            .create_order(user, draft, Some(intent.id.clone()))
            .await?;

        Ok(PaymentHandle {
            payment_id: intent.id,
            order_id: order.id_string(),
            order_code: order.code,
            client_secret: Some(intent.client_secret),
            approval_url: None,
        })
    }

    async fn confirm(&self, user: &CurrentUser, payment_id: &str) -> AppResult<PaymentOutcome> {
        let order = self
            .ledger
            .orders()
            .find_by_payment_id(payment_id)
            .await
            .map_err(AppError::from)?
            .filter(|o| user.is_admin() || o.user.to_string() == user.id)
            .ok_or_else(|| AppError::not_found(format!("No order for payment {payment_id}")))?;

        let status = self.fetch_intent_status(payment_id).await?;
        let outcome = if status == "succeeded" {
            PaymentOutcome::Succeeded
        } else {
            PaymentOutcome::Failed
        };
        self.ledger
            .reconcile_payment(payment_id, outcome)
            .await?;
        tracing::info!("Stripe intent {} confirmed for order {}", payment_id, order.code);
        Ok(outcome)
    }
}

/// Convert a rounded decimal amount to minor currency units.
fn minor_units(total: f64) -> AppResult<i64> {
    (to_decimal(total) * Decimal::from(100))
        .round()
        .to_i64()
        .ok_or_else(|| AppError::validation(format!("Amount {total} out of range")))
}

/// Verify a `Stripe-Signature` header against the endpoint secret.
///
/// Fails closed: any parse error, stale timestamp, or signature mismatch
/// is rejected. Comparison is constant-time via `ring::hmac::verify`.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
    tolerance_secs: i64,
) -> AppResult<()> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<Vec<u8>> = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => {
                if let Ok(bytes) = hex::decode(value) {
                    signatures.push(bytes);
                }
            }
            _ => {}
        }
    }

    let timestamp =
        timestamp.ok_or_else(|| AppError::validation("Missing webhook timestamp"))?;
    if (now - timestamp).abs() > tolerance_secs {
        return Err(AppError::validation("Webhook timestamp outside tolerance"));
    }
    if signatures.is_empty() {
        return Err(AppError::validation("Missing webhook signature"));
    }

    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let mut signed = Vec::with_capacity(payload.len() + 16);
    signed.extend_from_slice(timestamp.to_string().as_bytes());
    signed.push(b'.');
    signed.extend_from_slice(payload);

    for signature in &signatures {
        if hmac::verify(&key, &signed, signature).is_ok() {
            return Ok(());
        }
    }
    Err(AppError::validation("Webhook signature mismatch"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";

    fn sign(payload: &[u8], timestamp: i64) -> String {
        let key = hmac::Key::new(hmac::HMAC_SHA256, SECRET.as_bytes());
        let mut signed = timestamp.to_string().into_bytes();
        signed.push(b'.');
        signed.extend_from_slice(payload);
        let tag = hmac::sign(&key, &signed);
        format!("t={},v1={}", timestamp, hex::encode(tag.as_ref()))
    }

    #[test]
    fn valid_signature_passes() {
        let payload = br#"{"type":"payment_intent.succeeded"}"#;
        let header = sign(payload, 1_700_000_000);
        assert!(verify_signature(payload, &header, SECRET, 1_700_000_000, 300).is_ok());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let header = sign(b"original", 1_700_000_000);
        assert!(verify_signature(b"tampered", &header, SECRET, 1_700_000_000, 300).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let payload = b"payload";
        let header = sign(payload, 1_700_000_000);
        assert!(
            verify_signature(payload, &header, "whsec_other", 1_700_000_000, 300).is_err()
        );
    }

    #[test]
    fn stale_timestamp_is_rejected() {
        let payload = b"payload";
        let header = sign(payload, 1_700_000_000);
        assert!(verify_signature(payload, &header, SECRET, 1_700_000_000 + 301, 300).is_err());
    }

    #[test]
    fn timestamp_within_tolerance_passes() {
        let payload = b"payload";
        let header = sign(payload, 1_700_000_000);
        assert!(verify_signature(payload, &header, SECRET, 1_700_000_000 + 299, 300).is_ok());
    }

    #[test]
    fn garbage_header_is_rejected() {
        assert!(verify_signature(b"payload", "not-a-header", SECRET, 0, 300).is_err());
        assert!(verify_signature(b"payload", "t=abc,v1=zz", SECRET, 0, 300).is_err());
        assert!(verify_signature(b"payload", "", SECRET, 0, 300).is_err());
    }

    #[test]
    fn second_v1_candidate_is_accepted() {
        // Secret rotation: the header may carry an old and a new signature
        let payload = b"payload";
        let good = sign(payload, 1_700_000_000);
        let good_sig = good.split("v1=").nth(1).unwrap().to_string();
        let header = format!("t=1700000000,v1={},v1={}", hex::encode([0u8; 32]), good_sig);
        assert!(verify_signature(payload, &header, SECRET, 1_700_000_000, 300).is_ok());
    }

    #[test]
    fn minor_unit_conversion_is_exact() {
        assert_eq!(minor_units(118.8).unwrap(), 11880);
        assert_eq!(minor_units(134.79).unwrap(), 13479);
        assert_eq!(minor_units(0.1).unwrap(), 10);
    }
}
