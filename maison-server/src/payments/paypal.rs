//! PayPal Adapter
//!
//! Checkout orders flow: client-credentials token, provider order with a
//! structured amount breakdown, then an explicit capture call from the
//! client. Capture enforces that the pre-committed internal order belongs
//! to the caller, so a capture confirmation cannot be replayed across
//! accounts.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::auth::CurrentUser;
use crate::orders::{CreateOrderRequest, OrderLedger};
use crate::payments::{PaymentHandle, PaymentOutcome, PaymentProvider};
use crate::utils::{AppError, AppResult};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct PayPalConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub base_url: String,
    pub currency: String,
}

impl Default for PayPalConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            base_url: "https://api-m.sandbox.paypal.com".to_string(),
            currency: "USD".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ProviderOrder {
    id: String,
    #[serde(default)]
    links: Vec<ProviderLink>,
}

#[derive(Debug, Deserialize)]
struct ProviderLink {
    rel: String,
    href: String,
}

#[derive(Debug, Deserialize)]
struct CaptureResponse {
    status: String,
}

pub struct PayPalGateway {
    http: reqwest::Client,
    config: PayPalConfig,
    ledger: Arc<OrderLedger>,
}

impl PayPalGateway {
    pub fn new(config: PayPalConfig, ledger: Arc<OrderLedger>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            config,
            ledger,
        }
    }

    fn credentials(&self) -> AppResult<(&str, &str)> {
        match (
            self.config.client_id.as_deref().filter(|s| !s.is_empty()),
            self.config.client_secret.as_deref().filter(|s| !s.is_empty()),
        ) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(AppError::service_unavailable("PayPal is not configured")),
        }
    }

    async fn access_token(&self) -> AppResult<String> {
        let (id, secret) = self.credentials()?;
        let response = self
            .http
            .post(format!("{}/v1/oauth2/token", self.config.base_url))
            .basic_auth(id, Some(secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| AppError::service_unavailable(format!("PayPal unreachable: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::bad_gateway(format!(
                "PayPal token request failed ({status})"
            )));
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::bad_gateway(format!("Malformed PayPal response: {e}")))?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl PaymentProvider for PayPalGateway {
    async fn create_payment(
        &self,
        user: &CurrentUser,
        draft: CreateOrderRequest,
    ) -> AppResult<PaymentHandle> {
        let token = self.access_token().await?;
        let priced = self
            .ledger
            .price(&draft.items, draft.shipping_method)
            .await?;

        let currency = &self.config.currency;
        let body = json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "amount": {
                    "currency_code": currency,
                    "value": format!("{:.2}", priced.total),
                    "breakdown": {
                        "item_total": { "currency_code": currency, "value": format!("{:.2}", priced.subtotal) },
                        "shipping":   { "currency_code": currency, "value": format!("{:.2}", priced.shipping) },
                        "tax_total":  { "currency_code": currency, "value": format!("{:.2}", priced.tax) },
                    }
                }
            }]
        });

        let response = self
            .http
            .post(format!("{}/v2/checkout/orders", self.config.base_url))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::service_unavailable(format!("PayPal unreachable: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::bad_gateway(format!(
                "PayPal order creation failed ({status}): {text}"
            )));
        }
        let provider_order: ProviderOrder = response
            .json()
            .await
            .map_err(|e| AppError::bad_gateway(format!("Malformed PayPal response: {e}")))?;

        let approval_url = provider_order
            .links
            .iter()
            .find(|l| l.rel == "approve")
            .map(|l| l.href.clone());

        let order = self
            .ledger
            .create_order(user, draft, Some(provider_order.id.clone()))
            .await?;

        Ok(PaymentHandle {
            payment_id: provider_order.id,
            order_id: order.id_string(),
            order_code: order.code,
            client_secret: None,
            approval_url,
        })
    }

    /// Capture the provider order and reconcile. Only `COMPLETED` maps to
    /// success; every other capture status marks the payment failed.
    async fn confirm(&self, user: &CurrentUser, payment_id: &str) -> AppResult<PaymentOutcome> {
        // Ownership first, so a foreign capture id cannot confirm someone
        // else's order.
        let order = self
            .ledger
            .orders()
            .find_by_payment_id(payment_id)
            .await
            .map_err(AppError::from)?
            .filter(|o| user.is_admin() || o.user.to_string() == user.id)
            .ok_or_else(|| AppError::not_found(format!("No order for payment {payment_id}")))?;

        let token = self.access_token().await?;
        let response = self
            .http
            .post(format!(
                "{}/v2/checkout/orders/{}/capture",
                self.config.base_url, payment_id
            ))
            .bearer_auth(&token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| AppError::service_unavailable(format!("PayPal unreachable: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::bad_gateway(format!(
                "PayPal capture failed ({status}): {text}"
            )));
        }
        let capture: CaptureResponse = response
            .json()
            .await
            .map_err(|e| AppError::bad_gateway(format!("Malformed PayPal response: {e}")))?;

        let outcome = if capture.status == "COMPLETED" {
            PaymentOutcome::Succeeded
        } else {
            PaymentOutcome::Failed
        };
        self.ledger.reconcile_payment(payment_id, outcome).await?;
        tracing::info!(
            "PayPal order {} captured as {} for order {}",
            payment_id,
            capture.status,
            order.code
        );
        Ok(outcome)
    }
}
