//! Order Model
//!
//! One checkout transaction. Line items are immutable snapshots captured at
//! order time; monetary fields are derived once at creation and never
//! recomputed on read.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

// =============================================================================
// Status enums
// =============================================================================

/// Fulfillment lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

/// Payment lifecycle, independent axis from [`OrderStatus`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    Stripe,
    CashOnDelivery,
}

// =============================================================================
// Embedded documents
// =============================================================================

/// Canonical shipping/billing address
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub phone: Option<String>,
}

impl Address {
    /// An address is complete iff every field except phone is non-empty.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.street.trim().is_empty()
            && !self.city.trim().is_empty()
            && !self.state.trim().is_empty()
            && !self.zip_code.trim().is_empty()
            && !self.country.trim().is_empty()
    }
}

/// Customer contact snapshot captured at order time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Line item snapshot. Catalog price changes never alter historical orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub size: String,
    pub color: Option<String>,
    pub image: String,
}

/// Refund record, attached at most once per order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refund {
    pub amount: f64,
    pub reason: String,
    pub processed_at: String,
    /// Admin user id that processed the refund
    pub processed_by: String,
}

// =============================================================================
// Order
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Human-readable sequential code (ORD-YYYY-NNNN), unique
    pub code: String,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub items: Vec<OrderItem>,
    pub customer_info: CustomerInfo,
    pub subtotal: f64,
    pub shipping: f64,
    pub tax: f64,
    #[serde(default)]
    pub discount: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    /// External provider reference (Stripe PaymentIntent id or PayPal order
    /// id). Idempotency correlation key for reconciliation.
    pub payment_id: Option<String>,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<String>,
    pub actual_delivery: Option<String>,
    pub notes: Option<String>,
    pub refund: Option<Refund>,
    pub created_at: String,
    pub updated_at: String,
}

impl Order {
    /// String form of the record id, empty when unsaved
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}
