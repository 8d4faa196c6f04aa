use serde::{Deserialize, Serialize};

// ==================== Order Payment Update ====================

/// Pushed to `order_<id>` whenever an order's status or payment state
/// changes (creation, reconciliation, cancellation, refund).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPaymentUpdate {
    /// Internal order record id
    pub id: String,
    /// Human-readable order code (ORD-YYYY-NNNN)
    pub code: String,
    pub status: String,
    pub payment_status: String,
    /// External provider reference, when a gateway is involved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    pub updated_at: String,
}

// ==================== Return Update ====================

/// Pushed to `return_<id>` on return request creation and admin patches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnUpdate {
    pub id: String,
    pub rma_number: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_amount: Option<f64>,
}

// ==================== Analytics Snapshot ====================

/// Aggregate metrics pushed to the `analytics` room after every mutating
/// order event. Recomputed from the store on each publish, never cached.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub total: i64,
    pub pending: i64,
    pub processing: i64,
    pub shipped: i64,
    pub delivered: i64,
    pub cancelled: i64,
    /// Revenue over all non-cancelled orders
    pub total_revenue: f64,
    pub average_order_value: f64,
    pub generated_at: String,
}
