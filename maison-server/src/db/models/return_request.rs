//! Return Request Model
//!
//! Post-purchase return/refund claim against exactly one order.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Return lifecycle. Progression is linear-ish but the admin may set any
/// value directly; only `Refunded` carries a side effect (the parent order's
/// payment status is forced to refunded).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReturnStatus {
    Requested,
    Approved,
    InTransit,
    Received,
    Refunded,
    Rejected,
}

impl ReturnStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnStatus::Requested => "requested",
            ReturnStatus::Approved => "approved",
            ReturnStatus::InTransit => "in_transit",
            ReturnStatus::Received => "received",
            ReturnStatus::Refunded => "refunded",
            ReturnStatus::Rejected => "rejected",
        }
    }
}

/// Returned line, referencing the original order line by index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnItem {
    pub order_line: i32,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnRequest {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Human-presentable RMA code, unique
    pub rma_number: String,
    #[serde(with = "serde_helpers::record_id")]
    pub order: RecordId,
    /// Copied from the order's owner, never independently settable
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub items: Vec<ReturnItem>,
    pub status: ReturnStatus,
    pub reason: String,
    pub comments: String,
    pub refund_amount: f64,
    pub carrier: Option<String>,
    pub tracking_number: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ReturnRequest {
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}
