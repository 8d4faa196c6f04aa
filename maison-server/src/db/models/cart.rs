//! Cart Model (consumed by the order core)
//!
//! Per-user mutable item set. The order core never edits carts beyond
//! clearing them when an order is created or its payment confirmed.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub size: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub updated_at: String,
}
