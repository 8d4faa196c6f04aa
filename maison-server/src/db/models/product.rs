//! Product Model (catalog read model)
//!
//! The order core only queries price, stock and identity at order-build
//! time; full catalog CRUD lives outside this service.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub stock_count: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    pub fn new(name: String, price: f64) -> Self {
        Self {
            id: None,
            name,
            price,
            image: String::new(),
            size: String::new(),
            stock_count: 0,
            is_active: true,
        }
    }
}
