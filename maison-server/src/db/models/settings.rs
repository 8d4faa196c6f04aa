//! Runtime Settings Model
//!
//! Singleton record (`settings:store`). Admin-toggled flags read on the hot
//! path, e.g. globally disabling card payments.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Gate for Stripe payment-intent creation
    #[serde(default = "default_true")]
    pub stripe_enabled: bool,
    pub updated_at: String,
}

fn default_true() -> bool {
    true
}
