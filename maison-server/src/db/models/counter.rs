//! Counter Model
//!
//! Atomic named sequence (`counter:<name>`), used for order code minting.
//! Replaces count()-derived sequences, which race under concurrent creates.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub value: i64,
}
