//! Analytics Module
//!
//! Aggregate order metrics for the dashboard. The snapshot is recomputed
//! from the store on demand and pushed to the `analytics` room after every
//! mutating order event.

pub mod snapshot;

pub use snapshot::{compute_snapshot, publish_snapshot};
