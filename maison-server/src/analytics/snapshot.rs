//! Analytics Snapshot
//!
//! Status counts, revenue over non-cancelled orders, and average order
//! value over orders that progressed past payment.

use shared::{AnalyticsSnapshot, Topic};

use crate::db::models::OrderStatus;
use crate::db::repository::OrderRepository;
use crate::pricing::{to_decimal, to_f64};
use crate::realtime::Notifier;
use crate::utils::AppResult;
use crate::utils::time::now_rfc3339;
use rust_decimal::Decimal;

/// Recompute the snapshot from the store.
pub async fn compute_snapshot(orders: &OrderRepository) -> AppResult<AnalyticsSnapshot> {
    let counts = orders.count_by_status().await?;
    let total_revenue = orders.total_revenue().await?;
    let completed = orders.completed_count().await?;

    let mut snapshot = AnalyticsSnapshot {
        generated_at: now_rfc3339(),
        total_revenue,
        ..Default::default()
    };

    for entry in counts {
        snapshot.total += entry.count;
        match entry.status {
            OrderStatus::Pending => snapshot.pending = entry.count,
            OrderStatus::Processing => snapshot.processing = entry.count,
            OrderStatus::Shipped => snapshot.shipped = entry.count,
            OrderStatus::Delivered => snapshot.delivered = entry.count,
            OrderStatus::Cancelled => snapshot.cancelled = entry.count,
        }
    }

    snapshot.average_order_value = if completed > 0 {
        to_f64(to_decimal(total_revenue) / Decimal::from(completed))
    } else {
        0.0
    };

    Ok(snapshot)
}

/// Recompute and push to the analytics room. Best-effort: a failed
/// computation is logged and swallowed.
pub async fn publish_snapshot(orders: &OrderRepository, notifier: &dyn Notifier) {
    match compute_snapshot(orders).await {
        Ok(snapshot) => {
            let payload = serde_json::to_value(&snapshot).unwrap_or_default();
            notifier.publish(Topic::Analytics, payload).await;
        }
        Err(e) => tracing::warn!("Analytics snapshot failed: {}", e),
    }
}
