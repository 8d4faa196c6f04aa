//! Return Ledger
//!
//! Creation and admin patching of return requests. The only cross-entity
//! side effect lives here: a return moving to `refunded` forces the parent
//! order's payment status to refunded, best-effort.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::{ReturnUpdate, Topic};

use crate::auth::CurrentUser;
use crate::db::models::{
    Order, PaymentStatus, ReturnItem, ReturnRequest, ReturnStatus,
};
use crate::db::repository::{OrderRepository, ReturnRepository, parse_record_id};
use crate::pricing::{to_decimal, to_f64};
use crate::realtime::Notifier;
use crate::utils::time::now_rfc3339;
use crate::utils::{AppError, AppResult};

use super::rma::generate_rma;

/// Requested return line, referencing an order line by index. Quantity
/// defaults to the full line quantity.
#[derive(Debug, Clone, Deserialize)]
pub struct ReturnItemRequest {
    pub order_line: i32,
    pub quantity: Option<i32>,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateReturnRequest {
    pub order_id: String,
    /// Omitted means the full order item set is returned
    pub items: Option<Vec<ReturnItemRequest>>,
    pub reason: Option<String>,
    pub comments: Option<String>,
}

/// Admin patch. Any subset of fields may be set.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateReturnRequest {
    pub status: Option<ReturnStatus>,
    pub refund_amount: Option<f64>,
    pub carrier: Option<String>,
    pub tracking_number: Option<String>,
}

pub struct ReturnLedger {
    returns: ReturnRepository,
    orders: OrderRepository,
    notifier: Arc<dyn Notifier>,
}

impl ReturnLedger {
    pub fn new(db: Surreal<Db>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            returns: ReturnRepository::new(db.clone()),
            orders: OrderRepository::new(db),
            notifier,
        }
    }

    /// Open a return against an owned order. The requester picks order
    /// lines (or gets all of them); snapshots come from the order, never
    /// from the client.
    pub async fn create_return(
        &self,
        user: &CurrentUser,
        req: CreateReturnRequest,
    ) -> AppResult<ReturnRequest> {
        let order = self
            .orders
            .find_by_id(&req.order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {} not found", req.order_id)))?;
        self.ensure_owner_or_admin(user, &order)?;

        let items = self.resolve_items(&order, req.items)?;
        if items.is_empty() {
            return Err(AppError::validation("Nothing to return"));
        }
        let refund_amount = to_f64(
            items
                .iter()
                .map(|i| to_decimal(i.price) * rust_decimal::Decimal::from(i.quantity))
                .sum(),
        );

        let order_id = order
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Order record without id"))?;
        let now = now_rfc3339();
        let request = ReturnRequest {
            id: None,
            rma_number: generate_rma(),
            order: order_id,
            user: order.user.clone(),
            items,
            status: ReturnStatus::Requested,
            reason: req.reason.unwrap_or_default(),
            comments: req.comments.unwrap_or_default(),
            refund_amount,
            carrier: None,
            tracking_number: None,
            created_at: now.clone(),
            updated_at: now,
        };

        let created = self.returns.create(request).await?;
        tracing::info!(
            "Return {} opened against order {}",
            created.rma_number,
            order.code
        );
        self.publish_return_update(&created).await;
        Ok(created)
    }

    /// Owner-or-admin read
    pub async fn get_return(&self, user: &CurrentUser, id: &str) -> AppResult<ReturnRequest> {
        let request = self
            .returns
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Return request {id} not found")))?;
        if !user.is_admin() && request.user.to_string() != user.id {
            return Err(AppError::forbidden("Not your return request"));
        }
        Ok(request)
    }

    pub async fn list_mine(&self, user: &CurrentUser) -> AppResult<Vec<ReturnRequest>> {
        let record = parse_record_id("user", &user.id)?;
        Ok(self.returns.list_for_user(record).await?)
    }

    /// Admin patch. Moving to `refunded` also forces the parent order's
    /// payment status to refunded; that secondary write is best-effort and
    /// never fails the return update.
    pub async fn update_status(
        &self,
        user: &CurrentUser,
        id: &str,
        req: UpdateReturnRequest,
    ) -> AppResult<ReturnRequest> {
        if !user.is_admin() {
            return Err(AppError::forbidden("Admin access required"));
        }
        let existing = self
            .returns
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Return request {id} not found")))?;

        let mut patch = json!({ "updated_at": now_rfc3339() });
        if let Some(status) = req.status {
            patch["status"] = json!(status);
        }
        if let Some(amount) = req.refund_amount {
            if amount < 0.0 {
                return Err(AppError::validation("Refund amount cannot be negative"));
            }
            patch["refund_amount"] = json!(amount);
        }
        if let Some(carrier) = req.carrier {
            patch["carrier"] = json!(carrier);
        }
        if let Some(tracking) = req.tracking_number {
            patch["tracking_number"] = json!(tracking);
        }

        let updated = self.returns.merge(id, patch).await?;

        if req.status == Some(ReturnStatus::Refunded) {
            let order_patch = json!({
                "payment_status": PaymentStatus::Refunded,
                "updated_at": now_rfc3339(),
            });
            if let Err(e) = self
                .orders
                .merge(&updated.order.to_string(), order_patch)
                .await
            {
                tracing::warn!(
                    "Order {} payment status update after return refund failed: {}",
                    updated.order,
                    e
                );
            }
        }

        self.publish_return_update(&updated).await;
        Ok(updated)
    }

    // ==================== Internals ====================

    fn ensure_owner_or_admin(&self, user: &CurrentUser, order: &Order) -> AppResult<()> {
        if user.is_admin() || order.user.to_string() == user.id {
            Ok(())
        } else {
            Err(AppError::forbidden("Not your order"))
        }
    }

    fn resolve_items(
        &self,
        order: &Order,
        requested: Option<Vec<ReturnItemRequest>>,
    ) -> AppResult<Vec<ReturnItem>> {
        let lines: Vec<ReturnItemRequest> = match requested {
            Some(lines) if !lines.is_empty() => lines,
            _ => (0..order.items.len() as i32)
                .map(|i| ReturnItemRequest {
                    order_line: i,
                    quantity: None,
                    reason: None,
                })
                .collect(),
        };

        lines
            .into_iter()
            .map(|line| {
                let item = order
                    .items
                    .get(line.order_line as usize)
                    .ok_or_else(|| {
                        AppError::validation(format!(
                            "Order has no line {}",
                            line.order_line
                        ))
                    })?;
                let quantity = line.quantity.unwrap_or(item.quantity);
                if quantity < 1 || quantity > item.quantity {
                    return Err(AppError::validation(format!(
                        "Return quantity {quantity} exceeds ordered quantity {}",
                        item.quantity
                    )));
                }
                Ok(ReturnItem {
                    order_line: line.order_line,
                    product: item.product.clone(),
                    name: item.name.clone(),
                    price: item.price,
                    quantity,
                    reason: line.reason.unwrap_or_default(),
                })
            })
            .collect()
    }

    async fn publish_return_update(&self, request: &ReturnRequest) {
        let payload = ReturnUpdate {
            id: request.id_string(),
            rma_number: request.rma_number.clone(),
            status: request.status.as_str().to_string(),
            refund_amount: Some(request.refund_amount),
        };
        let value = serde_json::to_value(&payload).unwrap_or_default();
        self.notifier
            .publish(Topic::Return(request.id_string()), value)
            .await;
    }
}
