//! Order Ledger
//!
//! The entity store and transition logic for orders: creation, status and
//! payment-status mutation, cancellation, refund recording, and the
//! idempotent payment reconciliation invoked by the gateway adapters.
//!
//! Every mutation ends with a best-effort realtime + analytics publish.
//! Publish failures are logged and never fail the primary operation.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use shared::{OrderPaymentUpdate, Topic};

use crate::analytics;
use crate::db::models::{
    CustomerInfo, Order, OrderStatus, PaymentMethod, PaymentStatus, Refund,
};
use crate::db::repository::{
    CartRepository, CounterRepository, OrderFilter, OrderPage, OrderRepository,
    ProductRepository, UserRepository, parse_record_id,
};
use crate::auth::CurrentUser;
use crate::payments::PaymentOutcome;
use crate::pricing::{ItemRequest, PricedOrder, PricingCalculator, PricingConfig, ShippingMethod};
use crate::realtime::Notifier;
use crate::utils::time::{current_year, now_rfc3339};
use crate::utils::{AppError, AppResult};

use super::address::AddressInput;

/// Checkout payload. Addresses arrive in loose client shapes and are
/// normalized before persistence; billing defaults to shipping.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<ItemRequest>,
    #[serde(default)]
    pub shipping_method: ShippingMethod,
    pub payment_method: PaymentMethod,
    pub customer_info: Option<CustomerInfo>,
    pub shipping_address: AddressInput,
    pub billing_address: Option<AddressInput>,
    pub notes: Option<String>,
}

/// Admin status patch
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<String>,
    pub notes: Option<String>,
}

/// Admin refund. Amount defaults to the full order total.
#[derive(Debug, Default, Deserialize)]
pub struct RefundRequest {
    pub amount: Option<f64>,
    pub reason: Option<String>,
}

pub struct OrderLedger {
    orders: OrderRepository,
    carts: CartRepository,
    counters: CounterRepository,
    users: UserRepository,
    pricing: PricingCalculator,
    notifier: Arc<dyn Notifier>,
}

impl OrderLedger {
    pub fn new(db: Surreal<Db>, pricing: PricingConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            carts: CartRepository::new(db.clone()),
            counters: CounterRepository::new(db.clone()),
            users: UserRepository::new(db.clone()),
            pricing: PricingCalculator::new(ProductRepository::new(db), pricing),
            notifier,
        }
    }

    pub fn orders(&self) -> &OrderRepository {
        &self.orders
    }

    /// Resolve and price a checkout payload without persisting anything.
    /// Gateway adapters use this to build provider amounts up front.
    pub async fn price(
        &self,
        items: &[ItemRequest],
        method: ShippingMethod,
    ) -> AppResult<PricedOrder> {
        self.pricing.price(items, method).await
    }

    // ==================== Creation ====================

    /// Create a pending order. `payment_id` is set when a gateway adapter
    /// pre-commits the order against a provider intent; plain checkouts
    /// (e.g. cash on delivery) pass `None`.
    pub async fn create_order(
        &self,
        user: &CurrentUser,
        req: CreateOrderRequest,
        payment_id: Option<String>,
    ) -> AppResult<Order> {
        let priced = self.pricing.price(&req.items, req.shipping_method).await?;
        let customer = self.resolve_customer_info(user, req.customer_info).await?;

        let shipping_address = req.shipping_address.normalize(&customer);
        if !shipping_address.is_complete() {
            return Err(AppError::validation("Shipping address is incomplete"));
        }
        let billing_address = match req.billing_address {
            Some(input) => {
                let billing = input.normalize(&customer);
                if billing.is_complete() {
                    billing
                } else {
                    shipping_address.clone()
                }
            }
            None => shipping_address.clone(),
        };

        let code = self.next_order_code().await?;
        let now = now_rfc3339();
        let order = Order {
            id: None,
            code,
            user: self.user_record(user)?,
            items: priced.items,
            customer_info: customer,
            subtotal: priced.subtotal,
            shipping: priced.shipping,
            tax: priced.tax,
            discount: 0.0,
            total: priced.total,
            status: OrderStatus::Pending,
            payment_method: req.payment_method,
            payment_status: PaymentStatus::Pending,
            payment_id,
            shipping_address,
            billing_address,
            tracking_number: None,
            estimated_delivery: None,
            actual_delivery: None,
            notes: req.notes,
            refund: None,
            created_at: now.clone(),
            updated_at: now,
        };

        let created = self.orders.create(order).await?;
        tracing::info!("Order {} created for {}", created.code, user.id);

        self.clear_cart_best_effort(user).await;
        self.publish_order_update(&created).await;
        analytics::publish_snapshot(&self.orders, self.notifier.as_ref()).await;

        Ok(created)
    }

    async fn next_order_code(&self) -> AppResult<String> {
        let year = current_year();
        let seq = self.counters.next(&format!("order_code_{year}")).await?;
        Ok(format!("ORD-{year}-{seq:04}"))
    }

    async fn resolve_customer_info(
        &self,
        user: &CurrentUser,
        submitted: Option<CustomerInfo>,
    ) -> AppResult<CustomerInfo> {
        if let Some(info) = submitted
            && !info.name.trim().is_empty()
            && !info.email.trim().is_empty()
        {
            return Ok(info);
        }
        let record = self.users.find_by_id(&user.id).await?;
        match record {
            Some(u) => Ok(CustomerInfo {
                name: u.name,
                email: u.email,
                phone: u.phone,
            }),
            None => Err(AppError::validation("Customer information is required")),
        }
    }

    // ==================== Reads ====================

    /// Owner-or-admin read
    pub async fn get_order(&self, user: &CurrentUser, id: &str) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
        self.ensure_owner_or_admin(user, &order)?;
        Ok(order)
    }

    /// Admin-only full listing
    pub async fn list_all(&self, user: &CurrentUser, filter: OrderFilter) -> AppResult<OrderPage> {
        if !user.is_admin() {
            return Err(AppError::forbidden("Admin access required"));
        }
        Ok(self.orders.list(filter).await?)
    }

    /// Self-service listing, implicitly scoped to the requester
    pub async fn list_mine(
        &self,
        user: &CurrentUser,
        mut filter: OrderFilter,
    ) -> AppResult<OrderPage> {
        filter.user = Some(self.user_record(user)?);
        Ok(self.orders.list(filter).await?)
    }

    /// Admin aggregate metrics, the analytics snapshot exposed synchronously
    pub async fn stats(&self, user: &CurrentUser) -> AppResult<shared::AnalyticsSnapshot> {
        if !user.is_admin() {
            return Err(AppError::forbidden("Admin access required"));
        }
        analytics::compute_snapshot(&self.orders).await
    }

    // ==================== Mutations ====================

    /// Admin-only fulfillment transition, checked against the transition
    /// table. Delivered stamps the actual delivery time.
    pub async fn update_status(
        &self,
        user: &CurrentUser,
        id: &str,
        req: UpdateStatusRequest,
    ) -> AppResult<Order> {
        if !user.is_admin() {
            return Err(AppError::forbidden("Admin access required"));
        }
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;

        if !order.status.can_transition_to(req.status) {
            return Err(AppError::validation(format!(
                "Cannot move order from {} to {}",
                order.status.as_str(),
                req.status.as_str()
            )));
        }

        let mut patch = json!({
            "status": req.status,
            "updated_at": now_rfc3339(),
        });
        if let Some(tracking) = req.tracking_number {
            patch["tracking_number"] = json!(tracking);
        }
        if let Some(eta) = req.estimated_delivery {
            patch["estimated_delivery"] = json!(eta);
        }
        if let Some(notes) = req.notes {
            patch["notes"] = json!(notes);
        }
        if req.status == OrderStatus::Delivered {
            patch["actual_delivery"] = json!(now_rfc3339());
        }

        let updated = self.orders.merge(id, patch).await?;
        self.publish_order_update(&updated).await;
        analytics::publish_snapshot(&self.orders, self.notifier.as_ref()).await;
        Ok(updated)
    }

    /// Owner-or-admin cancellation, only before fulfillment starts.
    /// Payment status flips to refunded only when the order was paid.
    pub async fn cancel(&self, user: &CurrentUser, id: &str) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
        self.ensure_owner_or_admin(user, &order)?;

        if !order.status.can_cancel() {
            return Err(AppError::validation(format!(
                "Order in status {} cannot be cancelled",
                order.status.as_str()
            )));
        }

        let mut patch = json!({
            "status": OrderStatus::Cancelled,
            "updated_at": now_rfc3339(),
        });
        if order.payment_status == PaymentStatus::Paid {
            patch["payment_status"] = json!(PaymentStatus::Refunded);
        }

        let updated = self.orders.merge(id, patch).await?;
        tracing::info!("Order {} cancelled by {}", updated.code, user.id);
        self.publish_order_update(&updated).await;
        analytics::publish_snapshot(&self.orders, self.notifier.as_ref()).await;
        Ok(updated)
    }

    /// Admin refund. Requires a paid order and an amount within the order
    /// total; defaults to a full refund.
    pub async fn refund(
        &self,
        user: &CurrentUser,
        id: &str,
        req: RefundRequest,
    ) -> AppResult<Order> {
        if !user.is_admin() {
            return Err(AppError::forbidden("Admin access required"));
        }
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;

        if order.payment_status != PaymentStatus::Paid {
            return Err(AppError::validation(format!(
                "Only paid orders can be refunded, payment status is {}",
                order.payment_status.as_str()
            )));
        }
        let amount = req.amount.unwrap_or(order.total);
        if amount <= 0.0 || amount > order.total {
            return Err(AppError::validation(format!(
                "Refund amount {amount} must be within the order total {}",
                order.total
            )));
        }

        let refund = Refund {
            amount,
            reason: req.reason.unwrap_or_else(|| "Admin refund".to_string()),
            processed_at: now_rfc3339(),
            processed_by: user.id.clone(),
        };
        let patch = json!({
            "payment_status": PaymentStatus::Refunded,
            "refund": refund,
            "updated_at": now_rfc3339(),
        });

        let updated = self.orders.merge(id, patch).await?;
        tracing::info!("Order {} refunded {} by {}", updated.code, amount, user.id);
        self.publish_order_update(&updated).await;
        analytics::publish_snapshot(&self.orders, self.notifier.as_ref()).await;
        Ok(updated)
    }

    // ==================== Reconciliation ====================

    /// Apply a gateway outcome to the order carrying `payment_id`.
    ///
    /// Idempotent: replaying the same outcome converges to the same state.
    /// Success marks the order paid and advances pending to processing,
    /// never regressing a later status. Failure only marks the payment
    /// failed. Cart clearing and publishing are best-effort.
    pub async fn reconcile_payment(
        &self,
        payment_id: &str,
        outcome: PaymentOutcome,
    ) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_payment_id(payment_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("No order for payment {payment_id}"))
            })?;

        let mut patch = json!({ "updated_at": now_rfc3339() });
        match outcome {
            PaymentOutcome::Succeeded => {
                patch["payment_status"] = json!(PaymentStatus::Paid);
                if order.status == OrderStatus::Pending {
                    patch["status"] = json!(OrderStatus::Processing);
                }
            }
            PaymentOutcome::Failed => {
                patch["payment_status"] = json!(PaymentStatus::Failed);
            }
        }

        let updated = self.orders.merge(&order.id_string(), patch).await?;
        tracing::info!(
            "Payment {} reconciled as {:?} for order {}",
            payment_id,
            outcome,
            updated.code
        );

        if outcome == PaymentOutcome::Succeeded {
            if let Err(e) = self.carts.clear_for_user(updated.user.clone()).await {
                tracing::warn!("Cart clear after payment failed: {}", e);
            }
        }
        self.publish_order_update(&updated).await;
        analytics::publish_snapshot(&self.orders, self.notifier.as_ref()).await;

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

    fn user_record(&self, user: &CurrentUser) -> AppResult<RecordId> {
        Ok(parse_record_id("user", &user.id)?)
    }

    async fn clear_cart_best_effort(&self, user: &CurrentUser) {
        match self.user_record(user) {
            Ok(record) => {
                if let Err(e) = self.carts.clear_for_user(record).await {
                    tracing::warn!("Cart clear for {} failed: {}", user.id, e);
                }
            }
            Err(e) => tracing::warn!("Cart clear skipped, bad user id {}: {}", user.id, e),
        }
    }

    async fn publish_order_update(&self, order: &Order) {
        let payload = OrderPaymentUpdate {
            id: order.id_string(),
            code: order.code.clone(),
            status: order.status.as_str().to_string(),
            payment_status: order.payment_status.as_str().to_string(),
            payment_id: order.payment_id.clone(),
            updated_at: order.updated_at.clone(),
        };
        let value = serde_json::to_value(&payload).unwrap_or_default();
        self.notifier
            .publish(Topic::Order(order.id_string()), value)
            .await;
    }
}
