//! Order API Handlers
//!
//! Thin layer over the order ledger: deserialize, delegate, envelope.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::AnalyticsSnapshot;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderStatus};
use crate::db::repository::{OrderFilter, OrderPage};
use crate::orders::{CreateOrderRequest, RefundRequest, UpdateStatusRequest};
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};

/// Shared filter shape for admin and self-service listings
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

impl From<ListQuery> for OrderFilter {
    fn from(q: ListQuery) -> Self {
        OrderFilter {
            user: None,
            status: q.status,
            search: q.search,
            start_date: q.start_date,
            end_date: q.end_date,
            page: q.page,
            limit: q.limit,
        }
    }
}

/// Create an order without a payment gateway (e.g. cash on delivery)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.order_ledger.create_order(&user, payload, None).await?;
    Ok(ok_with_message(order, "Order created"))
}

/// Admin listing with search and date-range filters
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<OrderPage>>> {
    let page = state.order_ledger.list_all(&user, query.into()).await?;
    Ok(ok(page))
}

/// Self-service listing, scoped to the caller
pub async fn list_my(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<OrderPage>>> {
    let page = state.order_ledger.list_mine(&user, query.into()).await?;
    Ok(ok(page))
}

/// Admin aggregate metrics
pub async fn stats(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<AnalyticsSnapshot>>> {
    let snapshot = state.order_ledger.stats(&user).await?;
    Ok(ok(snapshot))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.order_ledger.get_order(&user, &id).await?;
    Ok(ok(order))
}

pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.order_ledger.update_status(&user, &id, payload).await?;
    Ok(ok_with_message(order, "Order status updated"))
}

pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.order_ledger.cancel(&user, &id).await?;
    Ok(ok_with_message(order, "Order cancelled"))
}

pub async fn refund(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<RefundRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.order_ledger.refund(&user, &id, payload).await?;
    Ok(ok_with_message(order, "Refund processed"))
}
