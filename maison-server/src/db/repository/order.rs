//! Order Repository
//!
//! Storage primitives for orders. Transition rules, reconciliation and
//! side effects live in the Order Ledger.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Order, OrderStatus};
use serde::{Deserialize, Serialize};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "order";

/// Listing filter. `user` scopes to one owner (self-service listing);
/// admin listings leave it unset.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub user: Option<RecordId>,
    pub status: Option<OrderStatus>,
    /// Free-text match against code and customer name/email
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: i64,
    pub limit: i64,
}

/// One page of a deterministic `created_at desc` listing
#[derive(Debug, Clone, Serialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

/// Per-status order count (analytics snapshot input)
#[derive(Debug, Clone, Deserialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record_id = parse_record_id(TABLE, id)?;
        let order: Option<Order> = self.base.db().select(record_id).await?;
        Ok(order)
    }

    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<Order>> {
        let code = code.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE code = $code LIMIT 1")
            .bind(("code", code))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Lookup by the provider correlation key. At most one order may carry
    /// a given payment id.
    pub async fn find_by_payment_id(&self, payment_id: &str) -> RepoResult<Option<Order>> {
        let payment_id = payment_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE payment_id = $payment_id LIMIT 1")
            .bind(("payment_id", payment_id))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Filtered listing, `created_at desc`, paged
    pub async fn list(&self, filter: OrderFilter) -> RepoResult<OrderPage> {
        let mut conditions: Vec<&str> = Vec::new();
        if filter.user.is_some() {
            conditions.push("user = $user");
        }
        if filter.status.is_some() {
            conditions.push("status = $status");
        }
        if filter.search.is_some() {
            conditions.push(
                "(string::lowercase(code) CONTAINS $search \
                 OR string::lowercase(customer_info.name) CONTAINS $search \
                 OR string::lowercase(customer_info.email) CONTAINS $search)",
            );
        }
        if filter.start_date.is_some() {
            conditions.push("created_at >= $start_date");
        }
        if filter.end_date.is_some() {
            conditions.push("created_at <= $end_date");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let page = filter.page.max(1);
        let limit = filter.limit.clamp(1, 100);
        let start = (page - 1) * limit;

        let list_sql = format!(
            "SELECT * FROM order{where_clause} ORDER BY created_at DESC LIMIT $limit START $start"
        );
        let count_sql = format!("SELECT count() AS total FROM order{where_clause} GROUP ALL");

        let mut query = self
            .base
            .db()
            .query(list_sql)
            .query(count_sql)
            .bind(("limit", limit))
            .bind(("start", start));
        if let Some(user) = filter.user {
            // Record links are persisted in string form
            query = query.bind(("user", user.to_string()));
        }
        if let Some(status) = filter.status {
            query = query.bind(("status", status));
        }
        if let Some(search) = filter.search {
            query = query.bind(("search", search.to_lowercase()));
        }
        if let Some(start_date) = filter.start_date {
            query = query.bind(("start_date", start_date));
        }
        if let Some(end_date) = filter.end_date {
            query = query.bind(("end_date", end_date));
        }

        let mut result = query.await?;
        let orders: Vec<Order> = result.take(0)?;
        let total: Option<i64> = result.take((1, "total"))?;
        let total = total.unwrap_or(0);
        let pages = if total == 0 {
            0
        } else {
            (total as u64).div_ceil(limit as u64) as i64
        };

        Ok(OrderPage {
            orders,
            total,
            page,
            pages,
        })
    }

    /// Merge a partial update into an order and return the updated record
    pub async fn merge<T: Serialize + 'static>(&self, id: &str, data: T) -> RepoResult<Order> {
        let record_id = parse_record_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $id MERGE $data")
            .bind(("id", record_id.clone()))
            .bind(("data", data))
            .await?;

        let order: Option<Order> = self.base.db().select(record_id).await?;
        order.ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
    }

    /// Order counts grouped by status
    pub async fn count_by_status(&self) -> RepoResult<Vec<StatusCount>> {
        let mut result = self
            .base
            .db()
            .query("SELECT status, count() AS count FROM order GROUP BY status")
            .await?;
        let counts: Vec<StatusCount> = result.take(0)?;
        Ok(counts)
    }

    /// Revenue over all non-cancelled orders
    pub async fn total_revenue(&self) -> RepoResult<f64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT math::sum(total) AS revenue FROM order \
                 WHERE status != 'cancelled' GROUP ALL",
            )
            .await?;
        let revenue: Option<f64> = result.take((0, "revenue"))?;
        Ok(revenue.unwrap_or(0.0))
    }

    /// Orders that progressed past payment (processing/shipped/delivered)
    pub async fn completed_count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() AS count FROM order \
                 WHERE status IN ['processing', 'shipped', 'delivered'] GROUP ALL",
            )
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }
}
