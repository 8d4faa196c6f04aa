//! Cart Repository
//!
//! The order core only reads carts and clears them. Clearing an already
//! empty cart is a no-op, which keeps reconciliation replays safe.

use super::{BaseRepository, RepoResult};
use crate::db::models::Cart;
use crate::utils::time::now_rfc3339;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_for_user(&self, user: RecordId) -> RepoResult<Option<Cart>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE user = $user LIMIT 1")
            .bind(("user", user.to_string()))
            .await?;
        let carts: Vec<Cart> = result.take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Empty the user's cart, keeping the record itself
    pub async fn clear_for_user(&self, user: RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE cart SET items = [], updated_at = $now WHERE user = $user")
            .bind(("user", user.to_string()))
            .bind(("now", now_rfc3339()))
            .await?;
        Ok(())
    }
}
