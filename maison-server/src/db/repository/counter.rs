//! Counter Repository
//!
//! Named atomic sequences. The increment happens store-side in a single
//! statement, so concurrent creates never observe the same value.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Counter;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "counter";

#[derive(Clone)]
pub struct CounterRepository {
    base: BaseRepository,
}

impl CounterRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Increment the named sequence and return the new value (starts at 1)
    pub async fn next(&self, name: &str) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("UPSERT $id SET value += 1 RETURN AFTER")
            .bind(("id", RecordId::from_table_key(TABLE, name)))
            .await?;
        let counter: Vec<Counter> = result.take(0)?;
        counter
            .into_iter()
            .next()
            .map(|c| c.value)
            .ok_or_else(|| RepoError::Database(format!("Failed to advance counter {name}")))
    }
}
