//! Repository Module
//!
//! One repository per table. Mutations that carry business rules (status
//! transitions, reconciliation) go through the ledgers; repositories only
//! provide storage primitives.

pub mod cart;
pub mod counter;
pub mod order;
pub mod product;
pub mod return_request;
pub mod settings;
pub mod user;

// Re-exports
pub use cart::CartRepository;
pub use counter::CounterRepository;
pub use order::{OrderFilter, OrderPage, OrderRepository, StatusCount};
pub use product::ProductRepository;
pub use return_request::ReturnRepository;
pub use settings::SettingsRepository;
pub use user::UserRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

use crate::utils::AppError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse an id that may or may not carry its table prefix
/// (`"order:abc"` and `"abc"` both resolve to `order:abc`).
pub(crate) fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    if id.contains(':') {
        let rid: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid id format: {id}")))?;
        if rid.table() != table {
            return Err(RepoError::NotFound(format!(
                "Id {id} does not reference table {table}"
            )));
        }
        Ok(rid)
    } else {
        Ok(RecordId::from_table_key(table, id))
    }
}
