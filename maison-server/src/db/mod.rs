//! Database Module
//!
//! Embedded SurrealDB storage. Correctness of concurrent ledger operations
//! relies on per-record atomicity of the store, not in-process locking.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "maison";
const DATABASE: &str = "store";

/// Open the on-disk database and apply schema definitions
pub async fn connect(path: &str) -> Result<Surreal<Db>, AppError> {
    let db = Surreal::new::<RocksDb>(path)
        .await
        .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
    init(&db).await?;
    tracing::info!("Database connection established ({path})");
    Ok(db)
}

/// Open an in-memory database (tests)
pub async fn connect_memory() -> Result<Surreal<Db>, AppError> {
    let db = Surreal::new::<Mem>(())
        .await
        .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
    init(&db).await?;
    Ok(db)
}

async fn init(db: &Surreal<Db>) -> Result<(), AppError> {
    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

    // Unique constraints back up application-level duplicate checks
    db.query(
        "
        DEFINE INDEX IF NOT EXISTS uniq_order_code ON TABLE order FIELDS code UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_order_payment_id ON TABLE order FIELDS payment_id;
        DEFINE INDEX IF NOT EXISTS idx_order_user ON TABLE order FIELDS user;
        DEFINE INDEX IF NOT EXISTS uniq_return_rma ON TABLE return_request FIELDS rma_number UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_return_user ON TABLE return_request FIELDS user;
        DEFINE INDEX IF NOT EXISTS idx_cart_user ON TABLE cart FIELDS user;
        ",
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define indexes: {e}")))?;

    Ok(())
}
