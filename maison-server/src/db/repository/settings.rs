//! Settings Repository
//!
//! Singleton `settings:store` record. Reads fall back to defaults when the
//! record has never been written.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Settings;
use crate::utils::time::now_rfc3339;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "settings";
const KEY: &str = "store";

#[derive(Clone)]
pub struct SettingsRepository {
    base: BaseRepository,
}

impl SettingsRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn get(&self) -> RepoResult<Settings> {
        let settings: Option<Settings> = self
            .base
            .db()
            .select(RecordId::from_table_key(TABLE, KEY))
            .await?;
        Ok(settings.unwrap_or(Settings {
            id: None,
            stripe_enabled: true,
            updated_at: now_rfc3339(),
        }))
    }

    pub async fn set_stripe_enabled(&self, enabled: bool) -> RepoResult<Settings> {
        let mut result = self
            .base
            .db()
            .query(
                "UPSERT $id SET stripe_enabled = $enabled, updated_at = $now RETURN AFTER",
            )
            .bind(("id", RecordId::from_table_key(TABLE, KEY)))
            .bind(("enabled", enabled))
            .bind(("now", now_rfc3339()))
            .await?;
        let settings: Vec<Settings> = result.take(0)?;
        settings
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to update settings".to_string()))
    }
}
