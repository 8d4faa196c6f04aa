//! User Repository (read model)

use super::{BaseRepository, RepoResult, parse_record_id};
use crate::db::models::User;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let record_id = parse_record_id(TABLE, id)?;
        let user: Option<User> = self.base.db().select(record_id).await?;
        Ok(user)
    }
}
