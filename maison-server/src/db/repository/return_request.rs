//! Return Request Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::ReturnRequest;
use serde::Serialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "return_request";

#[derive(Clone)]
pub struct ReturnRepository {
    base: BaseRepository,
}

impl ReturnRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, request: ReturnRequest) -> RepoResult<ReturnRequest> {
        let created: Option<ReturnRequest> =
            self.base.db().create(TABLE).content(request).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create return request".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ReturnRequest>> {
        let record_id = parse_record_id(TABLE, id)?;
        let request: Option<ReturnRequest> = self.base.db().select(record_id).await?;
        Ok(request)
    }

    /// All return requests owned by one user, newest first
    pub async fn list_for_user(&self, user: RecordId) -> RepoResult<Vec<ReturnRequest>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM return_request WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user.to_string()))
            .await?;
        let requests: Vec<ReturnRequest> = result.take(0)?;
        Ok(requests)
    }

    /// Merge a partial update and return the updated record
    pub async fn merge<T: Serialize + 'static>(
        &self,
        id: &str,
        data: T,
    ) -> RepoResult<ReturnRequest> {
        let record_id = parse_record_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $id MERGE $data")
            .bind(("id", record_id.clone()))
            .bind(("data", data))
            .await?;

        let request: Option<ReturnRequest> = self.base.db().select(record_id).await?;
        request.ok_or_else(|| RepoError::NotFound(format!("Return request {id} not found")))
    }
}
