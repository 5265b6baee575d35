use async_trait::async_trait;
use chrono::Utc;

use crate::config::database_conf::DbPool;
use crate::model::tracking::TrackingRecord;
use crate::repository::repository_error::RepositoryResult;

#[async_trait]
pub trait TrackingRepository: Send + Sync {
    /// Upsert keyed by advertising id: a new id starts at one visit, a
    /// known id increments the counter and refreshes `last_seen`.
    /// Client/session ids already on record are kept when the request
    /// omits them.
    async fn record_visit(
        &self,
        advertising_id: &str,
        client_id: Option<&str>,
        session_id: Option<&str>,
    ) -> RepositoryResult<()>;

    async fn find_by_advertising_id(
        &self,
        advertising_id: &str,
    ) -> RepositoryResult<Option<TrackingRecord>>;
}

pub struct SqliteTrackingRepository {
    pool: DbPool,
}

impl SqliteTrackingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackingRepository for SqliteTrackingRepository {
    async fn record_visit(
        &self,
        advertising_id: &str,
        client_id: Option<&str>,
        session_id: Option<&str>,
    ) -> RepositoryResult<()> {
        sqlx::query(
            "INSERT INTO google_tracking \
             (advertising_id, client_id, session_id, first_seen, last_seen, visit_count) \
             VALUES (?1, ?2, ?3, ?4, ?4, 1) \
             ON CONFLICT(advertising_id) DO UPDATE SET \
                last_seen = excluded.last_seen, \
                visit_count = google_tracking.visit_count + 1, \
                client_id = COALESCE(excluded.client_id, google_tracking.client_id), \
                session_id = COALESCE(excluded.session_id, google_tracking.session_id)",
        )
        .bind(advertising_id)
        .bind(client_id)
        .bind(session_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_advertising_id(
        &self,
        advertising_id: &str,
    ) -> RepositoryResult<Option<TrackingRecord>> {
        let record = sqlx::query_as::<_, TrackingRecord>(
            "SELECT * FROM google_tracking WHERE advertising_id = ?1",
        )
        .bind(advertising_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }
}
