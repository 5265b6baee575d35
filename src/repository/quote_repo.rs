use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info};

use crate::config::database_conf::DbPool;
use crate::model::quote::{NewQuoteRequest, QuoteRequest, QuoteStatus};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait QuoteRequestRepository: Send + Sync {
    async fn create(&self, new: NewQuoteRequest) -> RepositoryResult<QuoteRequest>;
    /// Not-found is a distinct outcome, not an error.
    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<QuoteRequest>>;
    async fn update_status(&self, id: i64, status: QuoteStatus) -> RepositoryResult<QuoteRequest>;
    async fn delete(&self, id: i64) -> RepositoryResult<()>;
    /// All records, newest first.
    async fn list_all(&self) -> RepositoryResult<Vec<QuoteRequest>>;
}

pub struct SqliteQuoteRequestRepository {
    pool: DbPool,
}

impl SqliteQuoteRequestRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuoteRequestRepository for SqliteQuoteRequestRepository {
    #[tracing::instrument(skip(self, new), fields(company = %new.company_name))]
    async fn create(&self, new: NewQuoteRequest) -> RepositoryResult<QuoteRequest> {
        info!("Creating new quote request");
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO quote_requests \
             (company_name, email, phone, description, service_type, project_type, \
              timeline, budget_range, status, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
        )
        .bind(&new.company_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.description)
        .bind(&new.service_type)
        .bind(&new.project_type)
        .bind(&new.timeline)
        .bind(&new.budget_range)
        .bind(QuoteStatus::Pending)
        .bind(now)
        .execute(&self.pool)
        .await;

        let id = match result {
            Ok(done) => done.last_insert_rowid(),
            Err(e) => {
                error!("Failed to create quote request: {}", e);
                return Err(RepositoryError::from(e));
            }
        };

        let created = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::database("Inserted quote request not found"))?;
        info!(id = created.id, "Quote request created successfully");
        Ok(created)
    }

    #[tracing::instrument(skip(self), fields(id = id))]
    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<QuoteRequest>> {
        let quote = sqlx::query_as::<_, QuoteRequest>(
            "SELECT * FROM quote_requests WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(quote)
    }

    #[tracing::instrument(skip(self), fields(id = id, status = %status))]
    async fn update_status(&self, id: i64, status: QuoteStatus) -> RepositoryResult<QuoteRequest> {
        info!("Updating quote request status");
        let done = sqlx::query(
            "UPDATE quote_requests SET status = ?1, updated_at = ?2 WHERE id = ?3",
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if done.rows_affected() == 0 {
            return Err(RepositoryError::not_found(format!("Quote request {} not found", id)));
        }
        self.get_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(format!("Quote request {} not found", id)))
    }

    #[tracing::instrument(skip(self), fields(id = id))]
    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        info!("Deleting quote request");
        let done = sqlx::query("DELETE FROM quote_requests WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if done.rows_affected() == 0 {
            // A clean not-found instead of a generic store error.
            return Err(RepositoryError::not_found(format!("Quote request {} not found", id)));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn list_all(&self) -> RepositoryResult<Vec<QuoteRequest>> {
        let quotes = sqlx::query_as::<_, QuoteRequest>(
            "SELECT * FROM quote_requests ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        info!("Fetched {} quote requests", quotes.len());
        Ok(quotes)
    }
}
