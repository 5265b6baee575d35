use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::config::database_conf::DbPool;
use crate::model::newsletter::{NewsletterSubscription, SubscriptionStatus};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait NewsletterRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<NewsletterSubscription>>;
    async fn insert(&self, email: &str, source: &str) -> RepositoryResult<NewsletterSubscription>;
    /// Flip an unsubscribed record back to active, refreshing the
    /// subscription timestamp and source.
    async fn reactivate(&self, email: &str, source: &str) -> RepositoryResult<NewsletterSubscription>;
}

pub struct SqliteNewsletterRepository {
    pool: DbPool,
}

impl SqliteNewsletterRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, email: &str) -> RepositoryResult<NewsletterSubscription> {
        self.find_by_email(email)
            .await?
            .ok_or_else(|| RepositoryError::not_found(format!("Subscription {} not found", email)))
    }
}

#[async_trait]
impl NewsletterRepository for SqliteNewsletterRepository {
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<NewsletterSubscription>> {
        let subscription = sqlx::query_as::<_, NewsletterSubscription>(
            "SELECT * FROM newsletter_subscriptions WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(subscription)
    }

    #[tracing::instrument(skip(self), fields(email = %email))]
    async fn insert(&self, email: &str, source: &str) -> RepositoryResult<NewsletterSubscription> {
        info!("Inserting newsletter subscription");
        sqlx::query(
            "INSERT INTO newsletter_subscriptions (email, status, source, subscribed_at) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(email)
        .bind(SubscriptionStatus::Active)
        .bind(source)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        self.fetch(email).await
    }

    #[tracing::instrument(skip(self), fields(email = %email))]
    async fn reactivate(&self, email: &str, source: &str) -> RepositoryResult<NewsletterSubscription> {
        info!("Reactivating newsletter subscription");
        let done = sqlx::query(
            "UPDATE newsletter_subscriptions \
             SET status = ?1, subscribed_at = ?2, unsubscribed_at = NULL, source = ?3 \
             WHERE email = ?4",
        )
        .bind(SubscriptionStatus::Active)
        .bind(Utc::now())
        .bind(source)
        .bind(email)
        .execute(&self.pool)
        .await?;
        if done.rows_affected() == 0 {
            return Err(RepositoryError::not_found(format!("Subscription {} not found", email)));
        }
        self.fetch(email).await
    }
}
