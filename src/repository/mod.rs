pub mod repository_error;
pub mod quote_repo;
pub mod newsletter_repo;
pub mod tracking_repo;

use crate::config::database_conf::DbPool;

/// Embedded schema migrations, applied on startup and in tests.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}
