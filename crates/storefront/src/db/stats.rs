//! Catalog statistics and database liveness.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use gaspass_core::catalog::Stats;

use super::RepositoryError;

/// Repository for aggregate queries.
pub struct StatsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StatsRepository<'a> {
    /// Create a new stats repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Row counts of products, categories and reviews, queried concurrently.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any count fails.
    #[instrument(skip(self))]
    pub async fn counts(&self) -> Result<Stats, RepositoryError> {
        let (products, categories, reviews) = tokio::try_join!(
            self.count("SELECT COUNT(*) FROM product"),
            self.count("SELECT COUNT(*) FROM category"),
            self.count("SELECT COUNT(*) FROM review"),
        )?;

        Ok(Stats {
            products,
            categories,
            reviews,
        })
    }

    /// Current database server time; doubles as a connectivity check.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the database is unreachable.
    pub async fn server_time(&self) -> Result<DateTime<Utc>, RepositoryError> {
        let now = sqlx::query_scalar::<_, DateTime<Utc>>("SELECT NOW()")
            .fetch_one(self.pool)
            .await?;
        Ok(now)
    }

    async fn count(&self, sql: &'static str) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
