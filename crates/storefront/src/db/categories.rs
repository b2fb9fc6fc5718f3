//! Category repository.

use sqlx::PgPool;
use tracing::instrument;

use gaspass_core::catalog::Category;

use super::RepositoryError;

/// Repository for category queries.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, description
            FROM category
            ORDER BY name
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(categories)
    }
}
