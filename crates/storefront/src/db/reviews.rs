//! Review repository.

use sqlx::PgPool;
use tracing::instrument;

use gaspass_core::catalog::Review;
use gaspass_core::{ProductId, ReviewId};

use super::RepositoryError;

/// Repository for review queries.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All reviews, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Review>, RepositoryError> {
        let reviews = sqlx::query_as::<_, Review>(
            r"
            SELECT r.id, r.author, r.avatar, r.rating, r.text,
                   to_char(r.date, 'DD Mon YYYY') AS date,
                   r.product_id
            FROM review r
            ORDER BY r.date DESC, r.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(reviews)
    }

    /// Reviews of one product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn for_product(&self, product_id: ProductId) -> Result<Vec<Review>, RepositoryError> {
        let reviews = sqlx::query_as::<_, Review>(
            r"
            SELECT r.id, r.author, r.avatar, r.rating, r.text,
                   to_char(r.date, 'DD Mon YYYY') AS date
            FROM review r
            WHERE r.product_id = $1
            ORDER BY r.date DESC, r.id DESC
            ",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;
        Ok(reviews)
    }

    /// A review with the name of the product it belongs to.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get(&self, id: ReviewId) -> Result<Option<Review>, RepositoryError> {
        let review = sqlx::query_as::<_, Review>(
            r"
            SELECT r.id, r.author, r.avatar, r.rating, r.text,
                   to_char(r.date, 'DD Mon YYYY') AS date,
                   r.product_id,
                   p.name AS product_name
            FROM review r
            LEFT JOIN product p ON r.product_id = p.id
            WHERE r.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(review)
    }
}
