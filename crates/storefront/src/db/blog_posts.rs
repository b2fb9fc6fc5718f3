//! Blog post repository.
//!
//! Tags live in a join table and are aggregated into a `TEXT[]` per post.

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use gaspass_core::BlogPostId;
use gaspass_core::catalog::BlogPost;

use super::RepositoryError;

const BLOG_POST_SELECT: &str = r"
    SELECT
        bp.id,
        bp.title,
        bp.excerpt,
        to_char(bp.created_at, 'DD Mon YYYY HH24:MI') AS date,
        bp.image,
        bp.image_caption,
        bp.author,
        bp.content,
        bc.name AS category,
        bp.likes,
        bp.comments_count AS comments,
        bp.reading_time,
        ARRAY_REMOVE(ARRAY_AGG(t.name ORDER BY t.name), NULL)::TEXT[] AS tags
    FROM blog_post bp
    LEFT JOIN blog_category bc ON bp.category_id = bc.id
    LEFT JOIN post_tag pt ON bp.id = pt.post_id
    LEFT JOIN tag t ON pt.tag_id = t.id
";

/// Repository for blog post queries.
pub struct BlogPostRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BlogPostRepository<'a> {
    /// Create a new blog post repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<BlogPost>, RepositoryError> {
        let mut query = QueryBuilder::<Postgres>::new(BLOG_POST_SELECT);
        query.push(" GROUP BY bp.id, bc.name ORDER BY bp.created_at DESC");

        let posts = query
            .build_query_as::<BlogPost>()
            .fetch_all(self.pool)
            .await?;
        Ok(posts)
    }

    /// Get a post by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get(&self, id: BlogPostId) -> Result<Option<BlogPost>, RepositoryError> {
        let mut query = QueryBuilder::<Postgres>::new(BLOG_POST_SELECT);
        query
            .push(" WHERE bp.id = ")
            .push_bind(id)
            .push(" GROUP BY bp.id, bc.name");

        let post = query
            .build_query_as::<BlogPost>()
            .fetch_optional(self.pool)
            .await?;
        Ok(post)
    }
}
