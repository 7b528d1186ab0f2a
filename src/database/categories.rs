use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::database::models::{Category, FlowType, NewCategory};
use crate::database::{map_write_error, StoreError};

/// Creates and retrieves transaction categories. Every operation is scoped to
/// the owning user; there is no path through this trait to another user's
/// rows.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// All categories for a user, ordered by name.
    async fn list(&self, user_id: Uuid) -> Result<Vec<Category>, StoreError>;

    /// The `(name, type)` pairs a user already has. Names are returned as
    /// stored; callers lowercase for comparison.
    async fn keys(&self, user_id: Uuid) -> Result<Vec<(String, FlowType)>, StoreError>;

    /// A single category, if it exists and belongs to the user.
    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<Category>, StoreError>;

    /// Create a category for the user.
    async fn create(&self, user_id: Uuid, new: NewCategory) -> Result<Category, StoreError>;

    /// Batch-insert categories in a single statement, silently skipping any
    /// that already exist under the per-user uniqueness constraint.
    async fn insert_missing(
        &self,
        user_id: Uuid,
        categories: &[NewCategory],
    ) -> Result<(), StoreError>;

    /// Delete the user's category. Transactions referencing it are orphaned,
    /// not removed.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), StoreError>;
}

pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn list(&self, user_id: Uuid) -> Result<Vec<Category>, StoreError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, user_id, name, type, color, icon, created_at \
             FROM categories WHERE user_id = $1 ORDER BY name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn keys(&self, user_id: Uuid) -> Result<Vec<(String, FlowType)>, StoreError> {
        let keys = sqlx::query_as::<_, (String, FlowType)>(
            "SELECT name, type FROM categories WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(keys)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<Category>, StoreError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, user_id, name, type, color, icon, created_at \
             FROM categories WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn create(&self, user_id: Uuid, new: NewCategory) -> Result<Category, StoreError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (user_id, name, type, color, icon) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, user_id, name, type, color, icon, created_at",
        )
        .bind(user_id)
        .bind(&new.name)
        .bind(new.kind)
        .bind(&new.color)
        .bind(&new.icon)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(category)
    }

    async fn insert_missing(
        &self,
        user_id: Uuid,
        categories: &[NewCategory],
    ) -> Result<(), StoreError> {
        if categories.is_empty() {
            return Ok(());
        }

        let mut builder =
            QueryBuilder::new("INSERT INTO categories (user_id, name, type, color, icon) ");
        builder.push_values(categories, |mut row, category| {
            row.push_bind(user_id)
                .push_bind(&category.name)
                .push_bind(category.kind)
                .push_bind(&category.color)
                .push_bind(&category.icon);
        });
        builder.push(" ON CONFLICT DO NOTHING");

        builder.build().execute(&self.pool).await?;
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
