use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::User;
use crate::database::StoreError;

/// Read access to the managed identity table. Token introspection resolves
/// subjects through this seam; nothing in the API ever writes to it.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, created_at, last_sign_in_at, email_confirmed_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
