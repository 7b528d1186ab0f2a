use std::sync::Arc;

use uuid::Uuid;

use crate::auth::decode_token;
use crate::database::users::UserStore;
use crate::error::ApiError;

/// The resolved caller: a row in the managed identity table with a usable
/// email address.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
}

/// Resolves bearer tokens to identities using the low-privilege credential:
/// signature and expiry verification, then a user-row lookup. Every failure
/// mode collapses to `Unauthorized`; callers learn nothing about which step
/// rejected the token.
pub struct TokenIntrospector {
    secret: String,
    users: Arc<dyn UserStore>,
}

impl TokenIntrospector {
    pub fn new(secret: impl Into<String>, users: Arc<dyn UserStore>) -> Self {
        Self {
            secret: secret.into(),
            users,
        }
    }

    pub async fn resolve(&self, token: &str) -> Result<Identity, ApiError> {
        let claims = decode_token(token, &self.secret).map_err(|err| {
            tracing::debug!("token rejected: {}", err);
            ApiError::unauthorized()
        })?;

        let user = self
            .users
            .find(claims.sub)
            .await
            .map_err(|_| ApiError::unauthorized())?
            .ok_or_else(ApiError::unauthorized)?;

        let email = user
            .email
            .filter(|email| !email.trim().is_empty())
            .ok_or_else(ApiError::unauthorized)?;

        Ok(Identity { id: user.id, email })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{generate_token, Claims};
    use crate::testing::MemoryStore;

    const SECRET: &str = "introspection-secret";

    fn introspector(store: &Arc<MemoryStore>) -> TokenIntrospector {
        TokenIntrospector::new(SECRET, Arc::clone(store) as Arc<dyn UserStore>)
    }

    fn token_for(user_id: Uuid, secret: &str) -> String {
        generate_token(&Claims::new(user_id, None, 1), secret).unwrap()
    }

    #[tokio::test]
    async fn resolves_known_user() {
        let store = Arc::new(MemoryStore::new());
        let user_id = store.add_user(Some("a@example.com"), true);

        let identity = introspector(&store)
            .resolve(&token_for(user_id, SECRET))
            .await
            .unwrap();
        assert_eq!(identity.id, user_id);
        assert_eq!(identity.email, "a@example.com");
    }

    #[tokio::test]
    async fn rejects_bad_signature() {
        let store = Arc::new(MemoryStore::new());
        let user_id = store.add_user(Some("a@example.com"), true);

        let result = introspector(&store)
            .resolve(&token_for(user_id, "wrong-secret"))
            .await;
        assert_eq!(result.unwrap_err(), ApiError::unauthorized());
    }

    #[tokio::test]
    async fn rejects_unknown_subject() {
        let store = Arc::new(MemoryStore::new());

        let result = introspector(&store)
            .resolve(&token_for(Uuid::new_v4(), SECRET))
            .await;
        assert_eq!(result.unwrap_err(), ApiError::unauthorized());
    }

    #[tokio::test]
    async fn rejects_user_without_email() {
        let store = Arc::new(MemoryStore::new());
        let user_id = store.add_user(None, false);

        let result = introspector(&store)
            .resolve(&token_for(user_id, SECRET))
            .await;
        assert_eq!(result.unwrap_err(), ApiError::unauthorized());
    }
}
