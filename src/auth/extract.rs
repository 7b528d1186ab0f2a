use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::auth::bearer_token;
use crate::error::ApiError;
use crate::services::identity::Identity;
use crate::state::AppState;

/// The authenticated caller, resolved from the bearer token. Running as an
/// extractor (rather than middleware) keeps the method-not-allowed check
/// ahead of any token work.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(ApiError::unauthorized)?;
        let identity = state.introspector.resolve(&token).await?;
        Ok(CurrentUser(identity))
    }
}

/// An authenticated caller that also passed the administrator allow-list.
/// The allow-list is the sole access control on the admin endpoints; there is
/// deliberately no per-row ownership check behind it.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AdminIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(identity) = CurrentUser::from_request_parts(parts, state).await?;
        if !state.admin_emails.contains(&identity.email) {
            return Err(ApiError::forbidden());
        }
        Ok(AdminIdentity(identity))
    }
}
