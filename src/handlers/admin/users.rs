use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::extract::AdminIdentity;
use crate::database::models::AdminUser;
use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_PER_PAGE: i64 = 50;
const MAX_PER_PAGE: i64 = 200;

#[derive(Debug, Default, Deserialize)]
pub struct UsersParams {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<AdminUser>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

fn parse_page(raw: Option<&str>) -> Result<i64, ApiError> {
    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        return Ok(1);
    };
    let page: i64 = raw
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid page"))?;
    Ok(page.max(1))
}

fn parse_per_page(raw: Option<&str>) -> Result<i64, ApiError> {
    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        return Ok(DEFAULT_PER_PAGE);
    };
    let per_page: i64 = raw
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid per_page"))?;
    Ok(per_page.clamp(1, MAX_PER_PAGE))
}

/// GET /admin/users - paginated listing of the managed identity table.
pub async fn list(
    State(state): State<AppState>,
    AdminIdentity(_admin): AdminIdentity,
    Query(params): Query<UsersParams>,
) -> Result<Json<UsersResponse>, ApiError> {
    let page = parse_page(params.page.as_deref())?;
    let per_page = parse_per_page(params.per_page.as_deref())?;

    let store = super::elevated_store(&state)?;
    let user_page = store.list_users(page, per_page).await?;

    Ok(Json(UsersResponse {
        users: user_page.users,
        total: user_page.total,
        page,
        per_page,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_and_floors() {
        assert_eq!(parse_page(None).unwrap(), 1);
        assert_eq!(parse_page(Some("")).unwrap(), 1);
        assert_eq!(parse_page(Some("7")).unwrap(), 7);
        assert_eq!(parse_page(Some("0")).unwrap(), 1);
        assert_eq!(parse_page(Some("-3")).unwrap(), 1);
        assert!(parse_page(Some("seven")).is_err());
    }

    #[test]
    fn per_page_defaults_and_clamps() {
        assert_eq!(parse_per_page(None).unwrap(), 50);
        assert_eq!(parse_per_page(Some("25")).unwrap(), 25);
        assert_eq!(parse_per_page(Some("500")).unwrap(), 200);
        assert_eq!(parse_per_page(Some("0")).unwrap(), 1);
        assert!(parse_per_page(Some("many")).is_err());
    }
}
