use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extract::CurrentUser;
use crate::database::models::{FlowType, NewTransaction, TransactionRecord};
use crate::database::transactions::TransactionQuery;
use crate::database::StoreError;
use crate::error::ApiError;
use crate::state::AppState;

/// Raw listing filters. Everything arrives as strings so that a bad value
/// produces a JSON 400 instead of a framework rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category_id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub search: Option<String>,
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::bad_request(format!("Invalid {field} date")))
}

fn parse_list_params(params: ListParams) -> Result<TransactionQuery, ApiError> {
    let kind = params
        .kind
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            raw.parse::<FlowType>()
                .map_err(|_| ApiError::bad_request("Invalid type filter"))
        })
        .transpose()?;

    let category_id = params
        .category_id
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            raw.parse::<Uuid>()
                .map_err(|_| ApiError::bad_request("Invalid category_id filter"))
        })
        .transpose()?;

    let from = params
        .from
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .map(|raw| parse_date(raw, "from"))
        .transpose()?;

    let to = params
        .to
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .map(|raw| parse_date(raw, "to"))
        .transpose()?;

    let search = params
        .search
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty());

    Ok(TransactionQuery {
        kind,
        category_id,
        from,
        to,
        search,
    })
}

/// Creation and replacement share the same validation: a non-negative amount
/// and a category that exists and belongs to the caller.
async fn validate(
    state: &AppState,
    user_id: Uuid,
    payload: &NewTransaction,
) -> Result<(), ApiError> {
    if payload.amount.is_sign_negative() {
        return Err(ApiError::bad_request("Amount must not be negative"));
    }

    let Some(category_id) = payload.category_id else {
        return Err(ApiError::bad_request("Category is required"));
    };
    if state.categories.get(user_id, category_id).await?.is_none() {
        return Err(ApiError::bad_request("Unknown category"));
    }

    Ok(())
}

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<TransactionRecord>>, ApiError> {
    let query = parse_list_params(params)?;
    Ok(Json(state.transactions.list(user.id, &query).await?))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<NewTransaction>,
) -> Result<(StatusCode, Json<TransactionRecord>), ApiError> {
    validate(&state, user.id, &payload).await?;
    let record = state.transactions.create(user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewTransaction>,
) -> Result<Json<TransactionRecord>, ApiError> {
    validate(&state, user.id, &payload).await?;
    let record = state
        .transactions
        .update(user.id, id, payload)
        .await
        .map_err(|err| match err {
            StoreError::NotFound => ApiError::not_found("Transaction not found"),
            other => other.into(),
        })?;
    Ok(Json(record))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .transactions
        .delete(user.id, id)
        .await
        .map_err(|err| match err {
            StoreError::NotFound => ApiError::not_found("Transaction not found"),
            other => other.into(),
        })?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_filter_set() {
        let query = parse_list_params(ListParams {
            kind: Some("expense".to_string()),
            category_id: Some(Uuid::nil().to_string()),
            from: Some("2024-01-01".to_string()),
            to: Some("2024-01-31".to_string()),
            search: Some("  kopi  ".to_string()),
        })
        .unwrap();

        assert_eq!(query.kind, Some(FlowType::Expense));
        assert_eq!(query.category_id, Some(Uuid::nil()));
        assert_eq!(query.from, Some("2024-01-01".parse().unwrap()));
        assert_eq!(query.to, Some("2024-01-31".parse().unwrap()));
        assert_eq!(query.search.as_deref(), Some("kopi"));
    }

    #[test]
    fn empty_strings_behave_like_absent_filters() {
        let query = parse_list_params(ListParams {
            kind: Some(String::new()),
            search: Some("   ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(query.kind, None);
        assert_eq!(query.search, None);
    }

    #[test]
    fn rejects_malformed_filters() {
        assert!(parse_list_params(ListParams {
            kind: Some("transfer".to_string()),
            ..Default::default()
        })
        .is_err());

        assert!(parse_list_params(ListParams {
            from: Some("January 1".to_string()),
            ..Default::default()
        })
        .is_err());

        assert!(parse_list_params(ListParams {
            category_id: Some("not-a-uuid".to_string()),
            ..Default::default()
        })
        .is_err());
    }
}
