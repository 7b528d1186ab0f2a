use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extract::AdminIdentity;
use crate::database::admin::{AdminTransaction, AdminTransactionQuery};
use crate::database::models::FlowType;
use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

#[derive(Debug, Default, Deserialize)]
pub struct TransactionsParams {
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<AdminTransaction>,
    pub count: i64,
    pub limit: i64,
    pub offset: i64,
}

fn parse_limit(raw: Option<&str>) -> Result<i64, ApiError> {
    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        return Ok(DEFAULT_LIMIT);
    };
    let limit: i64 = raw
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid limit"))?;
    Ok(limit.clamp(0, MAX_LIMIT))
}

fn parse_offset(raw: Option<&str>) -> Result<i64, ApiError> {
    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        return Ok(0);
    };
    let offset: i64 = raw
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid offset"))?;
    Ok(offset.max(0))
}

fn parse_params(params: &TransactionsParams) -> Result<AdminTransactionQuery, ApiError> {
    let user_id = params
        .user_id
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            raw.parse::<Uuid>()
                .map_err(|_| ApiError::bad_request("Invalid user_id"))
        })
        .transpose()?;

    let kind = params
        .kind
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            raw.parse::<FlowType>()
                .map_err(|_| ApiError::bad_request("Invalid type, expected income or expense"))
        })
        .transpose()?;

    let from = params
        .from
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ApiError::bad_request("Invalid from date"))
        })
        .transpose()?;

    let to = params
        .to
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ApiError::bad_request("Invalid to date"))
        })
        .transpose()?;

    Ok(AdminTransactionQuery {
        user_id,
        kind,
        from,
        to,
        limit: parse_limit(params.limit.as_deref())?,
        offset: parse_offset(params.offset.as_deref())?,
    })
}

/// GET /admin/transactions - cross-user listing with optional filters, newest
/// transaction date first, joined with the category name and type.
pub async fn list(
    State(state): State<AppState>,
    AdminIdentity(_admin): AdminIdentity,
    Query(params): Query<TransactionsParams>,
) -> Result<Json<TransactionsResponse>, ApiError> {
    let query = parse_params(&params)?;

    let store = super::elevated_store(&state)?;
    let page = store.list_transactions(&query).await?;

    Ok(Json(TransactionsResponse {
        transactions: page.transactions,
        count: page.count,
        limit: query.limit,
        offset: query.offset,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(parse_limit(None).unwrap(), 50);
        assert_eq!(parse_limit(Some("10")).unwrap(), 10);
        assert_eq!(parse_limit(Some("1000")).unwrap(), 200);
        assert_eq!(parse_limit(Some("-5")).unwrap(), 0);
        assert!(parse_limit(Some("lots")).is_err());
    }

    #[test]
    fn offset_defaults_and_floors() {
        assert_eq!(parse_offset(None).unwrap(), 0);
        assert_eq!(parse_offset(Some("30")).unwrap(), 30);
        assert_eq!(parse_offset(Some("-1")).unwrap(), 0);
        assert!(parse_offset(Some("x")).is_err());
    }

    #[test]
    fn parses_filters() {
        let params = TransactionsParams {
            user_id: Some(Uuid::nil().to_string()),
            kind: Some("income".to_string()),
            from: Some("2024-01-01".to_string()),
            to: Some("2024-12-31".to_string()),
            limit: Some("100".to_string()),
            offset: Some("20".to_string()),
        };
        let query = parse_params(&params).unwrap();
        assert_eq!(query.user_id, Some(Uuid::nil()));
        assert_eq!(query.kind, Some(FlowType::Income));
        assert_eq!(query.limit, 100);
        assert_eq!(query.offset, 20);
    }

    #[test]
    fn rejects_malformed_filters() {
        let params = TransactionsParams {
            user_id: Some("not-a-uuid".to_string()),
            ..Default::default()
        };
        assert!(parse_params(&params).is_err());

        let params = TransactionsParams {
            kind: Some("transfer".to_string()),
            ..Default::default()
        };
        assert!(parse_params(&params).is_err());
    }
}
