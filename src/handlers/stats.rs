use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::auth::extract::CurrentUser;
use crate::database::transactions::TransactionQuery;
use crate::error::ApiError;
use crate::services::stats::{summarize, MonthKey, MonthlyStats};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
    pub month: Option<String>,
}

/// Dashboard numbers for one month, computed over the user's full transaction
/// list. Defaults to the current UTC month.
pub async fn stats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<StatsParams>,
) -> Result<Json<MonthlyStats>, ApiError> {
    let month = match params.month.as_deref().filter(|raw| !raw.is_empty()) {
        Some(raw) => MonthKey::parse(raw)
            .ok_or_else(|| ApiError::bad_request("Invalid month, expected YYYY-MM"))?,
        None => MonthKey::current(),
    };

    let transactions = state
        .transactions
        .list(user.id, &TransactionQuery::default())
        .await?;

    Ok(Json(summarize(&transactions, month)))
}
