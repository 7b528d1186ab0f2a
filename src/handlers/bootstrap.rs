use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::auth::extract::CurrentUser;
use crate::database::models::{Category, TransactionRecord};
use crate::database::transactions::TransactionQuery;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BootstrapResponse {
    pub categories: Vec<Category>,
    pub transactions: Vec<TransactionRecord>,
}

/// Session bootstrap: seed the default categories (best-effort, a failure
/// never blocks the response), then fetch the user's categories and
/// transactions concurrently.
pub async fn bootstrap(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<BootstrapResponse>, ApiError> {
    state.seeder.ensure_defaults(user.id).await;

    let query = TransactionQuery::default();
    let (categories, transactions) = tokio::join!(
        state.categories.list(user.id),
        state.transactions.list(user.id, &query),
    );

    Ok(Json(BootstrapResponse {
        categories: categories?,
        transactions: transactions?,
    }))
}
