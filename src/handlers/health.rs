use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "duit-api",
        "version": version,
        "description": "Backend API for the duit personal finance tracker",
        "endpoints": {
            "health": "/health (public)",
            "bootstrap": "/api/bootstrap (bearer token)",
            "categories": "/api/categories[/:id] (bearer token)",
            "transactions": "/api/transactions[/:id] (bearer token)",
            "stats": "/api/stats (bearer token)",
            "admin": "/admin/users, /admin/transactions (allow-listed administrators)",
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": err.to_string()
            })),
        ),
    }
}
