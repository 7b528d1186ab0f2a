use axum::routing::{delete, get, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health))
        .merge(api_routes())
        .merge(admin_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    use handlers::{bootstrap, categories, stats, transactions};

    Router::new()
        .route("/api/bootstrap", get(bootstrap::bootstrap))
        .route(
            "/api/categories",
            get(categories::list).post(categories::create),
        )
        .route("/api/categories/:id", delete(categories::remove))
        .route(
            "/api/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/api/transactions/:id",
            put(transactions::update).delete(transactions::remove),
        )
        .route("/api/stats", get(stats::stats))
}

fn admin_routes() -> Router<AppState> {
    use handlers::admin;

    // Read-only surface. Explicit OPTIONS keeps bare preflights out of the
    // 405 fallback; every other method gets the JSON 405 before any token
    // work happens.
    Router::new()
        .route(
            "/admin/users",
            get(admin::users::list)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/admin/transactions",
            get(admin::transactions::list)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
}
