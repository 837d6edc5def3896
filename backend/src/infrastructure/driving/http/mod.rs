use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::infrastructure::AppState;

pub mod users;

pub use users::user_routes;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(user_routes())
        .route("/health", get(|| async { "OK" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
