//! Route definitions for the search UI.

use axum::routing::{get, post};
use axum::Router;

use super::{handlers, AppState};

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::detail_page))
        .route("/search", get(handlers::search_page))
        .route("/search/tags", post(handlers::tag_form))
        .route("/search/titles", post(handlers::title_form))
        .route("/search/any", post(handlers::any_attr_form))
        .route("/collection/add", post(handlers::collection_form))
        .route("/static/style.css", get(handlers::stylesheet))
        .with_state(state)
}
