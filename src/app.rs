use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/metrics", get(handlers::get_metrics))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/selection", post(handlers::update_selection))
        .route("/api/entries", get(handlers::list_entries).post(handlers::log_entry))
        .route("/api/entries/latest", get(handlers::latest_entry))
        .route("/api/channel", get(handlers::get_channel).post(handlers::connect_channel))
        .route("/api/load", post(handlers::load))
        .route("/api/upload", post(handlers::upload))
        .route("/api/save", post(handlers::save))
        .with_state(state)
}
