mod errors;
mod handlers;
mod state;

use axum::{Router, routing::post};
use tower_http::trace::TraceLayer;

pub use errors::HttpError;
pub use state::HttpState;

pub fn router(state: HttpState) -> Router<()> {
    let api = Router::new()
        .route("/usage_record", post(handlers::record_usage))
        .route("/usage_user", post(handlers::user_summary))
        .route("/usage_all", post(handlers::all_summaries))
        .route("/usage_cleanup", post(handlers::cleanup))
        .route("/usage_events", post(handlers::events));

    Router::new()
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests;
