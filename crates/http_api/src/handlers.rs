use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use app_api::{
    AllSummariesRequest, AppContext, CleanupRequest, EventsRequest, RecordUsageRequest,
    UserSummaryRequest,
};

use crate::{errors::HttpError, state::HttpState};

/// Runs a ledger call off the async workers; every ledger call touches SQLite.
async fn blocking<T, F>(state: HttpState, f: F) -> Result<T, HttpError>
where
    T: Send + 'static,
    F: FnOnce(&AppContext) -> T + Send + 'static,
{
    Ok(tokio::task::spawn_blocking(move || f(&state.context)).await?)
}

pub async fn record_usage(
    State(state): State<HttpState>,
    Json(req): Json<RecordUsageRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = blocking(state, move |ctx| app_api::record_usage(ctx, req)).await?;
    Ok(Json(response))
}

pub async fn user_summary(
    State(state): State<HttpState>,
    Json(req): Json<UserSummaryRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = blocking(state, move |ctx| app_api::user_summary(ctx, req)).await?;
    Ok(Json(response))
}

pub async fn all_summaries(
    State(state): State<HttpState>,
    Json(req): Json<AllSummariesRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = blocking(state, move |ctx| app_api::all_summaries(ctx, req)).await?;
    Ok(Json(response))
}

pub async fn cleanup(
    State(state): State<HttpState>,
    Json(req): Json<CleanupRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = blocking(state, move |ctx| app_api::cleanup(ctx, req)).await?;
    Ok(Json(response))
}

pub async fn events(
    State(state): State<HttpState>,
    Json(req): Json<EventsRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = blocking(state, move |ctx| app_api::events(ctx, req)).await??;
    Ok(Json(response))
}

pub async fn not_found() -> HttpError {
    HttpError::new(StatusCode::NOT_FOUND, "not found", Some("not_found".to_string()))
}
