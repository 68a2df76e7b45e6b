use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use app_api::AppContext;
use ledger_app::{AppConfig, AppPaths, AppState, ensure_app_data_dir};

use crate::HttpState;

fn test_router(temp_dir: &tempfile::TempDir) -> axum::Router {
    let paths = AppPaths::new(temp_dir.path().to_path_buf());
    ensure_app_data_dir(&paths).expect("ensure app data dir");
    let app_state = AppState::new(AppConfig::new(paths.db_path));
    app_state.setup_db().expect("setup db");
    crate::router(HttpState::new(AppContext { app_state }))
}

#[tokio::test]
async fn unknown_routes_are_json_not_found() {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let app = test_router(&temp_dir);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    assert!(content_type.contains("application/json"));
}

#[tokio::test]
async fn api_routes_reject_get() {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let app = test_router(&temp_dir);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/usage_all")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
