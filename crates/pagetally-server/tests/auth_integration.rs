use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tower::ServiceExt;

use pagetally_core::config::{AuthMode, Config};
use pagetally_duckdb::DuckDbBackend;
use pagetally_server::app::build_app;
use pagetally_server::state::AppState;

fn basic_config() -> Config {
    Config {
        port: 0,
        data_dir: "/tmp/pagetally-test".to_string(),
        geoip_path: "/nonexistent/GeoLite2-Country.mmdb".to_string(),
        public_url: "http://localhost:3000".to_string(),
        auth_mode: AuthMode::Basic {
            username: "admin".to_string(),
            password: "correct horse".to_string(),
        },
        cors_origins: vec![],
        duckdb_memory_limit: "1GB".to_string(),
    }
}

fn app() -> axum::Router {
    let db = DuckDbBackend::open_in_memory().expect("in-memory DuckDB");
    build_app(Arc::new(AppState::new(db, basic_config())))
}

fn stats_request(authorization: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().uri("/admin/stats");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).expect("build request")
}

fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
}

// ============================================================
// BDD: Missing credentials are challenged
// ============================================================
#[tokio::test]
async fn test_stats_without_credentials_is_401_with_challenge() {
    let response = app().oneshot(stats_request(None)).await.expect("request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok()),
        Some(r#"Basic realm="Restricted Area""#)
    );
}

// ============================================================
// BDD: Wrong password is rejected
// ============================================================
#[tokio::test]
async fn test_stats_with_wrong_password_is_401() {
    let response = app()
        .oneshot(stats_request(Some(basic("admin", "battery staple"))))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================
// BDD: Correct credentials reach the report
// ============================================================
#[tokio::test]
async fn test_stats_with_valid_credentials_is_200() {
    let response = app()
        .oneshot(stats_request(Some(basic("admin", "correct horse"))))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================
// BDD: Hit endpoints stay public
// ============================================================
#[tokio::test]
async fn test_hit_needs_no_credentials() {
    let request = Request::builder()
        .uri("/hit")
        .header("x-forwarded-for", "1.2.3.4")
        .body(Body::empty())
        .expect("build request");
    let response = app().oneshot(request).await.expect("request");
    assert_eq!(response.status(), StatusCode::OK);
}
