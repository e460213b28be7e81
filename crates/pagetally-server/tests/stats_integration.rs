use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, NaiveDate, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use pagetally_core::config::{AuthMode, Config};
use pagetally_core::visit::{EntryRef, VisitRecord};
use pagetally_core::visitor::{compute_visit_hash, compute_visitor_id};
use pagetally_duckdb::DuckDbBackend;
use pagetally_metadata::UTC_OFFSET_SETTING;
use pagetally_server::app::build_app;
use pagetally_server::state::AppState;

fn test_config() -> Config {
    Config {
        port: 0,
        data_dir: "/tmp/pagetally-test".to_string(),
        geoip_path: "/nonexistent/GeoLite2-Country.mmdb".to_string(),
        public_url: "https://blog.example.org".to_string(),
        auth_mode: AuthMode::None,
        cors_origins: vec![],
        duckdb_memory_limit: "1GB".to_string(),
    }
}

async fn setup() -> (Arc<AppState>, axum::Router) {
    let db = DuckDbBackend::open_in_memory().expect("in-memory DuckDB");
    db.seed_post(42, "Hello World!", "hello-world").await.expect("seed post");
    let state = Arc::new(AppState::with_geo(db, test_config(), None));
    let app = build_app(Arc::clone(&state));
    (state, app)
}

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .header("x-forwarded-for", "1.2.3.4")
        .body(Body::empty())
        .expect("build request");
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    (status, serde_json::from_slice(&bytes).expect("parse JSON"))
}

async fn insert_on(state: &AppState, date: NaiveDate, ip: &str) {
    let entry = EntryRef::post(42);
    let visit = VisitRecord {
        visit_hash: compute_visit_hash(&entry, date, ip),
        visitor_id: compute_visitor_id(ip),
        entry,
        browser: "Firefox".to_string(),
        device: "Linux".to_string(),
        country: None,
        referer: Some("https://x.example/".to_string()),
        date,
    };
    state.visits.insert_visit(&visit).await.expect("insert visit");
}

// ============================================================
// BDD: A recorded hit shows up in today's report
// ============================================================
#[tokio::test]
async fn test_today_report_after_hits() {
    let (_state, app) = setup().await;
    get_json(&app, "/hello-world/hit").await;
    get_json(&app, "/hello-world/hit").await;

    let (status, json) = get_json(&app, "/admin/stats").await;
    assert_eq!(status, StatusCode::OK);

    let data = &json["data"];
    assert_eq!(data["period"], "today");
    assert_eq!(data["utc_offset"], "+00:00");

    let entries = data["entries"].as_array().expect("entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["title"], "Hello World!");
    assert_eq!(entries[0]["slug"], "hello-world");
    assert_eq!(entries[0]["entry_type"], "post");
    assert_eq!(entries[0]["entry_id"], 42);
    assert_eq!(entries[0]["count"], 1);

    assert_eq!(data["referrers"][0]["title"], "Direct");
    assert_eq!(data["countries"][0]["title"], "Unknown");
    assert_eq!(data["devices"][0]["count"], 1);

    // Today's chart shows the three days before today as well.
    let labels = data["chart"]["labels"].as_array().expect("labels");
    assert_eq!(labels.len(), 4);
    let dataset = &data["chart"]["datasets"][0];
    assert_eq!(dataset["label"], "Visits");
    assert_eq!(dataset["borderWidth"], 1);
    assert_eq!(dataset["data"][3], 1);
}

// ============================================================
// BDD: Unknown period values fall back to today
// ============================================================
#[tokio::test]
async fn test_unknown_period_falls_back_to_today() {
    let (_state, app) = setup().await;
    let (status, json) = get_json(&app, "/admin/stats?period=last_century").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["period"], "today");
    assert_eq!(json["data"]["start_date"], json["data"]["end_date"]);
}

// ============================================================
// BDD: Seven-day chart is zero-filled between data points
// ============================================================
#[tokio::test]
async fn test_seven_day_chart_is_gap_filled() {
    let (state, app) = setup().await;
    let today = Utc::now().date_naive();
    let first = today - Duration::days(6);
    insert_on(&state, first, "1.2.3.4").await;
    insert_on(&state, today, "1.2.3.4").await;
    insert_on(&state, today, "5.6.7.8").await;

    let (status, json) = get_json(&app, "/admin/stats?period=last_seven_days").await;
    assert_eq!(status, StatusCode::OK);

    let data = &json["data"];
    assert_eq!(data["start_date"], first.format("%Y-%m-%d").to_string());
    assert_eq!(data["end_date"], today.format("%Y-%m-%d").to_string());

    let points: Vec<i64> = data["chart"]["datasets"][0]["data"]
        .as_array()
        .expect("data")
        .iter()
        .map(|v| v.as_i64().expect("count"))
        .collect();
    assert_eq!(points, vec![1, 0, 0, 0, 0, 0, 2]);

    // Referrers count rows, browsers count visitors.
    assert_eq!(data["referrers"][0]["count"], 3);
    assert_eq!(data["browsers"][0]["count"], 2);
}

// ============================================================
// BDD: Configured UTC offset is echoed in the report
// ============================================================
#[tokio::test]
async fn test_report_uses_site_offset() {
    let (state, app) = setup().await;
    state
        .settings
        .set_setting(UTC_OFFSET_SETTING, "+07:00")
        .await
        .expect("set offset");

    let (_, json) = get_json(&app, "/admin/stats?period=last_thirty_days").await;
    assert_eq!(json["data"]["utc_offset"], "+07:00");
    assert_eq!(json["data"]["chart"]["labels"].as_array().map(Vec::len), Some(30));
}

// ============================================================
// BDD: Storage failure surfaces as a 500 with the error envelope
// ============================================================
#[tokio::test]
async fn test_stats_storage_failure_is_internal_error() {
    let (state, app) = setup().await;
    {
        let conn = state.db.conn_for_test().await;
        conn.execute_batch("DROP TABLE visits").expect("drop visits");
    }

    let (status, json) = get_json(&app, "/admin/stats?period=last_seven_days").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "internal_error");
    assert!(json["error"]["field"].is_null());
}
