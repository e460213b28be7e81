use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Path, Query, Request, State},
    http::{header, HeaderMap},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use pagetally_core::period::local_date;
use pagetally_metadata::site_utc_offset;

use crate::{error::AppError, recorder::Hit, state::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct HitQuery {
    #[serde(rename = "ref")]
    pub referrer: Option<String>,
}

/// `GET /hit`: the site root (home page).
#[tracing::instrument(skip_all)]
pub async fn hit_root(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HitQuery>,
    request: Request,
) -> Result<Json<Value>, AppError> {
    record(&state, "", query, ClientMeta::from_request(&request)).await
}

/// `GET /{slug}/hit`: a post or page.
#[tracing::instrument(skip(state, query, request))]
pub async fn hit_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<HitQuery>,
    request: Request,
) -> Result<Json<Value>, AppError> {
    record(&state, &slug, query, ClientMeta::from_request(&request)).await
}

/// `GET /tags/{tag}/hit`: a tag listing.
#[tracing::instrument(skip(state, query, request))]
pub async fn hit_tag(
    State(state): State<Arc<AppState>>,
    Path(tag): Path<String>,
    Query(query): Query<HitQuery>,
    request: Request,
) -> Result<Json<Value>, AppError> {
    let route = format!("tags/{tag}");
    record(&state, &route, query, ClientMeta::from_request(&request)).await
}

/// Requester details copied out of the request before any await point.
struct ClientMeta {
    address: String,
    user_agent: String,
}

impl ClientMeta {
    fn from_request(request: &Request) -> Self {
        let headers = request.headers();
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());
        Self {
            address: client_ip(headers, peer),
            user_agent: headers
                .get(header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string(),
        }
    }
}

async fn record(
    state: &AppState,
    route: &str,
    query: HitQuery,
    client: ClientMeta,
) -> Result<Json<Value>, AppError> {
    let offset = site_utc_offset(state.settings.as_ref()).await?;
    let today = local_date(Utc::now(), &offset);

    let hit = Hit {
        route,
        referrer: query.referrer.as_deref(),
        address: &client.address,
        user_agent: &client.user_agent,
    };
    let success = state.recorder.record_hit(&hit, today).await?;

    Ok(Json(json!({ "success": success })))
}

/// Client IP: first `X-Forwarded-For` entry, then the TCP peer address,
/// then the placeholder `"unknown"`.
fn client_ip(headers: &HeaderMap, peer: Option<String>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or(peer)
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn forwarded_for_wins_over_peer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(
            client_ip(&headers, Some("127.0.0.1".to_string())),
            "203.0.113.7"
        );
    }

    #[test]
    fn peer_then_placeholder() {
        let headers = HeaderMap::new();
        assert_eq!(client_ip(&headers, Some("127.0.0.1".to_string())), "127.0.0.1");
        assert_eq!(client_ip(&headers, None), "unknown");
    }
}
