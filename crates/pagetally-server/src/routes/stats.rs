use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use pagetally_core::period::PeriodPreset;
use pagetally_core::report::build_report;
use pagetally_metadata::site_utc_offset;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub period: Option<String>,
}

/// `GET /admin/stats?period=<preset>`: dashboard report.
///
/// Unknown periods fall back to `today`.
#[tracing::instrument(skip(state))]
pub async fn stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Value>, AppError> {
    let preset = PeriodPreset::parse(query.period.as_deref());
    let offset = site_utc_offset(state.settings.as_ref()).await?;
    let report = build_report(state.visits.as_ref(), preset, Utc::now(), offset).await?;
    Ok(Json(json!({ "data": report })))
}
