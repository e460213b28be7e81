//! Aggregation engine: turns the visit log into a period report.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

use crate::analytics::{BreakdownRow, DailyCount, Dimension, EntryRow, VisitStore};
use crate::period::{local_date, DateRange, PeriodPreset};

/// Label of the single dataset in the chart payload.
pub const CHART_DATASET_LABEL: &str = "Visits";

#[derive(Debug, Clone, Serialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<i64>,
    #[serde(rename = "borderWidth")]
    pub border_width: u32,
}

/// Chart payload in the `{labels, datasets}` shape charting libraries expect.
#[derive(Debug, Clone, Serialize)]
pub struct ChartPayload {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

impl ChartPayload {
    pub fn from_series(series: &[DailyCount]) -> Self {
        Self {
            labels: series
                .iter()
                .map(|p| p.date.format("%Y-%m-%d").to_string())
                .collect(),
            datasets: vec![ChartDataset {
                label: CHART_DATASET_LABEL.to_string(),
                data: series.iter().map(|p| p.visits).collect(),
                border_width: 1,
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub period: PeriodPreset,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub utc_offset: String,
    pub chart: ChartPayload,
    pub entries: Vec<EntryRow>,
    pub referrers: Vec<BreakdownRow>,
    pub countries: Vec<BreakdownRow>,
    pub devices: Vec<BreakdownRow>,
    pub browsers: Vec<BreakdownRow>,
}

/// Zero-fill: one point for every date in `span`, in order, taking counts
/// from `counts` where present.
pub fn fill_series(span: &DateRange, counts: &[DailyCount]) -> Vec<DailyCount> {
    let by_date: HashMap<NaiveDate, i64> = counts.iter().map(|c| (c.date, c.visits)).collect();
    span.days()
        .map(|date| DailyCount {
            date,
            visits: by_date.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// Build the report for `preset`, anchored at the site-local date of `now`.
///
/// The offset is passed in rather than read from settings so the engine stays
/// a pure function of the store contents and its arguments.
pub async fn build_report(
    store: &dyn VisitStore,
    preset: PeriodPreset,
    now: DateTime<Utc>,
    utc_offset: FixedOffset,
) -> anyhow::Result<Report> {
    let today = local_date(now, &utc_offset);
    let range = preset.range(today);
    let span = preset.chart_span(today);

    let daily = store.daily_counts(&span).await?;
    let chart = ChartPayload::from_series(&fill_series(&span, &daily));

    let entries = store.entry_breakdown(&range).await?;
    let referrers = store.dimension_breakdown(Dimension::Referrer, &range).await?;
    let countries = store.dimension_breakdown(Dimension::Country, &range).await?;
    let devices = store.dimension_breakdown(Dimension::Device, &range).await?;
    let browsers = store.dimension_breakdown(Dimension::Browser, &range).await?;

    Ok(Report {
        period: preset,
        start_date: range.start,
        end_date: range.end,
        utc_offset: utc_offset.to_string(),
        chart,
        entries,
        referrers,
        countries,
        devices,
        browsers,
    })
}
