//! Visit storage abstraction.

use chrono::NaiveDate;
use serde::Serialize;

use crate::period::DateRange;
use crate::visit::{EntryType, VisitRecord};

/// Result of an idempotent visit insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A row with the same `visit_hash` already existed; nothing was written.
    Duplicate,
}

/// How a breakdown counts visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counting {
    /// Every stored row.
    Rows,
    /// Distinct `visitor_id` values.
    DistinctVisitors,
}

/// A dimension a breakdown groups by.
///
/// Each variant fixes the grouped column, the counting mode, and the label used
/// when the column is NULL. Backends build their queries from these fragments
/// only; no caller-supplied text reaches the SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Referrer,
    Country,
    Device,
    Browser,
}

impl Dimension {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Referrer => "referer",
            Self::Country => "country",
            Self::Device => "device",
            Self::Browser => "browser",
        }
    }

    /// Referrers are counted per row so that repeat visits from different
    /// sources all show up; audience dimensions count each visitor once.
    pub fn counting(&self) -> Counting {
        match self {
            Self::Referrer => Counting::Rows,
            Self::Country | Self::Device | Self::Browser => Counting::DistinctVisitors,
        }
    }

    pub fn fallback_label(&self) -> &'static str {
        match self {
            Self::Referrer => "Direct",
            Self::Country | Self::Device | Self::Browser => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub visits: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownRow {
    pub title: String,
    pub count: i64,
}

/// Visits per entry, with the entry's current title and slug from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRow {
    pub title: String,
    pub slug: Option<String>,
    pub entry_type: EntryType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<i64>,
    pub count: i64,
}

/// Append-only visit log.
///
/// Breakdown methods return rows ordered by count descending, ties broken by
/// title ascending.
#[async_trait::async_trait]
pub trait VisitStore: Send + Sync + 'static {
    /// Insert `visit` unless a row with the same `visit_hash` exists.
    ///
    /// Must be a single atomic insert-or-ignore; a duplicate is not an error.
    async fn insert_visit(&self, visit: &VisitRecord) -> anyhow::Result<InsertOutcome>;

    /// Row counts per date within `range`. Dates without visits are omitted.
    async fn daily_counts(&self, range: &DateRange) -> anyhow::Result<Vec<DailyCount>>;

    async fn entry_breakdown(&self, range: &DateRange) -> anyhow::Result<Vec<EntryRow>>;

    async fn dimension_breakdown(
        &self,
        dimension: Dimension,
        range: &DateRange,
    ) -> anyhow::Result<Vec<BreakdownRow>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_referrer_counts_rows() {
        for dimension in [
            Dimension::Referrer,
            Dimension::Country,
            Dimension::Device,
            Dimension::Browser,
        ] {
            let expected = if dimension == Dimension::Referrer {
                Counting::Rows
            } else {
                Counting::DistinctVisitors
            };
            assert_eq!(dimension.counting(), expected, "{}", dimension.column());
        }
    }

    #[test]
    fn fallback_labels() {
        assert_eq!(Dimension::Referrer.fallback_label(), "Direct");
        assert_eq!(Dimension::Country.fallback_label(), "Unknown");
        assert_eq!(Dimension::Device.fallback_label(), "Unknown");
        assert_eq!(Dimension::Browser.fallback_label(), "Unknown");
    }
}
