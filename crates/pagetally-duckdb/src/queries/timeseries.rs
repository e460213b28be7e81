use anyhow::Result;
use chrono::NaiveDate;

use pagetally_core::analytics::DailyCount;
use pagetally_core::period::DateRange;

use super::range_params;
use crate::DuckDbBackend;

impl DuckDbBackend {
    /// Visits per site-local date, inclusive of both range ends.
    ///
    /// Only dates with at least one visit are returned; the report layer
    /// zero-fills the gaps.
    pub async fn daily_counts(&self, range: &DateRange) -> Result<Vec<DailyCount>> {
        let (start, end) = range_params(range);
        let conn = self.conn.lock().await;

        let mut stmt = conn.prepare(
            r#"
            SELECT
                CAST(visit_date AS VARCHAR) AS day,
                COUNT(*) AS visits
            FROM visits
            WHERE visit_date >= CAST(?1 AS DATE)
              AND visit_date <= CAST(?2 AS DATE)
            GROUP BY visit_date
            ORDER BY visit_date
            "#,
        )?;
        let rows = stmt.query_map(duckdb::params![start, end], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = Vec::new();
        for row in rows {
            let (day, visits) = row?;
            let date = NaiveDate::parse_from_str(&day, "%Y-%m-%d")?;
            counts.push(DailyCount { date, visits });
        }
        Ok(counts)
    }
}
