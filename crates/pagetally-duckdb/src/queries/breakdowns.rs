use anyhow::Result;

use pagetally_core::analytics::{BreakdownRow, Counting, Dimension};
use pagetally_core::period::DateRange;

use super::range_params;
use crate::DuckDbBackend;

/// Build the grouped query for one dimension.
///
/// Column name, aggregate and fallback label all come from the closed
/// [`Dimension`] enum, never from request input.
fn breakdown_sql(dimension: Dimension) -> String {
    let column = dimension.column();
    let aggregate = match dimension.counting() {
        Counting::Rows => "COUNT(*)",
        Counting::DistinctVisitors => "COUNT(DISTINCT visitor_id)",
    };
    let fallback = dimension.fallback_label();

    format!(
        r#"
        SELECT
            COALESCE({column}, '{fallback}') AS title,
            {aggregate} AS total
        FROM visits
        WHERE visit_date >= CAST(?1 AS DATE)
          AND visit_date <= CAST(?2 AS DATE)
        GROUP BY title
        ORDER BY total DESC, title ASC
        "#
    )
}

impl DuckDbBackend {
    pub async fn dimension_breakdown(
        &self,
        dimension: Dimension,
        range: &DateRange,
    ) -> Result<Vec<BreakdownRow>> {
        let (start, end) = range_params(range);
        let sql = breakdown_sql(dimension);
        let conn = self.conn.lock().await;

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(duckdb::params![start, end], |row| {
            Ok(BreakdownRow {
                title: row.get(0)?,
                count: row.get(1)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
