use anyhow::Result;

use pagetally_core::analytics::EntryRow;
use pagetally_core::period::DateRange;
use pagetally_core::visit::EntryType;

use super::range_params;
use crate::DuckDbBackend;

impl DuckDbBackend {
    /// Visits per entry, with current titles and slugs joined from the catalog.
    ///
    /// Virtual entries keep the name and path recorded at hit time. Entries
    /// whose catalog row was deleted fall back to `Unknown`.
    pub async fn entry_breakdown(&self, range: &DateRange) -> Result<Vec<EntryRow>> {
        let (start, end) = range_params(range);
        let conn = self.conn.lock().await;

        let mut stmt = conn.prepare(
            r#"
            SELECT title, slug, entry_type, entry_id, total
            FROM (
                SELECT
                    COALESCE(p.title, g.title, v.entry_name, 'Unknown') AS title,
                    COALESCE(p.slug, g.slug, v.entry_path) AS slug,
                    v.entry_type AS entry_type,
                    v.entry_id AS entry_id,
                    COUNT(*) AS total
                FROM visits v
                LEFT JOIN posts p ON v.entry_type = 'post' AND p.id = v.entry_id
                LEFT JOIN pages g ON v.entry_type = 'page' AND g.id = v.entry_id
                WHERE v.visit_date >= CAST(?1 AS DATE)
                  AND v.visit_date <= CAST(?2 AS DATE)
                GROUP BY
                    v.entry_type, v.entry_id, v.entry_name, v.entry_path,
                    p.title, p.slug, g.title, g.slug
            )
            ORDER BY total DESC, title ASC, slug ASC NULLS LAST
            "#,
        )?;
        let rows = stmt.query_map(duckdb::params![start, end], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<i64>>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (title, slug, entry_type, entry_id, count) = row?;
            entries.push(EntryRow {
                title,
                slug,
                entry_type: EntryType::parse(&entry_type)?,
                entry_id,
                count,
            });
        }
        Ok(entries)
    }
}
