use anyhow::Result;

use pagetally_core::analytics::InsertOutcome;
use pagetally_core::visit::VisitRecord;

use crate::DuckDbBackend;

impl DuckDbBackend {
    /// Insert one visit, ignoring it if `visit_hash` is already stored.
    ///
    /// A single `INSERT ... ON CONFLICT DO NOTHING` statement: concurrent
    /// writers racing on the same key end with exactly one row and neither
    /// sees an error.
    pub async fn insert_visit(&self, visit: &VisitRecord) -> Result<InsertOutcome> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            r#"INSERT INTO visits (
                visit_hash,
                entry_id, entry_type, entry_name, entry_path,
                browser, device, country, referer,
                visit_date, visitor_id
            ) VALUES (
                ?1,
                ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9,
                CAST(?10 AS DATE), ?11
            )
            ON CONFLICT (visit_hash) DO NOTHING"#,
            duckdb::params![
                visit.visit_hash,
                visit.entry.entry_id(),
                visit.entry.entry_type().as_str(),
                visit.entry.entry_name(),
                visit.entry.entry_path(),
                visit.browser,
                visit.device,
                visit.country,
                visit.referer,
                visit.date.format("%Y-%m-%d").to_string(),
                visit.visitor_id,
            ],
        )?;

        Ok(if changed == 0 {
            InsertOutcome::Duplicate
        } else {
            InsertOutcome::Inserted
        })
    }
}
