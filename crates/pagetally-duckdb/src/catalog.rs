use anyhow::Result;

use pagetally_core::visit::CatalogKind;
use pagetally_metadata::CatalogEntry;

use crate::DuckDbBackend;

impl DuckDbBackend {
    /// Find a post or page by slug. Posts are searched first, then pages.
    ///
    /// Drafts are included: a hit on an unpublished entry still counts.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<CatalogEntry>> {
        let conn = self.conn.lock().await;
        for (table, kind) in [("posts", CatalogKind::Post), ("pages", CatalogKind::Page)] {
            let sql = format!("SELECT id, title, slug FROM {table} WHERE slug = ?1");
            let mut stmt = conn.prepare(&sql)?;
            match stmt.query_row(duckdb::params![slug], |row| {
                Ok(CatalogEntry {
                    id: row.get(0)?,
                    kind,
                    title: row.get(1)?,
                    slug: row.get(2)?,
                })
            }) {
                Ok(entry) => return Ok(Some(entry)),
                Err(duckdb::Error::QueryReturnedNoRows) => continue,
                Err(e) => return Err(anyhow::anyhow!(e)),
            }
        }
        Ok(None)
    }

    /// Insert a post row. The CRUD subsystem owns these tables; this exists
    /// for tests and local seeding.
    pub async fn seed_post(&self, id: i64, title: &str, slug: &str) -> Result<()> {
        self.seed_entry("posts", id, title, slug).await
    }

    /// Insert a page row. See [`DuckDbBackend::seed_post`].
    pub async fn seed_page(&self, id: i64, title: &str, slug: &str) -> Result<()> {
        self.seed_entry("pages", id, title, slug).await
    }

    /// Delete a post, leaving its visits behind.
    pub async fn delete_post(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM posts WHERE id = ?1", duckdb::params![id])?;
        Ok(())
    }

    async fn seed_entry(&self, table: &str, id: i64, title: &str, slug: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "INSERT INTO {table} (id, title, slug, state, published_at) \
             VALUES (?1, ?2, ?3, 'published', CURRENT_TIMESTAMP)"
        );
        conn.execute(&sql, duckdb::params![id, title, slug])?;
        Ok(())
    }
}
