use async_trait::async_trait;

use pagetally_core::analytics::{
    BreakdownRow, DailyCount, Dimension, EntryRow, InsertOutcome, VisitStore,
};
use pagetally_core::period::DateRange;
use pagetally_core::visit::VisitRecord;
use pagetally_metadata::{CatalogEntry, ContentCatalog, SettingsStore};

use crate::DuckDbBackend;

#[async_trait]
impl VisitStore for DuckDbBackend {
    async fn insert_visit(&self, visit: &VisitRecord) -> anyhow::Result<InsertOutcome> {
        DuckDbBackend::insert_visit(self, visit).await
    }

    async fn daily_counts(&self, range: &DateRange) -> anyhow::Result<Vec<DailyCount>> {
        DuckDbBackend::daily_counts(self, range).await
    }

    async fn entry_breakdown(&self, range: &DateRange) -> anyhow::Result<Vec<EntryRow>> {
        DuckDbBackend::entry_breakdown(self, range).await
    }

    async fn dimension_breakdown(
        &self,
        dimension: Dimension,
        range: &DateRange,
    ) -> anyhow::Result<Vec<BreakdownRow>> {
        DuckDbBackend::dimension_breakdown(self, dimension, range).await
    }
}

#[async_trait]
impl ContentCatalog for DuckDbBackend {
    async fn find_by_slug(&self, slug: &str) -> anyhow::Result<Option<CatalogEntry>> {
        DuckDbBackend::find_by_slug(self, slug).await
    }
}

#[async_trait]
impl SettingsStore for DuckDbBackend {
    async fn get_setting(&self, key: &str) -> anyhow::Result<Option<String>> {
        DuckDbBackend::get_setting(self, key).await
    }

    async fn set_setting(&self, key: &str, value: &str) -> anyhow::Result<()> {
        DuckDbBackend::set_setting(self, key, value).await
    }
}
