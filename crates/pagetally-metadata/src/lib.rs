use async_trait::async_trait;
use chrono::FixedOffset;

use pagetally_core::period::utc_offset_or_default;
use pagetally_core::visit::CatalogKind;

pub mod resolver;

pub use resolver::{EntryResolver, ResolvedEntry, Route};

/// Settings key holding the site's UTC offset, e.g. `+07:00`.
pub const UTC_OFFSET_SETTING: &str = "site.utc_offset";

/// A post or page as seen by the analytics pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: i64,
    pub kind: CatalogKind,
    pub title: String,
    pub slug: String,
}

/// Read side of the content catalog owned by the CRUD subsystem.
#[async_trait]
pub trait ContentCatalog: Send + Sync + 'static {
    /// Look up a slug, searching posts before pages.
    async fn find_by_slug(&self, slug: &str) -> anyhow::Result<Option<CatalogEntry>>;
}

/// Key/value site settings owned by the CRUD subsystem.
#[async_trait]
pub trait SettingsStore: Send + Sync + 'static {
    async fn get_setting(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set_setting(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// The site's configured UTC offset. Missing or unparsable values are UTC.
pub async fn site_utc_offset(settings: &dyn SettingsStore) -> anyhow::Result<FixedOffset> {
    let raw = settings.get_setting(UTC_OFFSET_SETTING).await?;
    if let Some(value) = raw.as_deref() {
        if pagetally_core::period::parse_utc_offset(value).is_err() {
            tracing::warn!(value, "Unparsable {UTC_OFFSET_SETTING}; using UTC");
        }
    }
    Ok(utc_offset_or_default(raw.as_deref()))
}
