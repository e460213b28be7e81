use std::sync::Arc;

use tracing::{info, warn};

use pagetally_core::{analytics::VisitStore, config::Config};
use pagetally_duckdb::DuckDbBackend;
use pagetally_metadata::{ContentCatalog, EntryResolver, SettingsStore};

use crate::geo::{CountryLookup, MaxMindCountry};
use crate::recorder::VisitRecorder;

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
///
/// The DuckDB backend is held once and exposed again through the trait
/// objects the pipeline is written against.
pub struct AppState {
    /// Internally uses `Arc<tokio::sync::Mutex<Connection>>`.
    pub db: Arc<DuckDbBackend>,

    /// Parsed configuration, loaded once at startup from environment variables.
    pub config: Arc<Config>,

    pub visits: Arc<dyn VisitStore>,
    pub settings: Arc<dyn SettingsStore>,
    pub recorder: VisitRecorder,
}

impl AppState {
    /// Construct state, opening the GeoIP database named in `config` if it
    /// exists. A missing or unreadable file leaves countries unset.
    pub fn new(db: DuckDbBackend, config: Config) -> Self {
        let geo = open_geoip(&config.geoip_path);
        Self::with_geo(db, config, geo)
    }

    /// Construct state with an explicit country lookup (or none).
    pub fn with_geo(
        db: DuckDbBackend,
        config: Config,
        geo: Option<Arc<dyn CountryLookup>>,
    ) -> Self {
        let db = Arc::new(db);
        let visits: Arc<dyn VisitStore> = db.clone();
        let settings: Arc<dyn SettingsStore> = db.clone();
        let catalog: Arc<dyn ContentCatalog> = db.clone();

        let recorder = VisitRecorder::new(
            EntryResolver::new(catalog),
            Arc::clone(&visits),
            geo,
            config.public_url.clone(),
        );

        Self {
            db,
            config: Arc::new(config),
            visits,
            settings,
            recorder,
        }
    }
}

fn open_geoip(path: &str) -> Option<Arc<dyn CountryLookup>> {
    if !std::path::Path::new(path).exists() {
        warn!(
            geoip_path = %path,
            "GeoIP database not found. Visits stored with NULL country. \
             Download GeoLite2-Country.mmdb and set PAGETALLY_GEOIP_PATH."
        );
        return None;
    }
    match MaxMindCountry::open(path) {
        Ok(reader) => {
            info!(geoip_path = %path, "GeoIP database loaded");
            Some(Arc::new(reader))
        }
        Err(e) => {
            warn!(geoip_path = %path, error = %e, "Failed to open GeoIP database");
            None
        }
    }
}
