use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use pagetally_core::analytics::{InsertOutcome, VisitStore};
use pagetally_core::visit::VisitRecord;
use pagetally_core::visitor::{compute_visit_hash, compute_visitor_id, normalize_referrer};
use pagetally_metadata::EntryResolver;

use crate::geo::CountryLookup;
use crate::user_agent;

/// One raw hit as received by the HTTP layer.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    /// Route path relative to the site root, e.g. `hello-world` or `tags/rust`.
    pub route: &'a str,
    pub referrer: Option<&'a str>,
    /// Requester network address; may be the placeholder `unknown`.
    pub address: &'a str,
    pub user_agent: &'a str,
}

/// Turns hits into deduplicated visit rows.
#[derive(Clone)]
pub struct VisitRecorder {
    resolver: EntryResolver,
    store: Arc<dyn VisitStore>,
    geo: Option<Arc<dyn CountryLookup>>,
    site_url: String,
}

impl VisitRecorder {
    pub fn new(
        resolver: EntryResolver,
        store: Arc<dyn VisitStore>,
        geo: Option<Arc<dyn CountryLookup>>,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            store,
            geo,
            site_url: site_url.into(),
        }
    }

    /// Record `hit` under the site-local date `today`.
    ///
    /// Returns `Ok(false)` when the route names nothing measurable and
    /// `Ok(true)` otherwise, including when the visit was already recorded.
    /// Storage errors propagate unchanged.
    pub async fn record_hit(&self, hit: &Hit<'_>, today: NaiveDate) -> anyhow::Result<bool> {
        let Some(resolved) = self.resolver.resolve(hit.route).await? else {
            debug!(route = hit.route, "No entry for route");
            return Ok(false);
        };

        let ua = user_agent::classify(hit.user_agent);
        let country = self.geo.as_ref().and_then(|g| g.country(hit.address));
        let referer = normalize_referrer(hit.referrer, &self.site_url);

        let visit = VisitRecord {
            visit_hash: compute_visit_hash(&resolved.entry, today, hit.address),
            visitor_id: compute_visitor_id(hit.address),
            entry: resolved.entry,
            browser: ua.browser,
            device: ua.device,
            country,
            referer,
            date: today,
        };

        match self.store.insert_visit(&visit).await? {
            InsertOutcome::Inserted => {
                debug!(route = hit.route, title = %resolved.title, date = %today, "Visit recorded");
            }
            InsertOutcome::Duplicate => {
                debug!(route = hit.route, date = %today, "Duplicate visit ignored");
            }
        }
        Ok(true)
    }
}
