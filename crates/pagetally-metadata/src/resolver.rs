//! Route → entry resolution for the hit endpoint.

use std::sync::Arc;

use pagetally_core::visit::EntryRef;

use crate::ContentCatalog;

/// Slug of the page served at the site root.
pub const HOME_SLUG: &str = "home";

/// What a hit route refers to, before any catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route<'a> {
    /// A post or page slug.
    Slug(&'a str),
    /// The blog index.
    Blog,
    /// A tag listing.
    Tag(&'a str),
    /// Nothing that is measured.
    Unroutable,
}

impl<'a> Route<'a> {
    /// Classify a route path. Leading and trailing slashes are ignored; the
    /// site root maps to the home page.
    pub fn classify(route: &'a str) -> Self {
        let route = route.trim_matches('/');
        if route.is_empty() {
            return Route::Slug(HOME_SLUG);
        }
        if route == "blog" {
            return Route::Blog;
        }
        if let Some(tag) = route.strip_prefix("tags/") {
            return if tag.is_empty() || tag.contains('/') {
                Route::Unroutable
            } else {
                Route::Tag(tag)
            };
        }
        if route.contains('/') {
            return Route::Unroutable;
        }
        Route::Slug(route)
    }
}

/// An entry a hit can be recorded against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub entry: EntryRef,
    pub title: String,
    /// Slug for catalog entries, route path for virtual ones.
    pub path: String,
}

/// Maps hit routes onto catalog entries or virtual entries.
#[derive(Clone)]
pub struct EntryResolver {
    catalog: Arc<dyn ContentCatalog>,
}

impl EntryResolver {
    pub fn new(catalog: Arc<dyn ContentCatalog>) -> Self {
        Self { catalog }
    }

    /// Resolve `route`. `Ok(None)` means there is nothing to record.
    pub async fn resolve(&self, route: &str) -> anyhow::Result<Option<ResolvedEntry>> {
        match Route::classify(route) {
            Route::Blog => Ok(Some(ResolvedEntry {
                entry: EntryRef::virtual_entry("Blog", "blog"),
                title: "Blog".to_string(),
                path: "blog".to_string(),
            })),
            Route::Tag(tag) => {
                let title = format!("Tag: {tag}");
                let path = format!("tags/{tag}");
                Ok(Some(ResolvedEntry {
                    entry: EntryRef::virtual_entry(title.clone(), path.clone()),
                    title,
                    path,
                }))
            }
            Route::Slug(slug) => {
                let found = self.catalog.find_by_slug(slug).await?;
                Ok(found.map(|c| ResolvedEntry {
                    entry: EntryRef::Catalog {
                        id: c.id,
                        entry_type: c.kind,
                    },
                    title: c.title,
                    path: c.slug,
                }))
            }
            Route::Unroutable => Ok(None),
        }
    }
}
