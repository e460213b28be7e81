use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Discriminates which catalog table `visits.entry_id` refers to.
///
/// Stored as the lowercase string in the `entry_type` column; virtual entries
/// are stored as `none`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Post,
    Page,
    None,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Page => "page",
            Self::None => "none",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            "post" => Ok(Self::Post),
            "page" => Ok(Self::Page),
            "none" => Ok(Self::None),
            other => Err(CoreError::InvalidEntryType(other.to_string())),
        }
    }
}

/// The catalog tables an entry id can point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Post,
    Page,
}

impl From<CatalogKind> for EntryType {
    fn from(kind: CatalogKind) -> Self {
        match kind {
            CatalogKind::Post => EntryType::Post,
            CatalogKind::Page => EntryType::Page,
        }
    }
}

/// Identity of the thing a visit was recorded against.
///
/// Content entries carry a catalog id; virtual entries (the blog index, tag
/// listings) carry a display name and a route path instead. Never both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryRef {
    Catalog { id: i64, entry_type: CatalogKind },
    Virtual { name: String, path: String },
}

impl EntryRef {
    pub fn post(id: i64) -> Self {
        Self::Catalog {
            id,
            entry_type: CatalogKind::Post,
        }
    }

    pub fn page(id: i64) -> Self {
        Self::Catalog {
            id,
            entry_type: CatalogKind::Page,
        }
    }

    pub fn virtual_entry(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Virtual {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn entry_type(&self) -> EntryType {
        match self {
            Self::Catalog { entry_type, .. } => (*entry_type).into(),
            Self::Virtual { .. } => EntryType::None,
        }
    }

    pub fn entry_id(&self) -> Option<i64> {
        match self {
            Self::Catalog { id, .. } => Some(*id),
            Self::Virtual { .. } => None,
        }
    }

    pub fn entry_name(&self) -> Option<&str> {
        match self {
            Self::Virtual { name, .. } => Some(name),
            Self::Catalog { .. } => None,
        }
    }

    pub fn entry_path(&self) -> Option<&str> {
        match self {
            Self::Virtual { path, .. } => Some(path),
            Self::Catalog { .. } => None,
        }
    }

    /// Stable identity fed into the dedup hash: `post:42`, `page:7`, `path:blog`.
    ///
    /// The catalog table is part of the key because posts and pages have
    /// independent id sequences.
    pub fn dedup_identity(&self) -> String {
        match self {
            Self::Catalog { id, entry_type } => {
                format!("{}:{}", EntryType::from(*entry_type).as_str(), id)
            }
            Self::Virtual { path, .. } => format!("path:{path}"),
        }
    }
}

/// One recorded, deduplicated pageview. Mirrors the `visits` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitRecord {
    pub entry: EntryRef,
    pub browser: String,
    pub device: String,
    pub country: Option<String>,
    pub referer: Option<String>,
    /// Site-local calendar date the visit is bucketed under.
    pub date: NaiveDate,
    pub visitor_id: String,
    pub visit_hash: String,
}
