/// Creator Registry
///
/// Creator profile records: CRUD, featured placement, and live/offline
/// status tracking.

pub mod registry;

pub use registry::CreatorRegistry;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Default page size for creator listings
pub const DEFAULT_PAGE_LIMIT: i64 = 50;
/// Upper bound on a single listing page
pub const MAX_PAGE_LIMIT: i64 = 500;

/// Status value that does not count as "seen"
pub const STATUS_OFFLINE: &str = "offline";
pub const STATUS_LIVE: &str = "live";

/// Creator as stored: `platforms` is still the serialized text
#[derive(Debug, Clone, FromRow)]
pub(crate) struct CreatorRow {
    pub id: i64,
    pub display_name: String,
    pub description: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub status: String,
    pub is_featured: bool,
    pub is_paid_member: bool,
    pub featured_priority: i64,
    pub platforms: String,
    pub viewers: i64,
    pub last_live_start: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creator record as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    pub id: i64,
    pub display_name: String,
    pub description: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub status: String,
    pub is_featured: bool,
    pub is_paid_member: bool,
    pub featured_priority: i64,
    pub platforms: Vec<String>,
    pub viewers: i64,
    pub last_live_start: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CreatorRow> for Creator {
    fn from(row: CreatorRow) -> Self {
        let platforms = parse_platforms(row.id, &row.platforms);
        Self {
            id: row.id,
            display_name: row.display_name,
            description: row.description,
            email: row.email,
            avatar_url: row.avatar_url,
            status: row.status,
            is_featured: row.is_featured,
            is_paid_member: row.is_paid_member,
            featured_priority: row.featured_priority,
            platforms,
            viewers: row.viewers,
            last_live_start: row.last_live_start,
            last_seen: row.last_seen,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Deserialize stored platforms; anything unparsable reads as empty.
fn parse_platforms(creator_id: i64, raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::debug!(creator_id, error = %e, "unparsable platforms, using empty list");
        Vec::new()
    })
}

/// Platforms as a client may send them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlatformsInput {
    List(Vec<String>),
    /// Pre-serialized JSON array, or a comma-separated list from a form
    Serialized(String),
}

impl PlatformsInput {
    pub fn into_list(self) -> Vec<String> {
        match self {
            PlatformsInput::List(list) => list,
            PlatformsInput::Serialized(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Vec::new();
                }
                serde_json::from_str::<Vec<String>>(trimmed).unwrap_or_else(|_| {
                    trimmed
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
            }
        }
    }

    /// Serialized form written to the `platforms` column
    pub fn to_stored(&self) -> String {
        serialize_platforms(&self.clone().into_list())
    }
}

pub(crate) fn serialize_platforms(list: &[String]) -> String {
    serde_json::to_string(list).unwrap_or_else(|_| "[]".to_string())
}

/// Fields for a new creator; unspecified flags default false, priority 0
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCreator {
    pub display_name: String,
    pub description: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub status: Option<String>,
    pub is_featured: Option<bool>,
    pub is_paid_member: Option<bool>,
    pub featured_priority: Option<i64>,
    pub platforms: Option<PlatformsInput>,
    pub viewers: Option<i64>,
}

/// Sparse update: only `Some` fields are written
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatorPatch {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub status: Option<String>,
    pub is_featured: Option<bool>,
    pub is_paid_member: Option<bool>,
    pub featured_priority: Option<i64>,
    pub platforms: Option<PlatformsInput>,
    pub viewers: Option<i64>,
}

/// Conjunctive listing filter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatorFilter {
    pub status: Option<String>,
    pub featured: Option<bool>,
    /// Case-insensitive substring over display_name or description
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::new(None, None)
    }
}

/// Single status transition issued by an admin
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
    pub viewers: Option<i64>,
    pub live_start: Option<DateTime<Utc>>,
}

/// One entry of a polling agent's batch
#[derive(Debug, Clone, Deserialize)]
pub struct BulkStatusItem {
    pub id: i64,
    pub status: String,
    pub viewers: Option<i64>,
}
