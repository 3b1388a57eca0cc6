/// Creator registry: persistence for creator records and status transitions
use super::{
    serialize_platforms, BulkStatusItem, Creator, CreatorFilter, CreatorPatch, CreatorRow,
    NewCreator, Page, StatusUpdate, STATUS_LIVE, STATUS_OFFLINE,
};
use crate::{
    analytics::{AnalyticsRecorder, EVENT_STATUS_CHANGE},
    error::{ApiError, ApiResult},
    metrics,
};
use chrono::Utc;
use serde_json::json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const CREATOR_COLUMNS: &str = "id, display_name, description, email, avatar_url, status, \
    is_featured, is_paid_member, featured_priority, platforms, viewers, last_live_start, \
    last_seen, created_at, updated_at";

/// Escape LIKE wildcards so the search term matches literally.
///
/// SQLite's `LOWER` folds ASCII only, so the term is folded the same way;
/// non-ASCII letters then compare exactly on both sides.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .to_ascii_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn check_viewers(viewers: Option<i64>) -> ApiResult<()> {
    match viewers {
        Some(v) if v < 0 => Err(ApiError::Validation(
            "viewers must be zero or greater".to_string(),
        )),
        _ => Ok(()),
    }
}

#[derive(Clone)]
pub struct CreatorRegistry {
    db: SqlitePool,
    analytics: AnalyticsRecorder,
}

impl CreatorRegistry {
    pub fn new(db: SqlitePool, analytics: AnalyticsRecorder) -> Self {
        Self { db, analytics }
    }

    /// Filtered, paginated listing in featured-slot order
    pub async fn list(&self, filter: &CreatorFilter, page: Page) -> ApiResult<Vec<Creator>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT ");
        qb.push(CREATOR_COLUMNS).push(" FROM creators WHERE 1 = 1");

        if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
            qb.push(" AND status = ").push_bind(status.to_string());
        }

        if let Some(featured) = filter.featured {
            qb.push(" AND is_featured = ").push_bind(featured);
        }

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = like_pattern(search);
            qb.push(" AND (LOWER(display_name) LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR LOWER(COALESCE(description, '')) LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }

        qb.push(" ORDER BY is_featured DESC, featured_priority DESC, last_seen DESC");
        qb.push(" LIMIT ").push_bind(page.limit);
        qb.push(" OFFSET ").push_bind(page.offset);

        let rows = qb
            .build_query_as::<CreatorRow>()
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Creator::from).collect())
    }

    pub async fn get(&self, id: i64) -> ApiResult<Creator> {
        let row = sqlx::query_as::<_, CreatorRow>(&format!(
            "SELECT {} FROM creators WHERE id = ?1",
            CREATOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Creator not found".to_string()))?;

        Ok(row.into())
    }

    /// Insert a creator and return its id
    pub async fn create(&self, new: NewCreator) -> ApiResult<i64> {
        let display_name = new.display_name.trim();
        if display_name.is_empty() {
            return Err(ApiError::Validation("display_name is required".to_string()));
        }
        check_viewers(new.viewers)?;

        let platforms = new
            .platforms
            .as_ref()
            .map(|p| p.to_stored())
            .unwrap_or_else(|| serialize_platforms(&[]));
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO creators (
                display_name, description, email, avatar_url, status, is_featured,
                is_paid_member, featured_priority, platforms, viewers, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
            "#,
        )
        .bind(display_name)
        .bind(&new.description)
        .bind(&new.email)
        .bind(&new.avatar_url)
        .bind(new.status.as_deref().unwrap_or(STATUS_OFFLINE))
        .bind(new.is_featured.unwrap_or(false))
        .bind(new.is_paid_member.unwrap_or(false))
        .bind(new.featured_priority.unwrap_or(0))
        .bind(platforms)
        .bind(new.viewers.unwrap_or(0))
        .bind(now)
        .execute(&self.db)
        .await?;

        let id = result.last_insert_rowid();
        tracing::info!(creator_id = id, display_name, "creator created");
        Ok(id)
    }

    /// Write only the fields present in the patch; `updated_at` is always stamped
    pub async fn update(&self, id: i64, patch: CreatorPatch) -> ApiResult<()> {
        if let Some(name) = &patch.display_name {
            if name.trim().is_empty() {
                return Err(ApiError::Validation("display_name cannot be empty".to_string()));
            }
        }
        check_viewers(patch.viewers)?;

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE creators SET ");
        let mut fields = qb.separated(", ");

        if let Some(v) = patch.display_name {
            fields.push("display_name = ").push_bind_unseparated(v.trim().to_string());
        }
        if let Some(v) = patch.description {
            fields.push("description = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.email {
            fields.push("email = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.avatar_url {
            fields.push("avatar_url = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.status {
            fields.push("status = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.is_featured {
            fields.push("is_featured = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.is_paid_member {
            fields.push("is_paid_member = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.featured_priority {
            fields.push("featured_priority = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.platforms {
            fields.push("platforms = ").push_bind_unseparated(v.to_stored());
        }
        if let Some(v) = patch.viewers {
            fields.push("viewers = ").push_bind_unseparated(v);
        }
        fields.push("updated_at = ").push_bind_unseparated(Utc::now());

        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&self.db).await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Creator not found".to_string()));
        }

        tracing::debug!(creator_id = id, "creator updated");
        Ok(())
    }

    /// Delete a creator. Subscription and analytics rows that reference it stay.
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM creators WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Creator not found".to_string()));
        }

        tracing::info!(creator_id = id, "creator deleted");
        Ok(())
    }

    /// Apply a status transition and append a `status_change` event.
    ///
    /// `last_seen` is stamped unless the status is exactly `offline`;
    /// `last_live_start` only for `live` with a supplied start. The event is
    /// best-effort and is appended whether or not a row matched. Returns
    /// whether a row matched.
    pub async fn set_status(&self, id: i64, update: StatusUpdate) -> ApiResult<bool> {
        check_viewers(update.viewers)?;

        let now = Utc::now();
        let viewers = update.viewers.unwrap_or(0);

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE creators SET ");
        let mut fields = qb.separated(", ");
        fields.push("status = ").push_bind_unseparated(update.status.clone());
        fields.push("viewers = ").push_bind_unseparated(viewers);
        fields.push("updated_at = ").push_bind_unseparated(now);
        if update.status != STATUS_OFFLINE {
            fields.push("last_seen = ").push_bind_unseparated(now);
        }
        if update.status == STATUS_LIVE {
            if let Some(live_start) = update.live_start {
                fields.push("last_live_start = ").push_bind_unseparated(live_start);
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&self.db).await?;
        let matched = result.rows_affected() > 0;
        metrics::record_status_changes("single", 1);

        self.analytics
            .record_event_best_effort(
                EVENT_STATUS_CHANGE,
                &json!({ "status": update.status, "viewers": viewers }),
                Some(id),
            )
            .await;

        tracing::info!(creator_id = id, status = %update.status, viewers, matched, "creator status set");
        Ok(matched)
    }

    /// Apply each update independently and return how many were submitted.
    ///
    /// Not atomic: a failing item is logged and skipped, unknown ids are
    /// silent no-ops, and readers may observe the batch half-applied.
    pub async fn bulk_set_status(&self, updates: &[BulkStatusItem]) -> usize {
        for item in updates {
            let now = Utc::now();
            let result = sqlx::query(
                r#"
                UPDATE creators
                SET status = ?1, viewers = ?2, last_seen = ?3, updated_at = ?3
                WHERE id = ?4
                "#,
            )
            .bind(&item.status)
            .bind(item.viewers.unwrap_or(0).max(0))
            .bind(now)
            .bind(item.id)
            .execute(&self.db)
            .await;

            match result {
                Ok(r) if r.rows_affected() == 0 => {
                    tracing::debug!(creator_id = item.id, "bulk status: no such creator");
                }
                Ok(_) => {}
                Err(e) => {
                    metrics::record_best_effort_failure("bulk_status_item");
                    tracing::warn!(creator_id = item.id, error = %e, "bulk status item failed");
                }
            }
        }

        metrics::record_status_changes("bulk", updates.len() as u64);
        tracing::info!(submitted = updates.len(), "bulk status applied");
        updates.len()
    }

    /// Every creator, featured first then alphabetical by display name
    pub async fn export_all(&self) -> ApiResult<Vec<Creator>> {
        let rows = sqlx::query_as::<_, CreatorRow>(&format!(
            "SELECT {} FROM creators ORDER BY is_featured DESC, display_name ASC",
            CREATOR_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Creator::from).collect())
    }
}
