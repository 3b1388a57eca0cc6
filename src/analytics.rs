/// Analytics Recorder/Reader
///
/// Appends status-change events and computes the dashboard aggregates.
use crate::{error::ApiResult, metrics};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

pub const EVENT_STATUS_CHANGE: &str = "status_change";

/// Trailing window for the dashboard's event-type counts
const EVENT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct CreatorCounts {
    pub total: i64,
    pub live: i64,
    pub featured: i64,
    pub paid: i64,
    pub total_viewers: i64,
}

#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SubscriptionCounts {
    pub total: i64,
    pub active: i64,
    /// Sum of `amount` (minor currency units) over active subscriptions
    pub monthly_revenue: i64,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct EventTypeCount {
    pub event_type: String,
    pub count: i64,
}

/// Dashboard aggregates.
///
/// Each part is read as its own statement, so under concurrent writes the
/// three parts can reflect slightly different moments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub creators: CreatorCounts,
    pub subscriptions: SubscriptionCounts,
    pub events: Vec<EventTypeCount>,
}

#[derive(Clone)]
pub struct AnalyticsRecorder {
    db: SqlitePool,
}

impl AnalyticsRecorder {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Append an event, returning its id
    pub async fn record_event(
        &self,
        event_type: &str,
        data: &serde_json::Value,
        creator_id: Option<i64>,
    ) -> ApiResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO analytics_events (event_type, event_data, creator_id, timestamp)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(event_type)
        .bind(data.to_string())
        .bind(creator_id)
        .bind(Utc::now())
        .execute(&self.db)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Append an event without failing the caller; errors are logged only.
    pub async fn record_event_best_effort(
        &self,
        event_type: &str,
        data: &serde_json::Value,
        creator_id: Option<i64>,
    ) {
        if let Err(e) = self.record_event(event_type, data, creator_id).await {
            metrics::record_best_effort_failure("analytics_event");
            tracing::warn!(event_type, ?creator_id, error = %e, "failed to record analytics event");
        }
    }

    /// Creator counts, then subscription counts, then 7-day event counts
    pub async fn dashboard(&self) -> ApiResult<DashboardSnapshot> {
        let creators = sqlx::query_as::<_, CreatorCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COALESCE(SUM(CASE WHEN status = 'live' THEN 1 ELSE 0 END), 0) AS live,
                COALESCE(SUM(CASE WHEN is_featured THEN 1 ELSE 0 END), 0) AS featured,
                COALESCE(SUM(CASE WHEN is_paid_member THEN 1 ELSE 0 END), 0) AS paid,
                COALESCE(SUM(viewers), 0) AS total_viewers
            FROM creators
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let subscriptions = sqlx::query_as::<_, SubscriptionCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COALESCE(SUM(CASE WHEN status = 'active' THEN 1 ELSE 0 END), 0) AS active,
                COALESCE(SUM(CASE WHEN status = 'active' THEN amount ELSE 0 END), 0) AS monthly_revenue
            FROM subscriptions
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let since = Utc::now() - Duration::days(EVENT_WINDOW_DAYS);
        let events = sqlx::query_as::<_, EventTypeCount>(
            r#"
            SELECT event_type, COUNT(*) AS count
            FROM analytics_events
            WHERE timestamp >= ?1
            GROUP BY event_type
            ORDER BY count DESC, event_type ASC
            "#,
        )
        .bind(since)
        .fetch_all(&self.db)
        .await?;

        Ok(DashboardSnapshot {
            creators,
            subscriptions,
            events,
        })
    }
}
