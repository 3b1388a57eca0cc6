/// Subscription Reader
///
/// Read-only view of paid subscriptions. Rows are written by the billing
/// integration; this service only lists them.
use crate::error::ApiResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// Subscription joined with the owning creator, if that creator still exists
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SubscriptionView {
    pub id: i64,
    pub creator_id: Option<i64>,
    pub stripe_subscription_id: String,
    pub stripe_customer_id: Option<String>,
    pub status: String,
    pub plan_type: Option<String>,
    /// Minor currency units
    pub amount: i64,
    pub currency: String,
    pub period_start: Option<DateTime<Utc>>,
    pub period_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub creator_display_name: Option<String>,
    pub creator_email: Option<String>,
}

#[derive(Clone)]
pub struct SubscriptionReader {
    db: SqlitePool,
}

impl SubscriptionReader {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// All subscriptions, newest first
    pub async fn list(&self) -> ApiResult<Vec<SubscriptionView>> {
        let rows = sqlx::query_as::<_, SubscriptionView>(
            r#"
            SELECT
                s.id, s.creator_id, s.stripe_subscription_id, s.stripe_customer_id,
                s.status, s.plan_type, s.amount, s.currency, s.period_start,
                s.period_end, s.created_at,
                c.display_name AS creator_display_name,
                c.email AS creator_email
            FROM subscriptions s
            LEFT JOIN creators c ON c.id = s.creator_id
            ORDER BY s.created_at DESC, s.id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}
