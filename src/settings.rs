/// Site settings: flat key/value pairs, one row per key
use crate::error::{ApiError, ApiResult};
use chrono::Utc;
use serde_json::Value;
use sqlx::SqlitePool;
use std::collections::BTreeMap;

/// Stored form of a setting value: strings verbatim, anything else as JSON text
fn stored_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Clone)]
pub struct SettingsStore {
    db: SqlitePool,
}

impl SettingsStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn get_all(&self) -> ApiResult<BTreeMap<String, String>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT key, value FROM site_settings ORDER BY key")
                .fetch_all(&self.db)
                .await?;

        Ok(rows.into_iter().collect())
    }

    /// Upsert every supplied key. Keys absent from `values` are left as they are.
    pub async fn set_all(&self, values: &BTreeMap<String, Value>) -> ApiResult<usize> {
        if values.keys().any(|k| k.trim().is_empty()) {
            return Err(ApiError::Validation("Setting keys cannot be empty".to_string()));
        }

        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        for (key, value) in values {
            sqlx::query(
                r#"
                INSERT INTO site_settings (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                "#,
            )
            .bind(key)
            .bind(stored_value(value))
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(keys = values.len(), "site settings updated");
        Ok(values.len())
    }
}
