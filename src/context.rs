/// Application context and dependency injection
use crate::{
    account::AdminAccountManager,
    analytics::AnalyticsRecorder,
    avatar_store::{AvatarBackend, DiskAvatarBackend},
    config::ServerConfig,
    creators::CreatorRegistry,
    db,
    error::{ApiError, ApiResult},
    settings::SettingsStore,
    subscriptions::SubscriptionReader,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub db: SqlitePool,
    pub accounts: Arc<AdminAccountManager>,
    pub creators: Arc<CreatorRegistry>,
    pub subscriptions: Arc<SubscriptionReader>,
    pub analytics: Arc<AnalyticsRecorder>,
    pub settings: Arc<SettingsStore>,
    pub avatars: Arc<dyn AvatarBackend>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> ApiResult<Self> {
        config.validate()?;

        Self::ensure_directories(&config).await?;

        let db = db::create_pool(
            &config.storage.database,
            db::DatabaseOptions {
                max_connections: config.storage.max_connections,
                ..Default::default()
            },
        )
        .await?;

        db::run_migrations(&db).await?;
        db::test_connection(&db).await?;

        tracing::info!(database = %config.storage.database.display(), "database ready");

        let avatars = Arc::new(DiskAvatarBackend::new(
            config.storage.uploads_directory.clone(),
        ));

        Ok(Self::from_parts(config, db, avatars))
    }

    /// Wire the components over an already-migrated pool
    pub fn from_parts(
        config: ServerConfig,
        db: SqlitePool,
        avatars: Arc<dyn AvatarBackend>,
    ) -> Self {
        let accounts = Arc::new(AdminAccountManager::new(
            db.clone(),
            &config.authentication,
        ));
        let analytics = AnalyticsRecorder::new(db.clone());
        let creators = Arc::new(CreatorRegistry::new(db.clone(), analytics.clone()));
        let subscriptions = Arc::new(SubscriptionReader::new(db.clone()));
        let settings = Arc::new(SettingsStore::new(db.clone()));

        Self {
            config: Arc::new(config),
            db,
            accounts,
            creators,
            subscriptions,
            analytics: Arc::new(analytics),
            settings,
            avatars,
        }
    }

    /// Ensure required directories exist
    async fn ensure_directories(config: &ServerConfig) -> ApiResult<()> {
        let dirs = [
            &config.storage.data_directory,
            &config.storage.uploads_directory,
        ];

        for dir in dirs {
            if !dir.exists() {
                tokio::fs::create_dir_all(dir).await.map_err(|e| {
                    ApiError::Internal(format!("Failed to create directory {:?}: {}", dir, e))
                })?;
            }
        }

        Ok(())
    }

    /// Context over an in-memory database with uploads in `uploads_directory`
    #[cfg(test)]
    pub async fn for_tests(uploads_directory: std::path::PathBuf) -> Self {
        let config = ServerConfig::for_tests(uploads_directory.clone());
        let db = db::memory_pool().await;
        Self::from_parts(config, db, Arc::new(DiskAvatarBackend::new(uploads_directory)))
    }
}
