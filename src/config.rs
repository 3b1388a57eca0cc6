/// Configuration management for Creator Hub
use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub authentication: AuthConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    pub version: String,
    /// Maximum request body size for multipart avatar uploads
    pub upload_limit: usize,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    pub database: PathBuf,
    pub uploads_directory: PathBuf,
    pub max_connections: u32,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bootstrap_admin: BootstrapAdminConfig,
}

/// Account seeded into an empty `admin_users` table at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapAdminConfig {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ApiResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("HUB_HOSTNAME").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("HUB_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse()
            .map_err(|_| ApiError::Validation("Invalid port number".to_string()))?;
        let version = env::var("HUB_VERSION")
            .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());
        let upload_limit = env::var("HUB_UPLOAD_LIMIT")
            .unwrap_or_else(|_| "5242880".to_string())
            .parse()
            .unwrap_or(5242880);

        let data_directory: PathBuf = env::var("HUB_DATA_DIRECTORY")
            .unwrap_or_else(|_| "./data".to_string())
            .into();
        let database = env::var("HUB_DATABASE_LOCATION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("creator_hub.sqlite"));
        let uploads_directory = env::var("HUB_UPLOADS_DIRECTORY")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("uploads"));
        let max_connections = env::var("HUB_DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        let jwt_secret = env::var("HUB_JWT_SECRET")
            .map_err(|_| ApiError::Validation("JWT secret required".to_string()))?;
        let token_ttl_hours = env::var("HUB_TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .map_err(|_| ApiError::Validation("Invalid token TTL".to_string()))?;

        let bootstrap_admin = BootstrapAdminConfig {
            username: env::var("HUB_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            email: env::var("HUB_ADMIN_EMAIL").unwrap_or_else(|_| "admin@localhost".to_string()),
            password: env::var("HUB_ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
        };

        let log_level = env::var("RUST_LOG")
            .unwrap_or_else(|_| "creator_hub=debug,tower_http=debug".to_string());
        let log_json = env::var("HUB_LOG_FORMAT")
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(ServerConfig {
            service: ServiceConfig {
                hostname,
                port,
                version,
                upload_limit,
            },
            storage: StorageConfig {
                data_directory,
                database,
                uploads_directory,
                max_connections,
            },
            authentication: AuthConfig {
                jwt_secret,
                token_ttl_hours,
                bootstrap_admin,
            },
            logging: LoggingConfig {
                level: log_level,
                json: log_json,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.service.hostname.is_empty() {
            return Err(ApiError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.authentication.jwt_secret.len() < 32 {
            return Err(ApiError::Validation(
                "JWT secret must be at least 32 characters".to_string(),
            ));
        }

        if self.authentication.token_ttl_hours <= 0 {
            return Err(ApiError::Validation(
                "Token TTL must be a positive number of hours".to_string(),
            ));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service.hostname, self.service.port)
    }

    /// Configuration used by tests: in-memory paths, fixed secret
    #[cfg(test)]
    pub fn for_tests(uploads_directory: PathBuf) -> Self {
        ServerConfig {
            service: ServiceConfig {
                hostname: "127.0.0.1".to_string(),
                port: 0,
                version: "test".to_string(),
                upload_limit: 1024 * 1024,
            },
            storage: StorageConfig {
                data_directory: uploads_directory.clone(),
                database: PathBuf::from(":memory:"),
                uploads_directory,
                max_connections: 1,
            },
            authentication: AuthConfig {
                jwt_secret: "test-secret-key-for-testing-only-0123456789".to_string(),
                token_ttl_hours: 24,
                bootstrap_admin: BootstrapAdminConfig {
                    username: "admin".to_string(),
                    email: "admin@localhost".to_string(),
                    password: None,
                },
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                json: false,
            },
        }
    }
}
