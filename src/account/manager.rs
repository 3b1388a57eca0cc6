/// Admin account manager: login, token issuance/verification, bootstrap seed
use super::{
    password::{hash_password, verify_against_dummy, verify_password},
    AdminUser, Identity, Role,
};
use crate::{
    config::{AuthConfig, BootstrapAdminConfig},
    error::{ApiError, ApiResult},
    metrics,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Bearer token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin user id
    pub sub: String,
    pub username: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Admin account manager
#[derive(Clone)]
pub struct AdminAccountManager {
    db: SqlitePool,
    jwt_secret: String,
    token_ttl: Duration,
}

impl AdminAccountManager {
    pub fn new(db: SqlitePool, config: &AuthConfig) -> Self {
        Self {
            db,
            jwt_secret: config.jwt_secret.clone(),
            token_ttl: Duration::hours(config.token_ttl_hours),
        }
    }

    /// Create an admin account
    pub async fn create_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> ApiResult<AdminUser> {
        let password_hash = hash_password(password).await?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO admin_users (username, email, password_hash, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(&password_hash)
        .bind(role.as_str())
        .bind(now)
        .execute(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                ApiError::Conflict("Username or email already in use".to_string())
            }
            other => ApiError::Database(other),
        })?;

        Ok(AdminUser {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            role: role.as_str().to_string(),
            created_at: now,
            last_login: None,
        })
    }

    /// Find an account whose username OR email equals the identifier
    pub async fn find_by_identifier(&self, identifier: &str) -> ApiResult<Option<AdminUser>> {
        let user = sqlx::query_as::<_, AdminUser>(
            r#"
            SELECT id, username, email, password_hash, role, created_at, last_login
            FROM admin_users
            WHERE username = ?1 OR email = ?1
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    pub async fn count_admins(&self) -> ApiResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_users")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    /// Check credentials and issue a token.
    ///
    /// The `last_login` stamp is written in the background; its failure is
    /// logged and never affects the issued token.
    pub async fn login(&self, identifier: &str, password: &str) -> ApiResult<(String, AdminUser)> {
        let user = self.find_by_identifier(identifier).await?;

        let Some(user) = user else {
            verify_against_dummy(password).await;
            metrics::record_login_attempt("unknown_user");
            return Err(ApiError::Authentication("Invalid credentials".to_string()));
        };

        let valid = verify_password(password, &user.password_hash).await?;
        if !valid {
            metrics::record_login_attempt("bad_password");
            return Err(ApiError::Authentication("Invalid credentials".to_string()));
        }

        self.spawn_touch_last_login(user.id);

        let token = self.issue_token(&user)?;
        metrics::record_login_attempt("success");
        tracing::info!(user_id = user.id, username = %user.username, "admin logged in");

        Ok((token, user))
    }

    fn spawn_touch_last_login(&self, user_id: i64) {
        let db = self.db.clone();
        tokio::spawn(async move {
            let result = sqlx::query("UPDATE admin_users SET last_login = ?1 WHERE id = ?2")
                .bind(Utc::now())
                .bind(user_id)
                .execute(&db)
                .await;

            if let Err(e) = result {
                metrics::record_best_effort_failure("last_login");
                tracing::warn!(user_id, error = %e, "failed to record last_login");
            }
        });
    }

    /// Issue a signed token embedding id, username and role
    pub fn issue_token(&self, user: &AdminUser) -> ApiResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role.clone(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| ApiError::Jwt(format!("Failed to generate token: {}", e)))
    }

    /// Validate signature and expiry; bad tokens are `Authorization` failures
    pub fn verify_token(&self, token: &str) -> ApiResult<Identity> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 60;

        let data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
            tracing::debug!("token verification failed: {}", e);
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ApiError::Authorization("Token has expired".to_string())
                }
                _ => ApiError::Authorization("Invalid token".to_string()),
            }
        })?;

        let claims = data.claims;
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| ApiError::Authorization("Invalid token".to_string()))?;

        Ok(Identity {
            id,
            username: claims.username,
            role: Role::parse(&claims.role)?,
        })
    }

    /// Seed a super admin into an empty account table.
    ///
    /// Returns the created account, or `None` when accounts already exist or
    /// no bootstrap password is configured.
    pub async fn ensure_bootstrap_admin(
        &self,
        bootstrap: &BootstrapAdminConfig,
    ) -> ApiResult<Option<AdminUser>> {
        if self.count_admins().await? > 0 {
            return Ok(None);
        }

        let Some(password) = bootstrap.password.as_deref() else {
            tracing::warn!("No admin accounts exist and HUB_ADMIN_PASSWORD is not set; skipping bootstrap");
            return Ok(None);
        };

        let user = self
            .create_admin(&bootstrap.username, &bootstrap.email, password, Role::SuperAdmin)
            .await?;
        tracing::info!(username = %user.username, "bootstrap super admin created");

        Ok(Some(user))
    }
}
