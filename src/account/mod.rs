/// Admin account management
///
/// Admin users log in with username or email, receive a signed bearer token,
/// and carry one of two roles.

pub mod manager;
pub mod password;

pub use manager::AdminAccountManager;

use crate::error::{ApiError, ApiResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Admin role levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    pub fn parse(s: &str) -> ApiResult<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            _ => Err(ApiError::Authorization(format!("Unknown role: {}", s))),
        }
    }
}

/// Admin account row
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Admin fields safe to return to clients (never the hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicAdminUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&AdminUser> for PublicAdminUser {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            last_login: user.last_login,
        }
    }
}

/// Identity attached to a verified request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin").unwrap(), Role::Admin);
        assert_eq!(Role::parse("super_admin").unwrap(), Role::SuperAdmin);
        assert_eq!(Role::parse("SUPER_ADMIN").unwrap(), Role::SuperAdmin);

        assert!(Role::parse("moderator").is_err());
    }

    #[test]
    fn test_role_serde_matches_as_str() {
        for role in [Role::Admin, Role::SuperAdmin] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }
}
