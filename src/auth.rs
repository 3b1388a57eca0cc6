/// Auth Gate: bearer token verification and per-route capability checks
///
/// Each handler declares what it needs by the extractor it takes:
/// `AuthContext` for any authenticated admin, `AdminAuthContext` for routes
/// restricted to the admin roles. Both resolve through [`authorize`].
use crate::{
    account::{AdminAccountManager, Identity, Role},
    api::middleware::extract_bearer_token,
    context::AppContext,
    error::{ApiError, ApiResult},
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

/// What a route requires of the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Any valid token, regardless of role
    Authenticated,
    /// Token whose role is `admin` or `super_admin`
    Admin,
}

impl Capability {
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Capability::Authenticated => &[Role::Admin, Role::SuperAdmin],
            Capability::Admin => &[Role::Admin, Role::SuperAdmin],
        }
    }

    pub fn permits(&self, role: Role) -> bool {
        self.allowed_roles().contains(&role)
    }
}

/// Verify the request's bearer token and check it against a capability.
///
/// No token is `Authentication` (401); a bad or expired token, or a role
/// outside the allowed set, is `Authorization` (403).
pub fn authorize(
    accounts: &AdminAccountManager,
    headers: &HeaderMap,
    capability: Capability,
) -> ApiResult<Identity> {
    let token = extract_bearer_token(headers)
        .ok_or_else(|| ApiError::Authentication("Access token required".to_string()))?;

    let identity = accounts.verify_token(&token)?;

    if !capability.permits(identity.role) {
        tracing::warn!(
            user_id = identity.id,
            role = identity.role.as_str(),
            ?capability,
            "role not permitted"
        );
        return Err(ApiError::Authorization("Insufficient permissions".to_string()));
    }

    Ok(identity)
}

/// Authenticated context - any valid token
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub identity: Identity,
}

#[async_trait]
impl FromRequestParts<AppContext> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let identity = authorize(&state.accounts, &parts.headers, Capability::Authenticated)?;
        parts.extensions.insert(identity.clone());
        Ok(AuthContext { identity })
    }
}

/// Admin authentication context - requires an admin role
#[derive(Debug, Clone)]
pub struct AdminAuthContext {
    pub identity: Identity,
}

#[async_trait]
impl FromRequestParts<AppContext> for AdminAuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let identity = authorize(&state.accounts, &parts.headers, Capability::Admin)?;
        parts.extensions.insert(identity.clone());
        Ok(AdminAuthContext { identity })
    }
}
