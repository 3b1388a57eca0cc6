/// Admin login and token verification endpoints
use crate::{
    account::PublicAdminUser,
    api::parse_json,
    auth::AuthContext,
    context::AppContext,
    error::ApiResult,
};
use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/verify", get(verify))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    /// Username or email
    #[serde(alias = "email", alias = "identifier")]
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
    user: PublicAdminUser,
}

async fn login(State(ctx): State<AppContext>, body: Bytes) -> ApiResult<Json<LoginResponse>> {
    let req: LoginRequest = parse_json(&body)?;

    let (token, user) = ctx.accounts.login(req.username.trim(), &req.password).await?;

    Ok(Json(LoginResponse {
        token,
        user: PublicAdminUser::from(&user),
    }))
}

/// Echo the caller's identity
async fn verify(auth: AuthContext) -> Json<serde_json::Value> {
    Json(json!({
        "valid": true,
        "user": {
            "id": auth.identity.id,
            "username": auth.identity.username,
            "role": auth.identity.role,
        }
    }))
}
