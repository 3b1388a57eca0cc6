/// API routes and handlers
pub mod analytics;
pub mod auth;
pub mod creators;
pub mod export;
pub mod health;
pub mod middleware;
pub mod settings;
pub mod subscriptions;

use crate::{
    context::AppContext,
    error::{ApiError, ApiResult},
};
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequestParts, Path},
    http::request::Parts,
    Router,
};
use serde::de::DeserializeOwned;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(creators::routes())
        .merge(subscriptions::routes())
        .merge(analytics::routes())
        .merge(settings::routes())
        .merge(export::routes())
}

/// Decode a JSON body, reporting any failure as a 400 `{error}` body
/// rather than axum's plain-text rejection
pub(crate) fn parse_json<T: DeserializeOwned>(body: &Bytes) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| ApiError::Validation(format!("Invalid request body: {}", e)))
}

/// `Path` extractor whose rejection is a 400 `{error}` body
pub(crate) struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| ApiPath(value))
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))
    }
}
