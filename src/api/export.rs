/// Creator export as a downloadable JSON document
use crate::{
    auth::AdminAuthContext,
    context::AppContext,
    error::{ApiError, ApiResult},
};
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use chrono::Utc;

pub fn routes() -> Router<AppContext> {
    Router::new().route("/api/export/creators", get(export_creators))
}

async fn export_creators(
    State(ctx): State<AppContext>,
    auth: AdminAuthContext,
) -> ApiResult<Response> {
    let creators = ctx.creators.export_all().await?;
    let body = serde_json::to_vec_pretty(&creators)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize export: {}", e)))?;

    tracing::info!(admin = %auth.identity.username, count = creators.len(), "creators exported");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"creators-export-{}.json\"",
                Utc::now().format("%Y-%m-%d")
            ),
        )
        .body(Body::from(body))
        .map_err(|e| ApiError::Internal(format!("Failed to build export response: {}", e)))
}
