/// Health check endpoints for liveness and readiness probes, plus the
/// Prometheus scrape endpoint
use crate::{context::AppContext, db, error::ErrorResponse, metrics};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(health_basic))
        .route("/health/ready", get(readiness_probe))
        .route("/metrics", get(metrics_handler))
}

/// Liveness: if we can respond, we're alive
pub async fn health_basic(State(ctx): State<AppContext>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": ctx.config.service.version
    }))
}

/// Readiness: 503 until the database answers
pub async fn readiness_probe(
    State(ctx): State<AppContext>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    if let Err(e) = db::test_connection(&ctx.db).await {
        tracing::warn!(error = %e, "readiness probe failed: database check failed");
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Database unavailable".to_string(),
            }),
        ));
    }

    Ok(Json(json!({
        "status": "ready",
        "version": ctx.config.service.version
    })))
}

pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::render_metrics(),
    )
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::TestApp;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };

    #[tokio::test]
    async fn test_health_and_ready() {
        let app = TestApp::new().await;

        let (status, body) = app.send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], "test");

        let (status, body) = app
            .send(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn test_ready_fails_when_database_closed() {
        let app = TestApp::new().await;
        app.ctx.db.close().await;

        let (status, body) = app
            .send(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Database unavailable");
    }

    #[tokio::test]
    async fn test_metrics_exposes_request_counter() {
        let app = TestApp::new().await;
        app.get("/api/creators").await;

        let (status, body) = app.send(Request::get("/metrics").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let text = body.as_str().unwrap();
        assert!(text.contains("http_requests_total"));
        assert!(text.contains("/api/creators"));
    }
}
