/// Analytics dashboard endpoint
use crate::{
    analytics::DashboardSnapshot, auth::AuthContext, context::AppContext, error::ApiResult,
};
use axum::{extract::State, routing::get, Json, Router};

pub fn routes() -> Router<AppContext> {
    Router::new().route("/api/analytics/dashboard", get(dashboard))
}

async fn dashboard(
    State(ctx): State<AppContext>,
    _auth: AuthContext,
) -> ApiResult<Json<DashboardSnapshot>> {
    Ok(Json(ctx.analytics.dashboard().await?))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::TestApp;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_dashboard_empty_and_after_status_change() {
        let app = TestApp::new().await;

        let (status, body) = app.get("/api/analytics/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "creators": {"total": 0, "live": 0, "featured": 0, "paid": 0, "total_viewers": 0},
                "subscriptions": {"total": 0, "active": 0, "monthly_revenue": 0},
                "events": []
            })
        );

        let (_, created) = app
            .json("POST", "/api/creators", json!({"display_name": "Nova"}))
            .await;
        let id = created["id"].as_i64().unwrap();
        app.json(
            "POST",
            &format!("/api/creators/{}/status", id),
            json!({"status": "live", "viewers": 7}),
        )
        .await;

        let (_, body) = app.get("/api/analytics/dashboard").await;
        assert_eq!(body["creators"]["live"], 1);
        assert_eq!(body["creators"]["total_viewers"], 7);
        assert_eq!(body["events"], json!([{"event_type": "status_change", "count": 1}]));
    }
}
