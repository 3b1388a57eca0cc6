/// Site settings endpoints
use crate::{
    api::parse_json, auth::AdminAuthContext, context::AppContext, error::ApiResult,
};
use axum::{body::Bytes, extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub fn routes() -> Router<AppContext> {
    Router::new().route("/api/settings", get(get_settings).put(put_settings))
}

async fn get_settings(
    State(ctx): State<AppContext>,
    _auth: AdminAuthContext,
) -> ApiResult<Json<BTreeMap<String, String>>> {
    Ok(Json(ctx.settings.get_all().await?))
}

async fn put_settings(
    State(ctx): State<AppContext>,
    auth: AdminAuthContext,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let values: BTreeMap<String, Value> = parse_json(&body)?;
    let written = ctx.settings.set_all(&values).await?;

    tracing::info!(admin = %auth.identity.username, keys = written, "settings saved");
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::TestApp;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_then_get_settings() {
        let app = TestApp::new().await;

        let (status, body) = app
            .json("PUT", "/api/settings", json!({"site_title": "Hub", "max_featured": 6}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));

        app.json("PUT", "/api/settings", json!({"site_title": "Creator Hub"})).await;

        let (status, body) = app.get("/api/settings").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"max_featured": "6", "site_title": "Creator Hub"}));
    }

    #[tokio::test]
    async fn test_put_settings_requires_object() {
        let app = TestApp::new().await;
        let (status, body) = app.json("PUT", "/api/settings", json!(["a", "b"])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
