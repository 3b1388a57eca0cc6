/// Subscription listing endpoint
use crate::{
    auth::AdminAuthContext, context::AppContext, error::ApiResult,
    subscriptions::SubscriptionView,
};
use axum::{extract::State, routing::get, Json, Router};

pub fn routes() -> Router<AppContext> {
    Router::new().route("/api/subscriptions", get(list_subscriptions))
}

async fn list_subscriptions(
    State(ctx): State<AppContext>,
    _auth: AdminAuthContext,
) -> ApiResult<Json<Vec<SubscriptionView>>> {
    Ok(Json(ctx.subscriptions.list().await?))
}
