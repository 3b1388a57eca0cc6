/// Creator endpoints: listing, CRUD with avatar upload, and status updates
use crate::{
    api::{parse_json, ApiPath},
    auth::{AdminAuthContext, AuthContext},
    context::AppContext,
    creators::{
        BulkStatusItem, Creator, CreatorFilter, CreatorPatch, NewCreator, Page, PlatformsInput,
        StatusUpdate,
    },
    error::{ApiError, ApiResult},
};
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Query, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/creators", get(list_creators).post(create_creator))
        .route("/api/creators/bulk-status", post(bulk_status))
        .route(
            "/api/creators/:id",
            get(get_creator).put(update_creator).delete(delete_creator),
        )
        .route("/api/creators/:id/status", post(set_status))
}

// ============================================================================
// Request decoding
// ============================================================================

/// Parse a form-style flag: `true/false`, `1/0`, `on/off`
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" => Some(true),
        "false" | "0" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(key: &str) -> ApiError {
    ApiError::Validation(format!("Invalid value for {}", key))
}

fn text_value(key: &str, value: Value) -> ApiResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        _ => Err(invalid(key)),
    }
}

fn flag_value(key: &str, value: Value) -> ApiResult<Option<bool>> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(b)),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(Some(false)),
            Some(1) => Ok(Some(true)),
            _ => Err(invalid(key)),
        },
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => parse_flag(&s).map(Some).ok_or_else(|| invalid(key)),
        _ => Err(invalid(key)),
    }
}

fn int_value(key: &str, value: Value) -> ApiResult<Option<i64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_i64().map(Some).ok_or_else(|| invalid(key)),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s.trim().parse().map(Some).map_err(|_| invalid(key)),
        _ => Err(invalid(key)),
    }
}

fn platforms_value(value: Value) -> ApiResult<Option<PlatformsInput>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(PlatformsInput::Serialized(s))),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                _ => Err(invalid("platforms")),
            })
            .collect::<ApiResult<Vec<_>>>()
            .map(|list| Some(PlatformsInput::List(list))),
        _ => Err(invalid("platforms")),
    }
}

/// Creator fields as submitted; every field optional until the caller
/// decides between create and sparse update
#[derive(Debug, Default)]
pub struct CreatorFields {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub status: Option<String>,
    pub is_featured: Option<bool>,
    pub is_paid_member: Option<bool>,
    pub featured_priority: Option<i64>,
    pub platforms: Option<PlatformsInput>,
    pub viewers: Option<i64>,
}

impl CreatorFields {
    /// Lenient decoding shared by JSON and multipart bodies. Unknown keys are ignored.
    fn from_map(map: Map<String, Value>) -> ApiResult<Self> {
        let mut fields = CreatorFields::default();

        for (key, value) in map {
            match key.as_str() {
                "display_name" => fields.display_name = text_value(&key, value)?,
                "description" => fields.description = text_value(&key, value)?,
                "email" => fields.email = text_value(&key, value)?,
                "avatar_url" => fields.avatar_url = text_value(&key, value)?,
                "status" => fields.status = text_value(&key, value)?,
                "is_featured" => fields.is_featured = flag_value(&key, value)?,
                "is_paid_member" => fields.is_paid_member = flag_value(&key, value)?,
                "featured_priority" => fields.featured_priority = int_value(&key, value)?,
                "viewers" => fields.viewers = int_value(&key, value)?,
                "platforms" => fields.platforms = platforms_value(value)?,
                _ => {}
            }
        }

        Ok(fields)
    }

    fn into_new_creator(self) -> ApiResult<NewCreator> {
        let display_name = self
            .display_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| ApiError::Validation("display_name is required".to_string()))?;

        Ok(NewCreator {
            display_name,
            description: self.description,
            email: self.email,
            avatar_url: self.avatar_url,
            status: self.status,
            is_featured: self.is_featured,
            is_paid_member: self.is_paid_member,
            featured_priority: self.featured_priority,
            platforms: self.platforms,
            viewers: self.viewers,
        })
    }

    fn into_patch(self) -> CreatorPatch {
        CreatorPatch {
            display_name: self.display_name,
            description: self.description,
            email: self.email,
            avatar_url: self.avatar_url,
            status: self.status,
            is_featured: self.is_featured,
            is_paid_member: self.is_paid_member,
            featured_priority: self.featured_priority,
            platforms: self.platforms,
            viewers: self.viewers,
        }
    }
}

/// Uploaded avatar file
#[derive(Debug)]
pub struct AvatarUpload {
    pub file_name: String,
    pub data: Bytes,
}

/// Creator create/update body: `multipart/form-data` with an optional
/// `avatar` file part, or a plain JSON object
#[derive(Debug)]
pub struct CreatorForm {
    pub fields: CreatorFields,
    pub avatar: Option<AvatarUpload>,
}

#[async_trait]
impl FromRequest<AppContext> for CreatorForm {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppContext) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("multipart/form-data"))
            .unwrap_or(false);

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::Validation(e.body_text()))?;
            return read_multipart(multipart).await;
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::Validation(e.body_text()))?;
        let map: Map<String, Value> = parse_json(&body)?;

        Ok(CreatorForm {
            fields: CreatorFields::from_map(map)?,
            avatar: None,
        })
    }
}

async fn read_multipart(mut multipart: Multipart) -> ApiResult<CreatorForm> {
    let mut map = Map::new();
    let mut platforms: Vec<String> = Vec::new();
    let mut avatar = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.body_text()))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == "avatar" && field.file_name().is_some() {
            let file_name = field.file_name().unwrap_or("avatar").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(e.body_text()))?;
            // Browsers send an empty part when no file was chosen
            if !data.is_empty() {
                avatar = Some(AvatarUpload { file_name, data });
            }
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| ApiError::Validation(e.body_text()))?;

        match name.trim_end_matches("[]") {
            "platforms" => platforms.push(text),
            key => {
                map.insert(key.to_string(), Value::String(text));
            }
        }
    }

    match platforms.len() {
        0 => {}
        1 => {
            map.insert("platforms".to_string(), Value::String(platforms.remove(0)));
        }
        _ => {
            let items = platforms
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .map(Value::String)
                .collect();
            map.insert("platforms".to_string(), Value::Array(items));
        }
    }

    Ok(CreatorForm {
        fields: CreatorFields::from_map(map)?,
        avatar,
    })
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct ListCreatorsQuery {
    status: Option<String>,
    featured: Option<String>,
    search: Option<String>,
    limit: Option<String>,
    offset: Option<String>,
}

impl ListCreatorsQuery {
    fn into_parts(self) -> ApiResult<(CreatorFilter, Page)> {
        let featured = match self.featured.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_flag(raw).ok_or_else(|| invalid("featured"))?),
        };
        let limit = int_value("limit", self.limit.map(Value::String).unwrap_or(Value::Null))?;
        let offset = int_value("offset", self.offset.map(Value::String).unwrap_or(Value::Null))?;

        Ok((
            CreatorFilter {
                status: self.status,
                featured,
                search: self.search,
            },
            Page::new(limit, offset),
        ))
    }
}

async fn list_creators(
    State(ctx): State<AppContext>,
    _auth: AuthContext,
    Query(query): Query<ListCreatorsQuery>,
) -> ApiResult<Json<Vec<Creator>>> {
    let (filter, page) = query.into_parts()?;
    let creators = ctx.creators.list(&filter, page).await?;
    Ok(Json(creators))
}

async fn get_creator(
    State(ctx): State<AppContext>,
    _auth: AuthContext,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Creator>> {
    Ok(Json(ctx.creators.get(id).await?))
}

/// Store the avatar, if any, and return its public path
async fn store_avatar(ctx: &AppContext, avatar: Option<AvatarUpload>) -> ApiResult<Option<String>> {
    match avatar {
        Some(upload) => Ok(Some(ctx.avatars.put(&upload.file_name, &upload.data).await?)),
        None => Ok(None),
    }
}

/// Remove an avatar stored for a write that then failed
async fn discard_avatar(ctx: &AppContext, url: Option<String>) {
    if let Some(url) = url {
        if let Err(e) = ctx.avatars.delete(&url).await {
            tracing::warn!(avatar = %url, error = %e, "failed to remove orphaned avatar");
        }
    }
}

async fn create_creator(
    State(ctx): State<AppContext>,
    auth: AdminAuthContext,
    form: CreatorForm,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut new = form.fields.into_new_creator()?;

    let stored = store_avatar(&ctx, form.avatar).await?;
    if stored.is_some() {
        new.avatar_url = stored.clone();
    }

    let id = match ctx.creators.create(new).await {
        Ok(id) => id,
        Err(e) => {
            discard_avatar(&ctx, stored).await;
            return Err(e);
        }
    };

    tracing::info!(creator_id = id, admin = %auth.identity.username, "creator created via API");
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "id": id }))))
}

async fn update_creator(
    State(ctx): State<AppContext>,
    auth: AdminAuthContext,
    ApiPath(id): ApiPath<i64>,
    form: CreatorForm,
) -> ApiResult<Json<Value>> {
    let mut patch = form.fields.into_patch();

    let stored = store_avatar(&ctx, form.avatar).await?;
    if stored.is_some() {
        patch.avatar_url = stored.clone();
    }

    if let Err(e) = ctx.creators.update(id, patch).await {
        discard_avatar(&ctx, stored).await;
        return Err(e);
    }

    tracing::info!(creator_id = id, admin = %auth.identity.username, "creator updated via API");
    Ok(Json(json!({ "success": true })))
}

async fn delete_creator(
    State(ctx): State<AppContext>,
    auth: AdminAuthContext,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    ctx.creators.delete(id).await?;

    tracing::info!(creator_id = id, admin = %auth.identity.username, "creator deleted via API");
    Ok(Json(json!({ "success": true })))
}

async fn set_status(
    State(ctx): State<AppContext>,
    _auth: AdminAuthContext,
    ApiPath(id): ApiPath<i64>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let update: StatusUpdate = parse_json(&body)?;
    ctx.creators.set_status(id, update).await?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
struct BulkStatusRequest {
    updates: Vec<BulkStatusItem>,
}

/// Batch status apply for polling agents; any authenticated caller
async fn bulk_status(
    State(ctx): State<AppContext>,
    auth: AuthContext,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let req: BulkStatusRequest = parse_json(&body)?;

    let updated = ctx.creators.bulk_set_status(&req.updates).await;

    tracing::debug!(caller = %auth.identity.username, updated, "bulk status request");
    Ok(Json(json!({ "success": true, "updated": updated })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::TestApp;
    use axum::{body::Body, http::header, http::Request};

    const BOUNDARY: &str = "X-CREATOR-HUB-BOUNDARY";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a [u8]),
    }

    fn multipart_body(parts: &[Part]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, file_name, data) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
                            name, file_name
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    async fn send_multipart(app: &TestApp, method: &str, uri: &str, parts: &[Part<'_>]) -> (StatusCode, Value) {
        app.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", app.token))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(multipart_body(parts)))
                .unwrap(),
        )
        .await
    }

    async fn create(app: &TestApp, body: Value) -> i64 {
        let (status, resp) = app.json("POST", "/api/creators", body).await;
        assert_eq!(status, StatusCode::CREATED, "{}", resp);
        resp["id"].as_i64().unwrap()
    }

    #[test]
    fn test_parse_flag() {
        for raw in ["true", "1", "on", " ON "] {
            assert_eq!(parse_flag(raw), Some(true));
        }
        for raw in ["false", "0", "off"] {
            assert_eq!(parse_flag(raw), Some(false));
        }
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_fields_from_map_lenient_types() {
        let map: Map<String, Value> = serde_json::from_value(json!({
            "display_name": "Nova",
            "is_featured": "on",
            "is_paid_member": 0,
            "featured_priority": "3",
            "viewers": 12,
            "platforms": ["twitch"],
            "id": 99,
        }))
        .unwrap();

        let fields = CreatorFields::from_map(map).unwrap();
        assert_eq!(fields.display_name.as_deref(), Some("Nova"));
        assert_eq!(fields.is_featured, Some(true));
        assert_eq!(fields.is_paid_member, Some(false));
        assert_eq!(fields.featured_priority, Some(3));
        assert_eq!(fields.viewers, Some(12));
        assert_eq!(fields.platforms, Some(PlatformsInput::List(vec!["twitch".into()])));
    }

    #[test]
    fn test_fields_from_map_rejects_bad_values() {
        let map: Map<String, Value> =
            serde_json::from_value(json!({"featured_priority": "high"})).unwrap();
        assert!(matches!(CreatorFields::from_map(map), Err(ApiError::Validation(_))));

        let map: Map<String, Value> = serde_json::from_value(json!({"platforms": [1, 2]})).unwrap();
        assert!(matches!(CreatorFields::from_map(map), Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_json_and_read_back() {
        let app = TestApp::new().await;
        let id = create(&app, json!({"display_name": "Nova", "description": "Retro games"})).await;

        let (status, body) = app.get(&format!("/api/creators/{}", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["display_name"], "Nova");
        assert_eq!(body["platforms"], json!([]));
        assert_eq!(body["is_featured"], false);
        assert_eq!(body["featured_priority"], 0);
        assert_eq!(body["status"], "offline");
    }

    #[tokio::test]
    async fn test_create_requires_display_name() {
        let app = TestApp::new().await;
        let (status, body) = app.json("POST", "/api/creators", json!({"description": "x"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "display_name is required");
    }

    #[tokio::test]
    async fn test_create_multipart_with_avatar() {
        let app = TestApp::new().await;

        let (status, resp) = send_multipart(
            &app,
            "POST",
            "/api/creators",
            &[
                Part::Text("display_name", "Pixel"),
                Part::Text("is_featured", "on"),
                Part::Text("featured_priority", "4"),
                Part::Text("platforms", "twitch"),
                Part::Text("platforms", "youtube"),
                Part::File("avatar", "me.png", b"\x89PNG fake"),
            ],
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", resp);
        let id = resp["id"].as_i64().unwrap();

        let creator = app.ctx.creators.get(id).await.unwrap();
        assert!(creator.is_featured);
        assert_eq!(creator.featured_priority, 4);
        assert_eq!(creator.platforms, vec!["twitch", "youtube"]);

        let avatar_url = creator.avatar_url.unwrap();
        assert!(avatar_url.starts_with("/uploads/"));
        assert!(avatar_url.ends_with("-me.png"));

        let file_name = avatar_url.trim_start_matches("/uploads/");
        assert!(app.uploads_path().join(file_name).exists());

        // Served back statically
        let (status, _) = app.get(&avatar_url).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_multipart_serialized_platforms() {
        let app = TestApp::new().await;
        let (status, resp) = send_multipart(
            &app,
            "POST",
            "/api/creators",
            &[
                Part::Text("display_name", "Orbit"),
                Part::Text("platforms", r#"["kick","twitch"]"#),
            ],
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let creator = app.ctx.creators.get(resp["id"].as_i64().unwrap()).await.unwrap();
        assert_eq!(creator.platforms, vec!["kick", "twitch"]);
        assert!(creator.avatar_url.is_none());
    }

    #[tokio::test]
    async fn test_update_is_sparse() {
        let app = TestApp::new().await;
        let id = create(
            &app,
            json!({"display_name": "Nova", "description": "Retro", "is_featured": true, "platforms": ["twitch"]}),
        )
        .await;
        let before = app.ctx.creators.get(id).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let (status, body) = app
            .json("PUT", &format!("/api/creators/{}", id), json!({"status": "live"}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let after = app.ctx.creators.get(id).await.unwrap();
        assert_eq!(after.status, "live");
        assert_eq!(after.description, before.description);
        assert_eq!(after.is_featured, before.is_featured);
        assert_eq!(after.platforms, before.platforms);
        assert!(after.updated_at > before.updated_at);
    }

    #[tokio::test]
    async fn test_update_multipart_replaces_avatar() {
        let app = TestApp::new().await;
        let id = create(&app, json!({"display_name": "Nova"})).await;

        let (status, _) = send_multipart(
            &app,
            "PUT",
            &format!("/api/creators/{}", id),
            &[Part::File("avatar", "new.jpg", b"jpeg")],
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let creator = app.ctx.creators.get(id).await.unwrap();
        assert_eq!(creator.display_name, "Nova");
        assert!(creator.avatar_url.unwrap().ends_with("-new.jpg"));
    }

    #[tokio::test]
    async fn test_update_missing_creator_discards_avatar() {
        let app = TestApp::new().await;

        let (status, body) = send_multipart(
            &app,
            "PUT",
            "/api/creators/404",
            &[Part::File("avatar", "lost.png", b"png")],
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Creator not found");

        let leftover = std::fs::read_dir(app.uploads_path()).unwrap().count();
        assert_eq!(leftover, 0);
    }

    #[tokio::test]
    async fn test_delete_then_get_not_found() {
        let app = TestApp::new().await;
        let id = create(&app, json!({"display_name": "Temp"})).await;

        let (status, _) = app.json("DELETE", &format!("/api/creators/{}", id), Value::Null).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app.get(&format!("/api/creators/{}", id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Creator not found");

        let (status, _) = app.json("DELETE", &format!("/api/creators/{}", id), Value::Null).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_json_400() {
        let app = TestApp::new().await;

        let (status, body) = app.get("/api/creators/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = app
            .json("POST", "/api/creators/abc/status", json!({"status": "live"}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = app.json("DELETE", "/api/creators/abc", Value::Null).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_set_status_endpoint() {
        let app = TestApp::new().await;
        let id = create(&app, json!({"display_name": "Dawn"})).await;

        let (status, body) = app
            .json(
                "POST",
                &format!("/api/creators/{}/status", id),
                json!({"status": "live", "viewers": 10, "live_start": "2026-01-01T12:00:00Z"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let creator = app.ctx.creators.get(id).await.unwrap();
        assert_eq!(creator.viewers, 10);
        assert_eq!(
            creator.last_live_start.unwrap().to_rfc3339(),
            "2026-01-01T12:00:00+00:00"
        );

        let (status, _) = app
            .json("POST", &format!("/api/creators/{}/status", id), json!({"viewers": 1}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bulk_status_endpoint() {
        let app = TestApp::new().await;
        let id = create(&app, json!({"display_name": "Bulk"})).await;

        let (status, body) = app
            .json(
                "POST",
                "/api/creators/bulk-status",
                json!({"updates": [
                    {"id": id, "status": "live", "viewers": 5},
                    {"id": 999, "status": "live"}
                ]}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "updated": 2}));

        let creator = app.ctx.creators.get(id).await.unwrap();
        assert_eq!(creator.status, "live");
        assert_eq!(creator.viewers, 5);
    }

    #[tokio::test]
    async fn test_bulk_status_malformed_payloads() {
        let app = TestApp::new().await;

        for body in [
            json!({"updates": "not-an-array"}),
            json!({"nothing": []}),
            json!([{"id": 1, "status": "live"}]),
            json!({"updates": [{"status": "live"}]}),
        ] {
            let (status, resp) = app.json("POST", "/api/creators/bulk-status", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(resp["error"].is_string());
        }

        let (status, _) = app.raw("POST", "/api/creators/bulk-status", "garbage").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_query_filters() {
        let app = TestApp::new().await;
        create(&app, json!({"display_name": "The ABC Show", "is_featured": true})).await;
        create(&app, json!({"display_name": "Other", "description": "abc fan"})).await;
        create(&app, json!({"display_name": "Quiet"})).await;

        let (status, body) = app.get("/api/creators?search=ABC").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (_, body) = app.get("/api/creators?featured=true").await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["display_name"], "The ABC Show");

        let (_, body) = app.get("/api/creators?limit=1&offset=1").await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, _) = app.get("/api/creators?limit=lots").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_routes_require_token() {
        let app = TestApp::new().await;
        for (method, uri) in [
            ("GET", "/api/creators"),
            ("POST", "/api/creators"),
            ("POST", "/api/creators/bulk-status"),
            ("DELETE", "/api/creators/1"),
        ] {
            let (status, body) = app
                .send(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
                .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
            assert_eq!(body["error"], "Access token required");
        }
    }
}
