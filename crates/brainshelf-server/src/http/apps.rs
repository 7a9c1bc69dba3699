use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Path, Query, State};
use brainshelf_core::domain::{AppDraft, AppId, AppRecord, CatalogQuery};
use serde::Serialize;
use tracing::info;

use super::auth::Authenticated;
use super::{app_id, json_body, query_params};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SubmitResponse {
    success: bool,
    id: AppId,
    message: &'static str,
}

#[derive(Serialize)]
pub struct ListResponse {
    success: bool,
    apps: Vec<AppRecord>,
    total: usize,
}

impl ListResponse {
    fn new(apps: Vec<AppRecord>) -> Self {
        Self {
            success: true,
            total: apps.len(),
            apps,
        }
    }
}

/// `POST /submitApp`
pub async fn submit_app(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    body: Result<Json<AppDraft>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let draft = json_body(body)?;
    let id = state.catalog.submit(&identity, draft).await?;

    Ok(Json(SubmitResponse {
        success: true,
        id,
        message: "App submitted successfully!",
    }))
}

/// `GET /getApps`
pub async fn get_apps(State(state): State<AppState>) -> Result<Json<ListResponse>, ApiError> {
    let apps = state.catalog.list().await?;
    info!(total = apps.len(), "listing apps");
    Ok(Json(ListResponse::new(apps)))
}

/// `GET /apps?search=&category=&sort=`
pub async fn browse_apps(
    State(state): State<AppState>,
    query: Result<Query<CatalogQuery>, QueryRejection>,
) -> Result<Json<ListResponse>, ApiError> {
    let query = query_params(query)?;
    let apps = state.catalog.browse(&query).await?;
    Ok(Json(ListResponse::new(apps)))
}

/// `GET /apps/{id}`
pub async fn get_app(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AppRecord>, ApiError> {
    let app = state.catalog.get(app_id(&id)?).await?;
    Ok(Json(app))
}

/// `PUT /apps/{id}`
///
/// 編集可能なフィールドの全置換。省略したフィールドは新規登録時と同じ既定値
/// （websiteUrl / tags は空、category は `Other`、pricing は `Free`）になる。
pub async fn edit_app(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<String>,
    body: Result<Json<AppDraft>, JsonRejection>,
) -> Result<Json<AppRecord>, ApiError> {
    let app_id = app_id(&id)?;
    let draft = json_body(body)?;
    let app = state.catalog.edit(&identity, app_id, draft).await?;
    Ok(Json(app))
}
