//! HTTP handlers.
//!
//! - apps: submission, listing, browse, detail, owner edit
//! - engagement: ratings and comments
//! - meta: known categories/pricing, health, live event stream

pub mod apps;
pub mod auth;
pub mod engagement;
pub mod meta;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Query};
use brainshelf_core::domain::{AppId, CatalogError, CommentId};

use crate::error::ApiError;

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn not_found() -> ApiError {
    ApiError::Catalog(CatalogError::NotFound("route".to_string()))
}

/// JSON 本文の rejection を 400 の `{"error"}` にそろえる
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::MalformedPayload(rejection.body_text()))
}

pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| ApiError::MalformedPayload(rejection.body_text()))
}

/// 形式が合わない ID は存在しないものとして扱う
pub(crate) fn app_id(raw: &str) -> Result<AppId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::from(CatalogError::NotFound(raw.to_string())))
}

pub(crate) fn comment_id(raw: &str) -> Result<CommentId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::from(CatalogError::NotFound(raw.to_string())))
}
