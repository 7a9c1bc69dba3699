use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use brainshelf_core::domain::{AppRecord, CommentRecord, RatingRecord};
use serde::{Deserialize, Serialize};

use super::auth::Authenticated;
use super::{app_id, comment_id, json_body};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RateRequest {
    rating: i64,
}

#[derive(Serialize)]
pub struct UserRatingResponse {
    rating: Option<RatingRecord>,
}

#[derive(Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
pub struct CommentsResponse {
    comments: Vec<CommentRecord>,
}

/// `GET /apps/{id}/rating`
pub async fn get_rating(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<UserRatingResponse>, ApiError> {
    let rating = state.catalog.user_rating(&identity, app_id(&id)?).await?;
    Ok(Json(UserRatingResponse { rating }))
}

/// `PUT /apps/{id}/rating`
pub async fn put_rating(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<String>,
    body: Result<Json<RateRequest>, JsonRejection>,
) -> Result<Json<AppRecord>, ApiError> {
    let app_id = app_id(&id)?;
    let request = json_body(body)?;
    let app = state.catalog.rate(&identity, app_id, request.rating).await?;
    Ok(Json(app))
}

/// `GET /apps/{id}/comments`
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CommentsResponse>, ApiError> {
    let comments = state.catalog.list_comments(app_id(&id)?).await?;
    Ok(Json(CommentsResponse { comments }))
}

/// `POST /apps/{id}/comments`
pub async fn add_comment(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<String>,
    body: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CommentRecord>), ApiError> {
    let app_id = app_id(&id)?;
    let request = json_body(body)?;
    let comment = state
        .catalog
        .add_comment(&identity, app_id, &request.text)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// `DELETE /apps/{id}/comments/{comment_id}`
pub async fn delete_comment(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path((id, comment)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .catalog
        .delete_comment(&identity, app_id(&id)?, comment_id(&comment)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
