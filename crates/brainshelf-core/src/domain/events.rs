//! Events - ドメインイベント
//!
//! `EventSink` に流され、クライアントのライブ更新（一覧・コメント）に使われる。

use serde::Serialize;

use super::ids::{AppId, CommentId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CatalogEvent {
    #[serde(rename_all = "camelCase")]
    AppSubmitted { app_id: AppId },
    #[serde(rename_all = "camelCase")]
    AppEdited { app_id: AppId },
    #[serde(rename_all = "camelCase")]
    ActiveChanged { app_id: AppId, active: bool },
    #[serde(rename_all = "camelCase")]
    RatingChanged {
        app_id: AppId,
        rating_sum: i64,
        rating_count: i64,
    },
    #[serde(rename_all = "camelCase")]
    CommentAdded { app_id: AppId, comment_id: CommentId },
    #[serde(rename_all = "camelCase")]
    CommentDeleted { app_id: AppId, comment_id: CommentId },
}

impl CatalogEvent {
    pub fn app_id(&self) -> AppId {
        match self {
            CatalogEvent::AppSubmitted { app_id }
            | CatalogEvent::AppEdited { app_id }
            | CatalogEvent::ActiveChanged { app_id, .. }
            | CatalogEvent::RatingChanged { app_id, .. }
            | CatalogEvent::CommentAdded { app_id, .. }
            | CatalogEvent::CommentDeleted { app_id, .. } => *app_id,
        }
    }
}
