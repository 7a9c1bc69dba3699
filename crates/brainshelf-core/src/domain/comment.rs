//! Comment - App ごとのコメント

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::CatalogError;
use super::identity::Identity;
use super::ids::{CommentId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub id: CommentId,
    pub text: String,
    pub user_id: UserId,
    pub user_name: String,
    pub user_photo: String,
    pub created_at: DateTime<Utc>,
}

impl CommentRecord {
    /// 本文を trim して作成（空白のみは不可）
    pub fn new(
        id: CommentId,
        text: &str,
        author: &Identity,
        now: DateTime<Utc>,
    ) -> Result<Self, CatalogError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CatalogError::Validation(
                "Comment text is required.".to_string(),
            ));
        }
        Ok(Self {
            id,
            text: text.to_string(),
            user_id: author.uid.clone(),
            user_name: author.display_name(),
            user_photo: author.picture.clone().unwrap_or_default(),
            created_at: now,
        })
    }
}
