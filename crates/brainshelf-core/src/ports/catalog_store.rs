//! CatalogStore port - カタログの正本（source of truth）
//!
//! CatalogStore は以下を管理します：
//! - `apps` コレクション
//! - App ごとのサブコレクション `comments` / `ratings`（ratings は user id がキー）
//!
//! # 実装
//! - **InMemoryCatalogStore**: 開発・テスト用
//! - ホスト型ドキュメント DB のアダプタはこの trait を実装する

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    ActiveUpdate, AppFields, AppId, AppRecord, CommentId, CommentRecord, RatingAggregate,
    RatingRecord, RatingSnapshot, StoreError, UserId,
};

/// CatalogStore はカタログの読み書きプリミティブ
///
/// # 設計原則
/// - 書き込みのたびに App の `version` を進める
/// - `commit_active_batch` は全件成功か全件失敗（部分適用しない）
/// - `commit_rating` は集計更新と rating upsert を同時に適用し、
///   `expected_version` が一致しなければ `StoreError::Conflict`
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// 新しい App を保存（`version` はストアが設定）
    async fn insert_app(&self, app: AppRecord) -> Result<AppRecord, StoreError>;

    async fn get_app(&self, app_id: AppId) -> Result<AppRecord, StoreError>;

    /// 全 App を createdAt 降順で返す
    async fn list_apps(&self) -> Result<Vec<AppRecord>, StoreError>;

    /// `websiteUrl` が空でない App を返す（sweep の対象）
    async fn apps_with_website(&self) -> Result<Vec<AppRecord>, StoreError>;

    /// owner edit の反映
    async fn update_details(
        &self,
        app_id: AppId,
        fields: AppFields,
        updated_at: DateTime<Utc>,
    ) -> Result<AppRecord, StoreError>;

    /// sweep の batch commit（atomic）
    async fn commit_active_batch(&self, updates: &[ActiveUpdate]) -> Result<(), StoreError>;

    /// rating トランザクションの読み取り側
    async fn rating_snapshot(
        &self,
        app_id: AppId,
        user_id: &UserId,
    ) -> Result<RatingSnapshot, StoreError>;

    /// rating トランザクションの書き込み側（CAS + upsert）
    async fn commit_rating(
        &self,
        app_id: AppId,
        expected_version: u64,
        aggregate: RatingAggregate,
        rating: RatingRecord,
    ) -> Result<AppRecord, StoreError>;

    async fn get_rating(
        &self,
        app_id: AppId,
        user_id: &UserId,
    ) -> Result<Option<RatingRecord>, StoreError>;

    async fn insert_comment(
        &self,
        app_id: AppId,
        comment: CommentRecord,
    ) -> Result<(), StoreError>;

    async fn get_comment(
        &self,
        app_id: AppId,
        comment_id: CommentId,
    ) -> Result<CommentRecord, StoreError>;

    async fn delete_comment(&self, app_id: AppId, comment_id: CommentId)
    -> Result<(), StoreError>;

    /// createdAt 降順
    async fn list_comments(&self, app_id: AppId) -> Result<Vec<CommentRecord>, StoreError>;

    /// `commentCount` を delta だけ増減（0 未満にはしない）
    async fn adjust_comment_count(&self, app_id: AppId, delta: i64)
    -> Result<AppRecord, StoreError>;
}
