//! CatalogService - submission / listing / edit / rating / comments
//!
//! ストアのプリミティブを組み合わせるだけの薄い層。
//! 例外は rating で、ここで楽観ロックのループを回す。
//!
//! # rating トランザクション
//! 1. rating_snapshot() で version・集計・自分の前回評価を読む
//! 2. RatingSnapshot::apply() で新しい集計を計算
//! 3. commit_rating(expected_version, ...) で集計更新と rating upsert を同時に適用
//! 4. Conflict なら 1 からやり直す（最大 MAX_RATING_ATTEMPTS 回）

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{
    AppDraft, AppId, AppRecord, CatalogError, CatalogEvent, CatalogQuery, CommentId,
    CommentRecord, Identity, RatingRecord, Stars, StoreError,
};
use crate::ports::{CatalogStore, Clock, EventSink, IdGenerator};

pub const MAX_RATING_ATTEMPTS: usize = 5;

pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
}

impl CatalogService {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            store,
            ids,
            clock,
            events,
        }
    }

    /// 新しい App を登録して ID を返す
    pub async fn submit(&self, identity: &Identity, draft: AppDraft) -> Result<AppId, CatalogError> {
        let fields = draft.validate()?;
        let record = AppRecord::new(self.ids.generate_app_id(), fields, identity, self.clock.now());
        let app = self.store.insert_app(record).await?;

        info!(app_id = %app.id, submitted_by = %identity.uid, "app submitted");
        self.events.emit(CatalogEvent::AppSubmitted { app_id: app.id });
        Ok(app.id)
    }

    /// 全件（createdAt 降順）
    pub async fn list(&self) -> Result<Vec<AppRecord>, CatalogError> {
        Ok(self.store.list_apps().await?)
    }

    /// 全件にクライアント側と同じ絞り込み・並び替えをかける
    pub async fn browse(&self, query: &CatalogQuery) -> Result<Vec<AppRecord>, CatalogError> {
        let apps = self.store.list_apps().await?;
        Ok(query.apply(&apps).into_iter().cloned().collect())
    }

    pub async fn get(&self, app_id: AppId) -> Result<AppRecord, CatalogError> {
        Ok(self.store.get_app(app_id).await?)
    }

    /// owner edit（提出者のみ）
    pub async fn edit(
        &self,
        identity: &Identity,
        app_id: AppId,
        draft: AppDraft,
    ) -> Result<AppRecord, CatalogError> {
        let current = self.store.get_app(app_id).await?;
        if !current.is_owned_by(&identity.uid) {
            return Err(CatalogError::Forbidden(
                "Only the submitter can edit this app.".to_string(),
            ));
        }
        let fields = draft.validate()?;
        let app = self
            .store
            .update_details(app_id, fields, self.clock.now())
            .await?;

        self.events.emit(CatalogEvent::AppEdited { app_id });
        Ok(app)
    }

    /// rating トランザクション
    pub async fn rate(
        &self,
        identity: &Identity,
        app_id: AppId,
        rating: i64,
    ) -> Result<AppRecord, CatalogError> {
        let stars = Stars::try_from(rating)?;

        for attempt in 1..=MAX_RATING_ATTEMPTS {
            let snapshot = self.store.rating_snapshot(app_id, &identity.uid).await?;
            let aggregate = snapshot.apply(stars);
            let record = RatingRecord {
                rating: stars,
                user_id: identity.uid.clone(),
                user_name: identity.display_name(),
                updated_at: self.clock.now(),
            };

            match self
                .store
                .commit_rating(app_id, snapshot.version, aggregate, record)
                .await
            {
                Ok(app) => {
                    self.events.emit(CatalogEvent::RatingChanged {
                        app_id,
                        rating_sum: app.rating_sum,
                        rating_count: app.rating_count,
                    });
                    return Ok(app);
                }
                Err(StoreError::Conflict(_)) => {
                    debug!(%app_id, attempt, "rating commit conflicted, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(CatalogError::Conflict(app_id.to_string()))
    }

    /// 呼び出し元の前回評価
    pub async fn user_rating(
        &self,
        identity: &Identity,
        app_id: AppId,
    ) -> Result<Option<RatingRecord>, CatalogError> {
        Ok(self.store.get_rating(app_id, &identity.uid).await?)
    }

    pub async fn list_comments(&self, app_id: AppId) -> Result<Vec<CommentRecord>, CatalogError> {
        Ok(self.store.list_comments(app_id).await?)
    }

    /// コメント追加 → commentCount を +1（2 ステップ、best-effort）
    pub async fn add_comment(
        &self,
        identity: &Identity,
        app_id: AppId,
        text: &str,
    ) -> Result<CommentRecord, CatalogError> {
        let comment = CommentRecord::new(
            self.ids.generate_comment_id(),
            text,
            identity,
            self.clock.now(),
        )?;
        self.store.insert_comment(app_id, comment.clone()).await?;
        self.store.adjust_comment_count(app_id, 1).await?;

        self.events.emit(CatalogEvent::CommentAdded {
            app_id,
            comment_id: comment.id,
        });
        Ok(comment)
    }

    /// コメント削除（投稿者のみ）→ commentCount を -1（0 未満にはしない）
    pub async fn delete_comment(
        &self,
        identity: &Identity,
        app_id: AppId,
        comment_id: CommentId,
    ) -> Result<(), CatalogError> {
        let comment = self.store.get_comment(app_id, comment_id).await?;
        if comment.user_id != identity.uid {
            return Err(CatalogError::Forbidden(
                "Only the author can delete this comment.".to_string(),
            ));
        }
        self.store.delete_comment(app_id, comment_id).await?;
        self.store.adjust_comment_count(app_id, -1).await?;

        self.events.emit(CatalogEvent::CommentDeleted { app_id, comment_id });
        Ok(())
    }
}
