//! InMemoryCatalogStore - 開発・テスト用のカタログストア
//!
//! # 実装詳細
//! - 1 つの `tokio::sync::Mutex` で全状態を守る（ロックを跨いで await しない）
//! - App ごとに comments / ratings のサブコレクションを持つ
//! - 書き込みごとに `version` を進め、`commit_rating` の CAS に使う

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{
    ActiveUpdate, AppFields, AppId, AppRecord, CommentId, CommentRecord, RatingAggregate,
    RatingRecord, RatingSnapshot, StoreError, UserId,
};
use crate::ports::CatalogStore;

/// App 1 件分のドキュメントとサブコレクション
#[derive(Debug, Clone)]
struct AppEntry {
    record: AppRecord,
    comments: HashMap<CommentId, CommentRecord>,
    ratings: HashMap<UserId, RatingRecord>,
}

impl AppEntry {
    fn new(record: AppRecord) -> Self {
        Self {
            record,
            comments: HashMap::new(),
            ratings: HashMap::new(),
        }
    }

    fn bump(&mut self) {
        self.record.version += 1;
    }
}

#[derive(Debug, Default)]
struct StoreState {
    apps: HashMap<AppId, AppEntry>,
    /// 適用済みの batch commit 回数（observability 用）
    batch_commits: usize,
}

impl StoreState {
    fn entry(&self, app_id: AppId) -> Result<&AppEntry, StoreError> {
        self.apps
            .get(&app_id)
            .ok_or_else(|| StoreError::NotFound(app_id.to_string()))
    }

    fn entry_mut(&mut self, app_id: AppId) -> Result<&mut AppEntry, StoreError> {
        self.apps
            .get_mut(&app_id)
            .ok_or_else(|| StoreError::NotFound(app_id.to_string()))
    }
}

/// InMemoryCatalogStore は開発用のカタログストア
///
/// # 使用例
/// ```ignore
/// let store = InMemoryCatalogStore::new();
/// let app = store.insert_app(record).await?;
/// let listing = store.list_apps().await?;
/// ```
#[derive(Clone, Default)]
pub struct InMemoryCatalogStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存レコードで初期化（seed ファイルやテスト用）
    pub fn with_apps(apps: impl IntoIterator<Item = AppRecord>) -> Self {
        let apps = apps
            .into_iter()
            .map(|app| (app.id, AppEntry::new(app)))
            .collect();
        Self {
            state: Arc::new(Mutex::new(StoreState {
                apps,
                batch_commits: 0,
            })),
        }
    }

    /// これまでに適用された batch commit の回数
    pub async fn batch_commits(&self) -> usize {
        self.state.lock().await.batch_commits
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.apps.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn newest_first(apps: &mut [AppRecord]) {
    apps.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn insert_app(&self, mut app: AppRecord) -> Result<AppRecord, StoreError> {
        let mut state = self.state.lock().await;
        app.version = 1;
        state.apps.insert(app.id, AppEntry::new(app.clone()));
        Ok(app)
    }

    async fn get_app(&self, app_id: AppId) -> Result<AppRecord, StoreError> {
        let state = self.state.lock().await;
        Ok(state.entry(app_id)?.record.clone())
    }

    async fn list_apps(&self) -> Result<Vec<AppRecord>, StoreError> {
        let state = self.state.lock().await;
        let mut apps: Vec<AppRecord> = state.apps.values().map(|e| e.record.clone()).collect();
        newest_first(&mut apps);
        Ok(apps)
    }

    async fn apps_with_website(&self) -> Result<Vec<AppRecord>, StoreError> {
        let state = self.state.lock().await;
        let mut apps: Vec<AppRecord> = state
            .apps
            .values()
            .filter(|e| !e.record.website_url.is_empty())
            .map(|e| e.record.clone())
            .collect();
        newest_first(&mut apps);
        Ok(apps)
    }

    async fn update_details(
        &self,
        app_id: AppId,
        fields: AppFields,
        updated_at: DateTime<Utc>,
    ) -> Result<AppRecord, StoreError> {
        let mut state = self.state.lock().await;
        let entry = state.entry_mut(app_id)?;
        entry.record.apply_edit(fields, updated_at);
        entry.bump();
        Ok(entry.record.clone())
    }

    async fn commit_active_batch(&self, updates: &[ActiveUpdate]) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;

        // 先に全件の存在を確認し、1 件でも欠けていれば何も書かない
        for update in updates {
            state.entry(update.app_id)?;
        }
        for update in updates {
            let entry = state.entry_mut(update.app_id)?;
            entry.record.active = Some(update.active);
            entry.record.updated_at = update.updated_at;
            entry.bump();
        }
        state.batch_commits += 1;
        Ok(())
    }

    async fn rating_snapshot(
        &self,
        app_id: AppId,
        user_id: &UserId,
    ) -> Result<RatingSnapshot, StoreError> {
        let state = self.state.lock().await;
        let entry = state.entry(app_id)?;
        Ok(RatingSnapshot {
            version: entry.record.version,
            rating_sum: entry.record.rating_sum,
            rating_count: entry.record.rating_count,
            prior: entry.ratings.get(user_id).map(|r| r.rating),
        })
    }

    async fn commit_rating(
        &self,
        app_id: AppId,
        expected_version: u64,
        aggregate: RatingAggregate,
        rating: RatingRecord,
    ) -> Result<AppRecord, StoreError> {
        let mut state = self.state.lock().await;
        let entry = state.entry_mut(app_id)?;
        if entry.record.version != expected_version {
            return Err(StoreError::Conflict(app_id.to_string()));
        }
        entry.record.rating_sum = aggregate.rating_sum;
        entry.record.rating_count = aggregate.rating_count;
        entry.ratings.insert(rating.user_id.clone(), rating);
        entry.bump();
        Ok(entry.record.clone())
    }

    async fn get_rating(
        &self,
        app_id: AppId,
        user_id: &UserId,
    ) -> Result<Option<RatingRecord>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.entry(app_id)?.ratings.get(user_id).cloned())
    }

    async fn insert_comment(
        &self,
        app_id: AppId,
        comment: CommentRecord,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let entry = state.entry_mut(app_id)?;
        entry.comments.insert(comment.id, comment);
        Ok(())
    }

    async fn get_comment(
        &self,
        app_id: AppId,
        comment_id: CommentId,
    ) -> Result<CommentRecord, StoreError> {
        let state = self.state.lock().await;
        state
            .entry(app_id)?
            .comments
            .get(&comment_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(comment_id.to_string()))
    }

    async fn delete_comment(
        &self,
        app_id: AppId,
        comment_id: CommentId,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state
            .entry_mut(app_id)?
            .comments
            .remove(&comment_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(comment_id.to_string()))
    }

    async fn list_comments(&self, app_id: AppId) -> Result<Vec<CommentRecord>, StoreError> {
        let state = self.state.lock().await;
        let mut comments: Vec<CommentRecord> =
            state.entry(app_id)?.comments.values().cloned().collect();
        comments.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(comments)
    }

    async fn adjust_comment_count(
        &self,
        app_id: AppId,
        delta: i64,
    ) -> Result<AppRecord, StoreError> {
        let mut state = self.state.lock().await;
        let entry = state.entry_mut(app_id)?;
        entry.record.comment_count = (entry.record.comment_count + delta).max(0);
        entry.bump();
        Ok(entry.record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppDraft, Identity, Stars};
    use chrono::{Duration, TimeZone};
    use ulid::Ulid;

    fn app_at(name: &str, url: &str, created_at: DateTime<Utc>) -> AppRecord {
        let fields = AppDraft {
            name: Some(name.to_string()),
            description: Some(format!("{name} description")),
            website_url: Some(url.to_string()),
            ..AppDraft::default()
        }
        .validate()
        .unwrap();
        AppRecord::new(
            AppId::from_ulid(Ulid::new()),
            fields,
            &Identity::new("owner"),
            created_at,
        )
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn list_apps_is_newest_first() {
        let store = InMemoryCatalogStore::new();
        store.insert_app(app_at("old", "", t0())).await.unwrap();
        store
            .insert_app(app_at("new", "", t0() + Duration::hours(1)))
            .await
            .unwrap();

        let names: Vec<String> = store
            .list_apps()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn apps_with_website_skips_empty_urls() {
        let store = InMemoryCatalogStore::with_apps([
            app_at("with", "https://with.example", t0()),
            app_at("without", "", t0()),
        ]);

        let apps = store.apps_with_website().await.unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].name, "with");
    }

    #[tokio::test]
    async fn batch_with_unknown_app_writes_nothing() {
        let known = app_at("known", "https://k.example", t0());
        let store = InMemoryCatalogStore::with_apps([known.clone()]);

        let updates = vec![
            ActiveUpdate {
                app_id: known.id,
                active: false,
                updated_at: t0(),
            },
            ActiveUpdate {
                app_id: AppId::from_ulid(Ulid::new()),
                active: false,
                updated_at: t0(),
            },
        ];

        let result = store.commit_active_batch(&updates).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert_eq!(store.get_app(known.id).await.unwrap().active, Some(true));
        assert_eq!(store.batch_commits().await, 0);
    }

    #[tokio::test]
    async fn commit_rating_rejects_stale_version() {
        let store = InMemoryCatalogStore::new();
        let app = store
            .insert_app(app_at("rated", "", t0()))
            .await
            .unwrap();
        let user = UserId::new("u1");
        let snapshot = store.rating_snapshot(app.id, &user).await.unwrap();

        // 別の書き込みで version が進む
        store.adjust_comment_count(app.id, 1).await.unwrap();

        let record = RatingRecord {
            rating: Stars::try_from(4).unwrap(),
            user_id: user.clone(),
            user_name: "u1".to_string(),
            updated_at: t0(),
        };
        let result = store
            .commit_rating(app.id, snapshot.version, snapshot.apply(record.rating), record)
            .await;

        assert!(matches!(result, Err(StoreError::Conflict(_))));
        // 集計も rating も書かれていない
        let stored = store.get_app(app.id).await.unwrap();
        assert_eq!((stored.rating_sum, stored.rating_count), (0, 0));
        assert_eq!(store.get_rating(app.id, &user).await.unwrap(), None);
    }

    #[tokio::test]
    async fn comment_count_never_goes_negative() {
        let store = InMemoryCatalogStore::new();
        let app = store.insert_app(app_at("c", "", t0())).await.unwrap();

        let app = store.adjust_comment_count(app.id, -1).await.unwrap();
        assert_eq!(app.comment_count, 0);
    }
}
