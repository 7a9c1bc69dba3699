//! Domain model (ids, app records, ratings, comments, liveness, ...).
//!
//! - ids: ULID ベースの型付き ID
//! - app / rating / comment: 永続化されるレコード
//! - identity: 検証済みの呼び出し元
//! - liveness: URL 到達性の判定と差分（sweep の中核ロジック）
//! - view: クライアント側の絞り込み・並び替え
//! - errors / events: エラー分類とドメインイベント

pub mod app;
pub mod comment;
pub mod errors;
pub mod events;
pub mod identity;
pub mod ids;
pub mod liveness;
pub mod rating;
pub mod view;

pub use app::{
    AppDraft, AppFields, AppRecord, DEFAULT_CATEGORY, DEFAULT_PRICING, KNOWN_CATEGORIES,
    KNOWN_PRICING,
};
pub use comment::CommentRecord;
pub use errors::{AuthError, CatalogError, StoreError};
pub use events::CatalogEvent;
pub use identity::Identity;
pub use ids::{AppId, CommentId, ParseIdError, UserId};
pub use liveness::{ActiveUpdate, ProbeOutcome, diff_active};
pub use rating::{RatingAggregate, RatingRecord, RatingSnapshot, Stars};
pub use view::{CatalogQuery, SortOrder};
