//! EventSink port - ドメインイベントの通知
//!
//! # 実装
//! - **NoopEventSink**: 何もしない（既定）
//! - **BroadcastEventSink**: tokio broadcast でライブ購読者に配る

use crate::domain::CatalogEvent;

/// EventSink はドメインイベントを受け取る
///
/// 通知は best-effort。購読者がいなくても呼び出し側は失敗しない。
pub trait EventSink: Send + Sync {
    fn emit(&self, event: CatalogEvent);
}
