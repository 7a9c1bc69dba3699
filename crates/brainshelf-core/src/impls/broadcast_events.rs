//! BroadcastEventSink - ライブ購読者への配送
//!
//! # 実装詳細
//! - `tokio::sync::broadcast` で fan-out
//! - 購読者がいないときの send エラーは無視（best-effort）
//! - 遅い購読者は `Lagged` を受け取り、最新から追いかける

use tokio::sync::broadcast;

use crate::domain::CatalogEvent;
use crate::ports::EventSink;

pub struct BroadcastEventSink {
    tx: broadcast::Sender<CatalogEvent>,
}

impl BroadcastEventSink {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.tx.subscribe()
    }
}

impl EventSink for BroadcastEventSink {
    fn emit(&self, event: CatalogEvent) {
        // receivers may all be gone
        let _ = self.tx.send(event);
    }
}

/// NoopEventSink は何もしない
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: CatalogEvent) {}
}
