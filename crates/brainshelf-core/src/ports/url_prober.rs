//! UrlProber port - 外部 URL への軽量な到達確認
//!
//! # 実装
//! - **HttpUrlProber**: reqwest による HEAD リクエスト

use async_trait::async_trait;

use crate::domain::ProbeOutcome;

/// UrlProber は 1 件の URL を probe する
///
/// # 契約
/// - 失敗は `ProbeOutcome::TimedOut` / `ProbeOutcome::Failed` で返す（panic・Err にしない）
/// - 実装側でもタイムアウトを設定する（sweep 側でも上限をかける）
#[async_trait]
pub trait UrlProber: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeOutcome;
}
